//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Discovery delle immagini in una directory (opzionalmente ricorsiva)
//! - Determinazione formato file dall'estensione (case-insensitive)
//! - Scrittura sicura in-place tramite file temporaneo + rename
//! - Utilità per calcoli dimensioni e percentuali
//!
//! ## Formati supportati:
//! - **PNG**: `.png`
//! - **JPEG**: `.jpg`, `.jpeg`
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::find_images(Path::new("./assets"), false)?;
//! for file in files {
//!     let kind = ImageKind::from_path(&file);
//! }
//! ```

use crate::error::OptimizeError;
use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::warn;
use walkdir::WalkDir;

/// Output format, decided by the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Find all PNG/JPEG files in a directory, sorted by file name.
    ///
    /// Only direct children are returned unless `recursive` is set. Symlinks
    /// are followed, so a linked image is returned under its link path.
    pub fn find_images(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(anyhow::anyhow!("Not a directory: {}", dir.display()));
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_file() && Self::is_supported_image(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    pub fn is_supported_image(path: &Path) -> bool {
        ImageKind::from_path(path).is_some()
    }

    /// File name for log lines, falling back to the full path
    pub fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    pub fn file_size(path: &Path) -> std::io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    /// Fails with `PermissionDenied` unless `path` can be opened for writing.
    ///
    /// Read-only files are refused even when the process could open them
    /// anyway (root), since the rename in `write_in_place` never looks at the
    /// file mode.
    pub fn ensure_writable(path: &Path) -> std::io::Result<()> {
        if fs::metadata(path)?.permissions().readonly() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }
        OpenOptions::new().write(true).open(path)?;
        Ok(())
    }

    /// Replace `target` with whatever `write` produces.
    ///
    /// The content goes to a temporary file in the same directory first, so a
    /// failing writer leaves `target` untouched. The original permissions are
    /// carried over to the new file. A symlinked `target` is resolved first:
    /// the linked file is replaced and the link stays a link.
    pub fn write_in_place<F>(target: &Path, write: F) -> std::result::Result<(), OptimizeError>
    where
        F: FnOnce(&mut BufWriter<&mut fs::File>) -> std::result::Result<(), OptimizeError>,
    {
        let target = fs::canonicalize(target)?;
        Self::ensure_writable(&target)?;

        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let permissions = fs::metadata(&target)?.permissions();

        let mut temp = Builder::new()
            .prefix(".asset-optimizer-")
            .tempfile_in(parent)?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            write(&mut writer)?;
            writer.flush()?;
        }

        temp.as_file().set_permissions(permissions)?;
        temp.persist(&target)?;
        Ok(())
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction (negative when the file grew)
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_image_kind_from_extension() {
        assert_eq!(ImageKind::from_path(Path::new("a.png")), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_path(Path::new("a.PNG")), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_path(Path::new("a.jpg")), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_path(Path::new("a.JpEg")), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_path(Path::new("a.webp")), None);
        assert_eq!(ImageKind::from_path(Path::new("png")), None);
    }

    #[test]
    fn test_find_images_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "b.JPG");
        touch(temp_dir.path(), "a.png");
        touch(temp_dir.path(), "notes.txt");
        touch(temp_dir.path(), "c.gif");
        fs::create_dir(temp_dir.path().join("folder.png")).unwrap();

        let files = FileManager::find_images(temp_dir.path(), false).unwrap();
        let names: Vec<String> = files.iter().map(|p| FileManager::display_name(p)).collect();
        assert_eq!(names, vec!["a.png", "b.JPG"]);
    }

    #[test]
    fn test_find_images_recursive() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "top.png");
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "deep.jpeg");

        assert_eq!(FileManager::find_images(temp_dir.path(), false).unwrap().len(), 1);
        assert_eq!(FileManager::find_images(temp_dir.path(), true).unwrap().len(), 2);
    }

    #[test]
    fn test_find_images_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(FileManager::find_images(&temp_dir.path().join("missing"), false).is_err());
    }

    #[test]
    fn test_write_in_place_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.png");
        fs::write(&path, b"old").unwrap();

        FileManager::write_in_place(&path, |w| {
            w.write_all(b"new content")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new content");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_in_place_keeps_original_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.png");
        fs::write(&path, b"old").unwrap();

        let result = FileManager::write_in_place(&path, |w| {
            w.write_all(b"partial")?;
            Err(OptimizeError::Validation("boom".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), b"old");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_images_follows_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("store");
        let assets = temp_dir.path().join("assets");
        fs::create_dir(&store).unwrap();
        fs::create_dir(&assets).unwrap();
        let real = touch(&store, "real.png");
        std::os::unix::fs::symlink(&real, assets.join("hero.png")).unwrap();

        let files = FileManager::find_images(&assets, false).unwrap();
        assert_eq!(files, vec![assets.join("hero.png")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_in_place_through_symlink_keeps_link() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real.png");
        fs::write(&real, b"old").unwrap();
        let link = temp_dir.path().join("hero.png");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        FileManager::write_in_place(&link, |w| {
            w.write_all(b"new")?;
            Ok(())
        })
        .unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&real).unwrap(), b"new");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_in_place_refuses_read_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locked.png");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

        let err = FileManager::write_in_place(&path, |w| {
            w.write_all(b"new")?;
            Ok(())
        })
        .unwrap_err();

        match err {
            OptimizeError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(fs::read(&path).unwrap(), b"old");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(0, 10), 0.0);
        assert_eq!(FileManager::calculate_reduction(100, 25), 75.0);
        assert!(FileManager::calculate_reduction(100, 120) < 0.0);
    }
}
