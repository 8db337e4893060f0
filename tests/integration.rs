use asset_optimizer::{AssetCopier, AssetOptimizer, Config, CopyJob};
use image::{ImageFormat, ImageReader, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn config() -> Config {
    Config {
        show_progress: false,
        ..Default::default()
    }
}

fn save_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 200]))
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

fn save_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb([255, 200, 0]))
        .save_with_format(&path, ImageFormat::Jpeg)
        .unwrap();
    path
}

fn dimensions(path: &Path) -> (u32, u32) {
    let image = image::open(path).unwrap();
    (image.width(), image.height())
}

fn format_of(path: &Path) -> Option<ImageFormat> {
    ImageReader::open(path).unwrap().with_guessed_format().unwrap().format()
}

#[tokio::test]
async fn test_optimize_assets_directory() {
    let temp_dir = TempDir::new().unwrap();
    let assets = temp_dir.path();

    let avatar = save_png(assets, "avatar_team.png", 1600, 900);
    let hero = save_jpeg(assets, "hero.jpg", 1200, 1600);
    let icon = save_png(assets, "icon.PNG", 200, 200);
    std::fs::write(assets.join("readme.txt"), b"not an image").unwrap();

    let stats = AssetOptimizer::new(config()).unwrap().run(assets).await.unwrap();

    assert_eq!(stats.files_found, 3);
    assert_eq!(stats.files_optimized, 3);
    assert_eq!(stats.files_resized, 2);
    assert_eq!(stats.errors, 0);

    assert_eq!(dimensions(&avatar), (250, 140));
    assert_eq!(dimensions(&hero), (600, 800));
    assert_eq!(dimensions(&icon), (200, 200));

    assert_eq!(format_of(&avatar), Some(ImageFormat::Png));
    assert_eq!(format_of(&hero), Some(ImageFormat::Jpeg));
    assert_eq!(format_of(&icon), Some(ImageFormat::Png));
    assert_eq!(std::fs::read(assets.join("readme.txt")).unwrap(), b"not an image");
}

#[tokio::test]
async fn test_failed_file_does_not_stop_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let assets = temp_dir.path();

    std::fs::write(assets.join("1_truncated.jpg"), [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    let later = save_png(assets, "2_banner.png", 2000, 1000);

    let stats = AssetOptimizer::new(config()).unwrap().run(assets).await.unwrap();

    assert_eq!(stats.errors, 1);
    assert_eq!(stats.files_optimized, 1);
    assert_eq!(dimensions(&later), (800, 400));
}

#[tokio::test]
async fn test_recursive_flag() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("team");
    std::fs::create_dir(&nested).unwrap();
    let deep = save_png(&nested, "photo.png", 1000, 1000);

    let flat = AssetOptimizer::new(config()).unwrap().run(temp_dir.path()).await.unwrap();
    assert_eq!(flat.files_found, 0);
    assert_eq!(dimensions(&deep), (1000, 1000));

    let recursive = Config {
        recursive: true,
        ..config()
    };
    let stats = AssetOptimizer::new(recursive).unwrap().run(temp_dir.path()).await.unwrap();
    assert_eq!(stats.files_resized, 1);
    assert_eq!(dimensions(&deep), (800, 800));
}

#[tokio::test]
async fn test_copy_then_optimize() {
    let temp_dir = TempDir::new().unwrap();
    let source_dir = temp_dir.path().join("generated");
    let assets = temp_dir.path().join("assets");
    std::fs::create_dir(&source_dir).unwrap();
    std::fs::create_dir(&assets).unwrap();

    let female = save_png(&source_dir, "female_team_avatar.png", 1024, 1024);

    let jobs = vec![
        CopyJob::new(source_dir.join("male_team_avatar.png"), assets.join("avatar_m.png")),
        CopyJob::new(&female, assets.join("avatar_f.png")),
    ];
    let report = AssetCopier::copy_all(&jobs).await;

    assert_eq!(report.copied, 1);
    assert_eq!(report.failed, 1);
    assert!(!assets.join("avatar_m.png").exists());

    let stats = AssetOptimizer::new(config()).unwrap().run(&assets).await.unwrap();
    assert_eq!(stats.files_found, 1);
    assert_eq!(dimensions(&assets.join("avatar_f.png")), (250, 250));
    assert_eq!(dimensions(&female), (1024, 1024));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_image_is_optimized_and_link_kept() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store");
    let assets = temp_dir.path().join("assets");
    std::fs::create_dir(&store).unwrap();
    std::fs::create_dir(&assets).unwrap();
    let real = save_png(&store, "real.png", 1600, 900);
    let link = assets.join("hero.png");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let stats = AssetOptimizer::new(config()).unwrap().run(&assets).await.unwrap();

    assert_eq!(stats.files_found, 1);
    assert_eq!(stats.files_resized, 1);
    assert_eq!(dimensions(&real), (800, 450));
    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
}

#[cfg(unix)]
#[tokio::test]
async fn test_read_only_image_is_left_alone() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let locked = save_png(temp_dir.path(), "locked.png", 1600, 900);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o444)).unwrap();
    let before = std::fs::read(&locked).unwrap();
    save_png(temp_dir.path(), "open.png", 1600, 900);

    let stats = AssetOptimizer::new(config()).unwrap().run(temp_dir.path()).await.unwrap();

    assert_eq!(stats.files_found, 2);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.files_optimized, 1);
    assert_eq!(std::fs::read(&locked).unwrap(), before);
    assert_eq!(
        std::fs::metadata(&locked).unwrap().permissions().mode() & 0o777,
        0o444
    );
}

#[tokio::test]
async fn test_dry_run_leaves_directory_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let banner = save_png(temp_dir.path(), "banner.png", 1000, 500);
    let before = std::fs::read(&banner).unwrap();

    let dry = Config {
        dry_run: true,
        ..config()
    };
    let stats = AssetOptimizer::new(dry).unwrap().run(temp_dir.path()).await.unwrap();

    assert_eq!(stats.files_resized, 1);
    assert_eq!(stats.bytes_saved(), 0);
    assert_eq!(std::fs::read(&banner).unwrap(), before);
}
