//! # Image Processing Module
//!
//! Questo modulo ottimizza una singola immagine in memoria con la crate `image`:
//! decode, eventuale ridimensionamento, re-encode nello stesso formato e
//! sovrascrittura del file originale.
//!
//! ## Pipeline di Ottimizzazione
//!
//! 1. **Rilevamento formato**: dall'estensione (case-insensitive), PNG o JPEG
//! 2. **Decode**: formato indovinato dal contenuto, non dal nome
//! 3. **Size policy**: lato massimo scelto in base al nome del file
//! 4. **Resize**: solo se il lato lungo supera il massimo, aspect ratio preservato
//! 5. **Encode**: PNG lossless con compressione configurabile, JPEG con qualità fissa
//! 6. **Scrittura**: file temporaneo nella stessa directory + rename sull'originale
//!
//! ## Configurazione Qualità
//!
//! | Formato | Encoder      | Parametri                               |
//! |---------|--------------|-----------------------------------------|
//! | PNG     | `PngEncoder` | `png_compression` + filtro adattivo      |
//! | JPEG    | `JpegEncoder`| `jpeg_quality` (default 80)             |
//!
//! ## Concorrenza
//!
//! Decode/resize/encode sono CPU-bound: `optimize()` li esegue in
//! `spawn_blocking` e ritorna solo a lavoro finito, quindi il chiamante
//! elabora un file alla volta.

use crate::config::Config;
use crate::error::OptimizeError;
use crate::file_manager::{FileManager, ImageKind};
use crate::resize::{fit_within, SizePolicy};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{FilterType as PngFilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageReader};
use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type Result<T> = std::result::Result<T, OptimizeError>;

/// Result of optimizing one image
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    pub path: PathBuf,
    pub kind: ImageKind,
    pub original_dimensions: (u32, u32),
    /// `Some` when the image was downscaled
    pub resized_to: Option<(u32, u32)>,
    pub max_dimension: u32,
    pub original_size: u64,
    /// Equals `original_size` in dry run mode
    pub optimized_size: u64,
    /// Nothing was written to disk
    pub dry_run: bool,
}

impl ProcessOutcome {
    pub fn final_dimensions(&self) -> (u32, u32) {
        self.resized_to.unwrap_or(self.original_dimensions)
    }

    /// Log line for the resize step, `None` when the image kept its size
    pub fn resize_line(&self) -> Option<String> {
        let (width, height) = self.resized_to?;
        let verb = if self.dry_run { "Would resize" } else { "Resized" };
        Some(format!(
            "{} {} to {}x{}",
            verb,
            FileManager::display_name(&self.path),
            width,
            height
        ))
    }

    /// Per-file log line once the image has been handled
    pub fn status_line(&self) -> String {
        let verb = if self.dry_run { "Would optimize" } else { "Optimized" };
        format!("{} {}", verb, FileManager::display_name(&self.path))
    }
}

/// Resizes and re-encodes single images according to the configuration.
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    config: Config,
    policy: SizePolicy,
}

impl ImageProcessor {
    pub fn new(config: Config) -> Self {
        let policy = SizePolicy::from_config(&config);
        Self { config, policy }
    }

    pub fn policy(&self) -> &SizePolicy {
        &self.policy
    }

    /// Optimizes one image file in place.
    ///
    /// The blocking work runs on tokio's blocking pool; the future resolves
    /// once the file has been fully written (or the attempt failed).
    pub async fn optimize(&self, path: &Path) -> Result<ProcessOutcome> {
        let processor = self.clone();
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || processor.optimize_blocking(&path))
            .await
            .map_err(|e| OptimizeError::Task(e.to_string()))?
    }

    /// Synchronous version of [`ImageProcessor::optimize`].
    pub fn optimize_blocking(&self, path: &Path) -> Result<ProcessOutcome> {
        let kind = ImageKind::from_path(path).ok_or_else(|| {
            OptimizeError::UnsupportedFormat(format!(
                "{} (only PNG and JPEG are supported)",
                path.display()
            ))
        })?;
        let file_name = FileManager::display_name(path);
        let original_size = FileManager::file_size(path)?;

        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let original_dimensions = (image.width(), image.height());
        let max_dimension = self.policy.max_dimension_for(&file_name);

        debug!(
            "{}: {}x{} {:?}, max dimension {}",
            file_name, original_dimensions.0, original_dimensions.1, kind, max_dimension
        );

        let resized_to = fit_within(original_dimensions.0, original_dimensions.1, max_dimension);
        let image = match resized_to {
            Some((width, height)) => {
                image.resize_exact(width, height, self.config.resize_filter.to_filter_type())
            }
            None => image,
        };

        let optimized_size = if self.config.dry_run {
            debug!("Dry run: would overwrite {}", path.display());
            original_size
        } else {
            FileManager::write_in_place(path, |writer| self.encode(writer, kind, &image))?;
            FileManager::file_size(path)?
        };

        let outcome = ProcessOutcome {
            path: path.to_path_buf(),
            kind,
            original_dimensions,
            resized_to,
            max_dimension,
            original_size,
            optimized_size,
            dry_run: self.config.dry_run,
        };
        if let Some(line) = outcome.resize_line() {
            info!("{}", line);
        }

        Ok(outcome)
    }

    /// Encodes `image` in the format matching `kind`.
    pub fn encode<W: Write>(&self, writer: W, kind: ImageKind, image: &DynamicImage) -> Result<()> {
        match kind {
            ImageKind::Png => {
                let encoder = PngEncoder::new_with_quality(
                    writer,
                    self.config.png_compression.into(),
                    PngFilterType::Adaptive,
                );
                image.write_with_encoder(encoder)?;
            }
            ImageKind::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(writer, self.config.jpeg_quality);
                jpeg_compatible(image).write_with_encoder(encoder)?;
            }
        }
        Ok(())
    }
}

/// JPEG has no alpha and only 8-bit samples.
fn jpeg_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(image),
        ColorType::L16 => Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}
