//! # Main Optimizer Orchestrator Module
//!
//! Questo è il modulo che orchestra l'ottimizzazione di una directory.
//!
//! ## Flusso di esecuzione:
//! 1. **Inizializzazione**: validazione della config
//! 2. **File discovery**: PNG/JPEG nella directory, ordinati per nome
//! 3. **Processing sequenziale**: un file alla volta via `ImageProcessor`
//! 4. **Progress tracking**: progress bar aggiornata per ogni file
//! 5. **Reporting**: riepilogo finale con byte risparmiati
//!
//! ## Error handling:
//! - Errori per singoli file non bloccano l'operazione: loggati e saltati
//! - Nessun rollback: i file già riscritti restano riscritti
//! - Solo una directory illeggibile fa fallire `run()`
//!
//! ## Esempio:
//! ```rust,ignore
//! let optimizer = AssetOptimizer::new(Config::default())?;
//! let stats = optimizer.run(Path::new("./assets")).await?;
//! ```

use crate::{
    config::Config,
    file_manager::FileManager,
    image_processor::ImageProcessor,
    progress::{OptimizationStats, ProgressManager},
};
use anyhow::Result;
use std::path::Path;
use tracing::{error, info};

/// Directory-level image optimizer
pub struct AssetOptimizer {
    config: Config,
    processor: ImageProcessor,
}

impl AssetOptimizer {
    /// Create a new optimizer instance
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let processor = ImageProcessor::new(config.clone());

        Ok(Self { config, processor })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Optimize every PNG/JPEG in `dir`, one at a time.
    pub async fn run(&self, dir: &Path) -> Result<OptimizationStats> {
        let files = FileManager::find_images(dir, self.config.recursive)?;
        self.log_configuration(dir, files.len());

        let mut stats = OptimizationStats::new(files.len());
        if files.is_empty() {
            info!("No images found to optimize");
            return Ok(stats);
        }

        let progress = ProgressManager::new(files.len() as u64, self.config.show_progress);

        for path in &files {
            let file_name = FileManager::display_name(path);
            progress.set_message(&file_name);

            match self.processor.optimize(path).await {
                Ok(outcome) => {
                    info!("{}", outcome.status_line());
                    stats.add_optimized(
                        outcome.original_size,
                        outcome.optimized_size,
                        outcome.resized_to.is_some(),
                    );
                }
                Err(e) => {
                    error!("Failed to process {}: {}", file_name, e);
                    stats.add_error();
                }
            }

            progress.inc();
        }

        let summary = stats.format_summary();
        progress.finish(&summary);
        info!("{}", summary);

        Ok(stats)
    }

    fn log_configuration(&self, dir: &Path, total: usize) {
        info!("Starting asset optimization in: {} ({} images)", dir.display(), total);
        info!(
            "🎯 JPEG quality: {} | PNG compression: {:?} | filter: {:?}",
            self.config.jpeg_quality, self.config.png_compression, self.config.resize_filter
        );
        for rule in &self.config.size_rules {
            info!("📐 {:?} -> max {}px", rule.patterns, rule.max_dimension);
        }
        info!("📐 default -> max {}px", self.config.default_max_dimension);
        if self.config.dry_run {
            info!("🧪 Dry run mode: No files will be modified");
        }
    }
}
