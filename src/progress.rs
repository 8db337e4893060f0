//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di ottimizzazione.
//!
//! ## Componenti principali:
//! - `ProgressManager`: progress bar con `indicatif` (nascosta se disabilitata)
//! - `OptimizationStats`: statistiche cumulative della run
//! - `ProgressLogWriter`: writer per `tracing_subscriber` che sospende la
//!   barra attiva mentre scrive, così le righe di log non la spezzano
//!
//! ## Statistiche tracciate:
//! - **files_found**: Immagini trovate nella directory
//! - **files_optimized**: Immagini riscritte con successo
//! - **files_resized**: Di cui ridimensionate
//! - **errors**: Immagini fallite (loggate e saltate)
//! - **total_original_size** / **total_optimized_size**: byte prima/dopo
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:03] [========================>---------------] 12/20 (60%) avatar_m.png
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// Bar currently drawn on the terminal, if any
static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn set_active_bar(bar: Option<ProgressBar>) {
    if let Ok(mut active) = ACTIVE_BAR.lock() {
        *active = bar;
    }
}

fn active_bar() -> Option<ProgressBar> {
    ACTIVE_BAR.lock().ok().and_then(|active| active.clone())
}

/// Manages progress reporting for a directory run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager; a disabled one draws nothing
    pub fn new(total_files: u64, enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total_files);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        set_active_bar(Some(bar.clone()));

        Self { bar }
    }

    /// Show the file currently being processed
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
        set_active_bar(None);
    }
}

/// `MakeWriter` for the fmt layer: log lines go to stdout with the active
/// progress bar cleared, then the bar is redrawn below them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressLogWriter;

impl<'a> MakeWriter<'a> for ProgressLogWriter {
    type Writer = SuspendingStdout;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendingStdout
    }
}

pub struct SuspendingStdout;

impl Write for SuspendingStdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match active_bar() {
            Some(bar) => bar.suspend(|| io::stdout().lock().write(buf)),
            None => io::stdout().lock().write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match active_bar() {
            Some(bar) => bar.suspend(|| io::stdout().lock().write_all(buf)),
            None => io::stdout().lock().write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Statistics tracker for optimization results
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OptimizationStats {
    pub files_found: usize,
    pub files_optimized: usize,
    pub files_resized: usize,
    pub errors: usize,
    pub total_original_size: u64,
    pub total_optimized_size: u64,
}

impl OptimizationStats {
    pub fn new(files_found: usize) -> Self {
        Self {
            files_found,
            ..Default::default()
        }
    }

    pub fn add_optimized(&mut self, original_size: u64, new_size: u64, resized: bool) {
        self.files_optimized += 1;
        if resized {
            self.files_resized += 1;
        }
        self.total_original_size += original_size;
        self.total_optimized_size += new_size;
    }

    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Bytes saved; PNG re-encodes can grow, so this saturates at zero
    pub fn bytes_saved(&self) -> u64 {
        self.total_original_size.saturating_sub(self.total_optimized_size)
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_original_size, self.total_optimized_size)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Found: {} images | Optimized: {} | Resized: {} | Errors: {} | Total saved: {} ({:.2}%)",
            self.files_found,
            self.files_optimized,
            self.files_resized,
            self.errors,
            FileManager::format_size(self.bytes_saved()),
            self.overall_reduction_percent()
        )
    }
}
