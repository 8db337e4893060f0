//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare gli errori per singolo file
//! - Integra con `thiserror` per automatic error conversion
//! - Gli errori di orchestrazione (CLI, directory) passano per `anyhow`
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, scrittura fallita)
//! - `Image`: Errori di decode/encode (file corrotti, colori non supportati)
//! - `UnsupportedFormat`: Estensione diversa da PNG/JPEG
//! - `Validation`: Errori di validazione configurazione o input
//! - `Task`: Il task blocking di elaborazione è andato in panic
//!
//! ## Esempio:
//! ```rust,ignore
//! if config.jpeg_quality == 0 {
//!     return Err(OptimizeError::Validation("JPEG quality must be between 1 and 100".to_string()));
//! }
//! ```

/// Custom error types for asset optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Processing task failed: {0}")]
    Task(String),
}

impl From<tempfile::PersistError> for OptimizeError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}
