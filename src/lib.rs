//! # Asset Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per i test
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione, regole di dimensione e validazione
//! - `error`: Tipi di errore custom per singolo file
//! - `file_manager`: Discovery immagini e scrittura in-place
//! - `resize`: Size policy e calcolo dimensioni con aspect ratio
//! - `image_processor`: Decode, resize e re-encode di una singola immagine (PNG/JPEG)
//! - `optimizer`: Orchestratore sequenziale di una directory
//! - `copier`: Copia di asset tra directory
//! - `progress`: Progress bar e statistiche
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use asset_optimizer::{AssetOptimizer, Config};
//!
//! let optimizer = AssetOptimizer::new(Config::default())?;
//! let stats = optimizer.run(Path::new("./assets")).await?;
//! ```

pub mod config;
pub mod copier;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod optimizer;
pub mod progress;
pub mod resize;

pub use config::{Config, SizeRule};
pub use copier::{AssetCopier, CopyJob, CopyReport};
pub use error::OptimizeError;
pub use image_processor::{ImageProcessor, ProcessOutcome};
pub use optimizer::AssetOptimizer;
pub use progress::OptimizationStats;
pub use resize::{fit_within, SizePolicy};
