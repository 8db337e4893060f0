//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di ottimizzazione
//! - Definisce la tabella delle regole di dimensione (`SizeRule`)
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `jpeg_quality`: Qualità JPEG (1-100, default: 80)
//! - `png_compression`: Livello di compressione PNG (default: best)
//! - `resize_filter`: Filtro di ricampionamento (default: lanczos3)
//! - `default_max_dimension`: Lato massimo se nessuna regola corrisponde (default: 800)
//! - `size_rules`: Regole ordinate sottostringa → lato massimo (la prima vince)
//! - `recursive`: Scende nelle sottodirectory (default: false)
//! - `dry_run`: Simulazione senza scrivere file (default: false)
//! - `show_progress`: Mostra la progress bar (default: true)
//! - `copies`: Lista di copie per il comando `copy`
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     jpeg_quality: 85,
//!     default_max_dimension: 1200,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::copier::CopyJob;
use crate::resize::ResizeAlgorithm;
use anyhow::Result;
use image::codecs::png::CompressionType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A filename heuristic: any of `patterns` found in the file name selects `max_dimension`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRule {
    pub patterns: Vec<String>,
    pub max_dimension: u32,
}

impl SizeRule {
    pub fn new<I, S>(patterns: I, max_dimension: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            max_dimension,
        }
    }

    /// Case-sensitive substring match against the file name
    pub fn matches(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|pattern| file_name.contains(pattern.as_str()))
    }
}

/// PNG deflate effort. PNG output is always lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PngCompression {
    Fast,
    Default,
    #[default]
    Best,
}

impl From<PngCompression> for CompressionType {
    fn from(level: PngCompression) -> Self {
        match level {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

/// Configuration for asset optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// PNG compression level
    pub png_compression: PngCompression,
    /// Resampling filter used when downscaling
    pub resize_filter: ResizeAlgorithm,
    /// Max dimension when no size rule matches
    pub default_max_dimension: u32,
    /// Ordered filename rules, first match wins
    pub size_rules: Vec<SizeRule>,
    /// Walk subdirectories too
    pub recursive: bool,
    /// Dry run - decode and report, never write
    pub dry_run: bool,
    /// Show a progress bar while optimizing
    pub show_progress: bool,
    /// Copy jobs used by the `copy` command when none are given on the command line
    pub copies: Vec<CopyJob>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jpeg_quality: 80,
            png_compression: PngCompression::Best,
            resize_filter: ResizeAlgorithm::Lanczos3,
            default_max_dimension: 800,
            size_rules: default_size_rules(),
            recursive: false,
            dry_run: false,
            show_progress: true,
            copies: Vec::new(),
        }
    }
}

/// Avatars and icons never need to be large; thumbnails a bit more.
pub fn default_size_rules() -> Vec<SizeRule> {
    vec![
        SizeRule::new(["avatar", "icon"], 250),
        SizeRule::new(["thumb"], 400),
    ]
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(anyhow::anyhow!("JPEG quality must be between 1 and 100"));
        }

        if self.default_max_dimension == 0 {
            return Err(anyhow::anyhow!("Default max dimension must be greater than 0"));
        }

        for (index, rule) in self.size_rules.iter().enumerate() {
            if rule.max_dimension == 0 {
                return Err(anyhow::anyhow!(
                    "Size rule #{} must have a max dimension greater than 0",
                    index + 1
                ));
            }
            if rule.patterns.is_empty() || rule.patterns.iter().any(|p| p.is_empty()) {
                return Err(anyhow::anyhow!(
                    "Size rule #{} must have at least one non-empty pattern",
                    index + 1
                ));
            }
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
