//! # Image Resize Module
//!
//! Questo modulo contiene la logica decisionale del ridimensionamento:
//! quale lato massimo applicare a un file e quali dimensioni finali calcolare.
//!
//! ## Caratteristiche
//! - **Size policy**: regole ordinate sottostringa → lato massimo, la prima vince
//! - **Aspect ratio**: il lato lungo diventa il massimo, l'altro viene troncato
//! - **Solo downscale**: immagini già entro il limite non vengono toccate
//! - **Filtri**: Lanczos3 di default per la miglior qualità in riduzione
//!
//! ## Esempio
//! ```text
//! avatar_team.png 1600x900 → regola "avatar" (250) → 250x140
//! hero.jpg        1000x500 → default (800)         → 800x400
//! logo.png         300x300 → default (800)         → invariato
//! ```

use crate::config::{Config, SizeRule};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Algoritmi di resize disponibili
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResizeAlgorithm {
    /// Nearest neighbor - pixel perfetto, qualità bassa in riduzione
    Nearest,
    /// Triangle - veloce, qualità accettabile
    Triangle,
    /// Catmull-Rom - buona qualità generale
    CatmullRom,
    /// Gaussian - morbido
    Gaussian,
    /// Lanczos3 - migliore qualità per downscaling
    #[default]
    Lanczos3,
}

impl ResizeAlgorithm {
    pub fn to_filter_type(self) -> FilterType {
        match self {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Triangle => FilterType::Triangle,
            ResizeAlgorithm::CatmullRom => FilterType::CatmullRom,
            ResizeAlgorithm::Gaussian => FilterType::Gaussian,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Filename-driven choice of the max dimension
#[derive(Debug, Clone)]
pub struct SizePolicy {
    rules: Vec<SizeRule>,
    default_max_dimension: u32,
}

impl SizePolicy {
    pub fn new(rules: Vec<SizeRule>, default_max_dimension: u32) -> Self {
        Self {
            rules,
            default_max_dimension,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.size_rules.clone(), config.default_max_dimension)
    }

    /// Returns the max dimension of the first rule matching `file_name`,
    /// or the default when nothing matches.
    pub fn max_dimension_for(&self, file_name: &str) -> u32 {
        match self.rules.iter().find(|rule| rule.matches(file_name)) {
            Some(rule) => {
                debug!(
                    "{} matched size rule {:?} -> max {}px",
                    file_name, rule.patterns, rule.max_dimension
                );
                rule.max_dimension
            }
            None => self.default_max_dimension,
        }
    }
}

/// Computes the dimensions that fit `width`x`height` within `max_dimension`
/// on its longer side, keeping the aspect ratio.
///
/// Returns `None` when the image already fits. The shorter side is truncated,
/// never rounded, and clamped to at least one pixel.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    if width <= max_dimension && height <= max_dimension {
        return None;
    }

    let max = f64::from(max_dimension);
    let (new_width, new_height) = if width > height {
        let scaled = f64::from(height) * (max / f64::from(width));
        (max_dimension, scaled as u32)
    } else {
        let scaled = f64::from(width) * (max / f64::from(height));
        (scaled as u32, max_dimension)
    };

    Some((new_width.max(1), new_height.max(1)))
}
