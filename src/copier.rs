//! # Asset Copy Module
//!
//! Copia una lista di file sorgente verso le rispettive destinazioni.
//! Ogni copia è indipendente: un errore viene loggato e si passa alla successiva.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// A single source → destination copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyJob {
    /// Name used in log lines; defaults to the destination file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl CopyJob {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            label: None,
            source: source.into(),
            destination: destination.into(),
        }
    }

    pub fn label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        self.destination
            .file_name()
            .or_else(|| self.source.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.destination.display().to_string())
    }

    /// Copying onto an existing directory drops the file inside it.
    fn resolved_destination(&self) -> PathBuf {
        match self.source.file_name() {
            Some(name) if self.destination.is_dir() => self.destination.join(name),
            _ => self.destination.clone(),
        }
    }
}

/// Outcome of a batch of copies
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    pub failed: usize,
}

pub struct AssetCopier;

impl AssetCopier {
    /// Runs every job in order, logging `Copied {label}` or `Error copying {label}: {error}`.
    pub async fn copy_all(jobs: &[CopyJob]) -> CopyReport {
        let mut report = CopyReport::default();

        for job in jobs {
            let label = job.label();
            match Self::copy_one(job).await {
                Ok(bytes) => {
                    debug!("Copied {} bytes to {}", bytes, job.resolved_destination().display());
                    info!("Copied {}", label);
                    report.copied += 1;
                }
                Err(e) => {
                    error!("Error copying {}: {}", label, e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// The source is opened before the destination is created, so a missing
    /// source never leaves an empty destination behind.
    async fn copy_one(job: &CopyJob) -> std::io::Result<u64> {
        if !is_file(&job.source).await {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("source file not found: {}", job.source.display()),
            ));
        }
        tokio::fs::copy(&job.source, job.resolved_destination()).await
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}
