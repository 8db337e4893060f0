//! # Asset Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento della configurazione (file JSON + override da CLI)
//! - Avvio dell'optimizer o del copier
//!
//! ## Esempio di utilizzo:
//! ```bash
//! asset-optimizer optimize ./assets --quality 85 --verbose
//! asset-optimizer copy --pair /tmp/male.png ./assets/avatar_m.png --pair /tmp/female.png ./assets/avatar_f.png
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use asset_optimizer::config::PngCompression;
use asset_optimizer::progress::ProgressLogWriter;
use asset_optimizer::resize::ResizeAlgorithm;
use asset_optimizer::{AssetCopier, AssetOptimizer, Config, CopyJob};

#[derive(Parser)]
#[command(name = "asset-optimizer")]
#[command(about = "Resize and recompress web image assets in place")]
struct Args {
    /// JSON configuration file (missing file = defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize and recompress every PNG/JPEG in a directory, overwriting the originals
    Optimize {
        /// Directory containing the images
        #[arg(default_value = "./assets")]
        directory: PathBuf,

        /// JPEG quality (1-100)
        #[arg(short, long)]
        quality: Option<u8>,

        /// Max dimension for files matching no size rule
        #[arg(short, long)]
        max_dimension: Option<u32>,

        /// PNG compression level
        #[arg(long, value_enum)]
        png_compression: Option<PngCompression>,

        /// Resampling filter
        #[arg(long, value_enum)]
        filter: Option<ResizeAlgorithm>,

        /// Also process subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Dry run - report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },
    /// Copy asset files to their destinations
    Copy {
        /// Source and destination, repeatable
        #[arg(long = "pair", num_args = 2, value_names = ["SOURCE", "DEST"])]
        pairs: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(ProgressLogWriter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match args.config {
        Some(ref path) => Config::from_file(path).await?,
        None => Config::default(),
    };

    match args.command {
        Command::Optimize {
            directory,
            quality,
            max_dimension,
            png_compression,
            filter,
            recursive,
            dry_run,
            no_progress,
        } => {
            if !directory.is_dir() {
                return Err(anyhow::anyhow!(
                    "Image directory does not exist: {}",
                    directory.display()
                ));
            }

            if let Some(quality) = quality {
                config.jpeg_quality = quality;
            }
            if let Some(max_dimension) = max_dimension {
                config.default_max_dimension = max_dimension;
            }
            if let Some(png_compression) = png_compression {
                config.png_compression = png_compression;
            }
            if let Some(filter) = filter {
                config.resize_filter = filter;
            }
            config.recursive |= recursive;
            config.dry_run |= dry_run;
            config.show_progress =
                config.show_progress && !no_progress && std::io::stderr().is_terminal();

            let optimizer = AssetOptimizer::new(config)?;
            optimizer.run(&directory).await?;
        }
        Command::Copy { pairs } => {
            let jobs: Vec<CopyJob> = if pairs.is_empty() {
                config.copies
            } else {
                pairs
                    .chunks_exact(2)
                    .map(|pair| CopyJob::new(&pair[0], &pair[1]))
                    .collect()
            };

            if jobs.is_empty() {
                warn!("No copy jobs given (use --pair SOURCE DEST or `copies` in the config file)");
                return Ok(());
            }

            AssetCopier::copy_all(&jobs).await;
        }
    }

    Ok(())
}
