//! # Image Compressor - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Espansione degli input (file singoli o directory intere)
//! - Creazione della configurazione e avvio della pipeline
//! - Stampa dei risultati (testo o JSON)
//!
//! ## Esempio di utilizzo:
//! ```bash
//! image-compressor photos/ --format webp --quality 0.7 --open
//! ```

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use image_compressor::file_manager::FileManager;
use image_compressor::{
    platform, BatchCompressor, BatchSummary, CompressedFile, Config, LogNotifier, OutputFormat,
    ResultList,
};

#[derive(Parser)]
#[command(name = "image-compressor")]
#[command(about = "Batch-compress images to AVIF or WebP with bounded concurrency")]
struct Args {
    /// Image files or directories to compress
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Avif)]
    format: OutputFormat,

    /// Compression quality (0.0-1.0)
    #[arg(short, long, default_value_t = 0.8)]
    quality: f64,

    /// Maximum number of jobs in flight
    #[arg(short, long, default_value_t = image_compressor::config::DEFAULT_MAX_CONCURRENT)]
    concurrency: usize,

    /// Base directory for output (default: desktop)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print results and summary as JSON
    #[arg(long)]
    json: bool,

    /// Open the output folder when the batch finishes
    #[arg(long)]
    open: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a BatchSummary,
    files: &'a [CompressedFile],
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Expand directories into their image files; plain files pass through
    // and the pipeline's own extension filter decides their fate
    let mut paths = Vec::new();
    for input in &args.inputs {
        if !input.exists() {
            return Err(anyhow::anyhow!("Input does not exist: {}", input.display()));
        }
        if input.is_dir() {
            paths.extend(FileManager::find_image_files(input));
        } else {
            paths.push(input.clone());
        }
    }

    let config = Config {
        format: args.format,
        quality: args.quality,
        max_concurrent: args.concurrency,
        output_base: args.output.clone(),
    };

    let compressor = BatchCompressor::new(config)?;
    let mut results = ResultList::new();
    let summary = compressor.run(&paths, &mut results, &LogNotifier).await?;

    if args.json {
        let report = JsonReport {
            summary: &summary,
            files: results.files(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for file in results.files() {
            println!(
                "{}  {} -> {} ({}% saved)  {}",
                file.filename,
                FileManager::format_size(file.original_size),
                FileManager::format_size(file.compressed_size),
                file.savings_percent(),
                file.output_path.display()
            );
        }
        println!("{}", summary.message());
    }

    if args.open {
        platform::open_output_folder(args.format, args.output.as_deref());
    }

    Ok(())
}
