//! # Output Location Resolver Module
//!
//! Risolve e crea la directory di destinazione per un formato:
//! `<base>/Compressed Images/<nome formato>`, dove la base è la directory
//! desktop dell'utente oppure un override configurato.
//!
//! Un fallimento qui è fatale per l'intero batch: nessun job viene avviato.

use crate::error::CompressError;
use crate::formats::OutputFormat;
use std::path::{Path, PathBuf};

/// Folder created under the base location
pub const OUTPUT_FOLDER_NAME: &str = "Compressed Images";

/// Compute the output directory path for a format without creating it
pub fn output_dir_path(
    format: OutputFormat,
    base_override: Option<&Path>,
) -> Result<PathBuf, CompressError> {
    let base = match base_override {
        Some(base) => base.to_path_buf(),
        None => dirs::desktop_dir().ok_or_else(|| {
            CompressError::DirectoryCreation("could not resolve desktop directory".to_string())
        })?,
    };

    Ok(base.join(OUTPUT_FOLDER_NAME).join(format.name()))
}

/// Resolve the output directory for a format, creating it (and parents) if
/// absent. Idempotent when the directory already exists.
pub async fn resolve_output_dir(
    format: OutputFormat,
    base_override: Option<&Path>,
) -> Result<PathBuf, CompressError> {
    let dir = output_dir_path(format, base_override)?;

    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        CompressError::DirectoryCreation(format!("{}: {}", dir.display(), e))
    })?;

    Ok(dir)
}
