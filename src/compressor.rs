//! # Single-File Compressor Module
//!
//! Questo modulo implementa il ciclo di vita completo di un singolo job.
//!
//! ## Pipeline per file (strettamente sequenziale):
//! 1. Probe dimensione originale
//! 2. Decodifica in immagine in-memory
//! 3. Conversione a bitmap RGBA per l'encoder
//! 4. Calcolo path di output (`<stem>.<estensione formato>`)
//! 5. Encoding tramite la strategia del formato
//! 6. Probe dimensione compressa
//! 7. Emissione del record `CompressedFile`
//!
//! Ogni fase corto-circuita a "nessun risultato" in caso di errore: nessun
//! retry, un singolo fallimento è definitivo per quel job. L'errore resta
//! disponibile internamente (`compress_image`) per logging e test, ma il
//! confine del job (`compress_single_image`) lo assorbe.
//!
//! Nota: nessuna prevenzione delle collisioni sul nome di output. Due input
//! che mappano sullo stesso filename sovrascrivono silenziosamente lo stesso
//! file su disco; entrambi i job producono comunque un risultato.

use crate::error::CompressError;
use crate::file_manager::FileManager;
use crate::formats::OutputFormat;
use crate::results::CompressedFile;
use std::path::Path;
use tracing::debug;

/// Compress one image, yielding a result or nothing.
///
/// Job-level failures never escalate: they are logged and swallowed here,
/// manifesting only as an absent entry in the result stream.
pub async fn compress_single_image(
    path: &Path,
    output_dir: &Path,
    format: OutputFormat,
    quality: f64,
) -> Option<CompressedFile> {
    match compress_image(path, output_dir, format, quality).await {
        Ok(file) => {
            debug!(
                "✅ {}: {} -> {} ({}% saved)",
                file.filename,
                FileManager::format_size(file.original_size),
                FileManager::format_size(file.compressed_size),
                file.savings_percent()
            );
            Some(file)
        }
        Err(e) => {
            debug!("❌ {}: {}", path.display(), e);
            None
        }
    }
}

/// Run the full per-file pipeline, keeping the failure reason
pub async fn compress_image(
    path: &Path,
    output_dir: &Path,
    format: OutputFormat,
    quality: f64,
) -> Result<CompressedFile, CompressError> {
    let original_size = FileManager::file_size(path).await?;

    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let stem = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let output_path = output_dir.join(format!("{}.{}", stem, format.extension()));

    // Decode and encode are CPU-bound, keep them off the async runtime
    let input = path.to_path_buf();
    let dest = output_path.clone();
    let encoded = tokio::task::spawn_blocking(move || -> Result<(), CompressError> {
        let decoded = image::open(&input).map_err(CompressError::Decode)?;

        let bitmap = decoded.to_rgba8();
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(CompressError::BitmapConversion(
                "image has zero pixel dimensions".to_string(),
            ));
        }

        format.strategy().encode(&bitmap, &dest, quality)
    })
    .await;

    match encoded {
        Ok(result) => result?,
        Err(e) => return Err(CompressError::Encode(format!("encode task failed: {}", e))),
    }

    let compressed_size = FileManager::file_size(&output_path).await?;

    Ok(CompressedFile::new(
        filename,
        original_size,
        compressed_size,
        output_path,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, Rgba([10, 200, 120, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[tokio::test]
    async fn test_compress_single_image_success() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_png(temp_dir.path(), "photo.png", 16, 16);
        let output_dir = temp_dir.path().join("out");
        std::fs::create_dir(&output_dir).unwrap();

        let file = compress_single_image(&input, &output_dir, OutputFormat::Webp, 0.8)
            .await
            .expect("job should succeed");

        assert_eq!(file.filename, "photo.png");
        assert_eq!(file.output_path, output_dir.join("photo.webp"));
        assert!(file.output_path.is_file());
        assert!(file.original_size > 0);
        assert!(file.compressed_size > 0);
        assert_eq!(
            file.compressed_size,
            std::fs::metadata(&file.output_path).unwrap().len()
        );
    }

    #[tokio::test]
    async fn test_missing_input_yields_no_result() {
        let temp_dir = TempDir::new().unwrap();
        let result = compress_single_image(
            &temp_dir.path().join("ghost.png"),
            temp_dir.path(),
            OutputFormat::Webp,
            0.8,
        )
        .await;

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_input_yields_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("corrupt.png");
        std::fs::write(&input, b"definitely not a png").unwrap();

        let err = compress_image(&input, temp_dir.path(), OutputFormat::Webp, 0.8)
            .await
            .unwrap_err();
        assert!(matches!(err, CompressError::Decode(_)));

        // Nothing written for a failed job
        assert!(!temp_dir.path().join("corrupt.webp").exists());
    }

    #[tokio::test]
    async fn test_output_filename_replaces_extension() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_png(temp_dir.path(), "snapshot.2024.png", 8, 8);

        let file = compress_single_image(&input, temp_dir.path(), OutputFormat::Webp, 0.5)
            .await
            .unwrap();

        // Only the final extension is replaced
        assert!(file.output_path.ends_with("snapshot.2024.webp"));
        assert_eq!(file.filename, "snapshot.2024.png");
    }
}
