//! # Codec Strategies Module
//!
//! Questo modulo definisce le strategie di encoding intercambiabili.
//!
//! ## Responsabilità:
//! - Definisce il trait `CodecStrategy` con un'unica capability:
//!   `encode(bitmap, dest, quality)`
//! - Implementa la strategia WebP (encoder lossy guidato dalla qualità)
//! - Implementa la strategia AVIF (encoder con speed/quality)
//!
//! ## Contratto:
//! - Successo: il file viene scritto al path di destinazione
//! - Fallimento: nessun file viene scritto (l'encoding avviene prima in un
//!   buffer in memoria, la scrittura su disco solo a encoding riuscito)
//!
//! La qualità arriva come f64 in [0.0, 1.0] e viene mappata sulla scala
//! intera 1-100 degli encoder.

use crate::error::CompressError;
use image::codecs::avif::AvifEncoder;
use image::codecs::webp::{WebPEncoder, WebPQuality};
use image::{ColorType, ImageEncoder, RgbaImage};
use std::path::Path;

/// AVIF encoder speed (0 = slowest/best, 10 = fastest)
const AVIF_SPEED: u8 = 8;

/// A single interchangeable encode operation
pub trait CodecStrategy: Send + Sync {
    /// Encode `bitmap` to `dest` at the given quality.
    ///
    /// On failure nothing is written at `dest`.
    fn encode(&self, bitmap: &RgbaImage, dest: &Path, quality: f64) -> Result<(), CompressError>;
}

/// Lossy-quality WebP encoding
pub struct WebpCodec;

/// AVIF encoding via the AV1 still-image path
pub struct AvifCodec;

/// Map a [0.0, 1.0] quality to the encoders' 1-100 integer scale
pub(crate) fn quality_to_scale(quality: f64) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

impl CodecStrategy for WebpCodec {
    fn encode(&self, bitmap: &RgbaImage, dest: &Path, quality: f64) -> Result<(), CompressError> {
        let mut buffer = Vec::new();
        let encoder =
            WebPEncoder::new_with_quality(&mut buffer, WebPQuality::lossy(quality_to_scale(quality)));
        encoder
            .encode(
                bitmap.as_raw(),
                bitmap.width(),
                bitmap.height(),
                ColorType::Rgba8,
            )
            .map_err(|e| CompressError::Encode(e.to_string()))?;

        if buffer.is_empty() {
            return Err(CompressError::Encode("encoder produced no data".to_string()));
        }

        std::fs::write(dest, &buffer).map_err(|e| CompressError::Encode(e.to_string()))
    }
}

impl CodecStrategy for AvifCodec {
    fn encode(&self, bitmap: &RgbaImage, dest: &Path, quality: f64) -> Result<(), CompressError> {
        let mut buffer = Vec::new();
        let encoder =
            AvifEncoder::new_with_speed_quality(&mut buffer, AVIF_SPEED, quality_to_scale(quality));
        encoder
            .write_image(
                bitmap.as_raw(),
                bitmap.width(),
                bitmap.height(),
                ColorType::Rgba8,
            )
            .map_err(|e| CompressError::Encode(e.to_string()))?;

        if buffer.is_empty() {
            return Err(CompressError::Encode("encoder produced no data".to_string()));
        }

        std::fs::write(dest, &buffer).map_err(|e| CompressError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    fn test_bitmap() -> RgbaImage {
        RgbaImage::from_pixel(8, 8, Rgba([180, 40, 220, 255]))
    }

    #[test]
    fn test_quality_to_scale() {
        assert_eq!(quality_to_scale(1.0), 100);
        assert_eq!(quality_to_scale(0.8), 80);
        assert_eq!(quality_to_scale(0.0), 1);
        // Out-of-range values are clamped, not rejected
        assert_eq!(quality_to_scale(2.0), 100);
        assert_eq!(quality_to_scale(-0.5), 1);
    }

    #[test]
    fn test_webp_encode_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out.webp");

        WebpCodec.encode(&test_bitmap(), &dest, 0.8).unwrap();

        let written = std::fs::read(&dest).unwrap();
        assert!(!written.is_empty());
        // RIFF container magic
        assert_eq!(&written[0..4], b"RIFF");
    }

    #[test]
    fn test_avif_encode_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out.avif");

        AvifCodec.encode(&test_bitmap(), &dest, 0.5).unwrap();

        let written = std::fs::read(&dest).unwrap();
        assert!(!written.is_empty());
    }

    #[test]
    fn test_webp_encode_failure_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("missing-parent").join("out.webp");

        let result = WebpCodec.encode(&test_bitmap(), &dest, 0.8);
        assert!(result.is_err());
        assert!(!dest.exists());
    }
}
