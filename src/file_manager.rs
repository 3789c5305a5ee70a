//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e il filtro degli input.
//!
//! ## Responsabilità:
//! - Probe della dimensione in byte di un file (unica fonte di dimensioni
//!   della pipeline, mai stimata)
//! - Filtro degli input alle sole estensioni immagine supportate
//! - Discovery ricorsiva di immagini in directory
//! - Formattazione human-readable delle dimensioni (anche negative)
//!
//! ## Formati di input supportati:
//! JPG, JPEG, PNG, HEIC, HEIF, WebP, TIFF, BMP, GIF (case-insensitive)

use crate::error::CompressError;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Input extensions accepted by the pipeline (lowercase)
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "heic", "heif", "webp", "tiff", "bmp", "gif",
];

/// Manages file operations and input discovery
pub struct FileManager;

impl FileManager {
    /// Get the byte length of a file
    pub async fn file_size(path: &Path) -> Result<u64, CompressError> {
        let metadata = fs::metadata(path).await.map_err(CompressError::Probe)?;
        Ok(metadata.len())
    }

    /// Check if a path has a supported image extension
    pub fn is_supported_input(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            SUPPORTED_INPUT_EXTENSIONS.contains(&ext_lower.as_str())
        } else {
            false
        }
    }

    /// Keep only the paths with a supported image extension
    pub fn filter_supported(paths: &[PathBuf]) -> Vec<PathBuf> {
        paths
            .iter()
            .filter(|p| Self::is_supported_input(p))
            .cloned()
            .collect()
    }

    /// Find all supported image files under a directory
    pub fn find_image_files(dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| Self::is_supported_input(p))
            .collect()
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Format a possibly-negative byte delta (compression can inflate files)
    pub fn format_signed_size(size: i64) -> String {
        if size < 0 {
            format!("-{}", Self::format_size(size.unsigned_abs()))
        } else {
            Self::format_size(size as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_supported_input() {
        assert!(FileManager::is_supported_input(Path::new("/tmp/photo.jpg")));
        assert!(FileManager::is_supported_input(Path::new("/tmp/photo.JPEG")));
        assert!(FileManager::is_supported_input(Path::new("/tmp/photo.HeIc")));
        assert!(FileManager::is_supported_input(Path::new("/tmp/anim.gif")));
        assert!(!FileManager::is_supported_input(Path::new("/tmp/notes.txt")));
        assert!(!FileManager::is_supported_input(Path::new("/tmp/clip.mp4")));
        assert!(!FileManager::is_supported_input(Path::new("/tmp/noext")));
    }

    #[test]
    fn test_filter_supported() {
        let paths = vec![
            PathBuf::from("/a.png"),
            PathBuf::from("/b.txt"),
            PathBuf::from("/c.TIFF"),
        ];
        let filtered = FileManager::filter_supported(&paths);
        assert_eq!(filtered, vec![PathBuf::from("/a.png"), PathBuf::from("/c.TIFF")]);
    }

    #[test]
    fn test_find_image_files() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(temp_dir.path().join("a.png"), b"x").unwrap();
        std::fs::write(nested.join("b.jpg"), b"x").unwrap();
        std::fs::write(nested.join("c.txt"), b"x").unwrap();

        let mut found = FileManager::find_image_files(temp_dir.path());
        found.sort();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| FileManager::is_supported_input(p)));
    }

    #[tokio::test]
    async fn test_file_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");
        std::fs::write(&path, vec![0u8; 1234]).unwrap();

        let size = FileManager::file_size(&path).await.unwrap();
        assert_eq!(size, 1234);
    }

    #[tokio::test]
    async fn test_file_size_missing_file() {
        let result = FileManager::file_size(Path::new("/definitely/not/there.png")).await;
        assert!(matches!(result, Err(CompressError::Probe(_))));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(0), "0 B");
        assert_eq!(FileManager::format_size(800), "800 B");
        assert_eq!(FileManager::format_size(1536), "1.50 KB");
        assert_eq!(FileManager::format_size(1048576), "1.00 MB");
    }

    #[test]
    fn test_format_signed_size() {
        assert_eq!(FileManager::format_signed_size(800), "800 B");
        assert_eq!(FileManager::format_signed_size(-1536), "-1.50 KB");
        assert_eq!(FileManager::format_signed_size(0), "0 B");
    }
}
