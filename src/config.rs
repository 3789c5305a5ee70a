//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di compressione
//! - Fornisce validazione robusta dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `format`: Formato di output (default: avif)
//! - `quality`: Qualità di compressione (0.0-1.0, default: 0.8, nessuno
//!   step imposto dalla pipeline)
//! - `max_concurrent`: Numero massimo di job in volo (default: 10)
//! - `output_base`: Base directory di output (default: None = desktop)

use crate::formats::OutputFormat;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default cap on concurrently running jobs
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Configuration for batch image compression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output format for all jobs in the batch
    pub format: OutputFormat,
    /// Compression quality (0.0-1.0)
    pub quality: f64,
    /// Maximum number of jobs in flight at any instant
    pub max_concurrent: usize,
    /// Base directory for output (None = desktop directory)
    pub output_base: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Avif,
            quality: 0.8,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            output_base: None,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(anyhow::anyhow!("Quality must be between 0.0 and 1.0"));
        }

        if self.max_concurrent == 0 {
            return Err(anyhow::anyhow!("Max concurrent jobs must be greater than 0"));
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.quality = 1.5;
        assert!(config.validate().is_err());

        config.quality = -0.1;
        assert!(config.validate().is_err());

        // Boundary values are accepted, no step constraint
        config.quality = 0.0;
        assert!(config.validate().is_ok());
        config.quality = 1.0;
        assert!(config.validate().is_ok());
        config.quality = 0.85;
        assert!(config.validate().is_ok());

        config.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.format, OutputFormat::Avif);
        assert_eq!(config.quality, 0.8);
        assert_eq!(config.max_concurrent, 10);
        assert!(config.output_base.is_none());
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            format: OutputFormat::Webp,
            quality: 0.65,
            max_concurrent: 4,
            output_base: Some(temp_dir.path().to_path_buf()),
        };

        // Save config
        original_config.save_to_file(&config_path).await.unwrap();

        // Load config
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.format, OutputFormat::Webp);
        assert_eq!(loaded_config.quality, 0.65);
        assert_eq!(loaded_config.max_concurrent, 4);
        assert_eq!(loaded_config.output_base, Some(temp_dir.path().to_path_buf()));
    }

    #[tokio::test]
    async fn test_config_from_missing_file_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nope.json");

        let config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
    }
}
