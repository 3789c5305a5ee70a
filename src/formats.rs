//! # Output Format Catalog Module
//!
//! Questo modulo definisce il catalogo dei formati di output supportati.
//!
//! ## Responsabilità:
//! - Definisce l'enum `OutputFormat` (AVIF, WebP)
//! - Espone i metadati statici per formato: estensione canonica e
//!   identificatore del tipo di destinazione
//! - Seleziona la strategia di encoding appropriata per ogni formato
//!
//! La selezione della strategia è una funzione pura della variante: aggiungere
//! un formato significa aggiungere una variante qui e una strategia in `codec`,
//! senza branching altrove.

use crate::codec::{AvifCodec, CodecStrategy, WebpCodec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported output formats for compressed images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Avif,
    Webp,
}

impl OutputFormat {
    /// Canonical lowercase name, also used as the output folder name
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Avif => "avif",
            OutputFormat::Webp => "webp",
        }
    }

    /// File extension for compressed output files
    pub fn extension(&self) -> &'static str {
        self.name()
    }

    /// Destination codec type identifier (UTI-style).
    ///
    /// Catalog metadata: the in-process encoders select themselves by
    /// variant and don't read this, but backends that address codecs by
    /// type identifier (e.g. an image-destination API) would.
    pub fn codec_type(&self) -> &'static str {
        match self {
            OutputFormat::Avif => "public.avif",
            OutputFormat::Webp => "org.webmproject.webp",
        }
    }

    /// Uppercase name for display purposes
    pub fn display_name(&self) -> String {
        self.name().to_uppercase()
    }

    /// The encode strategy for this format
    pub fn strategy(&self) -> &'static dyn CodecStrategy {
        match self {
            OutputFormat::Avif => &AvifCodec,
            OutputFormat::Webp => &WebpCodec,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metadata() {
        assert_eq!(OutputFormat::Avif.extension(), "avif");
        assert_eq!(OutputFormat::Webp.extension(), "webp");
        assert_eq!(OutputFormat::Avif.codec_type(), "public.avif");
        assert_eq!(OutputFormat::Webp.codec_type(), "org.webmproject.webp");
    }

    #[test]
    fn test_display() {
        assert_eq!(OutputFormat::Avif.to_string(), "avif");
        assert_eq!(OutputFormat::Webp.display_name(), "WEBP");
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&OutputFormat::Webp).unwrap();
        assert_eq!(json, "\"webp\"");
        let format: OutputFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(format, OutputFormat::Webp);
    }
}
