//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `CompressError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `DirectoryCreation`: Impossibile risolvere/creare la directory di output
//!   (fatale per l'intero batch, nessun job viene avviato)
//! - `Probe`: Lettura dimensione file fallita
//! - `Decode`: Decodifica immagine fallita (file corrotto o non supportato)
//! - `BitmapConversion`: Conversione a bitmap per l'encoder fallita
//! - `Encode`: Encoding o scrittura del file di output fallita
//!
//! Gli errori per-job non bloccano mai il batch: vengono assorbiti al confine
//! del compressore singolo e il file risulta semplicemente assente dai risultati.

/// Custom error types for the compression pipeline
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("Failed to create output directory: {0}")]
    DirectoryCreation(String),

    #[error("Failed to read file size: {0}")]
    Probe(#[source] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to create bitmap representation: {0}")]
    BitmapConversion(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl CompressError {
    /// Whether this error aborts the whole batch before any job runs
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, CompressError::DirectoryCreation(_))
    }
}
