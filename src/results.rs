//! # Results and Aggregation Module
//!
//! Questo modulo definisce i record dei file compressi e l'aggregazione batch.
//!
//! ## Responsabilità:
//! - `CompressedFile`: record immutabile di un job completato con successo
//! - `BatchSummary`: totali aggregati di una singola invocazione della pipeline
//! - `ResultSink`: astrazione del collettore risultati (inserimento in testa)
//! - `ResultList`: implementazione in-memory del sink
//!
//! Ogni `CompressedFile` corrisponde a un job in cui tutte le fasi sono
//! riuscite; i job falliti non producono alcun record.

use crate::file_manager::FileManager;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// One successfully compressed image
#[derive(Debug, Clone, Serialize)]
pub struct CompressedFile {
    pub id: Uuid,
    /// Input basename, extension included
    pub filename: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub output_path: PathBuf,
}

impl CompressedFile {
    pub fn new(
        filename: String,
        original_size: u64,
        compressed_size: u64,
        output_path: PathBuf,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            original_size,
            compressed_size,
            output_path,
        }
    }

    /// Bytes saved by compression (negative if the output grew)
    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.compressed_size as i64
    }

    /// Integer percentage saved, 0 for empty originals
    pub fn savings_percent(&self) -> i64 {
        if self.original_size == 0 {
            return 0;
        }
        (self.saved_bytes() as f64 / self.original_size as f64 * 100.0) as i64
    }

    /// Human-readable saved-bytes string
    pub fn formatted_saved_bytes(&self) -> String {
        FileManager::format_signed_size(self.saved_bytes())
    }
}

/// Aggregate totals for one batch invocation
#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchSummary {
    /// Jobs that completed successfully
    pub completed: usize,
    /// Cumulative bytes saved across completed jobs (may be negative)
    pub total_saved: i64,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful completion
    pub fn record(&mut self, file: &CompressedFile) {
        self.completed += 1;
        self.total_saved += file.saved_bytes();
    }

    /// Human-readable completion message, singular/plural aware
    pub fn message(&self) -> String {
        format!(
            "{} image{} compressed. Saved {}.",
            self.completed,
            if self.completed == 1 { "" } else { "s" },
            FileManager::format_signed_size(self.total_saved)
        )
    }
}

/// Receives completed results, called from the single coordinating point
pub trait ResultSink: Send {
    /// Append one result; newest results come first
    fn push(&mut self, file: CompressedFile);
}

/// In-memory result collection, newest first
#[derive(Debug, Default)]
pub struct ResultList {
    files: Vec<CompressedFile>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results in insertion order, most recent first
    pub fn files(&self) -> &[CompressedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_saved_bytes(&self) -> i64 {
        self.files.iter().map(|f| f.saved_bytes()).sum()
    }

    pub fn formatted_total_saved(&self) -> String {
        FileManager::format_signed_size(self.total_saved_bytes())
    }
}

impl ResultSink for ResultList {
    fn push(&mut self, file: CompressedFile) {
        self.files.insert(0, file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, original: u64, compressed: u64) -> CompressedFile {
        CompressedFile::new(
            name.to_string(),
            original,
            compressed,
            PathBuf::from("/out").join(name),
        )
    }

    #[test]
    fn test_saved_bytes_can_be_negative() {
        let f = file("grown.webp", 100, 250);
        assert_eq!(f.saved_bytes(), -150);
        assert_eq!(f.formatted_saved_bytes(), "-150 B");
    }

    #[test]
    fn test_savings_percent() {
        let f = file("a.webp", 1000, 400);
        assert_eq!(f.savings_percent(), 60);

        let empty = file("empty.webp", 0, 10);
        assert_eq!(empty.savings_percent(), 0);
    }

    #[test]
    fn test_unique_ids() {
        let a = file("a.webp", 10, 5);
        let b = file("a.webp", 10, 5);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_summary_message_singular_plural() {
        let mut summary = BatchSummary::new();
        summary.record(&file("a.webp", 1000, 400));
        assert_eq!(summary.message(), "1 image compressed. Saved 600 B.");

        summary.record(&file("b.webp", 2000, 1800));
        assert_eq!(summary.message(), "2 images compressed. Saved 800 B.");
    }

    #[test]
    fn test_summary_negative_total() {
        let mut summary = BatchSummary::new();
        summary.record(&file("a.webp", 100, 2148));
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.total_saved, -2048);
        assert_eq!(summary.message(), "1 image compressed. Saved -2.00 KB.");
    }

    #[test]
    fn test_result_list_inserts_at_front() {
        let mut list = ResultList::new();
        list.push(file("first.webp", 1000, 400));
        list.push(file("second.webp", 2000, 1800));

        assert_eq!(list.len(), 2);
        assert_eq!(list.files()[0].filename, "second.webp");
        assert_eq!(list.files()[1].filename, "first.webp");
        assert_eq!(list.total_saved_bytes(), 800);
        assert_eq!(list.formatted_total_saved(), "800 B");
    }
}
