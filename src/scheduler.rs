//! # Bounded Scheduler Module
//!
//! Questo è il modulo principale che orchestra il processo di compressione.
//!
//! ## Responsabilità:
//! - Risoluzione della directory di output prima di ogni job (fatale se fallisce)
//! - Filtro degli input alle sole estensioni supportate
//! - Ammissione a finestra scorrevole: al massimo `max_concurrent` job in volo,
//!   un nuovo job entra appena uno in volo termina
//! - Raccolta degli esiti in ordine di completamento (non di sottomissione)
//! - Aggregazione dei totali e notifica one-shot a fine batch
//!
//! ## Gestione concorrenza:
//! - Un `Semaphore` limita i job in volo; i worker eseguono il compressore
//!   singolo in modo indipendente e non comunicano tra loro
//! - Tutti gli esiti confluiscono in un unico canale mpsc, drenato da un solo
//!   punto di coordinamento: il sink e i contatori aggregati vengono aggiornati
//!   esclusivamente lì, senza lock condivisi tra i worker
//!
//! ## Error handling:
//! - Errori per singolo file non bloccano il batch e non producono risultati
//! - L'errore del notifier viene assorbito e non influenza il completamento
//! - Solo la risoluzione della directory di output è fatale per il batch

use crate::compressor;
use crate::config::Config;
use crate::file_manager::FileManager;
use crate::formats::OutputFormat;
use crate::notify::{Notifier, NOTIFICATION_TITLE};
use crate::output_dir;
use crate::results::{BatchSummary, CompressedFile, ResultSink};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info};

/// Batch compression orchestrator
pub struct BatchCompressor {
    config: Config,
}

impl BatchCompressor {
    /// Create a new batch compressor with a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the compression pipeline over a list of input paths.
    ///
    /// Completed results are appended to `sink` as they arrive, in completion
    /// order. When at least one job completed, `notifier` fires exactly once
    /// with the batch summary.
    pub async fn run(
        &self,
        paths: &[PathBuf],
        sink: &mut dyn ResultSink,
        notifier: &dyn Notifier,
    ) -> Result<BatchSummary> {
        self.run_with(paths, sink, notifier, |path, output_dir, format, quality| async move {
            compressor::compress_single_image(&path, &output_dir, format, quality).await
        })
        .await
    }

    /// Scheduling loop with the per-file operation injected, so tests can
    /// observe admission behavior without touching real images
    async fn run_with<J, Fut>(
        &self,
        paths: &[PathBuf],
        sink: &mut dyn ResultSink,
        notifier: &dyn Notifier,
        job: J,
    ) -> Result<BatchSummary>
    where
        J: Fn(PathBuf, PathBuf, OutputFormat, f64) -> Fut + Clone + Send + 'static,
        Fut: std::future::Future<Output = Option<CompressedFile>> + Send + 'static,
    {
        let format = self.config.format;
        let quality = self.config.quality;

        // Resolved (and created) before any job is admitted; failure here
        // aborts the whole batch with zero results
        let output_dir =
            output_dir::resolve_output_dir(format, self.config.output_base.as_deref()).await?;

        let files = FileManager::filter_supported(paths);
        let dropped = paths.len() - files.len();

        info!("🎯 Format: {} (quality: {})", format.display_name(), quality);
        info!("📁 Output directory: {}", output_dir.display());
        info!("Found {} supported images to compress ({} unsupported dropped)", files.len(), dropped);

        let mut summary = BatchSummary::new();
        if files.is_empty() {
            info!("No supported image files to compress");
            return Ok(summary);
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let (tx, mut rx) = mpsc::channel::<Option<CompressedFile>>(self.config.max_concurrent);

        // Sliding-window admission: the next job enters only when a permit
        // frees up, keeping the in-flight count at the cap until the list
        // is exhausted
        let admission = tokio::spawn(async move {
            for path in files {
                let Ok(permit) = semaphore.clone().acquire_owned().await else {
                    break;
                };
                let tx = tx.clone();
                let output_dir = output_dir.clone();
                let job = job.clone();

                tokio::spawn(async move {
                    let _permit = permit;
                    let outcome = job(path, output_dir, format, quality).await;
                    let _ = tx.send(outcome).await;
                });
            }
        });

        // Single coordinating point: every completion (including "no result")
        // funnels through here, so the sink and the aggregate counters are
        // only ever touched from this task
        while let Some(outcome) = rx.recv().await {
            if let Some(file) = outcome {
                summary.record(&file);
                sink.push(file);
            }
        }

        admission.await?;

        info!("=== Compression Complete ===");
        info!("Images compressed: {}", summary.completed);
        info!("Bytes saved: {}", FileManager::format_signed_size(summary.total_saved));

        if summary.completed > 0 {
            // Notifier failures never affect batch completion
            if let Err(e) = notifier.notify(NOTIFICATION_TITLE, &summary.message()) {
                debug!("Notifier failed: {}", e);
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ResultList;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Notifier that records every message it receives
    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, _title: &str, body: &str) -> Result<()> {
            self.messages.lock().unwrap().push(body.to_string());
            Ok(())
        }
    }

    /// Notifier that always fails, to prove failures are swallowed
    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify(&self, _title: &str, _body: &str) -> Result<()> {
            Err(anyhow::anyhow!("notification center unavailable"))
        }
    }

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, Rgba([200, 90, 30, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, Rgb([30, 90, 200]))
            .save(&path)
            .unwrap();
        path
    }

    fn webp_config(base: &Path) -> Config {
        Config {
            format: OutputFormat::Webp,
            quality: 0.8,
            max_concurrent: 10,
            output_base: Some(base.to_path_buf()),
        }
    }

    #[tokio::test]
    async fn test_batch_filters_and_aggregates() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_png(temp_dir.path(), "a.png", 16, 16);
        let b = write_jpeg(temp_dir.path(), "b.jpg", 16, 16);
        let c = temp_dir.path().join("c.txt");
        std::fs::write(&c, b"not an image").unwrap();

        let out_base = temp_dir.path().join("out");
        let compressor = BatchCompressor::new(webp_config(&out_base)).unwrap();
        let mut results = ResultList::new();
        let notifier = RecordingNotifier::default();

        let summary = compressor
            .run(&[a, b, c], &mut results, &notifier)
            .await
            .unwrap();

        // c.txt is dropped before scheduling, never counted
        assert_eq!(summary.completed, 2);
        assert_eq!(results.len(), 2);
        let mut names: Vec<_> = results.files().iter().map(|f| f.filename.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["a.png", "b.jpg"]);

        // Cumulative saved equals the per-result sum, regardless of order
        assert_eq!(summary.total_saved, results.total_saved_bytes());

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("2 images compressed. Saved "));
    }

    #[tokio::test]
    async fn test_singular_notification() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_png(temp_dir.path(), "only.png", 8, 8);

        let out_base = temp_dir.path().join("out");
        let compressor = BatchCompressor::new(webp_config(&out_base)).unwrap();
        let mut results = ResultList::new();
        let notifier = RecordingNotifier::default();

        let summary = compressor.run(&[a], &mut results, &notifier).await.unwrap();

        assert_eq!(summary.completed, 1);
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("1 image compressed."));
    }

    #[tokio::test]
    async fn test_no_notification_for_empty_batch() {
        let temp_dir = TempDir::new().unwrap();
        let doc = temp_dir.path().join("doc.pdf");
        std::fs::write(&doc, b"%PDF").unwrap();

        let out_base = temp_dir.path().join("out");
        let compressor = BatchCompressor::new(webp_config(&out_base)).unwrap();
        let mut results = ResultList::new();
        let notifier = RecordingNotifier::default();

        let summary = compressor.run(&[doc], &mut results, &notifier).await.unwrap();

        assert_eq!(summary.completed, 0);
        assert!(results.is_empty());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_failed_job_silently_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let mut inputs = Vec::new();
        for i in 0..4 {
            inputs.push(write_png(temp_dir.path(), &format!("ok{}.png", i), 8, 8));
        }
        let corrupt = temp_dir.path().join("broken.png");
        std::fs::write(&corrupt, b"garbage bytes").unwrap();
        inputs.push(corrupt);

        let out_base = temp_dir.path().join("out");
        let compressor = BatchCompressor::new(webp_config(&out_base)).unwrap();
        let mut results = ResultList::new();
        let notifier = RecordingNotifier::default();

        let summary = compressor.run(&inputs, &mut results, &notifier).await.unwrap();

        // The failed input produces no entry and no error record
        assert_eq!(summary.completed, 4);
        assert_eq!(results.len(), 4);
        assert!(results.files().iter().all(|f| f.filename != "broken.png"));
    }

    #[tokio::test]
    async fn test_colliding_basenames_overwrite_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_png(temp_dir.path(), "x.png", 16, 16);
        let b = write_jpeg(temp_dir.path(), "x.jpeg", 8, 8);

        let out_base = temp_dir.path().join("out");
        let compressor = BatchCompressor::new(webp_config(&out_base)).unwrap();
        let mut results = ResultList::new();
        let notifier = RecordingNotifier::default();

        let summary = compressor.run(&[a, b], &mut results, &notifier).await.unwrap();

        // Both jobs succeed and measure sizes independently...
        assert_eq!(summary.completed, 2);
        assert_eq!(results.len(), 2);

        // ...but the destination holds a single file, the one written last
        let out_dir = out_base.join("Compressed Images").join("webp");
        let entries: Vec<_> = std::fs::read_dir(&out_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name(), "x.webp");
    }

    #[tokio::test]
    async fn test_sliding_window_drains_long_list() {
        let temp_dir = TempDir::new().unwrap();
        let inputs: Vec<_> = (0..25)
            .map(|i| write_png(temp_dir.path(), &format!("img{:02}.png", i), 4, 4))
            .collect();

        let out_base = temp_dir.path().join("out");
        let mut config = webp_config(&out_base);
        config.max_concurrent = 3;
        let compressor = BatchCompressor::new(config).unwrap();
        let mut results = ResultList::new();
        let notifier = RecordingNotifier::default();

        let summary = compressor.run(&inputs, &mut results, &notifier).await.unwrap();

        // Total work performed equals the number of filtered inputs
        assert_eq!(summary.completed, 25);
        assert_eq!(results.len(), 25);
    }

    #[tokio::test]
    async fn test_in_flight_jobs_never_exceed_cap() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::time::Duration;

        let temp_dir = TempDir::new().unwrap();
        let out_base = temp_dir.path().join("out");
        let mut config = webp_config(&out_base);
        config.max_concurrent = 5;
        let compressor = BatchCompressor::new(config).unwrap();

        // Paths only need to pass the extension filter, the stub job below
        // never touches the filesystem
        let inputs: Vec<_> = (0..30)
            .map(|i| temp_dir.path().join(format!("img{:02}.png", i)))
            .collect();

        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let job = {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            move |path: PathBuf, _output_dir: PathBuf, _format: OutputFormat, _quality: f64| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                async move {
                    let running = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(running, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);

                    let filename = path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .into_owned();
                    Some(CompressedFile::new(filename, 1000, 400, path))
                }
            }
        };

        let mut results = ResultList::new();
        let notifier = RecordingNotifier::default();
        let summary = compressor
            .run_with(&inputs, &mut results, &notifier, job)
            .await
            .unwrap();

        // Every job ran, and the window filled to the cap without ever
        // exceeding it
        assert_eq!(summary.completed, 30);
        assert_eq!(results.len(), 30);
        assert_eq!(peak.load(Ordering::SeqCst), 5);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_notifier_failure_is_swallowed() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_png(temp_dir.path(), "a.png", 8, 8);

        let out_base = temp_dir.path().join("out");
        let compressor = BatchCompressor::new(webp_config(&out_base)).unwrap();
        let mut results = ResultList::new();

        let summary = compressor.run(&[a], &mut results, &FailingNotifier).await.unwrap();
        assert_eq!(summary.completed, 1);
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_directory_failure_aborts_batch() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_png(temp_dir.path(), "a.png", 8, 8);

        // Base path is a regular file, directory creation must fail
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"in the way").unwrap();

        let compressor = BatchCompressor::new(webp_config(&blocker)).unwrap();
        let mut results = ResultList::new();
        let notifier = RecordingNotifier::default();

        let result = compressor.run(&[a], &mut results, &notifier).await;

        assert!(result.is_err());
        assert!(results.is_empty());
        assert!(notifier.messages().is_empty());
    }
}
