//! # Image Compressor Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom per le diverse fasi di compressione
//! - `formats`: Catalogo dei formati di output (AVIF/WebP)
//! - `file_manager`: Probe dimensioni file, filtro input, formattazione byte
//! - `codec`: Strategie di encoding intercambiabili per formato
//! - `compressor`: Pipeline di compressione per singolo file
//! - `scheduler`: Scheduler con concorrenza limitata e aggregazione risultati
//! - `results`: Record dei file compressi, sink risultati, riepilogo batch
//! - `notify`: Capability di notifica iniettabile
//! - `output_dir`: Risoluzione e creazione della directory di output
//! - `platform`: Apertura cartelle/file via shell di sistema
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use image_compressor::{BatchCompressor, Config, LogNotifier, ResultList};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default();
//! let compressor = BatchCompressor::new(config)?;
//! let mut results = ResultList::new();
//! let _summary = compressor.run(&[], &mut results, &LogNotifier).await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod compressor;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod formats;
pub mod notify;
pub mod output_dir;
pub mod platform;
pub mod results;
pub mod scheduler;

pub use config::Config;
pub use error::CompressError;
pub use formats::OutputFormat;
pub use notify::{LogNotifier, Notifier};
pub use results::{BatchSummary, CompressedFile, ResultList, ResultSink};
pub use scheduler::BatchCompressor;
