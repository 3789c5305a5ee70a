//! # Notification Module
//!
//! Capability di notifica iniettabile: lo scheduler riceve un `Notifier`
//! come collaboratore, così la logica batch resta testabile senza un vero
//! sottosistema di notifiche. Eventuali errori del notifier vengono
//! assorbiti dallo scheduler e non influenzano mai il completamento.

use anyhow::Result;
use tracing::info;

/// Title used for the one-shot batch completion message
pub const NOTIFICATION_TITLE: &str = "Compression Complete";

/// Displays a one-shot summary message when a batch finishes
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> Result<()>;
}

/// Notifier that reports through the log
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        info!("🔔 {}: {}", title, body);
        Ok(())
    }
}
