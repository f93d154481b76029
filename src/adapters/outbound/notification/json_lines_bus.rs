use crate::portfolio_analysis::domain::Notification;
use crate::ports::outbound::NotificationBus;
use crate::shared::Result;
use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// JsonLinesNotificationBus writes each notification as one JSON object per
/// line to any writer (stdout or the `--output` file).
///
/// Dispatch cannot fail from the caller's point of view; write errors are
/// logged and counted, and [`flush`](Self::flush) reports whether any
/// occurred.
pub struct JsonLinesNotificationBus<W> {
    writer: Mutex<W>,
    written: AtomicU64,
    failed: AtomicU64,
}

impl JsonLinesNotificationBus<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonLinesNotificationBus<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            written: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error if flushing fails or if any earlier write failed.
    pub fn flush(&self) -> Result<()> {
        self.writer()
            .flush()
            .map_err(|e| anyhow::anyhow!("Failed to flush notification output: {}", e))?;
        let failed = self.failed.load(Ordering::Relaxed);
        if failed > 0 {
            anyhow::bail!("{} notification(s) could not be written", failed);
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn writer(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_line(&self, notification: &Notification) -> Result<()> {
        let line = serde_json::to_string(notification)?;
        let mut writer = self.writer();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> NotificationBus for JsonLinesNotificationBus<W> {
    async fn dispatch(&self, notification: Notification) {
        match self.write_line(&notification) {
            Ok(()) => {
                self.written.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    notification_id = %notification.id(),
                    error = %e,
                    "Failed to write notification"
                );
            }
        }
    }
}
