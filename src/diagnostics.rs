//! Failure diagnostics capture
//!
//! Fixed policy: every failure is paired with a state snapshot at the point
//! of failure so scenario breakage stays debuggable post-hoc. Capture errors
//! are logged and swallowed - they must never mask the primary failure.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::session::ChatSession;

/// Destination for diagnostic state snapshots
#[async_trait]
pub trait DiagnosticsSink: Send + Sync {
    /// Capture the current page state under `label`, returning where it went
    async fn capture(&self, label: &str) -> Result<PathBuf>;
}

/// Screenshot-backed sink writing PNGs into a directory
pub struct ScreenshotSink {
    session: Arc<ChatSession>,
    dir: PathBuf,
}

impl ScreenshotSink {
    pub fn new(session: Arc<ChatSession>, dir: impl Into<PathBuf>) -> Self {
        ScreenshotSink {
            session,
            dir: dir.into(),
        }
    }
}

#[async_trait]
impl DiagnosticsSink for ScreenshotSink {
    async fn capture(&self, label: &str) -> Result<PathBuf> {
        let png = self.session.screenshot_png().await?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let name = format!(
            "{}_{}.png",
            sanitize_label(label),
            chrono::Utc::now().timestamp_millis()
        );
        let path = self.dir.join(name);
        tokio::fs::write(&path, png)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Captured {}", path.display());
        Ok(path)
    }
}

/// Capture without letting a capture error escape
///
/// Used on failure paths, where the primary error must win, and for routine
/// step captures, where a missing screenshot is not worth failing a run.
pub async fn capture_quietly(sink: &dyn DiagnosticsSink, label: &str) {
    if let Err(e) = sink.capture(label).await {
        warn!("Diagnostic capture '{}' failed: {:#}", label, e);
    }
}

/// File-name-safe form of a capture label
pub fn sanitize_label(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod diagnostics_test;
