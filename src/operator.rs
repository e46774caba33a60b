//! Human-in-the-loop primitives
//!
//! The QR-scan ceremony and manual file picks are out-of-band actions a real
//! person performs. They come back to the automation through
//! [`OperatorGate::confirm`], a bounded prompt-and-resume, so automated runs
//! can substitute a mock confirmation instead of hanging on real input.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Block until the operator confirms an out-of-band action, or time out
#[async_trait]
pub trait OperatorGate: Send + Sync {
    /// Returns `Ok(true)` on confirmation, `Ok(false)` if the timeout lapsed
    async fn confirm(&self, prompt: &str, timeout: Duration) -> Result<bool>;
}

/// Console-backed gate: prints the prompt and waits for a line on stdin
pub struct ConsoleGate;

#[async_trait]
impl OperatorGate for ConsoleGate {
    async fn confirm(&self, prompt: &str, timeout: Duration) -> Result<bool> {
        println!("{}", prompt);

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        match tokio::time::timeout(timeout, reader.read_line(&mut line)).await {
            Ok(read) => {
                read.context("Failed to read operator confirmation from stdin")?;
                Ok(true)
            }
            Err(_) => {
                warn!("Operator did not confirm within {:?}", timeout);
                Ok(false)
            }
        }
    }
}

/// Fixed sleep with periodic progress logging
///
/// Models a manual step the automation cannot observe. Not cancellable:
/// callers cannot shorten it, only the duration bounds it.
pub async fn wait_with_log(duration: Duration, description: &str) {
    info!("Waiting {}s for {}...", duration.as_secs(), description);

    const TICK: Duration = Duration::from_secs(5);
    let mut remaining = duration;
    while remaining > TICK {
        tokio::time::sleep(TICK).await;
        remaining -= TICK;
        debug!("{}: {}s remaining", description, remaining.as_secs());
    }
    tokio::time::sleep(remaining).await;
}
