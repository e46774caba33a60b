//! Scenario configuration
//!
//! A flat set of named parameters injected into the flow driver. Defaults
//! match the live campaign the suite was written against; any field can be
//! overridden from a JSON file or the CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Per-phase timeout durations, in the units the scenarios think in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// How long the operator gets to scan the QR code
    pub qr_scan_secs: u64,
    /// Bound on waiting for the login readiness signals
    pub login_wait_secs: u64,
    /// Bound on finding the proceed/agent buttons
    pub button_wait_secs: u64,
    /// Settle time after sending a message before probing the bot's reply
    pub message_delay_secs: u64,
    /// Settle time between invalid-name probes
    pub error_delay_secs: u64,
    /// Modeled manual wait for the receipt upload phase
    pub receipt_upload_secs: u64,
    /// Per-descriptor probe budget
    pub probe_secs: u64,
    /// Overall resolution budget across a whole locator set
    pub overall_secs: u64,
    /// Actionability poll cadence
    pub poll_interval_secs: u64,
    /// Actionability poll budget
    pub max_poll_attempts: u32,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            qr_scan_secs: 120,
            login_wait_secs: 30,
            button_wait_secs: 60,
            message_delay_secs: 3,
            error_delay_secs: 5,
            receipt_upload_secs: 15,
            probe_secs: 10,
            overall_secs: 30,
            poll_interval_secs: 1,
            max_poll_attempts: 30,
        }
    }
}

impl Timeouts {
    pub fn qr_scan(&self) -> Duration {
        Duration::from_secs(self.qr_scan_secs)
    }

    pub fn login_wait(&self) -> Duration {
        Duration::from_secs(self.login_wait_secs)
    }

    pub fn button_wait(&self) -> Duration {
        Duration::from_secs(self.button_wait_secs)
    }

    pub fn message_delay(&self) -> Duration {
        Duration::from_secs(self.message_delay_secs)
    }

    pub fn error_delay(&self) -> Duration {
        Duration::from_secs(self.error_delay_secs)
    }

    pub fn receipt_upload(&self) -> Duration {
        Duration::from_secs(self.receipt_upload_secs)
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }

    pub fn overall(&self) -> Duration {
        Duration::from_secs(self.overall_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Everything one scenario run needs to know about its target flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Contact identifier to search for (phone number as displayed)
    pub contact: String,
    /// Phrase that wakes the bot flow up
    pub trigger_message: String,
    /// Name the bot should accept
    pub user_name: String,
    /// Enquiry sent after the agent hand-off
    pub agent_message: String,
    /// Inputs the bot is expected to reject during name validation
    pub invalid_names: Vec<String>,
    /// Local path of the receipt image to upload
    pub receipt_path: PathBuf,
    pub timeouts: Timeouts,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            contact: "+60 3-9771 1660".to_string(),
            trigger_message: "kuhentest".to_string(),
            user_name: "Atika".to_string(),
            agent_message: "Hello, I need assistance with my recent transaction. Can you please help me?"
                .to_string(),
            invalid_names: vec![
                "123".to_string(),
                "Hello123".to_string(),
                "\u{2705}\u{2705}\u{2705}".to_string(),
            ],
            receipt_path: PathBuf::from("fixtures/receipt.jpg"),
            timeouts: Timeouts::default(),
        }
    }
}

impl ScenarioConfig {
    /// Load configuration from a JSON file, filling gaps with defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ScenarioConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load from a file when given, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
