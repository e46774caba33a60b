//! # chatdrill
#![allow(clippy::uninlined_format_args)]
//!
//! Browser-driven end-to-end exerciser for WhatsApp Web chat-bot flows.
//!
//! Drives a real browser through a complete conversational-bot flow: QR
//! login, contact search, trigger message, input-validation probing, receipt
//! upload, and agent hand-off. The reusable core is a resilient UI-action
//! executor: ordered-fallback element resolution, bounded actionability
//! polling, and a thin action layer, all behind an engine seam so the core
//! runs against scripted mocks in tests.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Run the complete flow (geckodriver must be listening on :4444)
//! chatdrill run --profile my-login
//!
//! # Individual phases
//! chatdrill login --profile my-login
//! chatdrill trigger --profile my-login
//! chatdrill validate --profile my-login
//!
//! # Override scenario parameters from a JSON file
//! chatdrill run --config scenario.json --browser chrome
//! ```
//!
//! A persistent `--profile` keeps the WhatsApp login in browser storage so
//! the QR scan only happens once. Screenshots of every step and every
//! failure land in `screenshots/` (override with `--screenshots`).
//!
//! ## Library Usage
//!
//! The resolver is usable on its own against any [`engine::DomProbe`]:
//!
//! ```no_run
//! use chatdrill::locator::{Descriptor, LocatorSet};
//! use chatdrill::resolver::resolve;
//! use std::time::Duration;
//!
//! # async fn example(probe: &dyn chatdrill::engine::DomProbe) -> anyhow::Result<()> {
//! let target = LocatorSet::new(
//!     "message input box",
//!     Descriptor::css(r#"[data-testid="conversation-compose-box-input"]"#),
//! )
//! .or(Descriptor::css(r#"div[contenteditable="true"]"#));
//!
//! let hit = resolve(probe, &target, Duration::from_secs(10), None).await?;
//! hit.handle.click().await?;
//! # Ok(())
//! # }
//! ```

/// Bounded actionability polling for resolved elements
pub mod actionability;

/// Primitive actions (fill, send, click, attach) with typed failures
pub mod actions;

/// Scenario configuration surface
pub mod config;

/// Failure diagnostics capture policy
pub mod diagnostics;

/// Engine seam between the core and the browser automation client
pub mod engine;

/// Typed error taxonomy with exit codes
pub mod errors;

/// The scenario driver
pub mod flow;

/// Locator descriptors and ordered fallback sets
pub mod locator;

/// Human-in-the-loop gate and logged waits
pub mod operator;

/// Browser profile management for login persistence
pub mod profile;

/// The resilient locator resolver
pub mod resolver;

/// WebDriver-backed browser session
pub mod session;

/// WhatsApp Web locator sets used by the scenarios
pub mod targets;

pub use config::{ScenarioConfig, Timeouts};
pub use errors::DrillError;
pub use flow::FlowDriver;
pub use locator::{Descriptor, LocatorSet};
pub use profile::ProfileManager;
pub use session::{BrowserType, ChatSession, ViewportSize};
