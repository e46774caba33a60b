//! Bounded actionability polling
//!
//! A resolved element is not necessarily safe to act on: WhatsApp Web keeps
//! buttons rendered but `aria-disabled` until the bot catches up. This module
//! polls the handle's state at a fixed cadence until a predicate holds or the
//! attempt budget runs out. No backoff: polls are cheap attribute reads and a
//! fixed interval keeps the timing predictable.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::engine::ElementHandle;

/// Snapshot of the attributes that decide whether an element is actionable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionabilityState {
    /// Element is rendered and visible
    pub visible: bool,
    /// `disabled` attribute is present
    pub disabled: bool,
    /// `aria-disabled` is literally "true"
    pub aria_disabled: bool,
}

impl ActionabilityState {
    /// Read the current state through the handle
    pub async fn read(handle: &dyn ElementHandle) -> Result<Self> {
        let visible = handle.is_displayed().await?;
        let disabled = handle.attr("disabled").await?.is_some();
        let aria_disabled = handle.attr("aria-disabled").await?.as_deref() == Some("true");
        Ok(ActionabilityState {
            visible,
            disabled,
            aria_disabled,
        })
    }

    /// Visible and not disabled in either convention
    pub fn actionable(&self) -> bool {
        self.visible && !self.disabled && !self.aria_disabled
    }
}

/// Decides when a polled snapshot is good enough to act on
pub type Predicate = fn(&ActionabilityState) -> bool;

/// The stock predicate: visible, no `disabled`, no `aria-disabled="true"`
pub fn enabled_and_visible(state: &ActionabilityState) -> bool {
    state.actionable()
}

/// Terminal outcome of an actionability wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Predicate held; `polls` is how many polls elapsed (first poll counts 1)
    Ready { polls: u32 },
    /// Budget exhausted; `attempts` equals the configured maximum
    StillBlocked { attempts: u32 },
}

/// Poll `handle` until `predicate` holds or `max_attempts` polls have failed
///
/// The counter starts at 0 and is incremented once per failed poll; attempt
/// `max_attempts` is the last permitted poll. `StillBlocked` is reported, not
/// retried - the caller decides whether to fail the step or proceed anyway.
pub async fn wait_actionable(
    handle: &dyn ElementHandle,
    predicate: Predicate,
    poll_interval: Duration,
    max_attempts: u32,
) -> Result<Readiness> {
    if max_attempts == 0 {
        return Ok(Readiness::StillBlocked { attempts: 0 });
    }

    let mut attempts: u32 = 0;
    loop {
        let state = ActionabilityState::read(handle).await?;
        if predicate(&state) {
            let polls = attempts + 1;
            info!("{} actionable after {} poll(s)", handle.describe(), polls);
            return Ok(Readiness::Ready { polls });
        }

        attempts += 1;
        debug!(
            "{} not actionable ({:?}), attempt {}/{}",
            handle.describe(),
            state,
            attempts,
            max_attempts
        );
        if attempts >= max_attempts {
            return Ok(Readiness::StillBlocked { attempts });
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
#[path = "actionability_test.rs"]
mod actionability_test;
