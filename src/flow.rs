//! Scenario driver for the chat-bot flow
//!
//! Strictly sequential: one browser session, one tab, shared mutable UI
//! state. Steps never run concurrently - the only sanctioned race is the
//! login readiness check, where three equivalent signals are probed at once.
//!
//! Error policy per step: resolution failures on optional UI degrade with a
//! warning and a capture; action failures on a resolved element always abort
//! the step and propagate, after capturing diagnostic state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, error, info, warn};

use crate::actionability::{enabled_and_visible, wait_actionable, Readiness};
use crate::actions;
use crate::config::ScenarioConfig;
use crate::diagnostics::{capture_quietly, DiagnosticsSink};
use crate::engine::{DomProbe, PageNavigator};
use crate::errors::DrillError;
use crate::operator::{wait_with_log, OperatorGate};
use crate::resolver::{resolve, resolve_any};
use crate::session::ChatSession;
use crate::targets;

/// Entry point of the whole exercise
pub const WHATSAPP_URL: &str = "https://web.whatsapp.com";

/// Probe budget for the short validation-signal checks
const SIGNAL_PROBE: Duration = Duration::from_secs(2);
/// Probe budget for the attachment UI, which either exists or never will
const ATTACH_PROBE: Duration = Duration::from_secs(5);
const PHOTO_PROBE: Duration = Duration::from_secs(3);
const AGENT_PROBE: Duration = Duration::from_secs(20);

/// What the bot's reaction to an invalid input tells us
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSignal {
    /// Direct: an error indicator appeared - the input was rejected
    ErrorShown,
    /// Indirect, lower-confidence: the flow advanced past the prompt, so the
    /// input was apparently accepted
    ConversationAdvanced,
    /// Neither signal observed; no determination possible
    NoSignal,
}

/// Classify the bot's reaction to the input just sent
///
/// Checks the direct error indicators first; only when none match does it
/// fall back to the indirect continuation check. The indirect signal is an
/// inference ("the conversation moved on"), not an observation of an error
/// message, and is reported as such.
pub async fn classify_validation(probe: &dyn DomProbe) -> ValidationSignal {
    if resolve(probe, &targets::error_indicators(), SIGNAL_PROBE, None)
        .await
        .is_ok()
    {
        return ValidationSignal::ErrorShown;
    }

    // Give the flow a moment to advance before drawing the weaker inference.
    tokio::time::sleep(Duration::from_secs(2)).await;
    if resolve(probe, &targets::continuation_signals(), SIGNAL_PROBE, None)
        .await
        .is_ok()
    {
        return ValidationSignal::ConversationAdvanced;
    }

    ValidationSignal::NoSignal
}

/// Drives one scenario against one exclusively-owned browser session
pub struct FlowDriver {
    nav: Arc<dyn PageNavigator>,
    probe: Arc<dyn DomProbe>,
    gate: Arc<dyn OperatorGate>,
    sink: Arc<dyn DiagnosticsSink>,
    config: ScenarioConfig,
}

impl FlowDriver {
    pub fn new(
        session: Arc<ChatSession>,
        config: ScenarioConfig,
        sink: Arc<dyn DiagnosticsSink>,
        gate: Arc<dyn OperatorGate>,
    ) -> Self {
        FlowDriver {
            nav: session.clone(),
            probe: session,
            gate,
            sink,
            config,
        }
    }

    /// Assemble a driver from individual collaborators; used by tests to
    /// substitute mocks for the browser engine
    pub fn with_parts(
        nav: Arc<dyn PageNavigator>,
        probe: Arc<dyn DomProbe>,
        gate: Arc<dyn OperatorGate>,
        sink: Arc<dyn DiagnosticsSink>,
        config: ScenarioConfig,
    ) -> Self {
        FlowDriver {
            nav,
            probe,
            gate,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Step 1: navigate to WhatsApp Web and complete login
    ///
    /// If a QR canvas shows up, the human operator gets prompted and the flow
    /// blocks until they confirm or the QR budget lapses. Login completion is
    /// the one concurrent check in the crate: three equivalent readiness
    /// signals raced, first hit wins.
    pub async fn login(&self) -> Result<(), DrillError> {
        let timeouts = &self.config.timeouts;

        info!("Opening WhatsApp Web...");
        self.nav
            .goto(WHATSAPP_URL)
            .await
            .map_err(DrillError::engine)?;
        tokio::time::sleep(Duration::from_secs(3)).await;
        self.capture("whatsapp-loaded").await;

        wait_with_log(Duration::from_secs(5), "page stabilize").await;

        match resolve(
            &*self.probe,
            &targets::qr_code(),
            Duration::from_secs(3),
            None,
        )
        .await
        {
            Ok(_) => {
                info!("QR code found, operator scan required");
                self.capture("qr-code").await;
                let confirmed = self
                    .gate
                    .confirm(
                        "Scan the QR code in the browser, then press ENTER here to continue...",
                        timeouts.qr_scan(),
                    )
                    .await?;
                if !confirmed {
                    return Err(DrillError::Other(anyhow!(
                        "Operator did not confirm the QR scan within {}s",
                        timeouts.qr_scan_secs
                    )));
                }
            }
            Err(_) => {
                debug!("No QR code found - checking login status");
            }
        }

        match resolve_any(
            Arc::clone(&self.probe),
            "login readiness",
            targets::login_signals(),
            timeouts.login_wait(),
        )
        .await
        {
            Some(_) => {
                info!("Logged in to WhatsApp Web");
                self.capture("login-success").await;
            }
            None => {
                // The chat UI sometimes renders without any of the markers we
                // know; let the next step find out for real.
                warn!("No login readiness signal observed, continuing anyway");
                self.capture("login-unconfirmed").await;
            }
        }

        Ok(())
    }

    /// Step 2: search for the target contact and open the conversation
    ///
    /// A missing search box fails the step; a missing search result degrades
    /// with a warning (the conversation may already be open).
    pub async fn open_contact(&self) -> Result<(), DrillError> {
        let timeouts = &self.config.timeouts;

        info!("Searching for contact: {}", self.config.contact);
        let search = match resolve(
            &*self.probe,
            &targets::search_box(),
            timeouts.probe(),
            Some(timeouts.overall()),
        )
        .await
        {
            Ok(hit) => hit,
            Err(e) => {
                capture_quietly(&*self.sink, "search-box-missing").await;
                return Err(e);
            }
        };

        if let Err(e) = actions::fill(&*search.handle, &self.config.contact, &search.target).await {
            capture_quietly(&*self.sink, "error_contact_search").await;
            return Err(e);
        }
        tokio::time::sleep(Duration::from_secs(3)).await;

        match resolve(
            &*self.probe,
            &targets::contact_result(&self.config.contact),
            timeouts.probe(),
            Some(timeouts.overall()),
        )
        .await
        {
            Ok(hit) => {
                if let Err(e) = actions::click(&*hit.handle, &hit.target).await {
                    capture_quietly(&*self.sink, "error_contact_open").await;
                    return Err(e);
                }
                tokio::time::sleep(Duration::from_secs(3)).await;
                self.capture("contact-opened").await;
                info!("Contact {} opened", self.config.contact);
            }
            Err(e) => {
                warn!("Could not find contact, trying to continue... ({})", e);
                self.capture("contact-not-found").await;
            }
        }

        Ok(())
    }

    /// Step 3: send the trigger phrase and click the Proceed button
    ///
    /// The Proceed button is resolved, then polled until actionable. A button
    /// that never unblocks fails the step as `StillBlocked` - silently
    /// skipping the click would let the rest of the flow run against a bot
    /// that never started.
    pub async fn send_trigger(&self) -> Result<(), DrillError> {
        let timeouts = &self.config.timeouts;

        info!("Sending trigger message...");
        self.send_step(&self.config.trigger_message, "trigger message")
            .await?;
        wait_with_log(timeouts.message_delay(), "bot response").await;

        info!("Looking for Proceed button after trigger message...");
        let proceed = match resolve(
            &*self.probe,
            &targets::proceed_button(),
            timeouts.button_wait(),
            Some(timeouts.button_wait()),
        )
        .await
        {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Proceed button not found: {}", e);
                capture_quietly(&*self.sink, "proceed-button-error").await;
                return Err(e);
            }
        };
        self.capture("proceed-button-found").await;

        match wait_actionable(
            &*proceed.handle,
            enabled_and_visible,
            timeouts.poll_interval(),
            timeouts.max_poll_attempts,
        )
        .await?
        {
            Readiness::Ready { polls } => {
                info!("Proceed button enabled after {} poll(s), clicking...", polls);
                if let Err(e) = actions::click(&*proceed.handle, &proceed.target).await {
                    capture_quietly(&*self.sink, "proceed-button-error").await;
                    return Err(e);
                }
                tokio::time::sleep(Duration::from_secs(2)).await;
                self.capture("proceed-button-clicked").await;
            }
            Readiness::StillBlocked { attempts } => {
                capture_quietly(&*self.sink, "proceed-button-blocked").await;
                return Err(DrillError::StillBlocked {
                    target: proceed.target,
                    attempts,
                });
            }
        }

        Ok(())
    }

    /// Step 4: probe the bot's name validation with known-bad inputs
    ///
    /// Each invalid name must produce a rejection signal. A direct error
    /// indicator is proof of rejection; the conversation advancing is
    /// (lower-confidence) evidence of acceptance and fails the step; no
    /// signal at all is logged and tolerated.
    pub async fn probe_name_validation(&self) -> Result<(), DrillError> {
        let timeouts = &self.config.timeouts;

        info!("Starting name entry with error sequence and validation...");
        wait_with_log(Duration::from_secs(2), "name entry prompt").await;

        for (index, invalid) in self.config.invalid_names.iter().enumerate() {
            wait_with_log(timeouts.error_delay(), &format!("error name {}", index + 1)).await;
            self.send_step(invalid, &format!("error name {}", index + 1))
                .await?;
            tokio::time::sleep(Duration::from_secs(3)).await;

            match classify_validation(&*self.probe).await {
                ValidationSignal::ErrorShown => {
                    info!(
                        "Bot correctly rejected invalid name {:?} (error indicator shown)",
                        invalid
                    );
                }
                ValidationSignal::ConversationAdvanced => {
                    error!(
                        "Validation breach: bot accepted invalid name {:?} and moved on \
                        (indirect signal - conversation advanced)",
                        invalid
                    );
                    capture_quietly(
                        &*self.sink,
                        &format!("validation-failed-{}", invalid),
                    )
                    .await;
                    return Err(DrillError::ValidationBreach {
                        input: invalid.clone(),
                    });
                }
                ValidationSignal::NoSignal => {
                    warn!(
                        "No clear validation signal for {:?}, but the flow did not advance either",
                        invalid
                    );
                }
            }
        }

        wait_with_log(timeouts.error_delay(), "correct name entry").await;
        self.send_step(&self.config.user_name, "correct user name")
            .await?;
        self.capture("name-validation-complete").await;

        Ok(())
    }

    /// Step 5: upload the receipt image through the attachment menu
    ///
    /// The whole attachment UI is optional from the flow's point of view:
    /// missing pieces degrade with warnings, and a file input that never
    /// appears falls back to a logged manual-selection wait. Failures on
    /// elements we did resolve still abort.
    pub async fn upload_receipt(&self) -> Result<(), DrillError> {
        let timeouts = &self.config.timeouts;
        let receipt = &self.config.receipt_path;

        // Catch a misconfigured path before opening the attachment menu; the
        // file input would otherwise swallow the bad path silently.
        if !receipt.exists() {
            error!("Receipt file {} does not exist", receipt.display());
            return Err(DrillError::Other(anyhow!(
                "Receipt file {} does not exist; set receipt_path in the scenario config",
                receipt.display()
            )));
        }

        info!("Uploading receipt image: {}", receipt.display());

        let attach = match resolve(
            &*self.probe,
            &targets::attach_button(),
            ATTACH_PROBE,
            Some(timeouts.overall()),
        )
        .await
        {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Skipping receipt upload: {}", e);
                self.capture("attach-button-missing").await;
                return Ok(());
            }
        };

        if let Err(e) = actions::click(&*attach.handle, &attach.target).await {
            capture_quietly(&*self.sink, "error_attach_click").await;
            return Err(e);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;

        let photo = match resolve(
            &*self.probe,
            &targets::photo_option(),
            PHOTO_PROBE,
            Some(timeouts.overall()),
        )
        .await
        {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Skipping receipt upload: {}", e);
                self.capture("photo-option-missing").await;
                return Ok(());
            }
        };

        let file_handle = if actions::is_file_input(&*photo.handle).await? {
            Some((photo.handle, photo.target))
        } else {
            if let Err(e) = actions::click(&*photo.handle, &photo.target).await {
                capture_quietly(&*self.sink, "error_photo_click").await;
                return Err(e);
            }
            tokio::time::sleep(Duration::from_secs(1)).await;

            match resolve(&*self.probe, &targets::file_input(), ATTACH_PROBE, None).await {
                Ok(hit) => Some((hit.handle, hit.target)),
                Err(_) => None,
            }
        };

        match file_handle {
            Some((handle, target)) => {
                if let Err(e) = actions::attach_file(&*handle, receipt, &target).await {
                    capture_quietly(&*self.sink, "error_receipt_attach").await;
                    return Err(e);
                }
            }
            None => {
                // No programmatic input surfaced; a human has to drive the
                // native file picker.
                info!("File input not found - manual selection required");
                wait_with_log(timeouts.receipt_upload(), "manual file selection").await;
            }
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        match resolve(&*self.probe, &targets::send_button(), ATTACH_PROBE, None).await {
            Ok(send) => {
                if let Err(e) = actions::click(&*send.handle, &send.target).await {
                    capture_quietly(&*self.sink, "error_receipt_send").await;
                    return Err(e);
                }
                info!("Receipt sent");
                self.capture("receipt-sent").await;
            }
            Err(_) => {
                warn!("Send button not found after receipt upload");
            }
        }

        Ok(())
    }

    /// Step 6: hand the conversation over to a human agent
    pub async fn agent_handoff(&self) -> Result<(), DrillError> {
        let timeouts = &self.config.timeouts;

        wait_with_log(timeouts.receipt_upload(), "additional receipt upload").await;

        info!("Looking for Chat with Agent button...");
        match resolve(
            &*self.probe,
            &targets::agent_button(),
            AGENT_PROBE,
            Some(AGENT_PROBE),
        )
        .await
        {
            Ok(hit) => {
                if let Err(e) = actions::click(&*hit.handle, &hit.target).await {
                    capture_quietly(&*self.sink, "error_agent_click").await;
                    return Err(e);
                }
                info!("Chat with Agent button clicked");
                self.capture("chat-agent-clicked").await;
            }
            Err(e) => {
                warn!("Chat with Agent button not found, continuing... ({})", e);
                self.capture("no-chat-agent").await;
            }
        }

        wait_with_log(timeouts.error_delay(), "agent response").await;
        self.send_step(&self.config.agent_message, "agent enquiry")
            .await?;
        self.capture("automation-complete").await;
        info!("Chat-bot flow completed");

        Ok(())
    }

    /// Run every step in order
    pub async fn run_full(&self) -> Result<(), DrillError> {
        let result = async {
            self.login().await?;
            self.open_contact().await?;
            self.send_trigger().await?;
            self.probe_name_validation().await?;
            self.upload_receipt().await?;
            self.agent_handoff().await
        }
        .await;

        if let Err(e) = &result {
            error!("Flow failed: {}", e);
            capture_quietly(&*self.sink, "flow-error").await;
        }
        result
    }

    /// Resolve the compose box and send one message, with the fixed
    /// capture-on-both-outcomes policy every send gets
    async fn send_step(&self, text: &str, description: &str) -> Result<(), DrillError> {
        let timeouts = &self.config.timeouts;

        let resolved = match resolve(
            &*self.probe,
            &targets::message_box(),
            timeouts.probe(),
            Some(timeouts.overall()),
        )
        .await
        {
            Ok(hit) => hit,
            Err(e) => {
                error!("Failed to send {}: {}", description, e);
                capture_quietly(&*self.sink, &format!("error_{}", description)).await;
                return Err(e);
            }
        };

        if let Err(e) = actions::send_text(&*resolved.handle, text, &resolved.target).await {
            error!("Failed to send {}: {}", description, e);
            capture_quietly(&*self.sink, &format!("error_{}", description)).await;
            return Err(e);
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
        info!("{} sent: {:?}", description, text);
        self.capture(description).await;
        Ok(())
    }

    async fn capture(&self, label: &str) {
        capture_quietly(&*self.sink, label).await;
    }
}
