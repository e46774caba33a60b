//! Shared mock engine for the integration tests
//!
//! A scripted DOM: behaviors are keyed by the descriptor's display form, and
//! every probe, navigation, prompt, action, and capture is recorded so tests
//! assert on what the flow actually did.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chatdrill::diagnostics::DiagnosticsSink;
use chatdrill::engine::{DomProbe, ElementHandle, PageNavigator};
use chatdrill::locator::Descriptor;
use chatdrill::operator::OperatorGate;

/// What a scripted element looks like once found
#[derive(Debug, Clone)]
pub struct ElementSpec {
    pub id: String,
    pub tag: String,
    pub displayed: bool,
    pub attrs: Vec<(String, String)>,
    pub fail_actions: bool,
}

impl ElementSpec {
    pub fn new(id: &str) -> Self {
        ElementSpec {
            id: id.to_string(),
            tag: "div".to_string(),
            displayed: true,
            attrs: Vec::new(),
            fail_actions: false,
        }
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn failing_actions(mut self) -> Self {
        self.fail_actions = true;
        self
    }

    pub fn file_input() -> Self {
        ElementSpec::new("file-input").tag("input").attr("type", "file")
    }
}

/// How the mock DOM reacts to a probe for one descriptor
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Immediate miss
    Miss,
    /// Immediate hit
    Found(ElementSpec),
    /// Misbehaving probe that never returns; the resolver's own timeout
    /// enforcement has to cut it off
    Hang,
    /// Engine-level probe failure
    Fail,
}

/// Scripted element handle recording every action into a shared log
pub struct MockElement {
    spec: ElementSpec,
    actions: Arc<Mutex<Vec<String>>>,
}

impl MockElement {
    fn record(&self, action: &str) -> Result<()> {
        if self.spec.fail_actions {
            anyhow::bail!("element not interactable");
        }
        self.actions
            .lock()
            .unwrap()
            .push(format!("{} {}", self.spec.id, action));
        Ok(())
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    fn describe(&self) -> String {
        self.spec.id.clone()
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .spec
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone()))
    }

    async fn is_displayed(&self) -> Result<bool> {
        Ok(self.spec.displayed)
    }

    async fn tag_name(&self) -> Result<String> {
        Ok(self.spec.tag.clone())
    }

    async fn click(&self) -> Result<()> {
        self.record("click")
    }

    async fn clear(&self) -> Result<()> {
        self.record("clear")
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.record(&format!("keys:{}", text))
    }

    async fn attach_file(&self, path: &Path) -> Result<()> {
        self.record(&format!("attach:{}", path.display()))
    }
}

/// Scripted DOM probe
pub struct MockDom {
    behaviors: Mutex<HashMap<String, Behavior>>,
    /// Display form of every descriptor probed, in order
    probes: Arc<Mutex<Vec<String>>>,
    /// Every action performed on any element this DOM handed out
    actions: Arc<Mutex<Vec<String>>>,
}

impl MockDom {
    pub fn new() -> Self {
        MockDom {
            behaviors: Mutex::new(HashMap::new()),
            probes: Arc::new(Mutex::new(Vec::new())),
            actions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script the reaction to one descriptor; anything unscripted misses
    pub fn on(self, descriptor: &Descriptor, behavior: Behavior) -> Self {
        self.behaviors
            .lock()
            .unwrap()
            .insert(descriptor.to_string(), behavior);
        self
    }

    pub fn probe_log(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    pub fn action_log(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl DomProbe for MockDom {
    async fn probe(
        &self,
        descriptor: &Descriptor,
        _timeout: Duration,
    ) -> Result<Option<Box<dyn ElementHandle>>> {
        self.probes.lock().unwrap().push(descriptor.to_string());

        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(&descriptor.to_string())
            .cloned()
            .unwrap_or(Behavior::Miss);

        match behavior {
            Behavior::Miss => Ok(None),
            Behavior::Found(spec) => Ok(Some(Box::new(MockElement {
                spec,
                actions: Arc::clone(&self.actions),
            }))),
            Behavior::Hang => {
                // Overruns any sane budget; only the caller's enforcement of
                // the probe timeout ends this
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
            Behavior::Fail => Err(anyhow::anyhow!("DOM query failed")),
        }
    }
}

/// Navigator that records visited URLs
pub struct MockNav {
    visited: Mutex<Vec<String>>,
}

impl MockNav {
    pub fn new() -> Self {
        MockNav {
            visited: Mutex::new(Vec::new()),
        }
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageNavigator for MockNav {
    async fn goto(&self, url: &str) -> Result<()> {
        self.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Operator gate with a scripted answer, recording prompts
pub struct MockGate {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockGate {
    pub fn confirming() -> Self {
        MockGate {
            answer: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn lapsing() -> Self {
        MockGate {
            answer: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_log(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl OperatorGate for MockGate {
    async fn confirm(&self, prompt: &str, _timeout: Duration) -> Result<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer)
    }
}

/// Diagnostics sink that records capture labels instead of writing files
pub struct RecordingSink {
    labels: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink {
            labels: Mutex::new(Vec::new()),
        }
    }

    pub fn label_log(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiagnosticsSink for RecordingSink {
    async fn capture(&self, label: &str) -> Result<PathBuf> {
        self.labels.lock().unwrap().push(label.to_string());
        Ok(PathBuf::from(format!("{}.png", label)))
    }
}
