//! WebDriver-backed browser session
//!
//! Owns the single fantoccini [`Client`] a scenario runs against and adapts
//! it to the engine seam: [`DomProbe`] for descriptor probes,
//! [`PageNavigator`] for navigation, and a [`SessionElement`] wrapper
//! implementing [`ElementHandle`]. One session, one tab, one scenario - the
//! page is exclusively owned for the scenario's whole duration.

use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::engine::{DomProbe, ElementHandle, PageNavigator};
use crate::locator::Descriptor;

/// Cadence of the presence poll inside a single probe
const PROBE_POLL: Duration = Duration::from_millis(250);

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Get the WebDriver URL for this browser type
    pub fn webdriver_url(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "http://localhost:4444",
            BrowserType::Chrome => "http://localhost:9515",
        }
    }

    fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1280x720")
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid viewport format. Use WIDTHxHEIGHT (e.g., 1280x720)");
        }

        let width = parts[0]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid width in viewport size"))?;
        let height = parts[1]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid height in viewport size"))?;

        Ok(ViewportSize { width, height })
    }
}

/// Live browser session for one scenario
pub struct ChatSession {
    client: Client,
    browser_type: BrowserType,
}

impl ChatSession {
    /// Connect to a running WebDriver and open the session
    ///
    /// # Arguments
    /// * `browser_type` - Firefox or Chrome
    /// * `profile_path` - Optional persistent profile dir so a QR login
    ///   survives across runs
    /// * `viewport` - Optional viewport dimensions
    /// * `headless` - Whether to run in headless mode
    pub async fn connect(
        browser_type: BrowserType,
        profile_path: Option<PathBuf>,
        viewport: Option<ViewportSize>,
        headless: bool,
    ) -> Result<Self> {
        info!("Connecting to {:?} WebDriver", browser_type);

        let webdriver_url = browser_type.webdriver_url();
        if !Self::is_webdriver_running(webdriver_url).await {
            let driver_name = browser_type.driver_name();
            anyhow::bail!(
                "Cannot connect to {} at {}.\n\
                Please ensure {} is running:\n\
                  For Firefox: geckodriver --port 4444\n\
                  For Chrome: chromedriver --port 9515",
                driver_name,
                webdriver_url,
                driver_name
            );
        }

        // Chrome needs a user-data-dir even for throwaway sessions; fall back
        // to a temp dir when no profile was requested.
        let profile_path = match (&browser_type, profile_path) {
            (_, Some(path)) => Some(path),
            (BrowserType::Chrome, None) => {
                let temp_dir = tempfile::Builder::new()
                    .prefix("chatdrill-chrome-")
                    .tempdir()?;
                #[allow(deprecated)]
                let path = temp_dir.into_path();
                Some(path)
            }
            (BrowserType::Firefox, None) => None,
        };

        let mut caps = serde_json::Map::new();
        match &browser_type {
            BrowserType::Firefox => {
                let mut firefox_opts = serde_json::Map::new();
                let mut args = Vec::new();

                if headless {
                    args.push("--headless".to_string());
                }
                if let Some(vp) = &viewport {
                    args.push(format!("--width={}", vp.width));
                    args.push(format!("--height={}", vp.height));
                }
                if let Some(path) = &profile_path {
                    args.push("-profile".to_string());
                    args.push(path.display().to_string());
                }

                firefox_opts.insert("args".to_string(), json!(args));
                caps.insert("moz:firefoxOptions".to_string(), json!(firefox_opts));
            }
            BrowserType::Chrome => {
                let mut chrome_opts = serde_json::Map::new();
                let mut args = vec!["--no-sandbox".to_string()];

                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }
                if let Some(vp) = &viewport {
                    args.push(format!("--window-size={},{}", vp.width, vp.height));
                }
                if let Some(path) = &profile_path {
                    args.push(format!("--user-data-dir={}", path.display()));
                }

                chrome_opts.insert("args".to_string(), json!(args));
                caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
            }
        }

        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        if let Some(vp) = viewport {
            debug!("Setting viewport to {}x{}", vp.width, vp.height);
            if let Err(e) = client.set_window_size(vp.width, vp.height).await {
                // Best-effort; headless args usually got it right already
                debug!("Note: Could not set window size: {}", e);
            }
        }

        Ok(ChatSession {
            client,
            browser_type,
        })
    }

    async fn is_webdriver_running(url: &str) -> bool {
        let status_url = format!("{}/status", url);
        match reqwest::get(&status_url).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    /// Get the current URL - useful for health checks
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    /// Capture the page as PNG bytes
    pub async fn screenshot_png(&self) -> Result<Vec<u8>> {
        self.client
            .screenshot()
            .await
            .context("Failed to capture screenshot")
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[async_trait]
impl PageNavigator for ChatSession {
    async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        self.client.goto(url).await?;

        // Wait for the page to be ready; helps avoid stale element references
        let wait_script = r#"
            return document.readyState === 'complete';
        "#;
        for _ in 0..20 {
            // Max 2 seconds
            match self.client.execute(wait_script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => {
                    break;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl DomProbe for ChatSession {
    async fn probe(
        &self,
        descriptor: &Descriptor,
        timeout: Duration,
    ) -> Result<Option<Box<dyn ElementHandle>>> {
        let wire = WireLocator::from(descriptor);
        let deadline = Instant::now() + timeout;

        loop {
            let elements = self
                .client
                .find_all(wire.as_locator())
                .await
                .with_context(|| format!("DOM query failed for {}", descriptor))?;

            if let Some(element) = elements.into_iter().next() {
                return Ok(Some(Box::new(SessionElement {
                    element,
                    matched: descriptor.clone(),
                })));
            }

            if Instant::now() + PROBE_POLL > deadline {
                return Ok(None);
            }
            tokio::time::sleep(PROBE_POLL).await;
        }
    }
}

/// Descriptor lowered to something the wire protocol can evaluate
enum WireLocator {
    Css(String),
    XPath(String),
}

impl WireLocator {
    fn from(descriptor: &Descriptor) -> Self {
        match descriptor {
            Descriptor::Css(selector) => WireLocator::Css(selector.clone()),
            Descriptor::Text(text) => WireLocator::XPath(format!(
                "//*[text()[contains(., {})]]",
                xpath_literal(text)
            )),
            Descriptor::Role { role, text: None } => {
                WireLocator::Css(format!("[role='{}']", role))
            }
            Descriptor::Role {
                role,
                text: Some(text),
            } => WireLocator::XPath(format!(
                "//*[@role='{}'][contains(., {})]",
                role,
                xpath_literal(text)
            )),
            Descriptor::AttrContains { attr, fragment } => {
                WireLocator::Css(format!("[{}*='{}']", attr, fragment))
            }
        }
    }

    fn as_locator(&self) -> Locator<'_> {
        match self {
            WireLocator::Css(s) => Locator::Css(s),
            WireLocator::XPath(s) => Locator::XPath(s),
        }
    }
}

/// Quote a string as an XPath literal, using concat() when it mixes quotes
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{}'", s)
    } else if !s.contains('"') {
        format!("\"{}\"", s)
    } else {
        let parts: Vec<String> = s
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// fantoccini element adapted to the engine seam
pub struct SessionElement {
    element: fantoccini::elements::Element,
    matched: Descriptor,
}

#[async_trait]
impl ElementHandle for SessionElement {
    fn describe(&self) -> String {
        self.matched.to_string()
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self.element.attr(name).await?)
    }

    async fn is_displayed(&self) -> Result<bool> {
        Ok(self.element.is_displayed().await?)
    }

    async fn tag_name(&self) -> Result<String> {
        Ok(self.element.tag_name().await?)
    }

    async fn click(&self) -> Result<()> {
        self.element.click().await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.element.clear().await?;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.element.send_keys(text).await?;
        Ok(())
    }

    async fn attach_file(&self, path: &Path) -> Result<()> {
        // WebDriver binds local files to <input type="file"> by sending the
        // absolute path as keys.
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let path_str = absolute
            .to_str()
            .context("Receipt path is not valid UTF-8")?;
        self.element.send_keys(path_str).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
