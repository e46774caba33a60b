//! Primitive actions against a resolved, actionable handle
//!
//! Thin by design: resolution and actionability already happened, so any
//! failure here is a genuine state mismatch and is always surfaced as
//! [`DrillError::ActionFailed`] with the target description attached.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::engine::ElementHandle;
use crate::errors::DrillError;

/// WebDriver code point for the Enter key
const ENTER_KEY: char = '\u{e007}';

/// Click, clear, and type into the target without committing
pub async fn fill(
    handle: &dyn ElementHandle,
    text: &str,
    target: &str,
) -> Result<(), DrillError> {
    let attempt = async {
        handle.click().await.context("click")?;
        handle.clear().await.context("clear")?;
        handle.send_keys(text).await.context("type")?;
        Ok(())
    };
    attempt.await.map_err(|source| DrillError::ActionFailed {
        target: target.to_string(),
        action: format!("fill with {:?}", text),
        source,
    })?;
    info!("Filled {} with {:?}", target, text);
    Ok(())
}

/// Fill the target and commit it with Enter
pub async fn send_text(
    handle: &dyn ElementHandle,
    text: &str,
    target: &str,
) -> Result<(), DrillError> {
    fill(handle, text, target).await?;
    handle
        .send_keys(&ENTER_KEY.to_string())
        .await
        .map_err(|source| DrillError::ActionFailed {
            target: target.to_string(),
            action: format!("commit {:?}", text),
            source,
        })?;
    info!("Sent {:?} to {}", text, target);
    Ok(())
}

/// Click the target
pub async fn click(handle: &dyn ElementHandle, target: &str) -> Result<(), DrillError> {
    handle.click().await.map_err(|source| DrillError::ActionFailed {
        target: target.to_string(),
        action: "click".to_string(),
        source,
    })?;
    info!("Clicked {}", target);
    Ok(())
}

/// Whether the handle is an `<input type="file">` and can take a file directly
pub async fn is_file_input(handle: &dyn ElementHandle) -> Result<bool> {
    let tag = handle.tag_name().await?;
    if !tag.eq_ignore_ascii_case("input") {
        return Ok(false);
    }
    Ok(handle.attr("type").await?.as_deref() == Some("file"))
}

/// Bind a local file to a file-input-capable handle
pub async fn attach_file(
    handle: &dyn ElementHandle,
    path: &Path,
    target: &str,
) -> Result<(), DrillError> {
    let capable = is_file_input(handle)
        .await
        .map_err(|source| DrillError::ActionFailed {
            target: target.to_string(),
            action: format!("attach file {}", path.display()),
            source,
        })?;
    if !capable {
        return Err(DrillError::ActionFailed {
            target: target.to_string(),
            action: format!("attach file {}", path.display()),
            source: anyhow::anyhow!("handle is not a file input"),
        });
    }

    handle
        .attach_file(path)
        .await
        .map_err(|source| DrillError::ActionFailed {
            target: target.to_string(),
            action: format!("attach file {}", path.display()),
            source,
        })?;
    info!("Attached {} to {}", path.display(), target);
    Ok(())
}

#[cfg(test)]
#[path = "actions_test.rs"]
mod actions_test;
