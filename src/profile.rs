//! Browser profile management for login persistence
//!
//! A WhatsApp Web login lives in browser storage, so re-scanning the QR code
//! on every run is avoidable: point the session at a named persistent profile
//! and the login survives across runs.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Metadata about a browser profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Profile name
    pub name: String,
    /// Browser type (firefox, chrome)
    pub browser: String,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// When the profile was last used
    pub last_used: DateTime<Utc>,
}

/// Manages browser profiles for session persistence
pub struct ProfileManager {
    profiles_dir: PathBuf,
}

impl ProfileManager {
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Unable to determine home directory")?;
        let profiles_dir = home_dir.join(".chatdrill").join("profiles");

        Self::with_dir(profiles_dir)
    }

    /// Manager rooted at an explicit directory instead of the home default
    pub fn with_dir(profiles_dir: impl Into<PathBuf>) -> Result<Self> {
        let profiles_dir = profiles_dir.into();
        fs::create_dir_all(&profiles_dir)?;
        Ok(ProfileManager { profiles_dir })
    }

    pub fn create_profile(&self, name: &str, browser: &str) -> Result<PathBuf> {
        let profile_path = self.profiles_dir.join(name);

        if profile_path.exists() {
            anyhow::bail!("Profile '{}' already exists", name);
        }

        fs::create_dir_all(&profile_path)?;
        write_metadata(&profile_path, name, browser)?;

        info!("Created profile '{}' for {}", name, browser);
        Ok(profile_path)
    }

    /// Resolve a profile path for a session, creating the profile on demand
    ///
    /// Touches the last-used timestamp so stale profiles stay identifiable.
    pub fn get_or_create(&self, name: &str, browser: &str) -> Result<PathBuf> {
        let profile_path = self.profiles_dir.join(name);

        if !profile_path.exists() {
            debug!("Profile '{}' does not exist yet, creating it", name);
            return self.create_profile(name, browser);
        }

        let metadata_path = profile_path.join("metadata.json");
        if metadata_path.exists() {
            let metadata_json = fs::read_to_string(&metadata_path)?;
            let mut metadata: ProfileMetadata = serde_json::from_str(&metadata_json)?;
            metadata.last_used = Utc::now();
            let updated_json = serde_json::to_string_pretty(&metadata)?;
            fs::write(metadata_path, updated_json)?;
        }

        Ok(profile_path)
    }

    pub fn delete_profile(&self, name: &str) -> Result<()> {
        let profile_path = self.profiles_dir.join(name);

        if !profile_path.exists() {
            anyhow::bail!("Profile '{}' does not exist", name);
        }

        fs::remove_dir_all(&profile_path)?;
        info!("Deleted profile '{}'", name);
        Ok(())
    }

    pub fn list_profiles(&self) -> Result<Vec<ProfileMetadata>> {
        let mut profiles = Vec::new();

        for entry in fs::read_dir(&self.profiles_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                let metadata_path = path.join("metadata.json");
                if metadata_path.exists() {
                    let metadata_json = fs::read_to_string(metadata_path)?;
                    let metadata: ProfileMetadata = serde_json::from_str(&metadata_json)?;
                    profiles.push(metadata);
                }
            }
        }

        profiles.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        Ok(profiles)
    }
}

fn write_metadata(profile_path: &Path, name: &str, browser: &str) -> Result<()> {
    let metadata = ProfileMetadata {
        name: name.to_string(),
        browser: browser.to_string(),
        created_at: Utc::now(),
        last_used: Utc::now(),
    };

    let metadata_path = profile_path.join("metadata.json");
    let metadata_json = serde_json::to_string_pretty(&metadata)?;
    fs::write(metadata_path, metadata_json)?;
    Ok(())
}
