// Profile persistence - a flat JSON file of named device pairs

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A saved playback/recording device pair.
///
/// Field keys keep the historical on-disk spelling so existing
/// `audioprofiles.json` files load unchanged. Device names are display
/// snapshots; only the ids matter when a profile is applied. The device
/// fields default to empty strings so a hand-edited entry missing one of
/// them still loads (an empty id simply fails the existence check at
/// apply time); the name stays required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "ProfileName")]
    pub name: String,
    #[serde(rename = "PlaybackDeviceID", default)]
    pub playback_device_id: String,
    #[serde(rename = "PlaybackDeviceName", default)]
    pub playback_device_name: String,
    #[serde(rename = "RecordingDeviceID", default)]
    pub recording_device_id: String,
    #[serde(rename = "RecordingDeviceName", default)]
    pub recording_device_name: String,
}

/// File-backed store for the full profile sequence. The whole file is
/// rewritten on every save; nothing is cached between calls.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Create a store over the given file path. The file does not need
    /// to exist yet.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored profiles in file order.
    ///
    /// Never fails: a missing or empty file is an empty list, and a
    /// malformed file is recovered as an empty list with a warning.
    pub fn load(&self) -> Vec<Profile> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read {:?}: {}; treating as empty", self.path, e);
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        let parsed = serde_json::from_str::<Value>(&content)
            .ok()
            .and_then(normalize_payload);

        match parsed {
            Some(profiles) => profiles,
            None => {
                warn!(
                    "{:?} does not contain a recognizable profile list; starting empty",
                    self.path
                );
                Vec::new()
            }
        }
    }

    /// Persist the full sequence, overwriting the file via temp file +
    /// rename. An empty sequence is written as a literal `[]`.
    pub fn save(&self, profiles: &[Profile]) -> Result<()> {
        let content = serde_json::to_string_pretty(profiles)
            .context("Failed to serialize profiles")?;

        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)
                .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write {:?}", temp_path))?;
            file.sync_all()
                .with_context(|| format!("Failed to sync {:?}", temp_path))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            anyhow::anyhow!("Failed to move {:?} into place: {}", self.path, e)
        })?;

        info!("Saved {} profile(s) to {:?}", profiles.len(), self.path);
        Ok(())
    }
}

/// Normalize any accepted on-disk shape into the canonical profile list.
///
/// Accepts an array of profile objects, or a single bare object (a
/// hand-edited store); entries may omit device fields, which load as
/// empty strings. Anything else, including an entry without a name, is
/// rejected to `None` and the caller falls back to an empty list.
pub fn normalize_payload(value: Value) -> Option<Vec<Profile>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).ok())
            .collect(),
        Value::Object(_) => serde_json::from_value(value).ok().map(|profile| vec![profile]),
        _ => None,
    }
}
