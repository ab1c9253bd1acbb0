//! Track Banks
//!
//! Load and save track banks (the authored track collection) from/to JSON.
//! The bank is what the excluded asset pipeline hands to the runtime; clip
//! references inside it are resolved elsewhere.

use crate::track::LayerTrack;
use crate::{BankError, BankResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Bank format version
pub const BANK_VERSION: &str = "1.0";

/// A versioned collection of authored layer tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackBank {
    /// Bank format version
    pub version: String,
    /// Author name
    #[serde(default)]
    pub author: String,
    /// Tracks, in authored order. Order matters for the auto-play scan.
    #[serde(default)]
    pub tracks: Vec<LayerTrack>,
}

impl Default for TrackBank {
    fn default() -> Self {
        Self {
            version: BANK_VERSION.to_string(),
            author: String::new(),
            tracks: Vec::new(),
        }
    }
}

impl TrackBank {
    /// Create a new empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a bank from a JSON string
    pub fn from_json(json: &str) -> BankResult<Self> {
        let raw: serde_json::Value = serde_json::from_str(json)?;

        let version = raw["version"].as_str().unwrap_or(BANK_VERSION);
        if version != BANK_VERSION {
            return Err(BankError::UnknownVersion(version.to_string()));
        }

        let bank: Self = serde_json::from_value(raw)?;
        log::debug!("loaded track bank: {} tracks", bank.tracks.len());
        Ok(bank)
    }

    /// Save the bank to pretty-printed JSON
    pub fn to_json(&self) -> BankResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the bank to compact JSON
    pub fn to_json_compact(&self) -> BankResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Add a track
    pub fn add_track(&mut self, track: LayerTrack) {
        self.tracks.push(track);
    }

    /// Get a track by name
    pub fn get(&self, name: &str) -> Option<&LayerTrack> {
        self.tracks.iter().find(|t| t.name == name)
    }

    /// Number of tracks in the bank
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the bank is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks flagged to start on a scene entry, in authored order.
    pub fn auto_play_tracks(&self) -> impl Iterator<Item = &LayerTrack> {
        self.tracks.iter().filter(|t| t.play_on_scene_enter)
    }

    /// Promote the authored tracks to shared handles for the runtime.
    ///
    /// Call once and keep the result: handle identity is what the runtime
    /// uses to detect "already playing".
    pub fn shared_tracks(&self) -> Vec<Arc<LayerTrack>> {
        self.tracks.iter().cloned().map(Arc::new).collect()
    }

    /// Validate the bank, collecting every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for track in &self.tracks {
            if let Err(e) = track.validate() {
                errors.push(e);
            }
        }

        let mut seen = HashSet::new();
        for track in &self.tracks {
            if !track.name.is_empty() && !seen.insert(track.name.as_str()) {
                errors.push(format!("Duplicate track name: '{}'", track.name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
