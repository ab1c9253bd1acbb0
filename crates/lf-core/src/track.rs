//! Layer Tracks
//!
//! A [`LayerTrack`] describes one playable music piece: an ordered list of
//! audio-clip layers, the policy for blending them against the current layer
//! index, playback defaults, and scene-trigger metadata.
//!
//! Layer index position is semantically meaningful: it is the layer "depth"
//! the runtime raises and lowers.

use crate::MAX_DEFAULT_FADE_SECS;
use serde::{Deserialize, Serialize};

/// Reference to an audio clip asset, by path or id.
///
/// An empty reference marks an authored layer slot with no clip behind it;
/// such a layer is never made audible and never an error.
pub type ClipRef = String;

/// How layers blend against the current layer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Every layer whose index <= current layer is audible simultaneously.
    #[default]
    Additive,
    /// Exactly one layer, the current one, is audible; all others muted.
    Single,
}

/// A music piece composed of layers. Immutable once authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerTrack {
    /// Track identifier
    pub name: String,
    /// Authoring note
    #[serde(default)]
    pub description: String,
    /// Ordered clip references, one per layer depth
    pub layers: Vec<ClipRef>,
    /// Secondary ordered clip set for callers that walk layers automatically.
    /// Not consumed by the crossfade director.
    #[serde(default)]
    pub layers_to_auto_pass: Vec<ClipRef>,
    /// Blend policy
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Whether playback restarts automatically at end of clip
    #[serde(default = "default_true")]
    pub looping: bool,
    /// Whether this track starts when its target scene is entered
    #[serde(default)]
    pub play_on_scene_enter: bool,
    /// Target scene index for `play_on_scene_enter`
    #[serde(default)]
    pub scene_to_enter: usize,
    /// Whether any scene change halts this track
    #[serde(default)]
    pub stop_on_scene_change: bool,
    /// Authored volume, read through the clamping accessor
    #[serde(default = "default_volume")]
    default_volume: f32,
    /// Authored fade time in seconds, read through the clamping accessor
    #[serde(default)]
    default_fade_time: f32,
}

fn default_volume() -> f32 {
    1.0
}
fn default_true() -> bool {
    true
}

impl LayerTrack {
    /// Create a track from its name and ordered layer clips.
    pub fn new(name: &str, layers: Vec<ClipRef>) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            layers,
            layers_to_auto_pass: Vec::new(),
            blend_mode: BlendMode::Additive,
            looping: true,
            play_on_scene_enter: false,
            scene_to_enter: 0,
            stop_on_scene_change: false,
            default_volume: 1.0,
            default_fade_time: 0.0,
        }
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Set the authored volume, clamped to [0, 1].
    pub fn with_default_volume(mut self, volume: f32) -> Self {
        self.default_volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Set the authored fade time, clamped to [0, 20] seconds.
    pub fn with_default_fade_time(mut self, seconds: f32) -> Self {
        self.default_fade_time = seconds.clamp(0.0, MAX_DEFAULT_FADE_SECS);
        self
    }

    /// Flag the track to start when `scene_index` is entered.
    pub fn with_scene_enter(mut self, scene_index: usize) -> Self {
        self.play_on_scene_enter = true;
        self.scene_to_enter = scene_index;
        self
    }

    pub fn with_stop_on_scene_change(mut self, stop: bool) -> Self {
        self.stop_on_scene_change = stop;
        self
    }

    pub fn with_auto_pass(mut self, layers: Vec<ClipRef>) -> Self {
        self.layers_to_auto_pass = layers;
        self
    }

    /// Authored volume in [0, 1]. Out-of-range authored data is clamped,
    /// never rejected.
    pub fn default_volume(&self) -> f32 {
        self.default_volume.clamp(0.0, 1.0)
    }

    /// Authored fade time in [0, 20] seconds.
    pub fn default_fade_time(&self) -> f32 {
        self.default_fade_time.clamp(0.0, MAX_DEFAULT_FADE_SECS)
    }

    /// Number of authored layer slots (including empty ones).
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Clip reference at `index`, or `None` when the index is out of range
    /// or the slot is empty.
    pub fn clip_at(&self, index: usize) -> Option<&str> {
        match self.layers.get(index) {
            Some(clip) if !clip.is_empty() => Some(clip.as_str()),
            _ => None,
        }
    }

    /// Whether layer `index` has a clip behind it.
    pub fn has_clip(&self, index: usize) -> bool {
        self.clip_at(index).is_some()
    }

    /// Target volume table for all layers given the current layer index.
    ///
    /// Additive: layers 0..=current audible at the authored volume.
    /// Single: only the current layer audible.
    /// Empty clip slots are always 0.
    pub fn blend_volumes(&self, current_layer: usize) -> Vec<f32> {
        (0..self.layers.len())
            .map(|i| self.layer_target(i, current_layer))
            .collect()
    }

    /// Target volume for one layer given the current layer index.
    pub fn layer_target(&self, index: usize, current_layer: usize) -> f32 {
        if !self.has_clip(index) {
            return 0.0;
        }
        let audible = match self.blend_mode {
            BlendMode::Additive => index <= current_layer,
            BlendMode::Single => index == current_layer,
        };
        if audible {
            self.default_volume()
        } else {
            0.0
        }
    }

    /// Validate authored invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Track name cannot be empty".to_string());
        }
        if self.layers.is_empty() {
            return Err(format!("Track '{}' must have at least one layer", self.name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_track(blend_mode: BlendMode) -> LayerTrack {
        LayerTrack::new(
            "combat",
            vec!["pad.ogg".into(), "drums.ogg".into(), "lead.ogg".into()],
        )
        .with_blend_mode(blend_mode)
        .with_default_volume(0.8)
    }

    #[test]
    fn test_additive_blend() {
        let track = test_track(BlendMode::Additive);

        let volumes = track.blend_volumes(1);
        assert_relative_eq!(volumes[0], 0.8);
        assert_relative_eq!(volumes[1], 0.8);
        assert_relative_eq!(volumes[2], 0.0);
    }

    #[test]
    fn test_single_blend() {
        let track = test_track(BlendMode::Single);

        let volumes = track.blend_volumes(1);
        assert_relative_eq!(volumes[0], 0.0);
        assert_relative_eq!(volumes[1], 0.8);
        assert_relative_eq!(volumes[2], 0.0);
    }

    #[test]
    fn test_empty_clip_never_audible() {
        let track = LayerTrack::new(
            "sparse",
            vec!["pad.ogg".into(), String::new(), "lead.ogg".into()],
        );

        let volumes = track.blend_volumes(2);
        assert_relative_eq!(volumes[0], 1.0);
        assert_relative_eq!(volumes[1], 0.0);
        assert_relative_eq!(volumes[2], 1.0);
        assert!(!track.has_clip(1));
    }

    #[test]
    fn test_cursor_past_layer_count() {
        // The director clamps to its own ceiling, which may exceed a short
        // track's layer count; the table stays well defined.
        let additive = test_track(BlendMode::Additive);
        assert!(additive.blend_volumes(9).iter().all(|v| (*v - 0.8).abs() < 1e-6));

        let single = test_track(BlendMode::Single);
        assert!(single.blend_volumes(9).iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_authored_values_clamped() {
        let track = LayerTrack::new("loud", vec!["a.ogg".into()])
            .with_default_volume(3.0)
            .with_default_fade_time(-4.0);
        assert_relative_eq!(track.default_volume(), 1.0);
        assert_relative_eq!(track.default_fade_time(), 0.0);

        let track = track.with_default_fade_time(99.0);
        assert_relative_eq!(track.default_fade_time(), MAX_DEFAULT_FADE_SECS);
    }

    #[test]
    fn test_clip_at() {
        let track = test_track(BlendMode::Additive);
        assert_eq!(track.clip_at(1), Some("drums.ogg"));
        assert_eq!(track.clip_at(3), None);
    }

    #[test]
    fn test_validate() {
        assert!(test_track(BlendMode::Additive).validate().is_ok());
        assert!(LayerTrack::new("empty", Vec::new()).validate().is_err());
        assert!(LayerTrack::new("", vec!["a.ogg".into()]).validate().is_err());
    }
}
