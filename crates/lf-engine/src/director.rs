//! Crossfade Director
//!
//! The orchestrator holding exactly two player slots. Successive tracks
//! alternate between the slots: every stop fades the active slot out and
//! flips the active designation, so the next play lands on the slot that is
//! already silent while the old track finishes its fade-out asynchronously.
//! That double-buffering is what makes back-to-back stop/play calls
//! glitch-free.
//!
//! The director is an explicitly constructed object: create one at startup,
//! hand it to whatever issues playback commands, and drop it at teardown.

use crate::slot::{PlayerSlot, RampSlot};
use crate::{EngineError, EngineResult, DEFAULT_LAYER_COUNT, MAX_LAYER_COUNT};
use lf_core::LayerTrack;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

/// Director behavior switches, fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorConfig {
    /// How many layer indices the director accepts. Clamped to
    /// [1, `MAX_LAYER_COUNT`]; immutable after construction.
    #[serde(default = "default_layer_count")]
    pub max_layer_count: usize,
    /// Suppress all playback while still validating and logging commands.
    #[serde(default)]
    pub use_null_player: bool,
    /// Log every accepted command at info level.
    #[serde(default)]
    pub log_commands: bool,
}

fn default_layer_count() -> usize {
    DEFAULT_LAYER_COUNT
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            max_layer_count: DEFAULT_LAYER_COUNT,
            use_null_player: false,
            log_commands: false,
        }
    }
}

/// Two-slot crossfade orchestrator.
///
/// Generic over the slot implementation so the playback primitive stays an
/// external collaborator; defaults to the reference [`RampSlot`].
pub struct CrossfadeDirector<S: PlayerSlot = RampSlot> {
    slot_a: S,
    slot_b: S,
    active_is_a: bool,
    /// Most recently played track. Weak: the director never keeps an asset
    /// alive on its own.
    current_track: Weak<LayerTrack>,
    current_layer: usize,
    config: DirectorConfig,
}

impl CrossfadeDirector {
    /// Create a director around two reference slots.
    pub fn new(config: DirectorConfig) -> Self {
        Self::with_slots(config, RampSlot::new(), RampSlot::new())
    }
}

impl<S: PlayerSlot> CrossfadeDirector<S> {
    /// Create a director around two caller-supplied slots.
    pub fn with_slots(mut config: DirectorConfig, slot_a: S, slot_b: S) -> Self {
        config.max_layer_count = config.max_layer_count.clamp(1, MAX_LAYER_COUNT);
        Self {
            slot_a,
            slot_b,
            active_is_a: true,
            current_track: Weak::new(),
            current_layer: 0,
            config,
        }
    }

    /// Play a track from its first layer, fading it in over `fade_time`
    /// seconds. Stops (and crossfades out) whatever was playing.
    pub fn play(&mut self, track: &Arc<LayerTrack>, fade_time: f32) -> EngineResult<()> {
        if self
            .active_slot()
            .current_track()
            .is_some_and(|t| Arc::ptr_eq(t, track))
        {
            log::warn!("play rejected: '{}' is already playing", track.name);
            return Err(EngineError::AlreadyPlaying);
        }
        self.check_fade_time(fade_time)?;

        if self.config.log_commands {
            log::info!("play '{}' with a fade time of {}s", track.name, fade_time);
        }
        if self.config.use_null_player {
            return Ok(());
        }

        self.play_unchecked(track, fade_time);
        Ok(())
    }

    /// Stop the current track, fading it out over `fade_time` seconds.
    /// Flips the active/inactive slot designation.
    pub fn stop(&mut self, fade_time: f32) -> EngineResult<()> {
        if self.active_slot().current_track().is_none() {
            log::warn!("stop rejected: there is no track currently playing");
            return Err(EngineError::NothingPlaying);
        }
        self.check_fade_time(fade_time)?;

        if self.config.log_commands {
            log::info!("stop with a fade time of {fade_time}s");
        }
        if self.config.use_null_player {
            return Ok(());
        }

        self.stop_active(fade_time);
        Ok(())
    }

    /// Restart the most recently played track from the beginning, at the
    /// first layer, crossfading over `fade_time` seconds.
    pub fn replay(&mut self, fade_time: f32) -> EngineResult<()> {
        let Some(track) = self.current_track.upgrade() else {
            log::warn!("replay rejected: no track has ever played");
            return Err(EngineError::NothingEverPlayed);
        };
        self.check_fade_time(fade_time)?;

        if self.config.log_commands {
            log::info!("replay '{}' with a fade time of {}s", track.name, fade_time);
        }
        if self.config.use_null_player {
            return Ok(());
        }

        self.play_unchecked(&track, fade_time);
        Ok(())
    }

    /// Set the layer to play, refading the blend pattern over `fade_time`
    /// seconds. Out-of-range layers are silently clamped, never an error.
    /// The clip position is untouched — this is a remix, not a restart.
    pub fn set_layer(&mut self, new_layer: i32, fade_time: f32) -> EngineResult<()> {
        self.check_fade_time(fade_time)?;

        if self.config.log_commands {
            log::info!("set layer to {new_layer} with a fade time of {fade_time}s");
        }
        if self.config.use_null_player {
            return Ok(());
        }

        let max = self.config.max_layer_count as i32;
        self.current_layer = new_layer.clamp(0, max - 1) as usize;

        if self.active_slot().current_track().is_some() {
            let layer = self.current_layer;
            self.active_slot_mut().set_layer(layer, fade_time);
        }
        Ok(())
    }

    /// Go to the next layer.
    pub fn increase_layer(&mut self, fade_time: f32) -> EngineResult<()> {
        self.set_layer(self.current_layer as i32 + 1, fade_time)
    }

    /// Go to the previous layer.
    pub fn decrease_layer(&mut self, fade_time: f32) -> EngineResult<()> {
        self.set_layer(self.current_layer as i32 - 1, fade_time)
    }

    /// Advance in-progress fades on both slots by the frame's delta time.
    pub fn tick(&mut self, delta_seconds: f32) {
        self.slot_a.tick(delta_seconds);
        self.slot_b.tick(delta_seconds);
    }

    /// The slot currently designated active.
    pub fn active_slot(&self) -> &S {
        if self.active_is_a {
            &self.slot_a
        } else {
            &self.slot_b
        }
    }

    /// The slot currently designated inactive (silent, or mid fade-out from
    /// the previous track).
    pub fn inactive_slot(&self) -> &S {
        if self.active_is_a {
            &self.slot_b
        } else {
            &self.slot_a
        }
    }

    /// Which layer is active on the track currently playing.
    pub fn current_layer(&self) -> usize {
        self.current_layer
    }

    /// The track presently (or most recently) associated with the active
    /// slot, if the asset is still alive.
    pub fn current_track(&self) -> Option<Arc<LayerTrack>> {
        self.current_track.upgrade()
    }

    /// Whether slot A is the active one
    pub fn active_is_a(&self) -> bool {
        self.active_is_a
    }

    /// The layer index ceiling set at construction
    pub fn max_layer_count(&self) -> usize {
        self.config.max_layer_count
    }

    fn active_slot_mut(&mut self) -> &mut S {
        if self.active_is_a {
            &mut self.slot_a
        } else {
            &mut self.slot_b
        }
    }

    fn check_fade_time(&self, fade_time: f32) -> EngineResult<()> {
        if fade_time < 0.0 {
            log::warn!("rejected: the fade time can't be negative ({fade_time}s)");
            return Err(EngineError::NegativeFadeTime(fade_time));
        }
        Ok(())
    }

    /// Shared tail of play/replay: validation already done.
    fn play_unchecked(&mut self, track: &Arc<LayerTrack>, fade_time: f32) {
        // Fade the old track out first; the flip routes the new track to
        // the slot that is already silent.
        if self.active_slot().current_track().is_some() {
            self.stop_active(fade_time);
        }

        self.current_layer = 0;
        self.current_track = Arc::downgrade(track);
        let handle = Arc::clone(track);
        self.active_slot_mut().play(handle, 0, fade_time);
    }

    fn stop_active(&mut self, fade_time: f32) {
        self.active_slot_mut().stop(fade_time);
        self.active_is_a = !self.active_is_a;
    }
}
