//! Player Slots
//!
//! A slot owns the playback of one [`LayerTrack`] instance: it renders or
//! mutes individual layers per the track's blend policy and performs linear
//! fades of its layer volumes. The director owns exactly two slots and is
//! the only component allowed to command them.

use crate::fade::{lerp, Ramp};
use lf_core::LayerTrack;
use std::sync::Arc;

/// Playback contract the director depends on.
///
/// The actual buffer mixing lives behind this trait; [`RampSlot`] is a
/// reference implementation that models volumes without touching audio.
pub trait PlayerSlot {
    /// Begin playing `track` with the blend pattern for `layer`, fading the
    /// audible layers in from silence over `fade_time` seconds. Restarts
    /// clip positions.
    fn play(&mut self, track: Arc<LayerTrack>, layer: usize, fade_time: f32);

    /// Fade the aggregate output to silence over `fade_time` seconds, then
    /// release the track.
    fn stop(&mut self, fade_time: f32);

    /// Re-apply the per-layer audibility pattern for `layer` with a fade.
    /// Unlike [`PlayerSlot::play`] this never restarts clip positions — it
    /// is a remix of what is already sounding.
    fn set_layer(&mut self, layer: usize, fade_time: f32);

    /// The track this slot is playing or fading out, if any.
    fn current_track(&self) -> Option<&Arc<LayerTrack>>;

    /// Advance any in-progress fade by the frame's delta time.
    fn tick(&mut self, delta_seconds: f32);
}

/// Reference slot implementation: per-layer linear volume ramps.
///
/// One ramp at a time; a new command snapshots the current volumes and
/// retargets, replacing whatever fade was in progress.
#[derive(Debug, Default)]
pub struct RampSlot {
    track: Option<Arc<LayerTrack>>,
    from: Vec<f32>,
    target: Vec<f32>,
    current: Vec<f32>,
    ramp: Option<Ramp>,
    releasing: bool,
    restart_count: u32,
}

impl RampSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current volume of layer `index`, 0 when out of range.
    pub fn layer_volume(&self, index: usize) -> f32 {
        self.current.get(index).copied().unwrap_or(0.0)
    }

    /// Loudest current layer volume. The slot's aggregate output follows it.
    pub fn aggregate_volume(&self) -> f32 {
        self.current.iter().copied().fold(0.0, f32::max)
    }

    /// Whether a fade is in progress
    pub fn is_fading(&self) -> bool {
        self.ramp.is_some()
    }

    /// How many times this slot restarted playback from the top. Bumps on
    /// `play` only — `set_layer` remixes without restarting.
    pub fn restart_count(&self) -> u32 {
        self.restart_count
    }

    fn retarget(&mut self, target: Vec<f32>, fade_time: f32) {
        self.from = self.current.clone();
        self.target = target;
        self.ramp = Some(Ramp::new(fade_time));
    }
}

impl PlayerSlot for RampSlot {
    fn play(&mut self, track: Arc<LayerTrack>, layer: usize, fade_time: f32) {
        let target = track.blend_volumes(layer);
        let layer_count = track.layer_count();

        self.track = Some(track);
        self.releasing = false;
        self.restart_count += 1;

        // Fresh playback starts from silence regardless of what the slot
        // was doing before.
        self.current = vec![0.0; layer_count];
        self.from = vec![0.0; layer_count];
        self.target = target;
        self.ramp = Some(Ramp::new(fade_time));
    }

    fn stop(&mut self, fade_time: f32) {
        if self.track.is_none() {
            return;
        }
        let silence = vec![0.0; self.current.len()];
        self.retarget(silence, fade_time);
        self.releasing = true;
    }

    fn set_layer(&mut self, layer: usize, fade_time: f32) {
        let Some(track) = &self.track else {
            return;
        };
        let target = track.blend_volumes(layer);
        self.retarget(target, fade_time);
    }

    fn current_track(&self) -> Option<&Arc<LayerTrack>> {
        self.track.as_ref()
    }

    fn tick(&mut self, delta_seconds: f32) {
        let Some(ramp) = &mut self.ramp else {
            return;
        };
        let done = ramp.advance(delta_seconds);
        let t = ramp.progress();

        for (i, volume) in self.current.iter_mut().enumerate() {
            *volume = lerp(self.from[i], self.target[i], t);
        }

        if done {
            self.ramp = None;
            if self.releasing {
                self.track = None;
                self.releasing = false;
                self.current.clear();
                self.from.clear();
                self.target.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lf_core::BlendMode;

    fn test_track() -> Arc<LayerTrack> {
        Arc::new(
            LayerTrack::new(
                "combat",
                vec!["pad.ogg".into(), "drums.ogg".into(), "lead.ogg".into()],
            )
            .with_default_volume(0.8),
        )
    }

    #[test]
    fn test_play_fades_in() {
        let mut slot = RampSlot::new();
        slot.play(test_track(), 0, 2.0);

        assert_relative_eq!(slot.layer_volume(0), 0.0);

        slot.tick(1.0);
        assert_relative_eq!(slot.layer_volume(0), 0.4);
        assert_relative_eq!(slot.layer_volume(1), 0.0);

        slot.tick(1.0);
        assert_relative_eq!(slot.layer_volume(0), 0.8);
        assert!(!slot.is_fading());
    }

    #[test]
    fn test_zero_fade_is_a_cut() {
        let mut slot = RampSlot::new();
        slot.play(test_track(), 1, 0.0);
        slot.tick(0.016);
        assert_relative_eq!(slot.layer_volume(0), 0.8);
        assert_relative_eq!(slot.layer_volume(1), 0.8);
    }

    #[test]
    fn test_stop_releases_after_fade() {
        let mut slot = RampSlot::new();
        slot.play(test_track(), 0, 0.0);
        slot.tick(0.016);

        slot.stop(1.0);
        assert!(slot.current_track().is_some(), "still fading out");

        slot.tick(0.5);
        assert_relative_eq!(slot.layer_volume(0), 0.4);
        assert!(slot.current_track().is_some());

        slot.tick(0.5);
        assert!(slot.current_track().is_none(), "released once silent");
        assert_relative_eq!(slot.aggregate_volume(), 0.0);
    }

    #[test]
    fn test_set_layer_remixes_without_restart() {
        let mut slot = RampSlot::new();
        slot.play(test_track(), 0, 0.0);
        slot.tick(0.016);
        assert_eq!(slot.restart_count(), 1);

        slot.set_layer(2, 1.0);
        assert_eq!(slot.restart_count(), 1);

        slot.tick(1.0);
        assert_relative_eq!(slot.layer_volume(0), 0.8);
        assert_relative_eq!(slot.layer_volume(1), 0.8);
        assert_relative_eq!(slot.layer_volume(2), 0.8);
    }

    #[test]
    fn test_single_blend_swaps_audible_layer() {
        let track = Arc::new(
            LayerTrack::new("single", vec!["a.ogg".into(), "b.ogg".into()])
                .with_blend_mode(BlendMode::Single),
        );
        let mut slot = RampSlot::new();
        slot.play(track, 0, 0.0);
        slot.tick(0.016);

        slot.set_layer(1, 2.0);
        slot.tick(1.0);
        assert_relative_eq!(slot.layer_volume(0), 0.5);
        assert_relative_eq!(slot.layer_volume(1), 0.5);

        slot.tick(1.0);
        assert_relative_eq!(slot.layer_volume(0), 0.0);
        assert_relative_eq!(slot.layer_volume(1), 1.0);
    }

    #[test]
    fn test_new_fade_replaces_in_progress_fade() {
        let mut slot = RampSlot::new();
        slot.play(test_track(), 0, 2.0);
        slot.tick(1.0); // layer 0 at 0.4, mid fade-in

        // Retarget mid-fade: snapshot 0.4, ramp to the layer-1 pattern.
        slot.set_layer(1, 1.0);
        slot.tick(0.5);
        assert_relative_eq!(slot.layer_volume(0), 0.6);
        assert_relative_eq!(slot.layer_volume(1), 0.4);

        slot.tick(0.5);
        assert_relative_eq!(slot.layer_volume(0), 0.8);
        assert_relative_eq!(slot.layer_volume(1), 0.8);
    }
}
