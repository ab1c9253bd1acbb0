//! Preview Sub-Mode
//!
//! Author-time audition path. Operates on a caller-supplied array of
//! independent playback voices, one per layer index, bypassing the two-slot
//! crossfade machinery entirely. Previews never run concurrently with the
//! real director.
//!
//! The author cursor lives on [`TrackPreview`], not on the track asset,
//! so tracks stay immutable.

use lf_core::LayerTrack;
use std::sync::Arc;

/// One independent preview playback voice. The caller supplies one voice
/// per layer index.
pub trait PreviewVoice {
    /// Bind a clip to this voice with the given loop flag.
    fn assign(&mut self, clip: &str, looping: bool);

    /// Start playback from the top.
    fn start(&mut self);

    /// Halt playback.
    fn halt(&mut self);

    /// Set the voice's output volume.
    fn set_volume(&mut self, volume: f32);
}

/// Auditions one track against a voice array, holding the author cursor.
pub struct TrackPreview {
    track: Arc<LayerTrack>,
    cursor: usize,
}

impl TrackPreview {
    pub fn new(track: Arc<LayerTrack>) -> Self {
        Self { track, cursor: 0 }
    }

    /// The author-facing layer cursor
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn track(&self) -> &Arc<LayerTrack> {
        &self.track
    }

    /// Start every layer's voice at volume 0 with the track's loop flag,
    /// then apply the blend pattern. All layers start immediately, muted
    /// according to blend policy — there is no fade-in.
    pub fn play_preview<V: PreviewVoice>(&self, voices: &mut [V]) {
        for (i, clip) in self.track.layers.iter().enumerate() {
            if clip.is_empty() {
                continue;
            }
            let Some(voice) = voices.get_mut(i) else {
                continue;
            };
            voice.assign(clip, self.track.looping);
            voice.set_volume(0.0);
            voice.start();
        }

        self.apply_blend(voices);
    }

    /// Halt every voice unconditionally.
    pub fn stop_preview<V: PreviewVoice>(&self, voices: &mut [V]) {
        for voice in voices {
            voice.halt();
        }
    }

    /// Move the cursor up one layer and remix. No restart, just volumes.
    pub fn increase_layer_preview<V: PreviewVoice>(&mut self, voices: &mut [V]) {
        self.cursor = (self.cursor + 1).min(self.track.layer_count().saturating_sub(1));
        log::debug!("preview layer: {}", self.cursor);
        self.apply_blend(voices);
    }

    /// Move the cursor down one layer and remix.
    pub fn decrease_layer_preview<V: PreviewVoice>(&mut self, voices: &mut [V]) {
        self.cursor = self.cursor.saturating_sub(1);
        log::debug!("preview layer: {}", self.cursor);
        self.apply_blend(voices);
    }

    fn apply_blend<V: PreviewVoice>(&self, voices: &mut [V]) {
        for (i, volume) in self.track.blend_volumes(self.cursor).iter().enumerate() {
            if !self.track.has_clip(i) {
                continue;
            }
            if let Some(voice) = voices.get_mut(i) {
                voice.set_volume(*volume);
            }
        }
    }
}
