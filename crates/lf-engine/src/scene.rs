//! Scene Lifecycle Binding
//!
//! Reacts to scene-loaded notifications from the host: stops the current
//! track when it is flagged stop-on-scene-change, then starts at most one
//! auto-play track whose target scene matches the newly loaded scene. The
//! binder never initiates scene loads itself and never lets a playback
//! failure escape a scene load.

use crate::director::CrossfadeDirector;
use crate::slot::PlayerSlot;
use lf_core::LayerTrack;
use std::sync::Arc;

/// Binds scene-loaded notifications to director commands.
pub struct SceneLifecycleBinder {
    /// Auto-play candidates, scanned in authored order
    auto_play: Vec<Arc<LayerTrack>>,
}

impl SceneLifecycleBinder {
    /// Create a binder from an explicit auto-play list.
    pub fn new(auto_play: Vec<Arc<LayerTrack>>) -> Self {
        Self { auto_play }
    }

    /// Create a binder from a shared track list, keeping only the tracks
    /// flagged for scene entry, in their authored order.
    pub fn from_tracks(tracks: &[Arc<LayerTrack>]) -> Self {
        Self::new(
            tracks
                .iter()
                .filter(|t| t.play_on_scene_enter)
                .cloned()
                .collect(),
        )
    }

    /// Number of auto-play candidates
    pub fn auto_play_count(&self) -> usize {
        self.auto_play.len()
    }

    /// Handle a scene-loaded notification carrying the new scene's index.
    pub fn scene_loaded<S: PlayerSlot>(
        &self,
        director: &mut CrossfadeDirector<S>,
        scene_index: usize,
    ) {
        if let Some(current) = director.current_track() {
            if current.stop_on_scene_change
                && director.active_slot().current_track().is_some()
            {
                if let Err(err) = director.stop(0.0) {
                    log::warn!("scene {scene_index}: stop on scene change failed: {err}");
                }
            }
        }

        // At most one auto-play track starts per scene load.
        for track in &self.auto_play {
            if track.play_on_scene_enter && track.scene_to_enter == scene_index {
                if let Err(err) = director.play(track, track.default_fade_time()) {
                    log::warn!(
                        "scene {scene_index}: auto-play of '{}' failed: {err}",
                        track.name
                    );
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::director::DirectorConfig;
    use approx::assert_relative_eq;

    fn scene_track(name: &str, scene: usize) -> Arc<LayerTrack> {
        Arc::new(
            LayerTrack::new(name, vec![format!("{name}.ogg")])
                .with_scene_enter(scene)
                .with_default_fade_time(1.0),
        )
    }

    #[test]
    fn test_stop_on_scene_change_then_auto_play() {
        let mut director = CrossfadeDirector::new(DirectorConfig::default());
        let menu = Arc::new(
            LayerTrack::new("menu", vec!["menu.ogg".into()]).with_stop_on_scene_change(true),
        );
        let level = scene_track("level", 2);
        let binder = SceneLifecycleBinder::new(vec![level.clone()]);

        director.play(&menu, 0.0).unwrap();
        director.tick(0.016);
        let flips_before = director.active_is_a();

        binder.scene_loaded(&mut director, 2);

        // Stop happened with zero fade (one flip), then the auto-play scan
        // started the level track with its authored default fade.
        assert_ne!(director.active_is_a(), flips_before);
        assert!(Arc::ptr_eq(&director.current_track().unwrap(), &level));
        director.tick(0.5);
        assert_relative_eq!(director.active_slot().layer_volume(0), 0.5);
    }

    #[test]
    fn test_track_without_flag_keeps_playing() {
        let mut director = CrossfadeDirector::new(DirectorConfig::default());
        let ambient = Arc::new(LayerTrack::new("ambient", vec!["amb.ogg".into()]));
        let binder = SceneLifecycleBinder::new(Vec::new());

        director.play(&ambient, 0.0).unwrap();
        binder.scene_loaded(&mut director, 5);

        assert!(Arc::ptr_eq(&director.current_track().unwrap(), &ambient));
    }

    #[test]
    fn test_at_most_one_auto_play_per_load() {
        let mut director = CrossfadeDirector::new(DirectorConfig::default());
        let first = scene_track("first", 3);
        let second = scene_track("second", 3);
        let binder = SceneLifecycleBinder::new(vec![first.clone(), second]);

        binder.scene_loaded(&mut director, 3);
        assert!(Arc::ptr_eq(&director.current_track().unwrap(), &first));
    }

    #[test]
    fn test_no_match_starts_nothing() {
        let mut director = CrossfadeDirector::new(DirectorConfig::default());
        let binder = SceneLifecycleBinder::new(vec![scene_track("level", 2)]);

        binder.scene_loaded(&mut director, 7);
        assert!(director.current_track().is_none());
    }

    #[test]
    fn test_from_tracks_filters_flagged() {
        let flagged = scene_track("flagged", 1);
        let plain = Arc::new(LayerTrack::new("plain", vec!["p.ogg".into()]));
        let binder = SceneLifecycleBinder::from_tracks(&[plain, flagged]);
        assert_eq!(binder.auto_play_count(), 1);
    }
}
