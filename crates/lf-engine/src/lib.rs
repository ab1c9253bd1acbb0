//! # Layerfade Engine
//!
//! Frame-driven, two-slot crossfade runtime for layered music tracks.
//!
//! ## Architecture
//!
//! - **Fades**: linear volume ramps advanced once per frame tick
//! - **Slots**: two player slots (A/B) double-buffering *successive* tracks,
//!   so a new track fades in on one slot while the old one is still fading
//!   out on the other
//! - **Director**: validates commands, swaps the active slot on every stop,
//!   and tracks the current layer index
//! - **Scene binder**: stops/starts tracks on scene-loaded notifications
//! - **Preview**: author-time audition against caller-supplied voices,
//!   bypassing the director entirely
//!
//! All state transitions happen on the caller's thread, either in response
//! to a discrete command or in the once-per-frame [`CrossfadeDirector::tick`].
//! There is no locking; correctness rests on call-order discipline.

pub mod director;
pub mod fade;
pub mod preview;
pub mod scene;
pub mod slot;

pub use director::*;
pub use fade::*;
pub use preview::*;
pub use scene::*;
pub use slot::*;

use thiserror::Error;

/// Engine error types.
///
/// Every failure is a validation failure: the call becomes a no-op and no
/// partial state change occurs. There are no fatal conditions in this core.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum EngineError {
    #[error("This track is already playing")]
    AlreadyPlaying,

    #[error("There is no track currently playing")]
    NothingPlaying,

    #[error("The fade time can't be negative (got {0}s)")]
    NegativeFadeTime(f32),

    #[error("No track has ever played")]
    NothingEverPlayed,
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Hard ceiling for the configurable per-director layer count
pub const MAX_LAYER_COUNT: usize = 10;

/// Default per-director layer count
pub const DEFAULT_LAYER_COUNT: usize = 3;
