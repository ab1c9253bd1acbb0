//! # Layerfade Core
//!
//! Authoring-side data model for the layered music system.
//!
//! - **Tracks**: immutable descriptions of one playable music piece — its
//!   ordered layers, blend policy, defaults, and scene-trigger metadata
//! - **Banks**: versioned JSON collections of tracks, the unit the asset
//!   pipeline hands to the runtime
//!
//! Tracks are authored once and never mutated at runtime. Numeric authoring
//! values are clamped into range on access, never asserted away.

pub mod bank;
pub mod track;

pub use bank::*;
pub use track::*;

use thiserror::Error;

/// Core error types
#[derive(Debug, Error)]
pub enum BankError {
    #[error("Unknown bank version: {0}")]
    UnknownVersion(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type BankResult<T> = Result<T, BankError>;

/// Upper bound for an authored default fade time, in seconds
pub const MAX_DEFAULT_FADE_SECS: f32 = 20.0;
