//! Fade Ramps
//!
//! A fade is not a blocking call: a command retargets volumes and returns
//! immediately; the ramp is advanced incrementally on every subsequent frame
//! tick until elapsed time reaches the duration, at which point it
//! terminates itself. Only one ramp per slot is ever active — starting a new
//! fade cancels and replaces the one in progress, never queues behind it.

/// Linear volume ramp clock.
#[derive(Debug, Clone, Copy)]
pub struct Ramp {
    elapsed: f32,
    duration: f32,
}

impl Ramp {
    /// Start a ramp over `duration` seconds. A zero duration completes on
    /// the first progress read, which is what makes fade time 0 an
    /// immediate cut.
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    /// Advance by the frame's delta time. Returns true once complete.
    pub fn advance(&mut self, delta_seconds: f32) -> bool {
        self.elapsed += delta_seconds.max(0.0);
        self.is_complete()
    }

    /// Linear progress in [0, 1].
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.duration <= f32::EPSILON {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Ramp duration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

/// Linear interpolation between two volumes at progress `t` in [0, 1].
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
