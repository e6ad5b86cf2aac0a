//! Column-level smooth scroll with exponential ease-out.
//!
//! Models the platform's "native" smooth scrolling: every frame the
//! remaining distance to the target shrinks by a fixed fraction, giving a
//! fast start and a visible deceleration.

/// Distance (in columns) below which the glide snaps onto its target.
const SETTLE_COLS: f64 = 0.4;

/// Exponential glide toward a target offset.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    target: f64,
    /// Damping: `remaining *= (1 - speed)` each frame.
    /// Good range: 0.2–0.4 at 60 fps.
    speed: f64,
}

impl SmoothScroll {
    pub fn new(target: f64, speed: f64) -> Self {
        Self {
            target,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    /// Move the target, e.g. after a resize rescaled the geometry.
    pub fn rescale(&mut self, ratio: f64) {
        self.target *= ratio;
    }

    /// Advance one frame from `offset`.  Returns the new offset and whether
    /// the glide has settled on its target.
    pub fn step(&self, offset: f64) -> (f64, bool) {
        let remaining = (self.target - offset) * (1.0 - self.speed);
        if remaining.abs() < SETTLE_COLS {
            (self.target, true)
        } else {
            (self.target - remaining, false)
        }
    }
}
