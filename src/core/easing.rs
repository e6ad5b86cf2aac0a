//! Shared easing and windowing helpers.
//!
//! Every presenter shapes the raw transition progress through these curves
//! instead of carrying its own copy of `clamp` / ease functions.

/// Clamp `v` into `[lo, hi]`.  NaN collapses to `lo`.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() {
        return lo;
    }
    v.max(lo).min(hi)
}

/// Clamp into the unit interval.
pub fn clamp01(v: f64) -> f64 {
    clamp(v, 0.0, 1.0)
}

/// Linear interpolation from `a` to `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Progress of `p` through the window `[start, end]`, clamped to `[0, 1]`.
///
/// A degenerate window (`end <= start`) behaves as a step at `start`.
pub fn windowed_progress(p: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if p >= start { 1.0 } else { 0.0 };
    }
    clamp01((p - start) / (end - start))
}

/// Named easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseInOutCubic,
    EaseOutCubic,
    EaseOutQuart,
}

impl Easing {
    pub const ALL: &[Easing] = &[
        Easing::Linear,
        Easing::EaseInOutCubic,
        Easing::EaseOutCubic,
        Easing::EaseOutQuart,
    ];

    /// Apply the curve.  Input is clamped to `[0, 1]` first.
    pub fn apply(self, t: f64) -> f64 {
        let t = clamp01(t);
        match self {
            Easing::Linear => t,
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInOutCubic => "cubic-in-out",
            Easing::EaseOutCubic => "cubic-out",
            Easing::EaseOutQuart => "quart-out",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.label() == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_curves_hit_endpoints() {
        for &e in Easing::ALL {
            assert!(e.apply(0.0).abs() < EPS, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < EPS, "{e:?} at 1");
        }
    }

    #[test]
    fn test_apply_clamps_input() {
        assert_eq!(Easing::EaseOutCubic.apply(-3.0), 0.0);
        assert_eq!(Easing::EaseOutQuart.apply(7.0), 1.0);
    }

    #[test]
    fn test_in_out_cubic_is_symmetric_at_midpoint() {
        assert!((Easing::EaseInOutCubic.apply(0.5) - 0.5).abs() < EPS);
        assert!((Easing::EaseInOutCubic.apply(0.25) - 0.0625).abs() < EPS);
    }

    #[test]
    fn test_windowed_progress() {
        assert_eq!(windowed_progress(0.5, 0.6, 1.0), 0.0);
        assert!((windowed_progress(0.8, 0.6, 1.0) - 0.5).abs() < EPS);
        assert_eq!(windowed_progress(1.2, 0.6, 1.0), 1.0);
        // Degenerate window is a step.
        assert_eq!(windowed_progress(0.3, 0.5, 0.5), 0.0);
        assert_eq!(windowed_progress(0.5, 0.5, 0.5), 1.0);
    }

    #[test]
    fn test_clamp_handles_nan() {
        assert_eq!(clamp(f64::NAN, 0.0, 1.0), 0.0);
        assert_eq!(clamp01(2.0), 1.0);
    }

    #[test]
    fn test_label_round_trip() {
        for &e in Easing::ALL {
            assert_eq!(Easing::from_label(e.label()), Some(e));
        }
        assert_eq!(Easing::from_label("bouncy"), None);
    }
}
