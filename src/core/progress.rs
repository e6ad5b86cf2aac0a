//! Scroll progress calculator.
//!
//! Converts the continuous scroll position (in section units) and the
//! settled section into a [`ProgressDescriptor`] that every presenter maps
//! onto its own visual parameters.  Pure arithmetic, recomputed each frame.

use super::easing::clamp01;

/// Which neighbour the scroll position is moving toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    /// Exactly on the settled section, no pending transition.
    Settled,
    Forward,
}

impl Direction {
    pub fn signum(self) -> i8 {
        match self {
            Direction::Backward => -1,
            Direction::Settled => 0,
            Direction::Forward => 1,
        }
    }

    /// Sign as a float multiplier for translations.
    pub fn factor(self) -> f64 {
        f64::from(self.signum())
    }
}

/// Snapshot of one frame's transition state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressDescriptor {
    /// Settled section, always within `[0, section_count - 1]`.
    pub current_index: usize,
    /// Neighbour in `direction`, or the forward neighbour when settled.
    /// Not clamped: `-1` or `section_count` are possible and callers must
    /// check existence before rendering.
    pub next_index: isize,
    pub direction: Direction,
    /// Transition progress toward `next_index`, saturated to `[0, 1]`.
    pub abs_p: f64,
    /// Linear alias of `abs_p`; presenters apply their own curves.
    pub eased: f64,
    pub current_opacity: f64,
    pub next_opacity: f64,
}

impl ProgressDescriptor {
    /// The next section, if it exists in `sections`.
    pub fn next_in<'a, T>(&self, sections: &'a [T]) -> Option<&'a T> {
        usize::try_from(self.next_index)
            .ok()
            .and_then(|i| sections.get(i))
    }

    pub fn next_is(&self, index: usize) -> bool {
        usize::try_from(self.next_index).is_ok_and(|n| n == index)
    }
}

/// Compute the progress descriptor.
///
/// `active_index` is clamped into range; a `section_count` of zero is
/// treated as one section.
pub fn compute_progress(
    scroll_index: f64,
    active_index: isize,
    section_count: usize,
) -> ProgressDescriptor {
    let last = section_count.max(1) - 1;
    let current_index = active_index.clamp(0, last as isize) as usize;

    let signed = if scroll_index.is_finite() {
        scroll_index - current_index as f64
    } else {
        0.0
    };

    let direction = if signed > 0.0 {
        Direction::Forward
    } else if signed < 0.0 {
        Direction::Backward
    } else {
        Direction::Settled
    };

    let abs_p = clamp01(signed.abs());
    let next_index = match direction {
        Direction::Backward => current_index as isize - 1,
        Direction::Settled | Direction::Forward => current_index as isize + 1,
    };

    ProgressDescriptor {
        current_index,
        next_index,
        direction,
        abs_p,
        eased: abs_p,
        current_opacity: 1.0 - abs_p,
        next_opacity: abs_p,
    }
}

/// The section considered active for a continuous index: nearest section,
/// clamped into range.
pub fn settled_index(exact_index: f64, section_count: usize) -> usize {
    let last = (section_count.max(1) - 1) as f64;
    if !exact_index.is_finite() {
        return 0;
    }
    exact_index.clamp(0.0, last).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_current_index_always_in_range() {
        for n in 1..6usize {
            for active in -4isize..10 {
                let d = compute_progress(active as f64 + 0.3, active, n);
                assert!(d.current_index < n, "n={n} active={active}");
            }
        }
    }

    #[test]
    fn test_opacities_are_complementary() {
        for i in 0..=40 {
            let scroll = -1.0 + i as f64 * 0.17;
            let d = compute_progress(scroll, 1, 4);
            assert!((d.current_opacity + d.next_opacity - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_direction_consistency() {
        let fwd = compute_progress(2.3, 2, 5);
        assert_eq!(fwd.direction, Direction::Forward);
        assert_eq!(fwd.next_index, 3);

        let back = compute_progress(1.6, 2, 5);
        assert_eq!(back.direction, Direction::Backward);
        assert_eq!(back.next_index, 1);

        let rest = compute_progress(2.0, 2, 5);
        assert_eq!(rest.direction, Direction::Settled);
        assert_eq!(rest.direction.signum(), 0);
    }

    #[test]
    fn test_abs_p_saturates() {
        let d = compute_progress(5.0, 0, 8);
        assert_eq!(d.abs_p, 1.0);
        assert_eq!(d.next_index, 1);
    }

    #[test]
    fn test_idempotent_at_rest() {
        for k in 0..5 {
            let d = compute_progress(k as f64, k, 5);
            assert_eq!(d.abs_p, 0.0);
            assert_eq!(d.direction, Direction::Settled);
            assert_eq!(d.current_opacity, 1.0);
            assert_eq!(d.next_opacity, 0.0);
        }
    }

    #[test]
    fn test_forward_transition_halfway() {
        let d = compute_progress(1.5, 1, 5);
        assert_eq!(d.current_index, 1);
        assert_eq!(d.next_index, 2);
        assert_eq!(d.direction, Direction::Forward);
        assert!((d.abs_p - 0.5).abs() < EPS);
        assert!((d.eased - 0.5).abs() < EPS);
        assert!((d.current_opacity - 0.5).abs() < EPS);
        assert!((d.next_opacity - 0.5).abs() < EPS);
    }

    #[test]
    fn test_rest_on_last_section_has_out_of_range_next() {
        let sections = ["a", "b", "c", "d", "e"];
        let d = compute_progress(4.0, 4, sections.len());
        assert_eq!(d.current_index, 4);
        assert_eq!(d.direction, Direction::Settled);
        assert_eq!(d.abs_p, 0.0);
        assert_eq!(d.next_index, 5);
        assert!(d.next_in(&sections).is_none());
    }

    #[test]
    fn test_backward_from_first_section_is_guarded() {
        let sections = [0u8; 3];
        let d = compute_progress(-0.4, 0, sections.len());
        assert_eq!(d.next_index, -1);
        assert!(d.next_in(&sections).is_none());
        assert!(!d.next_is(0));
    }

    #[test]
    fn test_zero_sections_and_nan_do_not_panic() {
        let d = compute_progress(f64::NAN, 3, 0);
        assert_eq!(d.current_index, 0);
        assert_eq!(d.abs_p, 0.0);
        assert_eq!(d.direction, Direction::Settled);
    }

    #[test]
    fn test_settled_index_rounds_and_clamps() {
        assert_eq!(settled_index(1.49, 5), 1);
        assert_eq!(settled_index(1.5, 5), 2);
        assert_eq!(settled_index(-0.7, 5), 0);
        assert_eq!(settled_index(9.2, 5), 4);
        assert_eq!(settled_index(f64::INFINITY, 5), 0);
    }
}
