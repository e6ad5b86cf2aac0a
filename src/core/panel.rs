//! Interactive panel contract.
//!
//! A panel belongs to one or more sections.  Its visibility is derived from
//! the shared [`ProgressDescriptor`] with the panel's own fade windows, and
//! mounting/unmounting is explicit: [`PanelSlot`] calls
//! [`SectionPanel::on_enter`] when the panel becomes visible and
//! [`SectionPanel::on_leave`] when it disappears, which is where panels
//! reset their state.

use std::time::Instant;

use super::easing::{lerp, windowed_progress};
use super::progress::ProgressDescriptor;

/// Below this opacity a panel counts as hidden and is unmounted.
pub const VISIBILITY_EPSILON: f64 = 0.01;

// ───────────────────────────────────────── visibility ────────

/// Where in the transition a panel fades in and out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeWindows {
    /// Window of `abs_p` over which the panel fades in when its section is next.
    pub enter: (f64, f64),
    /// Window of `abs_p` over which the panel fades out when leaving its section.
    pub exit: (f64, f64),
}

impl FadeWindows {
    /// Plain crossfade following `next_opacity` / `current_opacity`.
    pub const CROSSFADE: FadeWindows = FadeWindows {
        enter: (0.0, 1.0),
        exit: (0.0, 1.0),
    };

    /// Appear in the last 15 % of the way in, vanish in the first 15 % out.
    pub const LATE_IN_EARLY_OUT: FadeWindows = FadeWindows {
        enter: (0.85, 1.0),
        exit: (0.0, 0.15),
    };
}

/// Container opacity of a panel owning the sections in `owned`.
///
/// Moving between two owned sections keeps the panel fully visible.
pub fn panel_opacity(owned: &[usize], d: &ProgressDescriptor, fade: FadeWindows) -> f64 {
    let on_current = owned.contains(&d.current_index);
    let on_next = owned.iter().any(|&s| d.next_is(s));
    match (on_current, on_next) {
        (true, true) => 1.0,
        (true, false) => 1.0 - windowed_progress(d.abs_p, fade.exit.0, fade.exit.1),
        (false, true) => windowed_progress(d.abs_p, fade.enter.0, fade.enter.1),
        (false, false) => 0.0,
    }
}

/// What a mounted panel sees each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelView {
    pub opacity: f64,
    pub progress: ProgressDescriptor,
}

// ───────────────────────────────────────── lifecycle ─────────

/// Behaviour hooks for a section-bound panel.
pub trait SectionPanel {
    /// The panel became visible.
    fn on_enter(&mut self, _now: Instant) {}
    /// The panel is no longer visible; drop transient state here.
    fn on_leave(&mut self) {}
    /// Called once per frame while mounted.
    fn on_frame(&mut self, _now: Instant, _view: &PanelView) {}
}

/// Panel with no behaviour of its own; only its visibility matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticPanel;

impl SectionPanel for StaticPanel {}

/// Mount state wrapper around a panel.
#[derive(Debug)]
pub struct PanelSlot<P> {
    panel: P,
    owned: Vec<usize>,
    fade: FadeWindows,
    view: Option<PanelView>,
}

impl<P: SectionPanel> PanelSlot<P> {
    pub fn new(panel: P, owned: impl Into<Vec<usize>>, fade: FadeWindows) -> Self {
        Self {
            panel,
            owned: owned.into(),
            fade,
            view: None,
        }
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.view.is_some()
    }

    /// The last frame's view, when mounted.
    pub fn view(&self) -> Option<&PanelView> {
        self.view.as_ref()
    }

    /// The panel, only while mounted.
    pub fn panel(&self) -> Option<&P> {
        self.view.as_ref().map(|_| &self.panel)
    }

    pub fn panel_mut(&mut self) -> Option<&mut P> {
        if self.view.is_some() {
            Some(&mut self.panel)
        } else {
            None
        }
    }

    /// Re-evaluate visibility for this frame and run the lifecycle hooks.
    pub fn update(&mut self, progress: ProgressDescriptor, now: Instant) {
        let opacity = panel_opacity(&self.owned, &progress, self.fade);
        let visible = opacity > VISIBILITY_EPSILON;
        match (self.view.is_some(), visible) {
            (false, true) => self.panel.on_enter(now),
            (true, false) => self.panel.on_leave(),
            _ => {}
        }
        if visible {
            let view = PanelView { opacity, progress };
            self.panel.on_frame(now, &view);
            self.view = Some(view);
        } else {
            self.view = None;
        }
    }

    /// Force-unmount (e.g. when the workflow changes).
    pub fn leave(&mut self) {
        if self.view.take().is_some() {
            self.panel.on_leave();
        }
    }
}

// ───────────────────────────────────────── anchoring ─────────

/// Horizontal anchor of an element inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAnchor {
    Left,
    Center,
    Right,
}

impl GridAnchor {
    /// Offset from the container's left edge.
    pub fn offset(self, container: f64, element: f64) -> f64 {
        let free = (container - element).max(0.0);
        match self {
            GridAnchor::Left => 0.0,
            GridAnchor::Center => free / 2.0,
            GridAnchor::Right => free,
        }
    }
}

/// Container width with a fallback for the not-yet-measured case.
pub fn effective_width(container: f64, fallback: f64) -> f64 {
    if container.is_finite() && container > 0.0 {
        container
    } else {
        fallback
    }
}

/// Offset of an element whose anchor differs per section.  While moving
/// between two anchored sections the offset is interpolated by `eased`;
/// otherwise it sits on whichever anchor is available.
pub fn anchor_offset(
    anchor_for: impl Fn(usize) -> Option<GridAnchor>,
    d: &ProgressDescriptor,
    container: f64,
    element: f64,
) -> f64 {
    let current = anchor_for(d.current_index);
    let next = usize::try_from(d.next_index).ok().and_then(&anchor_for);
    match (current, next) {
        (Some(a), Some(b)) => lerp(
            a.offset(container, element),
            b.offset(container, element),
            d.eased,
        ),
        (Some(a), None) | (None, Some(a)) => a.offset(container, element),
        (None, None) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::compute_progress;

    #[derive(Default)]
    struct HookCounter {
        enters: u32,
        leaves: u32,
        frames: u32,
    }

    impl SectionPanel for HookCounter {
        fn on_enter(&mut self, _now: Instant) {
            self.enters += 1;
        }
        fn on_leave(&mut self) {
            self.leaves += 1;
            self.frames = 0;
        }
        fn on_frame(&mut self, _now: Instant, _view: &PanelView) {
            self.frames += 1;
        }
    }

    #[test]
    fn test_crossfade_follows_descriptor() {
        let d = compute_progress(4.25, 4, 7);
        let leaving = panel_opacity(&[4], &d, FadeWindows::CROSSFADE);
        assert!((leaving - d.current_opacity).abs() < 1e-9);
        let entering = panel_opacity(&[5], &d, FadeWindows::CROSSFADE);
        assert!((entering - d.next_opacity).abs() < 1e-9);
        assert_eq!(panel_opacity(&[1], &d, FadeWindows::CROSSFADE), 0.0);
    }

    #[test]
    fn test_late_in_early_out_windows() {
        let fade = FadeWindows::LATE_IN_EARLY_OUT;
        let d = compute_progress(5.5, 5, 7);
        // Neither panel is visible halfway between industries and impact.
        assert_eq!(panel_opacity(&[5], &d, fade), 0.0);
        assert_eq!(panel_opacity(&[6], &d, fade), 0.0);
        let near_end = compute_progress(5.95, 5, 7);
        assert!(panel_opacity(&[6], &near_end, fade) > 0.5);
    }

    #[test]
    fn test_settled_neighbour_stays_hidden() {
        let d = compute_progress(4.0, 4, 7);
        assert_eq!(panel_opacity(&[5], &d, FadeWindows::CROSSFADE), 0.0);
        assert_eq!(panel_opacity(&[4], &d, FadeWindows::CROSSFADE), 1.0);
    }

    #[test]
    fn test_moving_between_owned_sections_stays_opaque() {
        let d = compute_progress(1.5, 1, 7);
        assert_eq!(panel_opacity(&[1, 2, 3], &d, FadeWindows::CROSSFADE), 1.0);
    }

    #[test]
    fn test_slot_lifecycle_is_explicit() {
        let now = Instant::now();
        let mut slot = PanelSlot::new(HookCounter::default(), vec![2], FadeWindows::CROSSFADE);

        slot.update(compute_progress(0.0, 0, 4), now);
        assert!(!slot.is_mounted());
        assert!(slot.panel().is_none());

        slot.update(compute_progress(1.5, 1, 4), now);
        slot.update(compute_progress(2.0, 2, 4), now);
        assert!(slot.is_mounted());
        let hooks = slot.panel().expect("mounted");
        assert_eq!(hooks.enters, 1);
        assert_eq!(hooks.frames, 2);

        slot.update(compute_progress(3.0, 3, 4), now);
        assert!(!slot.is_mounted());
        slot.update(compute_progress(2.0, 2, 4), now);
        let hooks = slot.panel().expect("mounted again");
        assert_eq!(hooks.enters, 2);
        assert_eq!(hooks.leaves, 1);
        assert_eq!(hooks.frames, 1);
    }

    #[test]
    fn test_forced_leave() {
        let now = Instant::now();
        let mut slot = PanelSlot::new(HookCounter::default(), vec![0], FadeWindows::CROSSFADE);
        slot.update(compute_progress(0.0, 0, 2), now);
        slot.leave();
        slot.leave();
        assert!(!slot.is_mounted());
        slot.update(compute_progress(0.0, 0, 2), now);
        assert_eq!(slot.panel().map(|p| p.leaves), Some(1));
    }

    #[test]
    fn test_anchor_interpolation() {
        let anchors = |s: usize| match s {
            1 => Some(GridAnchor::Right),
            2 => Some(GridAnchor::Left),
            _ => None,
        };
        let at_generate = compute_progress(1.0, 1, 7);
        assert_eq!(anchor_offset(anchors, &at_generate, 100.0, 40.0), 60.0);
        let halfway = compute_progress(1.5, 1, 7);
        assert_eq!(anchor_offset(anchors, &halfway, 100.0, 40.0), 30.0);
        let at_predict = compute_progress(2.0, 2, 7);
        assert_eq!(anchor_offset(anchors, &at_predict, 100.0, 40.0), 0.0);
        // Entering from an unanchored section uses the destination anchor.
        let entering = compute_progress(0.5, 0, 7);
        assert_eq!(anchor_offset(anchors, &entering, 100.0, 40.0), 60.0);
    }

    #[test]
    fn test_effective_width_fallback() {
        assert_eq!(effective_width(0.0, 120.0), 120.0);
        assert_eq!(effective_width(f64::NAN, 120.0), 120.0);
        assert_eq!(effective_width(80.0, 120.0), 80.0);
        assert_eq!(GridAnchor::Center.offset(30.0, 50.0), 0.0);
    }
}
