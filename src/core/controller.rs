//! Scroll container controller.
//!
//! Owns the horizontal scroll offset of the deck, derives the continuous
//! and settled section indices from it, and drives programmatic navigation.
//!
//! Updates are coalesced through a [`FrameLoop`]: every scroll event cancels
//! the pending sync request and schedules a fresh one, so at most one index
//! update is committed per frame while continuous scrolling still updates
//! every frame.  Programmatic scrolls occupy a single slot; starting a new
//! one cancels the one in flight.

use std::time::{Duration, Instant};

use super::easing::{clamp, lerp, Easing};
use super::frame::{FrameId, FrameLoop};
use super::progress::{compute_progress, settled_index, ProgressDescriptor};
use super::smooth_scroll::SmoothScroll;

/// Fraction of a section a gesture must travel to change section on snap.
pub const SNAP_THRESHOLD: f64 = 0.15;

// ───────────────────────────────────────── configuration ─────

/// How `scroll_to_section` moves the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Jump straight to the target.
    Instant,
    /// Exponential glide, like the platform's native smooth scrolling.
    Smooth,
    /// Fixed-duration tween shaped by [`ScrollConfig::easing`].
    #[default]
    Eased,
}

impl ScrollBehavior {
    pub const ALL: &[ScrollBehavior] = &[
        ScrollBehavior::Instant,
        ScrollBehavior::Smooth,
        ScrollBehavior::Eased,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScrollBehavior::Instant => "instant",
            ScrollBehavior::Smooth => "smooth",
            ScrollBehavior::Eased => "eased",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.label() == s)
    }
}

/// Tunables for programmatic scrolling and scroll-snap.
#[derive(Debug, Clone)]
pub struct ScrollConfig {
    pub behavior: ScrollBehavior,
    pub easing: Easing,
    pub duration: Duration,
    /// Damping factor for [`ScrollBehavior::Smooth`] and snapping.
    pub smooth_speed: f64,
    /// Glide back onto the nearest section after manual scrolling stops.
    pub snap: bool,
    /// Quiet period after the last gesture before snapping.
    pub snap_idle: Duration,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            behavior: ScrollBehavior::Eased,
            easing: Easing::EaseOutCubic,
            duration: Duration::from_millis(700),
            smooth_speed: 0.3,
            snap: true,
            snap_idle: Duration::from_millis(180),
        }
    }
}

// ───────────────────────────────────────── motion ────────────

#[derive(Debug, Clone)]
struct Tween {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    /// Sample the tween at `now`; the flag is `true` once finished.
    fn sample(&self, now: Instant) -> (f64, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (lerp(self.from, self.to, self.easing.apply(t)), false)
    }
}

#[derive(Debug, Clone)]
enum Motion {
    Tween(Tween),
    Glide(SmoothScroll),
}

impl Motion {
    fn step(&self, offset: f64, now: Instant) -> (f64, bool) {
        match self {
            Motion::Tween(tween) => tween.sample(now),
            Motion::Glide(glide) => glide.step(offset),
        }
    }

    fn rescale(&mut self, ratio: f64) {
        match self {
            Motion::Tween(tween) => {
                tween.from *= ratio;
                tween.to *= ratio;
            }
            Motion::Glide(glide) => glide.rescale(ratio),
        }
    }
}

#[derive(Debug)]
enum Task {
    /// Commit the continuous index measured at scroll time.
    Sync { exact_index: f64 },
    /// Advance the programmatic scroll by one frame.
    Animate(Motion),
}

// ───────────────────────────────────────── controller ────────

/// Observable state of the controller.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A scroll event arrived; the index update runs on the next frame.
    PendingFrame,
    ProgrammaticScroll,
}

/// Scroll container controller for one workflow session.
#[derive(Debug)]
pub struct ScrollController {
    config: ScrollConfig,
    section_count: usize,
    /// `None` until the deck has been laid out.
    client_width: Option<f64>,
    scroll_left: f64,
    scroll_index: f64,
    active_index: usize,
    frames: FrameLoop<Task>,
    pending_sync: Option<FrameId>,
    animation: Option<FrameId>,
    /// Section the deck last settled on or is travelling to.
    anchor: usize,
    /// Signed columns moved by the current gesture.
    gesture_travel: f64,
    last_gesture: Option<Instant>,
    /// A drag is in progress; snapping waits for the release.
    held: bool,
}

impl ScrollController {
    pub fn new(section_count: usize, config: ScrollConfig) -> Self {
        Self {
            config,
            section_count: section_count.max(1),
            client_width: None,
            scroll_left: 0.0,
            scroll_index: 0.0,
            active_index: 0,
            frames: FrameLoop::new(),
            pending_sync: None,
            animation: None,
            anchor: 0,
            gesture_travel: 0.0,
            last_gesture: None,
            held: false,
        }
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn set_config(&mut self, config: ScrollConfig) {
        self.config = config;
    }

    pub fn section_count(&self) -> usize {
        self.section_count
    }

    pub fn client_width(&self) -> Option<f64> {
        self.client_width
    }

    /// Horizontal offset in columns.
    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    /// Continuous index committed on the last frame.
    #[cfg(test)]
    pub fn scroll_index(&self) -> f64 {
        self.scroll_index
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        if self.animation.is_some() {
            Phase::ProgrammaticScroll
        } else if self.pending_sync.is_some() {
            Phase::PendingFrame
        } else {
            Phase::Idle
        }
    }

    pub fn progress(&self) -> ProgressDescriptor {
        compute_progress(
            self.scroll_index,
            self.active_index as isize,
            self.section_count,
        )
    }

    fn max_offset(&self, width: f64) -> f64 {
        (self.section_count - 1) as f64 * width
    }

    // ── lifecycle ───────────────────────────────────────────────

    /// Attach to a laid-out deck of `client_width` columns.
    pub fn mount(&mut self, client_width: f64) {
        if self.client_width.is_some() {
            self.on_resize(client_width);
            return;
        }
        let width = guard_width(client_width);
        self.client_width = Some(width);
        // Coming back from an unmount: resume at the committed position.
        self.scroll_left = clamp(self.scroll_index * width, 0.0, self.max_offset(width));
        self.on_scroll();
    }

    /// Detach from the deck (zero-width layout).  Pending frames are
    /// dropped and every handler is a no-op until the next `mount`.
    pub fn unmount(&mut self) {
        tracing::debug!("scroll controller unmounted at index {:.2}", self.scroll_index);
        self.client_width = None;
        self.cancel_all();
        self.end_gesture();
    }

    /// Start over with a new section count (workflow switch).
    pub fn reset(&mut self, section_count: usize) {
        self.cancel_all();
        self.section_count = section_count.max(1);
        self.scroll_left = 0.0;
        self.scroll_index = 0.0;
        self.active_index = 0;
        self.anchor = 0;
        self.end_gesture();
    }

    fn cancel_all(&mut self) {
        self.frames.clear();
        self.pending_sync = None;
        self.animation = None;
    }

    // ── events ──────────────────────────────────────────────────

    /// Scroll event: measure and schedule the index update for the next
    /// frame, replacing any update already pending.
    pub fn on_scroll(&mut self) {
        let Some(width) = self.client_width else {
            return;
        };
        let exact_index = self.scroll_left / width;
        if let Some(id) = self.pending_sync.take() {
            self.frames.cancel(id);
        }
        self.pending_sync = Some(self.frames.request(Task::Sync { exact_index }));
    }

    /// Re-derive the position against a new width.  The offset is rescaled
    /// so the fractional section position survives the resize.
    pub fn on_resize(&mut self, client_width: f64) {
        let Some(old) = self.client_width else {
            return;
        };
        let new = guard_width(client_width);
        if new == old {
            return;
        }
        let ratio = new / old;
        self.scroll_left *= ratio;
        if let Some(id) = self.animation.take() {
            if let Some(Task::Animate(mut motion)) = self.frames.cancel(id) {
                motion.rescale(ratio);
                self.animation = Some(self.frames.request(Task::Animate(motion)));
            }
        }
        self.client_width = Some(new);
        self.on_scroll();
    }

    /// Manual scroll gesture (wheel, drag).  Interrupts programmatic motion.
    pub fn scroll_by(&mut self, delta_cols: f64, now: Instant) {
        let Some(width) = self.client_width else {
            return;
        };
        if !delta_cols.is_finite() || delta_cols == 0.0 {
            return;
        }
        self.cancel_animation();
        let before = self.scroll_left;
        self.scroll_left = clamp(before + delta_cols, 0.0, self.max_offset(width));
        self.gesture_travel += self.scroll_left - before;
        self.last_gesture = Some(now);
        self.on_scroll();
    }

    /// Pointer grabbed the deck.  Programmatic motion stops and snapping
    /// is held off until [`release`](Self::release).
    pub fn hold(&mut self, now: Instant) {
        if self.client_width.is_none() {
            return;
        }
        self.cancel_animation();
        self.held = true;
        self.last_gesture = Some(now);
    }

    /// Pointer let go; the snap idle window starts now.
    pub fn release(&mut self, now: Instant) {
        if !self.held {
            return;
        }
        self.held = false;
        if self.last_gesture.is_some() {
            self.last_gesture = Some(now);
        }
    }

    fn end_gesture(&mut self) {
        self.last_gesture = None;
        self.gesture_travel = 0.0;
        self.held = false;
    }

    /// Navigate to `index` (clamped into range) using the configured
    /// behaviour.  Any programmatic scroll already running is cancelled.
    pub fn scroll_to_section(&mut self, index: usize, now: Instant) {
        let Some(width) = self.client_width else {
            return;
        };
        let index = index.min(self.section_count - 1);
        let target = index as f64 * width;
        self.cancel_animation();
        self.end_gesture();
        self.anchor = index;

        tracing::debug!(
            "scroll_to_section: {index} from={:.2} to={target:.2} behavior={}",
            self.scroll_left,
            self.config.behavior.label()
        );

        match self.config.behavior {
            ScrollBehavior::Instant => {
                self.scroll_left = target;
                self.on_scroll();
            }
            ScrollBehavior::Smooth => {
                self.start_motion(Motion::Glide(SmoothScroll::new(
                    target,
                    self.config.smooth_speed,
                )));
            }
            ScrollBehavior::Eased => {
                self.start_motion(Motion::Tween(Tween {
                    from: self.scroll_left,
                    to: target,
                    started: now,
                    duration: self.config.duration,
                    easing: self.config.easing,
                }));
            }
        }
    }

    /// Keyboard-style relative navigation from the active section.
    pub fn step(&mut self, delta: isize, now: Instant) {
        let last = (self.section_count - 1) as isize;
        let target = (self.active_index as isize + delta).clamp(0, last);
        self.scroll_to_section(target as usize, now);
    }

    fn start_motion(&mut self, motion: Motion) {
        self.animation = Some(self.frames.request(Task::Animate(motion)));
    }

    fn cancel_animation(&mut self) {
        if let Some(id) = self.animation.take() {
            self.frames.cancel(id);
        }
    }

    // ── frame ───────────────────────────────────────────────────

    /// Run one animation frame.  Returns `true` when the offset or the
    /// committed indices changed.
    pub fn frame(&mut self, now: Instant) -> bool {
        let due = self.frames.take_frame();
        // Every handle drained above is now stale.
        self.pending_sync = None;
        self.animation = None;

        let mut changed = false;
        let (animations, syncs): (Vec<Task>, Vec<Task>) =
            due.into_iter().partition(|t| matches!(t, Task::Animate(_)));

        for task in animations {
            if let Task::Animate(motion) = task {
                changed |= self.advance(motion, now);
            }
        }
        for task in syncs {
            if let Task::Sync { exact_index } = task {
                changed |= self.commit(exact_index);
            }
        }

        self.maybe_snap(now);
        changed
    }

    fn advance(&mut self, motion: Motion, now: Instant) -> bool {
        let (offset, done) = motion.step(self.scroll_left, now);
        let moved = offset != self.scroll_left;
        self.scroll_left = offset;
        if !done {
            self.start_motion(motion);
        }
        // The write fires a scroll event just like a manual gesture would.
        self.on_scroll();
        moved
    }

    fn commit(&mut self, exact_index: f64) -> bool {
        let active = settled_index(exact_index, self.section_count);
        let changed = exact_index != self.scroll_index || active != self.active_index;
        if active != self.active_index {
            tracing::debug!("active section: {} -> {active}", self.active_index);
        }
        self.scroll_index = exact_index;
        self.active_index = active;
        changed
    }

    /// Once gestures have been quiet for `snap_idle`, glide onto a section.
    /// A gesture that travelled at least [`SNAP_THRESHOLD`] of a section
    /// lands at least one section further in its direction; a shorter one
    /// falls back to the anchor.
    fn maybe_snap(&mut self, now: Instant) {
        if self.held || self.animation.is_some() || self.pending_sync.is_some() {
            return;
        }
        let (Some(width), Some(at)) = (self.client_width, self.last_gesture) else {
            return;
        };
        if now.saturating_duration_since(at) < self.config.snap_idle {
            return;
        }
        let travel = self.gesture_travel / width;
        self.end_gesture();
        if !self.config.snap {
            self.anchor = self.active_index;
            return;
        }

        let last = self.section_count - 1;
        let nearest = ((self.scroll_left / width).round().max(0.0) as usize).min(last);
        let target = if travel >= SNAP_THRESHOLD {
            nearest.max(self.anchor + 1).min(last)
        } else if travel <= -SNAP_THRESHOLD {
            nearest.min(self.anchor.saturating_sub(1))
        } else {
            self.anchor.min(last)
        };
        self.anchor = target;

        let offset = target as f64 * width;
        if (self.scroll_left - offset).abs() > 1e-6 {
            tracing::debug!("snapping to section {target} (travel {travel:.2})");
            self.start_motion(Motion::Glide(SmoothScroll::new(
                offset,
                self.config.smooth_speed,
            )));
        }
    }
}

/// Zero or negative widths would turn every index into inf/NaN.
fn guard_width(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        1.0
    }
}
