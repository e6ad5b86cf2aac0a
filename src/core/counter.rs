//! One-shot count-up animation for metric counters.
//!
//! Once started the animation only depends on elapsed time, not on the
//! scroll position.  It is reset (and therefore stops) when the owning
//! panel leaves.

use std::time::{Duration, Instant};

use super::easing::Easing;
use super::panel::{PanelView, SectionPanel};

/// Default run time of a count-up.
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(2000);

/// Display spec for one counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterSpec {
    pub target: f64,
    /// `0` floors to whole numbers; otherwise rounds to this many places.
    pub decimals: u8,
    pub suffix: &'static str,
}

impl CounterSpec {
    /// Value shown at eased progress `p`.
    pub fn value_at(&self, p: f64) -> f64 {
        let raw = self.target * p;
        if self.decimals == 0 {
            raw.floor()
        } else {
            let scale = 10f64.powi(i32::from(self.decimals));
            (raw * scale).round() / scale
        }
    }

    pub fn format(&self, value: f64) -> String {
        format!("{value:.prec$}{}", self.suffix, prec = usize::from(self.decimals))
    }
}

/// A group of counters animated together.
#[derive(Debug, Clone)]
pub struct CountUp {
    specs: Vec<CounterSpec>,
    duration: Duration,
    easing: Easing,
    started: Option<Instant>,
    progress: f64,
}

impl CountUp {
    pub fn new(specs: Vec<CounterSpec>) -> Self {
        Self {
            specs,
            duration: COUNT_UP_DURATION,
            easing: Easing::EaseOutQuart,
            started: None,
            progress: 0.0,
        }
    }

    #[cfg(test)]
    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.started.is_some() && self.progress >= 1.0
    }

    /// Start once; later calls are ignored until [`CountUp::reset`].
    pub fn start(&mut self, now: Instant) {
        if self.started.is_none() {
            self.started = Some(now);
            self.progress = 0.0;
        }
    }

    /// Advance to `now`.
    pub fn tick(&mut self, now: Instant) {
        let Some(started) = self.started else {
            return;
        };
        let elapsed = now.saturating_duration_since(started);
        self.progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
    }

    pub fn reset(&mut self) {
        self.started = None;
        self.progress = 0.0;
    }

    /// Current displayed values, one per spec.
    pub fn values(&self) -> Vec<f64> {
        let p = self.easing.apply(self.progress);
        self.specs.iter().map(|s| s.value_at(p)).collect()
    }

    /// Current values formatted with their suffixes.
    pub fn labels(&self) -> Vec<String> {
        self.values()
            .into_iter()
            .zip(&self.specs)
            .map(|(v, s)| s.format(v))
            .collect()
    }
}

/// Opacity the impact panel must reach before its counters start.
pub const START_THRESHOLD: f64 = 0.5;

/// Impact section panel: counts up once it is mostly visible.
#[derive(Debug, Clone)]
pub struct ImpactCounters {
    count_up: CountUp,
}

impl ImpactCounters {
    pub fn new(specs: Vec<CounterSpec>) -> Self {
        Self {
            count_up: CountUp::new(specs),
        }
    }

    pub fn count_up(&self) -> &CountUp {
        &self.count_up
    }
}

impl SectionPanel for ImpactCounters {
    fn on_leave(&mut self) {
        self.count_up.reset();
    }

    fn on_frame(&mut self, now: Instant, view: &PanelView) {
        if view.opacity > START_THRESHOLD {
            self.count_up.start(now);
        }
        self.count_up.tick(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::panel::{FadeWindows, PanelSlot};
    use crate::core::progress::compute_progress;

    fn metrics() -> CountUp {
        CountUp::new(vec![
            CounterSpec { target: 4.5, decimals: 1, suffix: "x" },
            CounterSpec { target: 76.0, decimals: 0, suffix: "%" },
            CounterSpec { target: 50.0, decimals: 0, suffix: "%" },
        ])
    }

    #[test]
    fn test_idle_counters_show_zero() {
        let c = metrics();
        assert_eq!(c.values(), vec![0.0, 0.0, 0.0]);
        assert_eq!(c.labels(), vec!["0.0x", "0%", "0%"]);
    }

    #[test]
    fn test_counts_up_to_targets_in_two_seconds() {
        let t0 = Instant::now();
        let mut c = metrics();
        c.start(t0);
        c.tick(t0 + Duration::from_millis(500));
        let mid = c.values();
        assert!(mid[1] > 0.0 && mid[1] < 76.0);
        c.tick(t0 + Duration::from_millis(2000));
        assert!(c.is_finished());
        assert_eq!(c.values(), vec![4.5, 76.0, 50.0]);
        assert_eq!(c.labels(), vec!["4.5x", "76%", "50%"]);
    }

    #[test]
    fn test_quartic_ease_out_front_loads_progress() {
        let t0 = Instant::now();
        let mut c = metrics();
        c.start(t0);
        c.tick(t0 + Duration::from_millis(500));
        // 1 - 0.75^4 ≈ 0.684 → floor(76 * 0.684) = 51
        assert_eq!(c.values()[1], 51.0);
    }

    #[test]
    fn test_start_is_one_shot_until_reset() {
        let t0 = Instant::now();
        let mut c = metrics();
        c.start(t0);
        c.start(t0 + Duration::from_millis(1500));
        c.tick(t0 + Duration::from_millis(2000));
        assert!(c.is_finished());
        c.reset();
        assert!(!c.is_started());
        c.tick(t0 + Duration::from_millis(4000));
        assert_eq!(c.values(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_impact_panel_starts_past_threshold_and_resets_on_leave() {
        let t0 = Instant::now();
        let specs = vec![CounterSpec { target: 76.0, decimals: 0, suffix: "%" }];
        let mut slot = PanelSlot::new(
            ImpactCounters::new(specs),
            vec![6],
            FadeWindows::LATE_IN_EARLY_OUT,
        );

        // 0.9 into the transition: mounted but below the start threshold.
        slot.update(compute_progress(5.9, 5, 7), t0);
        let panel = slot.panel().expect("mounted");
        assert!(!panel.count_up().is_started());

        slot.update(compute_progress(6.0, 6, 7), t0);
        slot.update(compute_progress(6.0, 6, 7), t0 + COUNT_UP_DURATION);
        let panel = slot.panel().expect("mounted");
        assert_eq!(panel.count_up().labels(), vec!["76%"]);

        slot.update(compute_progress(5.0, 5, 7), t0 + COUNT_UP_DURATION);
        assert!(!slot.is_mounted());
        slot.update(compute_progress(6.0, 6, 7), t0 + COUNT_UP_DURATION);
        // Restarted from zero on re-entry.
        assert_eq!(slot.panel().map(|p| p.count_up().values()), Some(vec![0.0]));
    }
}
