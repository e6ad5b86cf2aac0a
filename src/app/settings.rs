//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::{ActiveView, AppState};
use crate::core::controller::ScrollBehavior;
use crate::core::easing::Easing;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Boolean toggle — reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. }
            | Self::Toggle { label, .. }
            | Self::Cycle { label, .. } => label,
        }
    }
}

/// Persist the config, reporting failures in the status bar.
pub(super) fn persist(s: &mut AppState) {
    s.apply_scroll_config();
    if let Err(e) = s.config.save() {
        tracing::warn!("saving config failed: {e:#}");
        s.status_message = Some(format!("Could not save settings: {e}"));
    }
}

/// The value after `current` in `all`, wrapping around.
fn cycle_value<T: PartialEq + Copy>(all: &[T], current: T) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(idx + 1) % all.len()]
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Cycle {
        label: "Scroll Behavior",
        value: |s| s.config.scroll_behavior.label().to_string(),
        cycle: |s| {
            s.config.scroll_behavior = cycle_value(ScrollBehavior::ALL, s.config.scroll_behavior);
            let label = s.config.scroll_behavior.label();
            s.status_message = Some(format!("Scroll behavior: {label}"));
            persist(s);
        },
    },
    SettingsItem::Cycle {
        label: "Scroll Easing",
        value: |s| s.config.scroll_easing.label().to_string(),
        cycle: |s| {
            s.config.scroll_easing = cycle_value(Easing::ALL, s.config.scroll_easing);
            s.status_message = Some(format!("Scroll easing: {}", s.config.scroll_easing.label()));
            persist(s);
        },
    },
    SettingsItem::Cycle {
        label: "Scroll Duration",
        value: |s| format!("{}ms", s.config.scroll_duration_ms),
        cycle: |s| {
            const DURATIONS: &[u64] = &[300, 500, 700, 1000, 1500];
            s.config.scroll_duration_ms = cycle_value(DURATIONS, s.config.scroll_duration_ms);
            s.status_message = Some(format!("Scroll duration: {}ms", s.config.scroll_duration_ms));
            persist(s);
        },
    },
    SettingsItem::Toggle {
        label: "Snap To Sections",
        get: |s| s.config.snap_to_sections,
        set: |s, v| {
            s.config.snap_to_sections = v;
            persist(s);
        },
    },
    SettingsItem::Toggle {
        label: "Capture Keys Globally",
        get: |s| s.config.capture_keys_globally,
        set: |s, v| {
            s.config.capture_keys_globally = v;
            persist(s);
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_value_wraps_and_recovers_unknown_values() {
        assert_eq!(cycle_value(&[1, 2, 3], 3), 1);
        assert_eq!(cycle_value(&[1, 2, 3], 1), 2);
        assert_eq!(cycle_value(&[300u64, 500], 42), 500);
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<&str> = SETTINGS_ITEMS.iter().map(|i| i.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), SETTINGS_ITEMS.len());
    }
}
