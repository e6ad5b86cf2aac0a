//! User configuration — keybindings, scroll behaviour and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/scrolldeck/config.toml` (default `~/.config/scrolldeck/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::controller::{ScrollBehavior, ScrollConfig};
use crate::core::easing::Easing;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NextSection,
    PrevSection,
    FirstSection,
    LastSection,
    Activate,
    ToggleSelect,
    FocusPanel,
    Back,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the controls menu).
    pub const ALL: &[Action] = &[
        Action::NextSection,
        Action::PrevSection,
        Action::FirstSection,
        Action::LastSection,
        Action::Activate,
        Action::ToggleSelect,
        Action::FocusPanel,
        Action::Back,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::NextSection => "Next Section",
            Action::PrevSection => "Previous Section",
            Action::FirstSection => "First Section",
            Action::LastSection => "Last Section",
            Action::Activate => "Run Step / Open",
            Action::ToggleSelect => "Toggle Selection",
            Action::FocusPanel => "Focus Deck / Panel",
            Action::Back => "Back to Home",
            Action::OpenSettings => "Open Settings",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::NextSection => "next_section",
            Action::PrevSection => "prev_section",
            Action::FirstSection => "first_section",
            Action::LastSection => "last_section",
            Action::Activate => "activate",
            Action::ToggleSelect => "toggle_select",
            Action::FocusPanel => "focus_panel",
            Action::Back => "back",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

/// Shift is already part of a printable character (`?`, `G`), and terminals
/// disagree on whether they report it, so it is ignored for `Char` keys.
fn compared_modifiers(code: KeyCode) -> KeyModifiers {
    match code {
        KeyCode::Char(_) => MODIFIER_MASK.difference(KeyModifiers::SHIFT),
        _ => MODIFIER_MASK,
    }
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = compared_modifiers(event.code);
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Create a binding from a raw key event (used during rebinding).
    pub fn from_key_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers & compared_modifiers(event.code),
        }
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"→"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Right"`, `"Ctrl+c"`, `"q"`).
    fn to_config_string(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Delete => "Delete".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Right"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Single characters keep their case.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Durations accepted for `scroll_duration_ms`.
pub const SCROLL_DURATION_MS: (u64, u64) = (100, 3000);

/// Application configuration — keybindings and scroll settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub scroll_behavior: ScrollBehavior,
    pub scroll_easing: Easing,
    pub scroll_duration_ms: u64,
    /// Damping for smooth glides and scroll-snap, `0.05..=0.95`.
    pub smooth_speed: f64,
    pub snap_to_sections: bool,
    pub snap_idle_ms: u64,
    /// Fraction of the deck width moved per wheel notch.
    pub wheel_step: f64,
    /// Section keys navigate even while the panel has focus.
    pub capture_keys_globally: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let scroll = ScrollConfig::default();
        Self {
            bindings: Self::default_bindings(),
            scroll_behavior: scroll.behavior,
            scroll_easing: scroll.easing,
            scroll_duration_ms: scroll.duration.as_millis() as u64,
            smooth_speed: scroll.smooth_speed,
            snap_to_sections: scroll.snap,
            snap_idle_ms: scroll.snap_idle.as_millis() as u64,
            wheel_step: 0.25,
            capture_keys_globally: true,
        }
    }
}

impl AppConfig {
    /// Hard-coded default keybindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(NextSection, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(PrevSection, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(FirstSection, vec![KeyBind::new(Home, n)]);
        m.insert(LastSection, vec![KeyBind::new(End, n)]);
        m.insert(Activate, vec![KeyBind::new(Enter, n)]);
        m.insert(ToggleSelect, vec![KeyBind::new(Char(' '), n)]);
        m.insert(FocusPanel, vec![KeyBind::new(Tab, n)]);
        m.insert(Back, vec![KeyBind::new(Esc, n)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Char('c'), ctrl)]);

        m
    }

    /// Controller settings derived from this config.
    pub fn scroll_config(&self) -> ScrollConfig {
        ScrollConfig {
            behavior: self.scroll_behavior,
            easing: self.scroll_easing,
            duration: Duration::from_millis(self.scroll_duration_ms),
            smooth_speed: self.smooth_speed,
            snap: self.snap_to_sections,
            snap_idle: Duration::from_millis(self.snap_idle_ms),
        }
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match (shouldn't happen after conflict resolution), the one with
    /// the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Add a binding for `action`.  Removes this key from any other action
    /// to prevent conflicts, then appends it to `action`'s bindings.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for (_, binds) in self.bindings.iter_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    /// Restore all bindings to the built-in defaults.
    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// Format the binding list for a given action (e.g. `"→/l"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: sections | {}: run step | {}: focus | {}: home | {}: settings",
            self.short_binding(Action::PrevSection),
            self.short_binding(Action::NextSection),
            self.short_binding(Action::Activate),
            self.short_binding(Action::FocusPanel),
            self.short_binding(Action::Back),
            self.short_binding(Action::OpenSettings),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => return Self::parse_config(&contents),
                Err(e) => tracing::warn!("cannot read {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        tracing::debug!("saved config to {}", path.display());
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut cfg = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            if cfg.apply_setting(key, value) {
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::warn!("unknown config key `{key}`");
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                match KeyBind::parse(part) {
                    Some(bind) => parsed.push(bind),
                    None => tracing::warn!("ignoring key `{part}` for {key}"),
                }
            }
            if !parsed.is_empty() {
                cfg.bindings.insert(action, parsed);
            }
        }

        cfg
    }

    /// Apply one non-binding setting.  Returns `false` if `key` is not a
    /// setting.  Invalid values keep the default.
    fn apply_setting(&mut self, key: &str, value: &str) -> bool {
        match key {
            "scroll_behavior" => match ScrollBehavior::from_label(value) {
                Some(b) => self.scroll_behavior = b,
                None => reject(key, value),
            },
            "scroll_easing" => match Easing::from_label(value) {
                Some(e) => self.scroll_easing = e,
                None => reject(key, value),
            },
            "scroll_duration_ms" => match value.parse::<u64>() {
                Ok(v) => {
                    self.scroll_duration_ms = v.clamp(SCROLL_DURATION_MS.0, SCROLL_DURATION_MS.1)
                }
                Err(_) => reject(key, value),
            },
            "smooth_speed" => match value.parse::<f64>() {
                Ok(v) if v.is_finite() => self.smooth_speed = v.clamp(0.05, 0.95),
                _ => reject(key, value),
            },
            "snap_to_sections" => match value.parse::<bool>() {
                Ok(v) => self.snap_to_sections = v,
                Err(_) => reject(key, value),
            },
            "snap_idle_ms" => match value.parse::<u64>() {
                Ok(v) => self.snap_idle_ms = v.clamp(50, 2000),
                Err(_) => reject(key, value),
            },
            "wheel_step" => match value.parse::<f64>() {
                Ok(v) if v.is_finite() => self.wheel_step = v.clamp(0.02, 1.0),
                _ => reject(key, value),
            },
            "capture_keys_globally" => match value.parse::<bool>() {
                Ok(v) => self.capture_keys_globally = v,
                Err(_) => reject(key, value),
            },
            _ => return false,
        }
        true
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# scrolldeck configuration".to_string(),
            String::new(),
            "# Scrolling".to_string(),
            "# scroll_behavior: instant | smooth | eased".to_string(),
            "# scroll_easing: linear | cubic-in-out | cubic-out | quart-out".to_string(),
            format!("scroll_behavior = {}", self.scroll_behavior.label()),
            format!("scroll_easing = {}", self.scroll_easing.label()),
            format!("scroll_duration_ms = {}", self.scroll_duration_ms),
            format!("smooth_speed = {}", self.smooth_speed),
            format!("snap_to_sections = {}", self.snap_to_sections),
            format!("snap_idle_ms = {}", self.snap_idle_ms),
            format!("wheel_step = {}", self.wheel_step),
            format!("capture_keys_globally = {}", self.capture_keys_globally),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn reject(key: &str, value: &str) {
    tracing::warn!("invalid value `{value}` for {key}, keeping default");
}

/// Return the config file path (`$XDG_CONFIG_HOME/scrolldeck/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("scrolldeck").join("config.toml")
}
