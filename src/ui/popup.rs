//! Popup overlay widgets for the settings menu and controls submenu.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::layout::centered_fixed;
use crate::app::settings::{SettingsItem, SETTINGS_ITEMS};
use crate::app::state::AppState;
use crate::config::{Action, AppConfig};

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn row_style(selected: bool) -> (&'static str, Style) {
    if selected {
        (
            " ▸ ",
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("   ", Style::default().fg(Color::White))
    }
}

// ───────────────────────────────────────── settings popup ────

/// Settings menu popup overlay.
pub struct SettingsPopup<'a> {
    pub selected: usize,
    pub state: &'a AppState,
}

impl Widget for SettingsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (SETTINGS_ITEMS.len() as u16) + 6;
        let popup = centered_fixed(48, height, area);
        Clear.render(popup, buf);

        let block = popup_block(" Settings ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let label_width = SETTINGS_ITEMS
            .iter()
            .map(|i| i.label().len())
            .max()
            .unwrap_or(0)
            + 2;

        let mut lines = Vec::new();
        lines.push(Line::raw(""));
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let (prefix, style) = row_style(i == self.selected);
            let label = format!("{prefix}{:<label_width$}", item.label());

            // Show the current value next to toggles and cycles.
            let value = match item {
                SettingsItem::Submenu { .. } => None,
                SettingsItem::Toggle { get, .. } => {
                    let on = get(self.state);
                    let style = if on {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    };
                    Some(Span::styled(if on { "[ON]" } else { "[OFF]" }, style))
                }
                SettingsItem::Cycle { value, .. } => Some(Span::styled(
                    format!("‹ {} ›", value(self.state)),
                    Style::default().fg(Color::Yellow),
                )),
            };

            let mut spans = vec![Span::styled(label, style)];
            spans.extend(value);
            lines.push(Line::from(spans));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter/Space: change  Esc: close",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── controls popup ────

/// Interactive controls / keybinding popup overlay.
pub struct ControlsPopup<'a> {
    pub config: &'a AppConfig,
    pub selected: usize,
    pub awaiting_rebind: bool,
}

impl Widget for ControlsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Action rows + 2 blanks + reset + hint + 2 border.
        let height = (Action::ALL.len() as u16) + 7;
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let block = popup_block(" Controls ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();

        lines.push(Line::raw(""));

        // ── Action rows ─────────────────────────────────────────
        for (i, &action) in Action::ALL.iter().enumerate() {
            let is_selected = i == self.selected;
            let (prefix, base_style) = row_style(is_selected);

            let keys_display = if is_selected && self.awaiting_rebind {
                "Press a key…".to_string()
            } else {
                self.config.display_bindings(action)
            };

            let key_style = if is_selected && self.awaiting_rebind {
                Style::default()
                    .fg(Color::Yellow)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default().fg(Color::Yellow).bg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Yellow)
            };

            // Fixed-width columns: label left-aligned, keys right-aligned.
            let label_col = format!("{prefix}{:<22}", action.label());
            let inner_width = inner.width as usize;
            let keys_width = inner_width
                .saturating_sub(label_col.chars().count())
                .max(1);
            let keys_col = format!("{keys_display:>keys_width$}");

            lines.push(Line::from(vec![
                Span::styled(label_col, base_style),
                Span::styled(keys_col, key_style),
            ]));
        }

        // ── Reset option ────────────────────────────────────────
        lines.push(Line::raw(""));
        let (reset_prefix, reset_style) = row_style(self.selected == Action::ALL.len());
        lines.push(Line::from(Span::styled(
            format!("{reset_prefix}⟳ Reset to defaults"),
            reset_style,
        )));

        // ── Hint bar ────────────────────────────────────────────
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter: add key  Del: clear  Esc: back",
            dim,
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_settings_popup_shows_values() {
        let state = AppState::new(AppConfig::default());
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        SettingsPopup {
            selected: 0,
            state: &state,
        }
        .render(area, &mut buf);
        let text = screen(&buf);
        assert!(text.contains("▸ Controls"));
        assert!(text.contains("Capture Keys Globally"));
        assert!(text.contains("[ON]"));
        assert!(text.contains("700ms"));
    }

    #[test]
    fn test_controls_popup_prompts_for_rebind() {
        let config = AppConfig::default();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        ControlsPopup {
            config: &config,
            selected: 1,
            awaiting_rebind: true,
        }
        .render(area, &mut buf);
        let text = screen(&buf);
        assert!(text.contains("Press a key…"));
        assert!(text.contains("Reset to defaults"));
    }
}
