//! Busy indicator — a small spinner + label rendered in the top-right
//! corner of a given area.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frames advance every few render ticks so the spinner reads at ~12 fps.
const TICKS_PER_FRAME: u64 = 5;

/// Spinner glyph for a frame tick.
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[((tick / TICKS_PER_FRAME) as usize) % SPINNER_FRAMES.len()]
}

/// A small "working…" indicator with a spinning icon.
///
/// Render this over a panel's border.  It picks its own position
/// (top-right of `area`) and is invisible when `visible` is false.
pub struct BusyIndicator<'a> {
    pub visible: bool,
    /// Monotonically increasing tick counter (drives the spinner frame).
    pub tick: u64,
    pub label: &'a str,
}

impl Widget for BusyIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.height == 0 {
            return;
        }

        let label = format!(" {} {} ", spinner_frame(self.tick), self.label);
        let label_width = label.chars().count() as u16;
        if area.width < label_width + 2 {
            return;
        }
        // Top-right, inside the border (leave 1 col for the border char).
        let x = area.x + area.width.saturating_sub(label_width + 2);
        let y = area.y;

        let line = Line::from(Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

        buf.set_line(x, y, &line, label_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner_frame(0), "⠋");
        assert_eq!(spinner_frame(TICKS_PER_FRAME), "⠙");
        assert_eq!(
            spinner_frame(TICKS_PER_FRAME * SPINNER_FRAMES.len() as u64),
            "⠋"
        );
    }

    #[test]
    fn test_indicator_sits_top_right() {
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        BusyIndicator {
            visible: true,
            tick: 0,
            label: "training",
        }
        .render(area, &mut buf);
        // " ⠋ training " is 12 cells wide and ends 2 cells from the edge.
        assert_eq!(buf[(16u16, 0u16)].symbol(), " ");
        assert_eq!(buf[(17u16, 0u16)].symbol(), "⠋");
        assert_eq!(buf[(19u16, 0u16)].symbol(), "t");
    }
}
