//! Colour palette and text styles used across the UI.
//!
//! Terminals have no alpha channel, so opacity is rendered by blending a
//! colour toward the background.

use ratatui::style::{Color, Style};

use crate::core::content::{Gradient, Rgb};

/// Colour the deck is drawn on.
pub const BACKGROUND: Rgb = Rgb(0, 0, 0);
/// Body text.
pub const TEXT: Rgb = Rgb(0xf3, 0xf4, 0xf6);
/// Secondary text and the gray title layer.
pub const MUTED: Rgb = Rgb(0x9c, 0xa3, 0xaf);
pub const CYAN: Rgb = Rgb(0x22, 0xd3, 0xee);
pub const ORANGE: Rgb = Rgb(0xfb, 0x92, 0x3c);
pub const GREEN: Rgb = Rgb(0x4a, 0xde, 0x80);
pub const RED: Rgb = Rgb(0xf8, 0x71, 0x71);

/// Below this opacity nothing is drawn.
pub const MIN_VISIBLE: f64 = 0.04;

pub fn color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// `c` at `opacity` over the background, or `None` when invisible.
pub fn fade(c: Rgb, opacity: f64) -> Option<Color> {
    if opacity.is_nan() || opacity < MIN_VISIBLE {
        return None;
    }
    Some(color(BACKGROUND.mix(c, opacity)))
}

/// Foreground style for `c` at `opacity`.
pub fn faded_style(c: Rgb, opacity: f64) -> Option<Style> {
    fade(c, opacity).map(|fg| Style::default().fg(fg))
}

/// Colour of character `i` of `n` along a gradient.
pub fn gradient_at(g: &Gradient, i: usize, n: usize) -> Rgb {
    if n <= 1 {
        return g.sample(0.5);
    }
    g.sample(i as f64 / (n - 1) as f64)
}

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_blends_toward_background() {
        assert_eq!(fade(Rgb(200, 100, 0), 1.0), Some(Color::Rgb(200, 100, 0)));
        assert_eq!(fade(Rgb(200, 100, 0), 0.5), Some(Color::Rgb(100, 50, 0)));
        assert_eq!(fade(Rgb(200, 100, 0), 0.0), None);
        assert_eq!(fade(Rgb(200, 100, 0), f64::NAN), None);
    }

    #[test]
    fn test_gradient_endpoints() {
        let g = Gradient(Rgb(0, 0, 0), Rgb(10, 10, 10), Rgb(20, 20, 20));
        assert_eq!(gradient_at(&g, 0, 5), Rgb(0, 0, 0));
        assert_eq!(gradient_at(&g, 4, 5), Rgb(20, 20, 20));
        assert_eq!(gradient_at(&g, 0, 1), Rgb(10, 10, 10));
    }
}
