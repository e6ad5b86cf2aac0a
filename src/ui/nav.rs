//! Navigation row — section dots flanked by prev/next arrows.
//!
//! Stateless: everything is derived from the section count and the active
//! index.  The same geometry drives drawing and mouse hit-testing.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::theme::{self, MUTED, TEXT};

const PREV_GLYPH: &str = "‹";
const NEXT_GLYPH: &str = "›";
const DOT_GLYPH: &str = "•";
const ACTIVE_GLYPH: &str = "━━━";
const ACTIVE_WIDTH: u16 = 3;
/// Gap between an arrow and the dots.
const ARROW_GAP: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Prev,
    Next,
    Dot(usize),
}

/// Clickable regions of the navigation row.
#[derive(Debug, Clone)]
pub struct NavGeometry {
    prev: Option<Rect>,
    next: Option<Rect>,
    dots: Vec<Rect>,
    active: usize,
}

impl NavGeometry {
    pub fn new(area: Rect, section_count: usize, active: usize) -> Self {
        let count = section_count.max(1);
        let active = active.min(count - 1);

        // Arrows keep their slots even when hidden so the dots never shift.
        let dots_width = (2 * count + 1) as u16;
        let total = 1 + ARROW_GAP + dots_width + ARROW_GAP + 1;
        let left = area.x + area.width.saturating_sub(total) / 2;
        let cell = |x: u16, w: u16| Rect::new(x, area.y, w, 1);

        let mut dots = Vec::with_capacity(count);
        let mut x = left + 1 + ARROW_GAP;
        for i in 0..count {
            let w = if i == active { ACTIVE_WIDTH } else { 1 };
            dots.push(cell(x, w));
            x += w + 1;
        }

        Self {
            prev: (active > 0).then(|| cell(left, 1)),
            next: (active + 1 < count).then(|| cell(left + total - 1, 1)),
            dots,
            active,
        }
    }

    /// What sits at (`col`, `row`), if anything.
    pub fn hit(&self, col: u16, row: u16) -> Option<NavTarget> {
        let inside = |r: &Rect| super::layout::contains(*r, col, row);
        if self.prev.as_ref().is_some_and(inside) {
            return Some(NavTarget::Prev);
        }
        if self.next.as_ref().is_some_and(inside) {
            return Some(NavTarget::Next);
        }
        self.dots.iter().position(inside).map(NavTarget::Dot)
    }

    /// Section a target navigates to.
    pub fn resolve(&self, target: NavTarget) -> usize {
        match target {
            NavTarget::Prev => self.active.saturating_sub(1),
            NavTarget::Next => (self.active + 1).min(self.dots.len() - 1),
            NavTarget::Dot(i) => i,
        }
    }
}

pub struct NavBar<'a> {
    pub geometry: &'a NavGeometry,
}

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let g = self.geometry;
        let arrow = Style::default().fg(theme::color(TEXT));
        let dim = Style::default().fg(theme::color(MUTED));
        let active = Style::default()
            .fg(theme::color(TEXT))
            .add_modifier(Modifier::BOLD);

        let mut put = |r: Rect, s: &str, style: Style| {
            if r.intersects(area) {
                buf.set_stringn(r.x, r.y, s, usize::from(r.width), style);
            }
        };
        if let Some(r) = g.prev {
            put(r, PREV_GLYPH, arrow);
        }
        for (i, &r) in g.dots.iter().enumerate() {
            if i == g.active {
                put(r, ACTIVE_GLYPH, active);
            } else {
                put(r, DOT_GLYPH, dim);
            }
        }
        if let Some(r) = g.next {
            put(r, NEXT_GLYPH, arrow);
        }
    }
}
