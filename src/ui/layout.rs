//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows reserved for the title block (title, gap, wrapped subtitle).
pub const TITLE_HEIGHT: u16 = 8;

/// Primary screen layout: title block, horizontally scrolling deck,
/// navigation row and a bottom status bar.
pub struct AppLayout {
    pub title_area: Rect,
    pub deck_area: Rect,
    pub nav_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TITLE_HEIGHT), // title + subtitle
                Constraint::Min(3),               // deck (takes all remaining space)
                Constraint::Length(1),            // dots and arrows
                Constraint::Length(1),            // status bar
            ])
            .split(area);

        Self {
            title_area: chunks[0],
            deck_area: chunks[1],
            nav_area: chunks[2],
            status_area: chunks[3],
        }
    }
}

/// `true` if the cell at (`col`, `row`) lies inside `area`.
pub fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_stacks_regions() {
        let l = AppLayout::from_area(Rect::new(0, 0, 100, 40));
        assert_eq!(l.title_area.height, TITLE_HEIGHT);
        assert_eq!(l.deck_area.y, TITLE_HEIGHT);
        assert_eq!(l.deck_area.width, 100);
        assert_eq!(l.nav_area.y, 38);
        assert_eq!(l.status_area.y, 39);
    }

    #[test]
    fn test_contains_edges() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(contains(r, 2, 3));
        assert!(contains(r, 5, 4));
        assert!(!contains(r, 6, 4));
        assert!(!contains(r, 2, 5));
    }
}
