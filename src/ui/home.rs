//! Home screen — the workflow picker.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Widget},
};

use crate::core::content::WorkflowId;

use super::text::{letter_spaced, put_str};
use super::theme::{self, Theme, MUTED, TEXT};

const CARD_WIDTH: u16 = 56;
/// Border + label + tagline + border.
const CARD_HEIGHT: u16 = 4;

/// Where each workflow card sits on screen.
pub struct HomeGeometry {
    cards: Vec<(Rect, WorkflowId)>,
}

impl HomeGeometry {
    pub fn new(area: Rect) -> Self {
        let items = WorkflowId::SELECTABLE;
        let width = CARD_WIDTH.min(area.width);
        let x = area.x + (area.width - width) / 2;
        let stack = CARD_HEIGHT * items.len() as u16;
        let mut y = area.y + area.height.saturating_sub(stack) / 2;

        let bottom = area.y + area.height;
        let mut cards = Vec::with_capacity(items.len());
        for &wf in items {
            if y >= bottom {
                break;
            }
            let h = CARD_HEIGHT.min(bottom - y);
            cards.push((Rect::new(x, y, width, h), wf));
            y += CARD_HEIGHT;
        }
        Self { cards }
    }

    /// Index into [`WorkflowId::SELECTABLE`] of the card at (`col`, `row`).
    pub fn hit(&self, col: u16, row: u16) -> Option<usize> {
        self.cards
            .iter()
            .position(|(r, _)| super::layout::contains(*r, col, row))
    }
}

pub struct HomeView<'a> {
    pub geometry: &'a HomeGeometry,
    pub selected: usize,
}

impl Widget for HomeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (i, &(rect, wf)) in self.geometry.cards.iter().enumerate() {
            let selected = i == self.selected;
            let border = if selected {
                Style::default().fg(theme::color(wf.gradient().1))
            } else {
                Theme::border_style()
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border);
            let inner = block.inner(rect);
            block.render(rect, buf);
            if inner.height == 0 {
                continue;
            }

            let label = letter_spaced(wf.label());
            let g = wf.gradient();
            let n = label.chars().count();
            let mut x = i32::from(inner.x) + 1;
            for (j, ch) in label.chars().enumerate() {
                let mut style =
                    Style::default().fg(theme::color(theme::gradient_at(&g, j, n)));
                if selected {
                    style = style.add_modifier(Modifier::BOLD);
                }
                let mut s = [0u8; 4];
                x = put_str(buf, inner, x, i32::from(inner.y), ch.encode_utf8(&mut s), style);
            }

            if inner.height > 1 {
                let tint = if selected { TEXT } else { MUTED };
                put_str(
                    buf,
                    inner,
                    i32::from(inner.x) + 1,
                    i32::from(inner.y) + 1,
                    wf.tagline(),
                    Style::default().fg(theme::color(tint)),
                );
            }
        }
    }
}
