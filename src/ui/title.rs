//! Title block — the crossfading section title and subtitle.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::core::content::{parse_markup, Section, WorkflowId};
use crate::core::progress::ProgressDescriptor;
use crate::core::title::{SubtitleLayer, TitleLayers, TitleParams};

use super::text::{letter_spaced, line_width, put_str, wrap_runs};
use super::theme::{self, MUTED, TEXT};

/// CSS pixels per terminal row when mapping vertical shifts.
const PX_PER_ROW: f64 = 16.0;
/// Widest subtitle line.
const SUBTITLE_MAX_WIDTH: u16 = 76;

pub struct TitleView<'a> {
    pub workflow: WorkflowId,
    pub sections: &'a [Section],
    pub progress: ProgressDescriptor,
    pub params: &'a TitleParams,
}

/// Viewport-width percentage to columns.
fn vw_to_cols(vw: f64, width: u16) -> i32 {
    (vw * f64::from(width) / 100.0).round() as i32
}

fn px_to_rows(px: f64) -> i32 {
    (px / PX_PER_ROW).round() as i32
}

impl Widget for TitleView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 || self.sections.is_empty() {
            return;
        }
        let layers = TitleLayers::compute(&self.progress, self.params);
        let current_idx = self.progress.current_index.min(self.sections.len() - 1);
        let current = &self.sections[current_idx];

        // Workflow label, top-left.
        if let Some(style) = theme::faded_style(MUTED, 1.0) {
            let label = format!(
                " {} · {}/{}",
                self.workflow.label(),
                current_idx + 1,
                self.sections.len()
            );
            put_str(buf, area, i32::from(area.x), i32::from(area.y), &label, style);
        }

        let title_row = i32::from(area.y) + 2;
        let subtitle_row = title_row + 2;

        draw_title(
            buf,
            area,
            current,
            title_row,
            vw_to_cols(layers.current.translate_vw, area.width),
            layers.current.opacity,
            1.0,
        );
        draw_subtitle(buf, area, current, subtitle_row, layers.current.subtitle);

        // The next layer only exists while a transition is in flight, and the
        // neighbour may not exist at the ends of the deck.
        if let (Some(next), Some(section)) = (layers.next, self.progress.next_in(self.sections)) {
            draw_title(
                buf,
                area,
                section,
                title_row,
                vw_to_cols(next.translate_vw, area.width),
                next.opacity,
                next.color_mix,
            );
            draw_subtitle(buf, area, section, subtitle_row, next.subtitle);
        }
    }
}

/// Letter-spaced gradient title.  `color_mix` blends from the gray layer
/// (`0`) to the section gradient (`1`).
fn draw_title(
    buf: &mut Buffer,
    area: Rect,
    section: &Section,
    row: i32,
    shift: i32,
    opacity: f64,
    color_mix: f64,
) {
    let text = letter_spaced(section.title);
    let n = text.chars().count();
    let start = i32::from(area.x) + (i32::from(area.width) - n as i32) / 2 + shift;
    for (i, ch) in text.chars().enumerate() {
        if ch == ' ' {
            continue;
        }
        let tint = MUTED.mix(theme::gradient_at(&section.gradient, i, n), color_mix);
        let Some(style) = theme::faded_style(tint, opacity) else {
            return;
        };
        let mut s = [0u8; 4];
        put_str(
            buf,
            area,
            start + i as i32,
            row,
            ch.encode_utf8(&mut s),
            style.add_modifier(Modifier::BOLD),
        );
    }
}

fn draw_subtitle(buf: &mut Buffer, area: Rect, section: &Section, row: i32, layer: SubtitleLayer) {
    let Some(plain) = theme::faded_style(TEXT, layer.opacity * 0.8) else {
        return;
    };
    let strong = theme::faded_style(TEXT, layer.opacity)
        .unwrap_or(plain)
        .add_modifier(Modifier::BOLD);

    let width = area.width.saturating_sub(4).min(SUBTITLE_MAX_WIDTH);
    let lines = wrap_runs(&parse_markup(section.subtitle), usize::from(width));
    let top = row + px_to_rows(layer.translate_px);
    let bottom = i32::from(area.y) + i32::from(area.height);

    for (i, line) in lines.iter().enumerate() {
        let y = top + i as i32;
        if y >= bottom {
            break;
        }
        let mut x = i32::from(area.x) + (i32::from(area.width) - line_width(line) as i32) / 2;
        for run in line {
            let style: Style = if run.strong { strong } else { plain };
            x = put_str(buf, area, x, y, &run.text, style);
        }
    }
}
