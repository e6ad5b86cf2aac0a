//! Deck area — the horizontally scrolling pages and the section panels
//! drawn over them.
//!
//! Pages move with the controller's `scroll_left`; panels stay put and
//! fade with their own opacity, which is how they hand over from one
//! section to the next.

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Widget},
};

use crate::app::deck::{DeckState, Panels};
use crate::core::content::{
    digital_twin, materials, parse_markup, Rgb, WorkflowId, IMPACT_METRICS, INDUSTRIES,
};
use crate::core::counter::ImpactCounters;
use crate::core::molecules::{grid_anchor, MoleculeBench, Verdict, GRID_SIDE};
use crate::core::panel::{anchor_offset, effective_width, panel_opacity, FadeWindows, PanelView};
use crate::core::training::{RunStatus, SessionState, TrainingBoard};
use crate::core::twin::{TwinLab, MODEL_CATALOG};

use super::spinner::BusyIndicator;
use super::text::{put_str, wrap_runs};
use super::theme::{self, CYAN, GREEN, MUTED, ORANGE, RED, TEXT};

/// Width assumed for the grid container before the first layout.
const FALLBACK_WIDTH: f64 = 80.0;

pub struct DeckView<'a> {
    pub deck: &'a DeckState,
    /// Keyboard focus is on the panel (shows the grid cursor).
    pub panel_focus: bool,
    /// Display of the key bound to the section's step.
    pub activate_key: &'a str,
    pub now: Instant,
}

impl Widget for DeckView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        draw_pages(self.deck, self.activate_key, area, buf);

        let tick = self.deck.frame_tick;
        match &self.deck.panels {
            Panels::None => {}
            Panels::Materials {
                bench,
                industries,
                impact,
            } => {
                if let (Some(panel), Some(view)) = (bench.panel(), bench.view()) {
                    MoleculeGrid {
                        bench: panel,
                        view,
                        cursor_visible: self.panel_focus,
                        tick,
                        now: self.now,
                    }
                    .render(area, buf);
                }
                if let Some(view) = industries.view() {
                    IndustryCards { opacity: view.opacity }.render(area, buf);
                }
                if let (Some(panel), Some(view)) = (impact.panel(), impact.view()) {
                    ImpactPanel {
                        counters: panel,
                        opacity: view.opacity,
                    }
                    .render(area, buf);
                }
            }
            Panels::DigitalTwin { lab } => {
                if let (Some(panel), Some(view)) = (lab.panel(), lab.view()) {
                    draw_lab(panel, view, self.panel_focus, tick, area, buf);
                }
            }
        }
    }
}

// ───────────────────────────────────────── pages ─────────────

/// Footer line of a section page.
fn section_hint(workflow: WorkflowId, index: usize, key: &str) -> Option<String> {
    let hint = match (workflow, index) {
        (WorkflowId::Materials, materials::GENERATE) => format!("{key}  generate candidates"),
        (WorkflowId::Materials, materials::PREDICT) => format!("{key}  predict properties"),
        (WorkflowId::Materials, materials::SELECT) => {
            format!("{key}  select the top candidates, or pick them by hand")
        }
        (WorkflowId::Materials, materials::VALIDATE) => format!("{key}  validate the selection"),
        (WorkflowId::DigitalTwin, digital_twin::DATASET) => format!("{key}  next dataset"),
        (WorkflowId::DigitalTwin, digital_twin::MODELS) => {
            "focus the panel to pick models".to_string()
        }
        (WorkflowId::DigitalTwin, digital_twin::TRAIN) => format!("{key}  start training"),
        (WorkflowId::DigitalTwin, digital_twin::IMPORTANCE) => {
            format!("{key}  next trained model")
        }
        _ => return None,
    };
    Some(hint)
}

/// Section number and footer hint, positioned by the scroll offset.
fn draw_pages(deck: &DeckState, key: &str, area: Rect, buf: &mut Buffer) {
    let controller = &deck.controller;
    let width = controller
        .client_width()
        .unwrap_or_else(|| f64::from(area.width));
    let scroll = controller.scroll_left();
    let count = deck.sections().len();

    for i in 0..count {
        let left = i as f64 * width - scroll;
        if left >= width || left + width <= 0.0 {
            continue;
        }
        // Pages dim as they slide away from the viewport.
        let opacity = 1.0 - (left.abs() / width).min(1.0);
        let x = i32::from(area.x) + left.round() as i32;

        if let Some(style) = theme::faded_style(MUTED, opacity) {
            let number = format!("{:02} / {:02}", i + 1, count);
            put_str(buf, area, x + 2, i32::from(area.y), &number, style);
        }

        let Some(hint) = section_hint(deck.workflow, i, key) else {
            continue;
        };
        if let Some(style) = theme::faded_style(TEXT, opacity * 0.7) {
            let len = hint.chars().count() as i32;
            let hx = x + (width.round() as i32 - len) / 2;
            let y = i32::from(area.y) + i32::from(area.height) - 1;
            put_str(buf, area, hx, y, &hint, style.add_modifier(Modifier::ITALIC));
        }
    }
}

// ───────────────────────────────────────── shared ────────────

/// Cut `s` to `max` cells, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

fn panel_block<'a>(title: &'a str, border: Rgb, opacity: f64) -> Option<Block<'a>> {
    let border_style = theme::faded_style(border, opacity)?;
    let title_style = theme::faded_style(TEXT, opacity)?.add_modifier(Modifier::BOLD);
    Some(
        Block::default()
            .title(title)
            .title_style(title_style)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style),
    )
}

/// Centered rectangle of at most `w`×`h` inside `area`.
fn centered(area: Rect, w: u16, h: u16) -> Rect {
    super::layout::centered_fixed(w, h, area)
}

// ───────────────────────────────────────── molecules ─────────

struct MoleculeGrid<'a> {
    bench: &'a MoleculeBench,
    view: &'a PanelView,
    cursor_visible: bool,
    tick: u64,
    now: Instant,
}

/// Rows per grid cell: formula, then predictions.
const CELL_ROWS: u16 = 2;

impl MoleculeGrid<'_> {
    fn rect(&self, area: Rect) -> Rect {
        let side = GRID_SIDE as u16;
        let cell_w = (area.width.saturating_sub(2) / side).clamp(8, 16);
        let w = (cell_w * side + 2).min(area.width);
        // Keep the bottom row free for the page hint.
        let h = (side * CELL_ROWS + 2).min(area.height.saturating_sub(1));

        let container = effective_width(f64::from(area.width), FALLBACK_WIDTH);
        let offset = anchor_offset(grid_anchor, &self.view.progress, container, f64::from(w));
        let x = area.x + (offset.round().max(0.0) as u16).min(area.width - w);
        let y = area.y + area.height.saturating_sub(1).saturating_sub(h) / 2;
        Rect::new(x, y, w, h)
    }
}

impl Widget for MoleculeGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let opacity = self.view.opacity;
        let rect = self.rect(area);
        let Some(block) = panel_block(" candidates ", MUTED, opacity) else {
            return;
        };
        let inner = block.inner(rect);
        block.render(rect, buf);

        let progress = self.bench.generation_progress(self.now);
        let label = progress.map(|p| format!("generating {:>3.0}%", p * 100.0));
        BusyIndicator {
            visible: label.is_some(),
            tick: self.tick,
            label: label.as_deref().unwrap_or_default(),
        }
        .render(rect, buf);

        let Some(dim) = theme::faded_style(MUTED, opacity) else {
            return;
        };
        let cells = self.bench.cells();
        if cells.is_empty() {
            let text = if progress.is_some() { "…" } else { "no candidates yet" };
            let x = i32::from(inner.x) + (i32::from(inner.width) - text.chars().count() as i32) / 2;
            let y = i32::from(inner.y) + i32::from(inner.height) / 2;
            put_str(buf, inner, x, y, text, dim);
            return;
        }

        let side = GRID_SIDE as u16;
        let cell_w = inner.width / side;
        let text = theme::faded_style(TEXT, opacity).unwrap_or(dim);
        let cyan = theme::faded_style(CYAN, opacity).unwrap_or(dim);
        let orange = theme::faded_style(ORANGE, opacity).unwrap_or(dim);
        let green = theme::faded_style(GREEN, opacity).unwrap_or(dim);
        let red = theme::faded_style(RED, opacity).unwrap_or(dim);

        for (i, cell) in cells.iter().enumerate() {
            let col = (i % GRID_SIDE) as u16;
            let row = (i / GRID_SIDE) as u16;
            let x = i32::from(inner.x + col * cell_w);
            let y = i32::from(inner.y + row * CELL_ROWS);

            let (marker, marker_style) = match (cell.verdict, cell.selected) {
                (Some(Verdict::Pass), _) => ("✓", green),
                (Some(Verdict::Fail), _) => ("✗", red),
                (None, true) => ("●", green),
                (None, false) => (" ", dim),
            };
            let mut formula = if cell.selected { text } else { dim };
            if self.cursor_visible && i == self.bench.cursor() {
                formula = formula.add_modifier(Modifier::REVERSED);
            }
            let max = usize::from(cell_w.saturating_sub(2));
            let nx = put_str(buf, inner, x, y, marker, marker_style);
            put_str(buf, inner, nx, y, &truncate(cell.smiles, max), formula);

            if let Some(p) = cell.prediction {
                let gap = put_str(buf, inner, x + 1, y + 1, &format!("{:.2}", p.band_gap), cyan);
                put_str(buf, inner, gap + 1, y + 1, &format!("{:.1}", p.stability), orange);
            }
        }
    }
}

// ───────────────────────────────────────── industries ────────

struct IndustryCards {
    opacity: f64,
}

impl Widget for IndustryCards {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let grid = centered(area, 100, area.height.saturating_sub(1));
        let card_w = grid.width / 2;
        let card_h = grid.height / 2;
        if card_w < 10 || card_h < 3 {
            return;
        }

        for (i, industry) in INDUSTRIES.iter().enumerate().take(4) {
            let rect = Rect::new(
                grid.x + (i as u16 % 2) * card_w,
                grid.y + (i as u16 / 2) * card_h,
                card_w,
                card_h,
            );
            let Some(block) = panel_block("", industry.gradient.1, self.opacity) else {
                return;
            };
            let inner = block.inner(rect);
            block.render(rect, buf);

            // Title in the card's gradient.
            let n = industry.title.chars().count();
            let mut x = i32::from(inner.x) + 1;
            for (j, ch) in industry.title.chars().enumerate() {
                let tint = theme::gradient_at(&industry.gradient, j, n);
                let Some(style) = theme::faded_style(tint, self.opacity) else {
                    break;
                };
                let mut s = [0u8; 4];
                x = put_str(
                    buf,
                    inner,
                    x,
                    i32::from(inner.y),
                    ch.encode_utf8(&mut s),
                    style.add_modifier(Modifier::BOLD),
                );
            }

            let Some(body) = theme::faded_style(MUTED, self.opacity) else {
                continue;
            };
            let mut y = i32::from(inner.y) + 1;
            let width = usize::from(inner.width.saturating_sub(4));
            for case in industry.use_cases {
                for (k, line) in wrap_runs(&parse_markup(case), width).iter().enumerate() {
                    let bullet = if k == 0 { "• " } else { "  " };
                    let lx = put_str(buf, inner, i32::from(inner.x) + 1, y, bullet, body);
                    let line: String = line.iter().map(|r| r.text.as_str()).collect();
                    put_str(buf, inner, lx, y, &line, body);
                    y += 1;
                }
            }
        }
    }
}

// ───────────────────────────────────────── impact ────────────

struct ImpactPanel<'a> {
    counters: &'a ImpactCounters,
    opacity: f64,
}

impl Widget for ImpactPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accents = [CYAN, ORANGE, GREEN];
        let labels = self.counters.count_up().labels();
        let n = IMPACT_METRICS.len().min(labels.len()) as u16;
        if n == 0 {
            return;
        }
        let row = centered(area, 110, area.height.saturating_sub(1));
        let col_w = row.width / n;
        if col_w < 12 {
            return;
        }

        for (i, (metric, value)) in IMPACT_METRICS.iter().zip(&labels).enumerate() {
            let col = Rect::new(row.x + i as u16 * col_w, row.y, col_w, row.height);
            let value = value.as_str();
            let accent = accents[i % accents.len()];
            let Some(big) = theme::faded_style(accent, self.opacity) else {
                return;
            };
            let center = |s: &str| {
                i32::from(col.x) + (i32::from(col.width) - s.chars().count() as i32) / 2
            };
            let mut y = i32::from(col.y) + 1;
            put_str(buf, col, center(value), y, value, big.add_modifier(Modifier::BOLD));
            y += 2;

            if let Some(style) = theme::faded_style(TEXT, self.opacity) {
                let label = metric.label;
                put_str(buf, col, center(label), y, label, style.add_modifier(Modifier::BOLD));
            }
            y += 2;

            let Some(body) = theme::faded_style(MUTED, self.opacity) else {
                continue;
            };
            let width = usize::from(col.width.saturating_sub(4));
            for line in wrap_runs(&parse_markup(metric.description), width) {
                let line: String = line.iter().map(|r| r.text.as_str()).collect();
                put_str(buf, col, center(&line), y, &line, body);
                y += 1;
            }
            y += 1;
            if let Some(faint) = theme::faded_style(MUTED, self.opacity * 0.6) {
                for line in wrap_runs(&parse_markup(metric.reference), width) {
                    let line: String = line.iter().map(|r| r.text.as_str()).collect();
                    put_str(buf, col, center(&line), y, &line, faint);
                    y += 1;
                }
            }
        }
    }
}

// ───────────────────────────────────────── digital twin ──────

/// Each lab section crossfades its own widget; the lab itself stays
/// mounted across all of them.
fn draw_lab(
    lab: &TwinLab,
    view: &PanelView,
    cursor_visible: bool,
    tick: u64,
    area: Rect,
    buf: &mut Buffer,
) {
    let opacity = |section: usize| {
        view.opacity * panel_opacity(&[section], &view.progress, FadeWindows::CROSSFADE)
    };

    let o = opacity(digital_twin::DATASET);
    if o > 0.0 {
        DatasetPanel { lab, opacity: o, cursor_visible }.render(area, buf);
    }
    let o = opacity(digital_twin::MODELS);
    if o > 0.0 {
        ModelPanel { lab, opacity: o, cursor_visible }.render(area, buf);
    }
    let o = opacity(digital_twin::TRAIN);
    if o > 0.0 {
        TrainingPanel {
            board: lab.board(),
            opacity: o,
            tick,
        }
        .render(area, buf);
    }
    let o = opacity(digital_twin::IMPORTANCE);
    if o > 0.0 {
        ImportancePanel { lab, opacity: o }.render(area, buf);
    }
}

/// `12480` → `12,480`.
fn thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

struct DatasetPanel<'a> {
    lab: &'a TwinLab,
    opacity: f64,
    cursor_visible: bool,
}

impl Widget for DatasetPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = centered(area, 64, area.height.saturating_sub(1));
        let Some(block) = panel_block(" dataset ", CYAN, self.opacity) else {
            return;
        };
        let inner = block.inner(rect);
        block.render(rect, buf);
        let Some(dim) = theme::faded_style(MUTED, self.opacity) else {
            return;
        };
        let text = theme::faded_style(TEXT, self.opacity).unwrap_or(dim);
        let cyan = theme::faded_style(CYAN, self.opacity).unwrap_or(dim);

        let dataset = self.lab.dataset();
        let x0 = i32::from(inner.x) + 1;
        let mut y = i32::from(inner.y);
        let name = format!("◀ {} ▶", dataset.name);
        put_str(buf, inner, x0, y, &name, cyan.add_modifier(Modifier::BOLD));
        y += 1;
        let facts = format!(
            "rows {} · features {} · classes {} · target {}",
            thousands(dataset.rows),
            dataset.features.len(),
            dataset.classes,
            dataset.target,
        );
        put_str(buf, inner, x0, y, &facts, dim);
        y += 2;

        for (i, feature) in dataset.features.iter().enumerate() {
            let included = !self.lab.is_excluded(i);
            let mark = if included { "[x] " } else { "[ ] " };
            let mut style = if included { text } else { dim };
            if self.cursor_visible && i == self.lab.feature_cursor() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let x = put_str(buf, inner, x0, y, mark, dim);
            put_str(buf, inner, x, y, feature, style);
            y += 1;
        }
    }
}

struct ModelPanel<'a> {
    lab: &'a TwinLab,
    opacity: f64,
    cursor_visible: bool,
}

impl Widget for ModelPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = centered(area, 48, area.height.saturating_sub(1));
        let Some(block) = panel_block(" models ", CYAN, self.opacity) else {
            return;
        };
        let inner = block.inner(rect);
        block.render(rect, buf);
        let Some(dim) = theme::faded_style(MUTED, self.opacity) else {
            return;
        };
        let text = theme::faded_style(TEXT, self.opacity).unwrap_or(dim);
        let green = theme::faded_style(GREEN, self.opacity).unwrap_or(dim);

        let x0 = i32::from(inner.x) + 1;
        let mut y = i32::from(inner.y);
        for (i, model) in MODEL_CATALOG.iter().enumerate() {
            let selected = self.lab.is_model_selected(i);
            let (mark, mark_style) = if selected { ("● ", green) } else { ("○ ", dim) };
            let mut style = if selected { text } else { dim };
            if self.cursor_visible && i == self.lab.model_cursor() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let x = put_str(buf, inner, x0, y, mark, mark_style);
            put_str(buf, inner, x, y, model, style);
            y += 1;
        }
        y += 1;
        let count = self.lab.selected_models().len();
        put_str(buf, inner, x0, y, &format!("{count} selected"), dim);
    }
}

struct ImportancePanel<'a> {
    lab: &'a TwinLab,
    opacity: f64,
}

impl Widget for ImportancePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = centered(area, 64, area.height.saturating_sub(1));
        let Some(block) = panel_block(" feature importance ", GREEN, self.opacity) else {
            return;
        };
        let inner = block.inner(rect);
        block.render(rect, buf);
        let Some(dim) = theme::faded_style(MUTED, self.opacity) else {
            return;
        };
        let text = theme::faded_style(TEXT, self.opacity).unwrap_or(dim);
        let green = theme::faded_style(GREEN, self.opacity).unwrap_or(dim);

        let x0 = i32::from(inner.x) + 1;
        let mut y = i32::from(inner.y);
        let (Some(model), Ok(importances)) = (self.lab.inspected_model(), self.lab.importances())
        else {
            put_str(buf, inner, x0, y, "train a model first", dim);
            return;
        };
        let header = format!("◀ {model} ▶");
        put_str(buf, inner, x0, y, &header, green.add_modifier(Modifier::BOLD));
        y += 2;

        // Bars are scaled to the most important feature.
        let top = importances.first().map_or(0.0, |i| i.importance);
        for item in &importances {
            let scaled = if top > 0.0 { item.importance / top * 100.0 } else { 0.0 };
            let name = format!("{:<16}", truncate(&item.feature, 16));
            let mut x = put_str(buf, inner, x0, y, &name, text);
            x = put_str(buf, inner, x + 1, y, &bar(scaled, BAR_WIDTH), green);
            put_str(buf, inner, x + 1, y, &format!("{:>5.1}%", item.importance * 100.0), text);
            y += 1;
        }
    }
}

// ───────────────────────────────────────── training ──────────

struct TrainingPanel<'a> {
    board: &'a TrainingBoard,
    opacity: f64,
    tick: u64,
}

/// Width of a model's progress bar.
const BAR_WIDTH: usize = 20;

fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

impl Widget for TrainingPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let board = self.board;
        let rect = centered(area, 76, area.height.saturating_sub(1));
        let Some(block) = panel_block(" training ", CYAN, self.opacity) else {
            return;
        };
        let inner = block.inner(rect);
        block.render(rect, buf);

        let busy = matches!(board.state(), SessionState::Preparing | SessionState::Running);
        let label = match board.state() {
            SessionState::Preparing => "preparing",
            _ => "training",
        };
        BusyIndicator {
            visible: busy,
            tick: self.tick,
            label,
        }
        .render(rect, buf);

        let Some(dim) = theme::faded_style(MUTED, self.opacity) else {
            return;
        };
        let text = theme::faded_style(TEXT, self.opacity).unwrap_or(dim);
        let cyan = theme::faded_style(CYAN, self.opacity).unwrap_or(dim);
        let green = theme::faded_style(GREEN, self.opacity).unwrap_or(dim);
        let red = theme::faded_style(RED, self.opacity).unwrap_or(dim);

        let x0 = i32::from(inner.x) + 1;
        let mut y = i32::from(inner.y);
        if board.runs().is_empty() {
            put_str(buf, inner, x0, y, "no session yet", dim);
            return;
        }

        for run in board.runs() {
            let name = format!("{:<20}", truncate(&run.model, 20));
            let mut x = put_str(buf, inner, x0, y, &name, text);
            let bar_style = match run.status {
                RunStatus::Failed => red,
                RunStatus::Completed => green,
                _ => cyan,
            };
            x = put_str(buf, inner, x + 1, y, &bar(run.progress, BAR_WIDTH), bar_style);
            x = put_str(buf, inner, x + 1, y, &format!("{:>3.0}%", run.progress), text);

            let (status, style): (String, Style) = match run.status {
                RunStatus::Pending => ("waiting".into(), dim),
                RunStatus::Training => ("training".into(), cyan),
                RunStatus::Completed => {
                    let metrics: Vec<String> = run
                        .numeric_metrics()
                        .take(2)
                        .map(|(k, v)| format!("{k} {v:.3}"))
                        .collect();
                    (metrics.join(" · "), green)
                }
                RunStatus::Failed => (
                    run.error.clone().unwrap_or_else(|| "failed".into()),
                    red,
                ),
            };
            put_str(buf, inner, x + 2, y, &status, style);
            y += 1;
        }

        y += 1;
        let overall = format!("overall {:>3.0}%", board.overall_progress());
        let summary_style = match board.state() {
            SessionState::Aborted(_) => red,
            SessionState::Finished => green,
            _ => text,
        };
        let x = put_str(buf, inner, x0, y, &overall, summary_style);
        if let SessionState::Aborted(reason) = board.state() {
            put_str(buf, inner, x + 2, y, &format!("aborted: {reason}"), red);
        }
        y += 2;

        // Tail of the log that still fits.
        let bottom = i32::from(inner.y) + i32::from(inner.height);
        let room = (bottom - y).max(0) as usize;
        let log = board.log();
        for entry in &log[log.len().saturating_sub(room)..] {
            let stamp = entry.at.format("%H:%M:%S").to_string();
            let x = put_str(buf, inner, x0, y, &stamp, dim);
            put_str(buf, inner, x + 2, y, &entry.text, text);
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::controller::{ScrollBehavior, ScrollConfig};
    use crate::core::training::demo_feed;
    use chrono::Local;
    use std::time::Duration;

    fn instant_config() -> ScrollConfig {
        ScrollConfig {
            behavior: ScrollBehavior::Instant,
            snap: false,
            ..ScrollConfig::default()
        }
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    fn deck_at(workflow: WorkflowId, section: usize) -> (DeckState, Instant) {
        let mut deck = DeckState::new(workflow, instant_config());
        deck.layout(100);
        let mut now = Instant::now();
        deck.controller.scroll_to_section(section, now);
        for _ in 0..3 {
            now += Duration::from_millis(16);
            deck.on_frame(now);
        }
        (deck, now)
    }

    fn render(deck: &DeckState, now: Instant) -> Vec<String> {
        let area = Rect::new(0, 0, 100, 24);
        let mut buf = Buffer::empty(area);
        DeckView {
            deck,
            panel_focus: false,
            activate_key: "Enter",
            now,
        }
        .render(area, &mut buf);
        rows(&buf)
    }

    #[test]
    fn test_truncate_marks_cut() {
        assert_eq!(truncate("CCO", 5), "CCO");
        assert_eq!(truncate("CC(=O)OC1=CC", 5), "CC(=…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_bar_fill() {
        assert_eq!(bar(50.0, 4), "██░░");
        assert_eq!(bar(150.0, 2), "██");
        assert_eq!(bar(-5.0, 2), "░░");
    }

    #[test]
    fn test_hint_follows_scroll_position() {
        let (deck, now) = deck_at(WorkflowId::Materials, materials::GENERATE);
        let screen = render(&deck, now);
        assert!(screen[0].contains("02 / 07"));
        assert!(screen[23].contains("Enter  generate candidates"));
        assert!(screen.iter().any(|r| r.contains("candidates")));
    }

    /// Train the first four models of the catalogue to completion.
    fn train_four(deck: &mut DeckState) {
        let lab = deck.panels.twin_mut().expect("mounted");
        for _ in 0..4 {
            lab.toggle_model();
            lab.move_model_cursor(1);
        }
        let at = Local::now();
        let (_, request) = lab.start(at).expect("start");
        for msg in demo_feed(&request) {
            lab.board_mut().apply(msg, at);
        }
    }

    #[test]
    fn test_training_panel_shows_runs() {
        let (mut deck, now) = deck_at(WorkflowId::DigitalTwin, digital_twin::TRAIN);
        train_four(&mut deck);
        let screen = render(&deck, now);
        assert!(screen.iter().any(|r| r.contains("Random Forest")));
        assert!(screen.iter().any(|r| r.contains("did not converge")));
        assert!(screen.iter().any(|r| r.contains("overall 100%")));
        // Only the training widget is drawn on its section.
        assert!(!screen.iter().any(|r| r.contains("feature importance")));
    }

    #[test]
    fn test_dataset_panel_lists_features() {
        let (deck, now) = deck_at(WorkflowId::DigitalTwin, digital_twin::DATASET);
        let screen = render(&deck, now);
        assert!(screen.iter().any(|r| r.contains("line_sensors.csv")));
        assert!(screen.iter().any(|r| r.contains("rows 12,480")));
        assert!(screen.iter().any(|r| r.contains("[x] temperature")));
        assert!(screen[23].contains("Enter  next dataset"));
    }

    #[test]
    fn test_importance_panel_ranks_features() {
        let (mut deck, now) = deck_at(WorkflowId::DigitalTwin, digital_twin::IMPORTANCE);
        let screen = render(&deck, now);
        assert!(screen.iter().any(|r| r.contains("train a model first")));

        train_four(&mut deck);
        let ranked: Vec<String> = deck
            .panels
            .twin_mut()
            .expect("mounted")
            .importances()
            .expect("importances")
            .into_iter()
            .map(|i| i.feature)
            .collect();
        let screen = render(&deck, now);
        assert!(screen.iter().any(|r| r.contains("◀ AdaBoost ▶")));
        let rows: Vec<usize> = ranked
            .iter()
            .map(|f| screen.iter().position(|r| r.contains(f.as_str())).expect("feature row"))
            .collect();
        assert!(rows.windows(2).all(|w| w[0] < w[1]), "{rows:?}");
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(thousands(8_760), "8,760");
        assert_eq!(thousands(20_631), "20,631");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000_000), "1,000,000");
    }

    #[test]
    fn test_spectra_has_no_hint() {
        let (deck, now) = deck_at(WorkflowId::Spectra, 0);
        let screen = render(&deck, now);
        assert!(screen[0].contains("01 / 01"));
        assert!(screen[23].trim().is_empty());
    }
}
