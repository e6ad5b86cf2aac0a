//! Low-level text placement for content that slides partially off-screen.
//!
//! Ratatui clips at the widget's area but cannot start a line left of it;
//! these helpers take signed coordinates and drop whatever falls outside
//! the clip rectangle.  Every glyph is assumed to be one cell wide.

use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use crate::core::content::Run;

/// Write `text` starting at signed column `x`, clipped to `clip`.
pub fn put_str(buf: &mut Buffer, clip: Rect, x: i32, y: i32, text: &str, style: Style) -> i32 {
    let mut col = x;
    let row_ok = y >= i32::from(clip.y) && y < i32::from(clip.y) + i32::from(clip.height);
    for ch in text.chars() {
        if row_ok && col >= i32::from(clip.x) && col < i32::from(clip.x) + i32::from(clip.width) {
            if let Some(cell) = buf.cell_mut((col as u16, y as u16)) {
                cell.set_char(ch).set_style(style);
            }
        }
        col += 1;
    }
    col
}

/// Insert a space between letters: `"impact"` → `"i m p a c t"`.
pub fn letter_spaced(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Greedy word wrap of emphasis runs into lines no wider than `width`.
/// Words longer than `width` are hard-split.
pub fn wrap_runs(runs: &[Run], width: usize) -> Vec<Vec<Run>> {
    let mut wrap = Wrapper {
        width: width.max(1),
        lines: Vec::new(),
        line: Vec::new(),
        used: 0,
    };
    // Whitespace seen since the last word, possibly in an earlier run.
    let mut gap = false;

    for run in runs {
        let mut rest = run.text.as_str();
        loop {
            let trimmed = rest.trim_start();
            if trimmed.len() != rest.len() {
                gap = true;
            }
            if trimmed.is_empty() {
                break;
            }
            let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
            wrap.place(&trimmed[..end], run.strong, gap);
            rest = &trimmed[end..];
            gap = false;
        }
    }
    if !wrap.line.is_empty() {
        wrap.lines.push(wrap.line);
    }
    wrap.lines
}

struct Wrapper {
    width: usize,
    lines: Vec<Vec<Run>>,
    line: Vec<Run>,
    used: usize,
}

impl Wrapper {
    fn break_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.line));
        self.used = 0;
    }

    fn place(&mut self, word: &str, strong: bool, space: bool) {
        let len = word.chars().count();
        let space = space && self.used > 0;
        if self.used > 0 && self.used + usize::from(space) + len > self.width {
            self.break_line();
            return self.place(word, strong, false);
        }
        if len > self.width {
            let split = word
                .char_indices()
                .nth(self.width)
                .map_or(word.len(), |(i, _)| i);
            append(&mut self.line, &word[..split], strong);
            self.break_line();
            return self.place(&word[split..], strong, false);
        }
        if space {
            // The gap keeps the emphasis of the text before it.
            let prev = self.line.last().map_or(strong, |r| r.strong);
            append(&mut self.line, " ", prev);
            self.used += 1;
        }
        append(&mut self.line, word, strong);
        self.used += len;
    }
}

fn append(line: &mut Vec<Run>, text: &str, strong: bool) {
    match line.last_mut() {
        Some(last) if last.strong == strong => last.text.push_str(text),
        _ => line.push(Run {
            text: text.to_string(),
            strong,
        }),
    }
}

/// Width of a wrapped line in cells.
pub fn line_width(line: &[Run]) -> usize {
    line.iter().map(|r| r.text.chars().count()).sum()
}
