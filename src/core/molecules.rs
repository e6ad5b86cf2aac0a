//! Molecule bench behind the materials workflow's generate → predict →
//! select → validate sections.
//!
//! Generation takes [`GENERATION_DELAY`]; the candidates are drawn up front
//! and revealed when the delay has elapsed on a later frame.  Predictions
//! are derived from the SMILES composition so the same molecule always
//! scores the same.

use std::time::{Duration, Instant};

use rand::seq::IndexedRandom;
use rand::Rng;
use thiserror::Error;

use super::content::{materials, MOLECULE_SMILES};
use super::panel::{GridAnchor, PanelView, SectionPanel};

pub const GRID_SIDE: usize = 5;
pub const GRID_CELLS: usize = GRID_SIDE * GRID_SIDE;
pub const GENERATION_DELAY: Duration = Duration::from_millis(2000);
/// Candidates picked by [`MoleculeBench::auto_select`] from the keyboard.
pub const AUTO_SELECT_COUNT: usize = 5;
/// Predicted stability a candidate needs to pass validation.
pub const PASS_STABILITY: f64 = 60.0;

/// Sections the bench is shown on.
pub const OWNED_SECTIONS: [usize; 4] = [
    materials::GENERATE,
    materials::PREDICT,
    materials::SELECT,
    materials::VALIDATE,
];

/// Grid placement per owned section.
pub fn grid_anchor(section: usize) -> Option<GridAnchor> {
    match section {
        materials::GENERATE => Some(GridAnchor::Right),
        materials::PREDICT | materials::SELECT => Some(GridAnchor::Left),
        materials::VALIDATE => Some(GridAnchor::Center),
        _ => None,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BenchError {
    #[error("candidates are still being generated")]
    Busy,
    #[error("generate candidates first")]
    NotGenerated,
    #[error("run the property predictions first")]
    NotPredicted,
    #[error("select at least one candidate")]
    NothingSelected,
}

// ───────────────────────────────────────── predictions ───────

/// The two figures shown on a predicted cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Band gap in eV, `0..=10`.
    pub band_gap: f64,
    /// Stability score in percent, `0..=100`.
    pub stability: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Composition {
    heavy_atoms: u32,
    hetero_atoms: u32,
    ring_closures: u32,
    branches: u32,
    multiple_bonds: u32,
}

fn composition(smiles: &str) -> Composition {
    let mut c = Composition::default();
    for ch in smiles.chars() {
        match ch {
            'C' | 'c' => c.heavy_atoms += 1,
            'N' | 'O' | 'S' | 'n' | 'o' | 's' => {
                c.heavy_atoms += 1;
                c.hetero_atoms += 1;
            }
            // Second letter of `Cl`; the `C` was already counted.
            'l' => c.hetero_atoms += 1,
            '(' => c.branches += 1,
            '=' | '#' => c.multiple_bonds += 1,
            d if d.is_ascii_digit() => c.ring_closures += 1,
            _ => {}
        }
    }
    c.ring_closures /= 2;
    c
}

fn round_to(v: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (v * scale).round() / scale
}

/// Deterministic property estimate from the molecule's composition.
pub fn predict_properties(smiles: &str) -> Prediction {
    let c = composition(smiles);
    let band_gap = 1.5
        + 0.8 * f64::from(c.ring_closures)
        + 0.45 * f64::from(c.hetero_atoms)
        + 0.12 * f64::from(c.multiple_bonds);
    let stability = 30.0 + 2.5 * f64::from(c.heavy_atoms) + 7.0 * f64::from(c.ring_closures)
        - 4.0 * f64::from(c.branches);
    Prediction {
        band_gap: round_to(band_gap.clamp(0.0, 10.0), 2),
        stability: round_to(stability.clamp(0.0, 100.0), 1),
    }
}

// ───────────────────────────────────────── bench ─────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub smiles: &'static str,
    pub prediction: Option<Prediction>,
    pub selected: bool,
    pub verdict: Option<Verdict>,
}

impl Cell {
    fn new(smiles: &'static str) -> Self {
        Self {
            smiles,
            prediction: None,
            selected: false,
            verdict: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Empty,
    Generating {
        started: Instant,
        pending: Vec<&'static str>,
    },
    Ready,
}

#[derive(Debug, Clone)]
pub struct MoleculeBench {
    stage: Stage,
    cells: Vec<Cell>,
    cursor: usize,
}

impl Default for MoleculeBench {
    fn default() -> Self {
        Self::new()
    }
}

impl MoleculeBench {
    pub fn new() -> Self {
        Self {
            stage: Stage::Empty,
            cells: Vec::new(),
            cursor: 0,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.stage, Stage::Generating { .. })
    }

    /// Fraction of the generation delay elapsed at `now`; `None` when idle.
    pub fn generation_progress(&self, now: Instant) -> Option<f64> {
        match &self.stage {
            Stage::Generating { started, .. } => Some(
                (now.saturating_duration_since(*started).as_secs_f64()
                    / GENERATION_DELAY.as_secs_f64())
                .min(1.0),
            ),
            _ => None,
        }
    }

    pub fn is_predicted(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(|c| c.prediction.is_some())
    }

    pub fn selected_count(&self) -> usize {
        self.cells.iter().filter(|c| c.selected).count()
    }

    /// Draw a fresh set of unique candidates.  Previous results are dropped.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        now: Instant,
        rng: &mut R,
    ) -> Result<(), BenchError> {
        if self.is_generating() {
            return Err(BenchError::Busy);
        }
        let pending: Vec<&'static str> = MOLECULE_SMILES
            .choose_multiple(rng, GRID_CELLS)
            .copied()
            .collect();
        tracing::debug!("generating {} candidates", pending.len());
        self.cells.clear();
        self.cursor = 0;
        self.stage = Stage::Generating { started: now, pending };
        Ok(())
    }

    /// Reveal the generated cells once the delay has passed.
    pub fn tick(&mut self, now: Instant) {
        let done = match &self.stage {
            Stage::Generating { started, .. } => {
                now.saturating_duration_since(*started) >= GENERATION_DELAY
            }
            _ => false,
        };
        if !done {
            return;
        }
        let stage = std::mem::replace(&mut self.stage, Stage::Ready);
        if let Stage::Generating { pending, .. } = stage {
            self.cells = pending.into_iter().map(Cell::new).collect();
        }
    }

    fn require_cells(&self) -> Result<(), BenchError> {
        if self.is_generating() {
            Err(BenchError::Busy)
        } else if self.cells.is_empty() {
            Err(BenchError::NotGenerated)
        } else {
            Ok(())
        }
    }

    pub fn predict(&mut self) -> Result<(), BenchError> {
        self.require_cells()?;
        for cell in &mut self.cells {
            cell.prediction = Some(predict_properties(cell.smiles));
        }
        Ok(())
    }

    /// Move the cursor by whole cells, staying inside the grid.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        if self.cells.is_empty() {
            return;
        }
        let side = GRID_SIDE as isize;
        let col = (self.cursor as isize % side + dx).clamp(0, side - 1);
        let row = (self.cursor as isize / side + dy).clamp(0, side - 1);
        let idx = (row * side + col) as usize;
        self.cursor = idx.min(self.cells.len() - 1);
    }

    pub fn toggle_selected(&mut self) -> Result<(), BenchError> {
        self.require_cells()?;
        if !self.is_predicted() {
            return Err(BenchError::NotPredicted);
        }
        if let Some(cell) = self.cells.get_mut(self.cursor) {
            cell.selected = !cell.selected;
            cell.verdict = None;
        }
        Ok(())
    }

    /// Select the `k` most stable candidates, replacing the current selection.
    pub fn auto_select(&mut self, k: usize) -> Result<(), BenchError> {
        self.require_cells()?;
        if !self.is_predicted() {
            return Err(BenchError::NotPredicted);
        }
        let mut ranked: Vec<(usize, f64)> = self
            .cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.prediction.map(|p| (i, p.stability)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        for cell in &mut self.cells {
            cell.selected = false;
            cell.verdict = None;
        }
        for (i, _) in ranked.into_iter().take(k) {
            self.cells[i].selected = true;
        }
        Ok(())
    }

    /// Give every selected candidate a verdict.  Returns `(passed, failed)`.
    pub fn validate(&mut self) -> Result<(usize, usize), BenchError> {
        self.require_cells()?;
        if self.selected_count() == 0 {
            return Err(BenchError::NothingSelected);
        }
        let (mut passed, mut failed) = (0, 0);
        for cell in self.cells.iter_mut().filter(|c| c.selected) {
            let ok = cell
                .prediction
                .is_some_and(|p| p.stability >= PASS_STABILITY);
            cell.verdict = Some(if ok {
                passed += 1;
                Verdict::Pass
            } else {
                failed += 1;
                Verdict::Fail
            });
        }
        Ok((passed, failed))
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl SectionPanel for MoleculeBench {
    fn on_leave(&mut self) {
        self.reset();
    }

    fn on_frame(&mut self, now: Instant, _view: &PanelView) {
        self.tick(now);
    }
}
