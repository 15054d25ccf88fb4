//! Conflict-counting objective.
//!
//! Eggs are tallied per line in four families: columns, rows, diagonals
//! (`x + y` constant) and anti-diagonals (`x - y` constant). Each line
//! contributes `max(count - K, 0)`. Straight families weigh
//! [`STRAIGHT_WEIGHT`], diagonal families [`DIAGONAL_WEIGHT`].

use std::cell::RefCell;

use super::board::{Placement, PuzzleSpec};

pub const STRAIGHT_WEIGHT: f64 = 0.9;
pub const DIAGONAL_WEIGHT: f64 = 0.1;

/// Excess egg counts per line family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Violations {
    pub columns: usize,
    pub rows: usize,
    pub diagonals: usize,
    pub anti_diagonals: usize,
}

impl Violations {
    /// Weighted badness. Exactly `0.0` iff every family is clean.
    pub fn score(&self) -> f64 {
        STRAIGHT_WEIGHT * (self.columns + self.rows) as f64
            + DIAGONAL_WEIGHT * (self.diagonals + self.anti_diagonals) as f64
    }

    pub fn is_valid(&self) -> bool {
        self.columns + self.rows + self.diagonals + self.anti_diagonals == 0
    }
}

/// Per-line counters, kept so repeated evaluations reuse their storage.
///
/// A tally resizes itself to whatever spec it is handed, so one instance
/// serves any number of puzzles.
#[derive(Debug, Clone, Default)]
pub struct LineTally {
    columns: Vec<usize>,
    rows: Vec<usize>,
    diagonals: Vec<usize>,
    anti_diagonals: Vec<usize>,
}

impl LineTally {
    pub fn new(spec: &PuzzleSpec) -> Self {
        Self {
            columns: vec![0; spec.width()],
            rows: vec![0; spec.height()],
            diagonals: vec![0; spec.diagonal_count()],
            anti_diagonals: vec![0; spec.diagonal_count()],
        }
    }

    /// Counts `placement` from scratch.
    pub fn violations(&mut self, spec: &PuzzleSpec, placement: &Placement) -> Violations {
        self.reset(spec);

        // Shifting x - y by height - 1 maps the anti-diagonals onto 0..M+N-1.
        let shift = spec.height() - 1;
        for c in placement.iter() {
            debug_assert!(spec.in_bounds(*c), "egg {c} outside the grid");
            self.columns[c.x] += 1;
            self.rows[c.y] += 1;
            self.diagonals[c.x + c.y] += 1;
            self.anti_diagonals[c.x + shift - c.y] += 1;
        }

        let k = spec.max_per_line();
        Violations {
            columns: excess(&self.columns, k),
            rows: excess(&self.rows, k),
            diagonals: excess(&self.diagonals, k),
            anti_diagonals: excess(&self.anti_diagonals, k),
        }
    }

    fn reset(&mut self, spec: &PuzzleSpec) {
        for (counts, len) in [
            (&mut self.columns, spec.width()),
            (&mut self.rows, spec.height()),
            (&mut self.diagonals, spec.diagonal_count()),
            (&mut self.anti_diagonals, spec.diagonal_count()),
        ] {
            counts.clear();
            counts.resize(len, 0);
        }
    }
}

fn excess(counts: &[usize], k: usize) -> usize {
    counts.iter().map(|&n| n.saturating_sub(k)).sum()
}

thread_local! {
    static TALLY: RefCell<LineTally> = RefCell::new(LineTally::default());
}

/// Per-family violations of `placement`.
///
/// Counts into a per-thread [`LineTally`], so scoring a neighborhood does
/// not allocate once the counters have grown to the grid size.
pub fn violations(spec: &PuzzleSpec, placement: &Placement) -> Violations {
    TALLY.with(|tally| tally.borrow_mut().violations(spec, placement))
}

/// Weighted badness of `placement`; 0 means it is a solution.
pub fn evaluate(spec: &PuzzleSpec, placement: &Placement) -> f64 {
    violations(spec, placement).score()
}
