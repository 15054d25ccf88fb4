//! Single-egg vertical moves.
//!
//! An egg may move to any free row of its own column. It never changes
//! column, so column counts are invariant under this move set.

use super::board::{Coordinate, Placement, PuzzleSpec};

/// Relocation of egg `egg` (its index in the placement) to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub egg: usize,
    pub to: Coordinate,
}

/// Every legal move from `placement`, eggs in placement order, target rows
/// ascending.
pub fn candidate_moves(spec: &PuzzleSpec, placement: &Placement) -> Vec<Move> {
    let width = spec.width();
    let mut occupied = vec![false; spec.capacity()];
    for c in placement.iter() {
        occupied[c.y * width + c.x] = true;
    }

    let mut moves = Vec::with_capacity(placement.len() * spec.height().saturating_sub(1));
    for (egg, c) in placement.iter().enumerate() {
        for y in (0..spec.height()).filter(|&y| y != c.y) {
            if !occupied[y * width + c.x] {
                moves.push(Move {
                    egg,
                    to: Coordinate::new(c.x, y),
                });
            }
        }
    }
    moves
}

/// The neighborhood of `placement`: one placement per legal move.
pub fn neighbors(spec: &PuzzleSpec, placement: &Placement) -> Vec<Placement> {
    candidate_moves(spec, placement)
        .into_iter()
        .map(|m| placement.moved(m.egg, m.to))
        .collect()
}
