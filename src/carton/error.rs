//! Puzzle construction errors.

use thiserror::Error;

use super::board::Coordinate;

/// Invalid puzzle or placement input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartonError {
    #[error("grid must have at least one row and one column, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("a {width}x{height} grid has more cells than fit in a usize")]
    GridTooLarge { width: usize, height: usize },

    #[error("cannot place {requested} eggs on a grid with {capacity} cells")]
    InvalidCount { requested: usize, capacity: usize },

    #[error("coordinate {coordinate} lies outside the {width}x{height} grid")]
    OutOfBounds {
        coordinate: Coordinate,
        width: usize,
        height: usize,
    },

    #[error("coordinate {0} is occupied twice")]
    DuplicateCoordinate(Coordinate),
}
