//! Grid coordinates, puzzle parameters and egg placements.

use std::collections::HashSet;
use std::fmt;

use super::error::CartonError;

/// A grid cell. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.x, self.y)
    }
}

/// Immutable puzzle parameters: an `width` x `height` grid where no line
/// may hold more than `max_per_line` eggs.
///
/// Deserialization goes through [`PuzzleSpec::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawPuzzleSpec")
)]
pub struct PuzzleSpec {
    width: usize,
    height: usize,
    max_per_line: usize,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPuzzleSpec {
    width: usize,
    height: usize,
    max_per_line: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPuzzleSpec> for PuzzleSpec {
    type Error = CartonError;

    fn try_from(raw: RawPuzzleSpec) -> Result<Self, CartonError> {
        PuzzleSpec::new(raw.width, raw.height, raw.max_per_line)
    }
}

impl PuzzleSpec {
    /// Creates a puzzle. Both dimensions must be non-zero and the cell
    /// count must fit in a `usize`.
    pub fn new(width: usize, height: usize, max_per_line: usize) -> Result<Self, CartonError> {
        if width == 0 || height == 0 {
            return Err(CartonError::EmptyGrid { width, height });
        }
        if width.checked_mul(height).is_none() {
            return Err(CartonError::GridTooLarge { width, height });
        }
        Ok(Self {
            width,
            height,
            max_per_line,
        })
    }

    /// Number of columns (M).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows (N).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Most eggs any single line may hold (K).
    pub fn max_per_line(&self) -> usize {
        self.max_per_line
    }

    /// Total number of cells.
    pub fn capacity(&self) -> usize {
        self.width * self.height
    }

    /// Number of lines in each diagonal family.
    pub fn diagonal_count(&self) -> usize {
        self.width + (self.height - 1)
    }

    pub fn in_bounds(&self, c: Coordinate) -> bool {
        c.x < self.width && c.y < self.height
    }

    /// Upper bound on eggs in any valid placement: every column and every
    /// row holds at most `max_per_line`.
    pub fn max_valid_eggs(&self) -> usize {
        self.max_per_line
            .saturating_mul(self.width.min(self.height))
            .min(self.capacity())
    }
}

/// Positions of all eggs. Length is fixed for the lifetime of a search and
/// no cell is occupied twice.
///
/// Order is kept for stable indexing during moves, but equality compares
/// the set of occupied cells.
///
/// Only serializable: a placement is meaningless without the grid it was
/// checked against, so reading one back goes through
/// [`Placement::from_coordinates`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Placement {
    cells: Vec<Coordinate>,
}

impl Placement {
    /// Fills the first `num_eggs` cells in row-major order.
    ///
    /// ```
    /// use egg_carton::carton::{Coordinate, Placement, PuzzleSpec};
    ///
    /// let spec = PuzzleSpec::new(3, 3, 1).unwrap();
    /// let placement = Placement::initial(&spec, 4).unwrap();
    /// assert!(placement.contains(Coordinate::new(2, 0)));
    /// assert!(placement.contains(Coordinate::new(0, 1)));
    /// assert!(!placement.contains(Coordinate::new(1, 1)));
    /// ```
    pub fn initial(spec: &PuzzleSpec, num_eggs: usize) -> Result<Self, CartonError> {
        if num_eggs > spec.capacity() {
            return Err(CartonError::InvalidCount {
                requested: num_eggs,
                capacity: spec.capacity(),
            });
        }
        let cells = (0..num_eggs)
            .map(|i| Coordinate::new(i % spec.width(), i / spec.width()))
            .collect();
        Ok(Self { cells })
    }

    /// Builds a placement from explicit cells, checking bounds and uniqueness.
    pub fn from_coordinates(
        spec: &PuzzleSpec,
        cells: impl IntoIterator<Item = Coordinate>,
    ) -> Result<Self, CartonError> {
        let cells: Vec<Coordinate> = cells.into_iter().collect();
        let mut seen = HashSet::with_capacity(cells.len());
        for &c in &cells {
            if !spec.in_bounds(c) {
                return Err(CartonError::OutOfBounds {
                    coordinate: c,
                    width: spec.width(),
                    height: spec.height(),
                });
            }
            if !seen.insert(c) {
                return Err(CartonError::DuplicateCoordinate(c));
            }
        }
        Ok(Self { cells })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.cells.iter()
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        self.cells.contains(&c)
    }

    /// Copy of this placement with egg `index` relocated to `to`.
    ///
    /// The caller guarantees `to` is free.
    pub fn moved(&self, index: usize, to: Coordinate) -> Self {
        debug_assert!(!self.contains(to), "moving onto occupied cell {to}");
        let mut cells = self.cells.clone();
        cells[index] = to;
        Self { cells }
    }

    fn sorted(&self) -> Vec<Coordinate> {
        let mut cells = self.cells.clone();
        cells.sort_unstable();
        cells
    }
}

impl PartialEq for Placement {
    fn eq(&self, other: &Self) -> bool {
        self.cells.len() == other.cells.len() && self.sorted() == other.sorted()
    }
}

impl Eq for Placement {}
