//! Text rendering of a placement.

use std::fmt;

use super::board::{Placement, PuzzleSpec};

/// Displays a placement as a grid, one row per line, `X` for an egg and
/// `.` for an empty cell.
///
/// ```
/// use egg_carton::carton::{CartonView, Placement, PuzzleSpec};
///
/// let spec = PuzzleSpec::new(3, 2, 1).unwrap();
/// let placement = Placement::initial(&spec, 2).unwrap();
/// assert_eq!(CartonView::new(&spec, &placement).to_string(), "X X . \n. . . \n");
/// ```
pub struct CartonView<'a> {
    spec: &'a PuzzleSpec,
    placement: &'a Placement,
}

impl<'a> CartonView<'a> {
    pub fn new(spec: &'a PuzzleSpec, placement: &'a Placement) -> Self {
        Self { spec, placement }
    }
}

impl fmt::Display for CartonView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.spec.width();
        let mut occupied = vec![false; self.spec.capacity()];
        for c in self.placement.iter() {
            occupied[c.y * width + c.x] = true;
        }
        for row in occupied.chunks(width) {
            for &cell in row {
                f.write_str(if cell { "X " } else { ". " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
