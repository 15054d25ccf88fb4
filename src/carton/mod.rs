//! The egg-carton puzzle.
//!
//! Place a number of eggs on an `M x N` grid so that no row, column,
//! diagonal or anti-diagonal holds more than `K` of them. [`EggCarton`]
//! plugs the puzzle into the annealing engine:
//!
//! - the initial state fills cells in row-major order,
//! - the objective is the weighted line-excess count from [`objective`],
//! - the neighborhood moves one egg within its column ([`neighbors`]).
//!
//! # Examples
//!
//! ```
//! use egg_carton::carton::{EggCarton, PuzzleSpec};
//! use egg_carton::sa::{CoolingSchedule, Outcome, SaConfig};
//!
//! let carton = EggCarton::new(PuzzleSpec::new(4, 4, 1).unwrap(), 4).unwrap();
//! let config = SaConfig::default()
//!     .with_cooling(CoolingSchedule::Step { dt: 1e-4 })
//!     .with_seed(1);
//!
//! let result = carton.solve(&config).unwrap();
//! if result.outcome == Outcome::Converged {
//!     assert_eq!(result.score, 0.0);
//! }
//! ```

mod board;
mod error;
pub mod neighbors;
pub mod objective;
mod render;

pub use board::{Coordinate, Placement, PuzzleSpec};
pub use error::CartonError;
pub use neighbors::Move;
pub use objective::{LineTally, Violations};
pub use render::CartonView;

use crate::sa::{AnnealError, Annealable, SaConfig, SaResult, SaRunner};
use rand::Rng;

/// A puzzle instance: grid parameters plus the number of eggs to place.
///
/// Serialized as `{ spec, eggs }`; deserialization goes through
/// [`EggCarton::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "CartonParams", into = "CartonParams")
)]
pub struct EggCarton {
    spec: PuzzleSpec,
    initial: Placement,
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CartonParams {
    spec: PuzzleSpec,
    eggs: usize,
}

#[cfg(feature = "serde")]
impl From<EggCarton> for CartonParams {
    fn from(carton: EggCarton) -> Self {
        Self {
            eggs: carton.eggs(),
            spec: carton.spec,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<CartonParams> for EggCarton {
    type Error = CartonError;

    fn try_from(params: CartonParams) -> Result<Self, CartonError> {
        EggCarton::new(params.spec, params.eggs)
    }
}

impl EggCarton {
    /// Fails with [`CartonError::InvalidCount`] if the eggs do not fit.
    pub fn new(spec: PuzzleSpec, eggs: usize) -> Result<Self, CartonError> {
        let initial = Placement::initial(&spec, eggs)?;
        Ok(Self { spec, initial })
    }

    pub fn spec(&self) -> &PuzzleSpec {
        &self.spec
    }

    pub fn eggs(&self) -> usize {
        self.initial.len()
    }

    /// Row-major starting placement.
    pub fn initial_placement(&self) -> &Placement {
        &self.initial
    }

    /// Runs the annealing engine on this puzzle.
    pub fn solve(&self, config: &SaConfig) -> Result<SaResult<Placement>, AnnealError> {
        SaRunner::run(self, config)
    }

    /// Grid view of `placement` for printing.
    pub fn view<'a>(&'a self, placement: &'a Placement) -> CartonView<'a> {
        CartonView::new(&self.spec, placement)
    }
}

impl Annealable for EggCarton {
    type State = Placement;

    fn initial_state<R: Rng>(&self, _rng: &mut R) -> Placement {
        self.initial.clone()
    }

    fn objective(&self, placement: &Placement) -> f64 {
        objective::evaluate(&self.spec, placement)
    }

    fn neighbors(&self, placement: &Placement) -> Vec<Placement> {
        neighbors::neighbors(&self.spec, placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sa::{CoolingSchedule, Outcome};

    fn carton(m: usize, n: usize, k: usize, eggs: usize) -> EggCarton {
        EggCarton::new(PuzzleSpec::new(m, n, k).unwrap(), eggs).unwrap()
    }

    #[test]
    fn test_too_many_eggs() {
        let spec = PuzzleSpec::new(3, 3, 1).unwrap();
        assert_eq!(
            EggCarton::new(spec, 10).unwrap_err(),
            CartonError::InvalidCount {
                requested: 10,
                capacity: 9
            }
        );
    }

    #[test]
    fn test_four_by_four_converges() {
        let problem = carton(4, 4, 1, 4);
        let config = SaConfig::default()
            .with_initial_temperature(1.0)
            .with_cooling(CoolingSchedule::Step { dt: 1e-5 })
            .with_seed(42);

        let result = problem.solve(&config).unwrap();

        assert_eq!(result.outcome, Outcome::Converged);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.state.len(), 4);
        assert!(objective::violations(problem.spec(), &result.state).is_valid());
    }

    #[test]
    fn test_full_grid_already_solved() {
        let problem = carton(2, 2, 2, 4);
        let result = problem.solve(&SaConfig::default().with_seed(0)).unwrap();

        assert_eq!(result.outcome, Outcome::Converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_single_row_stalls() {
        // Two eggs in one row with K = 1: invalid, and nothing can move.
        let problem = carton(3, 1, 1, 2);
        let err = problem.solve(&SaConfig::default().with_seed(0)).unwrap_err();
        assert!(matches!(err, AnnealError::StalledSearch { iteration: 0, .. }));
    }

    #[test]
    fn test_moves_preserve_columns() {
        let problem = carton(5, 5, 1, 5);
        let config = SaConfig::default()
            .with_cooling(CoolingSchedule::Step { dt: 1e-3 })
            .with_seed(3);

        let result = problem.solve(&config).unwrap();

        let mut columns: Vec<usize> = result.state.iter().map(|c| c.x).collect();
        columns.sort_unstable();
        assert_eq!(columns, vec![0, 1, 2, 3, 4]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_carton_validates() {
        let json = serde_json::to_string(&carton(3, 3, 1, 3)).unwrap();
        assert_eq!(json, r#"{"spec":{"width":3,"height":3,"max_per_line":1},"eggs":3}"#);
        assert_eq!(serde_json::from_str::<EggCarton>(&json).unwrap(), carton(3, 3, 1, 3));

        let too_many = r#"{"spec":{"width":3,"height":3,"max_per_line":1},"eggs":10}"#;
        assert!(serde_json::from_str::<EggCarton>(too_many).is_err());

        let empty = r#"{"spec":{"width":3,"height":0,"max_per_line":1},"eggs":0}"#;
        assert!(serde_json::from_str::<EggCarton>(empty).is_err());
    }
}
