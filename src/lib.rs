//! Egg-carton puzzle solver built on a pluggable simulated annealing engine.
//!
//! - **Annealing engine** ([`sa`]): problem-agnostic loop driven by the
//!   [`sa::Annealable`] trait. Each iteration scores a full neighborhood,
//!   takes either the best or a random neighbor depending on the
//!   temperature, and cools.
//! - **Egg carton** ([`carton`]): place eggs on an `M x N` grid so that no
//!   row, column or diagonal holds more than `K`. Supplies the board model,
//!   the conflict-counting objective and the column-preserving move set.
//!
//! # Example
//!
//! ```
//! use egg_carton::carton::{EggCarton, PuzzleSpec};
//! use egg_carton::sa::SaConfig;
//!
//! let carton = EggCarton::new(PuzzleSpec::new(2, 2, 2).unwrap(), 4).unwrap();
//! let result = carton.solve(&SaConfig::default().with_seed(7)).unwrap();
//! assert_eq!(result.score, 0.0);
//! print!("{}", carton.view(&result.state));
//! ```

pub mod carton;
pub mod random;
pub mod sa;
