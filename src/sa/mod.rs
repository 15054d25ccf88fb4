//! Simulated Annealing (SA).
//!
//! A single-solution trajectory search over an explicit neighborhood.
//! Each iteration scores the whole neighborhood, then either takes the
//! best neighbor or a uniformly random one, with the split governed by
//! the temperature. The temperature only ever decreases.
//!
//! Problems plug in through the [`Annealable`] trait; the engine never
//! sees the state representation beyond cloning and scoring it.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod error;
mod runner;
mod types;

pub use config::{CoolingSchedule, SaConfig, DEFAULT_MIN_TEMPERATURE};
pub use error::AnnealError;
pub use runner::{acceptance_probability, improvement_delta, select_best, SaResult, SaRunner};
pub use types::{Annealable, Outcome};
