//! Errors raised by the annealing engine.

use thiserror::Error;

/// Failure of an annealing run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnnealError {
    /// The configuration failed [`SaConfig::validate`](super::SaConfig::validate).
    #[error("invalid annealing configuration: {0}")]
    InvalidConfig(String),

    /// The current state has no neighbors, so the search cannot move.
    #[error(
        "search stalled at iteration {iteration}: empty neighborhood \
         (temperature {temperature}, score {score})"
    )]
    StalledSearch {
        iteration: usize,
        temperature: f64,
        score: f64,
    },
}
