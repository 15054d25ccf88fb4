//! Core trait for the annealing engine.

use super::config::CoolingSchedule;
use rand::Rng;

/// Defines a problem the annealing engine can search.
///
/// The implementer supplies the state representation, the objective and
/// the neighborhood. The engine owns the current state and handles
/// temperature, acceptance and termination.
///
/// # Minimization
///
/// The engine minimizes `objective`. A score of `SaConfig::target_score`
/// (zero by default) means the state is a solution.
///
/// # Examples
///
/// ```
/// use egg_carton::sa::Annealable;
/// use rand::Rng;
///
/// /// Walk an integer down to zero.
/// struct Countdown(i64);
///
/// impl Annealable for Countdown {
///     type State = i64;
///
///     fn initial_state<R: Rng>(&self, _rng: &mut R) -> i64 {
///         self.0
///     }
///
///     fn objective(&self, x: &i64) -> f64 {
///         x.abs() as f64
///     }
///
///     fn neighbors(&self, x: &i64) -> Vec<i64> {
///         vec![x - 1, x + 1]
///     }
/// }
/// ```
pub trait Annealable: Send + Sync {
    /// The state (solution) representation.
    type State: Clone + Send + Sync;

    /// Creates the state the search starts from.
    fn initial_state<R: Rng>(&self, rng: &mut R) -> Self::State;

    /// Scores a state. Lower is better, never negative.
    fn objective(&self, state: &Self::State) -> f64;

    /// Every state reachable from `state` by one move, in a stable order.
    ///
    /// Ties between equally scored neighbors are resolved in favor of the
    /// one generated first.
    fn neighbors(&self, state: &Self::State) -> Vec<Self::State>;

    /// Next temperature after one iteration at `temperature`.
    ///
    /// Overrides must never return a value above `temperature`.
    fn schedule(&self, temperature: f64, cooling: &CoolingSchedule) -> f64 {
        cooling.apply(temperature)
    }
}

/// Terminal state of a completed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// The current state reached the target score.
    Converged,
    /// The temperature fell to or below the floor first.
    Cooled,
    /// `max_iterations` was exhausted first.
    IterationLimit,
    /// The cancellation flag was raised.
    Cancelled,
}

impl Outcome {
    /// Whether the run ended on a solution.
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Converged)
    }
}
