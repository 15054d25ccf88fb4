//! Annealing execution loop.
//!
//! # Algorithm
//!
//! 1. Start from `initial_state`, temperature `T_0`
//! 2. At each iteration:
//!    a. Generate the full neighborhood (empty means the search stalled)
//!    b. Score every neighbor and keep the best (first one on ties)
//!    c. `delta = max(0, score_current - score_best)`, `p = min(1, e^(-delta/T))`
//!    d. Draw `u` in [0, 1): `u > p` takes the best neighbor, otherwise a
//!       uniformly random neighbor
//!    e. Cool the temperature
//! 3. Stop when the score reaches the target or `T <= T_min`
//!
//! The acceptance rule is two-tier rather than Metropolis: a neighbor that
//! improves on the current state raises `delta`, lowers `p` and so makes
//! the greedy step likely, while a non-improving best neighbor gives
//! `p = 1` and always an exploration step.

use super::config::SaConfig;
use super::error::AnnealError;
use super::types::{Annealable, Outcome};
use crate::random::rng_from_seed;
use log::{debug, info, warn};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// State held when the search stopped.
    pub state: S,

    /// Score of `state`.
    pub score: f64,

    /// Lowest-scoring state seen during the run.
    pub best: S,

    /// Score of `best`.
    pub best_score: f64,

    /// How the search ended.
    pub outcome: Outcome,

    /// Number of completed iterations.
    pub iterations: usize,

    /// Temperature when the search stopped.
    pub final_temperature: f64,

    /// Iterations that took the best neighbor.
    pub greedy_moves: usize,

    /// Iterations that took a uniformly random neighbor.
    pub exploratory_moves: usize,

    /// Current score sampled every `history_interval` iterations, starting
    /// with the initial score and ending with the final one.
    pub score_history: Vec<f64>,
}

/// Executes the annealing engine.
pub struct SaRunner;

impl SaRunner {
    /// Runs the search with an RNG seeded from `config.seed`.
    pub fn run<P: Annealable>(
        problem: &P,
        config: &SaConfig,
    ) -> Result<SaResult<P::State>, AnnealError> {
        let mut rng = rng_from_seed(config.seed);
        Self::search(problem, config, &mut rng, None)
    }

    /// Runs the search drawing all randomness from `rng`.
    ///
    /// `config.seed` is ignored.
    pub fn run_with_rng<P: Annealable, R: Rng>(
        problem: &P,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult<P::State>, AnnealError> {
        Self::search(problem, config, rng, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is checked before every iteration.
    pub fn run_with_cancel<P: Annealable>(
        problem: &P,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::State>, AnnealError> {
        let mut rng = rng_from_seed(config.seed);
        Self::search(problem, config, &mut rng, cancel)
    }

    fn search<P: Annealable, R: Rng>(
        problem: &P,
        config: &SaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::State>, AnnealError> {
        config.validate().map_err(AnnealError::InvalidConfig)?;

        let min_temperature = config.effective_min_temperature();

        let mut current = problem.initial_state(rng);
        let mut current_score = problem.objective(&current);
        let mut best = current.clone();
        let mut best_score = current_score;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut greedy_moves = 0usize;
        let mut exploratory_moves = 0usize;

        let mut score_history = vec![current_score];

        let outcome = loop {
            if current_score <= config.target_score {
                break Outcome::Converged;
            }
            if temperature <= min_temperature {
                break Outcome::Cooled;
            }
            if config.max_iterations > 0 && iterations >= config.max_iterations {
                break Outcome::IterationLimit;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    break Outcome::Cancelled;
                }
            }

            let mut neighbors = problem.neighbors(&current);
            let scores = score_all(problem, &neighbors, config.parallel);

            let Some((best_index, best_neighbor_score)) = select_best(&scores) else {
                warn!(
                    "empty neighborhood at iteration {iterations} (T = {temperature:.6}, score = {current_score})"
                );
                return Err(AnnealError::StalledSearch {
                    iteration: iterations,
                    temperature,
                    score: current_score,
                });
            };

            let delta = improvement_delta(current_score, best_neighbor_score);
            let p = acceptance_probability(delta, temperature);
            let u: f64 = rng.random();

            let chosen = if u > p {
                greedy_moves += 1;
                best_index
            } else {
                exploratory_moves += 1;
                rng.random_range(0..neighbors.len())
            };

            current_score = scores[chosen];
            current = neighbors.swap_remove(chosen);

            if current_score < best_score {
                best = current.clone();
                best_score = current_score;
            }

            let next_temperature = problem.schedule(temperature, &config.cooling);
            debug_assert!(next_temperature <= temperature, "temperature increased");
            temperature = next_temperature.min(temperature);

            iterations += 1;

            if iterations.is_multiple_of(config.history_interval) {
                score_history.push(current_score);
                debug!(
                    "iteration {iterations}: T = {temperature:.6}, score = {current_score}, best = {best_score}"
                );
            }
        };

        if score_history
            .last()
            .is_none_or(|&last| (last - current_score).abs() > 1e-15)
        {
            score_history.push(current_score);
        }

        info!(
            "annealing finished: {outcome:?} after {iterations} iterations (score = {current_score}, T = {temperature:.6})"
        );

        Ok(SaResult {
            state: current,
            score: current_score,
            best,
            best_score,
            outcome,
            iterations,
            final_temperature: temperature,
            greedy_moves,
            exploratory_moves,
            score_history,
        })
    }
}

/// How much the best neighbor improves on the current score, floored at 0.
pub fn improvement_delta(current_score: f64, best_neighbor_score: f64) -> f64 {
    (current_score - best_neighbor_score).max(0.0)
}

/// `min(1, e^(-delta / T))` for a non-negative `delta`.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta <= 0.0 {
        return 1.0;
    }
    if temperature <= 0.0 {
        return 0.0;
    }
    (-delta / temperature).exp().clamp(0.0, 1.0)
}

/// Index and score of the lowest score; the earliest index wins ties.
pub fn select_best(scores: &[f64]) -> Option<(usize, f64)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, s)| match best {
            Some((_, b)) if s >= b => best,
            _ => Some((i, s)),
        })
}

#[cfg(feature = "parallel")]
fn score_all<P: Annealable>(problem: &P, candidates: &[P::State], parallel: bool) -> Vec<f64> {
    if parallel {
        candidates.par_iter().map(|c| problem.objective(c)).collect()
    } else {
        candidates.iter().map(|c| problem.objective(c)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn score_all<P: Annealable>(problem: &P, candidates: &[P::State], _parallel: bool) -> Vec<f64> {
    candidates.iter().map(|c| problem.objective(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::sa::{CoolingSchedule, SaConfig};
    use std::sync::Mutex;

    // ---- Integer walk: minimize |x| ----

    struct Countdown {
        start: i64,
    }

    impl Annealable for Countdown {
        type State = i64;

        fn initial_state<R: Rng>(&self, _rng: &mut R) -> i64 {
            self.start
        }

        fn objective(&self, x: &i64) -> f64 {
            x.abs() as f64
        }

        fn neighbors(&self, x: &i64) -> Vec<i64> {
            vec![x - 1, x + 1]
        }
    }

    struct Stuck;

    impl Annealable for Stuck {
        type State = u8;

        fn initial_state<R: Rng>(&self, _rng: &mut R) -> u8 {
            3
        }

        fn objective(&self, x: &u8) -> f64 {
            *x as f64
        }

        fn neighbors(&self, _x: &u8) -> Vec<u8> {
            vec![]
        }
    }

    /// Never solvable; records every temperature handed to the schedule.
    struct Recorder {
        seen: Mutex<Vec<f64>>,
    }

    impl Annealable for Recorder {
        type State = u32;

        fn initial_state<R: Rng>(&self, _rng: &mut R) -> u32 {
            0
        }

        fn objective(&self, x: &u32) -> f64 {
            1.0 + (*x % 3) as f64
        }

        fn neighbors(&self, x: &u32) -> Vec<u32> {
            vec![x + 1, x + 2]
        }

        fn schedule(&self, temperature: f64, cooling: &CoolingSchedule) -> f64 {
            self.seen.lock().unwrap().push(temperature);
            cooling.apply(temperature)
        }
    }

    /// Every neighbor ties with the current state, so none improves.
    struct Plateau;

    impl Annealable for Plateau {
        type State = u64;

        fn initial_state<R: Rng>(&self, _rng: &mut R) -> u64 {
            0
        }

        fn objective(&self, _x: &u64) -> f64 {
            1.0
        }

        fn neighbors(&self, x: &u64) -> Vec<u64> {
            vec![x + 1, x + 2, x + 3]
        }
    }

    /// Minimize |x| with the improving neighbor generated second.
    struct Descent {
        start: i64,
    }

    impl Annealable for Descent {
        type State = i64;

        fn initial_state<R: Rng>(&self, _rng: &mut R) -> i64 {
            self.start
        }

        fn objective(&self, x: &i64) -> f64 {
            x.abs() as f64
        }

        fn neighbors(&self, x: &i64) -> Vec<i64> {
            vec![x + 1, x - 1]
        }
    }

    /// Returns the same word on every draw, pinning `u` for the acceptance test.
    struct FixedRng(u64);

    impl rand::RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill((self.0 >> 56) as u8);
        }
    }

    /// `u` close to one half.
    const U_HALF: u64 = u64::MAX / 2;
    /// `u` close to one quarter.
    const U_QUARTER: u64 = u64::MAX / 4;

    fn step_config(dt: f64) -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(1.0)
            .with_cooling(CoolingSchedule::Step { dt })
            .with_history_interval(10)
            .with_seed(42)
    }

    #[test]
    fn test_countdown_converges() {
        let result = SaRunner::run(&Countdown { start: 10 }, &step_config(0.001)).unwrap();

        assert_eq!(result.outcome, Outcome::Converged);
        assert_eq!(result.state, 0);
        assert_eq!(result.score, 0.0);
        assert!(result.greedy_moves > 0);
        assert_eq!(
            result.greedy_moves + result.exploratory_moves,
            result.iterations
        );
    }

    #[test]
    fn test_already_solved_takes_no_iterations() {
        let result = SaRunner::run(&Countdown { start: 0 }, &step_config(0.1)).unwrap();

        assert_eq!(result.outcome, Outcome::Converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.score_history, vec![0.0]);
    }

    #[test]
    fn test_empty_neighborhood_stalls() {
        let err = SaRunner::run(&Stuck, &step_config(0.1)).unwrap_err();

        assert_eq!(
            err,
            AnnealError::StalledSearch {
                iteration: 0,
                temperature: 1.0,
                score: 3.0,
            }
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = step_config(0.1).with_initial_temperature(-1.0);
        let err = SaRunner::run(&Countdown { start: 1 }, &config).unwrap_err();
        assert!(matches!(err, AnnealError::InvalidConfig(_)));
    }

    #[test]
    fn test_cools_within_step_bound() {
        let problem = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        let dt = 0.01;
        let config = step_config(dt).with_min_temperature(0.2);

        let result = SaRunner::run(&problem, &config).unwrap();

        assert_eq!(result.outcome, Outcome::Cooled);
        assert!(result.final_temperature <= 0.2);
        let bound = ((1.0 - 0.2) / dt).ceil() as usize + 1;
        assert!(
            result.iterations <= bound,
            "ran {} iterations, bound {bound}",
            result.iterations
        );

        let seen = problem.seen.lock().unwrap();
        assert_eq!(seen.len(), result.iterations);
        for window in seen.windows(2) {
            assert!(window[1] <= window[0], "temperature rose: {:?}", window);
        }
    }

    #[test]
    fn test_max_iterations_limit() {
        let problem = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        let config = step_config(1e-9).with_max_iterations(25);

        let result = SaRunner::run(&problem, &config).unwrap();

        assert_eq!(result.outcome, Outcome::IterationLimit);
        assert_eq!(result.iterations, 25);
    }

    #[test]
    fn test_cancellation() {
        // Raised before the run starts so the outcome is deterministic.
        let cancel = Arc::new(AtomicBool::new(true));
        let config = step_config(1e-9);

        let result = SaRunner::run_with_cancel(&Countdown { start: 5 }, &config, Some(cancel))
            .unwrap();

        assert_eq!(result.outcome, Outcome::Cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.state, 5);
    }

    #[test]
    fn test_injected_rng_is_reproducible() {
        let problem = Countdown { start: 40 };
        let config = step_config(0.01);

        let a = SaRunner::run_with_rng(&problem, &config, &mut create_rng(9)).unwrap();
        let b = SaRunner::run_with_rng(&problem, &config, &mut create_rng(9)).unwrap();

        assert_eq!(a.state, b.state);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.score_history, b.score_history);
    }

    #[test]
    fn test_best_never_worse_than_final() {
        let problem = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        let result = SaRunner::run(&problem, &step_config(0.05)).unwrap();
        assert!(result.best_score <= result.score);
        assert!(result.best_score >= 1.0);
    }

    #[test]
    fn test_history_bookends() {
        let result = SaRunner::run(&Countdown { start: 10 }, &step_config(0.001)).unwrap();
        assert_eq!(result.score_history.first(), Some(&10.0));
        assert_eq!(result.score_history.last(), Some(&result.score));
    }

    #[test]
    fn test_non_improving_best_always_explores() {
        // delta = 0 gives p = 1, and u < 1 never exceeds it.
        let result = SaRunner::run(&Plateau, &step_config(0.01)).unwrap();

        assert_eq!(result.outcome, Outcome::Cooled);
        assert!(result.iterations > 0);
        assert_eq!(result.greedy_moves, 0);
        assert_eq!(result.exploratory_moves, result.iterations);
        // Always taking the first (best) neighbor would land exactly on
        // `iterations`; random picks reach past it.
        assert!(
            result.state > result.iterations as u64,
            "exploration never left the best neighbor: state {}",
            result.state
        );
    }

    #[test]
    fn test_improving_neighbor_taken_when_cold() {
        // p = e^(-1 / 0.001) is zero, so any u > 0 takes the greedy step.
        let config = SaConfig::default()
            .with_initial_temperature(1e-3)
            .with_cooling(CoolingSchedule::Step { dt: 1e-6 });

        let result =
            SaRunner::run_with_rng(&Descent { start: 20 }, &config, &mut FixedRng(U_HALF))
                .unwrap();

        assert_eq!(result.outcome, Outcome::Converged);
        assert_eq!(result.state, 0);
        assert_eq!(result.iterations, 20);
        assert_eq!(result.greedy_moves, 20);
        assert_eq!(result.exploratory_moves, 0);
    }

    #[test]
    fn test_greedy_only_when_draw_exceeds_probability() {
        // One iteration at T = 1 with delta = 1: p = e^-1, about 0.37.
        let config = SaConfig::default()
            .with_initial_temperature(1.0)
            .with_cooling(CoolingSchedule::Step { dt: 0.1 })
            .with_max_iterations(1);
        let problem = Descent { start: 5 };

        let above = SaRunner::run_with_rng(&problem, &config, &mut FixedRng(U_HALF)).unwrap();
        assert_eq!(above.greedy_moves, 1);
        assert_eq!(above.exploratory_moves, 0);
        assert_eq!(above.state, 4);

        let below = SaRunner::run_with_rng(&problem, &config, &mut FixedRng(U_QUARTER)).unwrap();
        assert_eq!(below.greedy_moves, 0);
        assert_eq!(below.exploratory_moves, 1);
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn test_parallel_requires_feature() {
        let config = step_config(0.1).with_parallel(true);
        let err = SaRunner::run(&Countdown { start: 1 }, &config).unwrap_err();
        assert!(matches!(err, AnnealError::InvalidConfig(_)));
    }

    #[test]
    fn test_acceptance_probability_bounds() {
        assert_eq!(acceptance_probability(0.0, 1.0), 1.0);
        assert_eq!(acceptance_probability(1.0, 0.0), 0.0);

        let p = acceptance_probability(1.0, 1.0);
        assert!((p - (-1.0f64).exp()).abs() < 1e-12);

        // Hotter means closer to 1 for the same delta.
        assert!(acceptance_probability(0.5, 10.0) > acceptance_probability(0.5, 0.1));
    }

    #[test]
    fn test_improvement_delta() {
        assert_eq!(improvement_delta(3.0, 1.0), 2.0);
        assert_eq!(improvement_delta(1.0, 3.0), 0.0);
        assert_eq!(improvement_delta(2.0, 2.0), 0.0);
    }

    #[test]
    fn test_select_best_first_on_ties() {
        assert_eq!(select_best(&[]), None);
        assert_eq!(select_best(&[2.0, 0.5, 0.5, 1.0]), Some((1, 0.5)));
        assert_eq!(select_best(&[1.0, 1.0]), Some((0, 1.0)));
    }
}
