//! SA configuration and cooling schedules.

/// Floor used by schedules that carry no natural step size.
pub const DEFAULT_MIN_TEMPERATURE: f64 = 1e-6;

/// Cooling schedule for temperature reduction.
///
/// # References
///
/// - Step: fixed decrement per iteration, `T_{k+1} = T_k - dt`
/// - Geometric: standard textbook approach
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Linear step cooling: `T_{k+1} = T_k - dt`.
    ///
    /// Worst-case run length is `(T_0 - T_min) / dt` iterations.
    Step {
        /// Amount subtracted from the temperature each iteration.
        dt: f64,
    },

    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },
}

impl CoolingSchedule {
    /// Applies one cooling step.
    pub fn apply(&self, temperature: f64) -> f64 {
        match *self {
            CoolingSchedule::Step { dt } => temperature - dt,
            CoolingSchedule::Geometric { alpha } => temperature * alpha,
        }
    }
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Step { dt: 1e-5 }
    }
}

/// Configuration for the annealing engine.
///
/// # Examples
///
/// ```
/// use egg_carton::sa::{SaConfig, CoolingSchedule};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(1.0)
///     .with_cooling(CoolingSchedule::Step { dt: 1e-4 })
///     .with_max_iterations(50_000)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.effective_min_temperature(), 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct SaConfig {
    /// Initial temperature (`T_max`).
    pub initial_temperature: f64,

    /// Minimum temperature. The search reports `Cooled` once `T <= T_min`.
    ///
    /// `None` uses the step size for [`CoolingSchedule::Step`] and
    /// [`DEFAULT_MIN_TEMPERATURE`] otherwise.
    pub min_temperature: Option<f64>,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Score at which the search counts as converged.
    pub target_score: f64,

    /// Maximum total iterations (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Current score is sampled into the history every this many iterations.
    pub history_interval: usize,

    /// Score each neighborhood with rayon. Rejected by [`SaConfig::validate`]
    /// unless the `parallel` feature is enabled.
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            min_temperature: None,
            cooling: CoolingSchedule::default(),
            target_score: 0.0,
            max_iterations: 0,
            history_interval: 1000,
            parallel: false,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = Some(t);
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_target_score(mut self, target: f64) -> Self {
        self.target_score = target;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_history_interval(mut self, n: usize) -> Self {
        self.history_interval = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The temperature floor actually used by the runner.
    pub fn effective_min_temperature(&self) -> f64 {
        match (self.min_temperature, self.cooling) {
            (Some(t), _) => t,
            (None, CoolingSchedule::Step { dt }) => dt,
            (None, CoolingSchedule::Geometric { .. }) => DEFAULT_MIN_TEMPERATURE,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        let min = self.effective_min_temperature();
        if min <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if min >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        if self.target_score < 0.0 {
            return Err("target_score must be non-negative".into());
        }
        if self.history_interval == 0 {
            return Err("history_interval must be at least 1".into());
        }
        if self.parallel && !cfg!(feature = "parallel") {
            return Err("parallel scoring requires the `parallel` feature".into());
        }
        match self.cooling {
            CoolingSchedule::Step { dt } => {
                if dt <= 0.0 {
                    return Err(format!("step dt must be positive, got {dt}"));
                }
            }
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 {
                    return Err(format!("geometric alpha must be in (0, 1), got {alpha}"));
                }
            }
        }
        Ok(())
    }
}
