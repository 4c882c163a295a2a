//! Adaptive differential search configuration.

/// Configuration for the adaptive differential-style permutation search.
///
/// The archive and perturbation probabilities are deliberate tuning knobs:
/// the defaults work well, but neither is an invariant of the algorithm.
///
/// # Examples
///
/// ```
/// use opentour::ade::AdeConfig;
///
/// let config = AdeConfig::default()
///     .with_population_size(40)
///     .with_archive_prob(0.5)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct AdeConfig {
    /// Number of permutations in the population.
    pub population_size: usize,

    /// Fraction of the ranked population eligible as p-best guides
    /// (at least 2 individuals).
    pub p_best: f64,

    /// Probability of drawing the second donor from the archive of
    /// displaced solutions instead of the live population.
    pub archive_prob: f64,

    /// Archive capacity as a multiple of the population size; the oldest
    /// entries are discarded beyond it.
    pub archive_rate: f64,

    /// Probability of one random segment reversal on each trial.
    pub perturb_prob: f64,

    /// Generations without global improvement before the worst fraction of
    /// the population is restarted from the current best.
    pub stagnation_trigger: usize,

    /// Fraction of the population restarted on stagnation.
    pub worst_fraction: f64,

    /// Restart spread: the restarted copies receive about
    /// `restart_sigma · n` random swaps.
    pub restart_sigma: f64,

    /// Learning constant smoothing the adaptive F and CR means.
    pub smoothing: f64,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AdeConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            p_best: 0.12,
            archive_prob: 0.35,
            archive_rate: 1.5,
            perturb_prob: 0.10,
            stagnation_trigger: 24,
            worst_fraction: 0.08,
            restart_sigma: 0.18,
            smoothing: 0.10,
            seed: None,
        }
    }
}

impl AdeConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the p-best fraction.
    pub fn with_p_best(mut self, p: f64) -> Self {
        self.p_best = p;
        self
    }

    /// Sets the archive sampling probability.
    pub fn with_archive_prob(mut self, p: f64) -> Self {
        self.archive_prob = p;
        self
    }

    /// Sets the archive capacity multiple.
    pub fn with_archive_rate(mut self, rate: f64) -> Self {
        self.archive_rate = rate;
        self
    }

    /// Sets the trial perturbation probability.
    pub fn with_perturb_prob(mut self, p: f64) -> Self {
        self.perturb_prob = p;
        self
    }

    /// Sets the stagnation trigger.
    pub fn with_stagnation_trigger(mut self, generations: usize) -> Self {
        self.stagnation_trigger = generations;
        self
    }

    /// Sets the restarted worst fraction.
    pub fn with_worst_fraction(mut self, fraction: f64) -> Self {
        self.worst_fraction = fraction;
        self
    }

    /// Sets the restart spread.
    pub fn with_restart_sigma(mut self, sigma: f64) -> Self {
        self.restart_sigma = sigma;
        self
    }

    /// Sets the adaptation smoothing constant.
    pub fn with_smoothing(mut self, c: f64) -> Self {
        self.smoothing = c;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 4 {
            return Err(format!(
                "population_size must be at least 4, got {}",
                self.population_size
            ));
        }
        if !(0.0 < self.p_best && self.p_best <= 1.0) {
            return Err(format!("p_best must be in (0, 1], got {}", self.p_best));
        }
        if !(0.0..=1.0).contains(&self.archive_prob) {
            return Err(format!(
                "archive_prob must be in [0, 1], got {}",
                self.archive_prob
            ));
        }
        if !(self.archive_rate > 0.0 && self.archive_rate.is_finite()) {
            return Err(format!(
                "archive_rate must be positive, got {}",
                self.archive_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.perturb_prob) {
            return Err(format!(
                "perturb_prob must be in [0, 1], got {}",
                self.perturb_prob
            ));
        }
        if self.stagnation_trigger == 0 {
            return Err("stagnation_trigger must be at least 1".into());
        }
        if !(0.0 < self.worst_fraction && self.worst_fraction <= 1.0) {
            return Err(format!(
                "worst_fraction must be in (0, 1], got {}",
                self.worst_fraction
            ));
        }
        if !(self.restart_sigma > 0.0 && self.restart_sigma.is_finite()) {
            return Err(format!(
                "restart_sigma must be positive, got {}",
                self.restart_sigma
            ));
        }
        if !(0.0 < self.smoothing && self.smoothing <= 1.0) {
            return Err(format!(
                "smoothing must be in (0, 1], got {}",
                self.smoothing
            ));
        }
        Ok(())
    }
}
