//! Simulated annealing stepping implementation.

use super::config::{SaConfig, MIN_TEMPERATURE};
use crate::optimizer::{seed_rng, Optimizer};
use crate::tour::Tour;
use rand::rngs::StdRng;
use rand::Rng;

/// Simulated annealing over random segment reversals.
pub struct SaOptimizer {
    config: SaConfig,
    rng: StdRng,
    current: Tour,
    best: Tour,
    baseline: f64,
    temperature: f64,
}

impl SaOptimizer {
    /// Creates an optimizer seeded from `initial`.
    ///
    /// The starting temperature is the seed tour's cost divided by its node
    /// count — roughly one average edge — floored at 1.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`SaConfig::validate`]
    /// first to get a descriptive error).
    pub fn new(initial: Tour, config: SaConfig) -> Self {
        config.validate().expect("invalid SaConfig");
        let rng = seed_rng(config.seed);
        let baseline = initial.cost();

        let n = initial.len();
        let temperature = if n > 1 {
            (initial.cost() / n as f64).max(1.0)
        } else {
            1.0
        };

        Self {
            config,
            rng,
            best: initial.clone(),
            current: initial,
            baseline,
            temperature,
        }
    }
}

impl Optimizer for SaOptimizer {
    fn step(&mut self) -> bool {
        let n = self.current.len();
        if n < 4 {
            return false;
        }

        let a = self.rng.random_range(0..n);
        let b = self.rng.random_range(0..n);
        if a != b {
            let (i, j) = (a.min(b), a.max(b));
            if j - i > 1 {
                let delta = self.current.reverse_delta(i, j);
                let accept = delta <= 0.0
                    || (-delta / self.temperature).exp() > self.rng.random_range(0.0..1.0);
                if accept {
                    self.current.reverse_segment(i, j);
                }
            }
        }

        self.temperature =
            (self.temperature * self.config.cooling_factor).max(MIN_TEMPERATURE);

        if self.current.cost() < self.best.cost() {
            self.best = self.current.clone();
            return true;
        }
        false
    }

    fn best_tour(&self) -> &Tour {
        &self.best
    }

    fn baseline_cost(&self) -> f64 {
        self.baseline
    }
}
