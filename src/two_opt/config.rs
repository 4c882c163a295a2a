//! 2-opt configuration.

/// Configuration for the sampled 2-opt local search.
///
/// # Examples
///
/// ```
/// use opentour::two_opt::TwoOptConfig;
///
/// let config = TwoOptConfig::default()
///     .with_samples_per_step(1_000)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct TwoOptConfig {
    /// Number of candidate reversals sampled per step.
    ///
    /// Larger budgets find better moves per step but make each step
    /// proportionally more expensive.
    pub samples_per_step: usize,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for TwoOptConfig {
    fn default() -> Self {
        Self {
            samples_per_step: 4_000,
            seed: None,
        }
    }
}

impl TwoOptConfig {
    /// Sets the per-step sampling budget.
    pub fn with_samples_per_step(mut self, n: usize) -> Self {
        self.samples_per_step = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.samples_per_step == 0 {
            return Err("samples_per_step must be at least 1".into());
        }
        Ok(())
    }
}
