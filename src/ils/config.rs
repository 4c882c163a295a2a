//! Iterated local search configuration.

/// Configuration for iterated local search.
///
/// # Examples
///
/// ```
/// use opentour::ils::IlsConfig;
///
/// let config = IlsConfig::default()
///     .with_samples_per_step(1_000)
///     .with_stagnation_limit(50)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct IlsConfig {
    /// Number of candidate reversals sampled per descent step.
    pub samples_per_step: usize,

    /// Number of consecutive non-improving steps before a double-bridge
    /// perturbation is applied.
    pub stagnation_limit: usize,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            samples_per_step: 2_500,
            stagnation_limit: 150,
            seed: None,
        }
    }
}

impl IlsConfig {
    /// Sets the per-step sampling budget.
    pub fn with_samples_per_step(mut self, n: usize) -> Self {
        self.samples_per_step = n;
        self
    }

    /// Sets the stagnation limit.
    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
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
        if self.stagnation_limit == 0 {
            return Err("stagnation_limit must be at least 1".into());
        }
        Ok(())
    }
}
