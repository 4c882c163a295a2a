//! Genetic algorithm configuration.

/// Configuration for the genetic algorithm.
///
/// # Examples
///
/// ```
/// use opentour::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_mutation_rate(3)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Upper bound on mutations applied to each repopulated clone: every
    /// clone receives a uniform count in `[0, mutation_rate)`.
    pub mutation_rate: usize,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            mutation_rate: 2,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the mutation-count upper bound.
    pub fn with_mutation_rate(mut self, n: usize) -> Self {
        self.mutation_rate = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            ));
        }
        if self.mutation_rate == 0 {
            return Err("mutation_rate must be at least 1".into());
        }
        Ok(())
    }
}
