//! Ant colony configuration.

/// Configuration for candidate-list ant colony optimization.
///
/// # Examples
///
/// ```
/// use opentour::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ants_per_batch(10)
///     .with_candidate_list_size(16)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct AcoConfig {
    /// Ants constructed per pheromone-update batch.
    pub ants_per_batch: usize,

    /// Candidate-list size K per node. Pheromone storage is N·K.
    pub candidate_list_size: usize,

    /// Random samples drawn per node when approximating its K nearest
    /// neighbors.
    pub candidate_samples: usize,

    /// Pheromone exponent α in the choice weight `τ^α · η^β`.
    pub alpha: f64,

    /// Heuristic-visibility exponent β, with `η = 1 / (1 + distance)`.
    pub beta: f64,

    /// Evaporation rate ρ: every batch multiplies all pheromone by `1 − ρ`.
    pub evaporation: f64,

    /// Deposit numerator Q: the batch-best tour deposits `Q / cost` per edge.
    pub deposit: f64,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            ants_per_batch: 20,
            candidate_list_size: 20,
            candidate_samples: 200,
            alpha: 1.0,
            beta: 3.0,
            evaporation: 0.10,
            deposit: 1.0,
            seed: None,
        }
    }
}

impl AcoConfig {
    /// Sets the batch size.
    pub fn with_ants_per_batch(mut self, n: usize) -> Self {
        self.ants_per_batch = n;
        self
    }

    /// Sets the candidate-list size.
    pub fn with_candidate_list_size(mut self, k: usize) -> Self {
        self.candidate_list_size = k;
        self
    }

    /// Sets the per-node sampling budget for candidate construction.
    pub fn with_candidate_samples(mut self, n: usize) -> Self {
        self.candidate_samples = n;
        self
    }

    /// Sets the pheromone exponent α.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the visibility exponent β.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the evaporation rate ρ.
    pub fn with_evaporation(mut self, rho: f64) -> Self {
        self.evaporation = rho;
        self
    }

    /// Sets the deposit numerator Q.
    pub fn with_deposit(mut self, q: f64) -> Self {
        self.deposit = q;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.ants_per_batch == 0 {
            return Err("ants_per_batch must be at least 1".into());
        }
        if self.candidate_list_size == 0 {
            return Err("candidate_list_size must be at least 1".into());
        }
        if self.candidate_samples == 0 {
            return Err("candidate_samples must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.evaporation) {
            return Err(format!(
                "evaporation must be in [0, 1], got {}",
                self.evaporation
            ));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(format!("alpha must be finite and non-negative, got {}", self.alpha));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(format!("beta must be finite and non-negative, got {}", self.beta));
        }
        if !self.deposit.is_finite() || self.deposit <= 0.0 {
            return Err(format!("deposit must be positive, got {}", self.deposit));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(AcoConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_evaporation_rejected() {
        assert!(AcoConfig::default().with_evaporation(1.5).validate().is_err());
    }

    #[test]
    fn test_zero_batch_rejected() {
        assert!(AcoConfig::default().with_ants_per_batch(0).validate().is_err());
    }
}
