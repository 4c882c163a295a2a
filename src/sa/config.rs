//! Simulated annealing configuration.

/// Lowest temperature the cooling schedule may reach.
pub(crate) const MIN_TEMPERATURE: f64 = 1e-6;

/// Configuration for simulated annealing.
///
/// # Examples
///
/// ```
/// use opentour::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_cooling_factor(0.9999)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct SaConfig {
    /// Geometric cooling factor applied every step: `T ← T · factor`.
    ///
    /// Must lie in `[0.90, 0.9999999]`. Values near the top cool very
    /// slowly and explore longer.
    pub cooling_factor: f64,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            cooling_factor: 0.999995,
            seed: None,
        }
    }
}

impl SaConfig {
    /// Sets the cooling factor.
    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.90..=0.9999999).contains(&self.cooling_factor) {
            return Err(format!(
                "cooling_factor must be in [0.90, 0.9999999], got {}",
                self.cooling_factor
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(SaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_cooling_factor_bounds() {
        assert!(SaConfig::default()
            .with_cooling_factor(0.5)
            .validate()
            .is_err());
        assert!(SaConfig::default()
            .with_cooling_factor(1.0)
            .validate()
            .is_err());
        assert!(SaConfig::default()
            .with_cooling_factor(0.95)
            .validate()
            .is_ok());
    }
}
