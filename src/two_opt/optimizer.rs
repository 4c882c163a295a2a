//! 2-opt stepping implementation.

use super::config::TwoOptConfig;
use crate::optimizer::{seed_rng, Optimizer};
use crate::tour::Tour;
use rand::rngs::StdRng;
use rand::Rng;

/// Sampled 2-opt local search over segment reversals.
pub struct TwoOptOptimizer {
    config: TwoOptConfig,
    rng: StdRng,
    current: Tour,
    best: Tour,
    baseline: f64,
}

impl TwoOptOptimizer {
    /// Creates an optimizer seeded from `initial`.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call
    /// [`TwoOptConfig::validate`] first to get a descriptive error).
    pub fn new(initial: Tour, config: TwoOptConfig) -> Self {
        config.validate().expect("invalid TwoOptConfig");
        let rng = seed_rng(config.seed);
        let baseline = initial.cost();
        Self {
            config,
            rng,
            best: initial.clone(),
            current: initial,
            baseline,
        }
    }
}

/// Samples `budget` random reversals of `tour` and returns the best strictly
/// improving one, if any.
pub(crate) fn best_sampled_reversal(
    tour: &Tour,
    budget: usize,
    rng: &mut StdRng,
) -> Option<(usize, usize)> {
    let n = tour.len();
    if n < 4 {
        return None;
    }

    let mut best_delta = 0.0;
    let mut best_move = None;

    for _ in 0..budget {
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        if a == b {
            continue;
        }
        let (i, j) = (a.min(b), a.max(b));
        if j - i <= 1 {
            continue;
        }

        let delta = tour.reverse_delta(i, j);
        if delta < best_delta {
            best_delta = delta;
            best_move = Some((i, j));
        }
    }

    best_move
}

impl Optimizer for TwoOptOptimizer {
    fn step(&mut self) -> bool {
        let Some((i, j)) =
            best_sampled_reversal(&self.current, self.config.samples_per_step, &mut self.rng)
        else {
            return false;
        };

        self.current.reverse_segment(i, j);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Instance, Point};
    use crate::tour::tests::{assert_permutation, scattered_instance};
    use std::sync::Arc;

    #[test]
    fn test_uncrosses_a_reversed_segment() {
        // Collinear points visited as 0 → 3 → 2 → 1 → 4: the middle segment
        // runs backward and both edges into it double back over the line.
        // Reversing positions [1, 3] restores the straight path.
        let inst = Arc::new(
            Instance::new(
                (0..5)
                    .map(|i| Point::from_coords(i as f64, 0.0))
                    .collect(),
            )
            .unwrap(),
        );
        let crossed = Tour::with_order(inst, vec![0, 3, 2, 1, 4]).unwrap();
        assert_eq!(crossed.cost(), 80_000.0);

        let config = TwoOptConfig::default()
            .with_samples_per_step(4_000)
            .with_seed(42);
        let mut optimizer = TwoOptOptimizer::new(crossed, config);

        assert!(
            optimizer.step(),
            "a 4000-sample budget over 5 nodes must find the uncrossing move"
        );
        assert_eq!(optimizer.best_tour().cost(), 40_000.0);
        assert_eq!(optimizer.best_tour().order(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_tiny_instance_is_a_noop() {
        let inst = scattered_instance(3, 1);
        let tour = Tour::identity(inst);
        let cost = tour.cost();
        let mut optimizer = TwoOptOptimizer::new(tour, TwoOptConfig::default().with_seed(1));

        assert!(!optimizer.step());
        assert_eq!(optimizer.best_tour().cost(), cost);
    }

    #[test]
    fn test_best_never_regresses() {
        let inst = scattered_instance(50, 3);
        let mut tour = Tour::identity(inst);
        let mut rng = crate::optimizer::seed_rng(Some(3));
        tour.randomize(200, &mut rng);

        let mut optimizer =
            TwoOptOptimizer::new(tour, TwoOptConfig::default().with_samples_per_step(500).with_seed(8));

        let mut last = optimizer.best_tour().cost();
        for _ in 0..400 {
            optimizer.step();
            let best = optimizer.best_tour().cost();
            assert!(best <= last);
            last = best;
            assert_permutation(optimizer.best_tour().order(), 50);
        }
    }
}
