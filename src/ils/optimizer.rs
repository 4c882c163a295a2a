//! Iterated local search stepping implementation.

use super::config::IlsConfig;
use crate::optimizer::{seed_rng, Optimizer};
use crate::tour::Tour;
use crate::two_opt::best_sampled_reversal;
use rand::rngs::StdRng;
use rand::Rng;

/// 2-opt descent with stagnation-triggered double-bridge perturbation.
pub struct IlsOptimizer {
    config: IlsConfig,
    rng: StdRng,
    current: Tour,
    best: Tour,
    baseline: f64,
    no_improve: usize,
}

impl IlsOptimizer {
    /// Creates an optimizer seeded from `initial`.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`IlsConfig::validate`]
    /// first to get a descriptive error).
    pub fn new(initial: Tour, config: IlsConfig) -> Self {
        config.validate().expect("invalid IlsConfig");
        let rng = seed_rng(config.seed);
        let baseline = initial.cost();
        Self {
            config,
            rng,
            best: initial.clone(),
            current: initial,
            baseline,
            no_improve: 0,
        }
    }
}

/// Applies a double-bridge perturbation in place.
///
/// Four increasing cut points split the order into five segments
/// `A B C D E`, reassembled as `A C B D E`. The node set is untouched; only
/// segment order changes. No-op below 8 nodes, where the cut points cannot
/// all be distinct.
pub fn double_bridge<R: Rng>(tour: &mut Tour, rng: &mut R) {
    let n = tour.len();
    if n < 8 {
        return;
    }

    let i = rng.random_range(1..=n - 6);
    let j = rng.random_range(i + 1..=n - 5);
    let k = rng.random_range(j + 1..=n - 4);
    let l = rng.random_range(k + 1..=n - 2);

    let ord = tour.order();
    let mut new_order = Vec::with_capacity(n);
    new_order.extend_from_slice(&ord[..i]); // A
    new_order.extend_from_slice(&ord[j..k]); // C
    new_order.extend_from_slice(&ord[i..j]); // B
    new_order.extend_from_slice(&ord[k..l]); // D
    new_order.extend_from_slice(&ord[l..]); // E

    tour.set_order(new_order).expect("double bridge preserves length");
}

impl Optimizer for IlsOptimizer {
    fn step(&mut self) -> bool {
        if self.current.len() < 4 {
            return false;
        }

        if let Some((i, j)) =
            best_sampled_reversal(&self.current, self.config.samples_per_step, &mut self.rng)
        {
            self.current.reverse_segment(i, j);
            self.no_improve = 0;

            if self.current.cost() < self.best.cost() {
                self.best = self.current.clone();
                return true;
            }
            return false;
        }

        self.no_improve += 1;
        if self.no_improve >= self.config.stagnation_limit {
            tracing::trace!(
                cost = self.current.cost(),
                "descent stagnated, applying double bridge"
            );
            double_bridge(&mut self.current, &mut self.rng);
            self.no_improve = 0;

            if self.current.cost() < self.best.cost() {
                self.best = self.current.clone();
                return true;
            }
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
    use crate::tour::tests::{assert_permutation, scattered_instance};

    fn randomized_tour(n: usize, seed: u64) -> Tour {
        let inst = scattered_instance(n, seed);
        let mut tour = Tour::identity(inst);
        let mut rng = seed_rng(Some(seed));
        tour.randomize(n * 5, &mut rng);
        tour
    }

    #[test]
    fn test_double_bridge_preserves_node_set() {
        for n in [8, 9, 12, 30, 101] {
            let mut tour = Tour::identity(scattered_instance(n, n as u64));
            let mut rng = seed_rng(Some(99));
            double_bridge(&mut tour, &mut rng);
            assert_permutation(tour.order(), n);
        }
    }

    #[test]
    fn test_double_bridge_noop_below_8() {
        let mut tour = Tour::identity(scattered_instance(7, 1));
        let before = tour.order().to_vec();
        let mut rng = seed_rng(Some(1));
        double_bridge(&mut tour, &mut rng);
        assert_eq!(tour.order(), &before[..]);
    }

    #[test]
    fn test_double_bridge_moves_segments() {
        let mut tour = Tour::identity(scattered_instance(20, 14));
        let before = tour.order().to_vec();
        let mut rng = seed_rng(Some(5));
        double_bridge(&mut tour, &mut rng);
        assert_ne!(
            tour.order(),
            &before[..],
            "the B and C segments must trade places"
        );
    }

    #[test]
    fn test_escapes_a_local_optimum() {
        let tour = randomized_tour(40, 77);
        let baseline = tour.cost();

        // A tiny stagnation limit forces perturbations to fire regularly.
        let config = IlsConfig::default()
            .with_samples_per_step(400)
            .with_stagnation_limit(3)
            .with_seed(10);
        let mut optimizer = IlsOptimizer::new(tour, config);

        for _ in 0..3_000 {
            optimizer.step();
        }
        assert!(optimizer.best_tour().cost() < baseline);
        assert_permutation(optimizer.best_tour().order(), 40);
    }

    #[test]
    fn test_best_never_regresses_across_perturbations() {
        let tour = randomized_tour(30, 3);
        let config = IlsConfig::default()
            .with_samples_per_step(200)
            .with_stagnation_limit(2)
            .with_seed(4);
        let mut optimizer = IlsOptimizer::new(tour, config);

        let mut last = optimizer.best_tour().cost();
        for _ in 0..2_000 {
            let improved = optimizer.step();
            let best = optimizer.best_tour().cost();
            assert!(best <= last);
            if improved {
                assert!(best < last);
            }
            last = best;
        }
    }
}
