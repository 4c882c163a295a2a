//! Genetic algorithm stepping implementation.

use super::config::GaConfig;
use crate::optimizer::{seed_rng, Optimizer};
use crate::tour::Tour;
use rand::rngs::StdRng;
use rand::Rng;

/// Rank-death genetic algorithm over a population of tours.
pub struct GaOptimizer {
    config: GaConfig,
    rng: StdRng,
    population: Vec<Tour>,
    best: Tour,
    baseline: f64,
    last_best: f64,
}

impl GaOptimizer {
    /// Creates an optimizer whose population starts as copies of `initial`.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`GaConfig::validate`]
    /// first to get a descriptive error).
    pub fn new(initial: Tour, config: GaConfig) -> Self {
        config.validate().expect("invalid GaConfig");
        let rng = seed_rng(config.seed);
        let baseline = initial.cost();
        let population = vec![initial.clone(); config.population_size];
        Self {
            config,
            rng,
            population,
            baseline,
            last_best: initial.cost(),
            best: initial,
        }
    }

    fn rank_population(&mut self) {
        self.population.sort_by(|a, b| {
            a.cost()
                .partial_cmp(&b.cost())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

impl Optimizer for GaOptimizer {
    fn step(&mut self) -> bool {
        let pop_size = self.config.population_size;
        self.rank_population();

        // Probabilistic death: rank 0 always survives, rank i dies with
        // probability i / pop_size.
        let mut survivors = Vec::with_capacity(pop_size);
        survivors.push(self.population[0].clone());
        for i in 1..pop_size {
            let p_die = i as f64 / pop_size as f64;
            if self.rng.random_range(0.0..1.0) >= p_die {
                survivors.push(self.population[i].clone());
            }
        }

        // Refill dead slots with mutated clones of random survivors.
        let dead = pop_size - survivors.len();
        for _ in 0..dead {
            let parent = self.rng.random_range(0..survivors.len());
            let mut child = survivors[parent].clone();
            let mutations = self.rng.random_range(0..self.config.mutation_rate);
            for _ in 0..mutations {
                match self.rng.random_range(0..3) {
                    0 => child.mutate_reinsert(&mut self.rng),
                    1 => child.mutate_swap(&mut self.rng),
                    _ => child.mutate_reverse(&mut self.rng),
                }
            }
            survivors.push(child);
        }
        self.population = survivors;

        self.rank_population();
        let front = &self.population[0];
        if front.cost() < self.last_best {
            self.best = front.clone();
            self.last_best = front.cost();
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
