//! Adaptive differential search stepping implementation.
//!
//! One `step()` advances a single population target slot; a full sweep over
//! the population is one generation, at whose boundary the rank order, the
//! adaptive means, the archive, and the stagnation counter are maintained.

use super::config::AdeConfig;
use crate::instance::Instance;
use crate::optimizer::{seed_rng, Optimizer};
use crate::tour::Tour;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Cauchy, Distribution, Normal};
use std::sync::Arc;

/// Bounds for the mutation strength F.
const F_LO: f64 = 0.05;
const F_HI: f64 = 1.40;

/// Initial adaptive means.
const INITIAL_MU_F: f64 = 0.60;
const INITIAL_MU_CR: f64 = 0.85;

/// Spread of the F (Cauchy) and CR (Normal) sampling distributions.
const F_SPREAD: f64 = 0.10;
const CR_SPREAD: f64 = 0.10;

/// Crossover segment bounds: at least `SEG_MIN` positions, capped at
/// `SEG_CAP` so a step stays lightweight on large instances.
const SEG_MIN: usize = 10;
const SEG_CAP: usize = 800;

/// Cap on difference-swaps applied per trial.
const DIFF_CAP: usize = 600;

/// Adaptive differential-style permutation search with node 0 pinned.
pub struct AdeOptimizer {
    config: AdeConfig,
    rng: StdRng,
    instance: Arc<Instance>,
    n: usize,

    population: Vec<Vec<usize>>,
    costs: Vec<f64>,
    /// Population indices sorted by cost ascending; rebuilt each generation.
    rank: Vec<usize>,
    archive: Vec<Vec<usize>>,

    mu_f: f64,
    mu_cr: f64,

    /// Successful (F, CR, cost gain) triples of the current generation.
    success_f: Vec<f64>,
    success_cr: Vec<f64>,
    success_gain: Vec<f64>,

    target: usize,
    stagnant_generations: usize,
    best_prev: f64,

    best: Tour,
    baseline: f64,
    last_best: f64,
}

impl AdeOptimizer {
    /// Creates an optimizer whose population is seeded from `initial`,
    /// diversified with progressively more random swaps per slot.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`AdeConfig::validate`]
    /// first to get a descriptive error).
    pub fn new(initial: Tour, config: AdeConfig) -> Self {
        config.validate().expect("invalid AdeConfig");
        let mut rng = seed_rng(config.seed);
        let instance = initial.instance().clone();
        let n = initial.len();
        let baseline = initial.cost();
        let mut last_best = initial.cost();
        let mut best = initial.clone();

        let mut population = Vec::new();
        let mut costs = Vec::new();

        if n >= 2 {
            // Pin node 0 at position 0 before diversifying.
            let mut base = initial.order().to_vec();
            if base[0] != 0 {
                let zero_pos = base
                    .iter()
                    .position(|&id| id == 0)
                    .expect("a permutation contains node 0");
                base.swap(0, zero_pos);
            }

            population.reserve(config.population_size);
            costs.reserve(config.population_size);
            for i in 0..config.population_size {
                let mut order = base.clone();
                let swaps = (n * 2).min(2_000 + i * 50);
                randomize_pinned(&mut order, swaps, &mut rng);

                let cost = instance.path_cost(&order);
                if cost < last_best {
                    best = Tour::with_order(instance.clone(), order.clone())
                        .expect("population orders cover the instance");
                    last_best = cost;
                }
                population.push(order);
                costs.push(cost);
            }
        }

        let mut optimizer = Self {
            config,
            rng,
            instance,
            n,
            population,
            costs,
            rank: Vec::new(),
            archive: Vec::new(),
            mu_f: INITIAL_MU_F,
            mu_cr: INITIAL_MU_CR,
            success_f: Vec::new(),
            success_cr: Vec::new(),
            success_gain: Vec::new(),
            target: 0,
            stagnant_generations: 0,
            best_prev: f64::INFINITY,
            best,
            baseline,
            last_best,
        };
        if !optimizer.population.is_empty() {
            optimizer.begin_generation();
        }
        optimizer
    }

    fn begin_generation(&mut self) {
        let costs = &self.costs;
        self.rank = (0..self.population.len()).collect();
        self.rank
            .sort_by(|&a, &b| costs[a].total_cmp(&costs[b]));

        self.success_f.clear();
        self.success_cr.clear();
        self.success_gain.clear();
    }

    fn end_generation(&mut self) {
        self.fold_successes();

        if self.last_best + 1e-12 < self.best_prev {
            self.best_prev = self.last_best;
            self.stagnant_generations = 0;
        } else {
            self.stagnant_generations += 1;
            if self.stagnant_generations >= self.config.stagnation_trigger {
                tracing::trace!(
                    best = self.last_best,
                    "stagnated, restarting worst fraction"
                );
                self.restart_worst();
                self.stagnant_generations = 0;
                self.best_prev = self.last_best;
            }
        }

        self.trim_archive();
    }

    /// Folds the generation's successes into the adaptive means:
    /// gain-weighted Lehmer mean for F, gain-weighted arithmetic mean for CR.
    fn fold_successes(&mut self) {
        if self.success_f.is_empty() {
            return;
        }

        let mut gain_sum: f64 = self.success_gain.iter().sum();
        if gain_sum <= 0.0 {
            gain_sum = self.success_gain.len() as f64;
        }

        let mut mean_cr = 0.0;
        let mut lehmer_num = 0.0;
        let mut lehmer_den = 0.0;
        for i in 0..self.success_f.len() {
            let w = if self.success_gain[i] > 0.0 {
                self.success_gain[i] / gain_sum
            } else {
                1.0 / self.success_f.len() as f64
            };
            mean_cr += w * self.success_cr[i];
            lehmer_num += w * self.success_f[i] * self.success_f[i];
            lehmer_den += w * self.success_f[i];
        }

        let lehmer_f = if lehmer_den > 0.0 {
            lehmer_num / lehmer_den
        } else {
            self.mu_f
        };

        let c = self.config.smoothing;
        self.mu_cr = (1.0 - c) * self.mu_cr + c * mean_cr.clamp(0.0, 1.0);
        self.mu_f = ((1.0 - c) * self.mu_f + c * lehmer_f).clamp(F_LO, F_HI);
    }

    /// Replaces the worst fraction of the population with shaken copies of
    /// the current best.
    fn restart_worst(&mut self) {
        let pop_size = self.population.len();
        let count = ((self.config.worst_fraction * pop_size as f64).round() as usize).max(1);

        if self.rank.is_empty() {
            self.begin_generation();
        }
        let best_order = self.population[self.rank[0]].clone();

        for k in 0..count.min(pop_size) {
            let idx = self.rank[pop_size - 1 - k];
            let mut order = best_order.clone();
            let swaps = ((self.config.restart_sigma * self.n as f64).round() as usize)
                .clamp(50, 1_200);
            randomize_pinned(&mut order, swaps, &mut self.rng);

            let cost = self.instance.path_cost(&order);
            if cost < self.last_best {
                self.best = Tour::with_order(self.instance.clone(), order.clone())
                    .expect("restart orders cover the instance");
                self.last_best = cost;
            }
            self.population[idx] = order;
            self.costs[idx] = cost;
        }
    }

    fn trim_archive(&mut self) {
        let cap = ((self.config.archive_rate * self.population.len() as f64).round() as usize)
            .max(1);
        if self.archive.len() > cap {
            let excess = self.archive.len() - cap;
            self.archive.drain(..excess);
        }
    }

    /// Uniform index among the top p-best fraction of the ranking.
    fn pick_p_best(&mut self) -> usize {
        let pop_size = self.population.len();
        let p = ((self.config.p_best * pop_size as f64).ceil() as usize)
            .max(2)
            .min(pop_size);
        self.rank[self.rng.random_range(0..p)]
    }

    /// Uniform population index distinct from both `avoid` values.
    fn pick_distinct(&mut self, avoid1: usize, avoid2: usize) -> usize {
        loop {
            let r = self.rng.random_range(0..self.population.len());
            if r != avoid1 && r != avoid2 {
                return r;
            }
        }
    }

    /// F ~ Cauchy(μF, spread), resampled until finite and in bounds.
    fn sample_f(&mut self) -> f64 {
        let cauchy = Cauchy::new(self.mu_f, F_SPREAD).expect("positive Cauchy spread");
        for _ in 0..32 {
            let f = cauchy.sample(&mut self.rng);
            if f.is_finite() && (F_LO..=F_HI).contains(&f) {
                return f;
            }
        }
        self.mu_f.clamp(F_LO, F_HI)
    }

    /// CR ~ Normal(μCR, spread), clamped to [0, 1].
    fn sample_cr(&mut self) -> f64 {
        let normal = Normal::new(self.mu_cr, CR_SPREAD).expect("positive Normal spread");
        let cr = normal.sample(&mut self.rng);
        if cr.is_finite() {
            cr.clamp(0.0, 1.0)
        } else {
            self.mu_cr
        }
    }
}

/// Random swaps over positions `1..n`, leaving position 0 untouched.
fn randomize_pinned<R: Rng>(order: &mut [usize], swaps: usize, rng: &mut R) {
    let n = order.len();
    if n < 3 {
        return;
    }
    for _ in 0..swaps {
        let a = rng.random_range(1..n);
        let b = rng.random_range(1..n);
        order.swap(a, b);
    }
}

/// Order-preserving segment crossover with position 0 pinned.
///
/// Copies one contiguous segment of `guide` into the child, then fills the
/// remaining positions with `parent`'s nodes in their relative order,
/// wrapping around positions `1..n`. The segment length scales with `cr`,
/// capped for large instances.
pub(crate) fn order_crossover<R: Rng>(
    parent: &[usize],
    guide: &[usize],
    cr: f64,
    rng: &mut R,
) -> Vec<usize> {
    let n = parent.len();
    if n < 4 {
        return parent.to_vec();
    }

    let max_seg = (n - 1).min(SEG_CAP);
    let seg_len = ((cr * (n - 1) as f64).round() as usize).clamp(SEG_MIN.min(max_seg), max_seg);

    let start = rng.random_range(1..=(n - 1) - seg_len + 1);
    let end = start + seg_len - 1;

    let mut child = vec![usize::MAX; n];
    let mut used = vec![false; n];
    child[0] = 0;
    used[0] = true;

    for i in start..=end {
        child[i] = guide[i];
        used[guide[i]] = true;
    }

    // Fill the rest from the parent in order, wrapping over 1..n and
    // skipping the protected segment.
    let mut write = if end + 1 >= n { 1 } else { end + 1 };
    for &v in &parent[1..] {
        if used[v] {
            continue;
        }
        while write >= start && write <= end {
            write = if end + 1 >= n { 1 } else { end + 1 };
        }
        child[write] = v;
        used[v] = true;
        write += 1;
        if write >= n {
            write = 1;
        }
    }

    child
}

/// Moves an F-scaled share of `donor`'s differing positions into `trial` by
/// swaps, preserving the permutation.
fn apply_difference_toward<R: Rng>(
    trial: &mut [usize],
    donor: &[usize],
    f: f64,
    rng: &mut R,
) {
    let n = trial.len();
    if n < 4 {
        return;
    }

    let strength = (f / F_HI).clamp(0.0, 1.0);

    let mut pos = vec![0usize; n];
    for (i, &v) in trial.iter().enumerate() {
        pos[v] = i;
    }

    let mut diff: Vec<usize> = (1..n).filter(|&i| trial[i] != donor[i]).collect();
    if diff.is_empty() {
        return;
    }

    let count = ((strength * diff.len() as f64).round() as usize)
        .clamp(1, diff.len().min(DIFF_CAP));

    diff.shuffle(rng);
    for &p in diff.iter().take(count) {
        let value = donor[p];
        let current = pos[value];
        if current == p {
            continue;
        }
        trial.swap(p, current);
        pos[trial[current]] = current;
        pos[trial[p]] = p;
    }
}

/// Occasional small reversal on positions `1..n`.
fn small_perturbation<R: Rng>(order: &mut [usize], rng: &mut R) {
    let n = order.len();
    if n < 6 {
        return;
    }
    let a = rng.random_range(1..n);
    let b = rng.random_range(1..n);
    if a == b {
        return;
    }
    let (i, j) = (a.min(b), a.max(b));
    if j - i < 3 {
        return;
    }
    order[i..=j].reverse();
}

impl Optimizer for AdeOptimizer {
    fn step(&mut self) -> bool {
        if self.population.is_empty() {
            return false;
        }

        let mut improved = false;

        if self.target == 0 {
            self.begin_generation();
        }

        let i = self.target;
        let pbest_idx = self.pick_p_best();
        let r1 = self.pick_distinct(i, pbest_idx);

        let use_archive = !self.archive.is_empty()
            && self.rng.random_range(0.0..1.0) < self.config.archive_prob;
        let donor2: Vec<usize> = if use_archive {
            let a = self.rng.random_range(0..self.archive.len());
            self.archive[a].clone()
        } else {
            let r2 = self.pick_distinct(i, r1);
            self.population[r2].clone()
        };

        let f = self.sample_f();
        let cr = self.sample_cr();

        let mut trial = order_crossover(
            &self.population[i],
            &self.population[pbest_idx],
            cr,
            &mut self.rng,
        );
        apply_difference_toward(&mut trial, &donor2, f, &mut self.rng);
        if self.rng.random_range(0.0..1.0) < self.config.perturb_prob {
            small_perturbation(&mut trial, &mut self.rng);
        }

        let parent_cost = self.costs[i];
        let trial_cost = self.instance.path_cost(&trial);

        if trial_cost < parent_cost {
            let displaced = std::mem::replace(&mut self.population[i], trial);
            self.archive.push(displaced);
            self.costs[i] = trial_cost;

            self.success_f.push(f);
            self.success_cr.push(cr);
            self.success_gain.push(parent_cost - trial_cost);

            if trial_cost < self.last_best {
                self.best = Tour::with_order(self.instance.clone(), self.population[i].clone())
                    .expect("trial orders cover the instance");
                self.last_best = trial_cost;
                improved = true;
            }
        }

        self.target += 1;
        if self.target >= self.population.len() {
            self.target = 0;
            self.end_generation();
        }

        improved
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
    fn test_crossover_pins_node_zero() {
        let mut rng = seed_rng(Some(1));
        let n = 40;
        let mut parent: Vec<usize> = (0..n).collect();
        let mut guide: Vec<usize> = (0..n).collect();
        randomize_pinned(&mut parent, 200, &mut rng);
        randomize_pinned(&mut guide, 200, &mut rng);

        for _ in 0..100 {
            let cr = rng.random_range(0.0..1.0);
            let child = order_crossover(&parent, &guide, cr, &mut rng);
            assert_permutation(&child, n);
            assert_eq!(child[0], 0, "node 0 must stay at position 0");
        }
    }

    #[test]
    fn test_difference_swaps_preserve_permutation() {
        let mut rng = seed_rng(Some(2));
        let n = 30;
        let mut trial: Vec<usize> = (0..n).collect();
        let mut donor: Vec<usize> = (0..n).collect();
        randomize_pinned(&mut trial, 100, &mut rng);
        randomize_pinned(&mut donor, 100, &mut rng);

        for f in [F_LO, 0.5, 1.0, F_HI] {
            let mut t = trial.clone();
            apply_difference_toward(&mut t, &donor, f, &mut rng);
            assert_permutation(&t, n);
            assert_eq!(t[0], 0);
        }
    }

    #[test]
    fn test_full_strength_difference_converges_to_donor() {
        let mut rng = seed_rng(Some(3));
        let n = 20;
        let mut trial: Vec<usize> = (0..n).collect();
        let mut donor: Vec<usize> = (0..n).collect();
        randomize_pinned(&mut trial, 50, &mut rng);
        randomize_pinned(&mut donor, 50, &mut rng);

        // At maximum strength every differing position is pulled over.
        let mut t = trial.clone();
        apply_difference_toward(&mut t, &donor, F_HI, &mut rng);
        assert_eq!(t, donor);
    }

    #[test]
    fn test_improves_a_randomized_tour() {
        let tour = randomized_tour(30, 51);
        let baseline = tour.cost();
        let mut optimizer = AdeOptimizer::new(tour, AdeConfig::default().with_seed(14));

        for _ in 0..3_000 {
            optimizer.step();
        }
        assert!(
            optimizer.best_tour().cost() < baseline,
            "adaptive search failed to improve: {} >= {baseline}",
            optimizer.best_tour().cost()
        );
        assert_permutation(optimizer.best_tour().order(), 30);
    }

    #[test]
    fn test_best_never_regresses() {
        let tour = randomized_tour(25, 33);
        let mut optimizer = AdeOptimizer::new(tour, AdeConfig::default().with_seed(4));

        let mut last = optimizer.best_tour().cost();
        for _ in 0..1_000 {
            let improved = optimizer.step();
            let best = optimizer.best_tour().cost();
            assert!(best <= last);
            if improved {
                assert!(best < last);
            }
            last = best;
        }
    }

    #[test]
    fn test_archive_respects_capacity() {
        let tour = randomized_tour(20, 64);
        let config = AdeConfig::default()
            .with_population_size(10)
            .with_archive_rate(1.5)
            .with_seed(5);
        let mut optimizer = AdeOptimizer::new(tour, config);

        for _ in 0..2_000 {
            optimizer.step();
            if optimizer.target == 0 {
                assert!(
                    optimizer.archive.len() <= 15,
                    "archive exceeded its capacity at a generation boundary"
                );
            }
        }
    }

    #[test]
    fn test_adaptive_means_stay_in_bounds() {
        let tour = randomized_tour(25, 70);
        let mut optimizer = AdeOptimizer::new(tour, AdeConfig::default().with_seed(21));

        for _ in 0..2_000 {
            optimizer.step();
            assert!(
                (F_LO..=F_HI).contains(&optimizer.mu_f),
                "mu_f escaped its bounds: {}",
                optimizer.mu_f
            );
            assert!(
                (0.0..=1.0).contains(&optimizer.mu_cr),
                "mu_cr escaped [0, 1]: {}",
                optimizer.mu_cr
            );
        }
    }

    #[test]
    fn test_population_orders_pin_node_zero() {
        let tour = randomized_tour(20, 83);
        let mut optimizer = AdeOptimizer::new(tour, AdeConfig::default().with_seed(6));

        for _ in 0..500 {
            optimizer.step();
        }
        for order in &optimizer.population {
            assert_permutation(order, 20);
            assert_eq!(order[0], 0);
        }
    }
}
