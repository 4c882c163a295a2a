//! Ant colony stepping implementation.

use super::config::AcoConfig;
use crate::instance::Instance;
use crate::optimizer::{seed_rng, Optimizer};
use crate::tour::Tour;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

/// Pheromone weights never decay below this floor when used in a choice.
const TAU_FLOOR: f64 = 1e-12;

/// Candidate-list ant colony optimizer.
pub struct AcoOptimizer {
    config: AcoConfig,
    rng: StdRng,
    instance: Arc<Instance>,
    n: usize,
    /// `candidates[i][k]` is the k-th approximate neighbor of node i.
    candidates: Vec<Vec<usize>>,
    /// `pheromone[i][k]` weights the edge to `candidates[i][k]`.
    pheromone: Vec<Vec<f64>>,
    ant_index: usize,
    batch_best_cost: f64,
    batch_best_order: Vec<usize>,
    best: Tour,
    baseline: f64,
    last_best: f64,
}

impl AcoOptimizer {
    /// Creates an optimizer seeded from `initial`.
    ///
    /// Candidate lists are built once here by random sampling; construction
    /// is O(n · candidate_samples), deliberately sub-quadratic for large
    /// instances at the price of approximate neighborhoods.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`AcoConfig::validate`]
    /// first to get a descriptive error).
    pub fn new(initial: Tour, config: AcoConfig) -> Self {
        config.validate().expect("invalid AcoConfig");
        let mut rng = seed_rng(config.seed);
        let instance = initial.instance().clone();
        let n = initial.len();
        let baseline = initial.cost();
        let last_best = initial.cost();

        let (candidates, pheromone) = if n > 1 {
            build_candidate_lists(&instance, &config, &mut rng)
        } else {
            (Vec::new(), Vec::new())
        };

        Self {
            config,
            rng,
            instance,
            n,
            candidates,
            pheromone,
            ant_index: 0,
            batch_best_cost: f64::INFINITY,
            batch_best_order: Vec::new(),
            best: initial,
            baseline,
            last_best,
        }
    }

    /// Constructs one ant's tour, starting at node 0.
    fn construct_tour(&mut self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.n);
        let mut visited = vec![false; self.n];

        let mut current = 0;
        order.push(current);
        visited[current] = true;

        for _ in 1..self.n {
            let next = self.choose_next(current, &visited);
            order.push(next);
            visited[next] = true;
            current = next;
        }

        order
    }

    /// Picks the next node from `current`'s candidate list, weighted by
    /// pheromone and visibility. Falls back to a uniform random unvisited
    /// node when every candidate is visited or the weights collapse to zero.
    fn choose_next(&mut self, current: usize, visited: &[bool]) -> usize {
        let cand = &self.candidates[current];
        let tau = &self.pheromone[current];

        let mut weights = vec![0.0; cand.len()];
        let mut total = 0.0;
        for (k, &j) in cand.iter().enumerate() {
            if visited[j] {
                continue;
            }
            let d = self.instance.edge_cost(current, j);
            let eta = 1.0 / (1.0 + d);
            let w = tau[k].max(TAU_FLOOR).powf(self.config.alpha)
                * eta.powf(self.config.beta);
            weights[k] = w;
            total += w;
        }

        if total <= 0.0 || !total.is_finite() {
            return pick_random_unvisited(visited, &mut self.rng);
        }

        let roll = self.rng.random_range(0.0..1.0) * total;
        let mut acc = 0.0;
        for (k, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            acc += w;
            if acc >= roll {
                return cand[k];
            }
        }

        // Numeric tail: accept any positive-weight candidate.
        for (k, &w) in weights.iter().enumerate() {
            if w > 0.0 {
                return cand[k];
            }
        }
        pick_random_unvisited(visited, &mut self.rng)
    }

    /// Evaporates all pheromone and deposits onto the batch-best tour's
    /// edges, in both candidate-list directions where present.
    fn update_pheromone(&mut self) {
        let keep = 1.0 - self.config.evaporation;
        for row in &mut self.pheromone {
            for tau in row.iter_mut() {
                *tau *= keep;
            }
        }

        if !self.batch_best_order.is_empty()
            && self.batch_best_cost.is_finite()
            && self.batch_best_cost > 0.0
        {
            let delta = self.config.deposit / self.batch_best_cost;
            for w in self.batch_best_order.windows(2) {
                let (a, b) = (w[0], w[1]);
                if let Some(k) = self.candidates[a].iter().position(|&c| c == b) {
                    self.pheromone[a][k] += delta;
                }
                if let Some(k) = self.candidates[b].iter().position(|&c| c == a) {
                    self.pheromone[b][k] += delta;
                }
            }
        }

        tracing::trace!(
            batch_best = self.batch_best_cost,
            "pheromone batch update"
        );

        self.ant_index = 0;
        self.batch_best_cost = f64::INFINITY;
        self.batch_best_order.clear();
    }
}

/// Builds the approximate nearest-neighbor candidate lists and uniform
/// initial pheromone for every node.
fn build_candidate_lists(
    instance: &Instance,
    config: &AcoConfig,
    rng: &mut StdRng,
) -> (Vec<Vec<usize>>, Vec<Vec<f64>>) {
    let n = instance.len();
    let k = config.candidate_list_size.min(n - 1).max(1);
    let samples = config.candidate_samples.min((n - 1).max(10));

    let mut candidates = Vec::with_capacity(n);
    let mut pheromone = Vec::with_capacity(n);

    for i in 0..n {
        // Keep the K nearest of `samples` random probes.
        let mut kept: Vec<(f64, usize)> = Vec::with_capacity(k + 1);
        for _ in 0..samples {
            let j = rng.random_range(0..n);
            if j == i {
                continue;
            }
            let d = instance.edge_cost(i, j);
            if kept.len() < k {
                kept.push((d, j));
                continue;
            }
            let worst = kept
                .iter()
                .enumerate()
                .max_by(|a, b| a.1 .0.total_cmp(&b.1 .0))
                .map(|(idx, _)| idx)
                .expect("kept is non-empty");
            if d < kept[worst].0 {
                kept[worst] = (d, j);
            }
        }

        kept.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut list: Vec<usize> = Vec::with_capacity(k);
        for (_, id) in kept {
            if list.len() >= k {
                break;
            }
            if !list.contains(&id) {
                list.push(id);
            }
        }

        // Sampling can return duplicates; pad with random distinct ids.
        while list.len() < k {
            let j = rng.random_range(0..n);
            if j != i && !list.contains(&j) {
                list.push(j);
            }
        }

        pheromone.push(vec![1.0; list.len()]);
        candidates.push(list);
    }

    (candidates, pheromone)
}

/// Uniform random unvisited node: bounded random probing with a linear
/// fallback scan.
fn pick_random_unvisited(visited: &[bool], rng: &mut StdRng) -> usize {
    let n = visited.len();
    for _ in 0..1024 {
        let j = rng.random_range(0..n);
        if !visited[j] {
            return j;
        }
    }
    visited.iter().position(|&v| !v).unwrap_or(0)
}

impl Optimizer for AcoOptimizer {
    fn step(&mut self) -> bool {
        if self.n < 2 || self.candidates.is_empty() {
            return false;
        }

        let mut improved = false;

        let order = self.construct_tour();
        let cost = self.instance.path_cost(&order);

        if cost < self.batch_best_cost {
            self.batch_best_cost = cost;
            self.batch_best_order = order.clone();
        }

        if cost < self.last_best {
            self.best = Tour::with_order(self.instance.clone(), order)
                .expect("constructed tour covers the instance");
            self.last_best = self.best.cost();
            improved = true;
        }

        self.ant_index += 1;
        if self.ant_index >= self.config.ants_per_batch {
            self.update_pheromone();
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
