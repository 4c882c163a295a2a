//! Open-path tour over an instance: a permutation of node ids plus its cost.
//!
//! The cost field is a cache, but not one the caller manages: mutating
//! methods are the only way to change the order, and every one of them
//! updates the cached cost in the same call — by the closed-form boundary
//! delta where a reversal makes that exact, by full recomputation otherwise.
//! `cost()` is therefore always trustworthy. Edge costs are integer-valued
//! (Chebyshev over fixed-point coordinates), so delta arithmetic in f64 is
//! exact.

use crate::error::{TspError, TspResult};
use crate::instance::Instance;
use rand::Rng;
use std::sync::Arc;

/// An ordered open path through every node of an instance.
///
/// The order is a permutation of `0..instance.len()`: every id appears
/// exactly once. There is no closing edge — the path ends at the last node.
#[derive(Debug, Clone)]
pub struct Tour {
    instance: Arc<Instance>,
    order: Vec<usize>,
    cost: f64,
}

impl Tour {
    /// Creates the identity tour: nodes visited in id order.
    pub fn identity(instance: Arc<Instance>) -> Self {
        let order: Vec<usize> = (0..instance.len()).collect();
        let cost = instance.path_cost(&order);
        Self {
            instance,
            order,
            cost,
        }
    }

    /// Creates a tour from an explicit visiting order.
    ///
    /// Fails with [`TspError::OrderLength`] if the order does not have
    /// exactly one slot per instance node.
    pub fn with_order(instance: Arc<Instance>, order: Vec<usize>) -> TspResult<Self> {
        if order.len() != instance.len() {
            return Err(TspError::OrderLength {
                expected: instance.len(),
                got: order.len(),
            });
        }
        let cost = instance.path_cost(&order);
        Ok(Self {
            instance,
            order,
            cost,
        })
    }

    /// The instance this tour walks.
    pub fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    /// The visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Number of nodes in the tour.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True for a zero-length order. Never happens for tours built through
    /// the public constructors, which require a non-empty instance.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total open-path cost of the current order.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Consumes the tour, returning its order.
    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    /// Replaces the whole order, validating the length.
    pub fn set_order(&mut self, order: Vec<usize>) -> TspResult<()> {
        if order.len() != self.instance.len() {
            return Err(TspError::OrderLength {
                expected: self.instance.len(),
                got: order.len(),
            });
        }
        self.order = order;
        self.cost = self.instance.path_cost(&self.order);
        Ok(())
    }

    /// Shuffles the order by `swaps` uniformly random index-pair swaps.
    pub fn randomize<R: Rng>(&mut self, swaps: usize, rng: &mut R) {
        let n = self.order.len();
        if n < 2 {
            return;
        }
        for _ in 0..swaps {
            let a = rng.random_range(0..n);
            let b = rng.random_range(0..n);
            self.order.swap(a, b);
        }
        self.cost = self.instance.path_cost(&self.order);
    }

    /// Swaps two interior positions. The first and last path positions are
    /// excluded. No-op below 3 nodes.
    pub fn mutate_swap<R: Rng>(&mut self, rng: &mut R) {
        let n = self.order.len();
        if n < 3 {
            return;
        }
        let a = rng.random_range(1..n - 1);
        let b = rng.random_range(1..n - 1);
        self.order.swap(a, b);
        self.cost = self.instance.path_cost(&self.order);
    }

    /// Removes one interior element and reinserts it after another interior
    /// position. No-op below 4 nodes or when source and destination coincide.
    pub fn mutate_reinsert<R: Rng>(&mut self, rng: &mut R) {
        let n = self.order.len();
        if n < 4 {
            return;
        }
        let element = rng.random_range(1..n - 1);
        let mut insert_after = rng.random_range(1..n - 1);
        if element == insert_after {
            return;
        }

        let value = self.order.remove(element);
        if insert_after > element {
            insert_after -= 1;
        }
        self.order.insert(insert_after + 1, value);
        self.cost = self.instance.path_cost(&self.order);
    }

    /// Reverses a random contiguous segment of at least 3 nodes. No-op below
    /// 4 nodes or when the sampled bounds are degenerate.
    pub fn mutate_reverse<R: Rng>(&mut self, rng: &mut R) {
        let n = self.order.len();
        if n < 4 {
            return;
        }
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        if a == b {
            return;
        }
        let (i, j) = (a.min(b), a.max(b));
        if j - i <= 1 {
            return;
        }
        self.reverse_segment(i, j);
    }

    /// Cost change of reversing the segment `[i, j]` of the open path,
    /// without applying it.
    ///
    /// Only the two boundary edges change; interior edges survive reversed,
    /// which costs nothing under a symmetric metric. Degenerate input
    /// (`j − i ≤ 1`, out of range) and the whole-path reversal — a provable
    /// no-op — return 0.
    pub fn reverse_delta(&self, i: usize, j: usize) -> f64 {
        let n = self.order.len();
        if n < 4 || i >= n || j >= n || j <= i + 1 {
            return 0.0;
        }
        if i == 0 && j == n - 1 {
            return 0.0;
        }
        self.boundary_delta(i, j)
    }

    /// Reverses the segment `[i, j]` in place, adjusting the cached cost by
    /// the exact boundary delta. No-op unless `i < j < len`.
    pub fn reverse_segment(&mut self, i: usize, j: usize) {
        let n = self.order.len();
        if j >= n || j <= i {
            return;
        }
        let delta = self.boundary_delta(i, j);
        self.order[i..=j].reverse();
        self.cost += delta;
    }

    /// "Fast" constructive heuristic: single-pass best insertion.
    ///
    /// The current first and last nodes stay anchored; every other node, in
    /// current order, is inserted at the interior prefix position that
    /// minimizes the growing path. O(n²).
    pub fn insertion_heuristic(&mut self) {
        let n = self.order.len();
        if n < 3 {
            return;
        }

        let mut prefix = Vec::with_capacity(n);
        prefix.push(self.order[0]);
        prefix.push(self.order[n - 1]);

        for idx in 1..n - 1 {
            let v = self.order[idx];
            let pos = self.best_interior_insertion(&prefix, v);
            prefix.insert(pos, v);
        }

        self.order = prefix;
        self.cost = self.instance.path_cost(&self.order);
    }

    /// "Thorough" constructive heuristic: outside-in best insertion.
    ///
    /// Nodes are sorted by descending distance from the bounding-box center,
    /// so sparse outer points are committed first, then each is inserted at
    /// the best position anywhere in the growing path. O(n²) plus one
    /// comparison sort; intended for moderate instance sizes.
    pub fn radial_insertion_heuristic(&mut self) {
        let n = self.order.len();
        if n < 3 {
            return;
        }

        let (cx, cy) = self.instance.center();
        let center_dist = |id: usize| -> f64 {
            let p = self.instance.point(id);
            let dx = p.x as f64 - cx;
            let dy = p.y as f64 - cy;
            (dx * dx + dy * dy).sqrt()
        };

        let mut ids = self.order.clone();
        ids.sort_by(|&a, &b| {
            center_dist(b)
                .partial_cmp(&center_dist(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut prefix = Vec::with_capacity(n);
        prefix.push(ids[0]);
        prefix.push(ids[1]);

        for &v in &ids[2..] {
            let pos = self.best_insertion(&prefix, v);
            prefix.insert(pos, v);
        }

        self.order = prefix;
        self.cost = self.instance.path_cost(&self.order);
    }

    /// Boundary-edge delta of reversing `[i, j]`, valid for any `i < j`.
    fn boundary_delta(&self, i: usize, j: usize) -> f64 {
        let ord = &self.order;
        let inst = &self.instance;
        let n = ord.len();

        let mut delta = 0.0;
        if i > 0 {
            delta += inst.edge_cost(ord[i - 1], ord[j]) - inst.edge_cost(ord[i - 1], ord[i]);
        }
        if j < n - 1 {
            delta += inst.edge_cost(ord[i], ord[j + 1]) - inst.edge_cost(ord[j], ord[j + 1]);
        }
        delta
    }

    /// Best interior insertion position for `v` in `prefix` (positions
    /// `1..prefix.len()`, both anchors pinned). Scans high to low, keeping
    /// the last position on ties.
    fn best_interior_insertion(&self, prefix: &[usize], v: usize) -> usize {
        let m = prefix.len();
        let mut best_pos = m - 1;
        let mut best_delta = self.insertion_delta(prefix, v, m - 1);
        for p in (1..m - 1).rev() {
            let delta = self.insertion_delta(prefix, v, p);
            if delta < best_delta {
                best_delta = delta;
                best_pos = p;
            }
        }
        best_pos
    }

    /// Best insertion position for `v` in `prefix` over all positions
    /// `0..=prefix.len()`. Scans high to low, keeping the last position on
    /// ties.
    fn best_insertion(&self, prefix: &[usize], v: usize) -> usize {
        let m = prefix.len();
        let mut best_pos = m;
        let mut best_delta = self.insertion_delta(prefix, v, m);
        for p in (0..m).rev() {
            let delta = self.insertion_delta(prefix, v, p);
            if delta < best_delta {
                best_delta = delta;
                best_pos = p;
            }
        }
        best_pos
    }

    /// Path-cost increase of inserting `v` at position `p` of `prefix`.
    fn insertion_delta(&self, prefix: &[usize], v: usize, p: usize) -> f64 {
        let inst = &self.instance;
        let m = prefix.len();
        if p == 0 {
            inst.edge_cost(v, prefix[0])
        } else if p == m {
            inst.edge_cost(prefix[m - 1], v)
        } else {
            inst.edge_cost(prefix[p - 1], v) + inst.edge_cost(v, prefix[p])
                - inst.edge_cost(prefix[p - 1], prefix[p])
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::instance::Point;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub(crate) fn square_instance() -> Arc<Instance> {
        Arc::new(
            Instance::new(vec![
                Point::from_coords(0.0, 0.0),
                Point::from_coords(0.0, 1.0),
                Point::from_coords(1.0, 0.0),
                Point::from_coords(1.0, 1.0),
            ])
            .unwrap(),
        )
    }

    pub(crate) fn line_instance(n: usize) -> Arc<Instance> {
        let points = (0..n).map(|i| Point::from_coords(i as f64, 0.0)).collect();
        Arc::new(Instance::new(points).unwrap())
    }

    pub(crate) fn scattered_instance(n: usize, seed: u64) -> Arc<Instance> {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = (0..n)
            .map(|_| {
                Point::from_coords(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0))
            })
            .collect();
        Arc::new(Instance::new(points).unwrap())
    }

    pub(crate) fn assert_permutation(order: &[usize], n: usize) {
        assert_eq!(order.len(), n, "order length mismatch");
        let mut seen = vec![false; n];
        for &id in order {
            assert!(id < n, "id {id} out of range");
            assert!(!seen[id], "id {id} appears twice");
            seen[id] = true;
        }
    }

    fn assert_cost_consistent(tour: &Tour) {
        let recomputed = tour.instance().path_cost(tour.order());
        assert_eq!(
            tour.cost(),
            recomputed,
            "cached cost diverged from the order"
        );
    }

    #[test]
    fn test_identity_square_cost() {
        let tour = Tour::identity(square_instance());
        assert_eq!(tour.cost(), 30_000.0);
        assert_eq!(tour.order(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_with_order_length_mismatch() {
        let inst = square_instance();
        let err = Tour::with_order(inst, vec![0, 1, 2]).unwrap_err();
        assert!(matches!(
            err,
            TspError::OrderLength {
                expected: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn test_set_order_recomputes_cost() {
        let mut tour = Tour::identity(square_instance());
        tour.set_order(vec![0, 1, 3, 2]).unwrap();
        assert_eq!(tour.cost(), 30_000.0);
        assert!(tour.set_order(vec![0, 1]).is_err());
    }

    #[test]
    fn test_mutators_preserve_permutation_and_cost() {
        let inst = scattered_instance(20, 7);
        let mut tour = Tour::identity(inst);
        let mut rng = StdRng::seed_from_u64(99);

        for round in 0..200 {
            match round % 4 {
                0 => tour.mutate_swap(&mut rng),
                1 => tour.mutate_reinsert(&mut rng),
                2 => tour.mutate_reverse(&mut rng),
                _ => tour.randomize(3, &mut rng),
            }
            assert_permutation(tour.order(), 20);
            assert_cost_consistent(&tour);
        }
    }

    #[test]
    fn test_mutators_noop_on_tiny_instances() {
        let inst = line_instance(3);
        let mut tour = Tour::identity(inst);
        let mut rng = StdRng::seed_from_u64(1);
        let before = tour.order().to_vec();

        tour.mutate_reinsert(&mut rng);
        tour.mutate_reverse(&mut rng);
        assert_eq!(tour.order(), &before[..], "n=3 reinsert/reverse must no-op");
    }

    #[test]
    fn test_swap_excludes_endpoints() {
        let inst = line_instance(10);
        let mut tour = Tour::identity(inst);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            tour.mutate_swap(&mut rng);
            assert_eq!(tour.order()[0], 0, "first position must stay fixed");
            assert_eq!(tour.order()[9], 9, "last position must stay fixed");
        }
    }

    #[test]
    fn test_reverse_delta_matches_recompute() {
        let inst = scattered_instance(9, 11);
        let tour = Tour::identity(inst.clone());
        let n = tour.len();

        for i in 0..n {
            for j in i + 2..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                let delta = tour.reverse_delta(i, j);
                let mut reversed = tour.order().to_vec();
                reversed[i..=j].reverse();
                let actual = inst.path_cost(&reversed) - tour.cost();
                assert!(
                    (delta - actual).abs() < 1e-9,
                    "delta mismatch for ({i}, {j}): {delta} vs {actual}"
                );
            }
        }
    }

    #[test]
    fn test_whole_path_reversal_is_noop() {
        let inst = scattered_instance(12, 5);
        let mut tour = Tour::identity(inst);
        let n = tour.len();
        assert_eq!(tour.reverse_delta(0, n - 1), 0.0);

        let before = tour.cost();
        tour.reverse_segment(0, n - 1);
        assert_eq!(tour.cost(), before, "full reversal must not change cost");
        assert_cost_consistent(&tour);
    }

    #[test]
    fn test_reverse_segment_updates_cost_exactly() {
        let inst = scattered_instance(15, 23);
        let mut tour = Tour::identity(inst);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let a = rng.random_range(0..15);
            let b = rng.random_range(0..15);
            if a == b {
                continue;
            }
            tour.reverse_segment(a.min(b), a.max(b));
            assert_cost_consistent(&tour);
        }
    }

    #[test]
    fn test_insertion_heuristic_sorts_a_line() {
        let inst = line_instance(5);
        let mut tour = Tour::identity(inst);
        tour.insertion_heuristic();
        assert_eq!(tour.order(), &[0, 1, 2, 3, 4]);
        assert_eq!(tour.cost(), 40_000.0);
    }

    #[test]
    fn test_insertion_heuristic_keeps_anchors() {
        let inst = scattered_instance(25, 4);
        let mut tour = Tour::identity(inst);
        let first = tour.order()[0];
        let last = tour.order()[24];
        tour.insertion_heuristic();
        assert_permutation(tour.order(), 25);
        assert_eq!(tour.order()[0], first);
        assert_eq!(tour.order()[24], last);
    }

    #[test]
    fn test_radial_insertion_on_square() {
        let mut tour = Tour::identity(square_instance());
        tour.radial_insertion_heuristic();
        assert_permutation(tour.order(), 4);
        assert_eq!(tour.cost(), 30_000.0);
    }

    #[test]
    fn test_radial_insertion_valid_permutation() {
        let inst = scattered_instance(30, 17);
        let identity_cost = Tour::identity(inst.clone()).cost();
        let mut tour = Tour::identity(inst);
        tour.radial_insertion_heuristic();
        assert_permutation(tour.order(), 30);
        assert!(
            tour.cost() <= identity_cost,
            "outside-in insertion should beat the identity order on scattered \
             points: {} > {identity_cost}",
            tour.cost()
        );
    }

    proptest! {
        #[test]
        fn prop_mutation_sequences_keep_the_invariants(
            seed in 0u64..1_000,
            ops in proptest::collection::vec(0u8..4, 1..40),
            n in 4usize..30,
        ) {
            let inst = scattered_instance(n, seed);
            let mut tour = Tour::identity(inst);
            let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);

            for op in ops {
                match op {
                    0 => tour.mutate_swap(&mut rng),
                    1 => tour.mutate_reinsert(&mut rng),
                    2 => tour.mutate_reverse(&mut rng),
                    _ => tour.randomize(2, &mut rng),
                }
            }

            assert_permutation(tour.order(), n);
            let recomputed = tour.instance().path_cost(tour.order());
            prop_assert_eq!(tour.cost(), recomputed);
        }
    }
}
