//! Execution harness: drives one optimizer on a dedicated worker thread.
//!
//! The optimizer is moved into the thread at spawn and handed back at stop —
//! nothing else ever references its internals while the run is live, so no
//! locking is needed. The only data crossing the thread boundary are
//! [`Improvement`] snapshots sent over a channel, and the stop flag.

use crate::optimizer::Optimizer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// An immutable snapshot of a newly found best tour.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Improvement {
    /// The visiting order of the best tour.
    pub order: Vec<usize>,
    /// Its open-path cost.
    pub cost: f64,
    /// Improvement over the baseline cost, in percent.
    pub improvement_pct: f64,
}

/// Handle to a running optimization worker.
///
/// Dropping the handle without calling [`stop`](WorkerHandle::stop) detaches
/// the worker, which then runs until its stop flag is raised externally —
/// keep the handle around.
pub struct WorkerHandle {
    stop: Arc<AtomicBool>,
    join: JoinHandle<Box<dyn Optimizer>>,
}

impl WorkerHandle {
    /// Raises the stop flag without waiting for the worker to exit.
    ///
    /// The worker observes the flag between steps and finishes the step in
    /// progress; combine with [`stop`](WorkerHandle::stop) to wait.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// True once the worker thread has exited its loop.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stops the worker and returns the optimizer.
    ///
    /// Blocks until the worker observes the flag and exits; the returned
    /// optimizer holds the last fully completed step's best tour, so a new
    /// run can be seeded from it without losing any reported improvement.
    pub fn stop(self) -> Box<dyn Optimizer> {
        self.stop.store(true, Ordering::Relaxed);
        self.join.join().expect("optimizer worker panicked")
    }
}

/// Spawns a worker thread that repeatedly steps `optimizer`, publishing an
/// [`Improvement`] snapshot for every step that improved the best tour.
///
/// The receiver end may be dropped at any time; publishing is best-effort
/// and never stops the worker. Only the stop flag does.
pub fn spawn(mut optimizer: Box<dyn Optimizer>) -> (WorkerHandle, Receiver<Improvement>) {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();
    let (tx, rx) = mpsc::channel();

    let join = thread::spawn(move || {
        let baseline = optimizer.baseline_cost();
        tracing::debug!(baseline, "optimizer worker started");

        while !stop_flag.load(Ordering::Relaxed) {
            if optimizer.step() {
                let best = optimizer.best_tour();
                let cost = best.cost();
                let improvement_pct = if baseline > 0.0 {
                    (baseline - cost) / baseline * 100.0
                } else {
                    0.0
                };
                tracing::debug!(cost, improvement_pct, "new best tour");
                let _ = tx.send(Improvement {
                    order: best.order().to_vec(),
                    cost,
                    improvement_pct,
                });
            }

            // The loop, not the step, is the only yield point.
            thread::yield_now();
        }

        tracing::debug!("optimizer worker stopped");
        optimizer
    });

    (WorkerHandle { stop, join }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::Strategy;
    use crate::tour::tests::scattered_instance;
    use crate::tour::Tour;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn randomized_tour(n: usize, seed: u64) -> Tour {
        let inst = scattered_instance(n, seed);
        let mut tour = Tour::identity(inst);
        let mut rng = StdRng::seed_from_u64(seed);
        tour.randomize(n * 4, &mut rng);
        tour
    }

    #[test]
    fn test_worker_publishes_improvements() {
        let tour = randomized_tour(60, 31);
        let baseline = tour.cost();
        let optimizer = Strategy::TwoOpt.create(tour, Some(7));

        let (handle, rx) = spawn(optimizer);
        let first = rx
            .recv_timeout(Duration::from_secs(30))
            .expect("expected at least one improvement on a randomized tour");
        assert!(first.cost < baseline);
        assert!(first.improvement_pct > 0.0);
        assert_eq!(first.order.len(), 60);

        let optimizer = handle.stop();
        assert!(optimizer.best_tour().cost() <= first.cost);
    }

    #[test]
    fn test_improvement_stream_is_monotonic() {
        let tour = randomized_tour(50, 8);
        let optimizer = Strategy::IteratedLocalSearch.create(tour, Some(3));

        let (handle, rx) = spawn(optimizer);
        thread::sleep(Duration::from_millis(200));
        handle.stop();

        let improvements: Vec<Improvement> = rx.try_iter().collect();
        for pair in improvements.windows(2) {
            assert!(
                pair[1].cost < pair[0].cost,
                "improvements must arrive in strictly decreasing cost order"
            );
        }
    }

    #[test]
    fn test_stop_and_restart_never_loses_an_improvement() {
        let tour = randomized_tour(50, 12);
        let optimizer = Strategy::SimulatedAnnealing.create(tour, Some(5));

        let (handle, _rx) = spawn(optimizer);
        thread::sleep(Duration::from_millis(100));
        let optimizer = handle.stop();
        let best_before = optimizer.best_tour().cost();

        // Restart a fresh run seeded from the recovered best tour.
        let restarted = Strategy::TwoOpt.create(optimizer.best_tour().clone(), Some(6));
        assert_eq!(restarted.baseline_cost(), best_before);

        let (handle, _rx) = spawn(restarted);
        thread::sleep(Duration::from_millis(100));
        let optimizer = handle.stop();
        assert!(
            optimizer.best_tour().cost() <= best_before,
            "restart must start from the recovered best, never behind it"
        );
    }

    #[test]
    fn test_worker_survives_dropped_receiver() {
        let tour = randomized_tour(40, 19);
        let optimizer = Strategy::TwoOpt.create(tour, Some(1));

        let (handle, rx) = spawn(optimizer);
        drop(rx);
        thread::sleep(Duration::from_millis(100));
        assert!(!handle.is_finished(), "worker must ignore a dropped consumer");
        handle.stop();
    }

    #[test]
    fn test_request_stop_is_observed() {
        let tour = randomized_tour(40, 23);
        let optimizer = Strategy::AdaptiveDifferential.create(tour, Some(2));

        let (handle, _rx) = spawn(optimizer);
        handle.request_stop();
        thread::sleep(Duration::from_millis(100));
        assert!(handle.is_finished());
        handle.stop();
    }
}
