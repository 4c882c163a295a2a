//! Open-path TSP optimization with incrementally steppable strategies.
//!
//! Computes increasingly short open tours (Hamiltonian paths, no return
//! edge) over a fixed set of 2-D points. Six interchangeable strategies
//! implement one stepping contract:
//!
//! - **2-opt**: sampled segment-reversal local search with closed-form
//!   delta costs.
//! - **Simulated Annealing (SA)**: single-reversal trajectory search with
//!   Metropolis acceptance and geometric cooling.
//! - **Iterated Local Search (ILS)**: 2-opt descent with double-bridge
//!   perturbations to escape local optima.
//! - **Genetic Algorithm (GA)**: rank-proportional survival over a
//!   population of tours.
//! - **Ant Colony Optimization (ACO)**: pheromone-guided construction over
//!   per-node candidate lists, sized for large instances.
//! - **Adaptive differential search**: JADE/L-SHADE-style parameter
//!   adaptation re-targeted to permutations.
//!
//! # Architecture
//!
//! An [`instance::Instance`] is immutable and shared; a [`tour::Tour`] is a
//! permutation of its node ids with a transactionally maintained cost under
//! the Chebyshev metric. Every strategy implements
//! [`optimizer::Optimizer`] — `step()` does a bounded unit of work and
//! reports whether the best tour improved — so the [`worker`] harness can
//! drive any of them from a dedicated thread, publish improvement snapshots
//! to a channel, and stop cooperatively between steps.
//!
//! # Example
//!
//! ```no_run
//! use opentour::optimizer::Strategy;
//! use opentour::tour::Tour;
//! use opentour::tsplib;
//! use std::sync::Arc;
//!
//! fn main() -> opentour::error::TspResult<()> {
//!     let instance = Arc::new(tsplib::load_instance("berlin52.tsp")?);
//!     let tour = Tour::identity(instance);
//!
//!     let optimizer = Strategy::IteratedLocalSearch.create(tour, Some(42));
//!     let (handle, improvements) = opentour::worker::spawn(optimizer);
//!
//!     for imp in improvements.iter().take(10) {
//!         println!("cost {} ({:.2}% better)", imp.cost, imp.improvement_pct);
//!     }
//!
//!     let optimizer = handle.stop();
//!     println!("best: {}", optimizer.best_tour().cost());
//!     Ok(())
//! }
//! ```

pub mod aco;
pub mod ade;
pub mod error;
pub mod ga;
pub mod ils;
pub mod instance;
pub mod optimizer;
pub mod sa;
pub mod tour;
pub mod tsplib;
pub mod two_opt;
pub mod worker;
