//! Iterated local search: 2-opt descent with double-bridge restarts.
//!
//! Runs the sampled 2-opt step until it stops finding improving moves, then
//! escapes the local optimum with a double-bridge perturbation — a 4-opt
//! move that a single 2-opt step cannot undo — and descends again.
//!
//! # References
//!
//! - Lourenço, Martin & Stützle (2003), "Iterated Local Search",
//!   *Handbook of Metaheuristics*.
//! - Martin, Otto & Felten (1991), "Large-step Markov chains for the
//!   traveling salesman problem".

mod config;
mod optimizer;

pub use config::IlsConfig;
pub use optimizer::{double_bridge, IlsOptimizer};
