//! Simulated annealing over segment reversals (open-tour variant).
//!
//! A single-solution trajectory search: each step proposes one random
//! segment reversal, accepts it by the Metropolis criterion, and cools the
//! temperature geometrically. The initial temperature is scaled to the seed
//! tour's average edge cost, so acceptance behavior is instance-independent.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod optimizer;

pub use config::SaConfig;
pub use optimizer::SaOptimizer;
