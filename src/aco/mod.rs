//! Ant colony optimization with per-node candidate lists.
//!
//! Built for large instances: instead of a dense pheromone matrix, every
//! node keeps a fixed-size list of approximate nearest neighbors — found by
//! random sampling, not an exact spatial index — with one pheromone weight
//! per candidate slot. Each step constructs a single ant's tour; after every
//! batch of ants the pheromone evaporates and the batch-best tour deposits
//! onto its edges.
//!
//! # References
//!
//! - Dorigo & Gambardella (1997), "Ant Colony System: A Cooperative Learning
//!   Approach to the Traveling Salesman Problem", *IEEE Trans. Evolutionary
//!   Computation* 1(1).

mod config;
mod optimizer;

pub use config::AcoConfig;
pub use optimizer::AcoOptimizer;
