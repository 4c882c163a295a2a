//! Genetic algorithm with rank-proportional survival.
//!
//! Keeps a fixed-size population of tours. Each generation ranks the
//! population by cost, always keeps the best individual, kills the rest with
//! probability proportional to their rank, and refills the freed slots with
//! mutated clones of random survivors. Selection pressure comes entirely
//! from the death rule; there is no crossover.

mod config;
mod optimizer;

pub use config::GaConfig;
pub use optimizer::GaOptimizer;
