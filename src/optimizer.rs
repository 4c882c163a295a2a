//! The stepping contract shared by every optimization strategy, and the
//! selection surface for constructing one.
//!
//! A strategy does a bounded unit of work per [`Optimizer::step`] call and
//! never blocks inside it; responsiveness and cancellation live entirely in
//! the loop that drives it (see [`crate::worker`]).

use crate::aco::{AcoConfig, AcoOptimizer};
use crate::ade::{AdeConfig, AdeOptimizer};
use crate::ga::{GaConfig, GaOptimizer};
use crate::ils::{IlsConfig, IlsOptimizer};
use crate::sa::{SaConfig, SaOptimizer};
use crate::tour::Tour;
use crate::two_opt::{TwoOptConfig, TwoOptOptimizer};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// An incrementally steppable tour optimizer.
///
/// Implementations own their search state exclusively; nothing outside the
/// driving loop may touch it while a run is in progress.
pub trait Optimizer: Send {
    /// Performs one bounded unit of work.
    ///
    /// Returns `true` iff the best-known tour improved during this call.
    fn step(&mut self) -> bool;

    /// The best tour found so far. The borrow is valid until the next
    /// [`step`](Optimizer::step) call.
    fn best_tour(&self) -> &Tour;

    /// Cost of the tour the strategy was seeded with, fixed at construction.
    /// Used only to report progress percentages.
    fn baseline_cost(&self) -> f64;
}

/// The closed set of available strategies.
///
/// A strategy is chosen once, at run start; there is no mid-run switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Rank-death genetic algorithm.
    Genetic,
    /// Simulated annealing over segment reversals.
    SimulatedAnnealing,
    /// Sampled 2-opt local search.
    TwoOpt,
    /// 2-opt descent with double-bridge perturbation.
    IteratedLocalSearch,
    /// Candidate-list ant colony optimization.
    AntColony,
    /// Adaptive differential-style permutation search.
    AdaptiveDifferential,
}

impl Strategy {
    /// All strategies, in presentation order.
    pub const ALL: [Strategy; 6] = [
        Strategy::Genetic,
        Strategy::SimulatedAnnealing,
        Strategy::TwoOpt,
        Strategy::IteratedLocalSearch,
        Strategy::AntColony,
        Strategy::AdaptiveDifferential,
    ];

    /// Human-readable strategy name.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Genetic => "genetic",
            Strategy::SimulatedAnnealing => "simulated-annealing",
            Strategy::TwoOpt => "two-opt",
            Strategy::IteratedLocalSearch => "iterated-local-search",
            Strategy::AntColony => "ant-colony",
            Strategy::AdaptiveDifferential => "adaptive-differential",
        }
    }

    /// Builds a boxed optimizer seeded from `initial`, using each strategy's
    /// default configuration with the given RNG seed.
    pub fn create(self, initial: Tour, seed: Option<u64>) -> Box<dyn Optimizer> {
        match self {
            Strategy::Genetic => {
                let mut config = GaConfig::default();
                config.seed = seed;
                Box::new(GaOptimizer::new(initial, config))
            }
            Strategy::SimulatedAnnealing => {
                let mut config = SaConfig::default();
                config.seed = seed;
                Box::new(SaOptimizer::new(initial, config))
            }
            Strategy::TwoOpt => {
                let mut config = TwoOptConfig::default();
                config.seed = seed;
                Box::new(TwoOptOptimizer::new(initial, config))
            }
            Strategy::IteratedLocalSearch => {
                let mut config = IlsConfig::default();
                config.seed = seed;
                Box::new(IlsOptimizer::new(initial, config))
            }
            Strategy::AntColony => {
                let mut config = AcoConfig::default();
                config.seed = seed;
                Box::new(AcoOptimizer::new(initial, config))
            }
            Strategy::AdaptiveDifferential => {
                let mut config = AdeConfig::default();
                config.seed = seed;
                Box::new(AdeOptimizer::new(initial, config))
            }
        }
    }
}

/// Creates a deterministic RNG from an optional seed, falling back to an
/// entropy-derived seed.
pub(crate) fn seed_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::seed_from_u64(rand::random()),
    }
}
