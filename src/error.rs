//! Error types for instance loading and tour construction.
//!
//! Load and construction failures fail fast and never leave a partial
//! `Instance` or an invalid `Tour` behind. Strategy configuration keeps a
//! separate `Result<(), String>` validation channel (see each strategy's
//! `config` module).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fallible opentour operations.
pub type TspResult<T> = Result<T, TspError>;

/// Unified error type for instance and tour construction.
#[derive(Debug, Error)]
pub enum TspError {
    /// The input or output file could not be opened or read/written.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The coordinate section yielded zero parsable points.
    #[error("no coordinates were parsed from {}", .path.display())]
    NoCoordinates {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// An instance was constructed from an empty point set.
    #[error("instance has no points")]
    EmptyInstance,

    /// A tour order does not cover the instance.
    #[error("tour order has length {got}, instance has {expected} points")]
    OrderLength {
        /// Number of points in the instance.
        expected: usize,
        /// Length of the supplied order.
        got: usize,
    },
}
