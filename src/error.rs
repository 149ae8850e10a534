//! Error types for peristate operations.

use thiserror::Error;

/// Result type alias using the peristate Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a peridynamic evaluation.
///
/// All failures are deterministic functions of the inputs; there are no
/// transient or retriable errors in this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A bond vector (reference or current) has zero length where a
    /// normalized direction or nonzero denominator is required. The geometry
    /// or time step that produced it is invalid; the evaluation is aborted.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Invalid configuration detected at evaluation entry: non-positive
    /// weighted volume, zero worker count, invalid moduli, mismatched array
    /// lengths, or an unsupported dimension.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A neighbor provider returned a node's own id as its neighbor, or a
    /// duplicate id. Treated as fatal input corruption, never retried.
    #[error("neighbor contract violation: {0}")]
    NeighborContract(String),
}
