//! Error type shared by the simulator, the decoders and path scoring.
//!
//! Every variant is a caller contract violation detected at the API
//! boundary. Unreachable DP states are handled inside the engine and never
//! surface here.

use thiserror::Error;

/// Validation failures raised before any simulation or decoding work starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The lattice needs at least one cell per side.
    #[error("grid size must be at least 1, got {size}")]
    InvalidGridSize { size: usize },

    /// A simulation must produce at least one step.
    #[error("total steps must be at least 1")]
    InvalidStepCount,

    /// Noise scale must be strictly positive and finite.
    #[error("noise sigma must be positive and finite, got {sigma}")]
    InvalidSigma { sigma: f64 },

    /// A probability parameter fell outside its allowed range.
    #[error("{name} must lie in [{min}, {max}], got {value}")]
    InvalidProbability {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A probability that is used as a log weight must exclude both endpoints.
    #[error("{name} must lie strictly between 0 and 1, got {value}")]
    ProbabilityNotInterior { name: &'static str, value: f64 },

    /// The parked phase is longer than the whole run and the caller did not opt in.
    #[error("park steps ({park}) exceed total steps ({total})")]
    ParkExceedsSteps { park: usize, total: usize },

    /// Sticky-motion weights leave no probability mass to normalize.
    #[error("motion weights must have a positive sum, got {sum}")]
    DegenerateMotion { sum: f64 },

    /// Two sequences that must be aligned step by step differ in length.
    #[error("length mismatch: {what} has {got} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// A cell index does not address a cell of the grid.
    #[error("cell index {cell} out of range for {cells} cells")]
    CellOutOfRange { cell: usize, cells: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Check that `value` is a number inside `[min, max]`.
pub(crate) fn check_probability(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    // NaN fails both comparisons and is rejected here as well.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(Error::InvalidProbability {
            name,
            value,
            min,
            max,
        })
    }
}

/// Check that `value` lies in the open interval `(0, 1)`.
pub(crate) fn check_open_probability(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(Error::ProbabilityNotInterior { name, value })
    }
}

/// Check that `sigma` is usable as a Gaussian scale.
pub(crate) fn check_sigma(sigma: f64) -> Result<()> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSigma { sigma })
    }
}
