//! Scoring a decoded cell path against simulated ground truth.

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::simulate::Trajectory;
use crate::utils::agreement;

/// Summary statistics of one decoded path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathScore {
    /// Fraction of steps whose decoded cell equals the true cell.
    pub match_rate: f64,
    /// Mean distance between decoded cell centers and true continuous positions.
    pub mean_error: f64,
}

/// Score `decoded` against `truth` on `grid`.
///
/// An empty path scores a perfect match with zero error.
pub fn score_path(grid: &Grid, decoded: &[usize], truth: &Trajectory) -> Result<PathScore> {
    if decoded.len() != truth.len() {
        return Err(Error::LengthMismatch {
            what: "decoded path",
            expected: truth.len(),
            got: decoded.len(),
        });
    }
    if truth.true_positions.len() != truth.len() {
        return Err(Error::LengthMismatch {
            what: "true positions",
            expected: truth.len(),
            got: truth.true_positions.len(),
        });
    }
    for &cell in decoded {
        grid.check_cell(cell)?;
    }
    if decoded.is_empty() {
        return Ok(PathScore {
            match_rate: 1.0,
            mean_error: 0.0,
        });
    }
    let total_error: f64 = decoded
        .iter()
        .zip(&truth.true_positions)
        .map(|(&cell, pos)| grid.center(cell).distance(pos))
        .sum();
    Ok(PathScore {
        match_rate: agreement(decoded, &truth.true_cells),
        mean_error: total_error / decoded.len() as f64,
    })
}
