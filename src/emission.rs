//! Isotropic Gaussian emission model.
//!
//! `log p(o | pos) = -ln(2π σ²) - ½ |pos - o|² / σ²`
//!
//! Both decoders score observations against cell centers only, so the
//! per-step table below is indexed by cell, never by (cell, heading).

use crate::error::{check_sigma, Result};
use crate::grid::{Grid, Point};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Log-likelihood of `obs` given true position `pos` under noise scale `sigma`.
///
/// `sigma` must be positive; use [`GaussianEmission::new`] to validate it.
#[inline]
pub fn log_emission(pos: &Point, obs: &Point, sigma: f64) -> f64 {
    let var = sigma * sigma;
    -(2.0 * std::f64::consts::PI * var).ln() - 0.5 * pos.distance_sq(obs) / var
}

/// Validated emission model with the normalizer folded in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianEmission {
    sigma: f64,
    log_norm: f64,
    inv_var: f64,
}

impl GaussianEmission {
    pub fn new(sigma: f64) -> Result<Self> {
        check_sigma(sigma)?;
        let var = sigma * sigma;
        Ok(Self {
            sigma,
            log_norm: -(2.0 * std::f64::consts::PI * var).ln(),
            inv_var: 1.0 / var,
        })
    }

    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    #[inline]
    pub fn log_likelihood(&self, pos: &Point, obs: &Point) -> f64 {
        self.log_norm - 0.5 * pos.distance_sq(obs) * self.inv_var
    }
}

/// `T x N²` table of per-cell emission log-likelihoods, row-major by step.
#[derive(Clone, Debug)]
pub struct EmissionTable {
    steps: usize,
    cells: usize,
    values: Vec<f64>,
}

impl EmissionTable {
    /// Score every observation against every cell center.
    pub fn build(grid: &Grid, model: &GaussianEmission, observations: &[Point]) -> Self {
        let cells = grid.num_cells();
        let steps = observations.len();
        let centers = grid.centers();
        let mut values = vec![0.0; steps * cells];

        let fill_row = |(row, obs): (&mut [f64], &Point)| {
            for (slot, center) in row.iter_mut().zip(&centers) {
                *slot = model.log_likelihood(center, obs);
            }
        };

        #[cfg(feature = "parallel")]
        values
            .par_chunks_mut(cells)
            .zip(observations.par_iter())
            .for_each(fill_row);
        #[cfg(not(feature = "parallel"))]
        values
            .chunks_mut(cells)
            .zip(observations.iter())
            .for_each(fill_row);

        Self {
            steps,
            cells,
            values,
        }
    }

    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Emission row for step `t`.
    #[inline]
    pub fn row(&self, t: usize) -> &[f64] {
        &self.values[t * self.cells..(t + 1) * self.cells]
    }

    #[inline]
    pub fn get(&self, t: usize, cell: usize) -> f64 {
        self.values[t * self.cells + cell]
    }
}
