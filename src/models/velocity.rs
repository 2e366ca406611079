//! Position+velocity motion model with sticky headings.
//!
//! Hidden states are `(cell, heading)` pairs flattened as
//! `cell * 5 + heading`. From a source state `(c, d)` the candidate moves are:
//! - **keep**: one step further along `d` (moving headings only), weight `keep`;
//! - **turn**: one step along any other feasible moving heading, sharing
//!   weight `turn` equally;
//! - **stay**: remain in `c` with heading reset to `Stay`, weight `stay`.
//!
//! Candidate weights are divided by their sum per source, so a border cell
//! with fewer options redistributes mass among what is left and every
//! source's outgoing probabilities sum to one.

use crate::direction::Direction;
use crate::error::{check_probability, Error, Result};
use crate::grid::Grid;
use crate::traits::LatticeModel;
use crate::transitions::{IncomingEdges, IncomingEdgesBuilder};

const K: usize = Direction::COUNT;

/// Tunables of the sticky motion model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickyParams {
    /// Weight of continuing along the current heading.
    pub keep: f64,
    /// Weight shared by all feasible turns.
    pub turn: f64,
    /// Weight of stopping in place.
    pub stay: f64,
    /// Prior mass on the `Stay` heading at the first step; the remainder is
    /// split evenly over the four moving headings.
    pub initial_stay: f64,
}

impl Default for StickyParams {
    fn default() -> Self {
        Self {
            keep: 0.82,
            turn: 0.12,
            stay: 0.06,
            initial_stay: 0.4,
        }
    }
}

impl StickyParams {
    pub fn validate(&self) -> Result<()> {
        check_probability("keep weight", self.keep, 0.0, 1.0)?;
        check_probability("turn weight", self.turn, 0.0, 1.0)?;
        check_probability("stay weight", self.stay, 0.0, 1.0)?;
        check_probability("initial stay prior", self.initial_stay, 0.0, 1.0)?;
        let sum = self.keep + self.turn + self.stay;
        if sum <= 0.0 {
            return Err(Error::DegenerateMotion { sum });
        }
        Ok(())
    }
}

/// States are `(cell, heading)` pairs, `5·N²` in total.
#[derive(Clone, Debug)]
pub struct VelocityModel {
    num_cells: usize,
    params: StickyParams,
    log_prior: [f64; K],
    edges: IncomingEdges,
}

impl VelocityModel {
    pub fn new(grid: &Grid, params: StickyParams) -> Result<Self> {
        params.validate()?;
        let num_cells = grid.num_cells();
        let mut builder = IncomingEdgesBuilder::new(num_cells * K);
        let mut candidates: Vec<(usize, Direction, f64)> = Vec::with_capacity(K + 1);

        for cell in 0..num_cells {
            for heading in Direction::ALL {
                candidates.clear();
                if !heading.is_stay() {
                    if let Some(next) = grid.step(cell, heading) {
                        candidates.push((next, heading, params.keep));
                    }
                }
                let turns: Vec<(usize, Direction)> = Direction::MOVES
                    .iter()
                    .filter(|&&d| d != heading)
                    .filter_map(|&d| grid.step(cell, d).map(|next| (next, d)))
                    .collect();
                if !turns.is_empty() {
                    let share = params.turn / turns.len() as f64;
                    candidates.extend(turns.into_iter().map(|(next, d)| (next, d, share)));
                }
                candidates.push((cell, Direction::Stay, params.stay));

                let z: f64 = candidates.iter().map(|&(_, _, w)| w).sum();
                if z <= 0.0 {
                    continue;
                }
                let src = state_index(cell, heading);
                for &(next, d, w) in &candidates {
                    // zero-weight moves are impossible, not merely unlikely
                    if w > 0.0 {
                        builder.push(src, state_index(next, d), (w / z).ln());
                    }
                }
            }
        }

        let moving_prior = ((1.0 - params.initial_stay) / Direction::MOVES.len() as f64).ln();
        let mut log_prior = [moving_prior; K];
        log_prior[Direction::Stay.index()] = params.initial_stay.ln();

        Ok(Self {
            num_cells,
            params,
            log_prior,
            edges: builder.build(),
        })
    }

    pub fn params(&self) -> &StickyParams {
        &self.params
    }

    /// Heading component of a state.
    #[inline]
    pub fn direction_of(&self, state: usize) -> Direction {
        Direction::ALL[state % K]
    }
}

/// Flat index of `(cell, heading)`.
#[inline]
pub fn state_index(cell: usize, heading: Direction) -> usize {
    cell * K + heading.index()
}

impl LatticeModel for VelocityModel {
    #[inline]
    fn num_states(&self) -> usize {
        self.num_cells * K
    }

    #[inline]
    fn cell_of(&self, state: usize) -> usize {
        state / K
    }

    #[inline]
    fn initial_log_prior(&self, state: usize) -> f64 {
        self.log_prior[state % K]
    }

    #[inline]
    fn transitions(&self) -> &IncomingEdges {
        &self.edges
    }
}
