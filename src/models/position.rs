//! Position-only motion model: one hidden state per grid cell.
//!
//! Transitions are formulated per destination. Cell `s2` is entered either
//! from itself with probability `stay_prob`, or from each of its `k`
//! in-bounds neighbors with probability `(1 - stay_prob) / k`. Border cells
//! have fewer neighbors, so each neighbor contributes more; the incoming
//! weights of every destination therefore sum to one.
//!
//! Candidates are listed as the cell itself, then East, West, South and
//! North. The engine keeps the first maximum, so this order decides ties.

use crate::direction::Direction;
use crate::error::{check_open_probability, Result};
use crate::grid::Grid;
use crate::traits::LatticeModel;
use crate::transitions::{IncomingEdges, IncomingEdgesBuilder};

const CANDIDATE_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::West,
    Direction::South,
    Direction::North,
];

/// Tunables of the position-only model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionParams {
    /// Probability of remaining in the same cell for one step.
    pub stay_prob: f64,
}

impl Default for PositionParams {
    fn default() -> Self {
        Self { stay_prob: 0.15 }
    }
}

impl PositionParams {
    pub fn validate(&self) -> Result<()> {
        check_open_probability("stay probability", self.stay_prob)
    }
}

/// States are cell indices `0..N²`.
#[derive(Clone, Debug)]
pub struct PositionModel {
    num_cells: usize,
    params: PositionParams,
    edges: IncomingEdges,
}

impl PositionModel {
    pub fn new(grid: &Grid, params: PositionParams) -> Result<Self> {
        params.validate()?;
        let num_cells = grid.num_cells();
        let log_stay = params.stay_prob.ln();
        let mut builder = IncomingEdgesBuilder::new(num_cells);
        for dest in 0..num_cells {
            // self first: ties resolve toward staying put
            builder.push(dest, dest, log_stay);
            let degree = grid.neighbors(dest).len().max(1);
            let log_move = ((1.0 - params.stay_prob) / degree as f64).ln();
            for src in CANDIDATE_ORDER.iter().filter_map(|&dir| grid.step(dest, dir)) {
                builder.push(src, dest, log_move);
            }
        }
        Ok(Self {
            num_cells,
            params,
            edges: builder.build(),
        })
    }

    pub fn params(&self) -> &PositionParams {
        &self.params
    }
}

impl LatticeModel for PositionModel {
    #[inline]
    fn num_states(&self) -> usize {
        self.num_cells
    }

    #[inline]
    fn cell_of(&self, state: usize) -> usize {
        state
    }

    /// Flat prior: the first step is scored by its emission alone.
    #[inline]
    fn initial_log_prior(&self, _state: usize) -> f64 {
        0.0
    }

    #[inline]
    fn transitions(&self) -> &IncomingEdges {
        &self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_destination_weights() {
        let grid = Grid::new(3).unwrap();
        let model = PositionModel::new(&grid, PositionParams::default()).unwrap();
        let corner = grid.id(0, 0);
        let (sources, log_probs) = model.transitions().incoming(corner);
        assert_eq!(sources, &[corner, grid.id(1, 0), grid.id(0, 1)]);
        assert!((log_probs[0] - 0.15f64.ln()).abs() < 1e-12);
        assert!((log_probs[1] - (0.85f64 / 2.0).ln()).abs() < 1e-12);
        assert_eq!(log_probs[1], log_probs[2]);
    }

    #[test]
    fn interior_destination_has_five_candidates() {
        let grid = Grid::new(5).unwrap();
        let model = PositionModel::new(&grid, PositionParams::default()).unwrap();
        let (sources, log_probs) = model.transitions().incoming(grid.id(2, 2));
        assert_eq!(sources.len(), 5);
        assert!((log_probs[1] - (0.85f64 / 4.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn interior_candidates_are_east_west_south_north() {
        let grid = Grid::new(3).unwrap();
        let model = PositionModel::new(&grid, PositionParams::default()).unwrap();
        let (sources, _) = model.transitions().incoming(grid.id(1, 1));
        assert_eq!(
            sources,
            &[grid.id(1, 1), grid.id(2, 1), grid.id(0, 1), grid.id(1, 2), grid.id(1, 0)]
        );
    }

    #[test]
    fn rejects_out_of_range_stay_probability() {
        let grid = Grid::new(2).unwrap();
        for stay_prob in [1.2, 0.0, 1.0] {
            let bad = PositionParams { stay_prob };
            assert!(matches!(
                PositionModel::new(&grid, bad),
                Err(crate::error::Error::ProbabilityNotInterior { .. })
            ));
        }
    }

    #[test]
    fn identity_projection_and_flat_prior() {
        let grid = Grid::new(4).unwrap();
        let model = PositionModel::new(&grid, PositionParams::default()).unwrap();
        assert_eq!(model.num_states(), 16);
        assert_eq!(model.cell_of(11), 11);
        assert_eq!(model.initial_log_prior(3), 0.0);
    }
}
