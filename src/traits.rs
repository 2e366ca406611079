//! Core trait for motion models decodable by the Viterbi engine.
//!
//! A motion model fixes a discrete state space laid over the grid, the
//! projection of each state onto a grid cell (emissions depend on the cell
//! only), a log prior for the first step, and an incoming-edge transition
//! table. [`ViterbiEngine`](crate::engine::ViterbiEngine) needs nothing else.
//!
//! Contract:
//! - states are `0..num_states()`;
//! - `cell_of(s) < grid.num_cells()` for every state;
//! - `transitions().num_states() == num_states()`;
//! - log-probabilities are finite or `-inf`, never NaN.

use crate::transitions::IncomingEdges;

/// Hidden-state model for a grid HMM.
pub trait LatticeModel {
    /// Size of the hidden state space.
    fn num_states(&self) -> usize;

    /// Grid cell a state is located at.
    fn cell_of(&self, state: usize) -> usize;

    /// Log prior added to the first step's emission score.
    fn initial_log_prior(&self, state: usize) -> f64;

    /// Precomputed incoming-edge table, built once per model.
    fn transitions(&self) -> &IncomingEdges;
}
