//! Viterbi engine over incoming-edge lattices.
//!
//! This module implements the two classic phases:
//! 1. A forward sweep filling a `T x S` table of best cumulative
//!    log-probabilities and a matching table of backpointers.
//! 2. A backtrack from the best final state along the backpointers.
//!
//! Tables are flat arenas indexed by `t * S + s`, owned by one call and
//! dropped after path extraction. The engine is generic over
//! [`LatticeModel`]; each destination only visits its precomputed incoming
//! edges, so a step costs `O(edges)` rather than `O(S²)`.

use crate::emission::EmissionTable;
use crate::traits::LatticeModel;
use crate::utils::TotalF64;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Score of a state no path can reach. Finite, so comparisons stay total.
pub const IMPOSSIBLE: f64 = -1e300;

/// Backpointer guard for unreachable states and for the first step.
pub const NO_PREDECESSOR: usize = usize::MAX;

/// Clamp anything at or below [`IMPOSSIBLE`] (including `-inf` and NaN) to it.
#[inline]
fn guard(score: f64) -> f64 {
    if score > IMPOSSIBLE {
        score
    } else {
        IMPOSSIBLE
    }
}

/// Dynamic-programming tables of one decode call.
#[derive(Clone, Debug)]
pub struct DpTables {
    steps: usize,
    states: usize,
    scores: Vec<f64>,
    back: Vec<usize>,
}

impl DpTables {
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[inline]
    pub fn states(&self) -> usize {
        self.states
    }

    /// Best cumulative log-probability of any path ending in `state` at step `t`.
    #[inline]
    pub fn score(&self, t: usize, state: usize) -> f64 {
        self.scores[t * self.states + state]
    }

    /// Scores of every state at step `t`.
    #[inline]
    pub fn row(&self, t: usize) -> &[f64] {
        &self.scores[t * self.states..(t + 1) * self.states]
    }

    /// Predecessor of `state` at step `t`; `None` at `t = 0` and for unreachable states.
    #[inline]
    pub fn backpointer(&self, t: usize, state: usize) -> Option<usize> {
        match self.back[t * self.states + state] {
            NO_PREDECESSOR => None,
            prev => Some(prev),
        }
    }

    /// Best final state and its score; the first maximum wins ties.
    pub fn best_final(&self) -> Option<(usize, f64)> {
        let last = self.steps.checked_sub(1)?;
        let row = self.row(last);
        let mut best_state = 0;
        let mut best = row[0];
        for (s, &v) in row.iter().enumerate().skip(1) {
            if v > best {
                best = v;
                best_state = s;
            }
        }
        Some((best_state, best))
    }

    /// Reconstruct the optimal state sequence.
    ///
    /// Returns `None` for an empty table.
    pub fn backtrack(&self) -> Option<(f64, Vec<usize>)> {
        let (mut state, score) = self.best_final()?;
        let mut path = vec![0; self.steps];
        path[self.steps - 1] = state;
        for t in (1..self.steps).rev() {
            // a guard here would mean the final state was unreachable; hold position
            state = self.backpointer(t, state).unwrap_or(state);
            path[t - 1] = state;
        }
        Some((score, path))
    }
}

/// Output of a decode: optimal states and their projection onto cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
    /// Joint log-probability of the optimal path and the observations.
    pub log_prob: TotalF64,
    /// Hidden states, one per observation.
    pub states: Vec<usize>,
    /// Grid cells of `states`.
    pub cells: Vec<usize>,
}

impl Decoded {
    fn empty() -> Self {
        Self {
            log_prob: TotalF64(0.0),
            states: Vec::new(),
            cells: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Viterbi decoder for a borrowed motion model.
///
/// Typical usage:
/// ```
/// use grid_hmm::emission::{EmissionTable, GaussianEmission};
/// use grid_hmm::engine::ViterbiEngine;
/// use grid_hmm::grid::{Grid, Point};
/// use grid_hmm::models::{PositionModel, PositionParams};
///
/// let grid = Grid::new(4).unwrap();
/// let model = PositionModel::new(&grid, PositionParams::default()).unwrap();
/// let obs = [Point::new(0.0, 0.0), Point::new(1.05, 0.0), Point::new(1.9, 0.1)];
/// let emissions = EmissionTable::build(&grid, &GaussianEmission::new(0.1).unwrap(), &obs);
/// let decoded = ViterbiEngine::new(&model).run(&emissions);
/// assert_eq!(decoded.cells, vec![0, 1, 2]);
/// ```
pub struct ViterbiEngine<'m, M: LatticeModel> {
    model: &'m M,
}

impl<'m, M: LatticeModel> ViterbiEngine<'m, M> {
    pub fn new(model: &'m M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        self.model
    }

    /// Phase I: fill the score and backpointer tables.
    ///
    /// # Panics
    /// Panics if `emissions` was built for fewer cells than the model addresses.
    pub fn forward(&self, emissions: &EmissionTable) -> DpTables
    where
        M: Sync,
    {
        let steps = emissions.steps();
        let states = self.model.num_states();
        let mut scores = vec![IMPOSSIBLE; steps * states];
        let mut back = vec![NO_PREDECESSOR; steps * states];

        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("viterbi_forward", steps, states);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        if steps > 0 {
            let first = emissions.row(0);
            for (s, slot) in scores[..states].iter_mut().enumerate() {
                *slot = guard(self.model.initial_log_prior(s) + first[self.model.cell_of(s)]);
            }
        }

        for t in 1..steps {
            let (done, rest) = scores.split_at_mut(t * states);
            let prev = &done[(t - 1) * states..];
            let cur = &mut rest[..states];
            let back_row = &mut back[t * states..(t + 1) * states];
            let emit = emissions.row(t);
            self.sweep(prev, emit, cur, back_row);
        }

        #[cfg(feature = "tracing")]
        {
            if let Some(last) = steps.checked_sub(1) {
                let row = &scores[last * states..];
                let best = row.iter().copied().fold(IMPOSSIBLE, f64::max);
                tracing::debug!(best, "viterbi forward sweep complete");
            }
        }

        DpTables {
            steps,
            states,
            scores,
            back,
        }
    }

    /// Phase I + II: decode and project states onto cells.
    pub fn run(&self, emissions: &EmissionTable) -> Decoded
    where
        M: Sync,
    {
        let tables = self.forward(emissions);

        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("viterbi_backtrack", steps = tables.steps());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        match tables.backtrack() {
            None => Decoded::empty(),
            Some((score, states)) => {
                let cells = states.iter().map(|&s| self.model.cell_of(s)).collect();
                Decoded {
                    log_prob: TotalF64(score),
                    states,
                    cells,
                }
            }
        }
    }

    /// One time step: relax every destination over its incoming edges.
    #[cfg(not(feature = "parallel"))]
    fn sweep(&self, prev: &[f64], emit: &[f64], cur: &mut [f64], back_row: &mut [usize]) {
        for (dest, (score, arg)) in cur.iter_mut().zip(back_row.iter_mut()).enumerate() {
            (*score, *arg) = self.relax(prev, emit, dest);
        }
    }

    #[cfg(feature = "parallel")]
    fn sweep(&self, prev: &[f64], emit: &[f64], cur: &mut [f64], back_row: &mut [usize])
    where
        M: Sync,
    {
        cur.par_iter_mut()
            .zip(back_row.par_iter_mut())
            .enumerate()
            .for_each(|(dest, (score, arg))| {
                (*score, *arg) = self.relax(prev, emit, dest);
            });
    }

    #[inline]
    fn relax(&self, prev: &[f64], emit: &[f64], dest: usize) -> (f64, usize) {
        let (sources, log_probs) = self.model.transitions().incoming(dest);
        let mut best = IMPOSSIBLE;
        let mut arg = NO_PREDECESSOR;
        for (&src, &lp) in sources.iter().zip(log_probs) {
            let from = prev[src];
            if from <= IMPOSSIBLE {
                continue;
            }
            let cand = from + lp;
            if cand > best {
                best = cand;
                arg = src;
            }
        }
        if arg == NO_PREDECESSOR {
            (IMPOSSIBLE, NO_PREDECESSOR)
        } else {
            (guard(best + emit[self.model.cell_of(dest)]), arg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emission::GaussianEmission;
    use crate::grid::{Grid, Point};
    use crate::models::{PositionModel, PositionParams, StickyParams, VelocityModel};
    use crate::transitions::{IncomingEdges, IncomingEdgesBuilder};

    #[test]
    fn empty_observations_decode_to_empty_path() {
        let grid = Grid::new(3).unwrap();
        let model = PositionModel::new(&grid, PositionParams::default()).unwrap();
        let table = EmissionTable::build(&grid, &GaussianEmission::new(0.2).unwrap(), &[]);
        let tables = ViterbiEngine::new(&model).forward(&table);
        assert!(tables.best_final().is_none());
        assert!(tables.backtrack().is_none());
        assert!(ViterbiEngine::new(&model).run(&table).is_empty());
    }

    #[test]
    fn first_row_is_prior_plus_emission() {
        let grid = Grid::new(3).unwrap();
        let model = VelocityModel::new(&grid, StickyParams::default()).unwrap();
        let em = GaussianEmission::new(0.3).unwrap();
        let obs = [Point::new(1.2, 0.8)];
        let table = EmissionTable::build(&grid, &em, &obs);
        let tables = ViterbiEngine::new(&model).forward(&table);
        for s in 0..model.num_states() {
            let expected = model.initial_log_prior(s) + table.get(0, model.cell_of(s));
            assert!((tables.score(0, s) - expected).abs() < 1e-12);
            assert_eq!(tables.backpointer(0, s), None);
        }
    }

    /// Two states; state 1 has no incoming edges at all.
    struct Stranded {
        edges: IncomingEdges,
    }

    impl LatticeModel for Stranded {
        fn num_states(&self) -> usize {
            2
        }
        fn cell_of(&self, state: usize) -> usize {
            state
        }
        fn initial_log_prior(&self, _state: usize) -> f64 {
            0.0
        }
        fn transitions(&self) -> &IncomingEdges {
            &self.edges
        }
    }

    #[test]
    fn unreachable_state_gets_guard_and_is_never_chosen() {
        let mut b = IncomingEdgesBuilder::new(2);
        b.push(0, 0, 0.0);
        b.push(1, 0, 0.0);
        let model = Stranded { edges: b.build() };
        let grid = Grid::new(2).unwrap();
        let em = GaussianEmission::new(0.5).unwrap();
        // observations sit on cell 1, which is only reachable at t = 0
        let obs = [Point::new(1.0, 0.0); 4];
        let table = EmissionTable::build(&grid, &em, &obs);
        let tables = ViterbiEngine::new(&model).forward(&table);
        for t in 1..4 {
            assert_eq!(tables.score(t, 1), IMPOSSIBLE);
            assert_eq!(tables.backpointer(t, 1), None);
            assert!(tables.score(t, 0).is_finite());
        }
        let (_, path) = tables.backtrack().unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(&path[1..], &[0, 0, 0]);
        assert_eq!(path[0], 1);
    }

    #[test]
    fn guard_clamps_negative_infinity_and_nan() {
        assert_eq!(guard(f64::NEG_INFINITY), IMPOSSIBLE);
        assert_eq!(guard(f64::NAN), IMPOSSIBLE);
        assert_eq!(guard(-3.5), -3.5);
    }
}
