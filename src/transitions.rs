//! Incoming-edge transition tables.
//!
//! Viterbi only ever asks "which states can reach `s2`, and at what cost?",
//! so transitions are stored per destination in compressed-row form:
//! `sources[offsets[s2]..offsets[s2 + 1]]` with matching `log_probs`.
//! Per-step DP work is then bounded by the in-degree of each destination
//! instead of the full state count.

/// Immutable incoming-edge table in CSR layout.
#[derive(Clone, Debug, PartialEq)]
pub struct IncomingEdges {
    offsets: Vec<usize>,
    sources: Vec<usize>,
    log_probs: Vec<f64>,
}

impl IncomingEdges {
    /// Number of destination states.
    #[inline]
    pub fn num_states(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of stored edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.sources.len()
    }

    /// Sources and log-probabilities of every edge into `dest`, in insertion order.
    #[inline]
    pub fn incoming(&self, dest: usize) -> (&[usize], &[f64]) {
        let range = self.offsets[dest]..self.offsets[dest + 1];
        (&self.sources[range.clone()], &self.log_probs[range])
    }

    /// Sum of `exp(log p)` over the edges leaving each source state.
    pub fn outgoing_mass(&self) -> Vec<f64> {
        let mut mass = vec![0.0; self.num_states()];
        for (&src, &lp) in self.sources.iter().zip(&self.log_probs) {
            mass[src] += lp.exp();
        }
        mass
    }

    /// Sum of `exp(log p)` over the edges entering each destination state.
    pub fn incoming_mass(&self) -> Vec<f64> {
        (0..self.num_states())
            .map(|dest| self.incoming(dest).1.iter().map(|lp| lp.exp()).sum())
            .collect()
    }
}

/// Accumulates edges in any order and freezes them into [`IncomingEdges`].
///
/// Edges into the same destination keep the order they were added in; the
/// engine's first-maximum tie-break depends on it.
#[derive(Clone, Debug)]
pub struct IncomingEdgesBuilder {
    per_dest: Vec<Vec<(usize, f64)>>,
}

impl IncomingEdgesBuilder {
    pub fn new(num_states: usize) -> Self {
        Self {
            per_dest: vec![Vec::new(); num_states],
        }
    }

    /// Register `src -> dest` with log-probability `log_prob`.
    #[inline]
    pub fn push(&mut self, src: usize, dest: usize, log_prob: f64) {
        debug_assert!(src < self.per_dest.len());
        self.per_dest[dest].push((src, log_prob));
    }

    pub fn build(self) -> IncomingEdges {
        let total = self.per_dest.iter().map(Vec::len).sum();
        let mut offsets = Vec::with_capacity(self.per_dest.len() + 1);
        let mut sources = Vec::with_capacity(total);
        let mut log_probs = Vec::with_capacity(total);
        offsets.push(0);
        for edges in self.per_dest {
            for (src, lp) in edges {
                sources.push(src);
                log_probs.push(lp);
            }
            offsets.push(sources.len());
        }
        IncomingEdges {
            offsets,
            sources,
            log_probs,
        }
    }
}
