//! Map-matching front end.
//!
//! A [`MapMatcher`] is built once per grid and noise level (see
//! [`MatcherBuilder`](crate::builder::MatcherBuilder)) and owns everything
//! the decoders share: the lattice, the emission model and both
//! precomputed transition tables. It is immutable, so one instance can serve
//! any number of decode calls, including from several threads.

use crate::builder::MatcherBuilder;
use crate::emission::{EmissionTable, GaussianEmission};
use crate::engine::{Decoded, ViterbiEngine};
use crate::error::Result;
use crate::grid::{Grid, Point};
use crate::models::{PositionModel, PositionParams, VelocityModel};

/// Both decoders' outputs for one observation sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    pub position_only: Decoded,
    pub position_velocity: Decoded,
}

/// Registry of the grid, emission model and motion models.
#[derive(Clone, Debug)]
pub struct MapMatcher {
    grid: Grid,
    emission: GaussianEmission,
    position: PositionModel,
    velocity: VelocityModel,
}

impl MapMatcher {
    pub(crate) fn from_parts(
        grid: Grid,
        emission: GaussianEmission,
        position: PositionModel,
        velocity: VelocityModel,
    ) -> Self {
        Self {
            grid,
            emission,
            position,
            velocity,
        }
    }

    /// Matcher with default motion parameters.
    pub fn new(grid_size: usize, noise_sigma: f64) -> Result<Self> {
        MatcherBuilder::new(grid_size).noise_sigma(noise_sigma).build()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn emission(&self) -> &GaussianEmission {
        &self.emission
    }

    pub fn position_model(&self) -> &PositionModel {
        &self.position
    }

    pub fn velocity_model(&self) -> &VelocityModel {
        &self.velocity
    }

    /// Per-cell emission scores of `observations`, shareable across decoders.
    pub fn emissions(&self, observations: &[Point]) -> EmissionTable {
        EmissionTable::build(&self.grid, &self.emission, observations)
    }

    /// Most likely cell sequence under the position-only model.
    pub fn decode_position_only(&self, observations: &[Point]) -> Decoded {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("decode_position_only", steps = observations.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        ViterbiEngine::new(&self.position).run(&self.emissions(observations))
    }

    /// Most likely cell sequence under the sticky position+velocity model.
    pub fn decode_position_velocity(&self, observations: &[Point]) -> Decoded {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("decode_position_velocity", steps = observations.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        ViterbiEngine::new(&self.velocity).run(&self.emissions(observations))
    }

    /// Run both decoders over a single emission table.
    pub fn decode_both(&self, observations: &[Point]) -> MatchResult {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("decode_both", steps = observations.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let emissions = self.emissions(observations);
        MatchResult {
            position_only: ViterbiEngine::new(&self.position).run(&emissions),
            position_velocity: ViterbiEngine::new(&self.velocity).run(&emissions),
        }
    }
}

/// Decode `observations` with the position-only model and default parameters.
///
/// ```
/// use grid_hmm::grid::Point;
///
/// let obs = [Point::new(0.0, 0.0), Point::new(0.98, 0.02)];
/// let cells = grid_hmm::decode_position_only(&obs, 3, 0.05).unwrap();
/// assert_eq!(cells, vec![0, 1]);
/// ```
pub fn decode_position_only(
    observations: &[Point],
    grid_size: usize,
    noise_sigma: f64,
) -> Result<Vec<usize>> {
    let grid = Grid::new(grid_size)?;
    let emission = GaussianEmission::new(noise_sigma)?;
    let model = PositionModel::new(&grid, PositionParams::default())?;
    let emissions = EmissionTable::build(&grid, &emission, observations);
    Ok(ViterbiEngine::new(&model).run(&emissions).cells)
}

/// Decode `observations` with the position+velocity model and default parameters.
pub fn decode_position_velocity(
    observations: &[Point],
    grid_size: usize,
    noise_sigma: f64,
) -> Result<Vec<usize>> {
    let matcher = MapMatcher::new(grid_size, noise_sigma)?;
    Ok(matcher.decode_position_velocity(observations).cells)
}
