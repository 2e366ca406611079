use crate::emission::GaussianEmission;
use crate::error::Result;
use crate::grid::Grid;
use crate::matcher::MapMatcher;
use crate::models::{PositionModel, PositionParams, StickyParams, VelocityModel};

/// Default observation noise assumed by the decoders.
pub const DEFAULT_NOISE_SIGMA: f64 = 0.18;

pub struct MatcherBuilder {
    grid_size: usize,
    noise_sigma: f64,
    position: PositionParams,
    sticky: StickyParams,
}

impl MatcherBuilder {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            noise_sigma: DEFAULT_NOISE_SIGMA,
            position: PositionParams::default(),
            sticky: StickyParams::default(),
        }
    }
    pub fn noise_sigma(mut self, sigma: f64) -> Self {
        self.noise_sigma = sigma;
        self
    }
    pub fn stay_prob(mut self, stay_prob: f64) -> Self {
        self.position.stay_prob = stay_prob;
        self
    }
    pub fn position_params(mut self, params: PositionParams) -> Self {
        self.position = params;
        self
    }
    pub fn sticky_motion(mut self, params: StickyParams) -> Self {
        self.sticky = params;
        self
    }
    /// Validate every parameter and precompute both transition tables.
    pub fn build(self) -> Result<MapMatcher> {
        let grid = Grid::new(self.grid_size)?;
        let emission = GaussianEmission::new(self.noise_sigma)?;
        let position = PositionModel::new(&grid, self.position)?;
        let velocity = VelocityModel::new(&grid, self.sticky)?;
        Ok(MapMatcher::from_parts(grid, emission, position, velocity))
    }
}
