//! Synthetic ground truth: a car driving on the grid, then parking.
//!
//! The car starts at cell `(1, 1)` heading East. Each moving step it may
//! wait, keep going, or turn; at the end it parks in a garage diagonally off
//! the road while its ground-truth cell stays at the last intersection.
//! Observations are the true continuous positions plus isotropic Gaussian
//! noise.

use crate::direction::Direction;
use crate::error::{check_probability, check_sigma, Error, Result};
use crate::grid::{offset_within, Grid, Point};
use crate::rng::{standard_normal, unit, Lcg};
use rand::RngCore;

/// Offset of the garage from the last on-road cell center.
pub const GARAGE_OFFSET: Point = Point::new(0.45, 0.45);

/// Parameters of one simulation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Grid side length `N`.
    pub grid_size: usize,
    /// Number of recorded steps (moving plus parked).
    pub total_steps: usize,
    /// Standard deviation of the observation noise on each axis.
    pub noise_sigma: f64,
    /// Seed of the [`Lcg`] used by [`simulate`].
    pub seed: u32,
    /// Per-step probability of stopping at the current intersection.
    pub wait_probability: f64,
    /// Per-step probability of turning while moving.
    pub turn_probability: f64,
    /// Trailing steps spent parked off-road.
    pub park_steps: usize,
    /// Accept `park_steps > total_steps`; the run is then entirely parked.
    pub allow_overlong_park: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 12,
            total_steps: 220,
            noise_sigma: 0.18,
            seed: 12345,
            wait_probability: 0.2,
            turn_probability: 0.25,
            park_steps: 10,
            allow_overlong_park: false,
        }
    }
}

impl SimConfig {
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }
    pub fn with_total_steps(mut self, total_steps: usize) -> Self {
        self.total_steps = total_steps;
        self
    }
    pub fn with_noise_sigma(mut self, noise_sigma: f64) -> Self {
        self.noise_sigma = noise_sigma;
        self
    }
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }
    pub fn with_wait_probability(mut self, p: f64) -> Self {
        self.wait_probability = p;
        self
    }
    pub fn with_turn_probability(mut self, p: f64) -> Self {
        self.turn_probability = p;
        self
    }
    pub fn with_park_steps(mut self, park_steps: usize) -> Self {
        self.park_steps = park_steps;
        self
    }
    pub fn with_overlong_park(mut self, allow: bool) -> Self {
        self.allow_overlong_park = allow;
        self
    }

    /// Reject invalid fields before any random draw happens.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(Error::InvalidGridSize {
                size: self.grid_size,
            });
        }
        if self.total_steps == 0 {
            return Err(Error::InvalidStepCount);
        }
        check_sigma(self.noise_sigma)?;
        check_probability("wait probability", self.wait_probability, 0.0, 1.0)?;
        check_probability("turn probability", self.turn_probability, 0.0, 1.0)?;
        if self.park_steps > self.total_steps && !self.allow_overlong_park {
            return Err(Error::ParkExceedsSteps {
                park: self.park_steps,
                total: self.total_steps,
            });
        }
        Ok(())
    }

    /// Steps spent driving before the parked phase.
    #[inline]
    pub fn moving_steps(&self) -> usize {
        self.total_steps.saturating_sub(self.park_steps)
    }
}

/// Ground truth and observations of one run. Immutable once produced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory {
    pub grid_size: usize,
    /// Ground-truth cell per step.
    pub true_cells: Vec<usize>,
    /// Ground-truth continuous position per step.
    pub true_positions: Vec<Point>,
    /// Noisy observation per step.
    pub observations: Vec<Point>,
}

impl Trajectory {
    #[inline]
    pub fn len(&self) -> usize {
        self.true_cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.true_cells.is_empty()
    }
}

/// Simulate with the seeded [`Lcg`] from `config.seed`.
///
/// ```
/// use grid_hmm::simulate::{simulate, SimConfig};
///
/// let config = SimConfig::default().with_total_steps(40).with_park_steps(5);
/// let a = simulate(&config).unwrap();
/// let b = simulate(&config).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 40);
/// ```
pub fn simulate(config: &SimConfig) -> Result<Trajectory> {
    let mut rng = Lcg::new(config.seed);
    simulate_with_rng(config, &mut rng)
}

/// Simulate drawing every uniform from `rng`. `config.seed` is ignored.
pub fn simulate_with_rng<R: RngCore + ?Sized>(config: &SimConfig, rng: &mut R) -> Result<Trajectory> {
    config.validate()?;
    let grid = Grid::new(config.grid_size)?;

    #[cfg(feature = "tracing")]
    let span = tracing::info_span!(
        "simulate",
        grid = config.grid_size,
        steps = config.total_steps,
        park = config.park_steps
    );
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    let mut car = Car::new(&grid);
    let len = config.moving_steps() + config.park_steps;
    let mut true_cells = Vec::with_capacity(len);
    let mut true_positions = Vec::with_capacity(len);

    for _ in 0..config.moving_steps() {
        car.advance(rng, config.wait_probability, config.turn_probability);
        true_cells.push(car.cell());
        true_positions.push(car.position());
    }

    let parked = car.position();
    let garage = Point::new(parked.x + GARAGE_OFFSET.x, parked.y + GARAGE_OFFSET.y);
    for _ in 0..config.park_steps {
        true_cells.push(car.cell());
        true_positions.push(garage);
    }

    let observations = true_positions
        .iter()
        .map(|p| {
            let x = p.x + standard_normal(rng) * config.noise_sigma;
            let y = p.y + standard_normal(rng) * config.noise_sigma;
            Point::new(x, y)
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        steps = true_cells.len(),
        last_cell = true_cells.last().copied(),
        "trajectory simulated"
    );

    Ok(Trajectory {
        grid_size: config.grid_size,
        true_cells,
        true_positions,
        observations,
    })
}

/// Moving particle state: lattice position and current heading.
struct Car<'g> {
    grid: &'g Grid,
    i: usize,
    j: usize,
    heading: Direction,
}

impl<'g> Car<'g> {
    fn new(grid: &'g Grid) -> Self {
        // (1, 1), pulled inside on a 1x1 grid
        let start = 1usize.min(grid.size() - 1);
        Self {
            grid,
            i: start,
            j: start,
            heading: Direction::East,
        }
    }

    fn cell(&self) -> usize {
        self.grid.id(self.i, self.j)
    }

    fn position(&self) -> Point {
        Point::new(self.i as f64, self.j as f64)
    }

    /// One moving step.
    ///
    /// Draw order matters for reproducibility: the wait draw always happens,
    /// the turn draw only while heading somewhere, and a straight move is
    /// attempted only when that turn draw fails.
    fn advance<R: RngCore + ?Sized>(&mut self, rng: &mut R, wait_p: f64, turn_p: f64) {
        if unit(rng) < wait_p {
            self.heading = Direction::Stay;
            return;
        }
        if self.heading.is_stay() || unit(rng) < turn_p || !self.move_forward() {
            self.choose_turn(rng);
            self.move_forward();
        }
    }

    /// Move one cell along the heading; `false` for `Stay` or off-grid moves.
    fn move_forward(&mut self) -> bool {
        if self.heading.is_stay() {
            return false;
        }
        match offset_within(self.grid.size(), self.i, self.j, self.heading) {
            Some((ni, nj)) => {
                self.i = ni;
                self.j = nj;
                true
            }
            None => false,
        }
    }

    /// Pick uniformly among feasible moves plus `Stay`, minus the current heading.
    ///
    /// `Stay` is always offered, so a requested turn may end up stopping.
    fn choose_turn<R: RngCore + ?Sized>(&mut self, rng: &mut R) {
        let options: Vec<Direction> = Direction::MOVES
            .iter()
            .copied()
            .filter(|&d| offset_within(self.grid.size(), self.i, self.j, d).is_some())
            .chain(std::iter::once(Direction::Stay))
            .filter(|&d| d != self.heading)
            .collect();
        let pick = (unit(rng) * options.len() as f64).floor() as usize;
        self.heading = options.get(pick).copied().unwrap_or(Direction::Stay);
    }
}
