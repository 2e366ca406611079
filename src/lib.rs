//! Grid HMM map-matching
//!
//! This crate simulates a car driving on a Manhattan grid, observes it
//! through isotropic Gaussian noise, and recovers the most likely sequence
//! of intersections with Viterbi decoding.
//!
//! ## Core idea
//! 1. Build the lattice ([`grid::Grid`]) and, optionally, a synthetic
//!    trajectory ([`simulate::simulate`]).
//! 2. Pick a motion model implementing [`LatticeModel`]: position-only
//!    (states are cells) or position+velocity (states are `(cell, heading)`
//!    pairs with a sticky-motion prior).
//! 3. Let [`ViterbiEngine`] sweep the incoming-edge lattice in log space and
//!    backtrack the optimal path.
//!
//! The velocity-aware model has five times as many states, but because
//! transitions are stored per destination, each step still costs time linear
//! in the number of cells.
//!
//! ## Quick start
//! ```
//! use grid_hmm::{simulate, MatcherBuilder, SimConfig};
//!
//! let config = SimConfig::default().with_grid_size(8).with_total_steps(60);
//! let trajectory = simulate(&config).unwrap();
//! let matcher = MatcherBuilder::new(8)
//!     .noise_sigma(config.noise_sigma)
//!     .build()
//!     .unwrap();
//! let result = matcher.decode_both(&trajectory.observations);
//! assert_eq!(result.position_only.len(), 60);
//! assert_eq!(result.position_velocity.len(), 60);
//! ```
//!
//! ## Cargo features
//! - `tracing` (default): spans around simulation and each decode phase.
//! - `parallel`: rayon-parallel emission tables and per-step DP sweeps.
//! - `serde`: `Serialize`/`Deserialize` on configuration and result types.

pub mod builder;
pub mod direction;
pub mod emission;
pub mod engine;
pub mod error;
pub mod grid;
pub mod matcher;
pub mod metrics;
pub mod models;
pub mod rng;
pub mod simulate;
pub mod traits;
pub mod transitions;
pub mod utils;

pub use crate::builder::MatcherBuilder;
pub use crate::engine::{Decoded, ViterbiEngine};
pub use crate::error::{Error, Result};
pub use crate::matcher::{decode_position_only, decode_position_velocity, MapMatcher, MatchResult};
pub use crate::simulate::{simulate, SimConfig, Trajectory};
pub use crate::traits::LatticeModel;
