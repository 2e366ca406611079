//! Motion models for grid map-matching.
//!
//! Both implement [`LatticeModel`](crate::traits::LatticeModel) and can be
//! decoded by the same engine:
//! - [`position`] : states are cells; stay or move to a uniform neighbor.
//! - [`velocity`] : states are (cell, heading) pairs with sticky motion.

pub mod position;
pub mod velocity;

pub use position::{PositionModel, PositionParams};
pub use velocity::{StickyParams, VelocityModel};
