//! Trajectory reconstruction from scattering-map data.
//!
//! - `reconstruct_trajectory`: collision points on the elementary cell for one
//!   itinerary, by folding reflections over the edge sequence.
//! - `reconstruct_lifted_trajectory`: the period-unwrapped path of one particle,
//!   stitching segment reconstructions between recorded `(position, height)` points.
//! - `Ensemble` / `TrajectoryView`: struct-of-arrays batch and its borrowed rows.

mod ensemble;
mod reconstruct;

pub use ensemble::{Ensemble, TrajectoryView};
pub use reconstruct::{
    fold_angle, lifted_len, reconstruct_lifted_trajectory, reconstruct_lifted_trajectory_with,
    reconstruct_trajectory, reconstruct_trajectory_with,
};
