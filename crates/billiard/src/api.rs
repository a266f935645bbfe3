//! Curated entry points for callers that only need the pipeline.
//!
//! - `build_channel` → `reconstruct_lifted_trajectory` → `interpolate`
//!   for a single particle.
//! - `build_cloud` for a whole ensemble.

pub use crate::channel::{build_channel, PolygonalChannel, Tolerances};
pub use crate::cloud::{build_cloud, build_cloud_with, Cloud, NO_REGION};
pub use crate::error::ReconError;
pub use crate::interp::{get_interpolated_trajectory, interpolate, InterpCfg, Interpolated};
pub use crate::itinerary::{EdgeId, Itinerary};
pub use crate::trajectory::{
    reconstruct_lifted_trajectory, reconstruct_trajectory, Ensemble, TrajectoryView,
};
pub use crate::unfold::{intersect_ray_with_edge, map_point_to_cell, reflect_about_edge};
