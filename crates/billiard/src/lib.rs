//! Lifted billiard trajectories in a periodic polygonal channel.
//!
//! Purpose
//! - Rebuild explicit particle paths from scattering-map data (height, angle,
//!   dwell length, symbolic itinerary) by unfolding the elementary cell.
//! - Resample the paths at a fixed arc-length step so whole ensembles can be
//!   animated frame by frame.
//!
//! Layout
//! - `channel`: the elementary cell and its arc-length parametrisation.
//! - `unfold`: reflections, ray/edge intersection, arc mapping.
//! - `itinerary`: typed parse of symbolic itineraries.
//! - `trajectory`: per-segment and lifted reconstruction, ensembles.
//! - `interp`: fixed-step resampling with crossing detection.
//! - `cloud`: per-particle parallel driver producing frame-major arrays.
//!
//! The crate performs no I/O and keeps no global state; loaders and exporters
//! live in the `cli` crate.

pub mod api;
pub mod channel;
pub mod cloud;
pub mod error;
pub mod interp;
pub mod itinerary;
pub mod trajectory;
pub mod unfold;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use channel::{build_channel, CellPolygon, PolygonalChannel, Tolerances};
pub use error::ReconError;
/// Planar point or direction.
pub type Vec2 = nalgebra::Vector2<f64>;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::channel::{build_channel, CellPolygon, PolygonalChannel, Tolerances};
    pub use crate::cloud::{build_cloud, build_cloud_with, Cloud};
    pub use crate::error::ReconError;
    pub use crate::interp::{get_interpolated_trajectory, interpolate, InterpCfg, Interpolated};
    pub use crate::itinerary::{EdgeId, Itinerary};
    pub use crate::trajectory::{
        reconstruct_lifted_trajectory, reconstruct_trajectory, Ensemble, TrajectoryView,
    };
    pub use crate::Vec2;
}
