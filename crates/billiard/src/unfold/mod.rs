//! Unfolding: straighten a bouncing path by reflecting the cell instead of the ray.
//!
//! Purpose
//! - `reflect_about_edge`: mirror a (possibly already reflected) cell across
//!   the line through one of its edges.
//! - `intersect_ray_with_edge`: meet the straight ray `y = h + x tan(theta)`
//!   with the line through an edge of the unfolded cell.
//! - `map_point_to_cell`: carry a point on an unfolded edge back to the
//!   canonical cell through its arc-length position.
//!
//! Reflections compose: each step mirrors the previous step's polygon, never
//! the canonical cell. Edge labels survive reflection even though the winding
//! order alternates, which is what makes the arc-length mapping valid.

mod intersect;
mod reflect;

pub use intersect::{intersect_ray_with_edge, map_point_to_cell};
pub use reflect::reflect_about_edge;

#[cfg(test)]
mod tests;
