//! Error type shared by every reconstruction entry point.

/// Reasons a reconstruction call can fail.
///
/// All computations are deterministic, so none of these are transient: they
/// signal bad channel parameters or corrupted upstream data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconError {
    /// Channel parameters do not describe a valid cell.
    #[error("invalid channel geometry: {0}")]
    InvalidGeometry(String),

    /// The ray is parallel to the target edge, so no intersection exists.
    #[error("ray (h = {h}, theta = {theta}) is parallel to edge {edge}")]
    DegenerateRay { h: f64, theta: f64, edge: usize },

    /// Itinerary string too short or containing an edge index outside `0..6`.
    #[error("malformed itinerary {itinerary:?}: {reason}")]
    MalformedItinerary { itinerary: String, reason: String },

    /// Field arrays with mismatched shapes or lengths.
    #[error("inconsistent ensemble: {0}")]
    InconsistentEnsemble(String),

    /// Interpolation step must be finite and positive.
    #[error("interpolation step must be finite and > 0, got {0}")]
    InvalidStep(f64),

    /// A per-particle failure inside an ensemble computation.
    #[error("particle {index}: {error}")]
    Particle {
        index: usize,
        error: Box<ReconError>,
    },
}

impl ReconError {
    pub(crate) fn in_particle(self, index: usize) -> Self {
        ReconError::Particle {
            index,
            error: Box::new(self),
        }
    }
}
