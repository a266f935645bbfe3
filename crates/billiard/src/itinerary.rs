//! Symbolic itineraries.
//!
//! An itinerary string such as `"L03L"` lists the cell edges a particle is
//! reflected across during one segment. The first and last characters are
//! region markers (entry/exit side); every interior character is one edge digit.

use std::fmt;
use std::str::FromStr;

use crate::channel::EDGE_COUNT;
use crate::error::ReconError;

/// Validated edge index in `0..6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u8);

impl EdgeId {
    /// `None` when `i >= 6`.
    #[inline]
    pub fn new(i: usize) -> Option<Self> {
        (i < EDGE_COUNT).then(|| Self(i as u8))
    }

    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// All six edges in order.
    pub fn all() -> impl Iterator<Item = EdgeId> {
        (0..EDGE_COUNT as u8).map(EdgeId)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parsed itinerary: entry marker, edge sequence, exit marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Itinerary {
    pub entry: char,
    pub exit: char,
    pub edges: Vec<EdgeId>,
}

impl Itinerary {
    /// Parse a marker-delimited itinerary string, failing on the first bad character.
    pub fn parse(s: &str) -> Result<Self, ReconError> {
        let malformed = |reason: String| ReconError::MalformedItinerary {
            itinerary: s.to_owned(),
            reason,
        };
        let chars: Vec<char> = s.chars().collect();
        if chars.len() < 2 {
            return Err(malformed(format!(
                "needs two region markers, got {} character(s)",
                chars.len()
            )));
        }
        let interior = &chars[1..chars.len() - 1];
        let edges = interior
            .iter()
            .map(|&c| {
                c.to_digit(10)
                    .and_then(|d| EdgeId::new(d as usize))
                    .ok_or_else(|| malformed(format!("'{c}' is not an edge index in 0..{EDGE_COUNT}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            entry: chars[0],
            exit: chars[chars.len() - 1],
            edges,
        })
    }

    /// Number of interior collisions.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl FromStr for Itinerary {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entry)?;
        for e in &self.edges {
            write!(f, "{e}")?;
        }
        write!(f, "{}", self.exit)
    }
}
