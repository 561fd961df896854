use std::collections::BTreeMap;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Flat OpenStreetMap-style key/value tags.
///
/// A sorted map keeps serialised output stable between runs.
pub type Tags = BTreeMap<String, String>;

/// A place the driver may walk to for a destination.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
/// Candidates are produced per destination lookup and never persisted.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use doorstep_core::EntranceCandidate;
///
/// let entrance = EntranceCandidate::new(
///     42,
///     Coord { x: 24.94, y: 60.17 },
///     [("entrance".into(), "main".into())].into(),
/// );
/// assert!(!entrance.is_fallback());
///
/// let fallback = EntranceCandidate::fallback(Coord { x: 24.94, y: 60.17 });
/// assert_eq!(fallback.id, EntranceCandidate::FALLBACK_ID);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntranceCandidate {
    /// OpenStreetMap node id, or [`EntranceCandidate::FALLBACK_ID`].
    pub id: i64,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Tags copied from the source node (e.g. `entrance`, `ref`, `addr:unit`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Tags,
}

impl EntranceCandidate {
    /// Sentinel id marking the raw destination used when no entrance exists.
    pub const FALLBACK_ID: i64 = -1;

    /// Construct a candidate for a real entrance node.
    pub fn new(id: i64, location: Coord<f64>, tags: Tags) -> Self {
        Self { id, location, tags }
    }

    /// Construct the synthetic candidate standing in for the raw destination.
    pub fn fallback(destination: Coord<f64>) -> Self {
        Self::new(Self::FALLBACK_ID, destination, Tags::new())
    }

    /// Whether this candidate is the raw-destination stand-in.
    pub fn is_fallback(&self) -> bool {
        self.id == Self::FALLBACK_ID
    }
}
