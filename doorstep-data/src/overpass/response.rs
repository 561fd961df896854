//! Overpass JSON output and entrance filtering.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Output_Formats#JSON>

use doorstep_core::{EntranceCandidate, Tags};
use geo::Coord;
use serde::Deserialize;

/// Top-level Overpass JSON document.
#[derive(Debug, Default, Deserialize)]
pub struct OverpassResponse {
    /// Matched elements in server order.
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
    /// Server remark, set when the query ran out of time or memory.
    pub remark: Option<String>,
}

/// One node, way or relation from the response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OverpassElement {
    /// Element kind: `"node"`, `"way"` or `"relation"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// OpenStreetMap id.
    pub id: i64,
    /// Latitude; nodes only.
    pub lat: Option<f64>,
    /// Longitude; nodes only.
    pub lon: Option<f64>,
    /// Element tags.
    pub tags: Option<Tags>,
}

impl OverpassElement {
    fn into_entrance(self) -> Option<EntranceCandidate> {
        if self.kind != "node" {
            return None;
        }
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return None;
        };
        let tags = self.tags.filter(|tags| tags.contains_key("entrance"))?;
        Some(EntranceCandidate::new(self.id, Coord { x: lon, y: lat }, tags))
    }
}

/// Keep the elements that are entrance nodes with a position, in order.
pub fn filter_entrances(response: OverpassResponse) -> Vec<EntranceCandidate> {
    response
        .elements
        .into_iter()
        .filter_map(OverpassElement::into_entrance)
        .collect()
}
