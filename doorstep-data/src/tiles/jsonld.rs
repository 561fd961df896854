//! Decoding of routable-tile JSON-LD documents.
//!
//! A tile lists `osm:Node` and `osm:Way` entries under `@graph`. Compact
//! `osm:` names are expanded to the full ontology namespace so the tags feed
//! straight into [`doorstep_core::tags::triples_to_tags`].

use doorstep_core::RoutingError;
use doorstep_core::tags::{DefinedTags, OSM_TERMS, term};
use geo::Coord;
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

const COMPACT_PREFIX: &str = "osm:";
const LAT: &str = "geo:lat";
const LONG: &str = "geo:long";

/// A node carried by a tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileNode {
    /// Node IRI.
    pub id: String,
    /// WGS84 position.
    pub coord: Coord<f64>,
    /// Expanded ontology properties.
    pub defined_tags: DefinedTags,
    /// `key=value` strings from `osm:hasTag`.
    pub freeform_tags: Vec<String>,
}

/// A way carried by a tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileWay {
    /// Way IRI.
    pub id: String,
    /// Node IRIs in way order.
    pub nodes: Vec<String>,
    /// Expanded ontology properties.
    pub defined_tags: DefinedTags,
}

impl TileWay {
    /// Ways with a `highway` property take part in routing.
    pub fn is_routable(&self) -> bool {
        self.defined_tags.contains_key(&term("highway"))
    }
}

/// Decoded contents of one tile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tile {
    /// Nodes in document order.
    pub nodes: Vec<TileNode>,
    /// Ways in document order.
    pub ways: Vec<TileWay>,
}

#[derive(Deserialize)]
struct TileDocument {
    #[serde(rename = "@graph", default)]
    graph: Vec<Map<String, Value>>,
}

/// Expand a compact `osm:` name to its full IRI; other names pass through.
pub fn expand(name: &str) -> String {
    match name.strip_prefix(COMPACT_PREFIX) {
        Some(local) => format!("{OSM_TERMS}{local}"),
        None => name.to_owned(),
    }
}

/// Decode a tile document.
///
/// # Errors
///
/// Returns [`RoutingError::ParseError`] when the body is not a JSON object
/// with an optional `@graph` array.
pub fn parse_tile(body: &[u8]) -> Result<Tile, RoutingError> {
    let document: TileDocument =
        serde_json::from_slice(body).map_err(|err| RoutingError::ParseError {
            message: err.to_string(),
        })?;

    let node_type = term("Node");
    let way_type = term("Way");
    let mut tile = Tile::default();
    for entry in document.graph {
        let Some(id) = entry.get("@id").and_then(Value::as_str) else {
            continue;
        };
        let kind = entry.get("@type").and_then(Value::as_str).map(expand);
        match kind {
            Some(kind) if kind == node_type => match node_from(id, &entry) {
                Some(node) => tile.nodes.push(node),
                None => debug!("skipping node {id} without a position"),
            },
            Some(kind) if kind == way_type => tile.ways.push(way_from(id, &entry)),
            _ => {}
        }
    }
    Ok(tile)
}

fn node_from(id: &str, entry: &Map<String, Value>) -> Option<TileNode> {
    let latitude = number(entry.get(LAT)?)?;
    let longitude = number(entry.get(LONG)?)?;
    Some(TileNode {
        id: id.to_owned(),
        coord: Coord {
            x: longitude,
            y: latitude,
        },
        defined_tags: defined_tags(entry),
        freeform_tags: strings(entry.get(&term("hasTag")).or_else(|| entry.get("osm:hasTag"))),
    })
}

fn way_from(id: &str, entry: &Map<String, Value>) -> TileWay {
    TileWay {
        id: id.to_owned(),
        nodes: strings(entry.get("osm:hasNodes").or_else(|| entry.get(&term("hasNodes")))),
        defined_tags: defined_tags(entry),
    }
}

fn defined_tags(entry: &Map<String, Value>) -> DefinedTags {
    entry
        .iter()
        .filter_map(|(key, value)| {
            let property = expand(key);
            if !property.starts_with(OSM_TERMS) {
                return None;
            }
            let value = match value {
                Value::String(text) => expand(text),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                _ => return None,
            };
            Some((property, value))
        })
        .collect()
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

fn strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        Some(Value::String(single)) => vec![single.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TILE: &str = r#"{
        "@context": {"osm": "https://w3id.org/openstreetmap/terms#"},
        "@id": "https://tiles.example.com/14/8361/5481/",
        "@graph": [
            {"@id": "http://www.openstreetmap.org/node/1", "@type": "osm:Node",
             "geo:lat": 51.05, "geo:long": 3.72,
             "osm:barrier": "osm:Bollard", "osm:hasTag": ["bollard=rising"]},
            {"@id": "http://www.openstreetmap.org/node/2", "@type": "osm:Node",
             "geo:lat": "51.06", "geo:long": "3.73"},
            {"@id": "http://www.openstreetmap.org/node/3", "@type": "osm:Node"},
            {"@id": "http://www.openstreetmap.org/way/10", "@type": "osm:Way",
             "osm:highway": "osm:Residential", "osm:maxspeed": 30,
             "osm:hasNodes": ["http://www.openstreetmap.org/node/1",
                              "http://www.openstreetmap.org/node/2"]},
            {"@id": "http://www.openstreetmap.org/way/11", "@type": "osm:Way",
             "osm:building": "osm:Yes", "osm:hasNodes": []}
        ]
    }"#;

    #[rstest]
    fn decodes_nodes_and_ways() {
        let tile = parse_tile(TILE.as_bytes()).expect("tile should parse");

        assert_eq!(tile.nodes.len(), 2, "node without a position is skipped");
        assert_eq!(tile.ways.len(), 2);

        let bollard = &tile.nodes[0];
        assert_eq!(bollard.coord, Coord { x: 3.72, y: 51.05 });
        assert_eq!(
            bollard.defined_tags.get(&term("barrier")),
            Some(&term("Bollard"))
        );
        assert_eq!(bollard.freeform_tags, ["bollard=rising"]);
        assert!(!bollard.defined_tags.contains_key(&term("hasTag")));
        assert_eq!(tile.nodes[1].coord, Coord { x: 3.73, y: 51.06 });
    }

    #[rstest]
    fn only_highways_are_routable() {
        let tile = parse_tile(TILE.as_bytes()).expect("tile should parse");

        assert!(tile.ways[0].is_routable());
        assert!(!tile.ways[1].is_routable());
        assert_eq!(tile.ways[0].nodes.len(), 2);
        assert_eq!(
            tile.ways[0].defined_tags.get(&term("maxspeed")).map(String::as_str),
            Some("30")
        );
    }

    #[rstest]
    #[case("osm:barrier", "https://w3id.org/openstreetmap/terms#barrier")]
    #[case("geo:lat", "geo:lat")]
    #[case("https://w3id.org/openstreetmap/terms#Way", "https://w3id.org/openstreetmap/terms#Way")]
    fn expands_compact_names(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(expand(name), expected);
    }

    #[rstest]
    fn empty_document_has_no_entries() {
        let tile = parse_tile(b"{}").expect("tile should parse");
        assert_eq!(tile, Tile::default());
    }

    #[rstest]
    fn malformed_document_is_a_parse_error() {
        let err = parse_tile(b"[1, 2").expect_err("should fail");
        assert!(matches!(err, RoutingError::ParseError { .. }));
    }
}
