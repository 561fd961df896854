//! Assemble a route into a GeoJSON feature collection for map display.
//!
//! The collection always holds four features in a fixed order so map layers
//! can address them by index:
//!
//! | index | role          | geometry     | colour  |
//! |-------|---------------|--------------|---------|
//! | 0     | `obstacles`   | `MultiPoint` | `red`   |
//! | 1     | `path`        | `LineString` | `black` |
//! | 2     | `origin`      | `Point`      | `blue`  |
//! | 3     | `destination` | `Point`      | `green` |

use geo::Coord;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::geometry::PathGeometry;

/// Colour of the obstacle markers.
pub const OBSTACLE_COLOR: &str = "red";
/// Colour of the route line.
pub const PATH_COLOR: &str = "black";
/// Colour of the origin marker.
pub const ORIGIN_COLOR: &str = "blue";
/// Colour of the destination marker.
pub const DESTINATION_COLOR: &str = "green";

/// Build the four-feature collection for one resolved route.
///
/// Coordinates are not validated. Empty geometry still produces all four
/// features, with empty `MultiPoint` and `LineString` coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use doorstep_core::{geometry_to_geojson, PathGeometry};
///
/// let collection = geometry_to_geojson(
///     Coord { x: 24.93, y: 60.16 },
///     Coord { x: 24.94, y: 60.17 },
///     &PathGeometry::default(),
/// );
/// assert_eq!(collection.features.len(), 4);
/// ```
pub fn geometry_to_geojson(
    origin: Coord<f64>,
    destination: Coord<f64>,
    geometry: &PathGeometry,
) -> FeatureCollection {
    let obstacle_points = geometry
        .obstacles
        .iter()
        .map(|obstacle| position(obstacle.location))
        .collect();
    let barriers: Vec<JsonValue> = geometry
        .obstacles
        .iter()
        .map(|obstacle| {
            JsonValue::Object(
                obstacle
                    .tags
                    .iter()
                    .map(|(key, value)| (key.clone(), JsonValue::String(value.clone())))
                    .collect(),
            )
        })
        .collect();

    let mut obstacles = feature(Value::MultiPoint(obstacle_points), "obstacles", OBSTACLE_COLOR);
    if let Some(properties) = obstacles.properties.as_mut() {
        properties.insert("barriers".to_owned(), JsonValue::Array(barriers));
    }

    let line = geometry.coordinates.iter().copied().map(position).collect();

    FeatureCollection {
        bbox: None,
        features: vec![
            obstacles,
            feature(Value::LineString(line), "path", PATH_COLOR),
            feature(Value::Point(position(origin)), "origin", ORIGIN_COLOR),
            feature(
                Value::Point(position(destination)),
                "destination",
                DESTINATION_COLOR,
            ),
        ],
        foreign_members: None,
    }
}

fn position(coord: Coord<f64>) -> Vec<f64> {
    vec![coord.x, coord.y]
}

fn feature(value: Value, role: &str, color: &str) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("role".to_owned(), JsonValue::from(role));
    properties.insert("color".to_owned(), JsonValue::from(color));
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
