//! Extract drawable geometry and obstacles from a [`Path`].

use geo::Coord;

use crate::path::Path;
use crate::tags::term;
use crate::Tags;

/// A path node the driver has to get past, such as a gate or bollard.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Position of the obstructing node.
    pub location: Coord<f64>,
    /// Normalised tags of the node.
    pub tags: Tags,
}

/// Line coordinates and obstacles of a path, in step order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathGeometry {
    /// Start and stop coordinate of every step; consecutive duplicates are kept.
    pub coordinates: Vec<Coord<f64>>,
    /// Stops carrying a barrier tag.
    pub obstacles: Vec<Obstacle>,
}

/// Walk the first leg of `path`, collecting coordinates and obstacles.
///
/// Each step contributes its start and stop coordinate. A step whose stop
/// location defines the ontology's `barrier` property also contributes an
/// obstacle at the stop coordinate. A path without legs yields empty lists.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use doorstep_core::{extract_geometry, Location, Path, Step};
///
/// let path = Path::from_steps(vec![Step {
///     start: Location::at(Coord { x: 0.0, y: 0.0 }),
///     stop: Location::at(Coord { x: 1.0, y: 1.0 }),
///     distance_m: 157_000.0,
/// }]);
///
/// let geometry = extract_geometry(&path);
/// assert_eq!(geometry.coordinates.len(), 2);
/// assert!(geometry.obstacles.is_empty());
/// ```
pub fn extract_geometry(path: &Path) -> PathGeometry {
    let barrier = term("barrier");
    let mut geometry = PathGeometry::default();

    for step in path.first_leg().map(|leg| leg.steps.as_slice()).unwrap_or_default() {
        geometry.coordinates.push(step.start.coord());
        geometry.coordinates.push(step.stop.coord());
        if step.stop.defined_tags.contains_key(&barrier) {
            geometry.obstacles.push(Obstacle {
                location: step.stop.coord(),
                tags: step.stop.tags(),
            });
        }
    }

    geometry
}
