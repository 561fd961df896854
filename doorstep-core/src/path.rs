//! Paths returned by a [`RoutingEngine`](crate::RoutingEngine).

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tags::{DefinedTags, triples_to_tags};
use crate::Tags;

/// A routing-graph node visited by a path.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// Source identifier, e.g. `http://www.openstreetmap.org/node/1`.
    ///
    /// `None` for synthetic points such as a raw origin.
    pub id: Option<String>,
    /// WGS84 longitude.
    pub longitude: f64,
    /// WGS84 latitude.
    pub latitude: f64,
    /// Namespaced ontology properties.
    #[cfg_attr(feature = "serde", serde(default))]
    pub defined_tags: DefinedTags,
    /// Raw `key=value` tags the ontology does not model.
    #[cfg_attr(feature = "serde", serde(default))]
    pub freeform_tags: Vec<String>,
}

impl Location {
    /// A location without identifier or tags.
    pub fn at(coord: Coord<f64>) -> Self {
        Self {
            id: None,
            longitude: coord.x,
            latitude: coord.y,
            ..Self::default()
        }
    }

    /// Position as a `geo` coordinate.
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Flat OpenStreetMap tags for this location.
    pub fn tags(&self) -> Tags {
        let subject = self.id.as_deref().unwrap_or_default();
        triples_to_tags(subject, Some(&self.defined_tags), Some(&self.freeform_tags))
    }
}

/// One graph edge traversal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    /// Node where the step begins.
    pub start: Location,
    /// Node where the step ends.
    pub stop: Location,
    /// Great-circle length in metres.
    pub distance_m: f64,
}

/// A continuous run of steps between two waypoints.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Leg {
    /// Ordered steps.
    pub steps: Vec<Step>,
}

impl Leg {
    /// Total length of the leg in metres.
    pub fn distance_m(&self) -> f64 {
        self.steps.iter().map(|step| step.distance_m).sum()
    }
}

/// A route from an origin to one entrance candidate.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    /// Legs in travel order. Single-destination queries produce one leg.
    pub legs: Vec<Leg>,
}

impl Path {
    /// Wrap a list of steps in a single-leg path.
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self {
            legs: vec![Leg { steps }],
        }
    }

    /// The first leg, if any.
    pub fn first_leg(&self) -> Option<&Leg> {
        self.legs.first()
    }

    /// Total length of the path in metres.
    pub fn distance_m(&self) -> f64 {
        self.legs.iter().map(Leg::distance_m).sum()
    }
}
