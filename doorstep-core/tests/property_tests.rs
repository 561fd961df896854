//! Property-based tests for tag normalisation, geometry extraction and
//! GeoJSON assembly.
//!
//! # Invariants tested
//!
//! - **Subject:** normalised tags always carry the subject under `@id`.
//! - **Freeform precedence:** a freeform tag wins over a defined tag.
//! - **Coordinate count:** extraction yields two coordinates per step.
//! - **Obstacle count:** one obstacle per barrier stop, in step order.
//! - **Collection shape:** four features regardless of input size.

use doorstep_core::tags::{DefinedTags, term, triples_to_tags};
use doorstep_core::{Location, Path, PathGeometry, Step, extract_geometry, geometry_to_geojson};
use geo::Coord;
use proptest::prelude::*;

fn coord_strategy() -> impl Strategy<Value = Coord<f64>> {
    (-180.0_f64..180.0, -85.0_f64..85.0).prop_map(|(x, y)| Coord { x, y })
}

fn location(coord: Coord<f64>, barrier: bool) -> Location {
    let mut location = Location::at(coord);
    if barrier {
        location.defined_tags = DefinedTags::from([(term("barrier"), term("Bollard"))]);
    }
    location
}

fn steps_strategy() -> impl Strategy<Value = Vec<(Coord<f64>, Coord<f64>, bool)>> {
    prop::collection::vec((coord_strategy(), coord_strategy(), any::<bool>()), 0..16)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn subject_is_always_present(
        subject in "[a-z0-9/:.]{1,40}",
        pairs in prop::collection::btree_map("[a-z_]{1,12}", "[A-Za-z]{1,12}", 0..8),
    ) {
        let defined: DefinedTags = pairs
            .iter()
            .map(|(key, value)| (term(key), term(value)))
            .collect();
        let tags = triples_to_tags(&subject, Some(&defined), None);
        prop_assert_eq!(tags.get("@id"), Some(&subject));
    }

    #[test]
    fn freeform_tags_take_precedence(
        key in "[a-z][a-z_]{0,11}",
        defined_value in "[A-Z][a-z]{1,8}[A-Z][a-z]{1,8}",
        freeform_value in "[a-z0-9;]{1,12}",
    ) {
        let defined = DefinedTags::from([(term(&key), term(&defined_value))]);
        let freeform = vec![format!("{key}={freeform_value}")];

        let tags = triples_to_tags("s", Some(&defined), Some(&freeform));

        prop_assert_eq!(tags.get(&key), Some(&freeform_value));
    }

    #[test]
    fn normalised_ontology_values_are_lower_case(value in "[A-Z][a-z]{1,6}([A-Z][a-z]{1,6}){0,3}") {
        prop_assume!(!matches!(value.as_str(), "NoAccess" | "FreeAccess" | "OfficialAccess"));
        let defined = DefinedTags::from([(term("surface"), term(&value))]);
        let tags = triples_to_tags("s", Some(&defined), None);
        let normalised = tags.get("surface").cloned().unwrap_or_default();
        prop_assert!(normalised.chars().all(|c| c.is_lowercase() || c == '_'));
        prop_assert_eq!(normalised.replace('_', ""), value.to_lowercase());
    }

    #[test]
    fn extraction_counts_match_steps(raw_steps in steps_strategy()) {
        let steps: Vec<Step> = raw_steps
            .iter()
            .map(|&(start, stop, barrier)| Step {
                start: location(start, false),
                stop: location(stop, barrier),
                distance_m: 1.0,
            })
            .collect();
        let expected_obstacles: Vec<Coord<f64>> = raw_steps
            .iter()
            .filter(|(_, _, barrier)| *barrier)
            .map(|&(_, stop, _)| stop)
            .collect();

        let geometry = extract_geometry(&Path::from_steps(steps));

        prop_assert_eq!(geometry.coordinates.len(), raw_steps.len() * 2);
        let found: Vec<Coord<f64>> = geometry.obstacles.iter().map(|o| o.location).collect();
        prop_assert_eq!(found, expected_obstacles);
    }

    #[test]
    fn collection_always_has_four_features(
        origin in coord_strategy(),
        destination in coord_strategy(),
        raw_steps in steps_strategy(),
    ) {
        let steps = raw_steps
            .iter()
            .map(|&(start, stop, barrier)| Step {
                start: location(start, false),
                stop: location(stop, barrier),
                distance_m: 1.0,
            })
            .collect();
        let geometry = extract_geometry(&Path::from_steps(steps));

        let collection = geometry_to_geojson(origin, destination, &geometry);

        prop_assert_eq!(collection.features.len(), 4);
        let empty = geometry_to_geojson(origin, destination, &PathGeometry::default());
        prop_assert_eq!(empty.features.len(), 4);
    }
}
