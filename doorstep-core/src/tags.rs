//! Convert routable-tiles tag triples back into flat OpenStreetMap tags.
//!
//! Routable tiles describe node and way attributes in two ways:
//!
//! - *defined tags*: namespaced property/value pairs from the OpenStreetMap
//!   terms ontology, e.g. `terms#access → terms#NoAccess`;
//! - *freeform tags*: raw `key=value` strings for everything the ontology does
//!   not model.
//!
//! [`triples_to_tags`] folds both back into the familiar `key=value` shape.
//! The conversion is lossy and knowingly incomplete: ontology terms for
//! `smoothness`, `oneway` and several `highway` values have no entry in the
//! remap table and fall through to the generic CamelCase rule. Extend
//! [`remap_value`] when the ontology maintainers confirm a mapping.

use std::collections::BTreeMap;

use crate::Tags;

/// Namespace of the OpenStreetMap terms ontology used by routable tiles.
pub const OSM_TERMS: &str = "https://w3id.org/openstreetmap/terms#";

/// Property carrying freeform tags inside the defined-tag map.
const HAS_TAG: &str = "hasTag";

/// Key holding the subject identifier in the output map.
pub const ID_KEY: &str = "@id";

/// Namespaced property → namespaced value pairs.
pub type DefinedTags = BTreeMap<String, String>;

/// Build the full ontology IRI for a short term such as `barrier`.
///
/// # Examples
/// ```
/// use doorstep_core::tags::term;
///
/// assert_eq!(term("barrier"), "https://w3id.org/openstreetmap/terms#barrier");
/// ```
pub fn term(name: &str) -> String {
    format!("{OSM_TERMS}{name}")
}

/// Flatten defined and freeform tags into OpenStreetMap-style tags.
///
/// The output always contains [`ID_KEY`] mapped to `subject`. Freeform tags
/// are applied last and win over defined tags with the same key.
///
/// # Examples
/// ```
/// use doorstep_core::tags::{triples_to_tags, DefinedTags};
///
/// let defined = DefinedTags::from([(
///     "https://w3id.org/openstreetmap/terms#access".to_string(),
///     "https://w3id.org/openstreetmap/terms#NoAccess".to_string(),
/// )]);
/// let tags = triples_to_tags("node/1", Some(&defined), None);
///
/// assert_eq!(tags.get("@id").map(String::as_str), Some("node/1"));
/// assert_eq!(tags.get("access").map(String::as_str), Some("no"));
/// ```
pub fn triples_to_tags(
    subject: &str,
    defined: Option<&DefinedTags>,
    freeform: Option<&[String]>,
) -> Tags {
    let mut tags = Tags::new();
    tags.insert(ID_KEY.to_owned(), subject.to_owned());

    for (property, value) in defined.into_iter().flatten() {
        let Some(key) = property.strip_prefix(OSM_TERMS) else {
            continue;
        };
        if key == HAS_TAG {
            continue;
        }
        let raw = value.strip_prefix(OSM_TERMS).unwrap_or(value);
        tags.insert(key.to_owned(), remap_value(key, raw));
    }

    for entry in freeform.into_iter().flatten() {
        if let Some((key, value)) = entry.split_once('=') {
            tags.insert(key.to_owned(), value.to_owned());
        }
    }

    tags
}

/// Map an ontology value onto its OpenStreetMap spelling.
fn remap_value(key: &str, value: &str) -> String {
    match (key, value) {
        (_, "NoAccess") => "no".to_owned(),
        (_, "FreeAccess") => "yes".to_owned(),
        (_, "OfficialAccess") => "official".to_owned(),
        ("highway", "UnderConstruction") => "construction".to_owned(),
        ("construction", "UnderConstruction") => "yes".to_owned(),
        _ => camel_to_snake(value),
    }
}

/// Insert `_` wherever a lowercase letter meets an uppercase one, then lower-case.
fn camel_to_snake(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut previous_lower = false;
    for ch in value.chars() {
        if previous_lower && ch.is_uppercase() {
            out.push('_');
        }
        previous_lower = ch.is_lowercase();
        out.extend(ch.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn defined(pairs: &[(&str, &str)]) -> DefinedTags {
        pairs
            .iter()
            .map(|(property, value)| (term(property), term(value)))
            .collect()
    }

    #[rstest]
    fn always_includes_subject() {
        let tags = triples_to_tags("http://www.openstreetmap.org/node/1", None, None);
        assert_eq!(tags.len(), 1);
        assert_eq!(
            tags.get(ID_KEY).map(String::as_str),
            Some("http://www.openstreetmap.org/node/1")
        );
    }

    #[rstest]
    #[case("access", "NoAccess", "no")]
    #[case("access", "FreeAccess", "yes")]
    #[case("motor_vehicle", "OfficialAccess", "official")]
    #[case("highway", "UnderConstruction", "construction")]
    #[case("construction", "UnderConstruction", "yes")]
    #[case("highway", "LivingStreet", "living_street")]
    #[case("barrier", "Bollard", "bollard")]
    #[case("entrance", "SomeCamelCaseValue", "some_camel_case_value")]
    fn remaps_values(#[case] key: &str, #[case] value: &str, #[case] expected: &str) {
        let tags = triples_to_tags("s", Some(&defined(&[(key, value)])), None);
        assert_eq!(tags.get(key).map(String::as_str), Some(expected));
    }

    #[rstest]
    fn converts_unprefixed_values() {
        let map = DefinedTags::from([(term("entrance"), "SomeCamelCaseValue".to_owned())]);
        let tags = triples_to_tags("s", Some(&map), None);
        assert_eq!(
            tags.get("entrance").map(String::as_str),
            Some("some_camel_case_value")
        );
    }

    #[rstest]
    fn skips_foreign_namespaces_and_has_tag() {
        let mut map = defined(&[("barrier", "Gate")]);
        map.insert(
            "http://www.w3.org/2003/01/geo/wgs84_pos#lat".to_owned(),
            "60.1".to_owned(),
        );
        map.insert(term(HAS_TAG), "entrance=yes".to_owned());

        let tags = triples_to_tags("s", Some(&map), None);

        assert_eq!(tags.len(), 2, "only @id and barrier expected: {tags:?}");
        assert_eq!(tags.get("barrier").map(String::as_str), Some("gate"));
    }

    #[rstest]
    fn freeform_tags_override_defined_tags() {
        let map = defined(&[("access", "FreeAccess")]);
        let freeform = vec!["access=private".to_owned()];

        let tags = triples_to_tags("s", Some(&map), Some(&freeform));

        assert_eq!(tags.get("access").map(String::as_str), Some("private"));
    }

    #[rstest]
    fn freeform_splits_on_first_equals_only() {
        let freeform = vec!["note=a=b".to_owned(), "malformed".to_owned()];

        let tags = triples_to_tags("s", None, Some(&freeform));

        assert_eq!(tags.get("note").map(String::as_str), Some("a=b"));
        assert!(!tags.contains_key("malformed"));
    }

    #[rstest]
    #[case("already_snake", "already_snake")]
    #[case("ABC", "abc")]
    #[case("aB", "a_b")]
    #[case("", "")]
    fn camel_case_conversion(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(camel_to_snake(input), expected);
    }
}
