//! Overpass QL for entrance lookups.

use geo::Coord;

/// Server-side evaluation limit requested with every query, in seconds.
const QUERY_TIMEOUT_SECS: u64 = 25;

/// Build the Overpass QL query for entrances around `destination`.
///
/// The query collects `building` and `building:part` ways within
/// `radius_m` metres, plus the member ways of nearby `building` relations,
/// then returns the `entrance` nodes on those ways.
///
/// # Examples
/// ```
/// use doorstep_data::overpass::build_entrance_query;
/// use geo::Coord;
///
/// let query = build_entrance_query(Coord { x: 24.9402, y: 60.171 }, 10.0);
/// assert!(query.contains("around:10,60.171,24.9402"));
/// assert!(query.contains(r#"node(w.ways)["entrance"]"#));
/// ```
pub fn build_entrance_query(destination: Coord<f64>, radius_m: f64) -> String {
    let around = format!("around:{radius_m},{},{}", destination.y, destination.x);
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];\
         (way({around})[\"building\"];\
         way({around})[\"building:part\"];\
         relation({around})[\"building\"];)->.buildings;\
         (way.buildings;way(r.buildings);)->.ways;\
         node(w.ways)[\"entrance\"];\
         out body;"
    )
}
