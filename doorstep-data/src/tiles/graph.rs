//! Routing graph assembled from decoded tiles.

use std::collections::HashMap;

use doorstep_core::projection::lonlat_to_mercator;
use doorstep_core::{Location, Path, RouteQuery, Step};
use geo::{Coord, Distance, Haversine, Point};
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use rstar::RTree;
use rstar::primitives::GeomWithData;

use super::jsonld::Tile;

type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Undirected road/path network with a spatial index over its nodes.
///
/// Edge weights are great-circle lengths in metres.
#[derive(Debug)]
pub struct RoutingGraph {
    graph: UnGraph<Location, f64>,
    index: RTree<IndexedPoint>,
}

fn haversine(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b))
}

fn indexed(coord: Coord<f64>, node: NodeIndex) -> IndexedPoint {
    let projected = lonlat_to_mercator(coord);
    GeomWithData::new([projected.x, projected.y], node)
}

impl RoutingGraph {
    /// Build the graph from the routable ways of `tiles`.
    ///
    /// Ways may reference nodes stored in a neighbouring tile, so every tile
    /// is merged before edges are added. Segments whose nodes are missing
    /// are dropped.
    pub fn from_tiles<'a>(tiles: impl IntoIterator<Item = &'a Tile>) -> Self {
        let tiles: Vec<&Tile> = tiles.into_iter().collect();
        let nodes: HashMap<&str, _> = tiles
            .iter()
            .flat_map(|tile| &tile.nodes)
            .map(|node| (node.id.as_str(), node))
            .collect();

        let mut graph = UnGraph::<Location, f64>::new_undirected();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
        let mut node_index = |graph: &mut UnGraph<Location, f64>, id: &str| {
            let node = *nodes.get(id)?;
            Some(*indices.entry(node.id.as_str()).or_insert_with(|| {
                graph.add_node(Location {
                    id: Some(node.id.clone()),
                    longitude: node.coord.x,
                    latitude: node.coord.y,
                    defined_tags: node.defined_tags.clone(),
                    freeform_tags: node.freeform_tags.clone(),
                })
            }))
        };

        for way in tiles.iter().flat_map(|tile| &tile.ways) {
            if !way.is_routable() {
                continue;
            }
            for pair in way.nodes.windows(2) {
                let (Some(a), Some(b)) = (
                    node_index(&mut graph, pair[0].as_str()),
                    node_index(&mut graph, pair[1].as_str()),
                ) else {
                    continue;
                };
                if a == b || graph.contains_edge(a, b) {
                    continue;
                }
                let weight = haversine(graph[a].coord(), graph[b].coord());
                graph.add_edge(a, b, weight);
            }
        }

        let points = graph
            .node_indices()
            .map(|node| indexed(graph[node].coord(), node))
            .collect();
        Self {
            graph,
            index: RTree::bulk_load(points),
        }
    }

    /// Number of nodes on routable ways.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of routable segments.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no routable nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Graph node closest to `coord`.
    pub fn nearest(&self, coord: Coord<f64>) -> Option<NodeIndex> {
        let projected = lonlat_to_mercator(coord);
        self.index
            .nearest_neighbor(&[projected.x, projected.y])
            .map(|point| point.data)
    }

    /// Shortest path for `query`, or `None` when the snapped endpoints are
    /// not connected.
    ///
    /// Without `road_network_only` the path gains a free-space step from the
    /// raw origin onto the network and another from the network to the raw
    /// destination.
    pub fn shortest_path(&self, query: &RouteQuery) -> Option<Path> {
        let start = self.nearest(query.from)?;
        let goal = self.nearest(query.to)?;
        let goal_coord = self.graph[goal].coord();

        let (_, nodes) = astar(
            &self.graph,
            start,
            |node| node == goal,
            |edge| *edge.weight(),
            |node| haversine(self.graph[node].coord(), goal_coord),
        )?;

        let mut steps = Vec::with_capacity(nodes.len() + 1);
        if !query.road_network_only {
            steps.push(free_space_step(Location::at(query.from), self.graph[start].clone()));
        }
        for pair in nodes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let distance_m = self
                .graph
                .edges_connecting(a, b)
                .map(|edge| *edge.weight())
                .fold(f64::INFINITY, f64::min);
            steps.push(Step {
                start: self.graph[a].clone(),
                stop: self.graph[b].clone(),
                distance_m,
            });
        }
        if !query.road_network_only {
            steps.push(free_space_step(self.graph[goal].clone(), Location::at(query.to)));
        }
        Some(Path::from_steps(steps))
    }
}

fn free_space_step(start: Location, stop: Location) -> Step {
    let distance_m = haversine(start.coord(), stop.coord());
    Step {
        start,
        stop,
        distance_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::jsonld::parse_tile;
    use doorstep_core::tags::term;
    use rstest::{fixture, rstest};

    // Two streets joined at node 2; node 5 sits on a footpath island.
    const TILE: &str = r#"{"@graph": [
        {"@id": "n1", "@type": "osm:Node", "geo:lat": 51.0500, "geo:long": 3.7200},
        {"@id": "n2", "@type": "osm:Node", "geo:lat": 51.0500, "geo:long": 3.7210,
         "osm:barrier": "osm:Gate"},
        {"@id": "n3", "@type": "osm:Node", "geo:lat": 51.0510, "geo:long": 3.7210},
        {"@id": "n4", "@type": "osm:Node", "geo:lat": 51.0500, "geo:long": 3.7300},
        {"@id": "n5", "@type": "osm:Node", "geo:lat": 51.0600, "geo:long": 3.7400},
        {"@id": "n6", "@type": "osm:Node", "geo:lat": 51.0601, "geo:long": 3.7401},
        {"@id": "w1", "@type": "osm:Way", "osm:highway": "osm:Residential",
         "osm:hasNodes": ["n1", "n2", "n4"]},
        {"@id": "w2", "@type": "osm:Way", "osm:highway": "osm:Service",
         "osm:hasNodes": ["n2", "n3", "missing"]},
        {"@id": "w3", "@type": "osm:Way", "osm:highway": "osm:Footway",
         "osm:hasNodes": ["n5", "n6"]},
        {"@id": "w4", "@type": "osm:Way", "osm:building": "osm:Yes",
         "osm:hasNodes": ["n3", "n4"]}
    ]}"#;

    #[fixture]
    fn graph() -> RoutingGraph {
        let tile = parse_tile(TILE.as_bytes()).expect("tile should parse");
        RoutingGraph::from_tiles([&tile])
    }

    fn query(from: Coord<f64>, to: Coord<f64>, road_network_only: bool) -> RouteQuery {
        RouteQuery {
            from,
            to,
            road_network_only,
        }
    }

    #[rstest]
    fn only_highway_segments_become_edges(graph: RoutingGraph) {
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 4);
        assert!(!graph.is_empty());
    }

    #[rstest]
    fn snaps_to_nearest_node(graph: RoutingGraph) {
        let node = graph
            .nearest(Coord { x: 3.7209, y: 51.0511 })
            .expect("graph is not empty");
        assert_eq!(graph.graph[node].id.as_deref(), Some("n3"));
    }

    #[rstest]
    fn network_only_path_follows_the_streets(graph: RoutingGraph) {
        let path = graph
            .shortest_path(&query(
                Coord { x: 3.7200, y: 51.0500 },
                Coord { x: 3.7210, y: 51.0510 },
                true,
            ))
            .expect("nodes are connected");

        let leg = path.first_leg().expect("one leg");
        let ids: Vec<_> = leg
            .steps
            .iter()
            .map(|step| (step.start.id.clone(), step.stop.id.clone()))
            .collect();
        assert_eq!(
            ids,
            [
                (Some("n1".to_owned()), Some("n2".to_owned())),
                (Some("n2".to_owned()), Some("n3".to_owned())),
            ]
        );
        assert_eq!(
            leg.steps[0].stop.defined_tags.get(&term("barrier")),
            Some(&term("Gate"))
        );
        assert!(path.distance_m() > 100.0 && path.distance_m() < 200.0);
    }

    #[rstest]
    fn free_space_steps_join_raw_points(graph: RoutingGraph) {
        let from = Coord { x: 3.7199, y: 51.0499 };
        let to = Coord { x: 3.7301, y: 51.0501 };

        let path = graph
            .shortest_path(&query(from, to, false))
            .expect("nodes are connected");

        let steps = &path.first_leg().expect("one leg").steps;
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].start.coord(), from);
        assert_eq!(steps[0].start.id, None);
        assert_eq!(steps[3].stop.coord(), to);
        assert!(steps.iter().all(|step| step.distance_m >= 0.0));
    }

    #[rstest]
    fn disconnected_endpoints_have_no_path(graph: RoutingGraph) {
        let path = graph.shortest_path(&query(
            Coord { x: 3.7200, y: 51.0500 },
            Coord { x: 3.7400, y: 51.0600 },
            true,
        ));
        assert!(path.is_none());
    }

    #[rstest]
    fn tiles_without_highways_build_an_empty_graph() {
        let tile = parse_tile(
            br#"{"@graph": [{"@id": "n1", "@type": "osm:Node", "geo:lat": 1.0, "geo:long": 1.0}]}"#,
        )
        .expect("tile should parse");
        let graph = RoutingGraph::from_tiles([&tile]);
        assert!(graph.is_empty());
        assert!(graph.nearest(Coord { x: 1.0, y: 1.0 }).is_none());
    }

    #[rstest]
    fn ways_may_span_tiles() {
        let west = parse_tile(
            br#"{"@graph": [
                {"@id": "a", "@type": "osm:Node", "geo:lat": 1.0, "geo:long": 1.0},
                {"@id": "w", "@type": "osm:Way", "osm:highway": "osm:Path",
                 "osm:hasNodes": ["a", "b"]}
            ]}"#,
        )
        .expect("tile should parse");
        let east = parse_tile(
            br#"{"@graph": [{"@id": "b", "@type": "osm:Node", "geo:lat": 1.0, "geo:long": 1.001}]}"#,
        )
        .expect("tile should parse");

        let graph = RoutingGraph::from_tiles([&west, &east]);

        assert_eq!(graph.edge_count(), 1);
    }
}
