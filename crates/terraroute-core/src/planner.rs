//! Visibility-graph planner that routes around forbidden border polygons.
//!
//! Nodes are the origin, the destination and every usable polygon vertex.
//! Two nodes are connected when the great-circle segment between them stays
//! out of every polygon's interior; Dijkstra then finds the shortest path.

use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use crate::cancel::CancelToken;
use crate::error::{BlockedReason, RouteError};
use crate::models::Coordinate;
use crate::polygon::Polygon;
use crate::spatial::haversine_distance;

/// Path lengths closer than this (km) are treated as equal.
const TIE_EPS_KM: f64 = 1e-9;

const ORIGIN: usize = 0;
const DESTINATION: usize = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum length of the sub-segments used for border crossing tests.
    pub sample_step_km: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            sample_step_km: 25.0,
        }
    }
}

/// A forbidden polygon tagged with the country it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle<'a> {
    pub code: &'a str,
    pub polygon: &'a Polygon,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerStats {
    /// Graph nodes, including origin and destination.
    pub nodes: usize,
    pub nodes_settled: usize,
    pub edges_tested: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPath {
    pub waypoints: Vec<Coordinate>,
    pub stats: PlannerStats,
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    dist_km: FloatOrd,
    vertices: usize,
    node: usize,
}

struct Search {
    dist_km: Vec<f64>,
    vertices: Vec<usize>,
    prev: Vec<Option<usize>>,
    settled: Vec<bool>,
}

impl Search {
    fn new(len: usize) -> Self {
        let mut search = Self {
            dist_km: vec![f64::INFINITY; len],
            vertices: vec![usize::MAX; len],
            prev: vec![None; len],
            settled: vec![false; len],
        };
        search.dist_km[ORIGIN] = 0.0;
        search.vertices[ORIGIN] = 0;
        search
    }

    /// Node sequence from the origin to `node`.
    fn trace(&self, node: usize) -> Vec<usize> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(prev) = self.prev[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }

    /// Whether reaching `node` via `from` beats its current label.
    fn improves(&self, node: usize, from: usize, dist_km: f64, vertices: usize) -> bool {
        let current = self.dist_km[node];
        if dist_km < current - TIE_EPS_KM {
            return true;
        }
        if dist_km > current + TIE_EPS_KM {
            return false;
        }
        match vertices.cmp(&self.vertices[node]) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => match self.prev[node] {
                Some(existing) => self.trace(from) < self.trace(existing),
                None => true,
            },
        }
    }
}

/// Find the shortest path from `origin` to `destination` avoiding every
/// obstacle's interior.
///
/// Returns `RouteBlocked` if either endpoint lies inside an obstacle or no
/// path exists, and `Cancelled` if `cancel` is tripped during the search.
pub fn plan_path(
    origin: Coordinate,
    destination: Coordinate,
    obstacles: &[Obstacle<'_>],
    config: &PlannerConfig,
    cancel: &CancelToken,
) -> Result<PlannedPath, RouteError> {
    if cancel.is_cancelled() {
        return Err(RouteError::Cancelled);
    }

    for obstacle in obstacles {
        if obstacle.polygon.contains_point(&origin) {
            return Err(RouteError::RouteBlocked(BlockedReason::OriginInside {
                code: obstacle.code.to_string(),
            }));
        }
        if obstacle.polygon.contains_point(&destination) {
            return Err(RouteError::RouteBlocked(BlockedReason::DestinationInside {
                code: obstacle.code.to_string(),
            }));
        }
    }

    let step_km = config.sample_step_km;
    if is_visible(&origin, &destination, obstacles, step_km) {
        return Ok(PlannedPath {
            waypoints: vec![origin, destination],
            stats: PlannerStats {
                nodes: 2,
                nodes_settled: 0,
                edges_tested: 1,
            },
        });
    }

    let nodes = build_nodes(origin, destination, obstacles);
    let mut stats = PlannerStats {
        nodes: nodes.len(),
        nodes_settled: 0,
        edges_tested: 1,
    };

    let mut search = Search::new(nodes.len());
    let mut open_set: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();
    open_set.push(Reverse(OpenNode {
        dist_km: FloatOrd(0.0),
        vertices: 0,
        node: ORIGIN,
    }));

    let mut reached = false;
    while let Some(Reverse(current)) = open_set.pop() {
        let u = current.node;
        if search.settled[u] {
            continue;
        }
        if current.dist_km.0.to_bits() != search.dist_km[u].to_bits()
            || current.vertices != search.vertices[u]
        {
            continue;
        }
        if cancel.is_cancelled() {
            return Err(RouteError::Cancelled);
        }

        search.settled[u] = true;
        stats.nodes_settled += 1;
        if u == DESTINATION {
            reached = true;
            break;
        }

        for v in 0..nodes.len() {
            if v == u || v == ORIGIN || search.settled[v] {
                continue;
            }
            stats.edges_tested += 1;
            if !is_visible(&nodes[u], &nodes[v], obstacles, step_km) {
                continue;
            }

            let dist_km = search.dist_km[u] + haversine_distance(&nodes[u], &nodes[v]);
            let vertices = search.vertices[u] + usize::from(v != DESTINATION);
            if search.improves(v, u, dist_km, vertices) {
                search.dist_km[v] = dist_km;
                search.vertices[v] = vertices;
                search.prev[v] = Some(u);
                open_set.push(Reverse(OpenNode {
                    dist_km: FloatOrd(dist_km),
                    vertices,
                    node: v,
                }));
            }
        }
    }

    tracing::debug!(
        nodes = stats.nodes,
        settled = stats.nodes_settled,
        edges_tested = stats.edges_tested,
        reached,
        "visibility graph search finished"
    );

    if !reached {
        return Err(RouteError::RouteBlocked(BlockedReason::NoPath));
    }

    let waypoints = search
        .trace(DESTINATION)
        .into_iter()
        .map(|idx| nodes[idx])
        .collect();
    Ok(PlannedPath { waypoints, stats })
}

/// Origin, destination, then each distinct polygon vertex not buried inside
/// another obstacle, in input order.
fn build_nodes(
    origin: Coordinate,
    destination: Coordinate,
    obstacles: &[Obstacle<'_>],
) -> Vec<Coordinate> {
    let mut nodes = vec![origin, destination];
    let mut seen: HashSet<(u64, u64)> = nodes
        .iter()
        .map(|c| (c.lat.to_bits(), c.lng.to_bits()))
        .collect();

    for (idx, obstacle) in obstacles.iter().enumerate() {
        for vertex in obstacle.polygon.vertices() {
            if !seen.insert((vertex.lat.to_bits(), vertex.lng.to_bits())) {
                continue;
            }
            let buried = obstacles
                .iter()
                .enumerate()
                .any(|(other_idx, other)| other_idx != idx && other.polygon.contains_point(vertex));
            if !buried {
                nodes.push(*vertex);
            }
        }
    }
    nodes
}

fn is_visible(a: &Coordinate, b: &Coordinate, obstacles: &[Obstacle<'_>], step_km: f64) -> bool {
    obstacles.iter().all(|obstacle| {
        obstacle.polygon.has_edge(a, b) || !obstacle.polygon.intersects_segment(a, b, step_km)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    fn square(lat0: f64, lng0: f64, lat1: f64, lng1: f64) -> Polygon {
        Polygon::new(vec![
            coord(lat0, lng0),
            coord(lat0, lng1),
            coord(lat1, lng1),
            coord(lat1, lng0),
        ])
        .unwrap()
    }

    fn plan(
        origin: Coordinate,
        destination: Coordinate,
        polys: &[Polygon],
    ) -> Result<PlannedPath, RouteError> {
        let obstacles: Vec<Obstacle<'_>> = polys
            .iter()
            .map(|polygon| Obstacle { code: "XX", polygon })
            .collect();
        plan_path(
            origin,
            destination,
            &obstacles,
            &PlannerConfig::default(),
            &CancelToken::new(),
        )
    }

    #[test]
    fn clear_segment_needs_no_detour() {
        let poly = square(20.0, 20.0, 25.0, 25.0);
        let result = plan(coord(0.0, 0.0), coord(0.0, 10.0), &[poly]).unwrap();
        assert_eq!(result.waypoints, vec![coord(0.0, 0.0), coord(0.0, 10.0)]);
    }

    #[test]
    fn detours_around_blocking_square() {
        let poly = square(-2.0, 4.0, 3.0, 6.0);
        let origin = coord(0.0, 0.0);
        let destination = coord(0.0, 10.0);
        let result = plan(origin, destination, std::slice::from_ref(&poly)).unwrap();

        assert!(result.waypoints.len() >= 3, "expected a detour: {:?}", result.waypoints);
        assert_eq!(result.waypoints.first(), Some(&origin));
        assert_eq!(result.waypoints.last(), Some(&destination));
        // The southern side is shorter (2 degrees vs 3 degrees off the line).
        assert!(result.waypoints[1..result.waypoints.len() - 1]
            .iter()
            .all(|wp| wp.lat == -2.0));
        for pair in result.waypoints.windows(2) {
            assert!(
                poly.has_edge(&pair[0], &pair[1])
                    || !poly.intersects_segment(&pair[0], &pair[1], 25.0),
                "segment {:?} crosses the polygon",
                pair
            );
        }
    }

    #[test]
    fn endpoint_inside_obstacle_is_blocked() {
        let poly = square(-5.0, 5.0, 5.0, 15.0);
        let err = plan(coord(0.0, 0.0), coord(0.0, 10.0), &[poly.clone()]).unwrap_err();
        assert!(matches!(
            err,
            RouteError::RouteBlocked(BlockedReason::DestinationInside { .. })
        ));
        let err = plan(coord(0.0, 10.0), coord(0.0, 0.0), &[poly]).unwrap_err();
        assert!(matches!(
            err,
            RouteError::RouteBlocked(BlockedReason::OriginInside { .. })
        ));
    }

    #[test]
    fn enclosed_destination_has_no_path() {
        // Overlapping rectangles leave a pocket around the destination. Their
        // corners near the pocket are buried inside neighbours, so nothing in
        // the pocket can see out.
        let west = square(-10.0, 0.0, 10.0, 9.5);
        let east = square(-10.0, 10.5, 10.0, 20.0);
        let north = square(1.0, 8.0, 10.0, 12.0);
        let south = square(-10.0, 8.0, -1.0, 12.0);
        let err = plan(coord(0.0, -10.0), coord(0.0, 10.0), &[west, east, north, south])
            .unwrap_err();
        assert_eq!(err, RouteError::RouteBlocked(BlockedReason::NoPath));
    }

    #[test]
    fn cancelled_token_aborts() {
        let poly = square(-2.0, 4.0, 3.0, 6.0);
        let obstacles = [Obstacle {
            code: "XX",
            polygon: &poly,
        }];
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = plan_path(
            coord(0.0, 0.0),
            coord(0.0, 10.0),
            &obstacles,
            &PlannerConfig::default(),
            &cancel,
        )
        .unwrap_err();
        assert_eq!(err, RouteError::Cancelled);
    }

    #[test]
    fn repeated_runs_are_identical() {
        // Symmetric obstacle: north and south detours have equal length.
        let poly = square(-2.0, 4.0, 2.0, 6.0);
        let first = plan(coord(0.0, 0.0), coord(0.0, 10.0), std::slice::from_ref(&poly)).unwrap();
        let second = plan(coord(0.0, 0.0), coord(0.0, 10.0), std::slice::from_ref(&poly)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn equal_length_prefers_fewer_vertices() {
        // The west edge runs along meridian 4 with an extra vertex at (0, 4),
        // so going through it costs the same distance as skipping it.
        let poly = Polygon::new(vec![
            coord(-2.0, 4.0),
            coord(-2.0, 6.0),
            coord(2.0, 6.0),
            coord(2.0, 4.0),
            coord(0.0, 4.0),
        ])
        .unwrap();
        let origin = coord(-10.0, 4.5);
        let destination = coord(10.0, 4.5);
        let result = plan(origin, destination, &[poly]).unwrap();
        assert_eq!(
            result.waypoints,
            vec![origin, coord(-2.0, 4.0), coord(2.0, 4.0), destination]
        );
    }

    #[test]
    fn vertex_shared_by_touching_obstacles_is_kept() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(10.0, 10.0, 20.0, 20.0);
        let origin = coord(14.0, 4.0);
        let destination = coord(4.0, 18.0);
        let result = plan(origin, destination, &[a, b]).unwrap();
        assert_eq!(
            result.waypoints,
            vec![origin, coord(10.0, 10.0), destination]
        );
    }

    #[test]
    fn endpoint_on_boundary_is_allowed() {
        let poly = square(0.0, 0.0, 10.0, 10.0);
        let destination = coord(-5.0, -5.0);
        for origin in [
            coord(0.0, 0.0),
            coord(0.0, 5.0),
            coord(5.0, 0.0),
            coord(10.0, 5.0),
            coord(5.0, 10.0),
            coord(10.0, 10.0),
        ] {
            let result = plan(origin, destination, std::slice::from_ref(&poly));
            assert!(result.is_ok(), "origin {origin:?}: {result:?}");
            let reversed = plan(destination, origin, std::slice::from_ref(&poly));
            assert!(reversed.is_ok(), "destination {origin:?}: {reversed:?}");
        }
    }
}
