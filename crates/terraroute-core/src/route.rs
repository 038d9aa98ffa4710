//! Route assembly: resolves borders, picks direct or planned path, and
//! reduces the path to distances and a midpoint.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::error::{EndpointRole, RouteError};
use crate::models::{Coordinate, Distances, RouteRequest, RouteResult};
use crate::planner::{plan_path, Obstacle, PlannerConfig};
use crate::polygon::Polygon;
use crate::spatial::{path_length_km, spherical_centroid};

/// Source of border polygons keyed by normalised (uppercase) country code.
pub trait PolygonLookup {
    /// Polygons for `code`, or `None` if the code is unknown.
    fn polygons(&self, code: &str) -> Option<Arc<[Polygon]>>;
}

/// Source of endpoint coordinates keyed by airport code.
pub trait EndpointLookup {
    fn resolve(&self, code: &str) -> Option<Coordinate>;
}

impl PolygonLookup for HashMap<String, Arc<[Polygon]>> {
    fn polygons(&self, code: &str) -> Option<Arc<[Polygon]>> {
        self.get(code).cloned()
    }
}

impl EndpointLookup for HashMap<String, Coordinate> {
    fn resolve(&self, code: &str) -> Option<Coordinate> {
        self.get(code).copied()
    }
}

/// Trim and uppercase a country or airport code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Compute the route between two coordinates avoiding the given countries.
///
/// Unknown country codes are skipped. With no polygons to avoid the path is
/// the direct great-circle segment.
pub fn compute_route<S, L>(
    origin: Coordinate,
    destination: Coordinate,
    forbidden_codes: &[S],
    lookup: &L,
    config: &PlannerConfig,
    cancel: &CancelToken,
) -> Result<RouteResult, RouteError>
where
    S: AsRef<str>,
    L: PolygonLookup + ?Sized,
{
    origin.validate()?;
    destination.validate()?;

    // Sorted so obstacle order, and with it tie-breaking, is deterministic.
    let codes: BTreeSet<String> = forbidden_codes
        .iter()
        .map(|code| normalize_code(code.as_ref()))
        .filter(|code| !code.is_empty())
        .collect();

    let mut resolved: Vec<(String, Arc<[Polygon]>)> = Vec::with_capacity(codes.len());
    for code in codes {
        match lookup.polygons(&code) {
            Some(polygons) => resolved.push((code, polygons)),
            None => tracing::warn!(code = %code, "unknown country code, not avoiding it"),
        }
    }

    let obstacles: Vec<Obstacle<'_>> = resolved
        .iter()
        .flat_map(|(code, polygons)| {
            polygons.iter().map(move |polygon| Obstacle {
                code: code.as_str(),
                polygon,
            })
        })
        .collect();

    let path = if obstacles.is_empty() {
        vec![origin, destination]
    } else {
        let planned = plan_path(origin, destination, &obstacles, config, cancel)?;
        tracing::debug!(
            waypoints = planned.waypoints.len(),
            nodes = planned.stats.nodes,
            edges_tested = planned.stats.edges_tested,
            "planned border-avoiding path"
        );
        planned.waypoints
    };

    Ok(assemble(path))
}

/// Resolve both airport codes, then compute the route.
///
/// An unresolved code yields `RouteError::NotFound` naming the endpoint.
pub fn compute_route_for_request<E, L>(
    request: &RouteRequest,
    endpoints: &E,
    lookup: &L,
    config: &PlannerConfig,
    cancel: &CancelToken,
) -> Result<RouteResult, RouteError>
where
    E: EndpointLookup + ?Sized,
    L: PolygonLookup + ?Sized,
{
    let origin = resolve_endpoint(endpoints, &request.departure, EndpointRole::Departure)?;
    let destination =
        resolve_endpoint(endpoints, &request.destination, EndpointRole::Destination)?;
    compute_route(origin, destination, &request.borders, lookup, config, cancel)
}

fn resolve_endpoint<E>(
    endpoints: &E,
    code: &str,
    role: EndpointRole,
) -> Result<Coordinate, RouteError>
where
    E: EndpointLookup + ?Sized,
{
    let code = normalize_code(code);
    endpoints
        .resolve(&code)
        .ok_or(RouteError::NotFound { role, code })
}

fn assemble(path: Vec<Coordinate>) -> RouteResult {
    let km = path_length_km(&path);
    let midpoint = spherical_centroid(&path);
    RouteResult {
        path,
        distances: Distances::from_km(km),
        midpoint,
    }
}
