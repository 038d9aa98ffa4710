//! Route service shared by the `terraroute` binary and its tests.
//!
//! Route searches are CPU bound, so they run on the blocking pool under a
//! timeout. When the timeout fires the search's cancel token is tripped.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use terraroute_core::{
    compute_route_for_request, CancelToken, PlannerConfig, RouteError, RouteRequest, RouteResult,
};
use terraroute_data::{Airport, AirportDirectory, BorderStore};
use thiserror::Error;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("route computation timed out after {0:?}")]
    TimedOut(Duration),

    #[error("route worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct RouteService {
    airports: Arc<AirportDirectory>,
    borders: BorderStore,
    planner: PlannerConfig,
    timeout: Duration,
}

impl RouteService {
    pub fn new(airports: AirportDirectory, borders: BorderStore, config: &Config) -> Self {
        Self {
            airports: Arc::new(airports),
            borders,
            planner: config.planner(),
            timeout: config.timeout(),
        }
    }

    /// Compute the distance for `request`, failing once the configured
    /// timeout elapses.
    pub async fn distance(&self, request: RouteRequest) -> Result<RouteResult, ServiceError> {
        self.distance_with_cancel(request, CancelToken::new()).await
    }

    /// Like [`distance`](Self::distance), with a caller-owned cancel token.
    pub async fn distance_with_cancel(
        &self,
        request: RouteRequest,
        cancel: CancelToken,
    ) -> Result<RouteResult, ServiceError> {
        let airports = Arc::clone(&self.airports);
        let borders = self.borders.clone();
        let planner = self.planner.clone();
        let worker_cancel = cancel.clone();

        let mut handle = tokio::task::spawn_blocking(move || {
            compute_route_for_request(
                &request,
                &*airports,
                &borders,
                &planner,
                &worker_cancel,
            )
        });

        match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(joined) => Ok(joined??),
            Err(_) => {
                cancel.cancel();
                tracing::warn!(timeout = ?self.timeout, "route computation timed out, cancelling");
                Err(ServiceError::TimedOut(self.timeout))
            }
        }
    }

    pub fn airports(&self, continent: Option<&str>, country: Option<&str>) -> Vec<&Airport> {
        self.airports.list(continent, country)
    }

    pub fn border_codes(&self) -> Vec<String> {
        self.borders.codes()
    }
}

/// Human-readable rendering of a route result.
pub fn format_route(request: &RouteRequest, result: &RouteResult) -> String {
    let mut lines = vec![format!(
        "{} -> {}: {:.1} km / {:.1} mi / {:.1} nm",
        request.departure.trim().to_ascii_uppercase(),
        request.destination.trim().to_ascii_uppercase(),
        result.distances.km,
        result.distances.miles,
        result.distances.nm,
    )];
    if !request.borders.is_empty() {
        lines.push(format!("avoiding: {}", request.borders.join(", ")));
    }
    lines.push("waypoints:".to_string());
    lines.extend(
        result
            .path
            .iter()
            .map(|point| format!("  {:>9.4} {:>10.4}", point.lat, point.lng)),
    );
    lines.push(format!(
        "midpoint: {:.4} {:.4}",
        result.midpoint.lat, result.midpoint.lng
    ));
    lines.join("\n")
}
