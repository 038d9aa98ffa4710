//! Error types for route computation.

use std::fmt;

use thiserror::Error;

/// Which end of a route an endpoint code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Departure,
    Destination,
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRole::Departure => f.write_str("departure"),
            EndpointRole::Destination => f.write_str("destination"),
        }
    }
}

/// Why the planner could not connect origin and destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockedReason {
    /// The origin lies inside a forbidden polygon of the given country.
    OriginInside { code: String },
    /// The destination lies inside a forbidden polygon of the given country.
    DestinationInside { code: String },
    /// Every candidate path crosses forbidden territory.
    NoPath,
}

impl fmt::Display for BlockedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockedReason::OriginInside { code } => {
                write!(f, "origin lies inside the borders of {code}")
            }
            BlockedReason::DestinationInside { code } => {
                write!(f, "destination lies inside the borders of {code}")
            }
            BlockedReason::NoPath => f.write_str("every path crosses a forbidden border"),
        }
    }
}

/// Errors returned by route computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Malformed coordinate or polygon ring.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An endpoint code could not be resolved to coordinates.
    #[error("{role} airport not found: {code}")]
    NotFound { role: EndpointRole, code: String },

    /// No admissible path exists around the forbidden borders.
    #[error("no route avoiding the specified borders exists: {0}")]
    RouteBlocked(BlockedReason),

    /// The caller cancelled the computation.
    #[error("route computation cancelled")]
    Cancelled,
}

impl RouteError {
    /// Route computation is deterministic, so no variant is worth retrying.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_not_found_and_blocked_distinct() {
        let not_found = RouteError::NotFound {
            role: EndpointRole::Destination,
            code: "XXX".to_string(),
        };
        assert_eq!(not_found.to_string(), "destination airport not found: XXX");

        let blocked = RouteError::RouteBlocked(BlockedReason::NoPath);
        assert!(blocked
            .to_string()
            .starts_with("no route avoiding the specified borders exists"));
        assert!(!blocked.is_retryable());
    }
}
