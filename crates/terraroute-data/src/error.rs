//! Error types for loading airport and border data.

use std::path::PathBuf;

use terraroute_core::RouteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// Reading a data file or directory failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A border file is not valid GeoJSON.
    #[error("invalid GeoJSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A GeoJSON document not tied to a file failed to parse.
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[source] serde_json::Error),

    /// A country listing matched nothing.
    #[error(
        "countries not found{}",
        .continent.as_deref().map(|c| format!(" for continent {c}")).unwrap_or_default()
    )]
    CountriesNotFound { continent: Option<String> },

    #[error("unknown aircraft type {0:?}")]
    UnknownAircraftType(String),

    /// A coordinate or ring failed validation.
    #[error("invalid geometry: {0}")]
    Geometry(#[from] RouteError),
}

pub type Result<T> = std::result::Result<T, DataError>;
