//! Concurrent border polygon store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use terraroute_core::{normalize_code, Polygon, PolygonLookup};

use crate::error::{DataError, Result};
use crate::geojson;

const BORDER_EXTENSION: &str = "geojson";

/// Border polygons keyed by uppercase country code.
///
/// Cheap to clone; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct BorderStore {
    polygons: Arc<DashMap<String, Arc<[Polygon]>>>,
}

impl BorderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the polygons for `code`.
    pub fn insert(&self, code: &str, polygons: Vec<Polygon>) {
        self.polygons.insert(normalize_code(code), Arc::from(polygons));
    }

    /// Parse a GeoJSON document and store it under `code`.
    /// Returns the number of polygons stored.
    pub fn insert_geojson(&self, code: &str, text: &str) -> Result<usize> {
        let polygons = geojson::parse_polygons(text).map_err(DataError::GeoJson)?;
        Ok(self.store(code, polygons))
    }

    fn store(&self, code: &str, polygons: Vec<Polygon>) -> usize {
        let count = polygons.len();
        self.insert(code, polygons);
        count
    }

    /// Load every `<CODE>.geojson` file in `dir`.
    ///
    /// Returns the number of countries loaded. Files are read in name order.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| DataError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DataError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let is_border_file = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(BORDER_EXTENSION));
            if path.is_file() && is_border_file {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let Some(code) = path.file_stem().and_then(|stem| stem.to_str()) else {
                tracing::warn!(path = %path.display(), "skipping border file with non-UTF-8 name");
                continue;
            };
            let code = normalize_code(code);
            let text = fs::read_to_string(&path).map_err(|source| DataError::Io {
                path: path.clone(),
                source,
            })?;
            let polygons = geojson::parse_polygons(&text).map_err(|source| DataError::Json {
                path: path.clone(),
                source,
            })?;
            let count = self.store(&code, polygons);
            if count == 0 {
                tracing::warn!(code = %code, "border file contains no usable polygons");
            }
            tracing::debug!(code = %code, polygons = count, "loaded borders");
            loaded += 1;
        }

        tracing::info!(dir = %dir.display(), countries = loaded, "border directory loaded");
        Ok(loaded)
    }

    /// Loaded country codes, sorted.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.polygons.iter().map(|e| e.key().clone()).collect();
        codes.sort();
        codes
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

impl PolygonLookup for BorderStore {
    fn polygons(&self, code: &str) -> Option<Arc<[Polygon]>> {
        self.polygons
            .get(&normalize_code(code))
            .map(|entry| Arc::clone(entry.value()))
    }
}
