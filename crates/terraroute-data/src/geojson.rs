//! GeoJSON border parsing.
//!
//! Only exterior rings are kept; holes are treated as part of the country.

use serde::Deserialize;
use terraroute_core::{Coordinate, Polygon, RouteError};

type Position = Vec<f64>;
type Ring = Vec<Position>;

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Unsupported,
}

impl FeatureCollection {
    /// Border polygons from every feature, in document order.
    ///
    /// Rings that fail validation are skipped with a warning.
    pub fn polygons(&self) -> Vec<Polygon> {
        let mut polygons = Vec::new();
        for geometry in self.features.iter().filter_map(|f| f.geometry.as_ref()) {
            match geometry {
                Geometry::Polygon { coordinates } => {
                    push_exterior(&mut polygons, coordinates);
                }
                Geometry::MultiPolygon { coordinates } => {
                    for rings in coordinates {
                        push_exterior(&mut polygons, rings);
                    }
                }
                Geometry::Unsupported => {
                    tracing::warn!("skipping non-polygon GeoJSON geometry");
                }
            }
        }
        polygons
    }
}

/// Parse a FeatureCollection document into border polygons.
pub fn parse_polygons(text: &str) -> Result<Vec<Polygon>, serde_json::Error> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    Ok(collection.polygons())
}

fn push_exterior(out: &mut Vec<Polygon>, rings: &[Ring]) {
    let Some(exterior) = rings.first() else {
        return;
    };
    match ring_to_polygon(exterior) {
        Ok(polygon) => out.push(polygon),
        Err(err) => tracing::warn!(error = %err, "skipping invalid border ring"),
    }
}

/// Convert a ring of `[lng, lat]` positions.
pub fn ring_to_polygon(ring: &[Position]) -> Result<Polygon, RouteError> {
    let vertices = ring
        .iter()
        .map(|position| match position.as_slice() {
            [lng, lat, ..] => Ok(Coordinate {
                lat: *lat,
                lng: *lng,
            }),
            _ => Err(RouteError::InvalidInput(format!(
                "position has {} values, expected at least 2",
                position.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Polygon::new(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "Squareland"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                    [[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]
                ]
            }
        }]
    }"#;

    #[test]
    fn positions_are_lng_lat() {
        let polygons = parse_polygons(SQUARE).unwrap();
        assert_eq!(polygons.len(), 1, "hole must not become its own polygon");
        assert_eq!(polygons[0].vertices()[1], Coordinate { lat: 0.0, lng: 10.0 });
        // Points in the hole still count as inside the country.
        assert!(polygons[0].contains_point(&Coordinate { lat: 5.0, lng: 5.0 }));
    }

    #[test]
    fn multipolygon_yields_one_polygon_per_part() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                    [[[5, 5], [6, 5], [6, 6], [5, 5]]]
                ]}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 2]}},
                {"type": "Feature", "geometry": null}
            ]
        }"#;
        let polygons = parse_polygons(doc).unwrap();
        assert_eq!(polygons.len(), 2);
    }

    #[test]
    fn invalid_rings_are_skipped() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [
                    [[0, 0], [1, 1], [0, 0]]
                ]}},
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [
                    [[0, 0], [200, 0], [1, 1], [0, 0]]
                ]}},
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [
                    [[0, 0], [2, 0], [2, 2], [0, 0]]
                ]}}
            ]
        }"#;
        let polygons = parse_polygons(doc).unwrap();
        assert_eq!(polygons.len(), 1);
    }

    #[test]
    fn short_position_is_rejected() {
        let ring = vec![vec![0.0, 0.0], vec![1.0], vec![1.0, 1.0]];
        assert!(matches!(
            ring_to_polygon(&ring),
            Err(RouteError::InvalidInput(_))
        ));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(parse_polygons("{\"type\": \"FeatureCollection\", \"features\": 3}").is_err());
    }
}
