//! Spherical math for distance, midpoint and segment sampling.

use crate::models::Coordinate;

/// Mean earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Upper bound on samples taken along one great-circle segment.
const MAX_SEGMENT_SAMPLES: usize = 2048;

/// Central angle between two points in radians (haversine formula).
///
/// Returns 0 for identical points and never NaN for valid coordinates.
pub fn central_angle(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for near-antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    central_angle(a, b) * EARTH_RADIUS_KM
}

/// Total great-circle length of a waypoint path in kilometers.
pub fn path_length_km(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}

/// Spherical centroid of a point sequence.
///
/// Averages the points as 3-D unit vectors and converts the mean vector back
/// to latitude/longitude. An empty sequence yields the zero coordinate.
pub fn spherical_centroid(points: &[Coordinate]) -> Coordinate {
    if points.is_empty() {
        return Coordinate::default();
    }

    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for point in points {
        let v = to_unit_vector(point);
        x += v[0];
        y += v[1];
        z += v[2];
    }

    let n = points.len() as f64;
    let (avg_x, avg_y, avg_z) = (x / n, y / n, z / n);
    let lng = avg_y.atan2(avg_x);
    let lat = avg_z.atan2((avg_x * avg_x + avg_y * avg_y).sqrt());

    Coordinate {
        lat: lat.to_degrees(),
        lng: lng.to_degrees(),
    }
}

/// Point at `fraction` of the way from `a` to `b` along the great circle.
///
/// Antipodal endpoints have no unique great circle; the chord midpoint is
/// then used as a fallback direction.
pub fn interpolate(a: &Coordinate, b: &Coordinate, fraction: f64) -> Coordinate {
    let angle = central_angle(a, b);
    if angle <= 1e-12 {
        return *a;
    }

    let va = to_unit_vector(a);
    let vb = to_unit_vector(b);
    let sin_angle = angle.sin();
    let v = if sin_angle.abs() <= 1e-12 {
        [
            va[0] + fraction * (vb[0] - va[0]),
            va[1] + fraction * (vb[1] - va[1]),
            va[2] + fraction * (vb[2] - va[2]),
        ]
    } else {
        let wa = ((1.0 - fraction) * angle).sin() / sin_angle;
        let wb = (fraction * angle).sin() / sin_angle;
        [
            wa * va[0] + wb * vb[0],
            wa * va[1] + wb * vb[1],
            wa * va[2] + wb * vb[2],
        ]
    };
    from_vector(v)
}

/// Sample the great-circle segment `a -> b` so no gap exceeds `step_km`.
///
/// The first and last samples are exactly `a` and `b`.
pub fn sample_great_circle(a: &Coordinate, b: &Coordinate, step_km: f64) -> Vec<Coordinate> {
    let distance_km = haversine_distance(a, b);
    let step = step_km.max(1e-3);
    let steps = ((distance_km / step).ceil() as usize).clamp(1, MAX_SEGMENT_SAMPLES);

    let mut samples = Vec::with_capacity(steps + 1);
    samples.push(*a);
    for i in 1..steps {
        samples.push(interpolate(a, b, i as f64 / steps as f64));
    }
    samples.push(*b);
    samples
}

/// Wrap a longitude into [-180, 180).
pub fn normalize_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

fn to_unit_vector(point: &Coordinate) -> [f64; 3] {
    let lat = point.lat.to_radians();
    let lng = point.lng.to_radians();
    [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
}

fn from_vector(v: [f64; 3]) -> Coordinate {
    let lat = v[2].atan2((v[0] * v[0] + v[1] * v[1]).sqrt());
    let lng = v[1].atan2(v[0]);
    Coordinate {
        lat: lat.to_degrees(),
        lng: lng.to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(&coord(0.0, 0.0), &coord(1.0, 0.0));
        assert!((dist - 111.195).abs() < 0.1);
    }

    #[test]
    fn test_haversine_same_point() {
        let p = coord(40.6413, -73.7781);
        assert_eq!(haversine_distance(&p, &p), 0.0);
        let pole = coord(90.0, 0.0);
        assert_eq!(haversine_distance(&pole, &pole), 0.0);
    }

    #[test]
    fn haversine_is_symmetric_and_obeys_triangle_inequality() {
        let points = [
            coord(40.6413, -73.7781),
            coord(33.9416, -118.4085),
            coord(49.0097, 2.5479),
            coord(-37.0081, 174.792),
            coord(61.1744444, -149.99639),
        ];
        for a in &points {
            for b in &points {
                assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
                for c in &points {
                    let direct = haversine_distance(a, c);
                    let via = haversine_distance(a, b) + haversine_distance(b, c);
                    assert!(direct <= via + 1e-9, "triangle inequality violated");
                }
            }
        }
    }

    #[test]
    fn jfk_to_lax_distance() {
        let km = haversine_distance(&coord(40.6413, -73.7781), &coord(33.9416, -118.4085));
        assert!((km - 3974.0).abs() < 5.0, "got {km}");
    }

    #[test]
    fn path_length_sums_segments() {
        assert_eq!(path_length_km(&[]), 0.0);
        assert_eq!(path_length_km(&[coord(10.0, 10.0)]), 0.0);

        let a = coord(0.0, 0.0);
        let b = coord(0.0, 10.0);
        let c = coord(10.0, 10.0);
        let total = path_length_km(&[a, b, c]);
        let expected = haversine_distance(&a, &b) + haversine_distance(&b, &c);
        assert!((total - expected).abs() < 1e-9);
    }

    #[test]
    fn centroid_handles_antimeridian() {
        let mid = spherical_centroid(&[coord(0.0, 179.0), coord(0.0, -179.0)]);
        assert!(mid.lat.abs() < 1e-9);
        assert!((mid.lng.abs() - 180.0).abs() < 1e-9, "got {}", mid.lng);
    }

    #[test]
    fn centroid_of_empty_sequence_is_zero() {
        assert_eq!(spherical_centroid(&[]), Coordinate::default());
    }

    #[test]
    fn interpolate_stays_on_great_circle() {
        let a = coord(40.6413, -73.7781);
        let b = coord(33.9416, -118.4085);
        let mid = interpolate(&a, &b, 0.5);
        let half = haversine_distance(&a, &b) / 2.0;
        assert!((haversine_distance(&a, &mid) - half).abs() < 1e-6);
        assert!((haversine_distance(&mid, &b) - half).abs() < 1e-6);
    }

    #[test]
    fn sampling_respects_step_and_keeps_endpoints() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 10.0);
        let samples = sample_great_circle(&a, &b, 100.0);
        assert_eq!(samples.first(), Some(&a));
        assert_eq!(samples.last(), Some(&b));
        for pair in samples.windows(2) {
            assert!(haversine_distance(&pair[0], &pair[1]) <= 100.0 + 1e-6);
        }
    }

    #[test]
    fn normalize_wraps_longitude() {
        assert_eq!(normalize_lng(190.0), -170.0);
        assert_eq!(normalize_lng(-190.0), 170.0);
        assert_eq!(normalize_lng(45.0), 45.0);
    }
}
