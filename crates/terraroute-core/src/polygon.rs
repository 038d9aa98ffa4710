//! Border rings and containment tests.
//!
//! Rings are tested in an equirectangular (lng, lat) plane. Longitudes are
//! unwrapped on construction so a ring crossing the antimeridian occupies one
//! continuous range, and queries are retried shifted by ±360°.

use crate::error::RouteError;
use crate::models::Coordinate;
use crate::spatial::{normalize_lng, sample_great_circle};

/// Tolerance in degrees for on-line and touching decisions.
const EPS_DEG: f64 = 1e-9;
/// Tolerance on the segment parameter when merging touch points.
const EPS_T: f64 = 1e-9;

const SHIFTS: [f64; 3] = [0.0, -360.0, 360.0];

type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Bounds {
    fn overlaps(&self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> bool {
        min_x <= self.max_x + EPS_DEG
            && max_x >= self.min_x - EPS_DEG
            && min_y <= self.max_y + EPS_DEG
            && max_y >= self.min_y - EPS_DEG
    }
}

/// One closed border ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Coordinate>,
    /// Vertices as (x = unwrapped lng, y = lat).
    ring: Vec<Point>,
    bounds: Bounds,
}

impl Polygon {
    /// Build a ring from its vertices.
    ///
    /// A closing vertex equal to the first one is dropped; at least three
    /// distinct vertices must remain.
    pub fn new(vertices: Vec<Coordinate>) -> Result<Self, RouteError> {
        for vertex in &vertices {
            vertex.validate()?;
        }

        let mut vertices = vertices;
        vertices.dedup_by(|b, a| a.same_position(b));
        if vertices.len() > 1 && vertices[0].same_position(&vertices[vertices.len() - 1]) {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(RouteError::InvalidInput(format!(
                "polygon ring needs at least 3 distinct vertices, got {}",
                vertices.len()
            )));
        }

        let ring = unwrap_lngs(&vertices);
        let bounds = ring.iter().fold(
            Bounds {
                min_x: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                min_y: f64::INFINITY,
                max_y: f64::NEG_INFINITY,
            },
            |b, &(x, y)| Bounds {
                min_x: b.min_x.min(x),
                max_x: b.max_x.max(x),
                min_y: b.min_y.min(y),
                max_y: b.max_y.max(y),
            },
        );

        Ok(Self {
            vertices,
            ring,
            bounds,
        })
    }

    /// Ring vertices in order, without the closing duplicate.
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Check if a point is strictly inside this ring (even-odd rule).
    ///
    /// Points on the boundary are not inside.
    pub fn contains_point(&self, p: &Coordinate) -> bool {
        if self.on_boundary(p) {
            return false;
        }
        SHIFTS.iter().any(|shift| {
            let x = p.lng + shift;
            self.bounds.overlaps(x, x, p.lat, p.lat) && self.contains_xy((x, p.lat))
        })
    }

    /// True if `p` lies on a ring edge or vertex, within `EPS_DEG`.
    pub fn on_boundary(&self, p: &Coordinate) -> bool {
        SHIFTS.iter().any(|shift| {
            let x = p.lng + shift;
            self.bounds.overlaps(x, x, p.lat, p.lat) && self.on_boundary_xy((x, p.lat))
        })
    }

    /// True if `a` and `b` are consecutive ring vertices, in either order.
    pub fn has_edge(&self, a: &Coordinate, b: &Coordinate) -> bool {
        let n = self.vertices.len();
        (0..n).any(|i| {
            let u = &self.vertices[i];
            let v = &self.vertices[(i + 1) % n];
            (u.same_position(a) && v.same_position(b)) || (u.same_position(b) && v.same_position(a))
        })
    }

    /// Check if the great-circle segment `p1 -> p2` passes through the interior.
    ///
    /// The segment is sampled into sub-segments of at most `sample_step_km`.
    /// A sub-segment blocks if it properly crosses a ring edge or if any
    /// stretch between boundary contacts lies inside the ring. Touching the
    /// boundary, including at the segment's own endpoints, does not block.
    pub fn intersects_segment(&self, p1: &Coordinate, p2: &Coordinate, sample_step_km: f64) -> bool {
        let samples = sample_great_circle(p1, p2, sample_step_km);
        let chain = unwrap_lngs(&samples);

        let (min_x, max_x, min_y, max_y) = chain.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(a, b, c, d), &(x, y)| (a.min(x), b.max(x), c.min(y), d.max(y)),
        );

        for shift in SHIFTS {
            if !self.bounds.overlaps(min_x + shift, max_x + shift, min_y, max_y) {
                continue;
            }
            for pair in chain.windows(2) {
                let p = (pair[0].0 + shift, pair[0].1);
                let q = (pair[1].0 + shift, pair[1].1);
                if self.sub_segment_enters(p, q) {
                    return true;
                }
            }
        }
        false
    }

    fn sub_segment_enters(&self, p: Point, q: Point) -> bool {
        let seg_min_x = p.0.min(q.0);
        let seg_max_x = p.0.max(q.0);
        let seg_min_y = p.1.min(q.1);
        let seg_max_y = p.1.max(q.1);
        if !self
            .bounds
            .overlaps(seg_min_x, seg_max_x, seg_min_y, seg_max_y)
        {
            return false;
        }

        let dx = q.0 - p.0;
        let dy = q.1 - p.1;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= EPS_DEG {
            return false;
        }

        // Parameters along p->q where the segment meets the boundary.
        let mut contacts = vec![0.0, 1.0];
        let mut overlaps: Vec<(f64, f64)> = Vec::new();

        let n = self.ring.len();
        for i in 0..n {
            let a = self.ring[i];
            let b = self.ring[(i + 1) % n];
            if a.0.max(b.0) < seg_min_x - EPS_DEG
                || a.0.min(b.0) > seg_max_x + EPS_DEG
                || a.1.max(b.1) < seg_min_y - EPS_DEG
                || a.1.min(b.1) > seg_max_y + EPS_DEG
            {
                continue;
            }

            let side_a = cross(p, q, a) / len;
            let side_b = cross(p, q, b) / len;
            let edge_len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
            let (side_p, side_q) = if edge_len > EPS_DEG {
                (cross(a, b, p) / edge_len, cross(a, b, q) / edge_len)
            } else {
                (0.0, 0.0)
            };

            let edge_straddles = (side_a > EPS_DEG && side_b < -EPS_DEG)
                || (side_a < -EPS_DEG && side_b > EPS_DEG);
            let seg_straddles = (side_p > EPS_DEG && side_q < -EPS_DEG)
                || (side_p < -EPS_DEG && side_q > EPS_DEG);
            if edge_straddles && seg_straddles {
                return true;
            }

            let param = |r: Point| ((r.0 - p.0) * dx + (r.1 - p.1) * dy) / (len * len);
            let a_on = side_a.abs() <= EPS_DEG;
            let b_on = side_b.abs() <= EPS_DEG;
            if a_on && b_on {
                let (t0, t1) = ordered(param(a), param(b));
                let (t0, t1) = (t0.max(0.0), t1.min(1.0));
                if t1 - t0 > EPS_T {
                    overlaps.push((t0, t1));
                    contacts.push(t0);
                    contacts.push(t1);
                }
                continue;
            }
            for (on, r) in [(a_on, a), (b_on, b)] {
                if on {
                    let t = param(r);
                    if (-EPS_T..=1.0 + EPS_T).contains(&t) {
                        contacts.push(t.clamp(0.0, 1.0));
                    }
                }
            }
        }

        contacts.sort_by(|a, b| a.total_cmp(b));
        contacts.dedup_by(|b, a| (*b - *a).abs() <= EPS_T);

        for window in contacts.windows(2) {
            let (t0, t1) = (window[0], window[1]);
            if t1 - t0 <= EPS_T {
                continue;
            }
            if overlaps
                .iter()
                .any(|&(o0, o1)| t0 >= o0 - EPS_T && t1 <= o1 + EPS_T)
            {
                continue;
            }
            let t = (t0 + t1) / 2.0;
            let mid = (p.0 + t * dx, p.1 + t * dy);
            if !self.on_boundary_xy(mid) && self.contains_xy(mid) {
                return true;
            }
        }
        false
    }

    fn on_boundary_xy(&self, r: Point) -> bool {
        let n = self.ring.len();
        (0..n).any(|i| {
            let a = self.ring[i];
            let b = self.ring[(i + 1) % n];
            let (dx, dy) = (b.0 - a.0, b.1 - a.1);
            let len_sq = dx * dx + dy * dy;
            let t = if len_sq > 0.0 {
                (((r.0 - a.0) * dx + (r.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (ex, ey) = (a.0 + t * dx - r.0, a.1 + t * dy - r.1);
            (ex * ex + ey * ey).sqrt() <= EPS_DEG
        })
    }

    fn contains_xy(&self, (x, y): Point) -> bool {
        // Ray casting: count intersections with polygon edges
        let mut inside = false;
        let n = self.ring.len();
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.ring[i];
            let (xj, yj) = self.ring[j];
            if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Project points to (x, lat), shifting each longitude by whole turns so
/// consecutive points differ by at most 180°.
fn unwrap_lngs(points: &[Coordinate]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    let mut prev_x = points.first().map_or(0.0, |p| p.lng);
    for point in points {
        let x = prev_x + normalize_lng(point.lng - prev_x);
        out.push((x, point.lat));
        prev_x = x;
    }
    out
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
