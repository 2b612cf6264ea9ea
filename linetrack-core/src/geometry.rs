//! Opaque-region polygons in the `(s, x)` plane.
//!
//! These are export-only: collision logic never reads them.

use glam::DVec2;
use serde::Serialize;

/// Closed polygon, vertices in order, `x` component is `s` and `y` is the
/// transverse position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    pub vertices: Vec<DVec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<DVec2>) -> Self {
        Self { vertices }
    }

    /// Quadrilateral between two edges that each run linearly from `s0` to
    /// `s1`: the first edge goes `a0 → a1`, the second `b0 → b1`.
    pub fn band(s0: f64, s1: f64, a0: f64, a1: f64, b0: f64, b1: f64) -> Self {
        Self::new(vec![
            DVec2::new(s0, a0),
            DVec2::new(s1, a1),
            DVec2::new(s1, b1),
            DVec2::new(s0, b0),
        ])
    }

    /// Region beyond an edge running `edge0 → edge1`, extended by `extent`
    /// in the direction of `sign` (+1 above the edge, -1 below).
    pub fn beyond(s0: f64, s1: f64, edge0: f64, edge1: f64, extent: f64, sign: f64) -> Self {
        let reach = extent * sign;
        Self::band(s0, s1, edge0, edge1, edge0 + reach, edge1 + reach)
    }

    /// Signed area (shoelace).
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let mut twice = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            twice += a.x * b.y - b.x * a.y;
        }
        twice / 2.0
    }

    pub fn s_range(&self) -> (f64, f64) {
        self.vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.x), hi.max(v.x))
            })
    }
}
