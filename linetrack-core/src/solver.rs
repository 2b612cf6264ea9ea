//! Crossing solver for trajectories of the form `y(u) = a·u² + b·u + c`.
//!
//! Every element reduces its collision test to this shape: `y` is the signed
//! distance between the particle and one boundary (which may itself taper
//! linearly), `u` is the distance travelled inside the element. Straight
//! motion is the `a == 0` case.

/// Direction in which the trajectory has to pass through the boundary for a
/// root to count as a physical crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// `y` goes from positive to negative.
    Falling,
    /// `y` goes from negative to positive.
    Rising,
}

/// Real roots of `a·u² + b·u + c = 0`, ascending.
///
/// A negative discriminant yields no roots; it means the trajectory never
/// reaches that surface and is a normal outcome.
pub fn real_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a == 0.0 {
        if b == 0.0 {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }

    // Citardauq form for the second root keeps precision when b² >> 4ac.
    let sq = disc.sqrt();
    let q = -0.5 * (b + sq.copysign(b));
    let mut roots = if q == 0.0 {
        vec![0.0, 0.0]
    } else {
        vec![q / a, c / q]
    };
    roots.sort_by(|l, r| l.total_cmp(r));
    roots
}

/// First distance `u` in `[0, limit)` at which `y` crosses zero in the given
/// direction.
///
/// Tangent contacts (zero slope at the root) are not crossings.
pub fn first_crossing(a: f64, b: f64, c: f64, limit: f64, direction: Crossing) -> Option<f64> {
    real_roots(a, b, c).into_iter().find(|&u| {
        if !(0.0..limit).contains(&u) {
            return false;
        }
        let slope = 2.0 * a * u + b;
        match direction {
            Crossing::Falling => slope < 0.0,
            Crossing::Rising => slope > 0.0,
        }
    })
}
