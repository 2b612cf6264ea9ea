//! Aperture limits for element bores and blade-separated regions.

/// A transverse aperture limit.
///
/// Lattice inputs encode "no aperture" as a radius of zero or less; that
/// convention is resolved once, when the element is built, so transport code
/// only ever matches on `Open`/`Bounded`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aperture {
    Open,
    Bounded(f64),
}

impl Aperture {
    /// Interpret a raw radius/diameter where `<= 0` means unconstrained.
    pub fn from_radius(radius: f64) -> Self {
        if radius > 0.0 {
            Aperture::Bounded(radius)
        } else {
            Aperture::Open
        }
    }

    pub fn radius(&self) -> Option<f64> {
        match self {
            Aperture::Open => None,
            Aperture::Bounded(r) => Some(*r),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Aperture::Open)
    }

    /// Raw value as it would appear in a lattice file (0 for open).
    pub fn raw(&self) -> f64 {
        self.radius().unwrap_or(0.0)
    }

    /// Whether `x` lies inside a bore of this radius centred on `centre`.
    /// Points exactly on the edge are inside; an open aperture contains
    /// everything.
    pub fn contains(&self, x: f64, centre: f64) -> bool {
        match self {
            Aperture::Open => true,
            Aperture::Bounded(r) => x <= centre + r && x >= centre - r,
        }
    }

    /// Widen a bounded aperture by `margin`; open stays open.
    pub fn inflated(&self, margin: f64) -> Self {
        match self {
            Aperture::Open => Aperture::Open,
            Aperture::Bounded(r) => Aperture::Bounded(r + margin),
        }
    }
}
