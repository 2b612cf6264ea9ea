//! Beamline elements.
//!
//! Each variant owns only immutable configuration. `transport` advances a
//! particle through the element (or to the point where it is intercepted)
//! and `boundary_geometry` exports the element's opaque material as
//! polygons.

mod blade;
mod double_drift;
mod drift;
mod kicker;
mod quad_hole;
mod quadrupole;
mod septum;

pub use blade::BladeLayout;
pub use double_drift::DoubleApertureDrift;
pub use drift::Drift;
pub use kicker::Kicker;
pub use quad_hole::QuadHole;
pub use quadrupole::Quadrupole;
pub use septum::Septum;

use crate::geometry::Polygon;
use crate::particle::Particle;
use thiserror::Error;

/// Element misconfiguration detected at construction time
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("element name must not be empty")]
    EmptyName,

    #[error("element '{name}': length must be positive, got {length}")]
    NonPositiveLength { name: String, length: f64 },

    #[error("element '{name}': parameter '{param}' is not finite")]
    NonFinite { name: String, param: &'static str },

    #[error("element '{name}': blade thickness must not be negative, got {thickness}")]
    NegativeThickness { name: String, thickness: f64 },
}

/// Shared checks for every element constructor.
pub(crate) fn validate_common(name: &str, length: f64) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyName);
    }
    if !length.is_finite() {
        return Err(ConfigError::NonFinite {
            name: name.to_string(),
            param: "length",
        });
    }
    if length <= 0.0 {
        return Err(ConfigError::NonPositiveLength {
            name: name.to_string(),
            length,
        });
    }
    Ok(())
}

pub(crate) fn validate_finite(
    name: &str,
    params: &[(&'static str, f64)],
) -> Result<(), ConfigError> {
    for (param, value) in params {
        if !value.is_finite() {
            return Err(ConfigError::NonFinite {
                name: name.to_string(),
                param,
            });
        }
    }
    Ok(())
}

/// A beamline element
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Drift(Drift),
    Kicker(Kicker),
    Quadrupole(Quadrupole),
    DoubleApertureDrift(DoubleApertureDrift),
    Septum(Septum),
    QuadHole(QuadHole),
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Element::Drift(e) => e.name(),
            Element::Kicker(e) => e.name(),
            Element::Quadrupole(e) => e.name(),
            Element::DoubleApertureDrift(e) => e.name(),
            Element::Septum(e) => e.name(),
            Element::QuadHole(e) => e.name(),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Element::Drift(e) => e.length(),
            Element::Kicker(e) => e.length(),
            Element::Quadrupole(e) => e.length(),
            Element::DoubleApertureDrift(e) => e.length(),
            Element::Septum(e) => e.length(),
            Element::QuadHole(e) => e.length(),
        }
    }

    /// Advance `particle` through this element.
    ///
    /// On return the particle is either still circulating with the full
    /// length consumed, or lost with `s`/`x`/`px` at the interception point.
    /// A particle that is already lost is left untouched.
    pub fn transport(&self, particle: &mut Particle) {
        if particle.is_lost() {
            return;
        }
        match self {
            Element::Drift(e) => e.transport(particle),
            Element::Kicker(e) => e.transport(particle),
            Element::Quadrupole(e) => e.transport(particle),
            Element::DoubleApertureDrift(e) => e.transport(particle),
            Element::Septum(e) => e.transport(particle),
            Element::QuadHole(e) => e.transport(particle),
        }
    }

    /// Polygons of opaque material between `s0` and `s0 + length`.
    ///
    /// `extent` is how far the outer regions reach beyond each aperture edge.
    pub fn boundary_geometry(&self, extent: f64, s0: f64) -> Vec<Polygon> {
        match self {
            Element::Drift(e) => e.boundary_geometry(extent, s0),
            Element::Kicker(e) => e.boundary_geometry(extent, s0),
            Element::Quadrupole(e) => e.boundary_geometry(extent, s0),
            Element::DoubleApertureDrift(e) => e.boundary_geometry(extent, s0),
            Element::Septum(e) => e.boundary_geometry(extent, s0),
            Element::QuadHole(e) => e.boundary_geometry(extent, s0),
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Element {
                fn from(e: $variant) -> Self {
                    Element::$variant(e)
                }
            }
        )*
    };
}

impl_from_variant!(Drift, Kicker, Quadrupole, DoubleApertureDrift, Septum, QuadHole);
