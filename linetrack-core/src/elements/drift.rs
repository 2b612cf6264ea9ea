use super::{validate_common, validate_finite, ConfigError};
use crate::aperture::Aperture;
use crate::geometry::Polygon;
use crate::particle::{LossLocation, Particle};

/// Field-free straight section with a circular bore.
///
/// The bore centre may move linearly from `offset_up` at the entrance to
/// `offset_down` at the exit, giving a tapering tube.
#[derive(Debug, Clone, PartialEq)]
pub struct Drift {
    name: String,
    length: f64,
    aperture: Aperture,
    offset_up: f64,
    offset_down: f64,
}

impl Drift {
    /// Centred drift; `radius <= 0` leaves it unconstrained.
    pub fn new(name: impl Into<String>, length: f64, radius: f64) -> Result<Self, ConfigError> {
        Self::with_offsets(name, length, radius, 0.0, 0.0)
    }

    pub fn with_offsets(
        name: impl Into<String>,
        length: f64,
        radius: f64,
        offset_up: f64,
        offset_down: f64,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_common(&name, length)?;
        validate_finite(
            &name,
            &[
                ("radius", radius),
                ("offset_up", offset_up),
                ("offset_down", offset_down),
            ],
        )?;
        Ok(Self {
            name,
            length,
            aperture: Aperture::from_radius(radius),
            offset_up,
            offset_down,
        })
    }

    /// Build from already-validated parts of another element.
    pub(crate) fn from_parts(
        name: &str,
        length: f64,
        aperture: Aperture,
        offset_up: f64,
        offset_down: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            length,
            aperture,
            offset_up,
            offset_down,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn aperture(&self) -> Aperture {
        self.aperture
    }

    pub fn transport(&self, particle: &mut Particle) {
        let Aperture::Bounded(r) = self.aperture else {
            particle.s += self.length;
            particle.x += self.length * particle.px;
            return;
        };

        if !self.aperture.contains(particle.x, self.offset_up) {
            particle.lose(&self.name, LossLocation::Start);
            return;
        }

        let x_inc = self.length * particle.px;
        let x_exit = particle.x + x_inc;
        let taper = self.offset_down - self.offset_up;

        // Fraction of the length at which the line meets the edge
        // `offset_up + edge + f * taper`.
        let edge = if x_exit > self.offset_down + r {
            Some(r)
        } else if x_exit < self.offset_down - r {
            Some(-r)
        } else {
            None
        };

        if let Some(edge) = edge {
            let frac = (self.offset_up + edge - particle.x) / (x_inc - taper);
            particle.s += self.length * frac;
            particle.x += x_inc * frac;
            particle.lose(&self.name, LossLocation::Down);
            return;
        }

        particle.s += self.length;
        particle.x = x_exit;
    }

    pub fn boundary_geometry(&self, extent: f64, s0: f64) -> Vec<Polygon> {
        let Aperture::Bounded(r) = self.aperture else {
            return Vec::new();
        };
        let s1 = s0 + self.length;
        vec![
            Polygon::beyond(s0, s1, self.offset_up + r, self.offset_down + r, extent, 1.0),
            Polygon::beyond(s0, s1, self.offset_up - r, self.offset_down - r, extent, -1.0),
        ]
    }
}
