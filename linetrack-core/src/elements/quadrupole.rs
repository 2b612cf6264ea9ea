use super::{validate_common, validate_finite, ConfigError, Drift};
use crate::aperture::Aperture;
use crate::geometry::Polygon;
use crate::particle::{LossLocation, Particle};

/// Linear-gradient quadrupole, `k = 1/(Bρ)·dBy/dx`.
///
/// The field's neutral axis (`offset_field`) and the aperture axis
/// (`offset_up` → `offset_down`) are independent. Only the entrance and exit
/// planes are checked against the aperture; the bore is not tested in
/// between.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadrupole {
    name: String,
    length: f64,
    k: f64,
    aperture: Aperture,
    offset_field: f64,
    offset_up: f64,
    offset_down: f64,
}

impl Quadrupole {
    pub fn new(name: impl Into<String>, length: f64, k: f64, radius: f64) -> Result<Self, ConfigError> {
        Self::with_offsets(name, length, k, radius, 0.0, 0.0, 0.0)
    }

    pub fn with_offsets(
        name: impl Into<String>,
        length: f64,
        k: f64,
        radius: f64,
        offset_field: f64,
        offset_up: f64,
        offset_down: f64,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_common(&name, length)?;
        validate_finite(
            &name,
            &[
                ("k", k),
                ("radius", radius),
                ("offset_field", offset_field),
                ("offset_up", offset_up),
                ("offset_down", offset_down),
            ],
        )?;
        Ok(Self {
            name,
            length,
            k,
            aperture: Aperture::from_radius(radius),
            offset_field,
            offset_up,
            offset_down,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    fn as_drift(&self) -> Drift {
        Drift::from_parts(
            &self.name,
            self.length,
            self.aperture,
            self.offset_up,
            self.offset_down,
        )
    }

    pub fn transport(&self, particle: &mut Particle) {
        if self.k == 0.0 {
            self.as_drift().transport(particle);
            return;
        }

        if !self.aperture.contains(particle.x, self.offset_up) {
            particle.lose(&self.name, LossLocation::Start);
            return;
        }

        let xeff = particle.x - self.offset_field;
        let px = particle.px;
        let (x, px) = if self.k > 0.0 {
            let sk = self.k.sqrt();
            let phase = sk * self.length;
            (
                xeff * phase.cos() + px / sk * phase.sin(),
                -xeff * sk * phase.sin() + px * phase.cos(),
            )
        } else {
            let sk = (-self.k).sqrt();
            let phase = sk * self.length;
            (
                xeff * phase.cosh() + px / sk * phase.sinh(),
                xeff * sk * phase.sinh() + px * phase.cosh(),
            )
        };
        particle.s += self.length;
        particle.x = x + self.offset_field;
        particle.px = px;

        // Exit losses keep the full analytic exit state.
        if !self.aperture.contains(particle.x, self.offset_down) {
            particle.lose(&self.name, LossLocation::Down);
        }
    }

    pub fn boundary_geometry(&self, extent: f64, s0: f64) -> Vec<Polygon> {
        self.as_drift().boundary_geometry(extent, s0)
    }
}
