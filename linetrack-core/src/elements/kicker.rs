use super::{validate_common, validate_finite, ConfigError, Drift};
use crate::aperture::Aperture;
use crate::geometry::Polygon;
use crate::particle::{LossLocation, Particle};
use crate::solver::{first_crossing, Crossing};

/// Dipole kicker: constant transverse force inside a centred circular bore.
#[derive(Debug, Clone, PartialEq)]
pub struct Kicker {
    name: String,
    length: f64,
    angle: f64,
    aperture: Aperture,
}

impl Kicker {
    pub fn new(
        name: impl Into<String>,
        length: f64,
        angle: f64,
        radius: f64,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_common(&name, length)?;
        validate_finite(&name, &[("angle", angle), ("radius", radius)])?;
        Ok(Self {
            name,
            length,
            angle,
            aperture: Aperture::from_radius(radius),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    fn as_drift(&self) -> Drift {
        Drift::from_parts(&self.name, self.length, self.aperture, 0.0, 0.0)
    }

    pub fn transport(&self, particle: &mut Particle) {
        if self.angle == 0.0 {
            self.as_drift().transport(particle);
            return;
        }

        if let Aperture::Bounded(r) = self.aperture {
            if !self.aperture.contains(particle.x, 0.0) {
                particle.lose(&self.name, LossLocation::Start);
                return;
            }

            // x(u) = a·u² + px·u + x
            let a = self.angle / self.length / 2.0;
            let b = particle.px;
            let x0 = particle.x;
            let bend = r.copysign(self.angle);

            // Side the particle is bent away from, then the side it is bent
            // towards.
            let far = first_crossing(
                a,
                b,
                x0 + bend,
                self.length,
                if self.angle > 0.0 { Crossing::Falling } else { Crossing::Rising },
            )
            .map(|u| (u, -bend));
            let near = || {
                first_crossing(
                    a,
                    b,
                    x0 - bend,
                    self.length,
                    if self.angle > 0.0 { Crossing::Rising } else { Crossing::Falling },
                )
                .map(|u| (u, bend))
            };

            if let Some((hit, edge)) = far.or_else(near) {
                particle.s += hit;
                particle.x = edge;
                particle.px += 2.0 * a * hit;
                particle.lose(&self.name, LossLocation::Down);
                return;
            }
        }

        particle.s += self.length;
        particle.x += (particle.px + self.angle / 2.0) * self.length;
        particle.px += self.angle;
    }

    pub fn boundary_geometry(&self, extent: f64, s0: f64) -> Vec<Polygon> {
        self.as_drift().boundary_geometry(extent, s0)
    }
}
