use super::{validate_common, validate_finite, ConfigError, Quadrupole};
use crate::aperture::Aperture;
use crate::geometry::Polygon;
use crate::particle::Particle;

/// Quadrupole with a hole in its yoke.
///
/// Particles entering inside the hole see the hole's own (weaker) gradient
/// about the hole field axis; everything else sees the main quadrupole. The
/// choice is made once, at the entrance.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadHole {
    name: String,
    main: Quadrupole,
    hole: Quadrupole,
    quad_aperture: Aperture,
    hole_aperture: Aperture,
    hole_axis_up: f64,
    hole_axis_down: f64,
}

impl QuadHole {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        length: f64,
        quad_k: f64,
        hole_k: f64,
        quad_radius: f64,
        hole_radius: f64,
        hole_field_axis: f64,
        hole_axis_up: f64,
        hole_axis_down: f64,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_common(&name, length)?;
        validate_finite(
            &name,
            &[
                ("hole_k", hole_k),
                ("hole_radius", hole_radius),
                ("hole_field", hole_field_axis),
                ("hole_up", hole_axis_up),
                ("hole_down", hole_axis_down),
            ],
        )?;
        let main = Quadrupole::new(format!("{name}.circ"), length, quad_k, quad_radius)?;
        let hole = Quadrupole::with_offsets(
            format!("{name}_hole"),
            length,
            hole_k,
            hole_radius,
            hole_field_axis,
            hole_axis_up,
            hole_axis_down,
        )?;
        Ok(Self {
            name,
            main,
            hole,
            quad_aperture: Aperture::from_radius(quad_radius),
            hole_aperture: Aperture::from_radius(hole_radius),
            hole_axis_up,
            hole_axis_down,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f64 {
        self.main.length()
    }

    /// Whether a particle at entrance position `x` is transported by the
    /// hole field.
    pub fn in_hole(&self, x: f64) -> bool {
        match self.hole_aperture {
            Aperture::Bounded(r) => x > self.hole_axis_up - r && x < self.hole_axis_up + r,
            Aperture::Open => false,
        }
    }

    pub fn transport(&self, particle: &mut Particle) {
        if self.in_hole(particle.x) {
            self.hole.transport(particle);
        } else {
            self.main.transport(particle);
        }
    }

    pub fn boundary_geometry(&self, extent: f64, s0: f64) -> Vec<Polygon> {
        let (Aperture::Bounded(qr), Aperture::Bounded(hr)) = (self.quad_aperture, self.hole_aperture)
        else {
            tracing::warn!(
                element = %self.name,
                "aperture of a quadrupole with hole needs both radii; omitted"
            );
            return Vec::new();
        };
        let s1 = s0 + self.length();
        vec![
            Polygon::beyond(s0, s1, -qr, -qr, extent, -1.0),
            Polygon::band(
                s0,
                s1,
                qr,
                qr,
                self.hole_axis_up - hr,
                self.hole_axis_down - hr,
            ),
            Polygon::beyond(
                s0,
                s1,
                self.hole_axis_up + hr,
                self.hole_axis_down + hr,
                extent,
                1.0,
            ),
        ]
    }
}
