use super::blade::{self, BladeLayout, SEPTUM_BLADE};
use super::double_drift::validated_layout;
use super::{validate_common, validate_finite, ConfigError, DoubleApertureDrift};
use crate::geometry::Polygon;
use crate::particle::Particle;

/// Septum magnet: dipole field on the extraction (positive) side of a blade,
/// no field on the circulating side.
///
/// A zero-thickness blade is virtual: particles cross it and continue in the
/// other region, picking up (or no longer receiving) the bend for the rest of
/// the element.
#[derive(Debug, Clone, PartialEq)]
pub struct Septum {
    name: String,
    length: f64,
    angle: f64,
    layout: BladeLayout,
}

impl Septum {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        length: f64,
        angle: f64,
        blade_up: f64,
        blade_down: f64,
        thickness: f64,
        d_circulating: f64,
        d_extraction: f64,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_common(&name, length)?;
        validate_finite(&name, &[("angle", angle)])?;
        let layout = validated_layout(
            &name,
            blade_up,
            blade_down,
            thickness,
            d_circulating,
            d_extraction,
        )?;
        Ok(Self {
            name,
            length,
            angle,
            layout,
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

    pub fn layout(&self) -> &BladeLayout {
        &self.layout
    }

    pub fn transport(&self, particle: &mut Particle) {
        if self.angle == 0.0 {
            DoubleApertureDrift::from_parts(&self.name, self.length, self.layout).transport(particle);
            return;
        }
        let curvature = self.angle / self.length / 2.0;
        blade::transport(
            particle,
            &self.name,
            self.length,
            &self.layout,
            curvature,
            SEPTUM_BLADE,
        );
    }

    pub fn boundary_geometry(&self, extent: f64, s0: f64) -> Vec<Polygon> {
        self.layout.geometry(extent, s0, self.length)
    }
}
