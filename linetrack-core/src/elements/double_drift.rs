use super::blade::{self, BladeLayout, COLLIMATOR};
use super::{validate_common, validate_finite, ConfigError};
use crate::geometry::Polygon;
use crate::particle::Particle;

/// Field-free drift split in two by a collimator blade: circulating aperture
/// below, extraction aperture above.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleApertureDrift {
    name: String,
    length: f64,
    layout: BladeLayout,
}

impl DoubleApertureDrift {
    pub fn new(
        name: impl Into<String>,
        length: f64,
        blade_up: f64,
        blade_down: f64,
        thickness: f64,
        d_circulating: f64,
        d_extraction: f64,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_common(&name, length)?;
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
            layout,
        })
    }

    pub(crate) fn from_parts(name: &str, length: f64, layout: BladeLayout) -> Self {
        Self {
            name: name.to_string(),
            length,
            layout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn layout(&self) -> &BladeLayout {
        &self.layout
    }

    pub fn transport(&self, particle: &mut Particle) {
        blade::transport(particle, &self.name, self.length, &self.layout, 0.0, COLLIMATOR);
    }

    pub fn boundary_geometry(&self, extent: f64, s0: f64) -> Vec<Polygon> {
        self.layout.geometry(extent, s0, self.length)
    }
}

pub(super) fn validated_layout(
    name: &str,
    blade_up: f64,
    blade_down: f64,
    thickness: f64,
    d_circulating: f64,
    d_extraction: f64,
) -> Result<BladeLayout, ConfigError> {
    validate_finite(
        name,
        &[
            ("blade_up", blade_up),
            ("blade_down", blade_down),
            ("thickness", thickness),
            ("d_circ", d_circulating),
            ("d_extr", d_extraction),
        ],
    )?;
    if thickness < 0.0 {
        return Err(ConfigError::NegativeThickness {
            name: name.to_string(),
            thickness,
        });
    }
    Ok(BladeLayout::new(
        blade_up,
        blade_down,
        thickness,
        d_circulating,
        d_extraction,
    ))
}
