//! Two-region transport across a tapering blade.
//!
//! The circulating region lies below the blade (field free), the extraction
//! region above it (uniform dipole field, if any). All crossings are solved
//! in coordinates relative to the blade centre line, which moves linearly
//! from `up` to `down` over the element.

use crate::aperture::Aperture;
use crate::geometry::Polygon;
use crate::particle::{LossLocation, Particle};
use crate::solver::{first_crossing, Crossing};

/// Blade position, thickness and the apertures on either side.
///
/// Both apertures are stored as distances from the blade centre line, i.e.
/// the user-facing diameter plus half the blade thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BladeLayout {
    up: f64,
    down: f64,
    thickness: f64,
    circulating: Aperture,
    extraction: Aperture,
}

impl BladeLayout {
    /// `d_circulating`/`d_extraction` are measured from the blade faces;
    /// `<= 0` leaves that side open.
    pub fn new(up: f64, down: f64, thickness: f64, d_circulating: f64, d_extraction: f64) -> Self {
        let half = thickness / 2.0;
        Self {
            up,
            down,
            thickness,
            circulating: Aperture::from_radius(d_circulating).inflated(half),
            extraction: Aperture::from_radius(d_extraction).inflated(half),
        }
    }

    pub fn up(&self) -> f64 {
        self.up
    }

    pub fn down(&self) -> f64 {
        self.down
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Circulating-side limit, measured from the blade centre line.
    pub fn circulating(&self) -> Aperture {
        self.circulating
    }

    /// Extraction-side limit, measured from the blade centre line.
    pub fn extraction(&self) -> Aperture {
        self.extraction
    }

    /// A zero-thickness blade stops nothing.
    pub fn is_virtual(&self) -> bool {
        self.thickness <= 0.0
    }

    fn half_thickness(&self) -> f64 {
        self.thickness / 2.0
    }

    pub(crate) fn geometry(&self, extent: f64, s0: f64, length: f64) -> Vec<Polygon> {
        let s1 = s0 + length;
        let h = self.half_thickness();
        let mut polygons = Vec::new();
        if !self.is_virtual() {
            polygons.push(Polygon::band(
                s0,
                s1,
                self.up - h,
                self.down - h,
                self.up + h,
                self.down + h,
            ));
        }
        if let Aperture::Bounded(e) = self.extraction {
            polygons.push(Polygon::beyond(s0, s1, self.up + e, self.down + e, extent, 1.0));
        }
        if let Aperture::Bounded(c) = self.circulating {
            polygons.push(Polygon::beyond(s0, s1, self.up - c, self.down - c, extent, -1.0));
        }
        polygons
    }
}

/// Loss locations that name the blade itself; septa call it a blade,
/// double-aperture drifts a collimator.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BladeLabels {
    pub start: LossLocation,
    pub from_circulating: LossLocation,
    pub from_extraction: LossLocation,
}

pub(crate) const SEPTUM_BLADE: BladeLabels = BladeLabels {
    start: LossLocation::StartBlade,
    from_circulating: LossLocation::DownBladeCirculating,
    from_extraction: LossLocation::DownBladeExtraction,
};

pub(crate) const COLLIMATOR: BladeLabels = BladeLabels {
    start: LossLocation::StartCollimator,
    from_circulating: LossLocation::DownCollimatorCirculating,
    from_extraction: LossLocation::DownCollimatorExtraction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Circulating,
    Extraction,
}

impl Region {
    fn other(self) -> Self {
        match self {
            Region::Circulating => Region::Extraction,
            Region::Extraction => Region::Circulating,
        }
    }
}

/// A surface the particle may hit: its offset from the blade centre line,
/// the direction the particle must cross it in, and what hitting it means.
struct Surface {
    offset: f64,
    direction: Crossing,
    location: LossLocation,
    is_blade: bool,
}

/// Transport through a blade element of `length`.
///
/// `curvature` is half the transverse acceleration in the extraction region
/// (`angle / (2·length)`); the circulating region is always field free.
pub(crate) fn transport(
    particle: &mut Particle,
    name: &str,
    length: f64,
    layout: &BladeLayout,
    curvature: f64,
    labels: BladeLabels,
) {
    let h = layout.half_thickness();

    if let Aperture::Bounded(e) = layout.extraction {
        if particle.x > layout.up + e {
            particle.lose(name, LossLocation::StartExtraction);
            return;
        }
    }
    if particle.x < layout.up + h && particle.x > layout.up - h {
        particle.lose(name, labels.start);
        return;
    }
    if let Aperture::Bounded(c) = layout.circulating {
        if particle.x < layout.up - c {
            particle.lose(name, LossLocation::StartCirculating);
            return;
        }
    }

    let mut region = if particle.x < layout.up {
        Region::Circulating
    } else {
        Region::Extraction
    };
    let taper = (layout.down - layout.up) / length;
    let mut blade = layout.up;
    let mut remaining = length;

    loop {
        let a = match region {
            Region::Circulating => 0.0,
            Region::Extraction => curvature,
        };
        let surfaces = surfaces_for(region, layout, labels);

        // Relative to the blade: y(u) = a·u² + (px - taper)·u + (x - blade).
        let y0 = particle.x - blade;
        let b = particle.px - taper;
        let hit = surfaces
            .into_iter()
            .filter_map(|surface| {
                first_crossing(a, b, y0 - surface.offset, remaining, surface.direction)
                    .map(|u| (u, surface))
            })
            .min_by(|l, r| l.0.total_cmp(&r.0));

        let Some((u, surface)) = hit else {
            particle.s += remaining;
            particle.x += particle.px * remaining + a * remaining * remaining;
            particle.px += 2.0 * a * remaining;
            return;
        };

        blade += taper * u;
        particle.s += u;
        particle.x = blade + surface.offset;
        particle.px += 2.0 * a * u;

        if surface.is_blade && layout.is_virtual() {
            tracing::trace!(element = name, s = particle.s, x = particle.x, "virtual blade crossing");
            particle.record();
            region = region.other();
            remaining -= u;
            continue;
        }

        particle.lose(name, surface.location);
        return;
    }
}

fn surfaces_for(region: Region, layout: &BladeLayout, labels: BladeLabels) -> Vec<Surface> {
    let h = layout.half_thickness();
    let mut surfaces = Vec::with_capacity(2);
    match region {
        Region::Circulating => {
            if let Aperture::Bounded(c) = layout.circulating {
                surfaces.push(Surface {
                    offset: -c,
                    direction: Crossing::Falling,
                    location: LossLocation::DownCirculating,
                    is_blade: false,
                });
            }
            surfaces.push(Surface {
                offset: -h,
                direction: Crossing::Rising,
                location: labels.from_circulating,
                is_blade: true,
            });
        }
        Region::Extraction => {
            surfaces.push(Surface {
                offset: h,
                direction: Crossing::Falling,
                location: labels.from_extraction,
                is_blade: true,
            });
            if let Aperture::Bounded(e) = layout.extraction {
                surfaces.push(Surface {
                    offset: e,
                    direction: Crossing::Rising,
                    location: LossLocation::DownExtraction,
                    is_blade: false,
                });
            }
        }
    }
    surfaces
}
