//! Sequencing particles through a line of elements.

use crate::elements::Element;
use crate::geometry::Polygon;
use crate::particle::Particle;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Track one particle through `line`, element by element.
///
/// A snapshot is recorded after every element traversed; tracking stops at
/// the first element that intercepts the particle.
pub fn track(particle: &mut Particle, line: &[Element]) {
    for element in line {
        element.transport(particle);
        particle.record();
        if particle.is_lost() {
            return;
        }
    }
}

/// Cumulative end position of each element, in line order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementPosition {
    pub name: String,
    pub s_end: f64,
}

pub fn line_positions(line: &[Element]) -> Vec<ElementPosition> {
    let mut s = 0.0;
    line.iter()
        .map(|element| {
            s += element.length();
            ElementPosition {
                name: element.name().to_string(),
                s_end: s,
            }
        })
        .collect()
}

pub fn line_length(line: &[Element]) -> f64 {
    line.iter().map(Element::length).sum()
}

/// Opaque regions of the whole line laid end to end, starting at `s0`.
pub fn line_geometry(line: &[Element], extent: f64, s0: f64) -> Vec<Polygon> {
    let mut s = s0;
    let mut polygons = Vec::new();
    for element in line {
        polygons.extend(element.boundary_geometry(extent, s));
        s += element.length();
    }
    polygons
}

/// Number of particles per loss label (`CIRCULATING` for survivors).
pub fn loss_counts<'a>(particles: impl IntoIterator<Item = &'a Particle>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for particle in particles {
        *counts.entry(particle.status.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Bounds and resolution of a phase-space grid of initial conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSpec {
    pub x_min: f64,
    pub x_max: f64,
    pub x_res: f64,
    pub px_min: f64,
    pub px_max: f64,
    pub px_res: f64,
}

impl GridSpec {
    pub fn nx(&self) -> usize {
        steps(self.x_min, self.x_max, self.x_res)
    }

    pub fn npx(&self) -> usize {
        steps(self.px_min, self.px_max, self.px_res)
    }

    /// Initial `(x, px)` of grid point `(i, j)`.
    ///
    /// `x` grows with `i` from `x_min`; `px` falls with `j` from `px_max`, so
    /// the grid reads like a matrix with the top-left corner at
    /// `(x_min, px_max)`.
    pub fn point(&self, i: usize, j: usize) -> (f64, f64) {
        (
            self.x_min + i as f64 * self.x_res,
            self.px_max - j as f64 * self.px_res,
        )
    }
}

fn steps(min: f64, max: f64, res: f64) -> usize {
    if res > 0.0 && max > min {
        ((max - min) / res).round() as usize
    } else {
        0
    }
}

/// Particles started on a grid of initial conditions and tracked through a
/// line. Stored row-major by `x` index.
#[derive(Debug, Clone, Serialize)]
pub struct TrackGrid {
    pub spec: GridSpec,
    nx: usize,
    npx: usize,
    particles: Vec<Particle>,
}

impl TrackGrid {
    pub fn new(line: &[Element], spec: GridSpec) -> Self {
        let nx = spec.nx();
        let npx = spec.npx();
        let particles: Vec<Particle> = (0..nx * npx)
            .into_par_iter()
            .map(|idx| {
                let (x, px) = spec.point(idx / npx, idx % npx);
                let mut particle = Particle::new(x, px);
                track(&mut particle, line);
                particle
            })
            .collect();

        let lost = particles.iter().filter(|p| p.is_lost()).count();
        tracing::info!(nx, npx, lost, "grid tracked");

        Self {
            spec,
            nx,
            npx,
            particles,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.npx)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&Particle> {
        if i < self.nx && j < self.npx {
            self.particles.get(i * self.npx + j)
        } else {
            None
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn loss_counts(&self) -> BTreeMap<String, usize> {
        loss_counts(&self.particles)
    }
}

/// Particles started from explicit `(x, px)` initial conditions.
#[derive(Debug, Clone, Serialize)]
pub struct TrackList {
    particles: Vec<Particle>,
}

impl TrackList {
    pub fn new(line: &[Element], inits: &[(f64, f64)]) -> Self {
        let particles: Vec<Particle> = inits
            .par_iter()
            .map(|&(x, px)| {
                let mut particle = Particle::new(x, px);
                track(&mut particle, line);
                particle
            })
            .collect();

        let lost = particles.iter().filter(|p| p.is_lost()).count();
        tracing::info!(count = particles.len(), lost, "list tracked");

        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn loss_counts(&self) -> BTreeMap<String, usize> {
        loss_counts(&self.particles)
    }
}
