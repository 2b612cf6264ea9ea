//! Test helper utilities for linetrack tests

use crate::elements::Element;
use crate::particle::Particle;
use crate::tracking::track;
use std::fs;
use std::path::{Path, PathBuf};

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Compare two particles' transport state (not history)
pub fn same_state(a: &Particle, b: &Particle, tol: f64) -> bool {
    approx_eq(a.s, b.s, tol)
        && approx_eq(a.x, b.x, tol)
        && approx_eq(a.px, b.px, tol)
        && a.status == b.status
}

/// Transport a fresh particle through a single element
pub fn transported(element: &Element, x: f64, px: f64) -> Particle {
    let mut particle = Particle::new(x, px);
    element.transport(&mut particle);
    particle
}

/// Track a fresh particle through a line
pub fn tracked(line: &[Element], x: f64, px: f64) -> Particle {
    let mut particle = Particle::new(x, px);
    track(&mut particle, line);
    particle
}

/// Path of a data file under the crate's `tests/data` directory
pub fn data_path(manifest_dir: &str, filename: &str) -> PathBuf {
    let mut path = PathBuf::from(manifest_dir);
    path.push("tests");
    path.push("data");
    path.push(filename);
    path
}

/// Load a lattice file from disk
pub fn load_source(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    Ok(fs::read_to_string(path)?)
}
