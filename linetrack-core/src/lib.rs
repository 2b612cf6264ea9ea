pub mod analyzer;
pub mod aperture;
pub mod ast;
pub mod classify;
pub mod diagnostics;
pub mod elements;
pub mod eval;
pub mod geometry;
pub mod parser;
pub mod particle;
pub mod runtime;
pub mod solver;
pub mod tracking;

pub use analyzer::analyze_lattice;
pub use aperture::Aperture;
pub use classify::{LossCategory, LossClassifier};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, SourceLocation, Span};
pub use elements::{
    BladeLayout, ConfigError, DoubleApertureDrift, Drift, Element, Kicker, QuadHole, Quadrupole,
    Septum,
};
pub use geometry::Polygon;
pub use parser::parse_lattice;
pub use particle::{LossLabel, LossLocation, LossStatus, Particle, Snapshot};
pub use runtime::{
    build_lattice, load_lattice, run_context, run_lattice, LatticeContext, LatticeError,
    TrackingResult,
};
pub use tracking::{
    line_geometry, line_length, line_positions, track, ElementPosition, GridSpec, TrackGrid,
    TrackList,
};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
