//! Unit tests for the two-region drift split by a collimator blade

use linetrack_core::elements::{ConfigError, DoubleApertureDrift, Element};
use linetrack_core::tests::test_helpers::{approx_eq, transported};

/// Blade centred on 0.04, faces at 0.038 and 0.042
fn collimator(thickness: f64, d_circ: f64, d_extr: f64) -> Element {
    DoubleApertureDrift::new("T", 1.0, 0.04, 0.04, thickness, d_circ, d_extr)
        .unwrap()
        .into()
}

#[test]
fn test_entry_labels() {
    let el = collimator(0.004, 0.01, 0.02);

    assert_eq!(transported(&el, 0.04, 0.0).status.to_string(), "T_start_coll");
    assert_eq!(transported(&el, 0.07, 0.0).status.to_string(), "T_start_extr");
    assert_eq!(transported(&el, 0.02, 0.0).status.to_string(), "T_start_circ");
}

#[test]
fn test_circulating_particle_hits_blade_lower_face() {
    let p = transported(&collimator(0.004, 0.0, 0.02), 0.03, 0.01);

    assert_eq!(p.status.to_string(), "T_down_coll_circ");
    assert!(approx_eq(p.s, 0.8, 1e-12));
    assert!(approx_eq(p.x, 0.038, 1e-12));
}

#[test]
fn test_extraction_particle_hits_blade_upper_face() {
    let p = transported(&collimator(0.004, 0.0, 0.02), 0.05, -0.01);

    assert_eq!(p.status.to_string(), "T_down_coll_extr");
    assert!(approx_eq(p.s, 0.8, 1e-12));
    assert!(approx_eq(p.x, 0.042, 1e-12));
}

#[test]
fn test_extraction_particle_hits_outer_edge() {
    // Extraction edge sits d_extr above the upper face: 0.062
    let p = transported(&collimator(0.004, 0.0, 0.02), 0.05, 0.02);

    assert_eq!(p.status.to_string(), "T_down_extr");
    assert!(approx_eq(p.s, 0.6, 1e-12));
    assert!(approx_eq(p.x, 0.062, 1e-12));
}

#[test]
fn test_circulating_particle_hits_outer_edge() {
    // Circulating edge sits d_circ below the lower face: 0.028
    let p = transported(&collimator(0.004, 0.01, 0.0), 0.03, -0.01);

    assert_eq!(p.status.to_string(), "T_down_circ");
    assert!(approx_eq(p.s, 0.2, 1e-12));
    assert!(approx_eq(p.x, 0.028, 1e-12));
}

#[test]
fn test_particles_clear_of_everything_exit() {
    let el = collimator(0.004, 0.01, 0.02);

    let circ = transported(&el, 0.03, 0.0);
    assert!(!circ.is_lost());
    assert!(approx_eq(circ.s, 1.0, 1e-12));

    let extr = transported(&el, 0.05, 0.005);
    assert!(!extr.is_lost());
    assert!(approx_eq(extr.x, 0.055, 1e-12));
}

#[test]
fn test_virtual_blade_passes_particle_into_extraction() {
    let p = transported(&collimator(0.0, 0.0, 0.02), 0.03, 0.02);

    assert!(!p.is_lost());
    assert!(approx_eq(p.s, 1.0, 1e-12));
    assert!(approx_eq(p.x, 0.05, 1e-12));

    // Crossing checkpoint at the blade
    let history = p.history();
    assert_eq!(history.len(), 2);
    assert!(approx_eq(history[1].s, 0.5, 1e-12));
    assert!(approx_eq(history[1].x, 0.04, 1e-12));
}

#[test]
fn test_virtual_blade_then_extraction_edge() {
    let p = transported(&collimator(0.0, 0.0, 0.02), 0.03, 0.04);

    assert_eq!(p.status.to_string(), "T_down_extr");
    assert!(approx_eq(p.s, 0.75, 1e-12));
    assert!(approx_eq(p.x, 0.06, 1e-12));
}

#[test]
fn test_virtual_blade_passes_particle_into_circulating() {
    let p = transported(&collimator(0.0, 0.01, 0.0), 0.05, -0.015);

    assert!(!p.is_lost());
    assert!(approx_eq(p.x, 0.035, 1e-12));
    assert_eq!(p.history().len(), 2);
}

#[test]
fn test_tapered_blade_sweeps_into_still_particle() {
    // Blade moves from 0.04 to 0.02; its lower face reaches x = 0.03 at s = 0.4
    let el: Element = DoubleApertureDrift::new("T", 1.0, 0.04, 0.02, 0.004, 0.0, 0.0)
        .unwrap()
        .into();
    let p = transported(&el, 0.03, 0.0);

    assert_eq!(p.status.to_string(), "T_down_coll_circ");
    assert!(approx_eq(p.s, 0.4, 1e-12));
    assert!(approx_eq(p.x, 0.03, 1e-12));
}

#[test]
fn test_geometry_skips_virtual_blade() {
    assert_eq!(collimator(0.004, 0.01, 0.02).boundary_geometry(0.1, 0.0).len(), 3);
    assert_eq!(collimator(0.004, 0.0, 0.02).boundary_geometry(0.1, 0.0).len(), 2);
    assert_eq!(collimator(0.0, 0.0, 0.02).boundary_geometry(0.1, 0.0).len(), 1);
}

#[test]
fn test_blade_polygon_spans_thickness() {
    let polygons = collimator(0.004, 0.0, 0.0).boundary_geometry(0.1, 1.0);
    assert_eq!(polygons.len(), 1);
    let blade = &polygons[0];
    assert!(approx_eq(blade.area().abs(), 0.004, 1e-12));
    assert_eq!(blade.s_range(), (1.0, 2.0));
}

#[test]
fn test_negative_thickness_is_rejected() {
    let err = DoubleApertureDrift::new("T", 1.0, 0.04, 0.04, -0.001, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, ConfigError::NegativeThickness { .. }));
}
