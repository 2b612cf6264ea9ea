//! Unit tests for quadrupole transport

use linetrack_core::elements::{Drift, Element, Quadrupole};
use linetrack_core::tests::test_helpers::{approx_eq, same_state, transported};

#[test]
fn test_focusing_quadrupole() {
    let q: Element = Quadrupole::new("Q", 1.0, 0.01, 0.0).unwrap().into();
    let p = transported(&q, 0.01, 0.0);

    // sqrt(k) * L = 0.1
    assert!(approx_eq(p.s, 1.0, 1e-12));
    assert!(approx_eq(p.x, 0.01 * 0.1f64.cos(), 1e-14));
    assert!(approx_eq(p.px, -0.01 * 0.1 * 0.1f64.sin(), 1e-14));
    assert!(!p.is_lost());
}

#[test]
fn test_defocusing_quadrupole() {
    let q: Element = Quadrupole::new("Q", 1.0, -0.01, 0.0).unwrap().into();
    let p = transported(&q, 0.01, 0.0);

    assert!(approx_eq(p.x, 0.01 * 0.1f64.cosh(), 1e-14));
    assert!(approx_eq(p.px, 0.01 * 0.1 * 0.1f64.sinh(), 1e-14));
}

#[test]
fn test_angle_only_input() {
    let q: Element = Quadrupole::new("Q", 2.0, 0.25, 0.0).unwrap().into();
    let p = transported(&q, 0.0, 0.001);

    // sqrt(k) = 0.5, phase = 1
    assert!(approx_eq(p.x, 0.001 / 0.5 * 1f64.sin(), 1e-14));
    assert!(approx_eq(p.px, 0.001 * 1f64.cos(), 1e-14));
}

#[test]
fn test_particle_on_field_axis_is_unaffected() {
    let q: Element = Quadrupole::with_offsets("Q", 1.0, 0.5, 0.0, 0.005, 0.0, 0.0)
        .unwrap()
        .into();
    let p = transported(&q, 0.005, 0.0);

    assert!(approx_eq(p.x, 0.005, 1e-15));
    assert!(approx_eq(p.px, 0.0, 1e-15));
}

#[test]
fn test_zero_gradient_matches_drift() {
    let q: Element = Quadrupole::with_offsets("Q", 1.5, 0.0, 0.01, 0.3, 0.001, -0.002)
        .unwrap()
        .into();
    let d: Element = Drift::with_offsets("Q", 1.5, 0.01, 0.001, -0.002)
        .unwrap()
        .into();

    for &(x, px) in &[(0.0, 0.0), (0.008, 0.004), (-0.012, 0.0), (0.0, -0.02)] {
        assert!(same_state(&transported(&q, x, px), &transported(&d, x, px), 0.0));
    }
}

#[test]
fn test_entry_outside_aperture() {
    let q: Element = Quadrupole::new("Q", 1.0, 0.01, 0.02).unwrap().into();
    let p = transported(&q, 0.03, 0.0);

    assert_eq!(p.status.to_string(), "Q_start");
    assert_eq!(p.s, 0.0);
}

#[test]
fn test_exit_loss_keeps_analytic_exit_state() {
    // Defocused from 0.015 to 0.015·cosh(1) ≈ 0.0231, beyond the 0.02 bore.
    // The loss is reported at the exit plane, not clamped to the edge.
    let q: Element = Quadrupole::new("Q", 1.0, -1.0, 0.02).unwrap().into();
    let p = transported(&q, 0.015, 0.0);

    assert_eq!(p.status.to_string(), "Q_down");
    assert!(approx_eq(p.s, 1.0, 1e-12));
    assert!(approx_eq(p.x, 0.015 * 1f64.cosh(), 1e-14));
    assert!(approx_eq(p.px, 0.015 * 1f64.sinh(), 1e-14));
    assert!(p.x > 0.02);
}

#[test]
fn test_exit_check_uses_downstream_offset() {
    let q: Element = Quadrupole::with_offsets("Q", 1.0, 0.01, 0.01, 0.0, 0.0, 0.05)
        .unwrap()
        .into();
    let p = transported(&q, 0.0, 0.0);
    assert_eq!(p.status.to_string(), "Q_down");
}
