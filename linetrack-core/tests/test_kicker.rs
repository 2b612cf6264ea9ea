//! Unit tests for kicker transport

use linetrack_core::elements::{Drift, Element, Kicker};
use linetrack_core::particle::LossStatus;
use linetrack_core::tests::test_helpers::{approx_eq, same_state, transported};

fn kicker(length: f64, angle: f64, radius: f64) -> Element {
    Kicker::new("K1", length, angle, radius).unwrap().into()
}

#[test]
fn test_open_kicker_applies_full_kick() {
    let p = transported(&kicker(1.0, 0.1, 0.0), 0.0, 0.0);

    assert!(approx_eq(p.s, 1.0, 1e-12));
    assert!(approx_eq(p.x, 0.05, 1e-12));
    assert!(approx_eq(p.px, 0.1, 1e-12));
    assert_eq!(p.status, LossStatus::Circulating);
}

#[test]
fn test_zero_angle_matches_drift() {
    let k = kicker(2.0, 0.0, 0.01);
    let d: Element = Drift::new("K1", 2.0, 0.01).unwrap().into();

    for &(x, px) in &[(0.0, 0.0), (0.005, 0.004), (-0.02, 0.0), (0.0, -0.01)] {
        let a = transported(&k, x, px);
        let b = transported(&d, x, px);
        assert!(same_state(&a, &b, 0.0), "mismatch at ({}, {})", x, px);
    }
}

#[test]
fn test_entry_outside_aperture() {
    let p = transported(&kicker(1.0, 0.1, 0.01), 0.02, 0.0);
    assert_eq!(p.status.to_string(), "K1_start");
    assert_eq!(p.s, 0.0);
}

#[test]
fn test_bent_into_upper_edge() {
    // x(u) = 0.05 u², reaches 0.01 at u = sqrt(0.2)
    let p = transported(&kicker(1.0, 0.1, 0.01), 0.0, 0.0);

    assert_eq!(p.status.to_string(), "K1_down");
    assert!(approx_eq(p.s, 0.2f64.sqrt(), 1e-12));
    assert!(approx_eq(p.x, 0.01, 1e-12));
    assert!(approx_eq(p.px, 0.1 * 0.2f64.sqrt(), 1e-12));
}

#[test]
fn test_negative_angle_mirrors_positive() {
    let p = transported(&kicker(1.0, -0.1, 0.01), 0.0, 0.0);

    assert_eq!(p.status.to_string(), "K1_down");
    assert!(approx_eq(p.s, 0.2f64.sqrt(), 1e-12));
    assert!(approx_eq(p.x, -0.01, 1e-12));
    assert!(approx_eq(p.px, -0.1 * 0.2f64.sqrt(), 1e-12));
}

#[test]
fn test_hits_far_edge_before_turning_around() {
    // Heading down against the kick: x(u) = 0.05 u² - 0.05 u dips to -0.0125
    let p = transported(&kicker(1.0, 0.1, 0.01), 0.0, -0.05);
    let u = (1.0 - 0.2f64.sqrt()) / 2.0;

    assert_eq!(p.status.to_string(), "K1_down");
    assert!(approx_eq(p.s, u, 1e-12));
    assert!(approx_eq(p.x, -0.01, 1e-12));
    assert!(approx_eq(p.px, -0.05 + 0.1 * u, 1e-12));
}

#[test]
fn test_turns_around_inside_aperture() {
    // Dips to -0.003125 and climbs back to 0.025 without touching either edge
    let p = transported(&kicker(1.0, 0.1, 0.03), 0.0, -0.025);
    assert!(!p.is_lost());
    assert!(approx_eq(p.x, 0.025, 1e-12));
    assert!(approx_eq(p.px, 0.075, 1e-12));
}

#[test]
fn test_geometry_matches_drift() {
    let k = kicker(1.0, 0.1, 0.01);
    let d: Element = Drift::new("K1", 1.0, 0.01).unwrap().into();
    assert_eq!(k.boundary_geometry(0.1, 2.0), d.boundary_geometry(0.1, 2.0));
}
