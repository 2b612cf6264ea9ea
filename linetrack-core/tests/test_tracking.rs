//! Tests for sequencing particles through a line

use linetrack_core::elements::{Drift, Element, Kicker, Septum};
use linetrack_core::particle::Snapshot;
use linetrack_core::tests::test_helpers::{approx_eq, same_state, tracked};
use linetrack_core::tracking::{
    line_geometry, line_length, line_positions, loss_counts, GridSpec, TrackGrid, TrackList,
};

fn simple_line() -> Vec<Element> {
    vec![
        Drift::new("D1", 1.0, 0.0).unwrap().into(),
        Kicker::new("K1", 0.5, 0.002, 0.05).unwrap().into(),
        Drift::new("D2", 2.0, 0.02).unwrap().into(),
    ]
}

#[test]
fn test_history_grows_by_one_per_element() {
    let p = tracked(&simple_line(), 0.001, 0.0);

    assert!(!p.is_lost());
    assert_eq!(p.history().len(), 4);
    assert_eq!(
        p.history()[0],
        Snapshot {
            s: 0.0,
            x: 0.001,
            px: 0.0
        }
    );
    assert!(approx_eq(p.history()[1].s, 1.0, 1e-12));
    assert!(approx_eq(p.history()[2].s, 1.5, 1e-12));
    assert!(approx_eq(p.s, 3.5, 1e-12));
    assert_eq!(*p.history().last().unwrap(), p.state());
}

#[test]
fn test_tracking_stops_at_first_loss() {
    let p = tracked(&simple_line(), 0.03, 0.0);

    assert_eq!(p.status.to_string(), "D2_start");
    // Start, after D1, after K1, after D2
    assert_eq!(p.history().len(), 4);
    assert!(approx_eq(p.s, 1.5, 1e-12));
}

#[test]
fn test_loss_in_first_element_records_one_snapshot() {
    let line: Vec<Element> = vec![
        Drift::new("A", 1.0, 0.01).unwrap().into(),
        Drift::new("B", 1.0, 0.0).unwrap().into(),
    ];
    let p = tracked(&line, 0.02, 0.0);

    assert_eq!(p.status.to_string(), "A_start");
    assert_eq!(p.history().len(), 2);
}

#[test]
fn test_virtual_crossings_add_checkpoints() {
    let line: Vec<Element> = vec![
        Drift::new("D", 1.0, 0.0).unwrap().into(),
        Septum::new("ZS", 1.0, 0.01, 0.04, 0.04, 0.0, 0.0, 0.0)
            .unwrap()
            .into(),
    ];
    // Reaches x = 0.035 after the drift, crosses the blade half way through the septum
    let p = tracked(&line, 0.025, 0.01);

    assert!(!p.is_lost());
    assert_eq!(p.history().len(), 4);
    assert!(approx_eq(p.history()[2].s, 1.5, 1e-12));
}

#[test]
fn test_line_positions_are_cumulative() {
    let positions = line_positions(&simple_line());
    let names: Vec<&str> = positions.iter().map(|p| p.name.as_str()).collect();

    assert_eq!(names, vec!["D1", "K1", "D2"]);
    assert!(approx_eq(positions[0].s_end, 1.0, 1e-12));
    assert!(approx_eq(positions[1].s_end, 1.5, 1e-12));
    assert!(approx_eq(positions[2].s_end, 3.5, 1e-12));
    assert!(approx_eq(line_length(&simple_line()), 3.5, 1e-12));
}

#[test]
fn test_line_geometry_places_elements_end_to_end() {
    let polygons = line_geometry(&simple_line(), 0.1, 10.0);

    // D1 is open: kicker and D2 give two polygons each
    assert_eq!(polygons.len(), 4);
    assert_eq!(polygons[0].s_range(), (11.0, 11.5));
    assert_eq!(polygons[2].s_range(), (11.5, 13.5));
}

#[test]
fn test_grid_spec_dimensions_and_points() {
    let spec = GridSpec {
        x_min: 0.0,
        x_max: 0.01,
        x_res: 0.001,
        px_min: -0.002,
        px_max: 0.0,
        px_res: 0.0005,
    };

    assert_eq!(spec.nx(), 10);
    assert_eq!(spec.npx(), 4);
    assert_eq!(spec.point(0, 0), (0.0, 0.0));
    let (x, px) = spec.point(3, 2);
    assert!(approx_eq(x, 0.003, 1e-15));
    assert!(approx_eq(px, -0.001, 1e-15));
}

#[test]
fn test_degenerate_grid_is_empty() {
    let spec = GridSpec {
        x_min: 0.01,
        x_max: 0.0,
        x_res: 0.001,
        px_min: 0.0,
        px_max: 0.0,
        px_res: 0.0,
    };
    assert_eq!(spec.nx(), 0);
    assert_eq!(spec.npx(), 0);

    let grid = TrackGrid::new(&simple_line(), spec);
    assert!(grid.particles().is_empty());
    assert!(grid.get(0, 0).is_none());
}

#[test]
fn test_grid_matches_sequential_tracking() {
    let line = simple_line();
    let spec = GridSpec {
        x_min: -0.03,
        x_max: 0.03,
        x_res: 0.005,
        px_min: -0.01,
        px_max: 0.01,
        px_res: 0.002,
    };
    let grid = TrackGrid::new(&line, spec);
    let (nx, npx) = grid.shape();
    assert_eq!((nx, npx), (12, 10));

    for i in 0..nx {
        for j in 0..npx {
            let (x, px) = spec.point(i, j);
            let expected = tracked(&line, x, px);
            let actual = grid.get(i, j).unwrap();
            assert!(same_state(actual, &expected, 0.0));
            assert_eq!(actual.history(), expected.history());
        }
    }
    assert!(grid.get(nx, 0).is_none());
}

#[test]
fn test_list_preserves_order() {
    let line = simple_line();
    let inits = [(0.0, 0.0), (0.03, 0.0), (0.01, 0.01), (-0.015, 0.0)];
    let list = TrackList::new(&line, &inits);

    assert_eq!(list.particles().len(), inits.len());
    for (p, &(x, px)) in list.particles().iter().zip(&inits) {
        assert_eq!(p.start().x, x);
        assert_eq!(p.start().px, px);
        assert!(same_state(p, &tracked(&line, x, px), 0.0));
    }
}

#[test]
fn test_loss_counts_cover_every_particle() {
    let line = simple_line();
    let list = TrackList::new(&line, &[(0.0, 0.0), (0.03, 0.0), (0.031, 0.0), (0.06, 0.0)]);
    let counts = list.loss_counts();

    assert_eq!(counts.get("CIRCULATING"), Some(&1));
    assert_eq!(counts.get("D2_start"), Some(&2));
    assert_eq!(counts.get("K1_start"), Some(&1));
    assert_eq!(counts.values().sum::<usize>(), 4);
    assert_eq!(loss_counts(list.particles()), counts);
}
