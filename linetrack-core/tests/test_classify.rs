//! Tests for grouping loss labels into categories

use linetrack_core::classify::{LossCategory, LossClassifier};
use linetrack_core::elements::{DoubleApertureDrift, Drift, Element, Septum};
use linetrack_core::particle::{LossLabel, LossLocation, LossStatus};
use linetrack_core::tracking::TrackList;

fn lost(element: &str, location: LossLocation) -> LossStatus {
    LossStatus::Lost(LossLabel {
        element: element.to_string(),
        location,
    })
}

fn extraction_classifier() -> LossClassifier {
    LossClassifier::new(vec![
        LossCategory::new("ZS").containing(&["ZS"]),
        LossCategory::new("ZS blade").containing(&["ZS"]).any_of(&["blade"]),
        LossCategory::new("TPST").containing(&["TPST"]),
        LossCategory::new("Extracted").containing(&["CIRCULATING"]),
    ])
    .with_other("Other")
}

#[test]
fn test_category_matching_rules() {
    let cat = LossCategory::new("septum wires")
        .containing(&["ZS"])
        .excluding(&["extr"])
        .any_of(&["blade", "coll"]);

    assert!(cat.matches("ZS1_down_blade_circ"));
    assert!(cat.matches("ZS5_start_coll"));
    assert!(!cat.matches("ZS1_down_blade_extr"));
    assert!(!cat.matches("ZS1_down_circ"));
    assert!(!cat.matches("QD_start"));
}

#[test]
fn test_last_matching_category_wins() {
    let classifier = extraction_classifier();

    let blade = classifier.classify(&lost("ZS3", LossLocation::DownBladeCirculating));
    assert_eq!(blade.and_then(|i| classifier.category_name(i)), Some("ZS blade"));

    let aperture = classifier.classify(&lost("ZS3", LossLocation::DownExtraction));
    assert_eq!(aperture.and_then(|i| classifier.category_name(i)), Some("ZS"));
}

#[test]
fn test_survivors_and_unmatched_labels() {
    let classifier = extraction_classifier();

    let survivor = classifier.classify(&LossStatus::Circulating);
    assert_eq!(survivor.and_then(|i| classifier.category_name(i)), Some("Extracted"));

    let other = classifier.classify(&lost("QF", LossLocation::Start));
    assert_eq!(other, Some(classifier.categories().len()));
    assert_eq!(classifier.category_name(4), Some("Other"));
    assert_eq!(classifier.category_name(5), None);

    let strict = LossClassifier::new(vec![LossCategory::new("ZS").containing(&["ZS"])]);
    assert_eq!(strict.classify(&lost("QF", LossLocation::Start)), None);
}

#[test]
fn test_tally_counts_tracked_particles() {
    let line: Vec<Element> = vec![
        Drift::new("D", 1.0, 0.1).unwrap().into(),
        Septum::new("ZS", 1.0, 0.001, 0.04, 0.04, 0.004, 0.0, 0.02)
            .unwrap()
            .into(),
        DoubleApertureDrift::new("TPST", 1.0, 0.04, 0.04, 0.004, 0.0, 0.02)
            .unwrap()
            .into(),
    ];
    let inits = [
        (0.0, 0.0),    // survives
        (0.2, 0.0),    // D_start
        (0.04, 0.0),   // ZS_start_blade
        (0.07, 0.0),   // ZS_start_extr
        (0.02, 0.01),  // ZS_down_blade_circ
        (0.03, 0.003), // TPST_down_coll_circ
    ];
    let list = TrackList::new(&line, &inits);
    let tally = extraction_classifier().tally(list.particles());

    let count = |name: &str| tally.iter().find(|(n, _)| n == name).map(|(_, c)| *c);
    assert_eq!(tally.len(), 5);
    assert_eq!(count("Extracted"), Some(1));
    assert_eq!(count("Other"), Some(1));
    assert_eq!(count("ZS blade"), Some(2));
    assert_eq!(count("ZS"), Some(1));
    assert_eq!(count("TPST"), Some(1));
}
