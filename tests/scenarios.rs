// tests/scenarios.rs
use approx::assert_abs_diff_eq;
use geo::{Contains, MultiPolygon, Polygon, polygon};
use river_label::io::parse_river_wkt;
use river_label::labeling::*;

fn placer(config: PlacementConfig, units_per_point: f64) -> LabelPlacer<MonospaceMetrics> {
    LabelPlacer::new(config, MonospaceMetrics::new().with_units_per_point(units_per_point))
        .expect("valid config")
}

fn assert_label_inside(polygon: &Polygon<f64>, placement: &Placement) {
    assert!(polygon.contains(&placement.anchor.point));
    assert!(polygon.contains(&placement.label_box.to_polygon()));
}

#[test]
fn straight_horizontal_river_gets_horizontal_label() {
    let river = polygon![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 10.0), (x: 0.0, y: 10.0)];
    let result = placer(PlacementConfig::new().with_padding(1.0), 0.5)
        .place_label(&river.clone().into(), "ELBE")
        .unwrap();

    let placement = result.placement().expect("label should be placed");
    assert_eq!(placement.orientation, OrientationDecision::Horizontal);
    assert_abs_diff_eq!(placement.anchor.point.x, 50.0, epsilon = 1.0);
    assert_abs_diff_eq!(placement.anchor.point.y, 5.0, epsilon = 1.0);
    assert_eq!(placement.font_size, 12.0);
    assert_label_inside(&river, placement);
}

#[test]
fn vertical_river_gets_stacked_label() {
    let river = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 100.0), (x: 0.0, y: 100.0)];
    let result = placer(PlacementConfig::new().with_padding(1.0), 0.5)
        .place_label(&river.clone().into(), "ELBE")
        .unwrap();

    let placement = result.placement().expect("label should be placed");
    assert_eq!(placement.orientation, OrientationDecision::VerticalStacked);
    assert_eq!(placement.text, "E\nL\nB\nE");
    assert!(placement.label_box.height() > placement.label_box.width());
    assert_label_inside(&river, placement);
}

#[test]
fn crescent_anchor_stays_inside_when_centroid_is_outside() {
    let crescent = polygon![
        (x: 0.0, y: 0.0),
        (x: 100.0, y: 0.0),
        (x: 100.0, y: 20.0),
        (x: 20.0, y: 20.0),
        (x: 20.0, y: 80.0),
        (x: 100.0, y: 80.0),
        (x: 100.0, y: 100.0),
        (x: 0.0, y: 100.0),
    ];
    let result = placer(PlacementConfig::new().with_padding(1.0), 0.25)
        .place_label(&crescent.clone().into(), "EMS")
        .unwrap();

    let placement = result.placement().expect("label should be placed");
    assert_ne!(placement.anchor.source, AnchorSource::Centroid);
    assert_label_inside(&crescent, placement);
}

#[test]
fn narrow_river_with_large_padding_is_infeasible() {
    let river = polygon![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 2.0), (x: 0.0, y: 2.0)];
    let outcome = placer(PlacementConfig::new().with_padding(5.0), 1.0)
        .place(&river.into(), "ELBE")
        .unwrap();

    match outcome.result.reason() {
        Some(reason @ InfeasibleReason::InfeasiblePadding { padding, inradius }) => {
            assert_eq!(*padding, 5.0);
            assert!(*inradius < 1.5);
            assert!(reason.to_string().contains("padding"));
        }
        other => panic!("expected infeasible padding, got {:?}", other),
    }
    assert_eq!(outcome.trace.last(), Some(PipelineStage::Infeasible));
    assert!(!outcome.trace.stages().contains(&PipelineStage::Validating));
}

#[test]
fn long_label_is_shrunk_after_retries() {
    let river = polygon![(x: 0.0, y: 0.0), (x: 400.0, y: 0.0), (x: 400.0, y: 10.0), (x: 0.0, y: 10.0)];
    let config = PlacementConfig::new().with_padding(1.0).with_font_sizes(12.0, 6.0);
    let result = placer(config, 1.0)
        .place_label(&river.clone().into(), "MISSISSIPPI RIVER DELTA")
        .unwrap();

    let placement = result.placement().expect("label should fit at a smaller size");
    assert_eq!(placement.font_size, 6.0);
    assert!(placement.attempts > 1);
    assert_label_inside(&river, placement);
}

#[test]
fn long_label_reports_overflow_when_retries_run_out() {
    let river = polygon![(x: 0.0, y: 0.0), (x: 400.0, y: 0.0), (x: 400.0, y: 10.0), (x: 0.0, y: 10.0)];
    let result = placer(PlacementConfig::new().with_padding(1.0), 1.0)
        .place_label(&river.into(), "MISSISSIPPI RIVER DELTA")
        .unwrap();

    match result.reason() {
        Some(InfeasibleReason::LabelOverflow { attempts, min_font_size }) => {
            assert!(*attempts >= 1 && *attempts <= 64);
            assert_eq!(*min_font_size, 8.0);
        }
        other => panic!("expected label overflow, got {:?}", other),
    }
}

#[test]
fn repeated_runs_are_identical() {
    let river = parse_river_wkt(
        "POLYGON ((0 0, 60 10, 120 40, 160 90, 150 100, 110 52, 55 22, -2 12, 0 0))",
    )
    .unwrap();
    let placer = placer(PlacementConfig::new().with_padding(1.0), 0.5);
    let first = placer.place(&river, "ODER").unwrap();
    let second = placer.place(&river, "ODER").unwrap();
    assert_eq!(first, second);
}

#[test]
fn dominant_part_of_multipolygon_is_labelled() {
    let tributary = polygon![(x: 0.0, y: 50.0), (x: 10.0, y: 50.0), (x: 10.0, y: 55.0), (x: 0.0, y: 55.0)];
    let main = polygon![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 10.0), (x: 0.0, y: 10.0)];
    let river: RiverGeometry = MultiPolygon::new(vec![tributary, main.clone()]).into();
    let result = placer(PlacementConfig::new().with_padding(1.0), 0.5)
        .place_label(&river, "ELBE")
        .unwrap();
    assert_label_inside(&main, result.placement().expect("label should be placed"));
}

#[test]
fn misuse_is_not_infeasibility() {
    let river: RiverGeometry =
        polygon![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 10.0), (x: 0.0, y: 10.0)].into();

    assert_eq!(
        LabelPlacer::new(PlacementConfig::new().with_padding(-2.0), MonospaceMetrics::new())
            .unwrap_err(),
        ContractViolation::InvalidPadding(-2.0)
    );
    assert!(matches!(
        LabelPlacer::new(PlacementConfig::new().with_padding(f64::NAN), MonospaceMetrics::new()),
        Err(ContractViolation::InvalidPadding(_))
    ));
    assert!(matches!(
        LabelPlacer::new(PlacementConfig::new().with_font_sizes(6.0, 8.0), MonospaceMetrics::new()),
        Err(ContractViolation::InvalidConfig(_))
    ));

    let placer = placer(PlacementConfig::new().with_padding(1.0), 0.5);
    assert_eq!(placer.place(&river, "").unwrap_err(), ContractViolation::EmptyLabel);
}

#[test]
fn every_failure_has_a_distinct_readable_reason() {
    let placer = placer(PlacementConfig::new().with_padding(1.0), 0.5);
    let empty = RiverGeometry::MultiPolygon(MultiPolygon::new(vec![]));
    let sliver: RiverGeometry =
        polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 0.0), (x: 0.0, y: 0.0)].into();

    for geometry in [empty, sliver] {
        let result = placer.place_label(&geometry, "ELBE").unwrap();
        let reason = result.reason().expect("degenerate input is infeasible");
        assert_eq!(reason, &InfeasibleReason::EmptyGeometry);
        assert!(!reason.to_string().is_empty());
    }
}

#[test]
fn placer_can_be_shared_across_threads() {
    let placer = placer(PlacementConfig::new().with_padding(1.0), 0.5);
    let rivers: Vec<RiverGeometry> = (1..=4)
        .map(|i| {
            let w = 8.0 + i as f64;
            polygon![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: w), (x: 0.0, y: w)].into()
        })
        .collect();

    let shared = &placer;
    let results: Vec<PlacementResult> = std::thread::scope(|scope| {
        let handles: Vec<_> = rivers
            .iter()
            .map(|river| scope.spawn(move || shared.place_label(river, "ELBE").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (river, result) in rivers.iter().zip(&results) {
        assert_eq!(result, &placer.place_label(river, "ELBE").unwrap());
        assert!(result.is_placed());
    }
}

#[test]
fn fallback_padding_rescues_narrow_river() {
    let river = polygon![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 10.0), (x: 0.0, y: 10.0)];
    let config = PlacementConfig::new()
        .with_padding(6.0)
        .with_fallback_paddings(vec![5.5, 1.0]);
    let result = placer(config, 0.5).place_label(&river.clone().into(), "ELBE").unwrap();

    let placement = result.placement().expect("fallback padding should leave room");
    assert_eq!(placement.padding, 1.0);
    assert_label_inside(&river, placement);
}

#[test]
fn attempt_cap_is_respected() {
    let river = polygon![(x: 0.0, y: 0.0), (x: 400.0, y: 0.0), (x: 400.0, y: 10.0), (x: 0.0, y: 10.0)];
    let config = PlacementConfig::new()
        .with_padding(1.0)
        .with_font_sizes(12.0, 6.0)
        .with_max_attempts(4);
    let result = placer(config, 1.0)
        .place_label(&river.into(), "MISSISSIPPI RIVER DELTA")
        .unwrap();
    assert_eq!(
        result.reason(),
        Some(&InfeasibleReason::LabelOverflow { attempts: 4, min_font_size: 6.0 })
    );
}
