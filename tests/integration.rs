//! End-to-end scenarios over the public API: document loading, threshold
//! filtering, layout, picking, and configuration validation.

use trustviz::controller::{Controller, VizConfig};
use trustviz::graph::{Threshold, TrustGraph, TrustValue};
use trustviz::layout::{
    Dimensions, LayoutKind, LayoutParams, VISIBLE_EXTENT, compute_layout,
};
use trustviz::picking::{SELECTION_RADIUS, pick_nearest, pixel_to_ndc};

const ABC_NETWORK: &str = r#"{
    "worldId": "vibes-network",
    "entities": ["A", "B", "C"],
    "trustMatrix": {
        "A": {"B": 1},
        "B": {"C": -1}
    },
    "created": "2025-03-14T00:00:00Z",
    "description": "three-entity scenario"
}"#;

fn abc_graph() -> TrustGraph {
    let (graph, report) = TrustGraph::from_json(ABC_NETWORK).unwrap();
    assert_eq!(report.dropped_edges, 0);
    graph
}

#[test]
fn threshold_scenario_from_document() {
    let graph = abc_graph();

    let all = graph.filter_by_threshold(Threshold::Neutral);
    let edges: Vec<_> = all.edges().collect();
    assert_eq!(
        edges,
        vec![
            ("A", "B", TrustValue::Positive),
            ("B", "C", TrustValue::Negative),
        ]
    );

    let positive = graph.filter_by_threshold(Threshold::Positive);
    assert_eq!(
        positive.edges().collect::<Vec<_>>(),
        vec![("A", "B", TrustValue::Positive)]
    );

    let negative = graph.filter_by_threshold(Threshold::Negative);
    assert_eq!(
        negative.edges().collect::<Vec<_>>(),
        vec![("B", "C", TrustValue::Negative)]
    );
}

#[test]
fn threshold_zero_never_keeps_neutral_edges() {
    let mut graph = abc_graph();
    graph.set_trust("C", "A", TrustValue::Neutral);
    graph.set_trust("A", "C", TrustValue::Neutral);

    let filtered = graph.filter_by_threshold(Threshold::Neutral);
    assert!(filtered.edges().all(|(_, _, v)| v != TrustValue::Neutral));
}

#[test]
fn threshold_filter_is_idempotent_end_to_end() {
    let graph = abc_graph();
    for threshold in [Threshold::Negative, Threshold::Neutral, Threshold::Positive] {
        let once = graph.filter_by_threshold(threshold);
        let twice = once.filter_by_threshold(threshold);
        assert_eq!(
            once.edges().collect::<Vec<_>>(),
            twice.edges().collect::<Vec<_>>()
        );
    }
}

#[test]
fn stats_account_for_every_edge() {
    let mut graph = abc_graph();
    graph.set_trust("C", "A", TrustValue::Neutral);

    let stats = graph.stats();
    assert_eq!(stats.entity_count, 3);
    assert_eq!(stats.edge_count, 3);
    assert_eq!(
        stats.positive_count + stats.neutral_count + stats.negative_count,
        stats.edge_count
    );
    assert!((stats.density - 3.0 / 6.0).abs() < 1e-12);
}

#[test]
fn force_layout_bounds_hold_for_every_dimensionality() {
    let graph = abc_graph();
    let params = LayoutParams {
        seed: Some(7),
        ..LayoutParams::default()
    };
    for dimensions in [Dimensions::Two, Dimensions::Three] {
        let snapshot =
            compute_layout(&graph, LayoutKind::ForceDirected, dimensions, &params);
        assert_eq!(snapshot.len(), 3);
        for pos in snapshot.positions() {
            for coord in pos {
                assert!(coord.is_finite());
                assert!(coord.abs() <= VISIBLE_EXTENT + 1e-5);
            }
        }
    }
}

#[test]
fn picking_matches_spec_thresholds() {
    let positions = vec![[0.0, 0.0, 0.0]];
    assert_eq!(pick_nearest(0.01, 0.01, &positions, SELECTION_RADIUS), Some(0));
    assert_eq!(pick_nearest(0.5, 0.5, &positions, SELECTION_RADIUS), None);
}

#[test]
fn pixel_mapping_and_picking_compose() {
    // A node at the center of a 400x400 viewport
    let positions = vec![[0.0, 0.0, 0.0]];
    let (ndc_x, ndc_y) = pixel_to_ndc(202.0, 198.0, 400, 400);
    assert_eq!(
        pick_nearest(ndc_x, ndc_y, &positions, SELECTION_RADIUS),
        Some(0)
    );
}

#[test]
fn controller_selection_round_trip() {
    let mut controller = Controller::new(VizConfig {
        layout: LayoutKind::Circular,
        ..VizConfig::default()
    });
    controller.load_graph(ABC_NETWORK).unwrap();

    // Entity A sits at NDC (0.8, 0) on the default 800x600 viewport
    let (px, py) = ((0.8f32 + 1.0) / 2.0 * 800.0, 300.0);
    controller.pointer_down(px, py);
    let event = controller.pointer_up(px, py).unwrap();
    assert_eq!(event.entity, "A");
    assert_eq!(controller.selected_entity(), Some("A"));

    // Selection survives a threshold change that keeps the entity set
    controller.set_threshold(Threshold::Positive);
    assert_eq!(controller.graph().entity_count(), 3);
    assert_eq!(controller.filtered().edge_count(), 1);
}

#[test]
fn malformed_entries_do_not_abort_the_load() {
    let json = r#"{
        "entities": ["A", "B", "C"],
        "trustMatrix": {
            "A": {"B": 1, "A": -1},
            "B": {"ghost": 1, "C": 5},
            "C": {"A": -1}
        }
    }"#;
    let mut controller = Controller::new(VizConfig::default());
    let report = controller.load_graph(json).unwrap();

    // self-edge, unknown target, out-of-range value
    assert_eq!(report.dropped_edges, 3);
    assert_eq!(controller.graph().edge_count(), 2);
    assert_eq!(controller.stats().positive_count, 1);
    assert_eq!(controller.stats().negative_count, 1);
}

#[test]
fn invalid_config_documents_are_rejected_not_clamped() {
    for json in [
        r#"{"layout": "force-directed", "dimensions": 2, "threshold": 2}"#,
        r#"{"layout": "force-directed", "dimensions": 2, "threshold": -2}"#,
        r#"{"layout": "force-directed", "dimensions": 4, "threshold": 0}"#,
        r#"{"layout": "force-directed", "dimensions": 1, "threshold": 0}"#,
        r#"{"layout": "radial", "dimensions": 2, "threshold": 0}"#,
    ] {
        assert!(serde_json::from_str::<VizConfig>(json).is_err(), "{json}");
    }
}

#[test]
fn valid_config_round_trips_through_json() {
    let config = VizConfig {
        layout: LayoutKind::Grid,
        dimensions: Dimensions::Three,
        threshold: Threshold::Negative,
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"grid\""));
    assert!(json.contains("\"dimensions\":3"));
    assert!(json.contains("\"threshold\":-1"));
    let back: VizConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn relayout_after_filter_change_reflects_sub_graph() {
    let mut controller = Controller::new(VizConfig {
        layout: LayoutKind::Grid,
        ..VizConfig::default()
    });
    controller.load_graph(ABC_NETWORK).unwrap();
    let before = controller.snapshot().clone();

    controller.set_threshold(Threshold::Positive);
    // The entity set is unchanged, so the deterministic grid layout is too
    assert_eq!(controller.snapshot(), &before);
    assert_eq!(controller.filtered().edge_count(), 1);

    controller.set_layout(LayoutKind::Circular);
    assert_ne!(controller.snapshot(), &before);
}

#[test]
fn empty_network_is_fully_functional() {
    let mut controller = Controller::new(VizConfig::default());
    controller.load_graph(r#"{"entities": []}"#).unwrap();
    assert_eq!(controller.stats().entity_count, 0);
    assert_eq!(controller.stats().density, 0.0);
    assert!(controller.snapshot().is_empty());

    controller.pointer_down(100.0, 100.0);
    assert!(controller.pointer_up(100.0, 100.0).is_none());
    assert!(!controller.render_frame());
}

#[test]
fn degraded_mode_without_gpu_keeps_queries_working() {
    let mut controller = Controller::new(VizConfig::default());
    controller.load_graph(ABC_NETWORK).unwrap();

    assert!(!controller.gpu_available());
    assert!(controller.read_pixels().is_none());
    assert_eq!(controller.stats().edge_count, 2);
    assert_eq!(controller.snapshot().len(), 3);

    // Redraw scheduling still collapses and consumes without a GPU
    controller.request_redraw();
    controller.request_redraw();
    assert!(!controller.render_frame());
    assert!(!controller.redraw_pending());
}
