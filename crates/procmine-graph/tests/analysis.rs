use procmine_core::ProcMineError;
use procmine_graph::{
    analyze, analyze_concurrency, analyze_rework, AnnotatedGraph, GraphInstance, ProcessGraph,
    RawEvent,
};
use std::sync::Arc;

const DIAMOND: &str = r#"{
    "vertices": [
        {"id": "A", "name": "A"},
        {"id": "B", "name": "B"},
        {"id": "C", "name": "C"},
        {"id": "D", "name": "D"}
    ],
    "edges": [
        {"id": "e1", "source": "A", "destination": "B"},
        {"id": "e2", "source": "A", "destination": "C"},
        {"id": "e3", "source": "B", "destination": "D"},
        {"id": "e4", "source": "C", "destination": "D"}
    ]
}"#;

fn diamond() -> Arc<ProcessGraph> {
    Arc::new(ProcessGraph::parse("p1", DIAMOND).unwrap())
}

fn vertex(id: &str, start: i64, end: i64) -> RawEvent {
    RawEvent::Vertex {
        id: id.into(),
        start,
        end,
    }
}

#[test]
fn diamond_branches_run_concurrently() {
    let graph = diamond();
    let instance = GraphInstance::build(
        graph,
        "case-1",
        &[
            vertex("A", 0, 1000),
            vertex("B", 1000, 2000),
            vertex("C", 1000, 2000),
            vertex("D", 3000, 4000),
        ],
    )
    .unwrap();

    let concurrency = analyze_concurrency(&instance);
    assert_eq!(concurrency.vertex_rate("B"), 1.0);
    assert_eq!(concurrency.vertex_rate("C"), 1.0);
    assert_eq!(concurrency.vertex_rate("A"), 0.0);
    assert_eq!(concurrency.vertex_rate("D"), 0.0);

    let rework = analyze_rework(&instance);
    assert_eq!(rework.total, 0);
}

#[test]
fn replayed_step_counts_as_rework_without_touching_concurrency() {
    let graph = diamond();
    let instance = GraphInstance::build(
        graph,
        "case-2",
        &[
            vertex("A", 0, 1000),
            vertex("A", 5000, 6000),
            vertex("B", 1000, 2000),
            vertex("C", 1000, 2000),
            vertex("D", 3000, 4000),
        ],
    )
    .unwrap();

    let metrics = analyze(&instance);
    assert_eq!(metrics.rework.total, 1);
    assert_eq!(metrics.rework.vertex_rework("A"), 1);
    assert_eq!(metrics.concurrency.vertex_rate("B"), 1.0);
    assert_eq!(metrics.concurrency.vertex_rate("C"), 1.0);
    assert_eq!(metrics.concurrency.vertex_rate("A"), 0.0);
}

#[test]
fn edge_to_missing_vertex_is_rejected_naming_it() {
    let json = r#"{
        "vertices": [{"id": "A", "name": "A"}],
        "edges": [{"id": "e1", "source": "A", "destination": "Z"}]
    }"#;
    match ProcessGraph::parse("p1", json).unwrap_err() {
        ProcMineError::MalformedGraph(msg) => assert!(msg.contains('Z')),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn backwards_vertex_window_is_rejected() {
    let graph = diamond();
    let err = GraphInstance::build(graph, "case-4", &[vertex("A", 2000, 1000)]).unwrap_err();
    assert!(matches!(err, ProcMineError::MalformedTimestamp { .. }));
}

#[test]
fn parse_then_reserialize_keeps_id_sets() {
    let graph = diamond();
    let raw = graph.to_raw();
    let reparsed = ProcessGraph::from_raw("p1", raw).unwrap();

    let mut original_vids: Vec<_> = graph.vertices().iter().map(|v| v.id.clone()).collect();
    let mut reparsed_vids: Vec<_> = reparsed.vertices().iter().map(|v| v.id.clone()).collect();
    original_vids.sort();
    reparsed_vids.sort();
    assert_eq!(original_vids, reparsed_vids);

    let mut original_eids: Vec<_> = graph.edges().iter().map(|e| e.id.clone()).collect();
    let mut reparsed_eids: Vec<_> = reparsed.edges().iter().map(|e| e.id.clone()).collect();
    original_eids.sort();
    reparsed_eids.sort();
    assert_eq!(original_eids, reparsed_eids);
}

#[test]
fn rates_stay_within_bounds_and_rework_matches_multiplicity() {
    let graph = diamond();
    // A busy case: every element several times, some overlapping.
    let instance = GraphInstance::build(
        graph,
        "case-5",
        &[
            vertex("A", 0, 1000),
            vertex("B", 500, 1500),
            vertex("C", 900, 1100),
            vertex("B", 1000, 1200),
            vertex("D", 1100, 1300),
            vertex("A", 1200, 1250),
            RawEvent::Edge {
                id: "e1".into(),
                at: 1000,
            },
            RawEvent::Edge {
                id: "e1".into(),
                at: 1200,
            },
            RawEvent::Edge {
                id: "e4".into(),
                at: 1100,
            },
        ],
    )
    .unwrap();

    let metrics = analyze(&instance);
    for rate in metrics
        .concurrency
        .vertex_rates
        .values()
        .chain(metrics.concurrency.edge_rates.values())
    {
        assert!((0.0..=1.0).contains(rate), "rate {rate} out of bounds");
    }

    // rework_total == sum(max(0, count - 1)): A x2, B x2, e1 x2, rest once.
    assert_eq!(metrics.rework.total, 3);
}

#[test]
fn lone_occurrence_never_pairs_with_itself() {
    let graph = diamond();
    let instance = GraphInstance::build(graph, "case-6", &[vertex("B", 0, 1000)]).unwrap();
    let concurrency = analyze_concurrency(&instance);
    assert_eq!(concurrency.vertex_rate("B"), 0.0);
}

#[test]
fn annotated_snapshot_carries_metrics_for_renderers() {
    let graph = diamond();
    let instance = GraphInstance::build(
        Arc::clone(&graph),
        "case-7",
        &[
            vertex("B", 1000, 2000),
            vertex("C", 1000, 2000),
            vertex("C", 5000, 6000),
        ],
    )
    .unwrap();
    let metrics = analyze(&instance);
    let annotated = AnnotatedGraph::from_metrics(&graph, &metrics);

    let c = annotated.vertices.iter().find(|v| v.id == "C").unwrap();
    assert_eq!(c.concurrency_rate, 0.5);
    assert_eq!(c.rework, 1);

    let json = serde_json::to_value(&annotated).unwrap();
    assert_eq!(json["process_id"], "p1");
    assert_eq!(json["vertices"].as_array().unwrap().len(), 4);
}

#[test]
fn event_log_parses_from_service_payload() {
    let graph = diamond();
    let payload = r#"[
        {"kind": "vertex", "id": "A", "start": 0, "end": 1000},
        {"kind": "edge", "id": "e1", "at": 1000},
        {"kind": "vertex", "id": "B", "start": 1000, "end": 2000}
    ]"#;
    let instance = GraphInstance::parse(graph, "case-8", payload).unwrap();
    assert_eq!(instance.vertex_instances().len(), 2);
    assert_eq!(instance.edge_instances().len(), 1);
}
