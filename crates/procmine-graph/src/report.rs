use crate::concurrency::{analyze_concurrency_with, ConcurrencyPolicy, ConcurrencyReport};
use crate::instance::GraphInstance;
use crate::rework::{analyze_rework, ReworkReport};
use procmine_core::InstanceId;
use rayon::prelude::*;
use serde::Serialize;

/// Combined analysis output for one instance. A value, produced whole by
/// [`analyze`]; an instance is either fully analyzed or not analyzed at all.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceMetrics {
    pub pid: InstanceId,
    pub concurrency: ConcurrencyReport,
    pub rework: ReworkReport,
}

pub fn analyze(instance: &GraphInstance) -> InstanceMetrics {
    analyze_with(instance, ConcurrencyPolicy::default())
}

pub fn analyze_with(instance: &GraphInstance, policy: ConcurrencyPolicy) -> InstanceMetrics {
    InstanceMetrics {
        pid: instance.pid().to_string(),
        concurrency: analyze_concurrency_with(instance, policy),
        rework: analyze_rework(instance),
    }
}

/// Analyze many instances in parallel. The analyzers are pure over
/// immutable inputs, and the shared reachability closure is published
/// once, so the fan-out needs no further coordination.
pub fn analyze_all(instances: &[GraphInstance]) -> Vec<InstanceMetrics> {
    if let Some(first) = instances.first() {
        first.graph().reachability();
    }
    instances.par_iter().map(analyze).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ProcessGraph;
    use crate::raw::RawEvent;
    use std::sync::Arc;

    fn line_graph() -> Arc<ProcessGraph> {
        let json = r#"{
            "vertices": [{"id": "A", "name": "A"}, {"id": "B", "name": "B"}],
            "edges": [{"id": "e1", "source": "A", "destination": "B"}]
        }"#;
        Arc::new(ProcessGraph::parse("p1", json).unwrap())
    }

    #[test]
    fn analyze_bundles_both_passes() {
        let events = vec![
            RawEvent::Vertex {
                id: "A".into(),
                start: 0,
                end: 1000,
            },
            RawEvent::Vertex {
                id: "A".into(),
                start: 2000,
                end: 3000,
            },
        ];
        let instance = GraphInstance::build(line_graph(), "i1", &events).unwrap();
        let metrics = analyze(&instance);
        assert_eq!(metrics.pid, "i1");
        assert_eq!(metrics.rework.total, 1);
        assert_eq!(metrics.concurrency.vertex_rate("A"), 0.0);
    }

    #[test]
    fn analyze_all_matches_sequential_analysis() {
        let graph = line_graph();
        let instances: Vec<GraphInstance> = (0i64..16)
            .map(|i| {
                let events = vec![RawEvent::Vertex {
                    id: "A".into(),
                    start: i * 1000,
                    end: i * 1000 + 500,
                }];
                GraphInstance::build(Arc::clone(&graph), format!("i{i}"), &events).unwrap()
            })
            .collect();
        let parallel = analyze_all(&instances);
        assert_eq!(parallel.len(), instances.len());
        for (metrics, instance) in parallel.iter().zip(&instances) {
            let sequential = analyze(instance);
            assert_eq!(metrics.pid, sequential.pid);
            assert_eq!(metrics.rework.total, sequential.rework.total);
        }
    }

    #[test]
    fn metrics_serialize_for_renderers() {
        let instance = GraphInstance::build(line_graph(), "i1", &[]).unwrap();
        let metrics = analyze(&instance);
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["pid"], "i1");
        assert!(json["concurrency"]["vertex_rates"].is_object());
        assert_eq!(json["rework"]["total"], 0);
    }
}
