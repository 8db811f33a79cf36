use crate::instance::GraphInstance;
use procmine_core::{EdgeId, VertexId};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Rework counts for one instance: for every element,
/// `max(0, occurrences - 1)`, and the instance-wide total. Every vertex and
/// edge of the graph is present; elements with no occurrence carry 0.
#[derive(Debug, Clone, Serialize)]
pub struct ReworkReport {
    pub total: u64,
    pub vertex_rework: HashMap<VertexId, u64>,
    pub edge_rework: HashMap<EdgeId, u64>,
}

impl ReworkReport {
    pub fn vertex_rework(&self, id: &str) -> u64 {
        self.vertex_rework.get(id).copied().unwrap_or(0)
    }

    pub fn edge_rework(&self, id: &str) -> u64 {
        self.edge_rework.get(id).copied().unwrap_or(0)
    }
}

/// Pure multiplicity counting over the instance's occurrence sequences; no
/// temporal or causal reasoning, and no failure mode.
pub fn analyze_rework(instance: &GraphInstance) -> ReworkReport {
    let graph = instance.graph();

    let mut vertex_counts = vec![0u64; graph.vertices().len()];
    for v in instance.vertex_instances() {
        vertex_counts[v.pos] += 1;
    }
    let mut edge_counts = vec![0u64; graph.edges().len()];
    for e in instance.edge_instances() {
        edge_counts[e.pos] += 1;
    }

    let mut total = 0u64;
    let vertex_rework: HashMap<VertexId, u64> = graph
        .vertices()
        .iter()
        .enumerate()
        .map(|(pos, v)| {
            let rework = vertex_counts[pos].saturating_sub(1);
            total += rework;
            (v.id.clone(), rework)
        })
        .collect();
    let edge_rework: HashMap<EdgeId, u64> = graph
        .edges()
        .iter()
        .enumerate()
        .map(|(pos, e)| {
            let rework = edge_counts[pos].saturating_sub(1);
            total += rework;
            (e.id.clone(), rework)
        })
        .collect();

    debug!(pid = %instance.pid(), total, "computed rework");

    ReworkReport {
        total,
        vertex_rework,
        edge_rework,
    }
}
