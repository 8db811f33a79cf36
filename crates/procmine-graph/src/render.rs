use crate::graph::ProcessGraph;
use crate::report::InstanceMetrics;
use procmine_core::{EdgeId, VertexId, VertexKind};
use serde::Serialize;
use std::fmt::Write as _;

/// Renderer-facing snapshot of a graph: every vertex and edge decorated
/// with its computed metrics. Rendering itself lives outside this crate; a
/// visualization layer consumes this value (or its JSON form) directly.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedGraph {
    pub process_id: String,
    pub vertices: Vec<AnnotatedVertex>,
    pub edges: Vec<AnnotatedEdge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedVertex {
    pub id: VertexId,
    pub name: String,
    pub kind: VertexKind,
    pub concurrency_rate: f64,
    pub rework: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedEdge {
    pub id: EdgeId,
    pub source: VertexId,
    pub destination: VertexId,
    pub concurrency_rate: f64,
    pub rework: u64,
}

impl AnnotatedGraph {
    /// Snapshot of the bare definition, all metrics zero.
    pub fn from_graph(graph: &ProcessGraph) -> Self {
        Self::assemble(graph, |_| (0.0, 0), |_| (0.0, 0))
    }

    /// Snapshot of a definition decorated with one instance's metrics.
    pub fn from_metrics(graph: &ProcessGraph, metrics: &InstanceMetrics) -> Self {
        Self::assemble(
            graph,
            |id| {
                (
                    metrics.concurrency.vertex_rate(id),
                    metrics.rework.vertex_rework(id),
                )
            },
            |id| {
                (
                    metrics.concurrency.edge_rate(id),
                    metrics.rework.edge_rework(id),
                )
            },
        )
    }

    fn assemble(
        graph: &ProcessGraph,
        vertex_metrics: impl Fn(&str) -> (f64, u64),
        edge_metrics: impl Fn(&str) -> (f64, u64),
    ) -> Self {
        Self {
            process_id: graph.process_id().to_string(),
            vertices: graph
                .vertices()
                .iter()
                .map(|v| {
                    let (concurrency_rate, rework) = vertex_metrics(&v.id);
                    AnnotatedVertex {
                        id: v.id.clone(),
                        name: v.name.clone(),
                        kind: v.kind.clone(),
                        concurrency_rate,
                        rework,
                    }
                })
                .collect(),
            edges: graph
                .edges()
                .iter()
                .map(|e| {
                    let (concurrency_rate, rework) = edge_metrics(&e.id);
                    AnnotatedEdge {
                        id: e.id.clone(),
                        source: e.source.clone(),
                        destination: e.destination.clone(),
                        concurrency_rate,
                        rework,
                    }
                })
                .collect(),
        }
    }

    /// Graphviz DOT rendition: gateways as diamonds labeled by their logic
    /// (`×` for XOR, `+` for AND), START/END as double circles, tasks as
    /// filled ellipses. Nonzero metrics are appended to the node label.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph \"{}\" {{", self.process_id);
        for v in &self.vertices {
            let shape = if v.kind.is_gateway() {
                "diamond"
            } else if matches!(v.kind, VertexKind::Start | VertexKind::End) {
                "doublecircle"
            } else {
                "ellipse"
            };
            let mut label = if v.kind.is_gateway() {
                if v.kind.is_xor() { "×" } else { "+" }.to_string()
            } else {
                v.name.clone()
            };
            if v.concurrency_rate > 0.0 {
                let _ = write!(label, "\\ncr={:.2}", v.concurrency_rate);
            }
            if v.rework > 0 {
                let _ = write!(label, "\\nrw={}", v.rework);
            }
            let _ = writeln!(
                out,
                "    \"{}\" [label=\"{}\", shape={}, style=filled, fillcolor=white];",
                v.id, label, shape
            );
        }
        for e in &self.edges {
            let mut attrs = String::new();
            if e.concurrency_rate > 0.0 || e.rework > 0 {
                let _ = write!(attrs, " [label=\"cr={:.2} rw={}\"]", e.concurrency_rate, e.rework);
            }
            let _ = writeln!(out, "    \"{}\" -> \"{}\"{};", e.source, e.destination, attrs);
        }
        out.push_str("}\n");
        out
    }
}
