use crate::graph::ProcessGraph;
use crate::raw::{parse_events, RawEvent};
use chrono::{DateTime, Utc};
use procmine_core::{EdgeId, InstanceId, ProcMineError, Result, VertexId};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// One occurrence of a process step within one execution. `end == start`
/// for instantaneous events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VertexInstance {
    pub vertex: VertexId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    // Position of the vertex in the owning graph, resolved at build time.
    #[serde(skip)]
    pub(crate) pos: usize,
}

/// One occurrence of a transition, a single point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeInstance {
    pub edge: EdgeId,
    pub at: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) pos: usize,
}

/// One complete concrete execution of a [`ProcessGraph`]: the event log
/// replayed against the definition, with occurrences kept in start order.
/// Immutable once built; analysis runs as separate passes over it.
#[derive(Debug, Clone)]
pub struct GraphInstance {
    pid: InstanceId,
    graph: Arc<ProcessGraph>,
    vertex_instances: Vec<VertexInstance>,
    edge_instances: Vec<EdgeInstance>,
}

impl GraphInstance {
    /// Parse an event-log payload fetched from the mining service and
    /// replay it against `graph`.
    pub fn parse(graph: Arc<ProcessGraph>, pid: impl Into<InstanceId>, json: &str) -> Result<Self> {
        let events = parse_events(json)?;
        Self::build(graph, pid, &events)
    }

    /// Attach an event log to a graph. Events arrive in no particular
    /// order; occurrences are stable-sorted by start time so equal
    /// timestamps keep their input order.
    pub fn build(
        graph: Arc<ProcessGraph>,
        pid: impl Into<InstanceId>,
        events: &[RawEvent],
    ) -> Result<Self> {
        let pid = pid.into();
        let mut vertex_instances = Vec::new();
        let mut edge_instances = Vec::new();

        for event in events {
            match event {
                RawEvent::Vertex { id, start, end } => {
                    let Some(pos) = graph.vertex_position(id) else {
                        return Err(ProcMineError::UnknownReference(format!(
                            "vertex {} in instance {}",
                            id, pid
                        )));
                    };
                    if end < start {
                        return Err(ProcMineError::MalformedTimestamp {
                            id: id.clone(),
                            reason: format!("end {} precedes start {}", end, start),
                        });
                    }
                    vertex_instances.push(VertexInstance {
                        vertex: id.clone(),
                        start: millis(id, *start)?,
                        end: millis(id, *end)?,
                        pos,
                    });
                }
                RawEvent::Edge { id, at } => {
                    let Some(pos) = graph.edge_position(id) else {
                        return Err(ProcMineError::UnknownReference(format!(
                            "edge {} in instance {}",
                            id, pid
                        )));
                    };
                    edge_instances.push(EdgeInstance {
                        edge: id.clone(),
                        at: millis(id, *at)?,
                        pos,
                    });
                }
            }
        }

        vertex_instances.sort_by_key(|v| v.start);
        edge_instances.sort_by_key(|e| e.at);

        debug!(
            pid = %pid,
            vertex_events = vertex_instances.len(),
            edge_events = edge_instances.len(),
            "built graph instance"
        );

        Ok(Self {
            pid,
            graph,
            vertex_instances,
            edge_instances,
        })
    }

    pub fn pid(&self) -> &str {
        &self.pid
    }

    pub fn graph(&self) -> &Arc<ProcessGraph> {
        &self.graph
    }

    pub fn vertex_instances(&self) -> &[VertexInstance] {
        &self.vertex_instances
    }

    pub fn edge_instances(&self) -> &[EdgeInstance] {
        &self.edge_instances
    }
}

fn millis(id: &str, ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| ProcMineError::MalformedTimestamp {
        id: id.to_string(),
        reason: format!("{} is out of range", ms),
    })
}
