use procmine_core::{ProcMineError, Result};
use serde::{Deserialize, Serialize};

/// Wire representation of a process-graph definition as the mining service
/// returns it. Parsing into [`crate::ProcessGraph`] validates referential
/// integrity; this layer only enforces shape and field types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGraph {
    pub vertices: Vec<RawVertex>,
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVertex {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEdge {
    pub id: String,
    pub source: String,
    pub destination: String,
}

/// One occurrence record from an instance event log. Timestamps are epoch
/// milliseconds; vertex events carry a [start, end] window, edge events a
/// single transition instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RawEvent {
    Vertex { id: String, start: i64, end: i64 },
    Edge { id: String, at: i64 },
}

impl RawEvent {
    pub fn element_id(&self) -> &str {
        match self {
            RawEvent::Vertex { id, .. } | RawEvent::Edge { id, .. } => id,
        }
    }
}

/// Parse a raw event-log payload. Shape errors surface as
/// [`ProcMineError::Serialization`]; referential checks happen later in
/// [`crate::GraphInstance::build`].
pub fn parse_events(json: &str) -> Result<Vec<RawEvent>> {
    Ok(serde_json::from_str(json)?)
}

impl RawGraph {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ProcMineError::MalformedGraph(format!("invalid graph payload: {}", e)))
    }
}
