use serde::{Deserialize, Serialize};
use std::fmt;

pub type VertexId = String;
pub type EdgeId = String;
pub type ProcessId = String;
pub type InstanceId = String;

/// Category of a process-graph vertex as modeled by the mining service.
///
/// The service reports categories either in canonical form (`AND_SPLIT`) or
/// in raw API form (`gateway_and_split`); vertices without a category fall
/// back to inference from their name, everything unrecognized is a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    Start,
    End,
    Task,
    AndSplit,
    XorSplit,
    AndJoin,
    XorJoin,
}

impl VertexKind {
    pub fn infer(category: Option<&str>, name: &str) -> Self {
        if let Some(category) = category {
            if let Some(kind) = Self::from_canonical(category) {
                return kind;
            }
            return Self::from_api_category(category).unwrap_or(VertexKind::Task);
        }
        Self::from_api_category(name).unwrap_or(VertexKind::Task)
    }

    fn from_canonical(s: &str) -> Option<Self> {
        match s {
            "START" => Some(VertexKind::Start),
            "END" => Some(VertexKind::End),
            "TASK" => Some(VertexKind::Task),
            "AND_SPLIT" => Some(VertexKind::AndSplit),
            "XOR_SPLIT" => Some(VertexKind::XorSplit),
            "AND_JOIN" => Some(VertexKind::AndJoin),
            "XOR_JOIN" => Some(VertexKind::XorJoin),
            _ => None,
        }
    }

    fn from_api_category(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Some(VertexKind::Start),
            "end" => Some(VertexKind::End),
            "gateway_and_split" => Some(VertexKind::AndSplit),
            "gateway_xor_split" => Some(VertexKind::XorSplit),
            "gateway_and_join" => Some(VertexKind::AndJoin),
            "gateway_xor_join" => Some(VertexKind::XorJoin),
            _ => None,
        }
    }

    pub fn is_gateway(&self) -> bool {
        matches!(
            self,
            VertexKind::AndSplit | VertexKind::XorSplit | VertexKind::AndJoin | VertexKind::XorJoin
        )
    }

    pub fn is_xor(&self) -> bool {
        matches!(self, VertexKind::XorSplit | VertexKind::XorJoin)
    }
}

impl Default for VertexKind {
    fn default() -> Self {
        VertexKind::Task
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VertexKind::Start => "START",
            VertexKind::End => "END",
            VertexKind::Task => "TASK",
            VertexKind::AndSplit => "AND_SPLIT",
            VertexKind::XorSplit => "XOR_SPLIT",
            VertexKind::AndJoin => "AND_JOIN",
            VertexKind::XorJoin => "XOR_JOIN",
        };
        write!(f, "{}", s)
    }
}
