use crate::raw::{RawEdge, RawGraph, RawVertex};
use crate::reachability::Reachability;
use once_cell::sync::OnceCell;
use procmine_core::{EdgeId, ProcMineError, ProcessId, Result, VertexId, VertexKind};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub id: VertexId,
    pub name: String,
    pub kind: VertexKind,
}

/// References its endpoints by id only; the owning [`ProcessGraph`]
/// guarantees both exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: VertexId,
    pub destination: VertexId,
}

/// Static process definition: a directed multigraph of steps and
/// transitions. Immutable after construction; the reachability closure is
/// computed once on first use and shared by every instance of the graph.
#[derive(Debug)]
pub struct ProcessGraph {
    process_id: ProcessId,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    vertex_pos: HashMap<VertexId, usize>,
    edge_pos: HashMap<EdgeId, usize>,
    endpoints: Vec<(usize, usize)>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    reachability: OnceCell<Reachability>,
}

impl ProcessGraph {
    /// Parse a graph-definition payload fetched from the mining service.
    pub fn parse(process_id: impl Into<ProcessId>, json: &str) -> Result<Self> {
        Self::from_raw(process_id, RawGraph::from_json(json)?)
    }

    pub fn from_raw(process_id: impl Into<ProcessId>, raw: RawGraph) -> Result<Self> {
        let process_id = process_id.into();

        let mut vertices = Vec::with_capacity(raw.vertices.len());
        let mut vertex_pos = HashMap::with_capacity(raw.vertices.len());
        for RawVertex { id, name, category } in raw.vertices {
            let kind = VertexKind::infer(category.as_deref(), &name);
            if vertex_pos.insert(id.clone(), vertices.len()).is_some() {
                return Err(ProcMineError::MalformedGraph(format!(
                    "duplicate vertex id: {}",
                    id
                )));
            }
            vertices.push(Vertex { id, name, kind });
        }

        let mut edges = Vec::with_capacity(raw.edges.len());
        let mut edge_pos = HashMap::with_capacity(raw.edges.len());
        let mut endpoints = Vec::with_capacity(raw.edges.len());
        let mut outgoing = vec![Vec::new(); vertices.len()];
        let mut incoming = vec![Vec::new(); vertices.len()];
        for RawEdge { id, source, destination } in raw.edges {
            let src = *vertex_pos.get(&source).ok_or_else(|| {
                ProcMineError::MalformedGraph(format!(
                    "edge {} references unknown vertex: {}",
                    id, source
                ))
            })?;
            let dst = *vertex_pos.get(&destination).ok_or_else(|| {
                ProcMineError::MalformedGraph(format!(
                    "edge {} references unknown vertex: {}",
                    id, destination
                ))
            })?;
            if edge_pos.insert(id.clone(), edges.len()).is_some() {
                return Err(ProcMineError::MalformedGraph(format!(
                    "duplicate edge id: {}",
                    id
                )));
            }
            outgoing[src].push(edges.len());
            incoming[dst].push(edges.len());
            endpoints.push((src, dst));
            edges.push(Edge { id, source, destination });
        }

        debug!(
            process_id = %process_id,
            vertices = vertices.len(),
            edges = edges.len(),
            "parsed process graph"
        );

        Ok(Self {
            process_id,
            vertices,
            edges,
            vertex_pos,
            edge_pos,
            endpoints,
            outgoing,
            incoming,
            reachability: OnceCell::new(),
        })
    }

    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex(&self, id: &str) -> Result<&Vertex> {
        self.vertex_pos
            .get(id)
            .map(|&pos| &self.vertices[pos])
            .ok_or_else(|| ProcMineError::NotFound(format!("vertex {}", id)))
    }

    pub fn edge(&self, id: &str) -> Result<&Edge> {
        self.edge_pos
            .get(id)
            .map(|&pos| &self.edges[pos])
            .ok_or_else(|| ProcMineError::NotFound(format!("edge {}", id)))
    }

    pub fn contains_vertex(&self, id: &str) -> bool {
        self.vertex_pos.contains_key(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge_pos.contains_key(id)
    }

    pub fn outgoing_edges(&self, vertex_id: &str) -> Result<Vec<&Edge>> {
        let pos = self.require_vertex(vertex_id)?;
        Ok(self.outgoing[pos].iter().map(|&e| &self.edges[e]).collect())
    }

    pub fn incoming_edges(&self, vertex_id: &str) -> Result<Vec<&Edge>> {
        let pos = self.require_vertex(vertex_id)?;
        Ok(self.incoming[pos].iter().map(|&e| &self.edges[e]).collect())
    }

    /// Directed reachability between two vertices, identity included.
    pub fn can_reach(&self, from: &str, to: &str) -> Result<bool> {
        let from = self.require_vertex(from)?;
        let to = self.require_vertex(to)?;
        Ok(self.reachability().reaches(from, to))
    }

    /// Transitive closure over the vertex set, computed exactly once per
    /// graph and published for concurrent readers.
    pub fn reachability(&self) -> &Reachability {
        self.reachability.get_or_init(|| {
            let successors: Vec<Vec<usize>> = self
                .outgoing
                .iter()
                .map(|edges| edges.iter().map(|&e| self.endpoints[e].1).collect())
                .collect();
            Reachability::compute(&successors)
        })
    }

    /// Re-serialize to the wire shape. Kind inference is lossy for unknown
    /// categories, so the canonical kind is emitted instead of the raw one.
    pub fn to_raw(&self) -> RawGraph {
        RawGraph {
            vertices: self
                .vertices
                .iter()
                .map(|v| RawVertex {
                    id: v.id.clone(),
                    name: v.name.clone(),
                    category: Some(v.kind.to_string()),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| RawEdge {
                    id: e.id.clone(),
                    source: e.source.clone(),
                    destination: e.destination.clone(),
                })
                .collect(),
        }
    }

    fn require_vertex(&self, id: &str) -> Result<usize> {
        self.vertex_pos
            .get(id)
            .copied()
            .ok_or_else(|| ProcMineError::NotFound(format!("vertex {}", id)))
    }

    pub(crate) fn vertex_position(&self, id: &str) -> Option<usize> {
        self.vertex_pos.get(id).copied()
    }

    pub(crate) fn edge_position(&self, id: &str) -> Option<usize> {
        self.edge_pos.get(id).copied()
    }

    pub(crate) fn edge_endpoints(&self, edge_position: usize) -> (usize, usize) {
        self.endpoints[edge_position]
    }
}
