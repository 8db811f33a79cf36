use crate::instance::GraphInstance;
use crate::reachability::Reachability;
use chrono::{DateTime, Utc};
use procmine_core::{EdgeId, VertexId};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::debug;

/// Eligibility policy for the causal-order test. An element is never
/// concurrent with itself under the default because reachability includes
/// the identity path; flipping `self_concurrency` makes two occurrences of
/// the same element eligible partners (the same occurrence still never
/// pairs with itself).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcurrencyPolicy {
    pub self_concurrency: bool,
}

/// Per-element concurrency rates for one instance. Every vertex and edge of
/// the graph is present; elements with no occurrence carry 0.0.
#[derive(Debug, Clone, Serialize)]
pub struct ConcurrencyReport {
    pub vertex_rates: HashMap<VertexId, f64>,
    pub edge_rates: HashMap<EdgeId, f64>,
}

impl ConcurrencyReport {
    pub fn vertex_rate(&self, id: &str) -> f64 {
        self.vertex_rates.get(id).copied().unwrap_or(0.0)
    }

    pub fn edge_rate(&self, id: &str) -> f64 {
        self.edge_rates.get(id).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy)]
enum Element {
    Vertex(usize),
    Edge {
        pos: usize,
        source: usize,
        destination: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Occurrence {
    element: Element,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

pub fn analyze_concurrency(instance: &GraphInstance) -> ConcurrencyReport {
    analyze_concurrency_with(instance, ConcurrencyPolicy::default())
}

/// Sweep the instance's occurrences in start order, keeping an active set of
/// intervals still open at the current start time. Each new occurrence is
/// paired against the active set only, so candidate pairs are limited to
/// actual temporal overlaps; the precomputed reachability closure answers
/// each causal-order check in O(1).
pub fn analyze_concurrency_with(
    instance: &GraphInstance,
    policy: ConcurrencyPolicy,
) -> ConcurrencyReport {
    let graph = instance.graph();
    let reach = graph.reachability();

    let mut occurrences: Vec<Occurrence> = Vec::with_capacity(
        instance.vertex_instances().len() + instance.edge_instances().len(),
    );
    for v in instance.vertex_instances() {
        occurrences.push(Occurrence {
            element: Element::Vertex(v.pos),
            start: v.start,
            end: v.end,
        });
    }
    for e in instance.edge_instances() {
        let (source, destination) = graph.edge_endpoints(e.pos);
        occurrences.push(Occurrence {
            element: Element::Edge {
                pos: e.pos,
                source,
                destination,
            },
            start: e.at,
            end: e.at,
        });
    }
    occurrences.sort_by_key(|o| o.start);

    let mut counts = vec![0u32; occurrences.len()];
    let mut active: HashSet<usize> = HashSet::new();
    let mut by_end: BinaryHeap<Reverse<(DateTime<Utc>, usize)>> = BinaryHeap::new();

    for i in 0..occurrences.len() {
        let start = occurrences[i].start;
        // Intervals are inclusive, so an occurrence ending exactly at
        // `start` still overlaps and stays active.
        while let Some(&Reverse((end, j))) = by_end.peek() {
            if end < start {
                by_end.pop();
                active.remove(&j);
            } else {
                break;
            }
        }
        for &j in &active {
            pair(&occurrences, i, j, reach, policy, &mut counts);
        }
        active.insert(i);
        by_end.push(Reverse((occurrences[i].end, i)));
    }

    let mut vertex_total = vec![0u32; graph.vertices().len()];
    let mut vertex_flagged = vec![0u32; graph.vertices().len()];
    let mut edge_total = vec![0u32; graph.edges().len()];
    let mut edge_flagged = vec![0u32; graph.edges().len()];
    for (i, occ) in occurrences.iter().enumerate() {
        match occ.element {
            Element::Vertex(pos) => {
                vertex_total[pos] += 1;
                if counts[i] > 0 {
                    vertex_flagged[pos] += 1;
                }
            }
            Element::Edge { pos, .. } => {
                edge_total[pos] += 1;
                if counts[i] > 0 {
                    edge_flagged[pos] += 1;
                }
            }
        }
    }

    let vertex_rates = graph
        .vertices()
        .iter()
        .enumerate()
        .map(|(pos, v)| (v.id.clone(), rate(vertex_flagged[pos], vertex_total[pos])))
        .collect();
    let edge_rates = graph
        .edges()
        .iter()
        .enumerate()
        .map(|(pos, e)| (e.id.clone(), rate(edge_flagged[pos], edge_total[pos])))
        .collect();

    debug!(
        pid = %instance.pid(),
        occurrences = occurrences.len(),
        "computed concurrency rates"
    );

    ConcurrencyReport {
        vertex_rates,
        edge_rates,
    }
}

/// Credit the overlapping pair (i, j) according to element kinds. Vertex
/// occurrences only count vertex partners; edge occurrences count both
/// vertex intervals containing their instant and other edge occurrences at
/// the same instant. The sweep guarantees temporal overlap before this is
/// called.
fn pair(
    occurrences: &[Occurrence],
    i: usize,
    j: usize,
    reach: &Reachability,
    policy: ConcurrencyPolicy,
    counts: &mut [u32],
) {
    match (occurrences[i].element, occurrences[j].element) {
        (Element::Vertex(a), Element::Vertex(b)) => {
            if eligible_vertices(reach, policy, a, b) {
                counts[i] += 1;
                counts[j] += 1;
            }
        }
        (Element::Vertex(w), Element::Edge { source, destination, .. }) => {
            if eligible_edge_vertex(reach, source, destination, w) {
                counts[j] += 1;
            }
        }
        (Element::Edge { source, destination, .. }, Element::Vertex(w)) => {
            if eligible_edge_vertex(reach, source, destination, w) {
                counts[i] += 1;
            }
        }
        (
            Element::Edge {
                pos: p1,
                source: s1,
                destination: d1,
            },
            Element::Edge {
                pos: p2,
                source: s2,
                destination: d2,
            },
        ) => {
            if eligible_edges(reach, policy, (p1, s1, d1), (p2, s2, d2)) {
                counts[i] += 1;
                counts[j] += 1;
            }
        }
    }
}

fn eligible_vertices(reach: &Reachability, policy: ConcurrencyPolicy, a: usize, b: usize) -> bool {
    if a == b {
        return policy.self_concurrency;
    }
    !reach.causally_ordered(a, b)
}

/// A vertex precedes an edge when it reaches the edge's source, and follows
/// it when the edge's destination reaches the vertex; either way the pair is
/// causally ordered. Shared endpoints fall out of the identity path.
fn eligible_edge_vertex(reach: &Reachability, source: usize, destination: usize, w: usize) -> bool {
    !(reach.reaches(w, source) || reach.reaches(destination, w))
}

fn eligible_edges(
    reach: &Reachability,
    policy: ConcurrencyPolicy,
    (p1, s1, d1): (usize, usize, usize),
    (p2, s2, d2): (usize, usize, usize),
) -> bool {
    if p1 == p2 {
        return policy.self_concurrency;
    }
    !(reach.reaches(d1, s2) || reach.reaches(d2, s1))
}

fn rate(flagged: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(flagged) / f64::from(total)
    }
}
