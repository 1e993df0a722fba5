use std::collections::{HashMap, VecDeque};

use crate::error::FlowError;
use crate::graph::flow::{query_indices, vertex_index};
use crate::types::{Capacity, EdgeFlow, Graph, Vertex, VertexAmount};

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct PairFlow<V> {
    pub origin: V,
    pub destination: V,
    pub amount: Capacity,
}

/// Estimated split of a multi-origin flow into (origin, destination) pairs.
///
/// When flow from several origins merges at a vertex and later fans out to
/// several destinations, the flow alone does not say which origin feeds which
/// destination. The split reported here is one consistent choice, obtained by
/// walking shortest carrying paths from each origin in turn (origins in the
/// given order, edges in graph order) and charging every path with the
/// smallest flow along it. It is never claimed to be exact:
///
/// * per origin, the attributed amounts add up to at most the flow leaving it,
/// * per destination, to at most the flow arriving there,
/// * `ambiguous` is set when some vertex receives flow from two or more
///   origins and passes flow on to two or more destinations, i.e. when a
///   different but equally valid split may exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution<V> {
    /// Pairs with a positive amount, ordered by origin, then destination.
    pub pairs: Vec<PairFlow<V>>,
    pub origin_totals: Vec<VertexAmount<V>>,
    pub destination_totals: Vec<VertexAmount<V>>,
    /// Net origin outflow that could not be traced to any destination.
    pub unattributed: Capacity,
    pub ambiguous: bool,
}

impl<V: Vertex> Attribution<V> {
    pub fn amount(&self, origin: &V, destination: &V) -> Capacity {
        self.pairs
            .iter()
            .find(|p| p.origin == *origin && p.destination == *destination)
            .map(|p| p.amount)
            .unwrap_or(0)
    }

    pub fn attributed(&self) -> Capacity {
        self.pairs.iter().map(|p| p.amount).sum()
    }
}

/// Attributes an explicit per-edge flow assignment (for example the
/// `edge_flows` of a flow result) to origin/destination pairs.
///
/// Entries for the same edge are added up. A negative amount, or a total above
/// the edge's capacity, fails with `InvalidFlow`.
pub fn attribute_flow<V: Vertex>(
    graph: &Graph<V>,
    assignment: &[EdgeFlow<V>],
    origins: &[V],
    destinations: &[V],
) -> Result<Attribution<V>, FlowError> {
    let (origins, destinations) = query_indices(graph, origins, destinations)?;
    let mut flows: Vec<Capacity> = vec![0; graph.edge_count()];
    for edge_flow in assignment {
        let e = edge_index(graph, &edge_flow.from, &edge_flow.to)?;
        let invalid = || FlowError::InvalidFlow {
            from: edge_flow.from.to_string(),
            to: edge_flow.to.to_string(),
            flow: edge_flow.flow,
        };
        if edge_flow.flow < 0 {
            return Err(invalid());
        }
        flows[e] = flows[e]
            .checked_add(edge_flow.flow)
            .filter(|flow| *flow <= graph.edges()[e].capacity)
            .ok_or_else(invalid)?;
    }
    Ok(attribute(graph, flows, &origins, &destinations))
}

pub(crate) fn attribute<V: Vertex>(
    graph: &Graph<V>,
    mut flows: Vec<Capacity>,
    origins: &[usize],
    destinations: &[usize],
) -> Attribution<V> {
    let ambiguous = is_ambiguous(graph, &flows, origins, destinations);

    // Net outflow per vertex.
    let mut balance: Vec<Capacity> = vec![0; graph.vertex_count()];
    for (e, flow) in flows.iter().enumerate() {
        let (from, to) = graph.endpoints(e);
        balance[from] += flow;
        balance[to] -= flow;
    }
    let mut supply: Vec<Capacity> = vec![0; graph.vertex_count()];
    for o in origins {
        supply[*o] = balance[*o].max(0);
    }
    let mut absorb: Vec<Capacity> = vec![0; graph.vertex_count()];
    for d in destinations {
        absorb[*d] = (-balance[*d]).max(0);
    }

    let mut attributed: HashMap<(usize, usize), Capacity> = HashMap::new();
    for &origin in origins {
        while supply[origin] > 0 {
            let Some((path, destination)) = carrying_path(graph, &flows, &absorb, origin) else {
                break;
            };
            let amount = path
                .iter()
                .map(|e| flows[*e])
                .fold(supply[origin].min(absorb[destination]), Capacity::min);
            for e in &path {
                flows[*e] -= amount;
            }
            supply[origin] -= amount;
            absorb[destination] -= amount;
            *attributed.entry((origin, destination)).or_default() += amount;
        }
    }

    let mut pairs = Vec::new();
    for o in origins {
        for d in destinations {
            if let Some(amount) = attributed.get(&(*o, *d)).filter(|a| **a > 0) {
                pairs.push(PairFlow {
                    origin: graph.vertex(*o).clone(),
                    destination: graph.vertex(*d).clone(),
                    amount: *amount,
                });
            }
        }
    }
    let total_for = |v: usize, is_origin: bool| -> Capacity {
        attributed
            .iter()
            .filter(|((o, d), _)| if is_origin { *o == v } else { *d == v })
            .map(|(_, amount)| *amount)
            .sum()
    };
    let origin_totals = origins
        .iter()
        .map(|o| VertexAmount {
            vertex: graph.vertex(*o).clone(),
            amount: total_for(*o, true),
        })
        .collect();
    let destination_totals = destinations
        .iter()
        .map(|d| VertexAmount {
            vertex: graph.vertex(*d).clone(),
            amount: total_for(*d, false),
        })
        .collect();

    Attribution {
        pairs,
        origin_totals,
        destination_totals,
        unattributed: origins.iter().map(|o| supply[*o]).sum(),
        ambiguous,
    }
}

/// Shortest path over edges still carrying flow from `origin` to the first
/// vertex that can absorb more. Returns the edges and the destination.
fn carrying_path<V: Vertex>(
    graph: &Graph<V>,
    flows: &[Capacity],
    absorb: &[Capacity],
    origin: usize,
) -> Option<(Vec<usize>, usize)> {
    let mut parent: Vec<Option<usize>> = vec![None; graph.vertex_count()];
    let mut visited = vec![false; graph.vertex_count()];
    visited[origin] = true;
    let mut queue = VecDeque::from([origin]);
    while let Some(vertex) = queue.pop_front() {
        for &e in graph.outgoing_edges(vertex) {
            let (_, to) = graph.endpoints(e);
            if visited[to] || flows[e] <= 0 {
                continue;
            }
            visited[to] = true;
            parent[to] = Some(e);
            if absorb[to] > 0 {
                let mut path = Vec::new();
                let mut current = to;
                while let Some(e) = parent[current] {
                    path.push(e);
                    current = graph.endpoints(e).0;
                }
                path.reverse();
                return Some((path, to));
            }
            queue.push_back(to);
        }
    }
    None
}

fn is_ambiguous<V: Vertex>(
    graph: &Graph<V>,
    flows: &[Capacity],
    origins: &[usize],
    destinations: &[usize],
) -> bool {
    let n = graph.vertex_count();
    let mut forward: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut backward: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (e, flow) in flows.iter().enumerate() {
        if *flow > 0 {
            let (from, to) = graph.endpoints(e);
            forward[from].push(to);
            backward[to].push(from);
        }
    }
    let mut upstream_origins = vec![0usize; n];
    for o in origins {
        for (v, reached) in reach(&forward, *o).into_iter().enumerate() {
            if reached {
                upstream_origins[v] += 1;
            }
        }
    }
    let mut downstream_destinations = vec![0usize; n];
    for d in destinations {
        for (v, reached) in reach(&backward, *d).into_iter().enumerate() {
            if reached {
                downstream_destinations[v] += 1;
            }
        }
    }
    (0..n).any(|v| upstream_origins[v] >= 2 && downstream_destinations[v] >= 2)
}

fn reach(adjacency: &[Vec<usize>], start: usize) -> Vec<bool> {
    let mut reached = vec![false; adjacency.len()];
    reached[start] = true;
    let mut queue = VecDeque::from([start]);
    while let Some(v) = queue.pop_front() {
        for &w in &adjacency[v] {
            if !reached[w] {
                reached[w] = true;
                queue.push_back(w);
            }
        }
    }
    reached
}

fn edge_index<V: Vertex>(graph: &Graph<V>, from: &V, to: &V) -> Result<usize, FlowError> {
    let f = vertex_index(graph, from)?;
    let t = vertex_index(graph, to)?;
    graph
        .outgoing_edges(f)
        .iter()
        .copied()
        .find(|e| graph.endpoints(*e).1 == t)
        .ok_or_else(|| FlowError::UnknownEdge {
            from: from.to_string(),
            to: to.to_string(),
        })
}
