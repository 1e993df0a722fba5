use std::cmp::min;
use std::time::Instant;

use log::debug;

use crate::context::CallContext;
use crate::error::FlowError;
use crate::graph::attribution::{attribute, Attribution};
use crate::graph::augmenting_path::find_path;
use crate::graph::min_cut::MinCut;
use crate::graph::residual::ResidualNetwork;
use crate::options::FlowOptions;
use crate::types::{Capacity, EdgeFlow, Graph, Vertex, VertexAmount};

/// Outcome of one (source, sink) query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowResult<V> {
    pub source: V,
    pub sink: V,
    pub total: Capacity,
    pub augmentations: usize,
    /// One entry per graph edge, in graph order.
    pub edge_flows: Vec<EdgeFlow<V>>,
    /// Present when the flow is maximal, i.e. the run was not stopped by a
    /// requested flow value.
    pub min_cut: Option<MinCut<V>>,
}

impl<V: Vertex> FlowResult<V> {
    pub fn flow(&self, from: &V, to: &V) -> Capacity {
        edge_flow(&self.edge_flows, from, to)
    }

    /// Edges carrying positive flow.
    pub fn used_edges(&self) -> impl Iterator<Item = &EdgeFlow<V>> {
        self.edge_flows.iter().filter(|e| e.flow > 0)
    }
}

/// Outcome of a super-source/super-sink run over several origins and
/// destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFlowResult<V> {
    pub origins: Vec<V>,
    pub destinations: Vec<V>,
    pub total: Capacity,
    pub augmentations: usize,
    pub edge_flows: Vec<EdgeFlow<V>>,
    /// Flow leaving each origin.
    pub origin_flows: Vec<VertexAmount<V>>,
    /// Flow arriving at each destination.
    pub destination_flows: Vec<VertexAmount<V>>,
    pub min_cut: Option<MinCut<V>>,
    pub attribution: Attribution<V>,
}

impl<V: Vertex> BatchFlowResult<V> {
    pub fn flow(&self, from: &V, to: &V) -> Capacity {
        edge_flow(&self.edge_flows, from, to)
    }
}

/// Maximum flow from `source` to `sink` without limits or logging.
pub fn max_flow<V: Vertex>(graph: &Graph<V>, source: &V, sink: &V) -> Result<FlowResult<V>, FlowError> {
    compute_flow(graph, source, sink, &FlowOptions::default(), &CallContext::default())
}

/// Edmonds-Karp on a fresh residual network of `graph`.
///
/// `source == sink` is always rejected with `DegenerateQuery`. A sink that
/// cannot be reached is not an error: the result has total 0.
pub fn compute_flow<V: Vertex>(
    graph: &Graph<V>,
    source: &V,
    sink: &V,
    options: &FlowOptions,
    call_context: &CallContext,
) -> Result<FlowResult<V>, FlowError> {
    options.validate()?;
    let s = vertex_index(graph, source)?;
    let t = vertex_index(graph, sink)?;
    if s == t {
        return Err(FlowError::DegenerateQuery {
            vertex: source.to_string(),
        });
    }

    let mut residual = ResidualNetwork::from_graph(graph);
    let outcome = augment(&mut residual, s, t, options, call_context)?;
    if outcome.augmentations == 0 {
        call_context.log_message(&format!("No augmenting path from {source} to {sink}"));
    }
    call_context.log_message(&format!(
        "Max flow {source} -> {sink}: {} ({} augmentations)",
        outcome.total, outcome.augmentations
    ));

    Ok(FlowResult {
        source: source.clone(),
        sink: sink.clone(),
        total: outcome.total,
        augmentations: outcome.augmentations,
        edge_flows: edge_flows(graph, &residual),
        min_cut: outcome
            .saturated
            .then(|| MinCut::from_residual(graph, &residual, &[s])),
    })
}

/// Network-wide maximum flow from all `origins` to all `destinations`.
///
/// A synthetic source feeds every origin and every destination drains into a
/// synthetic sink, both with more capacity than the whole graph holds. The
/// per-pair attribution of the result is an estimate, see `Attribution`.
/// Duplicate entries are ignored; a vertex listed as both origin and
/// destination is a `DegenerateQuery`.
pub fn batch_flow<V: Vertex>(
    graph: &Graph<V>,
    origins: &[V],
    destinations: &[V],
    options: &FlowOptions,
    call_context: &CallContext,
) -> Result<BatchFlowResult<V>, FlowError> {
    options.validate()?;
    let (origin_indices, destination_indices) = query_indices(graph, origins, destinations)?;

    let mut residual = ResidualNetwork::from_graph(graph);
    let super_source = residual.add_vertex();
    let super_sink = residual.add_vertex();
    let unbounded = graph.total_capacity().saturating_add(1);
    let supply_edges: Vec<usize> = origin_indices
        .iter()
        .map(|o| residual.add_edge(super_source, *o, unbounded))
        .collect();
    let demand_edges: Vec<usize> = destination_indices
        .iter()
        .map(|d| residual.add_edge(*d, super_sink, unbounded))
        .collect();

    let outcome = augment(&mut residual, super_source, super_sink, options, call_context)?;
    call_context.log_message(&format!(
        "Network flow from {} origins to {} destinations: {} ({} augmentations)",
        origin_indices.len(),
        destination_indices.len(),
        outcome.total,
        outcome.augmentations
    ));

    let cut_sources: Vec<usize> = std::iter::once(super_source)
        .chain(origin_indices.iter().copied())
        .collect();
    let flows: Vec<Capacity> = (0..graph.edge_count()).map(|e| residual.flow(e)).collect();
    let attribution = attribute(graph, flows, &origin_indices, &destination_indices);
    if attribution.ambiguous {
        call_context.log_message("Flow merges and splits between origins and destinations; attribution is not unique");
    }

    Ok(BatchFlowResult {
        origins: vertices_of(graph, &origin_indices),
        destinations: vertices_of(graph, &destination_indices),
        total: outcome.total,
        augmentations: outcome.augmentations,
        edge_flows: edge_flows(graph, &residual),
        origin_flows: amounts(graph, &origin_indices, &supply_edges, &residual),
        destination_flows: amounts(graph, &destination_indices, &demand_edges, &residual),
        min_cut: outcome
            .saturated
            .then(|| MinCut::from_residual(graph, &residual, &cut_sources)),
        attribution,
    })
}

pub(crate) struct Augmentation {
    pub total: Capacity,
    pub augmentations: usize,
    /// True if the loop ended because no augmenting path was left.
    pub saturated: bool,
}

/// Pushes flow along shortest augmenting paths until none is left, the
/// requested flow is reached or a budget runs out.
pub(crate) fn augment(
    residual: &mut ResidualNetwork,
    source: usize,
    sink: usize,
    options: &FlowOptions,
    call_context: &CallContext,
) -> Result<Augmentation, FlowError> {
    let start_time = Instant::now();
    let time_limit = options.time_limit();
    let mut total: Capacity = 0;
    let mut augmentations = 0;
    loop {
        if let Some(requested) = options.requested_flow {
            if total >= requested {
                return Ok(Augmentation {
                    total,
                    augmentations,
                    saturated: false,
                });
            }
        }
        let Some(path) = find_path(residual, source, sink) else {
            return Ok(Augmentation {
                total,
                augmentations,
                saturated: true,
            });
        };
        let over_budget = options.max_augmentations.is_some_and(|max| augmentations >= max)
            || time_limit.is_some_and(|limit| start_time.elapsed() >= limit);
        if over_budget {
            call_context.log_message(&format!(
                "Giving up after {augmentations} augmentations with flow {total}"
            ));
            return Err(FlowError::BudgetExceeded {
                augmentations,
                flow: total,
            });
        }

        let mut amount = residual.bottleneck(&path);
        if let Some(requested) = options.requested_flow {
            amount = min(amount, requested - total);
        }
        residual.apply_flow(&path, amount);
        total += amount;
        augmentations += 1;
        debug!(
            "augmentation {augmentations}: {amount} over {} arcs, total {total}",
            path.len()
        );
    }
}

pub(crate) fn vertex_index<V: Vertex>(graph: &Graph<V>, vertex: &V) -> Result<usize, FlowError> {
    graph.index_of(vertex).ok_or_else(|| FlowError::UnknownVertex {
        vertex: vertex.to_string(),
    })
}

/// Resolves an origin and a destination list, dropping duplicates. Both must
/// be non-empty and disjoint.
pub(crate) fn query_indices<V: Vertex>(
    graph: &Graph<V>,
    origins: &[V],
    destinations: &[V],
) -> Result<(Vec<usize>, Vec<usize>), FlowError> {
    if origins.is_empty() || destinations.is_empty() {
        return Err(FlowError::EmptyQuery);
    }
    let origins = unique_indices(graph, origins)?;
    let destinations = unique_indices(graph, destinations)?;
    if let Some(v) = origins.iter().find(|o| destinations.contains(o)) {
        return Err(FlowError::DegenerateQuery {
            vertex: graph.vertex(*v).to_string(),
        });
    }
    Ok((origins, destinations))
}

fn unique_indices<V: Vertex>(graph: &Graph<V>, vertices: &[V]) -> Result<Vec<usize>, FlowError> {
    let mut indices = Vec::with_capacity(vertices.len());
    for vertex in vertices {
        let i = vertex_index(graph, vertex)?;
        if !indices.contains(&i) {
            indices.push(i);
        }
    }
    Ok(indices)
}

fn vertices_of<V: Vertex>(graph: &Graph<V>, indices: &[usize]) -> Vec<V> {
    indices.iter().map(|i| graph.vertex(*i).clone()).collect()
}

fn edge_flows<V: Vertex>(graph: &Graph<V>, residual: &ResidualNetwork) -> Vec<EdgeFlow<V>> {
    graph
        .edges()
        .iter()
        .enumerate()
        .map(|(e, edge)| EdgeFlow {
            from: edge.from.clone(),
            to: edge.to.clone(),
            capacity: edge.capacity,
            flow: residual.flow(e),
        })
        .collect()
}

fn edge_flow<V: Vertex>(edge_flows: &[EdgeFlow<V>], from: &V, to: &V) -> Capacity {
    edge_flows
        .iter()
        .find(|e| e.from == *from && e.to == *to)
        .map(|e| e.flow)
        .unwrap_or(0)
}

fn amounts<V: Vertex>(
    graph: &Graph<V>,
    vertices: &[usize],
    edges: &[usize],
    residual: &ResidualNetwork,
) -> Vec<VertexAmount<V>> {
    vertices
        .iter()
        .zip(edges)
        .map(|(v, e)| VertexAmount {
            vertex: graph.vertex(*v).clone(),
            amount: residual.flow(*e),
        })
        .collect()
}
