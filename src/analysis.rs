use crate::context::CallContext;
use crate::error::FlowError;
use crate::graph::{batch_flow, compute_flow, BatchFlowResult, PairFlow};
use crate::options::FlowOptions;
use crate::types::{Capacity, Edge, Graph, Vertex, VertexAmount};

/// Capacity report for a network with several origins and destinations,
/// e.g. terminals feeding stores through warehouses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkReport<V> {
    pub vertex_count: usize,
    pub edge_count: usize,
    /// Max flow of every origin/destination pair computed on its own. Pairs
    /// without any flow are left out.
    pub pair_flows: Vec<PairFlow<V>>,
    /// Sum of `pair_flows` per origin. Pairs compete for the same edges, so
    /// this overstates what an origin can deliver at once.
    pub origin_totals: Vec<VertexAmount<V>>,
    /// Sum of `pair_flows` per destination.
    pub destination_totals: Vec<VertexAmount<V>>,
    /// Max flow from each origin alone to all destinations.
    pub origin_capacities: Vec<VertexAmount<V>>,
    /// Max flow from all origins to each destination alone.
    pub destination_capacities: Vec<VertexAmount<V>>,
    /// All origins and destinations at once, with the attribution estimate.
    pub network: BatchFlowResult<V>,
    /// Edges with the smallest positive capacity.
    pub smallest_capacity_edges: Vec<Edge<V>>,
    /// Saturated edges of the network's minimum cut.
    pub bottlenecks: Vec<Edge<V>>,
    /// Destinations by attributed network supply, least supplied first.
    pub least_supplied: Vec<VertexAmount<V>>,
}

impl<V: Vertex> NetworkReport<V> {
    /// Origin with the largest isolated capacity; the first one on ties.
    pub fn strongest_origin(&self) -> Option<&VertexAmount<V>> {
        self.origin_capacities
            .iter()
            .reduce(|best, a| if a.amount > best.amount { a } else { best })
    }
}

pub fn analyze<V: Vertex>(
    graph: &Graph<V>,
    origins: &[V],
    destinations: &[V],
    options: &FlowOptions,
    call_context: &CallContext,
) -> Result<NetworkReport<V>, FlowError> {
    let network = batch_flow(graph, origins, destinations, options, call_context)?;

    let mut pair_flows = Vec::new();
    for origin in &network.origins {
        for destination in &network.destinations {
            let result = compute_flow(graph, origin, destination, options, call_context)?;
            if result.total > 0 {
                pair_flows.push(PairFlow {
                    origin: origin.clone(),
                    destination: destination.clone(),
                    amount: result.total,
                });
            }
        }
    }
    call_context.log_message(&format!(
        "{} of {} pairs can carry flow",
        pair_flows.len(),
        network.origins.len() * network.destinations.len()
    ));

    let origin_totals = network
        .origins
        .iter()
        .map(|o| total_amount(o, pair_flows.iter().filter(|p| p.origin == *o)))
        .collect::<Result<Vec<_>, _>>()?;
    let destination_totals = network
        .destinations
        .iter()
        .map(|d| total_amount(d, pair_flows.iter().filter(|p| p.destination == *d)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut origin_capacities = Vec::new();
    for origin in &network.origins {
        let alone = batch_flow(graph, &[origin.clone()], &network.destinations, options, call_context)?;
        origin_capacities.push(VertexAmount {
            vertex: origin.clone(),
            amount: alone.total,
        });
    }
    let mut destination_capacities = Vec::new();
    for destination in &network.destinations {
        let alone = batch_flow(graph, &network.origins, &[destination.clone()], options, call_context)?;
        destination_capacities.push(VertexAmount {
            vertex: destination.clone(),
            amount: alone.total,
        });
    }

    let bottlenecks = network
        .min_cut
        .as_ref()
        .map(|cut| cut.edges.clone())
        .unwrap_or_default();
    let mut least_supplied = network.attribution.destination_totals.clone();
    least_supplied.sort_by_key(|a| a.amount);

    Ok(NetworkReport {
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
        pair_flows,
        origin_totals,
        destination_totals,
        origin_capacities,
        destination_capacities,
        smallest_capacity_edges: smallest_capacity_edges(graph),
        bottlenecks,
        least_supplied,
        network,
    })
}

/// Isolated pair flows may share edges, so their sum is not bounded by the
/// graph's total capacity.
fn total_amount<'a, V: Vertex + 'a>(
    vertex: &V,
    pairs: impl Iterator<Item = &'a PairFlow<V>>,
) -> Result<VertexAmount<V>, FlowError> {
    let mut amount: Capacity = 0;
    for pair in pairs {
        amount = amount
            .checked_add(pair.amount)
            .ok_or_else(|| FlowError::CapacityOverflow {
                from: pair.origin.to_string(),
                to: pair.destination.to_string(),
            })?;
    }
    Ok(VertexAmount {
        vertex: vertex.clone(),
        amount,
    })
}

fn smallest_capacity_edges<V: Vertex>(graph: &Graph<V>) -> Vec<Edge<V>> {
    let positive = || graph.edges().iter().filter(|e| e.capacity > 0);
    match positive().map(|e| e.capacity).min() {
        Some(smallest) => positive()
            .filter(|e| e.capacity == smallest)
            .cloned()
            .collect(),
        None => vec![],
    }
}
