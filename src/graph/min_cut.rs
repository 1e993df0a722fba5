use crate::graph::residual::ResidualNetwork;
use crate::types::{Capacity, Edge, Graph, Vertex};

/// Minimum cut read off a saturated residual network: the source side is
/// everything still reachable from the source, the cut edges are the graph
/// edges leaving that set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinCut<V> {
    pub source_side: Vec<V>,
    pub edges: Vec<Edge<V>>,
    pub capacity: Capacity,
}

impl<V: Vertex> MinCut<V> {
    /// `sources` may include synthetic vertices of `residual`; only vertices
    /// and edges of `graph` end up in the cut. Vertices fed by edges of
    /// unbounded capacity belong in `sources` as well: their feeding edge can
    /// only run full when the flow already equals the graph's total capacity.
    pub(crate) fn from_residual(graph: &Graph<V>, residual: &ResidualNetwork, sources: &[usize]) -> MinCut<V> {
        let reached = residual.reachable_from(sources);
        let source_side = (0..graph.vertex_count())
            .filter(|v| reached[*v])
            .map(|v| graph.vertex(v).clone())
            .collect();
        let edges: Vec<Edge<V>> = graph
            .edges()
            .iter()
            .enumerate()
            .filter(|(e, edge)| {
                let (from, to) = graph.endpoints(*e);
                edge.capacity > 0 && reached[from] && !reached[to]
            })
            .map(|(_, edge)| edge.clone())
            .collect();
        let capacity = edges.iter().map(|e| e.capacity).sum();
        MinCut {
            source_side,
            edges,
            capacity,
        }
    }

    pub fn on_source_side(&self, vertex: &V) -> bool {
        self.source_side.contains(vertex)
    }
}
