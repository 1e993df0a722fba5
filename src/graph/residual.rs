use std::collections::VecDeque;

use crate::graph::augmenting_path::Path;
use crate::types::{Capacity, Graph, Vertex};

#[derive(Debug, Clone)]
struct Arc {
    to: usize,
    remaining: Capacity,
}

/// Residual network over dense vertex indices.
///
/// Every logical edge `e` owns the arc pair `2e` (forward) and `2e + 1`
/// (reverse), so the partner of arc `a` is `a ^ 1`. The forward arc starts
/// with the edge's capacity, the reverse arc with zero; their sum never
/// changes and the reverse arc holds the flow pushed so far.
#[derive(Debug, Clone)]
pub struct ResidualNetwork {
    arcs: Vec<Arc>,
    capacities: Vec<Capacity>,
    outgoing: Vec<Vec<usize>>,
}

impl ResidualNetwork {
    /// Residual network of `graph` with all edges unused. Edge `e` of the
    /// graph keeps index `e` here.
    pub fn from_graph<V: Vertex>(graph: &Graph<V>) -> Self {
        let mut network = ResidualNetwork::with_vertices(graph.vertex_count());
        for (e, edge) in graph.edges().iter().enumerate() {
            let (from, to) = graph.endpoints(e);
            network.add_edge(from, to, edge.capacity);
        }
        network
    }

    pub(crate) fn with_vertices(vertex_count: usize) -> Self {
        ResidualNetwork {
            arcs: Vec::new(),
            capacities: Vec::new(),
            outgoing: vec![Vec::new(); vertex_count],
        }
    }

    /// Adds a vertex with no edges and returns its index.
    pub(crate) fn add_vertex(&mut self) -> usize {
        self.outgoing.push(Vec::new());
        self.outgoing.len() - 1
    }

    /// Adds an edge and returns its index.
    pub(crate) fn add_edge(&mut self, from: usize, to: usize, capacity: Capacity) -> usize {
        let edge = self.capacities.len();
        self.capacities.push(capacity);
        self.outgoing[from].push(self.arcs.len());
        self.arcs.push(Arc {
            to,
            remaining: capacity,
        });
        self.outgoing[to].push(self.arcs.len());
        self.arcs.push(Arc {
            to: from,
            remaining: 0,
        });
        edge
    }

    pub fn vertex_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn edge_count(&self) -> usize {
        self.capacities.len()
    }

    /// Residual arcs leaving `vertex` as (arc, head, remaining), forward and
    /// reverse arcs interleaved in edge insertion order.
    pub fn arcs_from(&self, vertex: usize) -> impl Iterator<Item = (usize, usize, Capacity)> + '_ {
        self.outgoing[vertex]
            .iter()
            .map(move |a| (*a, self.arcs[*a].to, self.arcs[*a].remaining))
    }

    pub fn arc_remaining(&self, arc: usize) -> Capacity {
        self.arcs[arc].remaining
    }

    pub fn arc_head(&self, arc: usize) -> usize {
        self.arcs[arc].to
    }

    pub fn arc_tail(&self, arc: usize) -> usize {
        self.arcs[arc ^ 1].to
    }

    /// Remaining capacity from -> to over all residual arcs between the two,
    /// forward or reverse. 0 if there is no such arc.
    pub fn remaining(&self, from: usize, to: usize) -> Capacity {
        if from >= self.vertex_count() {
            return 0;
        }
        self.arcs_from(from)
            .filter(|(_, head, _)| *head == to)
            .map(|(_, _, remaining)| remaining)
            .sum()
    }

    /// Flow currently pushed along edge `edge`.
    pub fn flow(&self, edge: usize) -> Capacity {
        (self.capacities[edge] - self.arcs[2 * edge].remaining).max(0)
    }

    pub fn capacity(&self, edge: usize) -> Capacity {
        self.capacities[edge]
    }

    pub fn bottleneck(&self, path: &Path) -> Capacity {
        path.arcs()
            .iter()
            .map(|a| self.arcs[*a].remaining)
            .min()
            .unwrap_or(0)
    }

    /// Pushes `amount` along `path`: every arc loses `amount`, its partner
    /// gains it.
    ///
    /// Panics if `amount` is negative or exceeds the path's bottleneck. The
    /// check runs before anything is modified, so a path is either fully
    /// applied or not at all.
    pub fn apply_flow(&mut self, path: &Path, amount: Capacity) {
        let bottleneck = self.bottleneck(path);
        assert!(
            (0..=bottleneck).contains(&amount),
            "invariant violation: pushing {amount} along a path with bottleneck {bottleneck}"
        );
        for &arc in path.arcs() {
            self.arcs[arc].remaining -= amount;
            self.arcs[arc ^ 1].remaining += amount;
        }
    }

    /// Vertices reachable from any of `sources` over arcs with remaining
    /// capacity.
    pub fn reachable_from(&self, sources: &[usize]) -> Vec<bool> {
        let mut reached = vec![false; self.vertex_count()];
        let mut queue = VecDeque::new();
        for &source in sources {
            if !reached[source] {
                reached[source] = true;
                queue.push_back(source);
            }
        }
        while let Some(vertex) = queue.pop_front() {
            for (_, head, remaining) in self.arcs_from(vertex) {
                if remaining > 0 && !reached[head] {
                    reached[head] = true;
                    queue.push_back(head);
                }
            }
        }
        reached
    }
}
