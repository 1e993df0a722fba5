use std::collections::HashMap;

use crate::error::FlowError;
use crate::types::{Capacity, Edge, Vertex};

/// Immutable capacity graph.
///
/// Vertices are interned into dense indices in order of first appearance and
/// parallel edges are summed into one logical edge. Edge order is the order in
/// which each (from, to) pair was first seen, which fixes the neighbor order
/// and therefore the tie-breaking of every search run on this graph.
///
/// The sum of all capacities fits into `Capacity`, so flow totals, vertex
/// balances and cut capacities computed on the graph cannot overflow.
#[derive(Debug, Clone)]
pub struct Graph<V> {
    vertices: Vec<V>,
    index: HashMap<V, usize>,
    edges: Vec<Edge<V>>,
    endpoints: Vec<(usize, usize)>,
    outgoing: Vec<Vec<usize>>,
    total_capacity: Capacity,
}

impl<V: Vertex> Graph<V> {
    /// Builds a graph from (from, to, capacity) triples.
    /// Fails on the first negative capacity or once the capacities add up to
    /// more than `Capacity::MAX`; nothing is returned in that case.
    pub fn build<I>(edges: I) -> Result<Graph<V>, FlowError>
    where
        I: IntoIterator<Item = (V, V, Capacity)>,
    {
        Graph::from_edges(edges.into_iter().map(Edge::from))
    }

    pub fn from_edges<I>(edges: I) -> Result<Graph<V>, FlowError>
    where
        I: IntoIterator<Item = Edge<V>>,
    {
        let mut graph = Graph::empty();
        let mut pairs = HashMap::new();
        for edge in edges {
            graph.insert(&mut pairs, edge)?;
        }
        Ok(graph)
    }

    /// Builds a graph from a square capacity matrix whose rows and columns are
    /// named by `labels`. Zero entries mean "no edge"; every label becomes a
    /// vertex even when it has no edges.
    pub fn from_labeled_matrix(labels: Vec<V>, matrix: &[Vec<Capacity>]) -> Result<Graph<V>, FlowError> {
        if matrix.len() != labels.len() {
            return Err(FlowError::InvalidMatrix {
                row: None,
                expected: labels.len(),
                found: matrix.len(),
            });
        }
        let mut graph = Graph::empty();
        for label in &labels {
            graph.intern(label);
        }
        let mut pairs = HashMap::new();
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != labels.len() {
                return Err(FlowError::InvalidMatrix {
                    row: Some(i),
                    expected: labels.len(),
                    found: row.len(),
                });
            }
            for (j, capacity) in row.iter().enumerate() {
                if *capacity != 0 {
                    graph.insert(
                        &mut pairs,
                        Edge::new(labels[i].clone(), labels[j].clone(), *capacity),
                    )?;
                }
            }
        }
        Ok(graph)
    }

    fn empty() -> Graph<V> {
        Graph {
            vertices: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            endpoints: Vec::new(),
            outgoing: Vec::new(),
            total_capacity: 0,
        }
    }

    fn insert(
        &mut self,
        pairs: &mut HashMap<(usize, usize), usize>,
        edge: Edge<V>,
    ) -> Result<(), FlowError> {
        if edge.capacity < 0 {
            return Err(FlowError::InvalidCapacity {
                from: edge.from.to_string(),
                to: edge.to.to_string(),
                capacity: edge.capacity,
            });
        }
        let Some(total_capacity) = self.total_capacity.checked_add(edge.capacity) else {
            return Err(FlowError::CapacityOverflow {
                from: edge.from.to_string(),
                to: edge.to.to_string(),
            });
        };
        self.total_capacity = total_capacity;
        let f = self.intern(&edge.from);
        let t = self.intern(&edge.to);
        match pairs.get(&(f, t)) {
            Some(i) => {
                self.edges[*i].capacity += edge.capacity;
            }
            None => {
                let i = self.edges.len();
                pairs.insert((f, t), i);
                self.outgoing[f].push(i);
                self.endpoints.push((f, t));
                self.edges.push(edge);
            }
        }
        Ok(())
    }

    fn intern(&mut self, vertex: &V) -> usize {
        if let Some(i) = self.index.get(vertex) {
            return *i;
        }
        let i = self.vertices.len();
        self.vertices.push(vertex.clone());
        self.index.insert(vertex.clone(), i);
        self.outgoing.push(Vec::new());
        i
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Logical (aggregated) edges in insertion order.
    pub fn edges(&self) -> &[Edge<V>] {
        &self.edges
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    pub fn index_of(&self, vertex: &V) -> Option<usize> {
        self.index.get(vertex).copied()
    }

    pub fn vertex(&self, index: usize) -> &V {
        &self.vertices[index]
    }

    /// Outgoing (to, capacity) pairs in insertion order. Unknown vertices have
    /// no neighbors. Calling this again restarts the iteration.
    pub fn neighbors<'a>(&'a self, vertex: &V) -> impl Iterator<Item = (&'a V, Capacity)> + 'a {
        let edge_indices: &'a [usize] = match self.index.get(vertex) {
            Some(i) => &self.outgoing[*i],
            None => &[],
        };
        edge_indices
            .iter()
            .map(move |e| (&self.edges[*e].to, self.edges[*e].capacity))
    }

    /// Aggregated capacity of the edge from -> to, 0 if absent.
    pub fn capacity(&self, from: &V, to: &V) -> Capacity {
        self.neighbors(from)
            .find(|(target, _)| *target == to)
            .map(|(_, capacity)| capacity)
            .unwrap_or(0)
    }

    pub(crate) fn endpoints(&self, edge: usize) -> (usize, usize) {
        self.endpoints[edge]
    }

    pub(crate) fn outgoing_edges(&self, vertex: usize) -> &[usize] {
        &self.outgoing[vertex]
    }

    /// Sum of all capacities.
    pub fn total_capacity(&self) -> Capacity {
        self.total_capacity
    }
}

impl Graph<usize> {
    /// Builds a graph from a square capacity matrix with vertices 0..n.
    pub fn from_matrix(matrix: &[Vec<Capacity>]) -> Result<Graph<usize>, FlowError> {
        Graph::from_labeled_matrix((0..matrix.len()).collect(), matrix)
    }
}
