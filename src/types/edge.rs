use crate::types::Capacity;

#[derive(Clone, Debug, Hash, PartialEq, Eq, Ord, PartialOrd)]
pub struct Edge<V> {
    pub from: V,
    pub to: V,
    pub capacity: Capacity,
}

impl<V> Edge<V> {
    pub fn new(from: V, to: V, capacity: Capacity) -> Self {
        Edge { from, to, capacity }
    }
}

impl<V> From<(V, V, Capacity)> for Edge<V> {
    fn from((from, to, capacity): (V, V, Capacity)) -> Self {
        Edge { from, to, capacity }
    }
}

/// Flow assigned to one logical edge of the graph.
/// Invariant: 0 <= flow <= capacity.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct EdgeFlow<V> {
    pub from: V,
    pub to: V,
    pub capacity: Capacity,
    pub flow: Capacity,
}

impl<V> EdgeFlow<V> {
    pub fn is_saturated(&self) -> bool {
        self.capacity > 0 && self.flow == self.capacity
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct VertexAmount<V> {
    pub vertex: V,
    pub amount: Capacity,
}
