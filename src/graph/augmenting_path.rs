use std::collections::VecDeque;

use crate::graph::residual::ResidualNetwork;

/// Augmenting path: residual arcs from source to sink, no vertex repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    vertices: Vec<usize>,
    arcs: Vec<usize>,
}

impl Path {
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn arcs(&self) -> &[usize] {
        &self.arcs
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

/// Breadth-first search for a shortest (fewest arcs) augmenting path.
///
/// Only arcs with positive remaining capacity are followed and arcs are
/// scanned in the network's fixed order, so equal-length candidates are
/// always resolved the same way. Returns `None` if `sink` is unreachable,
/// equal to `source`, or either index is outside the network.
pub fn find_path(residual: &ResidualNetwork, source: usize, sink: usize) -> Option<Path> {
    if source == sink || source >= residual.vertex_count() || sink >= residual.vertex_count() {
        return None;
    }
    let mut parent: Vec<Option<usize>> = vec![None; residual.vertex_count()];
    let mut visited = vec![false; residual.vertex_count()];
    visited[source] = true;
    let mut queue = VecDeque::from([source]);
    while let Some(vertex) = queue.pop_front() {
        for (arc, head, remaining) in residual.arcs_from(vertex) {
            if visited[head] || remaining <= 0 {
                continue;
            }
            visited[head] = true;
            parent[head] = Some(arc);
            if head == sink {
                return Some(trace(residual, &parent, source, sink));
            }
            queue.push_back(head);
        }
    }
    None
}

fn trace(residual: &ResidualNetwork, parent: &[Option<usize>], source: usize, sink: usize) -> Path {
    let mut vertices = vec![sink];
    let mut arcs = Vec::new();
    let mut vertex = sink;
    while vertex != source {
        let Some(arc) = parent[vertex] else {
            unreachable!("vertex {vertex} was discovered without a parent arc");
        };
        arcs.push(arc);
        vertex = residual.arc_tail(arc);
        vertices.push(vertex);
    }
    vertices.reverse();
    arcs.reverse();
    Path { vertices, arcs }
}
