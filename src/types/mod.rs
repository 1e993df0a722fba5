use std::fmt::{Debug, Display};
use std::hash::Hash;

pub mod edge;
pub mod graph;

pub use edge::{Edge, EdgeFlow, VertexAmount};
pub use graph::Graph;

/// Capacities and flow amounts. Values stored in a graph are never negative.
pub type Capacity = i64;

/// Anything that can name a vertex: small integers, string labels, ...
pub trait Vertex: Clone + Eq + Hash + Debug + Display {}

impl<T: Clone + Eq + Hash + Debug + Display> Vertex for T {}
