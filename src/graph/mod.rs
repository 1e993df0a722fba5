// The engine works on dense vertex indices handed out by `Graph`.
//
// For a query the graph is copied into a `ResidualNetwork`, an arena of arcs
// in which logical edge e owns arcs 2e (forward) and 2e + 1 (reverse):
//
// from -[capacity - flow]-> to
// to   -[flow]-----------> from
//
// The batch mode appends two synthetic vertices behind the real ones:
//
// super source -[unbounded]-> origin ... destination -[unbounded]-> super sink
//
// so real vertex and edge indices are the same in graph and network.

pub mod attribution;
pub mod augmenting_path;
pub mod flow;
pub mod min_cut;
pub mod residual;

#[cfg(test)]
mod test;

pub use crate::graph::attribution::{attribute_flow, Attribution, PairFlow};
pub use crate::graph::augmenting_path::{find_path, Path};
pub use crate::graph::flow::{batch_flow, compute_flow, max_flow, BatchFlowResult, FlowResult};
pub use crate::graph::min_cut::MinCut;
pub use crate::graph::residual::ResidualNetwork;
