pub mod analysis;
pub mod context;
pub mod error;
pub mod graph;
pub mod io;
pub mod options;
pub mod types;
