//! Graph algorithms (reference BFS)
//!
//! Sequential oracles that consume the host half of a mirrored matrix.

pub mod traversal;

pub use traversal::{bfs, bfs_with_options, BfsOptions, BfsResult};
