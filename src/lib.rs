//! frontera-graph: GPU-mirrored sparse matrix storage with a reference BFS
//!
//! # Overview
//!
//! frontera-graph converts coordinate-form (COO) edge lists into compressed
//! sparse row/column matrices, keeps every matrix array mirrored between
//! host and accelerator memory, and provides the sequential breadth-first
//! search used to validate accelerated BFS implementations.
//!
//! # Quick Start
//!
//! ```
//! use frontera_graph::{bfs, CsrMatrix};
//!
//! // Directed path 0 → 1 → 2, from a COO edge list
//! let mut matrix = CsrMatrix::new(3, 3);
//! matrix.build(&[0, 1], &[1, 2], &[1.0_f32, 1.0])?;
//!
//! // Offsets obey the CSR invariants
//! assert_eq!(matrix.offsets(), &[0, 1, 2, 2]);
//!
//! // Reference BFS over the host-side arrays
//! let result = bfs(&matrix, 0, i32::MAX)?;
//! assert_eq!(result.distances, vec![0, 1, 2]);
//! assert_eq!(result.search_depth, 3);
//! # Ok::<(), frontera_graph::MatrixError>(())
//! ```
//!
//! # Architecture
//!
//! - **Storage**: counting-sort COO→CSR/CSC conversion (same structure both
//!   ways; the caller's argument order picks the compressed axis)
//! - **Mirroring**: every array owned as an independent host/device pair,
//!   synchronized only by explicit upload/download operations (`gpu`
//!   feature, on by default)
//! - **Validation**: sequential frontier BFS with depth-limited early halt
//!   and optional predecessor tracking, reading host memory only

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod storage;

// Accelerator mirroring (optional, on by default)
#[cfg(feature = "gpu")]
pub mod gpu;

// Re-export core types
pub use algorithms::{bfs, bfs_with_options, BfsOptions, BfsResult};
pub use storage::{CsrMatrix, MatrixError};

#[cfg(feature = "gpu")]
pub use gpu::{CsrMirror, DeviceArray, GpuDevice, GpuDeviceError};

// Error type
pub use anyhow::{Error, Result};
