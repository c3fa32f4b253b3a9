//! Matrix storage layer
//!
//! Provides the host-side compressed sparse matrix (CSR/CSC) and its
//! construction from coordinate-form edge lists.

pub mod csr;

pub use csr::{CsrMatrix, MatrixError};
