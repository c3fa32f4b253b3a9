//! Accelerator-side halves of the mirrored matrix
//!
//! Based on research from:
//! - **Gunrock** (Wang et al., ACM `ToPC` 2017) - GPU graph traversal primitives
//! - **`GraphBLAST`** (Yang et al., 2022) - GPU linear algebra for graphs
//!
//! # Architecture
//!
//! - `device`: GPU device initialization and budget-checked allocation
//! - `buffer`: per-array device storage with explicit upload/download sync
//! - `mirror`: the host+device mirrored matrix itself
//!
//! The traversal kernels that consume these buffers live outside this crate;
//! this module only guarantees they see the same matrix the host holds.
//!
//! # Feature Flag
//!
//! This module is gated on the (default) `gpu` feature:
//! ```bash
//! cargo build --no-default-features   # host-only
//! ```

mod buffer;
mod device;
mod mirror;

pub use buffer::DeviceArray;
pub use device::{GpuDevice, GpuDeviceError};
pub use mirror::CsrMirror;
