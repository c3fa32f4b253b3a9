//! Compressed sparse matrix storage (CSR/CSC)
//!
//! Counting-sort conversion from coordinate (COO) form, following the
//! `GraphBLAST` (Yang et al., ACM `ToMS` 2022) layout conventions for
//! GPU-friendly sparse matrices.
//!
//! # Compressed format
//!
//! ```text
//! Graph: 0 → 1, 0 → 2, 1 → 2
//!
//! offsets: [0, 2, 3, 3]  // Row 0: entries [0..2), Row 1: [2..3), Row 2: [3..3)
//! indices: [1, 2, 2]      // Entry 0 → column 1, entry 1 → column 2, ...
//! values:  [1.0, 1.0, 1.0]
//! ```
//!
//! The same structure stores CSR or CSC; only the role of the build
//! arguments differs. `build(row_ind, col_ind, values)` compresses along
//! rows (CSR); swapping the first two arguments (and the declared
//! dimensions) compresses along columns (CSC).

use std::fmt;
use std::fmt::Write as _;
use thiserror::Error;

/// Dense preview renders at most this many rows and columns.
const PREVIEW_LIMIT: usize = 20;

/// Errors from sparse matrix construction and traversal
///
/// All of these are deterministic input errors: they are surfaced before any
/// state is mutated and must not be retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// An index lies outside the declared matrix bounds.
    #[error("{axis} index {index} out of range (bound {bound})")]
    IndexOutOfRange {
        /// Which coordinate was out of range (`"row"` or `"column"`)
        axis: &'static str,
        /// The offending index
        index: u32,
        /// The exclusive bound it violated
        bound: usize,
    },

    /// COO input slices disagree on the edge count.
    #[error("COO arrays disagree on edge count: {row_ind} row indices, {col_ind} column indices, {values} values")]
    EdgeListMismatch {
        /// Length of the row-index slice
        row_ind: usize,
        /// Length of the column-index slice
        col_ind: usize,
        /// Length of the value slice
        values: usize,
    },

    /// Two matrices disagree on a dimension that must match.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// The dimension required by the operation
        expected: usize,
        /// The dimension actually present
        found: usize,
    },

    /// BFS source vertex outside the vertex range.
    #[error("invalid source vertex {source} (graph has {vertices} vertices)")]
    InvalidSource {
        /// The rejected source vertex
        r#source: u32,
        /// Number of vertices in the graph
        vertices: usize,
    },
}

/// Compressed sparse matrix (CSR or CSC depending on build argument order)
///
/// Host-side half of the mirrored representation. Optimized for:
/// - O(1) access to a row's adjacency slice (via `offsets`)
/// - GPU-friendly flat memory layout (three parallel arrays)
///
/// `offsets` is allocated at creation; `indices`/`values` are allocated only
/// at [`build`](Self::build) time because the entry count is unknown until
/// then.
///
/// # Example
///
/// ```
/// use frontera_graph::CsrMatrix;
///
/// let mut matrix = CsrMatrix::new(3, 3);
/// matrix.build(&[0, 0, 1], &[1, 2, 2], &[1.0_f32, 1.0, 1.0]).unwrap();
///
/// assert_eq!(matrix.offsets(), &[0, 2, 3, 3]);
/// assert_eq!(matrix.entries(0).unwrap().0, &[1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct CsrMatrix<T> {
    /// Compressed dimension (number of rows for CSR, columns for CSC)
    rows: usize,

    /// Secondary dimension (bound for `indices` entries)
    cols: usize,

    /// Number of stored entries; set once, at build time
    nnz: usize,

    /// Start offset of each row's entries; length `rows + 1`,
    /// non-decreasing, `offsets[0] == 0`, `offsets[rows] == nnz`
    offsets: Vec<u32>,

    /// Secondary index of each entry; length `nnz`, every value `< cols`
    indices: Vec<u32>,

    /// Entry payloads, parallel to `indices`
    values: Vec<T>,
}

impl<T: Copy> CsrMatrix<T> {
    /// Create an empty matrix with fixed dimensions
    ///
    /// Only the offset array is allocated here; `indices`/`values` wait for
    /// [`build`](Self::build), when the entry count becomes known.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            nnz: 0,
            offsets: vec![0; rows + 1],
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Convert a COO edge list into compressed form (counting sort)
    ///
    /// `row_ind[e]` selects the compressed axis, `col_ind[e]` the secondary
    /// axis, `values[e]` the payload of edge `e`. Passing the coordinates in
    /// (row, column) order produces CSR; swapping them produces CSC.
    ///
    /// Entries within a row keep the scatter (input) order — they are *not*
    /// sorted by column, and callers must not assume sorted adjacency lists.
    ///
    /// Rebuilding an already-built matrix replaces its contents.
    ///
    /// # Errors
    ///
    /// - [`MatrixError::EdgeListMismatch`] if the three slices disagree on
    ///   the edge count
    /// - [`MatrixError::IndexOutOfRange`] if any coordinate violates the
    ///   declared dimensions (checked before any state is mutated)
    #[allow(clippy::cast_possible_truncation)] // entry counts > u32::MAX unsupported
    pub fn build(
        &mut self,
        row_ind: &[u32],
        col_ind: &[u32],
        values: &[T],
    ) -> Result<(), MatrixError> {
        if row_ind.len() != col_ind.len() || col_ind.len() != values.len() {
            return Err(MatrixError::EdgeListMismatch {
                row_ind: row_ind.len(),
                col_ind: col_ind.len(),
                values: values.len(),
            });
        }
        for (&r, &c) in row_ind.iter().zip(col_ind) {
            if r as usize >= self.rows {
                return Err(MatrixError::IndexOutOfRange {
                    axis: "row",
                    index: r,
                    bound: self.rows,
                });
            }
            if c as usize >= self.cols {
                return Err(MatrixError::IndexOutOfRange {
                    axis: "column",
                    index: c,
                    bound: self.cols,
                });
            }
        }

        let nnz = row_ind.len();
        self.nnz = nnz;

        // Histogram pass: offsets[i] = number of entries in row i
        self.offsets.fill(0);
        for &r in row_ind {
            self.offsets[r as usize] += 1;
        }

        // Exclusive prefix sum: offsets[i] = start of row i's entries.
        // The closing sentinel is set explicitly so trailing empty rows
        // still end at nnz.
        let mut cumsum = 0_u32;
        for i in 0..self.rows {
            let count = self.offsets[i];
            self.offsets[i] = cumsum;
            cumsum += count;
        }
        self.offsets[self.rows] = nnz as u32;

        // Scatter pass, with a cursor array so `offsets` stays intact.
        // Every slot of `indices`/`values` is overwritten exactly once (the
        // destinations form a permutation of 0..nnz), so seeding them with
        // the input arrays costs nothing beyond the copy.
        let mut cursor: Vec<u32> = self.offsets[..self.rows].to_vec();
        let mut indices = col_ind.to_vec();
        let mut scattered = values.to_vec();
        for edge in 0..nnz {
            let row = row_ind[edge] as usize;
            let dest = cursor[row] as usize;
            indices[dest] = col_ind[edge];
            scattered[dest] = values[edge];
            cursor[row] += 1;
        }

        self.indices = indices;
        self.values = scattered;
        Ok(())
    }

    /// Deep-copy the contents of `source` into this matrix
    ///
    /// All three arrays are replicated into this matrix's own storage;
    /// mutating the copy never affects the source. The secondary dimension
    /// keeps this matrix's declared value — only the compressed dimension is
    /// required to match.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] if the compressed
    /// dimensions differ.
    pub fn copy_from(&mut self, source: &Self) -> Result<(), MatrixError> {
        if self.rows != source.rows {
            return Err(MatrixError::DimensionMismatch {
                expected: self.rows,
                found: source.rows,
            });
        }
        self.nnz = source.nnz;
        self.offsets.clear();
        self.offsets.extend_from_slice(&source.offsets);
        self.indices = source.indices.clone();
        self.values = source.values.clone();
        Ok(())
    }

    /// Get a row's adjacency: (secondary indices, values)
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::IndexOutOfRange`] if `row` is out of bounds.
    pub fn entries(&self, row: u32) -> Result<(&[u32], &[T]), MatrixError> {
        if row as usize >= self.rows {
            return Err(MatrixError::IndexOutOfRange {
                axis: "row",
                index: row,
                bound: self.rows,
            });
        }
        let start = self.offsets[row as usize] as usize;
        let end = self.offsets[row as usize + 1] as usize;
        Ok((&self.indices[start..end], &self.values[start..end]))
    }

    /// Compressed dimension
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Secondary dimension
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries
    #[must_use]
    pub const fn nnz(&self) -> usize {
        self.nnz
    }

    /// Offset array (length `rows + 1`)
    #[must_use]
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Secondary index array (length `nnz`)
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Value array (length `nnz`)
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// All three arrays at once (for uploading to an accelerator)
    #[must_use]
    pub fn components(&self) -> (&[u32], &[u32], &[T]) {
        (&self.offsets, &self.indices, &self.values)
    }

    /// Replace array contents wholesale after a device→host refresh.
    #[cfg(feature = "gpu")]
    pub(crate) fn overwrite(&mut self, offsets: Vec<u32>, indices: Vec<u32>, values: Vec<T>) {
        self.nnz = indices.len();
        self.offsets = offsets;
        self.indices = indices;
        self.values = values;
    }
}

impl<T: Copy + fmt::Display> CsrMatrix<T> {
    /// Render up to the first 20×20 entries as a dense grid
    ///
    /// Debug aid over the host-side buffers. Stored entries print as `x`
    /// markers, or as values (2-decimal precision) when `show_values` is
    /// set; absent entries print as `0`. The cursor walk assumes
    /// column-sorted entries within each row; unsorted rows may misrender.
    #[must_use]
    pub fn render_dense(&self, show_values: bool) -> String {
        let rows = self.rows.min(PREVIEW_LIMIT);
        let cols = self.cols.min(PREVIEW_LIMIT);
        let mut out = String::new();

        for i in 0..rows {
            let mut cursor = self.offsets[i] as usize;
            let end = self.offsets[i + 1] as usize;
            for j in 0..cols {
                if cursor >= end || self.indices[cursor] as usize != j {
                    out.push_str("0 ");
                } else {
                    if show_values {
                        let _ = write!(out, "{:.2} ", self.values[cursor]);
                    } else {
                        out.push_str("x ");
                    }
                    cursor += 1;
                }
            }
            out.push('\n');
        }

        out
    }
}
