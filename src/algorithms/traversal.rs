//! Sequential reference BFS
//!
//! Frontier-based level-order traversal over the host-side compressed
//! arrays, used as the CPU oracle when validating accelerated BFS results.
//! Follows the Ligra (Shun & Blelloch, `PPoPP` 2013) frontier formulation.

use crate::storage::{CsrMatrix, MatrixError};
use std::collections::VecDeque;

/// Traversal configuration
///
/// # Example
///
/// ```
/// use frontera_graph::BfsOptions;
///
/// let options = BfsOptions::new().with_predecessors(true);
/// assert!(options.track_predecessors);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsOptions {
    /// Record, for every visited vertex, the vertex that discovered it
    pub track_predecessors: bool,
}

impl BfsOptions {
    /// Default configuration (no predecessor tracking)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable predecessor tracking
    #[must_use]
    pub const fn with_predecessors(mut self, track: bool) -> Self {
        self.track_predecessors = track;
        self
    }
}

/// Result of a reference BFS run
#[derive(Debug, Clone)]
pub struct BfsResult {
    /// BFS level per vertex; `-1` marks vertices the search never reached
    pub distances: Vec<i32>,

    /// Number of BFS levels discovered (max distance + 1)
    pub search_depth: i32,

    /// Discovering vertex per vertex (`-1` for the source and unreached
    /// vertices); present only when tracking was requested
    pub predecessors: Option<Vec<i32>>,
}

impl BfsResult {
    /// Distance to a vertex, or `None` if unreached or out of range
    #[must_use]
    pub fn distance(&self, vertex: u32) -> Option<i32> {
        self.distances
            .get(vertex as usize)
            .copied()
            .filter(|&d| d >= 0)
    }

    /// Whether the search reached `vertex`
    #[must_use]
    pub fn is_reachable(&self, vertex: u32) -> bool {
        self.distance(vertex).is_some()
    }

    /// Number of vertices the search reached
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.distances.iter().filter(|&&d| d >= 0).count()
    }

    /// Reconstruct the discovered path from the source to `vertex`
    ///
    /// Walks the predecessor chain backwards. Returns `None` if predecessor
    /// tracking was off or the vertex was never reached. The returned path
    /// has `distance(vertex) + 1` vertices and starts at the source.
    #[must_use]
    pub fn path_to(&self, vertex: u32) -> Option<Vec<u32>> {
        let predecessors = self.predecessors.as_ref()?;
        if self.distance(vertex).is_none() {
            return None;
        }

        let mut path = vec![vertex];
        let mut current = vertex;
        while let Some(&pred) = predecessors.get(current as usize) {
            if pred < 0 {
                break;
            }
            #[allow(clippy::cast_sign_loss)] // predecessors are vertex ids or -1
            let pred = pred as u32;
            path.push(pred);
            current = pred;
        }
        path.reverse();
        Some(path)
    }
}

/// Breadth-first search from `source`, without predecessor tracking
///
/// See [`bfs_with_options`].
///
/// # Errors
///
/// Returns [`MatrixError::InvalidSource`] or
/// [`MatrixError::DimensionMismatch`]; see [`bfs_with_options`].
pub fn bfs<T: Copy>(
    matrix: &CsrMatrix<T>,
    source: u32,
    stop_depth: i32,
) -> Result<BfsResult, MatrixError> {
    bfs_with_options(matrix, source, stop_depth, &BfsOptions::default())
}

/// Breadth-first search from `source` over the host-side adjacency
///
/// Vertices move `Unvisited → Discovered (enqueued, distance assigned) →
/// Expanded (dequeued, neighbors visited)`. The frontier is strict FIFO,
/// which guarantees expansion in non-decreasing distance order — the
/// property both the early stop below and the shortest-path output depend
/// on.
///
/// `stop_depth` bounds the search: the first dequeued vertex whose
/// neighbors would land beyond `stop_depth` halts the *entire* traversal.
/// FIFO ordering makes every remaining frontier vertex at least as deep, so
/// halting outright is equivalent to skipping them one by one.
///
/// Reads only host memory; accelerator-resident mirrors are never touched.
///
/// # Errors
///
/// - [`MatrixError::InvalidSource`] if `source` is not a vertex
/// - [`MatrixError::DimensionMismatch`] if the matrix is not square (an
///   adjacency matrix has as many columns as rows)
#[allow(clippy::cast_possible_wrap)] // vertex ids stay well below i32::MAX
pub fn bfs_with_options<T: Copy>(
    matrix: &CsrMatrix<T>,
    source: u32,
    stop_depth: i32,
    options: &BfsOptions,
) -> Result<BfsResult, MatrixError> {
    let vertices = matrix.rows();
    if matrix.cols() != vertices {
        return Err(MatrixError::DimensionMismatch {
            expected: vertices,
            found: matrix.cols(),
        });
    }
    if source as usize >= vertices {
        return Err(MatrixError::InvalidSource { source, vertices });
    }

    let mut distances = vec![-1_i32; vertices];
    let mut predecessors = options.track_predecessors.then(|| vec![-1_i32; vertices]);
    distances[source as usize] = 0;

    let mut search_depth = 0_i32;
    let mut frontier = VecDeque::new();
    frontier.push_back(source);

    let offsets = matrix.offsets();
    let indices = matrix.indices();

    while let Some(current) = frontier.pop_front() {
        let neighbor_dist = distances[current as usize] + 1;
        if neighbor_dist > stop_depth {
            break;
        }

        let edges_begin = offsets[current as usize] as usize;
        let edges_end = offsets[current as usize + 1] as usize;

        for &neighbor in &indices[edges_begin..edges_end] {
            if distances[neighbor as usize] == -1 {
                distances[neighbor as usize] = neighbor_dist;
                if let Some(preds) = predecessors.as_mut() {
                    preds[neighbor as usize] = current as i32;
                }
                if search_depth < neighbor_dist {
                    search_depth = neighbor_dist;
                }
                frontier.push_back(neighbor);
            }
        }
    }

    if let Some(preds) = predecessors.as_mut() {
        // the source discovers itself; report it with no predecessor
        preds[source as usize] = -1;
    }

    Ok(BfsResult {
        distances,
        search_depth: search_depth + 1,
        predecessors,
    })
}
