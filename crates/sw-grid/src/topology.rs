//! Inter-area topology restricted to a selection of areas.
//!
//! Two notions of "connected" coexist. The connection matrix follows the
//! geographic adjacency table. The swing dynamics instead couple each
//! selected area only to its predecessor and successor in selection order
//! (see [`chain_links`]). [`chain_mismatches`] reports where the two differ.

use nalgebra::DMatrix;

use crate::adjacency::Adjacency;
use crate::error::{GridError, GridResult};

/// Coupling constant written into the connection matrix for adjacent areas.
pub const DEFAULT_CONNECTION_COEFF: f64 = 0.1;

/// Ordered, duplicate-free list of original area indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    /// Validate a selection against a table of `full_len` areas.
    ///
    /// An empty request selects every area in original order.
    pub fn resolve(requested: &[usize], full_len: usize) -> GridResult<Self> {
        if requested.is_empty() {
            return Ok(Self::all(full_len));
        }
        let mut seen = vec![false; full_len];
        for &index in requested {
            if index >= full_len {
                return Err(GridError::AreaOutOfRange {
                    index,
                    len: full_len,
                });
            }
            if seen[index] {
                return Err(GridError::DuplicateSelection { index });
            }
            seen[index] = true;
        }
        Ok(Self {
            indices: requested.to_vec(),
        })
    }

    pub fn all(full_len: usize) -> Self {
        Self {
            indices: (0..full_len).collect(),
        }
    }

    /// Original area indices, in selection order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of an original area index within the selection.
    pub fn position(&self, original: usize) -> Option<usize> {
        self.indices.iter().position(|&i| i == original)
    }
}

/// Build the `ns × ns` connection matrix for a selection.
///
/// Entry (i, j) is [`DEFAULT_CONNECTION_COEFF`] when the original areas behind
/// selected positions i and j are adjacent, zero otherwise. Neighbours outside
/// the selection are dropped.
pub fn connection_matrix(adjacency: &Adjacency, selection: &Selection) -> GridResult<DMatrix<f64>> {
    let ns = selection.len();
    let mut cmat = DMatrix::zeros(ns, ns);
    for (i, &orig) in selection.indices().iter().enumerate() {
        if orig >= adjacency.len() {
            return Err(GridError::AreaOutOfRange {
                index: orig,
                len: adjacency.len(),
            });
        }
        for &adj_orig in adjacency.neighbors(orig) {
            if let Some(j) = selection.position(adj_orig) {
                cmat[(i, j)] = DEFAULT_CONNECTION_COEFF;
                cmat[(j, i)] = DEFAULT_CONNECTION_COEFF;
            }
        }
    }
    Ok(cmat)
}

/// Area pairs `(i, i + 1)` coupled by the swing dynamics.
pub fn chain_links(ns: usize) -> Vec<(usize, usize)> {
    (1..ns).map(|i| (i - 1, i)).collect()
}

/// Disagreement between chain coupling and the connection matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainMismatch {
    /// Consecutive selected areas are coupled but not geographically adjacent.
    CoupledNotAdjacent(usize, usize),
    /// Adjacent areas that the dynamics never couple.
    AdjacentNotCoupled(usize, usize),
}

/// Compare the structural chain against a connection matrix (positions are
/// selection positions, `i < j`).
pub fn chain_mismatches(cmat: &DMatrix<f64>) -> Vec<ChainMismatch> {
    let ns = cmat.nrows();
    let mut out = Vec::new();
    for (i, j) in chain_links(ns) {
        if cmat[(i, j)] == 0.0 {
            out.push(ChainMismatch::CoupledNotAdjacent(i, j));
        }
    }
    for i in 0..ns {
        for j in (i + 2)..ns {
            if cmat[(i, j)] != 0.0 {
                out.push(ChainMismatch::AdjacentNotCoupled(i, j));
            }
        }
    }
    out
}
