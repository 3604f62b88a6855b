//! Adjacency table validation logic.

use crate::error::{GridError, GridResult};

/// Every neighbour index must exist and no area may list itself.
pub(crate) fn validate_references(lists: &[Vec<usize>]) -> GridResult<()> {
    let len = lists.len();
    for (area, neighbors) in lists.iter().enumerate() {
        for &other in neighbors {
            if other >= len {
                return Err(GridError::AreaOutOfRange { index: other, len });
            }
            if other == area {
                return Err(GridError::SelfLoop { area });
            }
        }
    }
    Ok(())
}

/// If `a` lists `b`, then `b` must list `a`.
pub(crate) fn validate_symmetric(lists: &[Vec<usize>]) -> GridResult<()> {
    for (from, neighbors) in lists.iter().enumerate() {
        for &to in neighbors {
            if !lists[to].contains(&from) {
                return Err(GridError::AsymmetricAdjacency { from, to });
            }
        }
    }
    Ok(())
}
