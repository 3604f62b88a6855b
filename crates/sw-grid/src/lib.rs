//! sw-grid: area/topology layer for swingnet.
//!
//! Provides:
//! - Area parameter records and the ordered area table
//! - Area adjacency table with validation
//! - Stable state indexing (area, generator) -> flat state index
//! - Connection matrix restricted to a selection of areas
//!
//! # Example
//!
//! ```
//! use sw_grid::{Adjacency, Selection, StateLayout, connection_matrix};
//!
//! let layout = StateLayout::from_counts(&[2, 3]);
//! assert_eq!(layout.total_generators(), 5);
//! assert_eq!(layout.angle_range(1), 2..5);
//!
//! let adjacency = Adjacency::japan_ten_area();
//! let selection = Selection::resolve(&[0, 1], 10).unwrap();
//! let cmat = connection_matrix(&adjacency, &selection).unwrap();
//! assert_eq!(cmat[(0, 1)], 0.1);
//! ```

pub mod adjacency;
pub mod area;
pub mod error;
pub mod layout;
pub mod topology;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use adjacency::Adjacency;
pub use area::{AreaParams, AreaTable};
pub use error::{GridError, GridResult};
pub use layout::StateLayout;
pub use topology::{
    ChainMismatch, DEFAULT_CONNECTION_COEFF, Selection, chain_links, chain_mismatches,
    connection_matrix,
};
