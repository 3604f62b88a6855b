//! Grid-specific error types.

/// Area table, adjacency, selection and indexing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// An area index does not exist in the table it refers to.
    AreaOutOfRange { index: usize, len: usize },

    /// The same area appears twice in a selection.
    DuplicateSelection { index: usize },

    /// An area lists itself as a neighbour.
    SelfLoop { area: usize },

    /// `from` lists `to` as adjacent but not the other way round.
    AsymmetricAdjacency { from: usize, to: usize },

    /// Adjacency table and area table disagree on the number of areas.
    SizeMismatch { adjacency: usize, areas: usize },

    /// An area record carries an unusable parameter.
    InvalidArea { area: String, what: &'static str },

    /// Cumulative offsets do not match the generator counts.
    OffsetMismatch {
        area: usize,
        expected: usize,
        actual: usize,
    },
}

pub type GridResult<T> = Result<T, GridError>;

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::AreaOutOfRange { index, len } => {
                write!(f, "Area index {} out of range (areas: {})", index, len)
            }
            GridError::DuplicateSelection { index } => {
                write!(f, "Area {} selected more than once", index)
            }
            GridError::SelfLoop { area } => {
                write!(f, "Area {} lists itself as adjacent", area)
            }
            GridError::AsymmetricAdjacency { from, to } => {
                write!(
                    f,
                    "Area {} lists {} as adjacent but {} does not list {}",
                    from, to, to, from
                )
            }
            GridError::SizeMismatch { adjacency, areas } => {
                write!(
                    f,
                    "Adjacency table covers {} areas but the area table has {}",
                    adjacency, areas
                )
            }
            GridError::InvalidArea { area, what } => {
                write!(f, "Area '{}': {}", area, what)
            }
            GridError::OffsetMismatch {
                area,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "State offset for area {} is {} but generator counts imply {}",
                    area, actual, expected
                )
            }
        }
    }
}

impl std::error::Error for GridError {}
