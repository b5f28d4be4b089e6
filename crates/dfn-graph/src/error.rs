//! Network construction and validation errors.

use dfn_core::{DfnError, FractureId, JunctionId, JunctionLabel};
use thiserror::Error;

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors raised while building or querying a fracture network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// A length, height or width is not strictly positive (or not finite).
    #[error("Invalid geometry{}: {what} = {value} (must be > 0)", at_fracture(.fracture))]
    InvalidGeometry {
        fracture: Option<usize>,
        what: &'static str,
        value: f64,
    },

    /// Parallel input sequences disagree in length.
    #[error("Dimension mismatch: {what} has {actual} entries, connectivity has {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A fracture starts and ends at the same junction.
    #[error("Fracture {fracture} connects junction {junction} to itself")]
    SelfLoop {
        fracture: usize,
        junction: JunctionLabel,
    },

    /// The network has no fractures.
    #[error("Network has no fractures")]
    Empty,

    /// A junction label is not part of the network.
    #[error("Unknown junction {label}")]
    UnknownJunction { label: JunctionLabel },

    /// Adjacency is inconsistent (fracture listed at a junction it doesn't touch).
    #[error("Fracture {fracture} in junction {junction}'s adjacency list but doesn't touch it")]
    InconsistentAdjacency {
        fracture: FractureId,
        junction: JunctionId,
    },

    /// ID not found in the network.
    #[error("{what} not found")]
    IdNotFound { what: &'static str },
}

fn at_fracture(fracture: &Option<usize>) -> String {
    match fracture {
        Some(i) => format!(" in fracture {i}"),
        None => String::new(),
    }
}

impl NetworkError {
    /// Attach the fracture position to a geometry error.
    pub(crate) fn at(self, index: usize) -> Self {
        match self {
            NetworkError::InvalidGeometry { what, value, .. } => NetworkError::InvalidGeometry {
                fracture: Some(index),
                what,
                value,
            },
            other => other,
        }
    }
}

impl From<NetworkError> for DfnError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::InconsistentAdjacency { .. } | NetworkError::IdNotFound { .. } => {
                DfnError::Invariant {
                    what: err.to_string(),
                }
            }
            other => DfnError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}
