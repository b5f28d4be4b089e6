//! Error types for solver operations.

use dfn_core::{DfnError, JunctionLabel};
use dfn_fluids::FluidError;
use dfn_graph::NetworkError;
use thiserror::Error;

/// Errors that can occur while solving a network.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The pressure system is ill-posed: an unconstrained component or
    /// unbalanced external flows.
    #[error("Singular system: {what}")]
    SingularSystem { what: String },

    /// The flow-carrying fractures form a directed cycle.
    #[error("Cyclic flow through junction {junction}")]
    CyclicFlow { junction: JunctionLabel },

    #[error("Invalid boundary condition: {what}")]
    InvalidBoundary { what: String },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for DfnError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::SingularSystem { what } => DfnError::IllPosed { what },
            SolverError::CyclicFlow { junction } => DfnError::IllPosed {
                what: format!("cyclic flow through junction {junction}"),
            },
            SolverError::InvalidBoundary { what } => DfnError::InvalidArg { what },
            SolverError::Network(err) => err.into(),
            SolverError::Fluid(err) => err.into(),
            SolverError::Numeric { what } => DfnError::Invariant { what },
        }
    }
}
