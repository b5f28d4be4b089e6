//! Fluid property errors.

use dfn_core::DfnError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors raised when constructing a fluid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (non-positive density, viscosity, etc.).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },
}

impl From<FluidError> for DfnError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what, value } => DfnError::InvalidArg {
                what: format!("fluid {what} = {value}"),
            },
        }
    }
}
