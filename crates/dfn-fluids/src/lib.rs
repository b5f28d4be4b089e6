//! dfn-fluids: properties of the fluid circulating through the network.

pub mod error;
pub mod fluid;

pub use error::{FluidError, FluidResult};
pub use fluid::Fluid;
