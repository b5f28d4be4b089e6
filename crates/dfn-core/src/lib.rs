//! dfn-core: shared foundation for the fracture network model.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact IDs for junctions and fractures)
//! - error (shared error type)

pub mod error;
pub mod ids;
pub mod numeric;

pub use error::{DfnError, DfnResult};
pub use ids::*;
pub use numeric::*;
