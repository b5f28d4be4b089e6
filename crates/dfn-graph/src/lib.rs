//! dfn-graph: topology layer for discrete fracture networks.
//!
//! Provides:
//! - The `Fracture` value object (geometry + derived coefficients)
//! - Incremental network builder with validation
//! - The immutable `FractureNetwork` multigraph
//! - Stable label ↔ index mapping for solver integration
//!
//! # Example
//!
//! ```
//! use dfn_graph::FractureNetwork;
//!
//! let network = FractureNetwork::from_connectivity(
//!     &[(0, 1), (1, 2), (1, 2), (2, 3)],
//!     &[100.0, 250.0, 500.0, 100.0],
//!     &[500.0; 4],
//!     &[1e-3; 4],
//! )
//! .unwrap();
//!
//! assert_eq!(network.junction_count(), 4);
//! assert_eq!(network.fracture_count(), 4);
//! ```

pub mod builder;
pub mod error;
pub mod fracture;
pub mod indexing;
pub mod network;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::NetworkBuilder;
pub use error::{NetworkError, NetworkResult};
pub use fracture::Fracture;
pub use indexing::JunctionIndex;
pub use network::{FractureEdge, FractureNetwork, Junction};
