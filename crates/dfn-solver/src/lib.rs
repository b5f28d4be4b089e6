//! Steady thermohydraulic solver for discrete fracture networks.
//!
//! A solve runs three stages over an immutable `FractureNetwork`:
//! 1. hydraulics: nodal pressures from mass conservation, fracture flows
//!    from the cubic-law conductance
//! 2. flow directions: upstream/downstream ends and a topological order of
//!    junctions over the flow-carrying fractures
//! 3. thermal propagation: flow-weighted mixing at junctions and
//!    exponential relaxation toward the rock temperature along fractures

pub mod boundary;
pub mod direction;
pub mod error;
pub mod hydraulic;
pub mod linear;
pub mod paths;
pub mod solution;
pub mod solve;
pub mod thermal;

pub use boundary::BoundaryConditions;
pub use direction::{FlowDirection, FlowField, resolve_directions};
pub use error::{SolverError, SolverResult};
pub use hydraulic::{HydraulicSolution, solve_hydraulics};
pub use linear::{LinearSolver, LuSolver};
pub use paths::{flow_paths, mass_contribution};
pub use solution::{FractureResult, JunctionResult, NetworkSolution};
pub use solve::{SolveSettings, solve, solve_batch, solve_with};
pub use thermal::{DecayLaw, ExponentialDecay, ThermalSolution, propagate_temperatures};
