//! High-level solver interface.

use dfn_core::{Real, Tolerances};
use dfn_fluids::Fluid;
use dfn_graph::FractureNetwork;
use rayon::prelude::*;
use tracing::info;

use crate::boundary::BoundaryConditions;
use crate::direction::resolve_directions;
use crate::error::{SolverError, SolverResult};
use crate::hydraulic::solve_resolved;
use crate::linear::{LinearSolver, LuSolver};
use crate::solution::NetworkSolution;
use crate::thermal::{DecayLaw, ExponentialDecay, propagate};

/// Nusselt number for fully developed laminar flow between parallel plates
/// at constant wall temperature.
pub const PARALLEL_PLATE_NUSSELT: Real = 7.54;

/// Numerical settings shared by every stage of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveSettings {
    /// Tolerance for the external flow balance.
    pub tolerances: Tolerances,
    /// A fracture is stagnant when `|q| <= stagnant.threshold(max |q|)`.
    pub stagnant: Tolerances,
    /// Flow at or below which a fracture's outlet is taken as the rock temperature.
    pub min_thermal_flow: Real,
    pub nusselt: Real,
}

impl Default for SolveSettings {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            stagnant: Tolerances {
                abs: 0.0,
                rel: 1e-12,
            },
            min_thermal_flow: 1e-12,
            nusselt: PARALLEL_PLATE_NUSSELT,
        }
    }
}

impl SolveSettings {
    pub fn validate(&self) -> SolverResult<()> {
        let checks = [
            ("tolerances.abs", self.tolerances.abs),
            ("tolerances.rel", self.tolerances.rel),
            ("stagnant.abs", self.stagnant.abs),
            ("stagnant.rel", self.stagnant.rel),
            ("min_thermal_flow", self.min_thermal_flow),
        ];
        for (what, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(SolverError::Numeric {
                    what: format!("{what} must be finite and non-negative, got {value}"),
                });
            }
        }
        if !self.nusselt.is_finite() || self.nusselt <= 0.0 {
            return Err(SolverError::Numeric {
                what: format!("nusselt must be finite and positive, got {}", self.nusselt),
            });
        }
        Ok(())
    }
}

/// Solve a network: hydraulics, flow directions, then temperatures.
///
/// Uses the dense LU backend and exponential decay along fractures. The
/// network and boundary conditions are only read, so one network can be
/// solved under many boundary sets.
pub fn solve(
    network: &FractureNetwork,
    fluid: &Fluid,
    bc: &BoundaryConditions,
    settings: &SolveSettings,
) -> SolverResult<NetworkSolution> {
    solve_with(network, fluid, bc, settings, &LuSolver, &ExponentialDecay)
}

/// Same as [`solve`] with caller-supplied numerical backends.
pub fn solve_with(
    network: &FractureNetwork,
    fluid: &Fluid,
    bc: &BoundaryConditions,
    settings: &SolveSettings,
    linear: &dyn LinearSolver,
    law: &dyn DecayLaw,
) -> SolverResult<NetworkSolution> {
    settings.validate()?;
    let boundary = bc.resolve(network, settings.tolerances)?;

    let hydraulic = solve_resolved(network, fluid, &boundary, linear)?;
    let field = resolve_directions(network, &hydraulic.flows, settings.stagnant)?;
    let thermal = propagate(
        network,
        fluid,
        &field,
        &boundary,
        &hydraulic.boundary_flows,
        settings,
        law,
    )?;

    let solution =
        NetworkSolution::assemble(network, fluid, &boundary, hydraulic, field, thermal)?;
    info!(
        junctions = network.junction_count(),
        fractures = network.fracture_count(),
        production_temperature = ?solution.production_temperature(),
        "solved network"
    );
    Ok(solution)
}

/// Solve many realisations of a network in parallel.
///
/// Results come back in input order; one failing realisation does not
/// affect the others.
pub fn solve_batch(
    networks: &[FractureNetwork],
    fluid: &Fluid,
    bc: &BoundaryConditions,
    settings: &SolveSettings,
) -> Vec<SolverResult<NetworkSolution>> {
    networks
        .par_iter()
        .map(|network| solve(network, fluid, bc, settings))
        .collect()
}
