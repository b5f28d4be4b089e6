//! Steady temperature propagation through the flow field.

use dfn_core::{FractureId, Real, ensure_finite};
use dfn_fluids::Fluid;
use dfn_graph::{FractureNetwork, NetworkError};
use tracing::debug;

use crate::boundary::{BoundaryConditions, ResolvedBoundary};
use crate::direction::FlowField;
use crate::error::{SolverError, SolverResult};
use crate::solve::SolveSettings;

/// Outlet temperature of a fracture from its inlet temperature, the wall
/// (rock) temperature and its number of transfer units.
pub trait DecayLaw {
    fn outlet_temperature(&self, inlet: Real, ambient: Real, ntu: Real) -> Real;
}

/// `T_out = T_r + (T_in − T_r) exp(−NTU)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialDecay;

impl DecayLaw for ExponentialDecay {
    fn outlet_temperature(&self, inlet: Real, ambient: Real, ntu: Real) -> Real {
        if ntu.is_infinite() {
            return ambient;
        }
        ambient + (inlet - ambient) * (-ntu).exp()
    }
}

/// Temperatures attached to junctions and fractures.
///
/// `None` marks places no fluid passes through.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalSolution {
    pub junction_temperatures: Vec<Option<Real>>,
    pub inlet_temperatures: Vec<Option<Real>>,
    pub outlet_temperatures: Vec<Option<Real>>,
    /// Fluid injected at each junction; zero where nothing is injected.
    pub supplies: Vec<Real>,
}

/// Walk junctions upstream first, mix inflows, and relax each outgoing
/// fracture toward the rock temperature.
///
/// `boundary_flows` is the net external inflow per junction: the prescribed
/// value at flow boundaries, the realised value at fixed-pressure junctions.
/// Junctions with neither only mix what arrives through fractures.
pub(crate) fn propagate(
    network: &FractureNetwork,
    fluid: &Fluid,
    field: &FlowField,
    boundary: &ResolvedBoundary,
    boundary_flows: &[Real],
    settings: &SolveSettings,
    law: &dyn DecayLaw,
) -> SolverResult<ThermalSolution> {
    let ambient = boundary.ambient_temperature;
    let mut junction_temperatures = vec![None; network.junction_count()];
    let mut inlet_temperatures = vec![None; network.fracture_count()];
    let mut outlet_temperatures = vec![None; network.fracture_count()];
    let mut supplies = vec![0.0; network.junction_count()];

    // Realised flows at fixed-pressure junctions carry rounding from the linear solve
    let scale = field.rates().iter().fold(0.0_f64, |m, q| m.max(*q));
    let supply_threshold = settings.tolerances.threshold(scale);

    for &junction in field.order() {
        let slot = junction.slot();
        let mut flow_in = 0.0;
        let mut energy_in = 0.0;
        for &f in field.inflows(junction).unwrap_or_default() {
            let rate = field.rate(f).unwrap_or(0.0);
            let t_out = outlet_temperatures[f.slot()].ok_or_else(|| SolverError::Numeric {
                what: format!("fracture {f} reached before its upstream junction"),
            })?;
            flow_in += rate;
            energy_in += rate * t_out;
        }

        let supply = boundary_flows.get(slot).copied().unwrap_or(0.0);
        let injects = if boundary.pressure[slot].is_some() {
            supply > supply_threshold || (flow_in <= 0.0 && supply > 0.0)
        } else {
            supply > 0.0
        };
        if injects {
            let label = network.label(junction)?;
            let t_inj = boundary.injection_temperature[slot].ok_or_else(|| {
                SolverError::InvalidBoundary {
                    what: format!("junction {label} injects fluid but has no injection temperature"),
                }
            })?;
            supplies[slot] = supply;
            flow_in += supply;
            energy_in += supply * t_inj;
        }

        if flow_in <= 0.0 {
            continue;
        }
        let mixed = ensure_finite(energy_in / flow_in, "mixed temperature")
            .map_err(|e| SolverError::Numeric { what: e.to_string() })?;
        junction_temperatures[slot] = Some(mixed);

        for &f in field.outflows(junction).unwrap_or_default() {
            let rate = field.rate(f).unwrap_or(0.0);
            let outlet = if rate <= settings.min_thermal_flow {
                ambient
            } else {
                let edge = network
                    .fracture(f)
                    .ok_or(NetworkError::IdNotFound { what: "FractureId" })?;
                let ntu = edge.fracture.ntu(fluid, settings.nusselt, rate);
                law.outlet_temperature(mixed, ambient, ntu)
            };
            inlet_temperatures[f.slot()] = Some(mixed);
            outlet_temperatures[f.slot()] = Some(outlet);
        }
    }

    debug!(
        heated = outlet_temperatures.iter().filter(|t| t.is_some()).count(),
        "propagated temperatures"
    );

    Ok(ThermalSolution {
        junction_temperatures,
        inlet_temperatures,
        outlet_temperatures,
        supplies,
    })
}

/// Public entry point: temperatures for an already resolved flow field.
pub fn propagate_temperatures(
    network: &FractureNetwork,
    fluid: &Fluid,
    field: &FlowField,
    bc: &BoundaryConditions,
    settings: &SolveSettings,
    law: &dyn DecayLaw,
) -> SolverResult<ThermalSolution> {
    let resolved = bc.resolve(network, settings.tolerances)?;
    let boundary_flows = realised_boundary_flows(network, field, &resolved);
    propagate(network, fluid, field, &resolved, &boundary_flows, settings, law)
}

/// External inflow per junction, taking fixed-pressure junctions from the
/// fracture balance of the flow field.
fn realised_boundary_flows(
    network: &FractureNetwork,
    field: &FlowField,
    boundary: &ResolvedBoundary,
) -> Vec<Real> {
    let mut flows = boundary.external.clone();
    for junction in network.junctions() {
        let slot = junction.id.slot();
        if boundary.pressure[slot].is_none() {
            continue;
        }
        let total = |fractures: Option<&[FractureId]>| -> Real {
            fractures
                .unwrap_or_default()
                .iter()
                .filter_map(|&f| field.rate(f))
                .sum()
        };
        flows[slot] = total(field.outflows(junction.id)) - total(field.inflows(junction.id));
    }
    flows
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn outlet_between_inlet_and_ambient(
            inlet in -500.0_f64..500.0,
            ambient in -500.0_f64..500.0,
            ntu in 0.0_f64..50.0,
        ) {
            let out = ExponentialDecay.outlet_temperature(inlet, ambient, ntu);
            let lo = inlet.min(ambient);
            let hi = inlet.max(ambient);
            prop_assert!(out >= lo - 1e-9 && out <= hi + 1e-9);
        }

        #[test]
        fn more_transfer_units_move_closer_to_ambient(
            inlet in 0.0_f64..100.0,
            ambient in 150.0_f64..300.0,
            ntu in 0.0_f64..20.0,
            extra in 0.01_f64..5.0,
        ) {
            let near = ExponentialDecay.outlet_temperature(inlet, ambient, ntu);
            let far = ExponentialDecay.outlet_temperature(inlet, ambient, ntu + extra);
            prop_assert!((ambient - far) <= (ambient - near));
        }
    }
}
