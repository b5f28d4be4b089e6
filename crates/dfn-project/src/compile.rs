//! Case → solver inputs.

use dfn_core::Tolerances;
use dfn_fluids::Fluid;
use dfn_graph::FractureNetwork;
use dfn_solver::{BoundaryConditions, SolveSettings};

use crate::ProjectResult;
use crate::schema::{BoundaryDef, CaseDef, FluidDef, SettingsDef};
use crate::validate::validate_case;

/// Everything a solve needs, built from a validated case.
#[derive(Debug, Clone)]
pub struct CompiledCase {
    pub network: FractureNetwork,
    pub fluid: Fluid,
    pub boundary: BoundaryConditions,
    pub settings: SolveSettings,
}

pub fn compile_case(case: &CaseDef) -> ProjectResult<CompiledCase> {
    validate_case(case)?;

    let network = FractureNetwork::from_connectivity(
        &case.network.connectivity,
        &case.network.lengths,
        &case.network.heights,
        &case.network.widths,
    )?;

    Ok(CompiledCase {
        network,
        fluid: compile_fluid(&case.fluid)?,
        boundary: compile_boundary(&case.boundary),
        settings: compile_settings(&case.settings),
    })
}

fn compile_fluid(fluid: &FluidDef) -> ProjectResult<Fluid> {
    Ok(match *fluid {
        FluidDef::Water => Fluid::water(),
        FluidDef::Custom {
            density,
            viscosity,
            heat_capacity,
            thermal_conductivity,
        } => Fluid::new(density, viscosity, heat_capacity, thermal_conductivity)?,
    })
}

fn compile_boundary(def: &BoundaryDef) -> BoundaryConditions {
    let mut bc = BoundaryConditions::new(
        def.reference.junction,
        def.reference.pressure,
        def.ambient_temperature,
    );
    for p in &def.fixed_pressures {
        bc = bc.with_fixed_pressure(p.junction, p.pressure);
    }
    for q in &def.external_flows {
        bc = bc.with_external_flow(q.junction, q.flow);
    }
    for t in &def.injection_temperatures {
        bc = bc.with_injection_temperature(t.junction, t.temperature);
    }
    bc
}

fn compile_settings(def: &SettingsDef) -> SolveSettings {
    SolveSettings {
        tolerances: Tolerances {
            abs: def.balance_abs_tol,
            rel: def.balance_rel_tol,
        },
        stagnant: Tolerances {
            abs: 0.0,
            rel: def.stagnant_rel_tol,
        },
        min_thermal_flow: def.min_thermal_flow,
        nusselt: def.nusselt,
    }
}
