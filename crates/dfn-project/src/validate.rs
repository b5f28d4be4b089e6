//! Case validation logic.

use std::collections::HashSet;

use dfn_core::JunctionLabel;

use crate::schema::{BoundaryDef, CaseDef, FluidDef, NetworkDef, SettingsDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate junction: {junction} in {context}")]
    DuplicateJunction {
        junction: JunctionLabel,
        context: String,
    },

    #[error("Missing junction: {junction} in {context}")]
    MissingJunction {
        junction: JunctionLabel,
        context: String,
    },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Length mismatch: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_case(case: &CaseDef) -> Result<(), ValidationError> {
    if case.version == 0 || case.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }
    if case.name.trim().is_empty() {
        return Err(invalid("name", &case.name, "must not be empty"));
    }

    validate_fluid(&case.fluid)?;
    let junctions = validate_network(&case.network)?;
    validate_boundary(&case.boundary, &junctions)?;
    validate_settings(&case.settings)?;
    Ok(())
}

fn validate_fluid(fluid: &FluidDef) -> Result<(), ValidationError> {
    if let FluidDef::Custom {
        density,
        viscosity,
        heat_capacity,
        thermal_conductivity,
    } = fluid
    {
        positive("fluid.density", *density)?;
        positive("fluid.viscosity", *viscosity)?;
        positive("fluid.heat_capacity", *heat_capacity)?;
        positive("fluid.thermal_conductivity", *thermal_conductivity)?;
    }
    Ok(())
}

fn validate_network(network: &NetworkDef) -> Result<HashSet<JunctionLabel>, ValidationError> {
    let n = network.connectivity.len();
    if n == 0 {
        return Err(invalid("network.connectivity", "[]", "needs at least one fracture"));
    }

    for (field, values) in [
        ("network.lengths", &network.lengths),
        ("network.heights", &network.heights),
        ("network.widths", &network.widths),
    ] {
        if values.len() != n {
            return Err(ValidationError::LengthMismatch {
                field: field.to_string(),
                expected: n,
                actual: values.len(),
            });
        }
        for (i, &v) in values.iter().enumerate() {
            positive(&format!("{field}[{i}]"), v)?;
        }
    }

    let mut junctions = HashSet::new();
    for (i, &(from, to)) in network.connectivity.iter().enumerate() {
        if from == to {
            return Err(invalid(
                &format!("network.connectivity[{i}]"),
                &format!("({from}, {to})"),
                "fracture connects a junction to itself",
            ));
        }
        junctions.insert(from);
        junctions.insert(to);
    }
    Ok(junctions)
}

fn validate_boundary(
    boundary: &BoundaryDef,
    junctions: &HashSet<JunctionLabel>,
) -> Result<(), ValidationError> {
    finite("boundary.ambient_temperature", boundary.ambient_temperature)?;

    known(junctions, boundary.reference.junction, "boundary.reference")?;
    finite("boundary.reference.pressure", boundary.reference.pressure)?;

    let mut seen = HashSet::new();
    for p in &boundary.fixed_pressures {
        known(junctions, p.junction, "boundary.fixed_pressures")?;
        unique(&mut seen, p.junction, "boundary.fixed_pressures")?;
        finite("boundary.fixed_pressures.pressure", p.pressure)?;
    }

    let mut seen = HashSet::new();
    for q in &boundary.external_flows {
        known(junctions, q.junction, "boundary.external_flows")?;
        unique(&mut seen, q.junction, "boundary.external_flows")?;
        finite("boundary.external_flows.flow", q.flow)?;
    }

    let mut seen = HashSet::new();
    for t in &boundary.injection_temperatures {
        known(junctions, t.junction, "boundary.injection_temperatures")?;
        unique(&mut seen, t.junction, "boundary.injection_temperatures")?;
        finite("boundary.injection_temperatures.temperature", t.temperature)?;
    }
    Ok(())
}

fn validate_settings(settings: &SettingsDef) -> Result<(), ValidationError> {
    positive("settings.nusselt", settings.nusselt)?;
    non_negative("settings.balance_abs_tol", settings.balance_abs_tol)?;
    non_negative("settings.balance_rel_tol", settings.balance_rel_tol)?;
    non_negative("settings.stagnant_rel_tol", settings.stagnant_rel_tol)?;
    non_negative("settings.min_thermal_flow", settings.min_thermal_flow)?;
    Ok(())
}

fn known(
    junctions: &HashSet<JunctionLabel>,
    junction: JunctionLabel,
    context: &str,
) -> Result<(), ValidationError> {
    if junctions.contains(&junction) {
        Ok(())
    } else {
        Err(ValidationError::MissingJunction {
            junction,
            context: context.to_string(),
        })
    }
}

fn unique(
    seen: &mut HashSet<JunctionLabel>,
    junction: JunctionLabel,
    context: &str,
) -> Result<(), ValidationError> {
    if seen.insert(junction) {
        Ok(())
    } else {
        Err(ValidationError::DuplicateJunction {
            junction,
            context: context.to_string(),
        })
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, &value.to_string(), "must be finite"))
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &value.to_string(), "must be finite and > 0"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &value.to_string(), "must be finite and >= 0"))
    }
}
