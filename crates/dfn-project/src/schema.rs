//! Case file schema definitions.

use dfn_core::JunctionLabel;
use serde::{Deserialize, Serialize};

/// One self-contained model run: fluid, network, boundary conditions and settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseDef {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fluid: FluidDef,
    pub network: NetworkDef,
    pub boundary: BoundaryDef,
    #[serde(default)]
    pub settings: SettingsDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum FluidDef {
    #[default]
    Water,
    Custom {
        density: f64,
        viscosity: f64,
        heat_capacity: f64,
        thermal_conductivity: f64,
    },
}

/// Network as parallel per-fracture sequences; the i-th pair uses the i-th geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDef {
    pub connectivity: Vec<(JunctionLabel, JunctionLabel)>,
    pub lengths: Vec<f64>,
    pub heights: Vec<f64>,
    pub widths: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    pub reference: PressureDef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed_pressures: Vec<PressureDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_flows: Vec<FlowDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub injection_temperatures: Vec<TemperatureDef>,
    pub ambient_temperature: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PressureDef {
    pub junction: JunctionLabel,
    pub pressure: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FlowDef {
    pub junction: JunctionLabel,
    /// Positive = injected, negative = produced.
    pub flow: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TemperatureDef {
    pub junction: JunctionLabel,
    pub temperature: f64,
}

/// Numerical settings; every field falls back to the solver default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettingsDef {
    pub nusselt: f64,
    pub balance_abs_tol: f64,
    pub balance_rel_tol: f64,
    pub stagnant_rel_tol: f64,
    pub min_thermal_flow: f64,
}

impl Default for SettingsDef {
    fn default() -> Self {
        let defaults = dfn_solver::SolveSettings::default();
        Self {
            nusselt: defaults.nusselt,
            balance_abs_tol: defaults.tolerances.abs,
            balance_rel_tol: defaults.tolerances.rel,
            stagnant_rel_tol: defaults.stagnant.rel,
            min_thermal_flow: defaults.min_thermal_flow,
        }
    }
}
