//! Result data types.

use dfn_solver::{FlowDirection, NetworkSolution};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub case_name: String,
    pub timestamp: String,
    pub solver_version: String,
}

impl RunManifest {
    /// Manifest stamped with the current UTC time.
    pub fn new(run_id: RunId, case_name: &str, solver_version: &str) -> Self {
        Self {
            run_id,
            case_name: case_name.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            solver_version: solver_version.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub fractures: Vec<FractureRecord>,
    pub junctions: Vec<JunctionRecord>,
    pub production_temperature: Option<f64>,
    pub heat_extraction_rate: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DirectionRecord {
    Forward,
    Reverse,
    Stagnant,
}

impl From<FlowDirection> for DirectionRecord {
    fn from(direction: FlowDirection) -> Self {
        match direction {
            FlowDirection::Forward => Self::Forward,
            FlowDirection::Reverse => Self::Reverse,
            FlowDirection::Stagnant => Self::Stagnant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FractureRecord {
    /// Position in the case's connectivity list.
    pub index: usize,
    pub from: u32,
    pub to: u32,
    pub flow_rate: f64,
    pub direction: DirectionRecord,
    pub inlet_temperature: Option<f64>,
    pub outlet_temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JunctionRecord {
    pub label: u32,
    pub pressure: f64,
    pub temperature: Option<f64>,
    pub boundary_flow: f64,
}

impl From<&NetworkSolution> for RunRecord {
    fn from(solution: &NetworkSolution) -> Self {
        let fractures = solution
            .fractures()
            .iter()
            .map(|f| FractureRecord {
                index: f.id.slot(),
                from: f.from,
                to: f.to,
                flow_rate: f.flow_rate,
                direction: f.direction.into(),
                inlet_temperature: f.inlet_temperature,
                outlet_temperature: f.outlet_temperature,
            })
            .collect();
        let junctions = solution
            .junctions()
            .iter()
            .map(|j| JunctionRecord {
                label: j.label,
                pressure: j.pressure,
                temperature: j.temperature,
                boundary_flow: j.boundary_flow,
            })
            .collect();

        Self {
            fractures,
            junctions,
            production_temperature: solution.production_temperature(),
            heat_extraction_rate: solution.heat_extraction_rate(),
        }
    }
}
