//! Public result of a full solve.

use dfn_core::{FractureId, JunctionId, JunctionLabel, Real};
use dfn_fluids::Fluid;
use dfn_graph::FractureNetwork;

use crate::boundary::ResolvedBoundary;
use crate::direction::{FlowDirection, FlowField};
use crate::error::{SolverError, SolverResult};
use crate::hydraulic::HydraulicSolution;
use crate::thermal::ThermalSolution;

/// Solved state of one fracture.
#[derive(Debug, Clone, PartialEq)]
pub struct FractureResult {
    pub id: FractureId,
    /// Declared ends, as labels.
    pub from: JunctionLabel,
    pub to: JunctionLabel,
    /// Mass flow, positive along `from → to`; zero for stagnant fractures.
    pub flow_rate: Real,
    pub direction: FlowDirection,
    /// `None` when the fracture is stagnant.
    pub inlet_temperature: Option<Real>,
    pub outlet_temperature: Option<Real>,
}

impl FractureResult {
    /// Declared ends reordered so the first is upstream.
    pub fn oriented(&self) -> (JunctionLabel, JunctionLabel) {
        match self.direction {
            FlowDirection::Reverse => (self.to, self.from),
            FlowDirection::Forward | FlowDirection::Stagnant => (self.from, self.to),
        }
    }
}

/// Solved state of one junction.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionResult {
    pub id: JunctionId,
    pub label: JunctionLabel,
    pub pressure: Real,
    /// Flow-weighted mixed temperature; `None` if no fluid passes through.
    pub temperature: Option<Real>,
    /// Net external inflow realised at the junction (negative = produced).
    pub boundary_flow: Real,
    /// Temperature of fluid injected here, when the junction supplies fluid.
    pub injection_temperature: Option<Real>,
}

/// Pressures, flows and temperatures for every junction and fracture.
#[derive(Debug, Clone)]
pub struct NetworkSolution {
    fractures: Vec<FractureResult>,
    junctions: Vec<JunctionResult>,
    field: FlowField,
    heat_capacity: Real,
    ambient_temperature: Real,
}

impl NetworkSolution {
    pub(crate) fn assemble(
        network: &FractureNetwork,
        fluid: &Fluid,
        boundary: &ResolvedBoundary,
        hydraulic: HydraulicSolution,
        field: FlowField,
        thermal: ThermalSolution,
    ) -> SolverResult<Self> {
        let fractures = network
            .fractures()
            .map(|edge| {
                let slot = edge.id.slot();
                let direction = field.direction(edge.id).ok_or_else(|| SolverError::Numeric {
                    what: format!("fracture {} has no resolved direction", edge.id),
                })?;
                let flow_rate = match direction {
                    FlowDirection::Stagnant => 0.0,
                    FlowDirection::Forward | FlowDirection::Reverse => hydraulic.flows[slot],
                };
                Ok(FractureResult {
                    id: edge.id,
                    from: network.label(edge.from())?,
                    to: network.label(edge.to())?,
                    flow_rate,
                    direction,
                    inlet_temperature: thermal.inlet_temperatures[slot],
                    outlet_temperature: thermal.outlet_temperatures[slot],
                })
            })
            .collect::<SolverResult<Vec<_>>>()?;

        let junctions = network
            .junctions()
            .map(|junction| {
                let slot = junction.id.slot();
                let supplies = thermal.supplies[slot] > 0.0;
                JunctionResult {
                    id: junction.id,
                    label: junction.label,
                    pressure: hydraulic.pressures[slot],
                    temperature: thermal.junction_temperatures[slot],
                    boundary_flow: hydraulic.boundary_flows[slot],
                    injection_temperature: boundary.injection_temperature[slot]
                        .filter(|_| supplies),
                }
            })
            .collect();

        Ok(Self {
            fractures,
            junctions,
            field,
            heat_capacity: fluid.heat_capacity(),
            ambient_temperature: boundary.ambient_temperature,
        })
    }

    pub fn fractures(&self) -> &[FractureResult] {
        &self.fractures
    }

    pub fn junctions(&self) -> &[JunctionResult] {
        &self.junctions
    }

    pub fn fracture(&self, id: FractureId) -> Option<&FractureResult> {
        self.fractures.get(id.slot())
    }

    /// Look up a junction by its caller-facing label.
    pub fn junction(&self, label: JunctionLabel) -> Option<&JunctionResult> {
        self.junctions.iter().find(|j| j.label == label)
    }

    /// Signed flow per fracture, in fracture order.
    pub fn flow_rates(&self) -> Vec<Real> {
        self.fractures.iter().map(|f| f.flow_rate).collect()
    }

    pub fn outlet_temperatures(&self) -> Vec<Option<Real>> {
        self.fractures.iter().map(|f| f.outlet_temperature).collect()
    }

    pub fn junction_temperatures(&self) -> Vec<Option<Real>> {
        self.junctions.iter().map(|j| j.temperature).collect()
    }

    pub fn ambient_temperature(&self) -> Real {
        self.ambient_temperature
    }

    /// Directed view used for the thermal walk.
    pub fn flow_field(&self) -> &FlowField {
        &self.field
    }

    /// Connectivity with every flowing fracture ordered upstream → downstream.
    pub fn oriented_connectivity(&self) -> Vec<(JunctionLabel, JunctionLabel)> {
        self.fractures.iter().map(FractureResult::oriented).collect()
    }

    /// Flow-weighted mean temperature of the fluid leaving the network.
    ///
    /// `None` if nothing is produced.
    pub fn production_temperature(&self) -> Option<Real> {
        let (rate, energy) = self
            .junctions
            .iter()
            .filter(|j| j.boundary_flow < 0.0)
            .filter_map(|j| j.temperature.map(|t| (-j.boundary_flow, t)))
            .fold((0.0, 0.0), |(m, e), (q, t)| (m + q, e + q * t));
        (rate > 0.0).then(|| energy / rate)
    }

    /// Heat carried out by produced fluid minus heat brought in by injected fluid.
    ///
    /// Positive when the network extracts heat from the rock.
    pub fn heat_extraction_rate(&self) -> Real {
        self.junctions
            .iter()
            .map(|j| {
                if j.boundary_flow < 0.0 {
                    j.temperature.map_or(0.0, |t| j.boundary_flow * t)
                } else if j.boundary_flow > 0.0 {
                    j.injection_temperature
                        .or(j.temperature)
                        .map_or(0.0, |t| j.boundary_flow * t)
                } else {
                    0.0
                }
            })
            .map(|flux| -flux * self.heat_capacity)
            .sum()
    }
}
