//! Boundary conditions for a solve.

use std::collections::BTreeMap;

use dfn_core::{JunctionId, JunctionLabel, Real, Tolerances};
use dfn_graph::FractureNetwork;

use crate::error::{SolverError, SolverResult};

/// Boundary conditions, keyed by junction label.
///
/// - one reference junction with a fixed pressure (the datum)
/// - optional further fixed-pressure junctions
/// - external mass flows (positive = injected, negative = produced)
/// - injection temperatures for junctions that supply fluid
/// - the ambient rock temperature
///
/// Passed by reference into every solve, so one network can be solved
/// under many boundary sets.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryConditions {
    reference: JunctionLabel,
    reference_pressure: Real,
    fixed_pressures: BTreeMap<JunctionLabel, Real>,
    external_flows: BTreeMap<JunctionLabel, Real>,
    injection_temperatures: BTreeMap<JunctionLabel, Real>,
    ambient_temperature: Real,
}

impl BoundaryConditions {
    pub fn new(reference: JunctionLabel, reference_pressure: Real, ambient_temperature: Real) -> Self {
        Self {
            reference,
            reference_pressure,
            fixed_pressures: BTreeMap::new(),
            external_flows: BTreeMap::new(),
            injection_temperatures: BTreeMap::new(),
            ambient_temperature,
        }
    }

    /// Prescribe the external mass flow at a junction (replaces any previous value).
    pub fn with_external_flow(mut self, junction: JunctionLabel, flow: Real) -> Self {
        self.external_flows.insert(junction, flow);
        self
    }

    /// Fix the pressure at an additional junction.
    pub fn with_fixed_pressure(mut self, junction: JunctionLabel, pressure: Real) -> Self {
        self.fixed_pressures.insert(junction, pressure);
        self
    }

    /// Temperature of fluid injected at a junction.
    pub fn with_injection_temperature(mut self, junction: JunctionLabel, temperature: Real) -> Self {
        self.injection_temperatures.insert(junction, temperature);
        self
    }

    /// Convenience for a single injector/producer doublet at the given rate.
    pub fn doublet(
        injector: JunctionLabel,
        producer: JunctionLabel,
        flow: Real,
        injection_temperature: Real,
        ambient_temperature: Real,
    ) -> Self {
        Self::new(producer, 0.0, ambient_temperature)
            .with_external_flow(injector, flow)
            .with_external_flow(producer, -flow)
            .with_injection_temperature(injector, injection_temperature)
    }

    pub fn reference(&self) -> (JunctionLabel, Real) {
        (self.reference, self.reference_pressure)
    }

    pub fn fixed_pressures(&self) -> &BTreeMap<JunctionLabel, Real> {
        &self.fixed_pressures
    }

    pub fn external_flows(&self) -> &BTreeMap<JunctionLabel, Real> {
        &self.external_flows
    }

    pub fn injection_temperatures(&self) -> &BTreeMap<JunctionLabel, Real> {
        &self.injection_temperatures
    }

    pub fn ambient_temperature(&self) -> Real {
        self.ambient_temperature
    }

    /// Map labels onto the network and check consistency.
    pub(crate) fn resolve(
        &self,
        network: &FractureNetwork,
        tolerances: Tolerances,
    ) -> SolverResult<ResolvedBoundary> {
        let n = network.junction_count();
        let mut pressure = vec![None; n];
        let mut external = vec![0.0; n];
        let mut injection_temperature = vec![None; n];

        check_finite(self.ambient_temperature, "ambient temperature")?;

        let reference = junction(network, self.reference)?;
        check_finite(self.reference_pressure, "reference pressure")?;
        pressure[reference.slot()] = Some(self.reference_pressure);

        for (&label, &p) in &self.fixed_pressures {
            check_finite(p, "fixed pressure")?;
            let slot = junction(network, label)?.slot();
            if let Some(existing) = pressure[slot]
                && existing != p
            {
                return Err(SolverError::InvalidBoundary {
                    what: format!("junction {label} has two different fixed pressures"),
                });
            }
            pressure[slot] = Some(p);
        }

        for (&label, &q) in &self.external_flows {
            check_finite(q, "external flow")?;
            external[junction(network, label)?.slot()] = q;
        }

        for (&label, &t) in &self.injection_temperatures {
            check_finite(t, "injection temperature")?;
            injection_temperature[junction(network, label)?.slot()] = Some(t);
        }

        let fixed_count = pressure.iter().filter(|p| p.is_some()).count();
        if fixed_count == 1 {
            // Single datum: the external flows alone must conserve mass
            let net: Real = external.iter().sum();
            let scale = external.iter().fold(0.0_f64, |m, q| m.max(q.abs()));
            if net.abs() > tolerances.threshold(scale) {
                return Err(SolverError::SingularSystem {
                    what: format!("external flows do not balance (net = {net:e})"),
                });
            }
        } else {
            for (slot, p) in pressure.iter().enumerate() {
                if p.is_some() && external[slot] != 0.0 {
                    let label = network.label(JunctionId::from_index(slot as u32))?;
                    return Err(SolverError::InvalidBoundary {
                        what: format!(
                            "junction {label} has both a fixed pressure and an external flow"
                        ),
                    });
                }
            }
        }

        Ok(ResolvedBoundary {
            pressure,
            external,
            injection_temperature,
            ambient_temperature: self.ambient_temperature,
        })
    }
}

/// Boundary conditions addressed by contiguous junction index.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedBoundary {
    pub pressure: Vec<Option<Real>>,
    pub external: Vec<Real>,
    pub injection_temperature: Vec<Option<Real>>,
    pub ambient_temperature: Real,
}

fn junction(network: &FractureNetwork, label: JunctionLabel) -> SolverResult<JunctionId> {
    network
        .junction_id(label)
        .map_err(|_| SolverError::InvalidBoundary {
            what: format!("junction {label} is not part of the network"),
        })
}

fn check_finite(value: Real, what: &str) -> SolverResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SolverError::InvalidBoundary {
            what: format!("{what} is not finite ({value})"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> FractureNetwork {
        FractureNetwork::from_connectivity(
            &[(0, 1), (1, 2)],
            &[1.0; 2],
            &[1.0; 2],
            &[1.0; 2],
        )
        .unwrap()
    }

    #[test]
    fn doublet_resolves() {
        let bc = BoundaryConditions::doublet(0, 2, 5.0, 300.0, 400.0);
        let resolved = bc.resolve(&chain(), Tolerances::default()).unwrap();
        assert_eq!(resolved.pressure, vec![None, None, Some(0.0)]);
        assert_eq!(resolved.external, vec![5.0, 0.0, -5.0]);
        assert_eq!(resolved.injection_temperature[0], Some(300.0));
        assert_eq!(resolved.ambient_temperature, 400.0);
    }

    #[test]
    fn unbalanced_flows_are_singular() {
        let bc = BoundaryConditions::new(2, 0.0, 400.0)
            .with_external_flow(0, 5.0)
            .with_external_flow(2, -4.0);
        let err = bc.resolve(&chain(), Tolerances::default()).unwrap_err();
        assert!(matches!(err, SolverError::SingularSystem { .. }));
    }

    #[test]
    fn unknown_junction() {
        let bc = BoundaryConditions::new(9, 0.0, 400.0);
        let err = bc.resolve(&chain(), Tolerances::default()).unwrap_err();
        assert!(matches!(err, SolverError::InvalidBoundary { .. }));
    }

    #[test]
    fn pressure_and_flow_conflict_with_several_datums() {
        let bc = BoundaryConditions::new(0, 10.0, 400.0)
            .with_fixed_pressure(2, 0.0)
            .with_external_flow(2, -1.0);
        let err = bc.resolve(&chain(), Tolerances::default()).unwrap_err();
        assert!(matches!(err, SolverError::InvalidBoundary { .. }));
    }

    #[test]
    fn several_datums_need_no_balance() {
        let bc = BoundaryConditions::new(0, 10.0, 400.0)
            .with_fixed_pressure(2, 0.0)
            .with_external_flow(1, 3.0);
        assert!(bc.resolve(&chain(), Tolerances::default()).is_ok());
    }

    #[test]
    fn non_finite_values_rejected() {
        let bc = BoundaryConditions::doublet(0, 2, f64::NAN, 300.0, 400.0);
        assert!(matches!(
            bc.resolve(&chain(), Tolerances::default()),
            Err(SolverError::InvalidBoundary { .. })
        ));
    }
}
