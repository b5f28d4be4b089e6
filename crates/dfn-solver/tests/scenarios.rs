//! End-to-end solves on small networks.

use dfn_core::{FractureId, Real, Tolerances};
use dfn_fluids::Fluid;
use dfn_graph::FractureNetwork;
use dfn_solver::{
    BoundaryConditions, FlowDirection, SolveSettings, SolverError, resolve_directions, solve,
};
use proptest::prelude::*;

fn single(length: Real) -> FractureNetwork {
    FractureNetwork::from_connectivity(&[(0, 1)], &[length], &[500.0], &[1e-3]).unwrap()
}

fn branched(widths: &[Real]) -> FractureNetwork {
    FractureNetwork::from_connectivity(
        &[(0, 1), (1, 2), (1, 3), (2, 4), (3, 4), (4, 5)],
        &[100.0, 500.0, 500.0, 500.0, 500.0, 100.0],
        &[500.0; 6],
        widths,
    )
    .unwrap()
}

/// Signed net outflow through fractures at every junction.
fn fracture_outflow(network: &FractureNetwork, flows: &[Real]) -> Vec<Real> {
    let mut net = vec![0.0; network.junction_count()];
    for (edge, q) in network.fractures().zip(flows) {
        net[edge.from().slot()] += q;
        net[edge.to().slot()] -= q;
    }
    net
}

#[test]
fn single_fracture_doublet() {
    // Rate picked so the fracture has about one transfer unit
    let q = 5.0e4;
    let bc = BoundaryConditions::doublet(0, 1, q, 20.0, 150.0);
    let sol = solve(&single(100.0), &Fluid::water(), &bc, &SolveSettings::default()).unwrap();

    let f = &sol.fractures()[0];
    assert!((f.flow_rate - q).abs() <= 1e-9 * q);
    assert_eq!(f.direction, FlowDirection::Forward);
    assert_eq!(f.inlet_temperature, Some(20.0));

    let t_out = f.outlet_temperature.unwrap();
    assert!(t_out > 20.0 && t_out < 150.0);
    assert_eq!(sol.junction(1).unwrap().temperature, Some(t_out));
    assert_eq!(sol.junction(1).unwrap().pressure, 0.0);
    assert!(sol.junction(0).unwrap().pressure > 0.0);
}

#[test]
fn longer_fracture_ends_closer_to_rock() {
    let bc = BoundaryConditions::doublet(0, 1, 5.0e4, 20.0, 150.0);
    let outlets: Vec<Real> = [50.0, 100.0, 200.0, 400.0]
        .iter()
        .map(|&l| {
            let sol =
                solve(&single(l), &Fluid::water(), &bc, &SolveSettings::default()).unwrap();
            sol.fractures()[0].outlet_temperature.unwrap()
        })
        .collect();
    for pair in outlets.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    assert!(outlets[3] < 150.0);
}

#[test]
fn parallel_fractures_split_by_conductance() {
    let network = FractureNetwork::from_connectivity(
        &[(0, 1), (1, 2), (1, 2), (2, 3)],
        &[100.0, 500.0, 500.0, 100.0],
        &[500.0; 4],
        &[1e-3, 1e-3, 2e-3, 1e-3],
    )
    .unwrap();
    let bc = BoundaryConditions::doublet(0, 3, 10.0, 20.0, 100.0);
    let sol = solve(&network, &Fluid::water(), &bc, &SolveSettings::default()).unwrap();

    let q = sol.flow_rates();
    assert_eq!(q.len(), 4);
    assert!((q[2] / q[1] - 8.0).abs() < 1e-9);
    assert!((q[1] + q[2] - 10.0).abs() < 1e-9);
    assert_eq!(sol.fractures()[1].from, 1);
    assert_eq!(sol.fractures()[2].to, 2);
    assert!(sol.fractures()[1].outlet_temperature.is_some());
    assert!(sol.fractures()[2].outlet_temperature.is_some());
}

#[test]
fn unbalanced_flows_are_singular() {
    let bc = BoundaryConditions::new(5, 0.0, 100.0)
        .with_external_flow(0, 2.0)
        .with_external_flow(5, -1.0)
        .with_injection_temperature(0, 20.0);
    let err = solve(&branched(&[1e-3; 6]), &Fluid::water(), &bc, &SolveSettings::default())
        .unwrap_err();
    assert!(matches!(err, SolverError::SingularSystem { .. }));
}

#[test]
fn unconstrained_island_is_singular() {
    let network = FractureNetwork::from_connectivity(
        &[(0, 1), (2, 3)],
        &[1.0; 2],
        &[1.0; 2],
        &[1e-3; 2],
    )
    .unwrap();
    let bc = BoundaryConditions::doublet(0, 1, 1.0, 20.0, 100.0);
    let err = solve(&network, &Fluid::water(), &bc, &SolveSettings::default()).unwrap_err();
    assert!(matches!(err, SolverError::SingularSystem { .. }));
}

#[test]
fn cyclic_flow_is_rejected() {
    let network = FractureNetwork::from_connectivity(
        &[(0, 1), (1, 2), (2, 3), (3, 1)],
        &[1.0; 4],
        &[1.0; 4],
        &[1.0; 4],
    )
    .unwrap();
    // Circulation around 1 → 2 → 3 → 1 cannot come from a pressure field
    let err = resolve_directions(
        &network,
        &[1.0, 2.0, 2.0, 1.0],
        Tolerances { abs: 0.0, rel: 1e-12 },
    )
    .unwrap_err();
    assert!(matches!(err, SolverError::CyclicFlow { .. }));
}

#[test]
fn pressure_driven_by_two_fixed_junctions() {
    let bc = BoundaryConditions::new(0, 1.0e5, 100.0)
        .with_fixed_pressure(5, 0.0)
        .with_injection_temperature(0, 20.0);
    let sol = solve(&branched(&[1e-3; 6]), &Fluid::water(), &bc, &SolveSettings::default())
        .unwrap();

    let injected = sol.junction(0).unwrap().boundary_flow;
    let produced = sol.junction(5).unwrap().boundary_flow;
    assert!(injected > 0.0);
    assert!((injected + produced).abs() <= 1e-9 * injected);
    assert_eq!(sol.junction(0).unwrap().injection_temperature, Some(20.0));
}

#[test]
fn fixed_pressure_supply_needs_temperature() {
    let bc = BoundaryConditions::new(0, 1.0e5, 100.0).with_fixed_pressure(5, 0.0);
    let err = solve(&branched(&[1e-3; 6]), &Fluid::water(), &bc, &SolveSettings::default())
        .unwrap_err();
    assert!(matches!(err, SolverError::InvalidBoundary { .. }));
}

#[test]
fn stagnant_fracture_has_no_temperature() {
    // Bridge 2–3 joins two identical branches at equal pressure
    let network = FractureNetwork::from_connectivity(
        &[(0, 1), (1, 2), (1, 3), (2, 4), (3, 4), (2, 3)],
        &[1.0; 6],
        &[1.0; 6],
        &[1e-3; 6],
    )
    .unwrap();
    let bc = BoundaryConditions::doublet(0, 4, 1.0, 20.0, 100.0);
    let sol = solve(&network, &Fluid::water(), &bc, &SolveSettings::default()).unwrap();

    let bridge = sol.fracture(FractureId::from_index(5)).unwrap();
    assert_eq!(bridge.direction, FlowDirection::Stagnant);
    assert_eq!(bridge.flow_rate, 0.0);
    assert_eq!(bridge.outlet_temperature, None);
    assert_eq!(bridge.inlet_temperature, None);
    assert!(sol.junction(4).unwrap().temperature.is_some());
}

#[test]
fn high_contrast_chain_only_injects_at_the_boundary() {
    // Pressures next to a nearly closed fracture swamp the drops across the wide ones
    for w_small in [3.0e-6, 5.0e-6, 1.0e-5] {
        let network = FractureNetwork::from_connectivity(
            &[(0, 1), (1, 2), (2, 3)],
            &[1.0, 1.0, 1000.0],
            &[500.0; 3],
            &[1e-2, 1e-2, w_small],
        )
        .unwrap();
        let bc = BoundaryConditions::doublet(0, 3, 1.0, 20.0, 150.0);
        let sol = solve(&network, &Fluid::water(), &bc, &SolveSettings::default())
            .unwrap_or_else(|e| panic!("w = {w_small:e}: {e}"));

        for f in sol.fractures() {
            assert_eq!(f.direction, FlowDirection::Forward);
            assert!((f.flow_rate - 1.0).abs() < 1e-12);
        }
        for label in [1, 2] {
            assert_eq!(sol.junction(label).unwrap().injection_temperature, None);
        }
        let t = sol.production_temperature().unwrap();
        assert!((20.0..=150.0).contains(&t));
    }
}

#[test]
fn flows_follow_pressure() {
    let widths = [1e-3, 2e-3, 1e-3, 1.5e-3, 1e-3, 1e-3];
    let network = branched(&widths);
    let bc = BoundaryConditions::doublet(0, 5, 3.0, 20.0, 100.0);
    let sol = solve(&network, &Fluid::water(), &bc, &SolveSettings::default()).unwrap();

    for f in sol.fractures() {
        let p_from = sol.junction(f.from).unwrap().pressure;
        let p_to = sol.junction(f.to).unwrap().pressure;
        match f.direction {
            FlowDirection::Forward => assert!(p_from > p_to && f.flow_rate > 0.0),
            FlowDirection::Reverse => assert!(p_from < p_to && f.flow_rate < 0.0),
            FlowDirection::Stagnant => {}
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mass_is_conserved(
        widths in prop::collection::vec(1e-4_f64..5e-3, 6),
        rate in 0.1_f64..100.0,
    ) {
        let network = branched(&widths);
        let bc = BoundaryConditions::doublet(0, 5, rate, 20.0, 100.0);
        let sol = solve(&network, &Fluid::water(), &bc, &SolveSettings::default()).unwrap();

        let net = fracture_outflow(&network, &sol.flow_rates());
        for (junction, out) in sol.junctions().iter().zip(&net) {
            prop_assert!((junction.boundary_flow - out).abs() <= 1e-8 * rate);
        }
        prop_assert!((sol.junction(0).unwrap().boundary_flow - rate).abs() <= 1e-8 * rate);
    }

    #[test]
    fn outlets_stay_between_inlet_and_rock(
        widths in prop::collection::vec(1e-4_f64..5e-3, 6),
        t_inj in 0.0_f64..100.0,
        t_rock in 100.0_f64..300.0,
    ) {
        let network = branched(&widths);
        let bc = BoundaryConditions::doublet(0, 5, 1.0e3, t_inj, t_rock);
        let sol = solve(&network, &Fluid::water(), &bc, &SolveSettings::default()).unwrap();

        for f in sol.fractures() {
            if let (Some(t_in), Some(t_out)) = (f.inlet_temperature, f.outlet_temperature) {
                prop_assert!(t_out >= t_in - 1e-9 && t_out <= t_rock + 1e-9);
            }
        }
    }
}
