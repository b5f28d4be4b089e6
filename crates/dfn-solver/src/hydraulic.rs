//! Steady pressure and flow distribution.
//!
//! Nodal analysis: each fracture is a linear conductance between its two
//! junctions, so mass conservation at every free junction gives
//!
//!   Σ_f c_f (P_i − P_j) = q_i
//!
//! where `q_i` is the external inflow. Fixed-pressure junctions replace their
//! row with `P_i = p_i`.
//!
//! With strong conductance contrast the pressures of well-connected junctions
//! agree to more digits than `f64` carries, so `c (P_i − P_j)` is noise on the
//! most conductive fractures. Flows on a maximum-conductance spanning tree are
//! therefore taken from the junction balances, and only the remaining
//! (cotree) fractures use the pressure difference.

use dfn_core::{JunctionId, Real};
use dfn_fluids::Fluid;
use dfn_graph::FractureNetwork;
use nalgebra::{DMatrix, DVector};
use petgraph::unionfind::UnionFind;
use tracing::debug;

use crate::boundary::ResolvedBoundary;
use crate::error::{SolverError, SolverResult};
use crate::linear::LinearSolver;

/// Solved pressures and fracture flows.
#[derive(Debug, Clone, PartialEq)]
pub struct HydraulicSolution {
    /// Pressure per junction, by junction index.
    pub pressures: Vec<Real>,
    /// Mass flow per fracture, positive along its declared `from → to`.
    ///
    /// Satisfies the balance at every free junction to rounding.
    pub flows: Vec<Real>,
    /// Net external inflow per junction actually realised by the solution.
    pub boundary_flows: Vec<Real>,
}

/// Solve for nodal pressures and fracture flows.
pub(crate) fn solve_resolved(
    network: &FractureNetwork,
    fluid: &Fluid,
    boundary: &ResolvedBoundary,
    solver: &dyn LinearSolver,
) -> SolverResult<HydraulicSolution> {
    check_constrained(network, boundary)?;

    let n = network.junction_count();
    let conductances: Vec<Real> = network
        .fractures()
        .map(|edge| edge.fracture.conductance(fluid))
        .collect();

    let (matrix, rhs) = assemble(network, &conductances, boundary);
    debug!(
        junctions = n,
        fractures = network.fracture_count(),
        "assembled pressure system"
    );

    let pressures: Vec<Real> = solver.solve(matrix, rhs)?.iter().copied().collect();
    if pressures.len() != n {
        return Err(SolverError::Numeric {
            what: format!("linear solver returned {} values for {} junctions", pressures.len(), n),
        });
    }

    let flows = balanced_flows(network, &conductances, &pressures, boundary);

    let mut boundary_flows = boundary.external.clone();
    let mut realised = vec![0.0; n];
    for (edge, q) in network.fractures().zip(&flows) {
        realised[edge.from().slot()] += q;
        realised[edge.to().slot()] -= q;
    }
    for (slot, p) in boundary.pressure.iter().enumerate() {
        if p.is_some() {
            boundary_flows[slot] = realised[slot];
        }
    }

    Ok(HydraulicSolution {
        pressures,
        flows,
        boundary_flows,
    })
}

/// Public entry point working from label-keyed boundary conditions.
pub fn solve_hydraulics(
    network: &FractureNetwork,
    fluid: &Fluid,
    bc: &crate::BoundaryConditions,
    settings: &crate::SolveSettings,
    solver: &dyn LinearSolver,
) -> SolverResult<HydraulicSolution> {
    let resolved = bc.resolve(network, settings.tolerances)?;
    solve_resolved(network, fluid, &resolved, solver)
}

/// Every connected component must contain at least one fixed pressure.
fn check_constrained(network: &FractureNetwork, boundary: &ResolvedBoundary) -> SolverResult<()> {
    let n = network.junction_count();
    let mut components = UnionFind::<usize>::new(n);
    for edge in network.fractures() {
        components.union(edge.from().slot(), edge.to().slot());
    }

    let mut anchored = vec![false; n];
    for (slot, p) in boundary.pressure.iter().enumerate() {
        if p.is_some() {
            anchored[components.find(slot)] = true;
        }
    }

    for slot in 0..n {
        if !anchored[components.find(slot)] {
            let label = network.label(JunctionId::from_index(slot as u32))?;
            return Err(SolverError::SingularSystem {
                what: format!("junction {label} is not connected to any fixed-pressure junction"),
            });
        }
    }
    Ok(())
}

/// Fracture flows with tree fractures closed by mass balance.
///
/// Fixed-pressure junctions are merged into one ground node. The spanning
/// tree is grown Kruskal-style from the most conductive fracture down; cotree
/// fractures keep `c ΔP`, then tree flows are accumulated from the leaves
/// toward the ground.
fn balanced_flows(
    network: &FractureNetwork,
    conductances: &[Real],
    pressures: &[Real],
    boundary: &ResolvedBoundary,
) -> Vec<Real> {
    let n = network.junction_count();
    let ground = n;
    let node = |j: JunctionId| {
        if boundary.pressure[j.slot()].is_some() {
            ground
        } else {
            j.slot()
        }
    };

    let mut by_conductance: Vec<usize> = (0..conductances.len()).collect();
    by_conductance.sort_by(|&a, &b| conductances[b].total_cmp(&conductances[a]));

    let mut components = UnionFind::<usize>::new(n + 1);
    let mut in_tree = vec![false; conductances.len()];
    let mut tree_adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n + 1];
    let edges: Vec<_> = network.fractures().collect();
    for f in by_conductance {
        let (a, b) = (node(edges[f].from()), node(edges[f].to()));
        if components.union(a, b) {
            in_tree[f] = true;
            tree_adjacency[a].push((f, b));
            tree_adjacency[b].push((f, a));
        }
    }

    let mut flows: Vec<Real> = edges
        .iter()
        .zip(conductances)
        .map(|(edge, c)| c * (pressures[edge.from().slot()] - pressures[edge.to().slot()]))
        .collect();

    // Breadth-first from the ground gives each free junction its parent fracture
    let mut parent: Vec<Option<usize>> = vec![None; n + 1];
    let mut visited = vec![false; n + 1];
    let mut order = vec![ground];
    visited[ground] = true;
    let mut head = 0;
    while head < order.len() {
        let at = order[head];
        head += 1;
        for &(f, next) in &tree_adjacency[at] {
            if !visited[next] {
                visited[next] = true;
                parent[next] = Some(f);
                order.push(next);
            }
        }
    }

    // Net outflow each free junction still has to send through its parent fracture
    let mut pending = vec![0.0; n + 1];
    for slot in 0..n {
        if boundary.pressure[slot].is_none() {
            pending[slot] = boundary.external[slot];
        }
    }
    for (f, edge) in edges.iter().enumerate() {
        if !in_tree[f] {
            pending[node(edge.from())] -= flows[f];
            pending[node(edge.to())] += flows[f];
        }
    }

    for &at in order.iter().skip(1).rev() {
        let Some(f) = parent[at] else {
            continue;
        };
        let edge = &edges[f];
        let q = if node(edge.from()) == at {
            pending[at]
        } else {
            -pending[at]
        };
        flows[f] = q;
        pending[node(edge.from())] -= q;
        pending[node(edge.to())] += q;
    }

    flows
}

/// Assemble the conductance matrix and source vector with pressure rows applied.
fn assemble(
    network: &FractureNetwork,
    conductances: &[Real],
    boundary: &ResolvedBoundary,
) -> (DMatrix<Real>, DVector<Real>) {
    let n = network.junction_count();
    let mut matrix = DMatrix::<Real>::zeros(n, n);
    let mut rhs = DVector::<Real>::from_column_slice(&boundary.external);

    for (edge, &c) in network.fractures().zip(conductances) {
        let (a, b) = (edge.from().slot(), edge.to().slot());
        matrix[(a, a)] += c;
        matrix[(b, b)] += c;
        matrix[(a, b)] -= c;
        matrix[(b, a)] -= c;
    }

    let fixed: Vec<(usize, Real)> = boundary
        .pressure
        .iter()
        .enumerate()
        .filter_map(|(slot, p)| p.map(|p| (slot, p)))
        .collect();

    // Move known pressures to the right-hand side before clearing their rows/columns
    for &(k, p) in &fixed {
        for i in 0..n {
            rhs[i] -= matrix[(i, k)] * p;
        }
    }
    for &(k, p) in &fixed {
        matrix.row_mut(k).fill(0.0);
        matrix.column_mut(k).fill(0.0);
        matrix[(k, k)] = 1.0;
        rhs[k] = p;
    }

    (matrix, rhs)
}
