//! Flow directions and upstream-to-downstream ordering.

use dfn_core::{FractureId, JunctionId, JunctionLabel, Real, Tolerances};
use dfn_graph::FractureNetwork;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, warn};

use crate::error::{SolverError, SolverResult};

/// Resolved direction of flow in a fracture relative to its declared ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowDirection {
    /// Flow runs `from → to`.
    Forward,
    /// Flow runs `to → from`.
    Reverse,
    /// No measurable flow; excluded from thermal propagation.
    Stagnant,
}

/// Directed view of a solved flow field.
///
/// Built from signed fracture flows; the stored network is never modified.
#[derive(Debug, Clone)]
pub struct FlowField {
    directions: Vec<FlowDirection>,
    rates: Vec<Real>,
    /// [upstream, downstream] per flow-carrying fracture.
    ends: Vec<Option<[JunctionId; 2]>>,
    /// Flow-carrying fractures leaving each junction.
    outflows: Vec<Vec<FractureId>>,
    /// Flow-carrying fractures entering each junction.
    inflows: Vec<Vec<FractureId>>,
    order: Vec<JunctionId>,
    threshold: Real,
}

/// Assign directions from signed flows and order junctions upstream first.
///
/// A fracture whose flow magnitude is within `stagnant.threshold(max |q|)`
/// is stagnant. Fails with `CyclicFlow` if the remaining fractures contain a
/// directed cycle.
pub fn resolve_directions(
    network: &FractureNetwork,
    flows: &[Real],
    stagnant: Tolerances,
) -> SolverResult<FlowField> {
    let n = network.junction_count();
    if flows.len() != network.fracture_count() {
        return Err(SolverError::Numeric {
            what: format!(
                "{} flows given for {} fractures",
                flows.len(),
                network.fracture_count()
            ),
        });
    }
    if let Some(q) = flows.iter().find(|q| !q.is_finite()) {
        return Err(SolverError::Numeric {
            what: format!("non-finite fracture flow {q}"),
        });
    }

    let scale = flows.iter().fold(0.0_f64, |m, q| m.max(q.abs()));
    let threshold = stagnant.threshold(scale);

    let mut graph: DiGraph<JunctionId, FractureId> = DiGraph::with_capacity(n, flows.len());
    for junction in network.junctions() {
        graph.add_node(junction.id);
    }

    let mut directions = Vec::with_capacity(flows.len());
    let mut rates = Vec::with_capacity(flows.len());
    let mut ends = Vec::with_capacity(flows.len());
    let mut outflows = vec![Vec::new(); n];
    let mut inflows = vec![Vec::new(); n];

    for (edge, &q) in network.fractures().zip(flows) {
        let rate = q.abs();
        let (direction, upstream, downstream) = if rate <= threshold {
            (FlowDirection::Stagnant, edge.from(), edge.to())
        } else if q > 0.0 {
            (FlowDirection::Forward, edge.from(), edge.to())
        } else {
            (FlowDirection::Reverse, edge.to(), edge.from())
        };

        directions.push(direction);
        if direction == FlowDirection::Stagnant {
            rates.push(0.0);
            ends.push(None);
            continue;
        }

        rates.push(rate);
        ends.push(Some([upstream, downstream]));
        outflows[upstream.slot()].push(edge.id);
        inflows[downstream.slot()].push(edge.id);
        graph.add_edge(
            NodeIndex::new(upstream.slot()),
            NodeIndex::new(downstream.slot()),
            edge.id,
        );
    }

    let stagnant_count = directions
        .iter()
        .filter(|d| **d == FlowDirection::Stagnant)
        .count();
    if stagnant_count > 0 {
        warn!(stagnant_count, "fractures without flow left out of thermal propagation");
    }

    let order = toposort(&graph, None).map_err(|cycle| {
        let junction = graph[cycle.node_id()];
        SolverError::CyclicFlow {
            junction: network.label(junction).unwrap_or(junction.index()),
        }
    })?;
    let order: Vec<JunctionId> = order.into_iter().map(|node| graph[node]).collect();
    debug!(junctions = order.len(), "resolved flow order");

    Ok(FlowField {
        directions,
        rates,
        ends,
        outflows,
        inflows,
        order,
        threshold,
    })
}

impl FlowField {
    /// `None` if the fracture is not part of the solved network.
    pub fn direction(&self, fracture: FractureId) -> Option<FlowDirection> {
        self.directions.get(fracture.slot()).copied()
    }

    pub fn directions(&self) -> &[FlowDirection] {
        &self.directions
    }

    /// Flow magnitude (zero for stagnant fractures).
    pub fn rate(&self, fracture: FractureId) -> Option<Real> {
        self.rates.get(fracture.slot()).copied()
    }

    pub fn rates(&self) -> &[Real] {
        &self.rates
    }

    /// Junction the fluid enters the fracture from.
    pub fn upstream(&self, fracture: FractureId) -> Option<JunctionId> {
        self.ends.get(fracture.slot()).copied().flatten().map(|e| e[0])
    }

    /// Junction the fluid leaves the fracture into.
    pub fn downstream(&self, fracture: FractureId) -> Option<JunctionId> {
        self.ends.get(fracture.slot()).copied().flatten().map(|e| e[1])
    }

    /// Flow-carrying fractures whose downstream end is `junction`.
    pub fn inflows(&self, junction: JunctionId) -> Option<&[FractureId]> {
        self.inflows.get(junction.slot()).map(Vec::as_slice)
    }

    /// Flow-carrying fractures whose upstream end is `junction`.
    pub fn outflows(&self, junction: JunctionId) -> Option<&[FractureId]> {
        self.outflows.get(junction.slot()).map(Vec::as_slice)
    }

    /// Junctions in topological order: every junction follows all junctions upstream of it.
    pub fn order(&self) -> &[JunctionId] {
        &self.order
    }

    /// Flow magnitude at or below which a fracture counts as stagnant.
    pub fn threshold(&self) -> Real {
        self.threshold
    }

    /// Junctions that send fluid into the network but receive none through fractures.
    pub fn injection_junctions(&self) -> Vec<JunctionId> {
        self.order
            .iter()
            .copied()
            .filter(|j| self.inflows[j.slot()].is_empty() && !self.outflows[j.slot()].is_empty())
            .collect()
    }

    /// Connectivity with each flowing fracture ordered upstream → downstream.
    ///
    /// Stagnant fractures keep their declared order.
    pub fn oriented_connectivity(
        &self,
        network: &FractureNetwork,
    ) -> Vec<(JunctionLabel, JunctionLabel)> {
        network
            .connectivity()
            .into_iter()
            .zip(&self.directions)
            .map(|((from, to), direction)| match direction {
                FlowDirection::Reverse => (to, from),
                FlowDirection::Forward | FlowDirection::Stagnant => (from, to),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(conn: &[(u32, u32)]) -> FractureNetwork {
        let n = conn.len();
        FractureNetwork::from_connectivity(conn, &vec![1.0; n], &vec![1.0; n], &vec![1.0; n])
            .unwrap()
    }

    fn tol() -> Tolerances {
        Tolerances { abs: 0.0, rel: 1e-12 }
    }

    #[test]
    fn reverse_flow_is_reoriented() {
        let net = network(&[(0, 1), (2, 1)]);
        let field = resolve_directions(&net, &[2.0, -2.0], tol()).unwrap();

        assert_eq!(field.direction(FractureId::from_index(0)), Some(FlowDirection::Forward));
        assert_eq!(field.direction(FractureId::from_index(1)), Some(FlowDirection::Reverse));
        assert_eq!(field.rate(FractureId::from_index(1)), Some(2.0));
        assert_eq!(field.oriented_connectivity(&net), vec![(0, 1), (1, 2)]);
        let labels: Vec<_> = field
            .order()
            .iter()
            .map(|j| net.label(*j).unwrap())
            .collect();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn zero_flow_is_stagnant() {
        let net = network(&[(0, 1), (1, 2), (0, 2)]);
        let field = resolve_directions(&net, &[1.0, 1.0, 1e-15], tol()).unwrap();
        let f2 = FractureId::from_index(2);
        assert_eq!(field.direction(f2), Some(FlowDirection::Stagnant));
        assert_eq!(field.rate(f2), Some(0.0));
        assert_eq!(field.upstream(f2), None);
        assert_eq!(field.outflows(JunctionId::from_index(0)).map(<[_]>::len), Some(1));
    }

    #[test]
    fn cycle_is_rejected() {
        let net = network(&[(0, 1), (1, 2), (2, 0)]);
        let err = resolve_directions(&net, &[1.0, 1.0, 1.0], tol()).unwrap_err();
        assert!(matches!(err, SolverError::CyclicFlow { .. }));
    }

    #[test]
    fn cycle_broken_by_stagnant_fracture_is_fine() {
        let net = network(&[(0, 1), (1, 2), (2, 0)]);
        let field = resolve_directions(&net, &[1.0, 1.0, 0.0], tol()).unwrap();
        assert_eq!(field.injection_junctions(), vec![JunctionId::from_index(0)]);
    }

    #[test]
    fn foreign_ids_give_none() {
        let net = network(&[(0, 1)]);
        let field = resolve_directions(&net, &[1.0], tol()).unwrap();
        let f = FractureId::from_index(7);
        let j = JunctionId::from_index(7);
        assert_eq!(field.direction(f), None);
        assert_eq!(field.rate(f), None);
        assert_eq!(field.downstream(f), None);
        assert_eq!(field.inflows(j), None);
        assert_eq!(field.outflows(j), None);
    }

    #[test]
    fn flow_count_must_match() {
        let net = network(&[(0, 1)]);
        assert!(matches!(
            resolve_directions(&net, &[1.0, 2.0], tol()),
            Err(SolverError::Numeric { .. })
        ));
    }
}
