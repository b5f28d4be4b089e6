//! Flow paths and mixing shares over a resolved flow field.

use dfn_core::{FractureId, JunctionId, JunctionLabel, Real};
use dfn_graph::FractureNetwork;

use crate::direction::FlowField;
use crate::error::SolverResult;

/// Share of the fluid arriving at a fracture's downstream junction that
/// came through that fracture.
///
/// Fluid injected at the junction itself counts toward the total, so the
/// shares of all inflowing fractures sum to one only where nothing is
/// injected. `None` for stagnant fractures.
pub fn mass_contribution(field: &FlowField, fracture: FractureId) -> Option<Real> {
    let downstream = field.downstream(fracture)?;
    let arriving = total_arriving(field, downstream)?;
    if arriving <= 0.0 {
        return None;
    }
    Some(field.rate(fracture)? / arriving)
}

fn total_arriving(field: &FlowField, junction: JunctionId) -> Option<Real> {
    let total = |fractures: &[FractureId]| -> Real {
        fractures.iter().filter_map(|&f| field.rate(f)).sum()
    };
    let inflow = total(field.inflows(junction)?);
    let outflow = total(field.outflows(junction)?);
    Some(inflow.max(outflow))
}

/// Every downstream path of flowing fractures from `from` to `to`.
///
/// Paths are listed in depth-first order following each junction's
/// outflows. A junction reaches itself through the single empty path.
pub fn flow_paths(
    network: &FractureNetwork,
    field: &FlowField,
    from: JunctionLabel,
    to: JunctionLabel,
) -> SolverResult<Vec<Vec<FractureId>>> {
    let start = network.junction_id(from)?;
    let target = network.junction_id(to)?;

    let mut paths = Vec::new();
    let mut current = Vec::new();
    walk(field, start, target, &mut current, &mut paths);
    Ok(paths)
}

// The flow field is acyclic, so the recursion depth is bounded by the junction count.
fn walk(
    field: &FlowField,
    at: JunctionId,
    target: JunctionId,
    current: &mut Vec<FractureId>,
    paths: &mut Vec<Vec<FractureId>>,
) {
    if at == target {
        paths.push(current.clone());
        return;
    }
    for &f in field.outflows(at).unwrap_or_default() {
        let Some(next) = field.downstream(f) else {
            continue;
        };
        current.push(f);
        walk(field, next, target, current, paths);
        current.pop();
    }
}
