//! Network validation logic.

use std::collections::HashSet;

use dfn_core::FractureId;

use crate::error::{NetworkError, NetworkResult};
use crate::indexing::JunctionIndex;
use crate::network::{FractureEdge, Junction};

/// Validate the network structure: non-empty, references exist, no self-loops.
pub(crate) fn validate_structure(
    junctions: &[Junction],
    fractures: &[FractureEdge],
    index: &JunctionIndex,
) -> NetworkResult<()> {
    if fractures.is_empty() {
        return Err(NetworkError::Empty);
    }

    // IDs must be contiguous and match their positions
    for (i, junction) in junctions.iter().enumerate() {
        if junction.id.slot() != i || index.id(junction.label)? != junction.id {
            return Err(NetworkError::IdNotFound { what: "JunctionId" });
        }
    }
    for (i, edge) in fractures.iter().enumerate() {
        if edge.id.slot() != i {
            return Err(NetworkError::IdNotFound { what: "FractureId" });
        }
    }

    for (i, edge) in fractures.iter().enumerate() {
        for end in edge.ends {
            if end.slot() >= junctions.len() {
                return Err(NetworkError::IdNotFound { what: "JunctionId" });
            }
        }
        if edge.from() == edge.to() {
            return Err(NetworkError::SelfLoop {
                fracture: i,
                junction: junctions[edge.from().slot()].label,
            });
        }
    }

    Ok(())
}

/// Validate adjacency lists for consistency.
pub(crate) fn validate_adjacency(
    junctions: &[Junction],
    fractures: &[FractureEdge],
    offsets: &[usize],
    incident: &[FractureId],
) -> NetworkResult<()> {
    if offsets.len() != junctions.len() + 1 {
        return Err(NetworkError::IdNotFound {
            what: "adjacency offsets",
        });
    }

    let mut seen: HashSet<(FractureId, usize)> = HashSet::new();
    for junction in junctions {
        let idx = junction.id.slot();
        for &fracture_id in &incident[offsets[idx]..offsets[idx + 1]] {
            let edge = fractures
                .get(fracture_id.slot())
                .ok_or(NetworkError::IdNotFound { what: "FractureId" })?;

            if !edge.ends.contains(&junction.id) {
                return Err(NetworkError::InconsistentAdjacency {
                    fracture: fracture_id,
                    junction: junction.id,
                });
            }
            if !seen.insert((fracture_id, idx)) {
                return Err(NetworkError::InconsistentAdjacency {
                    fracture: fracture_id,
                    junction: junction.id,
                });
            }
        }
    }

    // Every fracture appears exactly once at each of its two ends
    if seen.len() != fractures.len() * 2 {
        return Err(NetworkError::IdNotFound {
            what: "incident fracture",
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fracture::Fracture;
    use dfn_core::{Id, JunctionId};

    fn junctions(n: u32) -> (Vec<Junction>, JunctionIndex) {
        let mut index = JunctionIndex::new();
        let list = (0..n)
            .map(|i| Junction {
                id: index.intern(i),
                label: i,
            })
            .collect();
        (list, index)
    }

    fn edge(i: u32, from: u32, to: u32) -> FractureEdge {
        FractureEdge {
            id: Id::from_index(i),
            ends: [JunctionId::from_index(from), JunctionId::from_index(to)],
            parallel: 0,
            fracture: Fracture::new(1.0, 1.0, 1.0).unwrap(),
        }
    }

    #[test]
    fn validate_dangling_junction_ref() {
        let (js, index) = junctions(2);
        let result = validate_structure(&js, &[edge(0, 0, 9)], &index);
        assert!(matches!(result, Err(NetworkError::IdNotFound { .. })));
    }

    #[test]
    fn validate_bad_adjacency() {
        let (js, _) = junctions(3);
        let fractures = vec![edge(0, 0, 1)];
        // Fracture 0 listed under junction 2, which it doesn't touch
        let offsets = vec![0, 1, 1, 2];
        let incident = vec![Id::from_index(0), Id::from_index(0)];
        let result = validate_adjacency(&js, &fractures, &offsets, &incident);
        assert!(matches!(
            result,
            Err(NetworkError::InconsistentAdjacency { .. })
        ));
    }
}
