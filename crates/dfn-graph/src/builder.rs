//! Incremental network builder.

use std::collections::HashMap;

use dfn_core::{FractureId, JunctionId, JunctionLabel};

use crate::error::NetworkResult;
use crate::fracture::Fracture;
use crate::indexing::JunctionIndex;
use crate::network::{FractureEdge, FractureNetwork, Junction};
use crate::validate;

/// Builder for constructing a fracture network incrementally.
///
/// Junctions are created implicitly from the labels passed to
/// `add_fracture`. Call `build()` to validate and freeze the network.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    index: JunctionIndex,
    pending: Vec<(JunctionLabel, JunctionLabel, Fracture)>,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fracture from junction `from` to junction `to`.
    ///
    /// Repeated pairs are kept as distinct parallel fractures.
    pub fn add_fracture(
        &mut self,
        from: JunctionLabel,
        to: JunctionLabel,
        fracture: Fracture,
    ) -> FractureId {
        self.index.intern(from);
        self.index.intern(to);
        let id = FractureId::from_index(self.pending.len() as u32);
        self.pending.push((from, to, fracture));
        id
    }

    /// Number of fractures added so far.
    pub fn fracture_count(&self) -> usize {
        self.pending.len()
    }

    /// Build and validate the network, returning an immutable `FractureNetwork`.
    pub fn build(self) -> NetworkResult<FractureNetwork> {
        let junctions: Vec<Junction> = self
            .index
            .labels()
            .iter()
            .enumerate()
            .map(|(i, &label)| Junction {
                id: JunctionId::from_index(i as u32),
                label,
            })
            .collect();

        let mut parallel_count: HashMap<(JunctionId, JunctionId), u32> = HashMap::new();
        let mut fractures = Vec::with_capacity(self.pending.len());
        for (i, &(from, to, fracture)) in self.pending.iter().enumerate() {
            let ends = [self.index.id(from)?, self.index.id(to)?];
            let count = parallel_count.entry((ends[0], ends[1])).or_insert(0);
            fractures.push(FractureEdge {
                id: FractureId::from_index(i as u32),
                ends,
                parallel: *count,
                fracture,
            });
            *count += 1;
        }

        validate::validate_structure(&junctions, &fractures, &self.index)?;

        let (junction_offsets, junction_fractures) = Self::build_adjacency(&junctions, &fractures);

        validate::validate_adjacency(&junctions, &fractures, &junction_offsets, &junction_fractures)?;

        Ok(FractureNetwork {
            junctions,
            fractures,
            index: self.index,
            junction_offsets,
            junction_fractures,
        })
    }

    /// Build compact adjacency lists: for each junction, collect its incident fractures.
    fn build_adjacency(
        junctions: &[Junction],
        fractures: &[FractureEdge],
    ) -> (Vec<usize>, Vec<FractureId>) {
        let mut per_junction: Vec<Vec<FractureId>> = vec![Vec::new(); junctions.len()];
        for edge in fractures {
            for end in edge.ends {
                per_junction[end.slot()].push(edge.id);
            }
        }

        let mut offsets = Vec::with_capacity(junctions.len() + 1);
        let mut flat = Vec::with_capacity(fractures.len() * 2);
        offsets.push(0);
        for list in per_junction {
            flat.extend(list);
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}
