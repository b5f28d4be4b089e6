//! Core network data structures.

use dfn_core::{FractureId, JunctionId, JunctionLabel, Real};

use crate::builder::NetworkBuilder;
use crate::error::{NetworkError, NetworkResult};
use crate::fracture::Fracture;
use crate::indexing::JunctionIndex;

/// A junction: a mixing point where fractures meet.
///
/// Junctions hold no physical state; they carry an id and the label the
/// caller used in the connectivity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Junction {
    pub id: JunctionId,
    pub label: JunctionLabel,
}

/// A fracture placed in the network between two junctions.
///
/// `ends` is the declared `[from, to]` pair. Flow may run either way; the
/// solved direction is kept separately. `parallel` distinguishes fractures
/// declared with the same ordered `(from, to)` pair (0 for the first one).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractureEdge {
    pub id: FractureId,
    pub ends: [JunctionId; 2],
    pub parallel: u32,
    pub fracture: Fracture,
}

impl FractureEdge {
    /// Declared start junction.
    pub fn from(&self) -> JunctionId {
        self.ends[0]
    }

    /// Declared end junction.
    pub fn to(&self) -> JunctionId {
        self.ends[1]
    }

    /// The junction at the other end, or `None` if `junction` is not an end.
    pub fn opposite(&self, junction: JunctionId) -> Option<JunctionId> {
        if junction == self.ends[0] {
            Some(self.ends[1])
        } else if junction == self.ends[1] {
            Some(self.ends[0])
        } else {
            None
        }
    }
}

/// A validated, immutable directed multigraph of junctions and fractures.
///
/// The network stores:
/// - All junctions and fractures in vectors (indexed by their IDs).
/// - Compact adjacency: for each junction, which fractures are incident.
///
/// Iteration order is insertion order everywhere.
#[derive(Debug, Clone)]
pub struct FractureNetwork {
    pub(crate) junctions: Vec<Junction>,
    pub(crate) fractures: Vec<FractureEdge>,
    pub(crate) index: JunctionIndex,

    /// Junction i's fractures are in junction_fractures[offsets[i]..offsets[i+1]].
    pub(crate) junction_offsets: Vec<usize>,

    /// Flat list of incident fracture IDs, grouped by junction, sorted by fracture ID.
    pub(crate) junction_fractures: Vec<FractureId>,
}

impl FractureNetwork {
    /// Build a network from a connectivity list and parallel geometry sequences.
    ///
    /// The i-th connectivity pair uses the i-th length, height and width.
    pub fn from_connectivity(
        connectivity: &[(JunctionLabel, JunctionLabel)],
        lengths: &[Real],
        heights: &[Real],
        widths: &[Real],
    ) -> NetworkResult<Self> {
        let expected = connectivity.len();
        for (what, seq) in [("length", lengths), ("height", heights), ("width", widths)] {
            if seq.len() != expected {
                return Err(NetworkError::DimensionMismatch {
                    what,
                    expected,
                    actual: seq.len(),
                });
            }
        }

        let mut builder = NetworkBuilder::new();
        for (i, &(from, to)) in connectivity.iter().enumerate() {
            let fracture =
                Fracture::new(lengths[i], heights[i], widths[i]).map_err(|e| e.at(i))?;
            builder.add_fracture(from, to, fracture);
        }
        builder.build()
    }

    /// Same topology with every aperture replaced.
    pub fn with_widths(&self, widths: &[Real]) -> NetworkResult<Self> {
        if widths.len() != self.fractures.len() {
            return Err(NetworkError::DimensionMismatch {
                what: "width",
                expected: self.fractures.len(),
                actual: widths.len(),
            });
        }
        let mut network = self.clone();
        for (i, (edge, &w)) in network.fractures.iter_mut().zip(widths).enumerate() {
            edge.fracture = edge.fracture.with_width(w).map_err(|e| e.at(i))?;
        }
        Ok(network)
    }

    /// Iterate over all junctions in insertion order.
    pub fn junctions(&self) -> std::slice::Iter<'_, Junction> {
        self.junctions.iter()
    }

    /// Iterate over all fractures in insertion order.
    pub fn fractures(&self) -> std::slice::Iter<'_, FractureEdge> {
        self.fractures.iter()
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    pub fn fracture_count(&self) -> usize {
        self.fractures.len()
    }

    /// Get a junction by ID (returns None if ID out of bounds).
    pub fn junction(&self, id: JunctionId) -> Option<&Junction> {
        self.junctions.get(id.slot())
    }

    /// Get a fracture by ID (returns None if ID out of bounds).
    pub fn fracture(&self, id: FractureId) -> Option<&FractureEdge> {
        self.fractures.get(id.slot())
    }

    /// Resolve a user label to its junction ID.
    pub fn junction_id(&self, label: JunctionLabel) -> NetworkResult<JunctionId> {
        self.index.id(label)
    }

    /// Resolve a junction ID back to its user label.
    pub fn label(&self, id: JunctionId) -> NetworkResult<JunctionLabel> {
        self.index.label(id)
    }

    pub fn junction_index(&self) -> &JunctionIndex {
        &self.index
    }

    /// All fracture IDs incident to a junction, in fracture order.
    pub fn incident_fractures(&self, junction: JunctionId) -> &[FractureId] {
        let idx = junction.slot();
        if idx >= self.junctions.len() {
            return &[];
        }
        let start = self.junction_offsets[idx];
        let end = self.junction_offsets[idx + 1];
        &self.junction_fractures[start..end]
    }

    /// Declared connectivity as label pairs, in fracture order.
    pub fn connectivity(&self) -> Vec<(JunctionLabel, JunctionLabel)> {
        let labels = self.index.labels();
        self.fractures
            .iter()
            .map(|f| (labels[f.from().slot()], labels[f.to().slot()]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_parallel() -> FractureNetwork {
        FractureNetwork::from_connectivity(
            &[(0, 1), (1, 2), (1, 2), (2, 3)],
            &[1.0; 4],
            &[1.0; 4],
            &[1.0; 4],
        )
        .unwrap()
    }

    #[test]
    fn parallel_fractures_stay_distinct() {
        let network = series_parallel();
        assert_eq!(network.fracture_count(), 4);

        let a = network.fracture(FractureId::from_index(1)).unwrap();
        let b = network.fracture(FractureId::from_index(2)).unwrap();
        assert_eq!(a.ends, b.ends);
        assert_eq!(a.parallel, 0);
        assert_eq!(b.parallel, 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn iteration_is_restartable() {
        let network = series_parallel();
        let first: Vec<_> = network.junctions().map(|j| j.label).collect();
        let second: Vec<_> = network.junctions().map(|j| j.label).collect();
        assert_eq!(first, vec![0, 1, 2, 3]);
        assert_eq!(first, second);
    }

    #[test]
    fn opposite_end() {
        let network = series_parallel();
        let edge = network.fracture(FractureId::from_index(0)).unwrap();
        assert_eq!(edge.opposite(edge.from()), Some(edge.to()));
        assert_eq!(edge.opposite(edge.to()), Some(edge.from()));
        assert_eq!(edge.opposite(JunctionId::from_index(3)), None);
    }

    #[test]
    fn dimension_mismatch() {
        let err = FractureNetwork::from_connectivity(
            &[(0, 1), (1, 2)],
            &[1.0, 1.0],
            &[1.0],
            &[1.0, 1.0],
        )
        .unwrap_err();
        assert_eq!(
            err,
            NetworkError::DimensionMismatch {
                what: "height",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn invalid_geometry_reports_position() {
        let err = FractureNetwork::from_connectivity(
            &[(0, 1), (1, 2)],
            &[1.0, 1.0],
            &[1.0, 1.0],
            &[1.0, -1.0],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NetworkError::InvalidGeometry {
                fracture: Some(1),
                what: "width",
                ..
            }
        ));
    }

    #[test]
    fn with_widths_keeps_topology() {
        let network = series_parallel();
        let wider = network.with_widths(&[2.0, 2.0, 3.0, 2.0]).unwrap();
        assert_eq!(wider.connectivity(), network.connectivity());
        assert_eq!(
            wider
                .fracture(FractureId::from_index(2))
                .unwrap()
                .fracture
                .width(),
            3.0
        );
        assert!(network.with_widths(&[1.0; 3]).is_err());
        assert!(network.with_widths(&[1.0, 0.0, 1.0, 1.0]).is_err());
    }
}
