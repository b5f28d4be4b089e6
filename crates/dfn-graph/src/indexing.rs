//! Stable indexing between junction labels and contiguous solver indices.

use std::collections::HashMap;

use dfn_core::{JunctionId, JunctionLabel};

use crate::error::{NetworkError, NetworkResult};

/// Bidirectional mapping between user junction labels and `JunctionId`s.
///
/// Ids are assigned in order of first appearance, so the mapping is
/// deterministic for a given connectivity list.
#[derive(Debug, Clone, Default)]
pub struct JunctionIndex {
    /// Contiguous list of labels (index -> label).
    labels: Vec<JunctionLabel>,

    /// Reverse lookup: label -> id.
    ids: HashMap<JunctionLabel, JunctionId>,
}

impl JunctionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `label`, registering it if unseen.
    pub fn intern(&mut self, label: JunctionLabel) -> JunctionId {
        if let Some(&id) = self.ids.get(&label) {
            return id;
        }
        let id = JunctionId::from_index(self.labels.len() as u32);
        self.labels.push(label);
        self.ids.insert(label, id);
        id
    }

    /// Number of registered junctions.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Look up the id for a label.
    pub fn id(&self, label: JunctionLabel) -> NetworkResult<JunctionId> {
        self.ids
            .get(&label)
            .copied()
            .ok_or(NetworkError::UnknownJunction { label })
    }

    /// Look up the label for an id.
    pub fn label(&self, id: JunctionId) -> NetworkResult<JunctionLabel> {
        self.labels
            .get(id.slot())
            .copied()
            .ok_or(NetworkError::IdNotFound { what: "JunctionId" })
    }

    /// Labels in index order.
    pub fn labels(&self) -> &[JunctionLabel] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_appearance_order() {
        let mut index = JunctionIndex::new();
        let a = index.intern(7);
        let b = index.intern(3);
        let again = index.intern(7);

        assert_eq!(a, again);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(index.labels(), &[7, 3]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn round_trip() {
        let mut index = JunctionIndex::new();
        for label in [10, 20, 30] {
            index.intern(label);
        }
        for label in [10, 20, 30] {
            let id = index.id(label).unwrap();
            assert_eq!(index.label(id).unwrap(), label);
        }
    }

    #[test]
    fn unknown_label() {
        let index = JunctionIndex::new();
        assert_eq!(
            index.id(99),
            Err(NetworkError::UnknownJunction { label: 99 })
        );
        assert!(index.label(JunctionId::from_index(0)).is_err());
    }
}
