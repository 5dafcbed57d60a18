use std::collections::BTreeSet;

use foundation::ids::PaddockId;

use crate::feature::PaddockFeature;

/// Ordered sequence of paddock features.
///
/// Order carries no meaning but stays stable across round-trips so
/// re-renders do not flicker.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<PaddockFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    DuplicateId { id: PaddockId },
}

impl std::fmt::Display for CollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionError::DuplicateId { id } => {
                write!(f, "duplicate paddock_id in collection: {id}")
            }
        }
    }
}

impl std::error::Error for CollectionError {}

impl FeatureCollection {
    pub fn new(features: Vec<PaddockFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Load-time contract: every assigned `paddock_id` is unique.
    ///
    /// Features that have not been assigned an id yet are exempt; several
    /// unsaved features may coexist.
    pub fn ensure_unique_ids(&self) -> Result<(), CollectionError> {
        let mut seen: BTreeSet<&PaddockId> = BTreeSet::new();
        for feature in &self.features {
            let Some(id) = feature.properties.paddock_id.as_ref() else {
                continue;
            };
            if !seen.insert(id) {
                return Err(CollectionError::DuplicateId { id: id.clone() });
            }
        }
        Ok(())
    }

    /// Assigned ids, in collection order.
    pub fn ids(&self) -> Vec<&PaddockId> {
        self.features
            .iter()
            .filter_map(|f| f.properties.paddock_id.as_ref())
            .collect()
    }
}
