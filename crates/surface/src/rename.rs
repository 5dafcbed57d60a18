use features::feature::PaddockFeature;
use features::store::FeatureStore;

use crate::adapter::{DrawingSurface, RingArea};

/// Rename workflow: at most one paddock is targeted at a time.
///
/// Opened by a double-activation on a bound layer; closed by cancel or a
/// successful commit. An empty trimmed name never commits and leaves the
/// workflow open.
#[derive(Debug, Default)]
pub struct RenameCoordinator {
    pending: Option<PaddockFeature>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenameOutcome {
    /// The updated collection was committed at this store revision.
    Committed { revision: u64 },
    /// Empty or whitespace-only name; nothing was mutated.
    Rejected,
    /// No workflow was open.
    Idle,
}

impl RenameCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, feature: PaddockFeature) {
        self.pending = Some(feature);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&PaddockFeature> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies the rename to the freshly extracted collection and commits it
    /// through the adapter (so the resulting projection is suppressed).
    ///
    /// If the pending feature's id is missing from the extraction (a new,
    /// unsaved shape), the renamed feature is appended rather than dropped.
    pub fn commit<A: RingArea>(
        &mut self,
        name: &str,
        surface: &mut DrawingSurface,
        area: &A,
        store: &mut FeatureStore,
    ) -> RenameOutcome {
        let Some(pending) = self.pending.as_ref() else {
            return RenameOutcome::Idle;
        };
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return RenameOutcome::Rejected;
        }

        let mut features = surface.extract_features(area);
        match features
            .iter_mut()
            .find(|f| f.properties.paddock_id == pending.properties.paddock_id)
        {
            Some(found) => found.properties.name = Some(trimmed.to_string()),
            None => {
                let mut appended = pending.clone();
                appended.properties.name = Some(trimmed.to_string());
                features.push(appended);
            }
        }

        let revision = surface.commit(store, features);
        self.pending = None;
        RenameOutcome::Committed { revision }
    }
}
