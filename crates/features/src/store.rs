use crate::collection::{CollectionError, FeatureCollection};

/// Canonical in-memory paddock collection; the single source of truth the
/// drawing surface projects from and commits back to.
///
/// Every write replaces the whole collection in one assignment and bumps the
/// revision, so a render pass never observes a partially written state.
#[derive(Debug, Default)]
pub struct FeatureStore {
    collection: FeatureCollection,
    revision: u64,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    /// Entry point for externally loaded data; enforces the unique-id
    /// contract and rejects the whole collection on violation.
    pub fn load(&mut self, collection: FeatureCollection) -> Result<u64, CollectionError> {
        collection.ensure_unique_ids()?;
        Ok(self.replace(collection))
    }

    /// Atomic full replacement. Returns the new revision.
    ///
    /// The commit path is trusted: surface extraction preserves id
    /// uniqueness by construction, so no re-validation happens here.
    pub fn replace(&mut self, collection: FeatureCollection) -> u64 {
        self.collection = collection;
        self.revision += 1;
        self.revision
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Unavailable(String),
    Malformed(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            TransportError::Malformed(msg) => write!(f, "stored collection malformed: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Persistence collaborator. The transport itself (HTTP, file, ...) is out
/// of core scope; this trait is the contract the core consumes.
pub trait FeatureTransport {
    fn load(&mut self) -> Result<FeatureCollection, TransportError>;
    fn save(&mut self, collection: &FeatureCollection) -> Result<(), TransportError>;
}

/// In-memory transport for tests and offline use.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    stored: Option<FeatureCollection>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeatureTransport for MemoryTransport {
    fn load(&mut self) -> Result<FeatureCollection, TransportError> {
        Ok(self.stored.clone().unwrap_or_default())
    }

    fn save(&mut self, collection: &FeatureCollection) -> Result<(), TransportError> {
        self.stored = Some(collection.clone());
        Ok(())
    }
}
