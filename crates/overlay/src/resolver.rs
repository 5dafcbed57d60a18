use foundation::bounds::LatLngBounds;
use runtime::event_bus::EventBus;

use crate::metadata;
use crate::selection::OverlaySelection;

/// Root path the overlay asset tree is published under.
pub const DEFAULT_OVERLAY_ROOT: &str = "/overlays";

/// A resolved overlay: the image to display and where to place it.
/// Ephemeral; replaced or cleared on every selection change.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDescriptor {
    pub image_ref: String,
    pub bounds: LatLngBounds,
}

/// Fetch work produced by a selection. The epoch ties a later completion
/// back to the selection that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub epoch: u64,
    pub metadata_path: String,
    pub image_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    NotFound,
    Unavailable(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::NotFound => write!(f, "resource not found"),
            FetchError::Unavailable(msg) => write!(f, "fetch failed: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Collaborator that can fetch an overlay resource inline.
pub trait OverlayFetch {
    fn fetch(&mut self, path: &str) -> Result<Vec<u8>, FetchError>;
}

/// Resolves a (metric, date) selection to an overlay descriptor.
///
/// Resolution is split into `select` (compute paths, bump the epoch) and
/// `complete` (install or clear the descriptor) so the fetch in between may
/// suspend. A completion whose epoch is no longer current is discarded:
/// last selection wins, no cancellation token needed.
///
/// Every failure collapses to "no overlay"; the only caller-visible outcome
/// is descriptor present/absent.
#[derive(Debug)]
pub struct OverlayResolver {
    root: String,
    epoch: u64,
    resolved: Option<OverlayDescriptor>,
}

impl Default for OverlayResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayResolver {
    pub fn new() -> Self {
        Self::with_root(DEFAULT_OVERLAY_ROOT)
    }

    pub fn with_root(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            epoch: 0,
            resolved: None,
        }
    }

    pub fn descriptor(&self) -> Option<&OverlayDescriptor> {
        self.resolved.as_ref()
    }

    /// Drops any resolved overlay and invalidates in-flight resolutions.
    pub fn clear(&mut self) {
        self.epoch += 1;
        self.resolved = None;
    }

    /// Applies a new selection. An incomplete selection clears the overlay
    /// and produces no fetch; a complete one returns the request to run.
    /// Either way, older in-flight resolutions are superseded.
    pub fn select(&mut self, selection: &OverlaySelection) -> Option<FetchRequest> {
        self.epoch += 1;
        let (Some(metric), Some(date)) = (selection.metric.as_deref(), selection.date.as_deref())
        else {
            self.resolved = None;
            return None;
        };

        let base = format!("{}/{metric}/{metric}_{date}", self.root);
        Some(FetchRequest {
            epoch: self.epoch,
            metadata_path: format!("{base}.json"),
            image_path: format!("{base}.png"),
        })
    }

    /// Feeds a fetch outcome back in. Returns `true` only when a descriptor
    /// was installed.
    pub fn complete(
        &mut self,
        request: &FetchRequest,
        outcome: Result<Vec<u8>, FetchError>,
        events: &mut EventBus,
    ) -> bool {
        if request.epoch != self.epoch {
            events.emit("overlay", "stale resolution discarded");
            return false;
        }

        match outcome {
            Ok(bytes) => match metadata::parse_bounds(&bytes) {
                Ok(bounds) => {
                    self.resolved = Some(OverlayDescriptor {
                        image_ref: request.image_path.clone(),
                        bounds,
                    });
                    true
                }
                Err(err) => {
                    self.resolved = None;
                    events.emit("overlay", format!("metadata rejected: {err}"));
                    false
                }
            },
            Err(err) => {
                self.resolved = None;
                events.emit("overlay", format!("metadata fetch failed: {err}"));
                false
            }
        }
    }

    /// Select-fetch-complete in one call, for collaborators that fetch
    /// without suspending.
    pub fn resolve_with<F: OverlayFetch>(
        &mut self,
        selection: &OverlaySelection,
        fetcher: &mut F,
        events: &mut EventBus,
    ) -> Option<&OverlayDescriptor> {
        if let Some(request) = self.select(selection) {
            let outcome = fetcher.fetch(&request.metadata_path);
            self.complete(&request, outcome, events);
        }
        self.descriptor()
    }
}
