use std::collections::BTreeMap;

use features::collection::FeatureCollection;
use features::feature::PaddockFeature;
use features::store::FeatureStore;
use foundation::bounds::LatLngBounds;
use foundation::geo::LatLng;
use foundation::math::{M2_PER_HECTARE, geodesic_area_m2};
use runtime::event_bus::EventBus;
use runtime::generation::RevisionTracker;

use crate::layer::{LayerId, LayerStyle, RenderedLayer};

/// Fraction of the combined extent added around a viewport fit.
pub const VIEWPORT_PAD_RATIO: f64 = 0.1;

/// Map anchor a host should fall back to when no fit request is produced
/// (center of the deployment region).
pub const DEFAULT_CENTER: LatLng = LatLng::new(-25.3, 135.1);

/// Geodesic-area seam so the adapter never depends on a rendering library's
/// geometry utilities.
pub trait RingArea {
    fn ring_area_m2(&self, ring: &[LatLng]) -> f64;
}

/// WGS84 implementation backed by `foundation::math`.
#[derive(Debug, Default, Copy, Clone)]
pub struct Wgs84Area;

impl RingArea for Wgs84Area {
    fn ring_area_m2(&self, ring: &[LatLng]) -> f64 {
        geodesic_area_m2(ring)
    }
}

/// Result of one `sync` pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceUpdate {
    /// Whether layers were cleared and rebuilt from the store.
    pub rebuilt: bool,
    /// Padded combined bounds the host should fit the map viewport to.
    pub fit_viewport: Option<LatLngBounds>,
}

impl SurfaceUpdate {
    fn unchanged() -> Self {
        Self {
            rebuilt: false,
            fit_viewport: None,
        }
    }
}

/// Keeps the rendered layer set consistent with the feature store while
/// letting local edits diverge until they are committed back.
///
/// Store → surface: `sync` projects the collection into layers whenever the
/// store carries an external change (or the label flag flipped). The
/// adapter's own commits are absorbed by the revision tracker, so a commit
/// never triggers a clear-and-rebuild of layers that already reflect it.
///
/// Surface → store: `extract_features` re-derives geometry and area from the
/// current layers; `commit` atomically replaces the store collection.
#[derive(Debug, Default)]
pub struct DrawingSurface {
    layers: Vec<RenderedLayer>,
    /// Back-reference from layer to originating feature, cleared and rebuilt
    /// together with the layers.
    bindings: BTreeMap<LayerId, PaddockFeature>,
    next_layer_id: u64,
    show_labels: bool,
    projected_labels: bool,
    revisions: RevisionTracker,
}

impl DrawingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[RenderedLayer] {
        &self.layers
    }

    pub fn bound_feature(&self, layer: LayerId) -> Option<&PaddockFeature> {
        self.bindings.get(&layer)
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    /// Display-mode flag, externally controlled. Takes effect on next `sync`.
    pub fn set_show_labels(&mut self, show: bool) {
        self.show_labels = show;
    }

    /// Projects the store onto the surface when required.
    ///
    /// Rebuild happens only for external store revisions or a label-flag
    /// change; a revision written by this adapter's own `commit` is absorbed
    /// exactly once. Rebuilding replaces every layer and binding.
    pub fn sync(&mut self, store: &FeatureStore, events: &mut EventBus) -> SurfaceUpdate {
        let external = self.revisions.observe(store.revision());
        if !external && self.projected_labels == self.show_labels {
            return SurfaceUpdate::unchanged();
        }

        self.layers.clear();
        self.bindings.clear();
        for feature in &store.collection().features {
            let id = self.alloc_layer_id();
            self.layers.push(RenderedLayer {
                id,
                rings: feature.rings.clone(),
                style: LayerStyle::with_color(feature.display_color()),
                label: self
                    .show_labels
                    .then(|| feature.display_name().to_string()),
            });
            self.bindings.insert(id, feature.clone());
        }
        self.projected_labels = self.show_labels;

        SurfaceUpdate {
            rebuilt: true,
            fit_viewport: self.fit_request(events),
        }
    }

    /// A user finished drawing a new shape. The layer is unbound until the
    /// collection is saved and re-projected.
    pub fn add_drawn_ring(&mut self, ring: Vec<LatLng>) -> LayerId {
        let id = self.alloc_layer_id();
        self.layers.push(RenderedLayer {
            id,
            rings: vec![ring],
            style: LayerStyle::default(),
            label: None,
        });
        id
    }

    /// A user reshaped an existing layer. Only the surface diverges; the
    /// store stays untouched until the next commit.
    pub fn update_ring(&mut self, layer: LayerId, ring: Vec<LatLng>) -> bool {
        let Some(target) = self.layers.iter_mut().find(|l| l.id == layer) else {
            return false;
        };
        if target.rings.is_empty() {
            target.rings.push(ring);
        } else {
            target.rings[0] = ring;
        }
        true
    }

    pub fn remove_layer(&mut self, layer: LayerId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|l| l.id != layer);
        self.bindings.remove(&layer);
        self.layers.len() != before
    }

    /// Double-activation on a layer targets its bound feature for a rename
    /// workflow. Unbound (freshly drawn) layers have no target.
    pub fn double_activate(&self, layer: LayerId) -> Option<PaddockFeature> {
        self.bound_feature(layer).cloned()
    }

    /// Surface → store extraction: every bound layer yields its feature with
    /// geometry re-derived from the layer's current shape and `area_ha`
    /// recomputed. Unbound layers are skipped; this never fails.
    pub fn extract_features<A: RingArea>(&self, area: &A) -> Vec<PaddockFeature> {
        let mut out = Vec::new();
        for layer in &self.layers {
            let Some(source) = self.bindings.get(&layer.id) else {
                continue;
            };
            let mut feature = source.clone();
            feature.rings = layer.rings.clone();
            feature.properties.area_ha =
                Some(area.ring_area_m2(layer.outer_ring()) / M2_PER_HECTARE);
            out.push(feature);
        }
        out
    }

    /// Replaces the store collection and records the write so the next
    /// `sync` does not rebuild a surface that already reflects it.
    pub fn commit(&mut self, store: &mut FeatureStore, features: Vec<PaddockFeature>) -> u64 {
        // Bindings must track the committed properties, otherwise a later
        // extraction would resurface pre-commit values.
        for layer in &self.layers {
            let Some(bound) = self.bindings.get_mut(&layer.id) else {
                continue;
            };
            if let Some(updated) = features
                .iter()
                .find(|f| f.properties.paddock_id == bound.properties.paddock_id)
            {
                *bound = updated.clone();
            }
        }

        let revision = store.replace(FeatureCollection::new(features));
        self.revisions.record_local_write(revision);
        revision
    }

    fn alloc_layer_id(&mut self) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        id
    }

    fn fit_request(&self, events: &mut EventBus) -> Option<LatLngBounds> {
        if self.layers.is_empty() {
            return None;
        }
        let points = self
            .layers
            .iter()
            .flat_map(|l| l.rings.iter())
            .flatten()
            .copied();
        match LatLngBounds::from_points(points) {
            Some(bounds) => Some(bounds.pad(VIEWPORT_PAD_RATIO)),
            None => {
                events.emit("viewport", "combined layer bounds unavailable, fit skipped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawingSurface, Wgs84Area};
    use features::collection::FeatureCollection;
    use features::feature::PaddockFeature;
    use features::store::FeatureStore;
    use foundation::geo::LatLng;
    use runtime::event_bus::EventBus;

    fn square(id: &str, lat: f64, lng: f64) -> PaddockFeature {
        PaddockFeature::new(vec![vec![
            LatLng::new(lat, lng),
            LatLng::new(lat, lng + 0.01),
            LatLng::new(lat - 0.01, lng + 0.01),
            LatLng::new(lat - 0.01, lng),
        ]])
        .with_id(id)
    }

    fn loaded_store(features: Vec<PaddockFeature>) -> FeatureStore {
        let mut store = FeatureStore::new();
        store
            .load(FeatureCollection::new(features))
            .expect("unique ids");
        store
    }

    #[test]
    fn sync_projects_store_features_into_layers() {
        let mut store = loaded_store(vec![
            square("a", -25.0, 135.0),
            square("b", -25.5, 135.5),
        ]);
        let first = store.collection().features[0].clone();
        let mut colored = store.collection().features[1].clone();
        colored.properties.color = Some("#00ff00".to_string());
        store.replace(FeatureCollection::new(vec![first, colored]));

        let mut surface = DrawingSurface::new();
        let mut events = EventBus::new();
        let update = surface.sync(&store, &mut events);

        assert!(update.rebuilt);
        assert_eq!(surface.layers().len(), 2);
        assert_eq!(surface.layers()[1].style.color, "#00ff00");
        // Labels are off by default.
        assert_eq!(surface.layers()[0].label, None);

        let fit = update.fit_viewport.expect("fit request");
        assert!(fit.south_west.lat < -25.51);
        assert!(fit.north_east.lng > 135.51);
    }

    #[test]
    fn sync_without_changes_is_a_no_op() {
        let store = loaded_store(vec![square("a", -25.0, 135.0)]);
        let mut surface = DrawingSurface::new();
        let mut events = EventBus::new();

        assert!(surface.sync(&store, &mut events).rebuilt);
        assert!(!surface.sync(&store, &mut events).rebuilt);
    }

    #[test]
    fn label_flag_change_triggers_rebuild_with_labels() {
        let store = loaded_store(vec![square("a", -25.0, 135.0)]);
        let mut surface = DrawingSurface::new();
        let mut events = EventBus::new();
        surface.sync(&store, &mut events);

        surface.set_show_labels(true);
        assert!(surface.show_labels());
        let update = surface.sync(&store, &mut events);
        assert!(update.rebuilt);
        assert_eq!(surface.layers()[0].label.as_deref(), Some("Unnamed"));
    }

    #[test]
    fn commit_is_absorbed_but_external_write_projects() {
        let mut store = loaded_store(vec![square("a", -25.0, 135.0)]);
        let mut surface = DrawingSurface::new();
        let mut events = EventBus::new();
        surface.sync(&store, &mut events);
        let ids_before: Vec<_> = surface.layers().iter().map(|l| l.id).collect();

        let extracted = surface.extract_features(&Wgs84Area);
        surface.commit(&mut store, extracted);

        // The surface already reflects its own write: no clear-and-rebuild.
        let update = surface.sync(&store, &mut events);
        assert!(!update.rebuilt);
        let ids_after: Vec<_> = surface.layers().iter().map(|l| l.id).collect();
        assert_eq!(ids_before, ids_after);

        // An external replacement must project.
        store
            .load(FeatureCollection::new(vec![square("b", -24.0, 134.0)]))
            .expect("load");
        assert!(surface.sync(&store, &mut events).rebuilt);
    }

    #[test]
    fn round_trip_preserves_ids_and_area() {
        let store = loaded_store(vec![
            square("a", -25.0, 135.0),
            square("b", -25.5, 135.5),
        ]);
        let mut surface = DrawingSurface::new();
        let mut events = EventBus::new();
        surface.sync(&store, &mut events);

        let extracted = surface.extract_features(&Wgs84Area);
        let ids: Vec<_> = extracted
            .iter()
            .map(|f| f.properties.paddock_id.clone().expect("id"))
            .collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].as_str(), "a");
        assert_eq!(ids[1].as_str(), "b");

        for (extracted, original) in extracted.iter().zip(&store.collection().features) {
            assert_eq!(extracted.rings, original.rings);
            let area = extracted.properties.area_ha.expect("area");
            assert!(area > 0.0);
        }
    }

    #[test]
    fn drawn_layers_are_excluded_from_extraction() {
        let store = loaded_store(vec![square("a", -25.0, 135.0)]);
        let mut surface = DrawingSurface::new();
        let mut events = EventBus::new();
        surface.sync(&store, &mut events);

        let drawn = surface.add_drawn_ring(vec![
            LatLng::new(-24.0, 134.0),
            LatLng::new(-24.0, 134.01),
            LatLng::new(-24.01, 134.01),
        ]);
        assert_eq!(surface.layers().len(), 2);
        assert_eq!(surface.double_activate(drawn), None);

        let extracted = surface.extract_features(&Wgs84Area);
        assert_eq!(extracted.len(), 1);
    }

    #[test]
    fn edits_flow_back_through_extraction() {
        let store = loaded_store(vec![square("a", -25.0, 135.0)]);
        let mut surface = DrawingSurface::new();
        let mut events = EventBus::new();
        surface.sync(&store, &mut events);

        let layer = surface.layers()[0].id;
        let bigger = vec![
            LatLng::new(-25.0, 135.0),
            LatLng::new(-25.0, 135.02),
            LatLng::new(-25.02, 135.02),
            LatLng::new(-25.02, 135.0),
        ];
        assert!(surface.update_ring(layer, bigger.clone()));

        let extracted = surface.extract_features(&Wgs84Area);
        assert_eq!(extracted[0].rings[0], bigger);

        let small = square("x", -25.0, 135.0);
        let small_area = {
            use super::RingArea;
            Wgs84Area.ring_area_m2(small.outer_ring()) / 10_000.0
        };
        assert!(extracted[0].properties.area_ha.expect("area") > small_area);
    }

    #[test]
    fn degenerate_geometry_skips_fit_and_reports_it() {
        let mut store = FeatureStore::new();
        store.replace(FeatureCollection::new(vec![PaddockFeature::new(vec![
            vec![LatLng::new(f64::NAN, f64::NAN)],
        ])]));

        let mut surface = DrawingSurface::new();
        let mut events = EventBus::new();
        let update = surface.sync(&store, &mut events);

        assert!(update.rebuilt);
        assert_eq!(update.fit_viewport, None);
        assert_eq!(events.events().len(), 1);
        assert_eq!(events.events()[0].kind, "viewport");
    }

    #[test]
    fn remove_layer_drops_layer_and_binding() {
        let store = loaded_store(vec![square("a", -25.0, 135.0)]);
        let mut surface = DrawingSurface::new();
        let mut events = EventBus::new();
        surface.sync(&store, &mut events);

        let layer = surface.layers()[0].id;
        assert!(surface.remove_layer(layer));
        assert!(surface.layers().is_empty());
        assert!(surface.extract_features(&Wgs84Area).is_empty());
        assert!(!surface.remove_layer(layer));
    }
}
