use foundation::geo::LatLng;
use foundation::ids::PaddockId;

/// Label shown for paddocks that were never named.
pub const DEFAULT_NAME: &str = "Unnamed";
/// Stroke/fill color for paddocks without an explicit color.
pub const DEFAULT_COLOR: &str = "#3b82f6";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PaddockProperties {
    /// Absent until the persistence layer assigns one at first save.
    pub paddock_id: Option<PaddockId>,
    pub name: Option<String>,
    pub color: Option<String>,
    /// Derived geodesic area in hectares. Never authoritative: recomputed
    /// from geometry whenever features are read back from the surface.
    pub area_ha: Option<f64>,
}

/// One paddock boundary: polygon rings plus its properties.
///
/// The outer ring comes first; closed-ness of rings is the producer's
/// contract and is not validated here.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddockFeature {
    pub rings: Vec<Vec<LatLng>>,
    pub properties: PaddockProperties,
}

impl PaddockFeature {
    pub fn new(rings: Vec<Vec<LatLng>>) -> Self {
        Self {
            rings,
            properties: PaddockProperties::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<PaddockId>) -> Self {
        self.properties.paddock_id = Some(id.into());
        self
    }

    pub fn outer_ring(&self) -> &[LatLng] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn display_name(&self) -> &str {
        self.properties.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn display_color(&self) -> &str {
        self.properties.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_COLOR, DEFAULT_NAME, PaddockFeature};
    use foundation::geo::LatLng;

    #[test]
    fn display_fields_fall_back_to_defaults() {
        let mut feature = PaddockFeature::new(vec![vec![LatLng::new(0.0, 0.0)]]);
        assert_eq!(feature.display_name(), DEFAULT_NAME);
        assert_eq!(feature.display_color(), DEFAULT_COLOR);

        feature.properties.name = Some("North block".into());
        feature.properties.color = Some("#ff0000".into());
        assert_eq!(feature.display_name(), "North block");
        assert_eq!(feature.display_color(), "#ff0000");
    }

    #[test]
    fn outer_ring_of_empty_geometry_is_empty() {
        let feature = PaddockFeature::new(Vec::new());
        assert!(feature.outer_ring().is_empty());
    }
}
