use features::feature::DEFAULT_COLOR;
use foundation::geo::LatLng;

/// Identifier of a rendered surface layer.
///
/// Ids are never reused across clear-and-rebuild cycles, so a stale id from
/// before a projection simply resolves to nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    pub color: String,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl LayerStyle {
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..Self::default()
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            weight: 2.0,
            fill_opacity: 0.3,
        }
    }
}

/// One renderable polygon on the drawing surface. Plain data: the feature it
/// came from (if any) is tracked by the adapter's binding map, never here.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLayer {
    pub id: LayerId,
    pub rings: Vec<Vec<LatLng>>,
    pub style: LayerStyle,
    /// Centered text shown while label display is enabled.
    pub label: Option<String>,
}

impl RenderedLayer {
    pub fn outer_ring(&self) -> &[LatLng] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }
}
