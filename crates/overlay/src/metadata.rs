//! Overlay metadata documents.
//!
//! Each metric+date has a small JSON document carrying the image placement:
//! `{"bounds": [[south_lat, west_lng], [north_lat, east_lng]]}`. Producers
//! include other members (an image URL among them); everything but `bounds`
//! is ignored here.

use serde::Deserialize;

use foundation::bounds::LatLngBounds;
use foundation::geo::LatLng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    Parse(String),
    NonFiniteBounds,
}

impl std::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataError::Parse(msg) => write!(f, "overlay metadata parse error: {msg}"),
            MetadataError::NonFiniteBounds => write!(f, "overlay metadata bounds not finite"),
        }
    }
}

impl std::error::Error for MetadataError {}

#[derive(Debug, Deserialize)]
struct MetadataDoc {
    bounds: [[f64; 2]; 2],
}

pub fn parse_bounds(bytes: &[u8]) -> Result<LatLngBounds, MetadataError> {
    let doc: MetadataDoc =
        serde_json::from_slice(bytes).map_err(|e| MetadataError::Parse(e.to_string()))?;

    let south_west = LatLng::new(doc.bounds[0][0], doc.bounds[0][1]);
    let north_east = LatLng::new(doc.bounds[1][0], doc.bounds[1][1]);
    if !south_west.is_finite() || !north_east.is_finite() {
        return Err(MetadataError::NonFiniteBounds);
    }

    Ok(LatLngBounds::new(south_west, north_east))
}
