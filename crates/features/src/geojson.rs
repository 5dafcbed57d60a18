//! GeoJSON wire format for the paddock collection.
//!
//! Only `Polygon` geometry is supported. Positions are `[lng, lat]` per the
//! GeoJSON convention; unknown members are ignored on read so collections
//! written by other tooling stay loadable.

use serde::{Deserialize, Serialize};

use foundation::geo::LatLng;
use foundation::ids::PaddockId;

use crate::collection::FeatureCollection;
use crate::feature::{PaddockFeature, PaddockProperties};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoJsonError {
    Json(String),
    UnsupportedType { expected: &'static str, found: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Json(msg) => write!(f, "geojson parse error: {msg}"),
            GeoJsonError::UnsupportedType { expected, found } => {
                write!(f, "unsupported geojson type: expected {expected}, found {found}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

#[derive(Debug, Serialize, Deserialize)]
struct CollectionDoc {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<FeatureDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FeatureDoc {
    #[serde(rename = "type")]
    kind: String,
    geometry: GeometryDoc,
    #[serde(default)]
    properties: PropertiesDoc,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeometryDoc {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PropertiesDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    paddock_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    area_ha: Option<f64>,
}

pub fn to_json(collection: &FeatureCollection) -> Result<String, GeoJsonError> {
    let doc = CollectionDoc {
        kind: "FeatureCollection".to_string(),
        features: collection.features.iter().map(feature_to_doc).collect(),
    };
    serde_json::to_string(&doc).map_err(|e| GeoJsonError::Json(e.to_string()))
}

pub fn from_json(input: &str) -> Result<FeatureCollection, GeoJsonError> {
    let doc: CollectionDoc =
        serde_json::from_str(input).map_err(|e| GeoJsonError::Json(e.to_string()))?;
    if doc.kind != "FeatureCollection" {
        return Err(GeoJsonError::UnsupportedType {
            expected: "FeatureCollection",
            found: doc.kind,
        });
    }

    let mut features = Vec::with_capacity(doc.features.len());
    for feature in doc.features {
        features.push(feature_from_doc(feature)?);
    }
    Ok(FeatureCollection::new(features))
}

fn feature_to_doc(feature: &PaddockFeature) -> FeatureDoc {
    FeatureDoc {
        kind: "Feature".to_string(),
        geometry: GeometryDoc {
            kind: "Polygon".to_string(),
            coordinates: feature
                .rings
                .iter()
                .map(|ring| ring.iter().map(|p| [p.lng, p.lat]).collect())
                .collect(),
        },
        properties: PropertiesDoc {
            paddock_id: feature
                .properties
                .paddock_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
            name: feature.properties.name.clone(),
            color: feature.properties.color.clone(),
            area_ha: feature.properties.area_ha,
        },
    }
}

fn feature_from_doc(doc: FeatureDoc) -> Result<PaddockFeature, GeoJsonError> {
    if doc.kind != "Feature" {
        return Err(GeoJsonError::UnsupportedType {
            expected: "Feature",
            found: doc.kind,
        });
    }
    if doc.geometry.kind != "Polygon" {
        return Err(GeoJsonError::UnsupportedType {
            expected: "Polygon",
            found: doc.geometry.kind,
        });
    }

    let rings = doc
        .geometry
        .coordinates
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|[lng, lat]| LatLng::new(lat, lng))
                .collect()
        })
        .collect();

    Ok(PaddockFeature {
        rings,
        properties: PaddockProperties {
            paddock_id: doc.properties.paddock_id.map(PaddockId::new),
            name: doc.properties.name,
            color: doc.properties.color,
            area_ha: doc.properties.area_ha,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::{from_json, to_json};
    use crate::collection::FeatureCollection;
    use crate::feature::PaddockFeature;
    use foundation::geo::LatLng;
    use pretty_assertions::assert_eq;

    fn sample() -> FeatureCollection {
        let mut feature = PaddockFeature::new(vec![vec![
            LatLng::new(-25.0, 135.0),
            LatLng::new(-25.0, 135.01),
            LatLng::new(-25.01, 135.01),
            LatLng::new(-25.01, 135.0),
        ]])
        .with_id("pdk-1");
        feature.properties.name = Some("Back forty".to_string());
        feature.properties.area_ha = Some(123.4);
        FeatureCollection::new(vec![feature])
    }

    #[test]
    fn round_trips_through_json() {
        let collection = sample();
        let json = to_json(&collection).expect("serialize");
        let back = from_json(&json).expect("parse");
        assert_eq!(back, collection);
    }

    #[test]
    fn positions_serialize_lng_first() {
        let json = to_json(&sample()).expect("serialize");
        assert!(json.contains("[135.0,-25.0]"), "got {json}");
    }

    #[test]
    fn unknown_members_are_ignored() {
        let json = r#"{
            "type": "FeatureCollection",
            "bbox": [134.0, -26.0, 136.0, -24.0],
            "features": [{
                "type": "Feature",
                "id": 7,
                "geometry": {"type": "Polygon", "coordinates": [[[135.0, -25.0]]]},
                "properties": {"paddock_id": "pdk-9", "grazed": true}
            }]
        }"#;
        let collection = from_json(json).expect("parse");
        assert_eq!(collection.len(), 1);
        assert_eq!(
            collection.features[0]
                .properties
                .paddock_id
                .as_ref()
                .map(|id| id.as_str()),
            Some("pdk-9")
        );
        assert_eq!(
            collection.features[0].rings[0][0],
            LatLng::new(-25.0, 135.0)
        );
    }

    #[test]
    fn missing_properties_default_to_empty() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[135.0, -25.0]]]}
            }]
        }"#;
        let collection = from_json(json).expect("parse");
        assert_eq!(collection.features[0].properties.paddock_id, None);
        assert_eq!(collection.features[0].display_name(), "Unnamed");
    }

    #[test]
    fn non_polygon_geometry_is_rejected() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [[[135.0, -25.0]]]},
                "properties": {}
            }]
        }"#;
        assert!(from_json(json).is_err());
    }
}
