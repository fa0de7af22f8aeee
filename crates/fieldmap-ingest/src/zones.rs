//! Zone feature extraction from GeoJSON boundary documents
//!
//! Walks a feature collection and produces territory zones tagged with a
//! caller-supplied classification. Features without geometry are skipped;
//! geometry that is present passes through untouched, and the property bag
//! is retained verbatim.

use fieldmap_common::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::TerritoryZone;

/// Placeholder assigned when the configured name property is absent.
pub const UNKNOWN_ZONE_NAME: &str = "Unknown Zone";

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// Zones extracted from one document, with the feature count for
/// reconciliation.
#[derive(Debug)]
pub struct ExtractedZones {
    pub zones: Vec<TerritoryZone>,
    pub features_read: usize,
}

/// Extracts zones from boundary documents under one classification.
pub struct ZoneExtractor {
    zone_type: String,
    name_property: String,
}

impl ZoneExtractor {
    pub fn new(zone_type: impl Into<String>, name_property: impl Into<String>) -> Self {
        Self {
            zone_type: zone_type.into(),
            name_property: name_property.into(),
        }
    }

    /// Walk a GeoJSON document and extract one zone per geometry-bearing
    /// feature.
    pub fn extract(&self, document: &str) -> Result<ExtractedZones> {
        let collection: FeatureCollection = serde_json::from_str(document)?;
        let features_read = collection.features.len();

        let mut zones = Vec::with_capacity(features_read);
        for feature in collection.features {
            let Some(geometry) = feature.geometry else {
                debug!(zone_type = %self.zone_type, "Skipping feature without geometry");
                continue;
            };

            let properties = feature.properties.unwrap_or_default();
            let name = zone_name(&properties, &self.name_property);

            zones.push(TerritoryZone {
                name,
                zone_type: self.zone_type.clone(),
                boundary: geometry,
                properties,
            });
        }

        Ok(ExtractedZones { zones, features_read })
    }
}

/// Pull the display name out of a property bag, falling back to the
/// placeholder.
fn zone_name(properties: &Map<String, Value>, key: &str) -> String {
    match properties.get(key) {
        None | Some(Value::Null) => UNKNOWN_ZONE_NAME.to_string(),
        Some(Value::String(name)) => {
            let name = name.trim();
            if name.is_empty() {
                UNKNOWN_ZONE_NAME.to_string()
            } else {
                name.to_string()
            }
        },
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOCUMENT: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"NAMELSAD": "Census Tract 101", "GEOID": "51760010100"},
                "geometry": {"type": "Polygon", "coordinates": [[[-77.5, 37.5], [-77.4, 37.5], [-77.4, 37.6], [-77.5, 37.5]]]}
            },
            {
                "type": "Feature",
                "properties": {"NAMELSAD": "Decorative Label"},
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": {"GEOID": "51760010300"},
                "geometry": {"type": "MultiPolygon", "coordinates": [[[[-77.3, 37.5], [-77.2, 37.5], [-77.2, 37.6], [-77.3, 37.5]]]]}
            }
        ]
    }"#;

    #[test]
    fn test_extract_skips_features_without_geometry() {
        let extractor = ZoneExtractor::new("Census_Tract", "NAMELSAD");
        let extracted = extractor.extract(DOCUMENT).unwrap();

        assert_eq!(extracted.features_read, 3);
        assert_eq!(extracted.zones.len(), 2);
        assert!(extracted.zones.iter().all(|z| z.zone_type == "Census_Tract"));
    }

    #[test]
    fn test_missing_name_property_gets_placeholder() {
        let extractor = ZoneExtractor::new("Census_Tract", "NAMELSAD");
        let extracted = extractor.extract(DOCUMENT).unwrap();

        assert_eq!(extracted.zones[0].name, "Census Tract 101");
        assert_eq!(extracted.zones[1].name, UNKNOWN_ZONE_NAME);
    }

    #[test]
    fn test_properties_are_preserved_verbatim() {
        let extractor = ZoneExtractor::new("Census_Tract", "NAMELSAD");
        let extracted = extractor.extract(DOCUMENT).unwrap();

        let properties = &extracted.zones[0].properties;
        assert_eq!(properties["NAMELSAD"], json!("Census Tract 101"));
        assert_eq!(properties["GEOID"], json!("51760010100"));
    }

    #[test]
    fn test_geometry_passes_through_unmodified() {
        let extractor = ZoneExtractor::new("Census_Tract", "NAMELSAD");
        let extracted = extractor.extract(DOCUMENT).unwrap();

        assert_eq!(extracted.zones[0].boundary["type"], json!("Polygon"));
        assert_eq!(extracted.zones[1].boundary["type"], json!("MultiPolygon"));
    }

    #[test]
    fn test_non_string_name_is_rendered() {
        let mut properties = Map::new();
        properties.insert("Utility".to_string(), json!(42));
        assert_eq!(zone_name(&properties, "Utility"), "42");

        properties.insert("Utility".to_string(), Value::Null);
        assert_eq!(zone_name(&properties, "Utility"), UNKNOWN_ZONE_NAME);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let extractor = ZoneExtractor::new("Census_Tract", "NAMELSAD");
        assert!(extractor.extract("not json").is_err());
    }

    #[test]
    fn test_empty_collection() {
        let extractor = ZoneExtractor::new("Census_Tract", "NAMELSAD");
        let extracted = extractor.extract(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert_eq!(extracted.features_read, 0);
        assert!(extracted.zones.is_empty());
    }
}
