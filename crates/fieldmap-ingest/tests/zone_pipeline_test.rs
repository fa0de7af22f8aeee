//! Zone extraction tests over a boundary document fixture

use std::path::PathBuf;

use fieldmap_ingest::zones::{ZoneExtractor, UNKNOWN_ZONE_NAME};

fn fixture(file: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(file);
    std::fs::read_to_string(path).expect("Failed to read fixture")
}

#[test]
fn test_census_fixture_extracts_zones() {
    let document = fixture("census_tracts.geojson");
    let extracted = ZoneExtractor::new("Census_Tract", "NAMELSAD")
        .extract(&document)
        .expect("Failed to extract zones");

    // the water tract has no digitized boundary and is skipped
    assert_eq!(extracted.features_read, 3);
    assert_eq!(extracted.zones.len(), 2);

    let named = &extracted.zones[0];
    assert_eq!(named.name, "Census Tract 105");
    assert_eq!(named.zone_type, "Census_Tract");
    assert_eq!(named.boundary["type"], "Polygon");
    assert_eq!(named.properties["GEOID"], "51760010500");
    assert_eq!(named.properties["ALAND"], 1830742);

    let unnamed = &extracted.zones[1];
    assert_eq!(unnamed.name, UNKNOWN_ZONE_NAME);
    assert_eq!(unnamed.boundary["type"], "MultiPolygon");
}

#[test]
fn test_name_property_is_configurable() {
    let document = fixture("census_tracts.geojson");
    let extracted = ZoneExtractor::new("Census_Tract", "GEOID")
        .extract(&document)
        .expect("Failed to extract zones");

    assert_eq!(extracted.zones[0].name, "51760010500");
    assert_eq!(extracted.zones[1].name, "51760010600");
}

#[test]
fn test_malformed_document_is_an_error() {
    let result = ZoneExtractor::new("Census_Tract", "NAMELSAD").extract("{not geojson");
    assert!(result.is_err());
}
