//! Viper legacy export adapter
//!
//! Coordinate-bearing source: every usable row carries a latitude and
//! longitude, so a row missing either is inconsistent data and is dropped
//! outright. Status and provider are constants implied by the export.

use serde_json::{Map, Value};
use tracing::debug;

use super::{RawRow, SourceAdapter, SourceKind};
use crate::geometry::point_from_parts;
use crate::models::SalesEntry;
use crate::normalize::{normalize_coordinate, normalize_date};

const DEFAULT_STATUS: &str = "Complete";
const DEFAULT_PROVIDER: &str = "Dominion";

pub struct ViperLegacyAdapter;

impl SourceAdapter for ViperLegacyAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::ViperLegacy
    }

    fn adapt(&self, row: &RawRow<'_>) -> Option<SalesEntry> {
        let ref_id = row.get("Reference_");

        let longitude = normalize_coordinate(row.get("Longitude"));
        let latitude = normalize_coordinate(row.get("Latitude"));
        let location = match point_from_parts(longitude, latitude) {
            Some(point) => point,
            None => {
                debug!(
                    ref_id = ref_id.unwrap_or("-"),
                    "Dropping row without a complete coordinate pair"
                );
                return None;
            },
        };

        let sale_date = match normalize_date(row.get("Sale_Date")) {
            Some(date) => date,
            None => {
                debug!(
                    ref_id = ref_id.unwrap_or("-"),
                    "Dropping row with missing or unparseable sale date"
                );
                return None;
            },
        };

        let customer_name = row.get("Customer_A");
        let city = row.get("City");
        let state = row.get("State");
        let zip_code = row.get("Zip");

        let mut properties = Map::new();
        if let Some(fid) = row.get("FID") {
            properties.insert("fid".to_string(), Value::String(fid.to_string()));
        }

        Some(SalesEntry {
            external_ref_id: ref_id.map(String::from),
            customer_name: customer_name.map(String::from),
            address_full: compose_address(customer_name, city, state, zip_code),
            city: city.map(String::from),
            state: state.map(String::from),
            zip_code: zip_code.map(String::from),
            sale_date,
            status: Some(DEFAULT_STATUS.to_string()),
            utility_provider: Some(DEFAULT_PROVIDER.to_string()),
            utility_account: None,
            location: Some(location),
            data_source: SourceKind::ViperLegacy.data_source_tag().to_string(),
            properties,
        })
    }
}

/// Synthesize a fallback address line from whichever parts are present,
/// in "name, city, state zip" order.
fn compose_address(
    name: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
    zip: Option<&str>,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if let Some(name) = name {
        parts.push(name.to_string());
    }
    if let Some(city) = city {
        parts.push(city.to_string());
    }
    match (state, zip) {
        (Some(state), Some(zip)) => parts.push(format!("{} {}", state, zip)),
        (Some(state), None) => parts.push(state.to_string()),
        (None, Some(zip)) => parts.push(zip.to_string()),
        (None, None) => {},
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}
