//! Arcadia portal export adapter
//!
//! Address-only source: the export never carries coordinates, so
//! `location` stays empty and the address fields are the only geolocation
//! signal downstream.

use serde_json::{Map, Value};
use tracing::debug;

use super::{RawRow, SourceAdapter, SourceKind};
use crate::models::SalesEntry;
use crate::normalize::normalize_date;

/// State assumed when the export does not supply one.
const DEFAULT_STATE: &str = "VA";

/// Extra columns retained in the property bag, with their canonical keys.
const PROPERTY_COLUMNS: &[(&str, &str)] = &[
    ("campaign", "Campaigns"),
    ("rep_name", "Rep Name"),
    ("program_type", "Program Type"),
];

pub struct ArcadiaAdapter;

impl SourceAdapter for ArcadiaAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Arcadia
    }

    fn adapt(&self, row: &RawRow<'_>) -> Option<SalesEntry> {
        let sale_date = match normalize_date(row.get("Sale Date")) {
            Some(date) => date,
            None => {
                debug!(
                    ref_id = row.get("Ref #").unwrap_or("-"),
                    "Dropping row with missing or unparseable sale date"
                );
                return None;
            },
        };

        let mut properties = Map::new();
        for (key, column) in PROPERTY_COLUMNS {
            if let Some(value) = row.get(column) {
                properties.insert((*key).to_string(), Value::String(value.to_string()));
            }
        }

        Some(SalesEntry {
            external_ref_id: row.get("Ref #").map(String::from),
            customer_name: row.get("Customer Name").map(String::from),
            address_full: row.get("Customer Address").map(String::from),
            city: row.get("City").map(String::from),
            state: Some(row.get("State").unwrap_or(DEFAULT_STATE).to_string()),
            zip_code: row.get("Zip").map(String::from),
            sale_date,
            status: row.get("Order Status").map(String::from),
            utility_provider: row.get("Utility Name").map(String::from),
            utility_account: row.get("Utility Account Number").map(String::from),
            location: None,
            data_source: SourceKind::Arcadia.data_source_tag().to_string(),
            properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADERS: &[&str] = &[
        "Ref #",
        "Customer Name",
        "Customer Address",
        "City",
        "State",
        "Zip",
        "Sale Date",
        "Order Status",
        "Utility Name",
        "Utility Account Number",
        "Campaigns",
        "Rep Name",
        "Program Type",
    ];

    fn adapt(values: &[&str]) -> Option<SalesEntry> {
        let headers = csv::StringRecord::from(HEADERS.to_vec());
        let record = csv::StringRecord::from(values.to_vec());
        let row = RawRow::new(&headers, &record);
        ArcadiaAdapter.adapt(&row)
    }

    #[test]
    fn test_full_row_maps_to_entry() {
        let entry = adapt(&[
            "A-1001",
            "Jordan Smith",
            "123 Main St, Richmond, VA 23220",
            "Richmond",
            "VA",
            "23220",
            "12/05/2021",
            "Submitted",
            "Dominion Energy",
            "ACCT-77",
            "Winter Push",
            "Casey Lee",
            "Solar",
        ])
        .unwrap();

        assert_eq!(entry.external_ref_id.as_deref(), Some("A-1001"));
        assert_eq!(entry.customer_name.as_deref(), Some("Jordan Smith"));
        assert_eq!(entry.address_full.as_deref(), Some("123 Main St, Richmond, VA 23220"));
        assert_eq!(entry.city.as_deref(), Some("Richmond"));
        assert_eq!(entry.state.as_deref(), Some("VA"));
        assert_eq!(entry.zip_code.as_deref(), Some("23220"));
        assert_eq!(entry.sale_date, NaiveDate::from_ymd_opt(2021, 12, 5).unwrap());
        assert_eq!(entry.status.as_deref(), Some("Submitted"));
        assert_eq!(entry.utility_provider.as_deref(), Some("Dominion Energy"));
        assert_eq!(entry.utility_account.as_deref(), Some("ACCT-77"));
        assert_eq!(entry.location, None);
        assert_eq!(entry.data_source, "Arcadia");
    }

    #[test]
    fn test_property_bag_retains_selected_columns_in_order() {
        let entry = adapt(&[
            "A-1001",
            "Jordan Smith",
            "123 Main St",
            "Richmond",
            "VA",
            "23220",
            "12/05/2021",
            "Submitted",
            "Dominion Energy",
            "ACCT-77",
            "Winter Push",
            "Casey Lee",
            "Solar",
        ])
        .unwrap();

        let keys: Vec<&str> = entry.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["campaign", "rep_name", "program_type"]);
        assert_eq!(entry.properties["campaign"], Value::String("Winter Push".to_string()));
        assert_eq!(entry.properties["rep_name"], Value::String("Casey Lee".to_string()));
    }

    #[test]
    fn test_blank_property_columns_are_omitted() {
        let entry = adapt(&[
            "A-1002",
            "Sam Park",
            "9 Oak Ave",
            "Norfolk",
            "VA",
            "23501",
            "01/04/2022",
            "Pending",
            "",
            "",
            "",
            "Casey Lee",
            "",
        ])
        .unwrap();

        let keys: Vec<&str> = entry.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["rep_name"]);
        assert_eq!(entry.utility_provider, None);
    }

    #[test]
    fn test_blank_state_defaults() {
        let entry = adapt(&[
            "A-1003",
            "Sam Park",
            "9 Oak Ave",
            "Norfolk",
            "",
            "23501",
            "01/04/2022",
            "Pending",
            "",
            "",
            "",
            "",
            "",
        ])
        .unwrap();

        assert_eq!(entry.state.as_deref(), Some("VA"));
    }

    #[test]
    fn test_unparseable_date_drops_row() {
        assert!(adapt(&[
            "A-1004",
            "Sam Park",
            "9 Oak Ave",
            "Norfolk",
            "VA",
            "23501",
            "not a date",
            "Pending",
            "",
            "",
            "",
            "",
            "",
        ])
        .is_none());

        assert!(adapt(&[
            "A-1005", "Sam Park", "9 Oak Ave", "Norfolk", "VA", "23501", "", "Pending", "", "",
            "", "", "",
        ])
        .is_none());
    }
}
