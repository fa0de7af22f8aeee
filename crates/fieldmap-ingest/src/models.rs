//! Canonical record shapes shared by adapters, pipelines, and the store

use chrono::NaiveDate;
use fieldmap_common::hash::sha256_hex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One sale/lead record in canonical shape, regardless of source.
///
/// `location` is an EWKT point literal when the source supplied
/// coordinates. `properties` carries source-specific extras verbatim, in
/// insertion order, and is never interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesEntry {
    pub external_ref_id: Option<String>,
    pub customer_name: Option<String>,
    pub address_full: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub sale_date: NaiveDate,
    pub status: Option<String>,
    pub utility_provider: Option<String>,
    pub utility_account: Option<String>,
    pub location: Option<String>,
    pub data_source: String,
    pub properties: Map<String, Value>,
}

impl SalesEntry {
    /// Deterministic natural key used as the insert-if-absent conflict
    /// target.
    ///
    /// Keyed on source tag plus the upstream reference id; sources without
    /// a reference id fall back to source tag plus address plus sale date.
    pub fn dedup_key(&self) -> String {
        match self.external_ref_id.as_deref() {
            Some(ref_id) => sha256_hex(&[&self.data_source, ref_id]),
            None => {
                let address = self.address_full.as_deref().unwrap_or("");
                let date = self.sale_date.to_string();
                sha256_hex(&[&self.data_source, address, &date])
            },
        }
    }
}

/// One named geographic area with a classification.
///
/// `boundary` is the source GeoJSON geometry fragment, passed through
/// unmodified; the spatial reference is applied at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryZone {
    pub name: String,
    pub zone_type: String,
    pub boundary: Value,
    pub properties: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(data_source: &str, ref_id: Option<&str>) -> SalesEntry {
        SalesEntry {
            external_ref_id: ref_id.map(String::from),
            customer_name: Some("Jordan Smith".to_string()),
            address_full: Some("123 Main St, Richmond, VA 23220".to_string()),
            city: Some("Richmond".to_string()),
            state: Some("VA".to_string()),
            zip_code: Some("23220".to_string()),
            sale_date: NaiveDate::from_ymd_opt(2021, 12, 5).unwrap(),
            status: Some("Complete".to_string()),
            utility_provider: Some("Dominion".to_string()),
            utility_account: None,
            location: None,
            data_source: data_source.to_string(),
            properties: Map::new(),
        }
    }

    #[test]
    fn test_dedup_key_is_deterministic() {
        let a = entry("Arcadia", Some("A-1001"));
        let b = entry("Arcadia", Some("A-1001"));
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_dedup_key_varies_by_source_and_ref() {
        let a = entry("Arcadia", Some("A-1001"));
        let b = entry("Viper_Legacy", Some("A-1001"));
        let c = entry("Arcadia", Some("A-1002"));
        assert_ne!(a.dedup_key(), b.dedup_key());
        assert_ne!(a.dedup_key(), c.dedup_key());
    }

    #[test]
    fn test_dedup_key_falls_back_to_address_and_date() {
        let a = entry("Arcadia", None);
        let b = entry("Arcadia", None);
        assert_eq!(a.dedup_key(), b.dedup_key());

        let mut c = entry("Arcadia", None);
        c.sale_date = NaiveDate::from_ymd_opt(2021, 12, 6).unwrap();
        assert_ne!(a.dedup_key(), c.dedup_key());

        let mut d = entry("Arcadia", None);
        d.address_full = Some("9 Oak Ave, Norfolk, VA 23501".to_string());
        assert_ne!(a.dedup_key(), d.dedup_key());
    }

    #[test]
    fn test_dedup_key_ignores_non_key_fields() {
        let mut a = entry("Arcadia", Some("A-1001"));
        let mut b = entry("Arcadia", Some("A-1001"));
        a.status = Some("Pending".to_string());
        b.customer_name = None;
        assert_eq!(a.dedup_key(), b.dedup_key());
    }
}
