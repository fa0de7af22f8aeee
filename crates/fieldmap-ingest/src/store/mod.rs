//! Idempotent bulk writer for canonical records
//!
//! Each call performs one batched insert inside one transaction. Rows
//! whose natural key already exists are skipped silently, so re-running an
//! ingestion over the same export cannot create duplicates. A failed batch
//! is rolled back whole and reported; nothing here retries.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fieldmap_common::FieldmapError;
use sqlx::PgPool;
use tracing::{debug, error, info};

use crate::geometry::SRID;
use crate::models::{SalesEntry, TerritoryZone};

const INSERT_SALES_ENTRIES: &str = r#"
INSERT INTO sales_entries (
    dedup_key, external_ref_id, customer_name, address_full, city, state,
    zip_code, sale_date, status, utility_provider, utility_account,
    location, data_source, properties
)
SELECT
    t.dedup_key, t.external_ref_id, t.customer_name, t.address_full,
    t.city, t.state, t.zip_code, t.sale_date, t.status,
    t.utility_provider, t.utility_account,
    ST_GeogFromText(t.location), t.data_source, t.properties::jsonb
FROM UNNEST(
    $1::text[], $2::text[], $3::text[], $4::text[], $5::text[],
    $6::text[], $7::text[], $8::date[], $9::text[], $10::text[],
    $11::text[], $12::text[], $13::text[], $14::text[]
) AS t(
    dedup_key, external_ref_id, customer_name, address_full, city,
    state, zip_code, sale_date, status, utility_provider,
    utility_account, location, data_source, properties
)
ON CONFLICT (dedup_key) DO NOTHING
"#;

/// Counts reported back from one batched write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Records handed to the writer.
    pub attempted: usize,
    /// Records actually inserted.
    pub written: usize,
    /// Records skipped because their natural key already existed.
    pub skipped: usize,
}

impl WriteOutcome {
    fn new(attempted: usize, written: usize) -> Self {
        Self {
            attempted,
            written,
            skipped: attempted.saturating_sub(written),
        }
    }

    fn empty() -> Self {
        Self::new(0, 0)
    }
}

/// Write handle over the geospatial store.
pub struct IngestStore {
    pool: PgPool,
}

impl IngestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Verify the store is reachable.
    pub async fn health_check(&self) -> fieldmap_common::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| FieldmapError::Database(e.to_string()))
    }

    /// Insert a batch of sales entries, skipping natural-key conflicts.
    pub async fn insert_sales_entries(&self, entries: &[SalesEntry]) -> Result<WriteOutcome> {
        if entries.is_empty() {
            debug!("No sales entries to insert");
            return Ok(WriteOutcome::empty());
        }

        let mut dedup_keys: Vec<String> = Vec::with_capacity(entries.len());
        let mut external_ref_ids: Vec<Option<String>> = Vec::with_capacity(entries.len());
        let mut customer_names: Vec<Option<String>> = Vec::with_capacity(entries.len());
        let mut addresses: Vec<Option<String>> = Vec::with_capacity(entries.len());
        let mut cities: Vec<Option<String>> = Vec::with_capacity(entries.len());
        let mut states: Vec<Option<String>> = Vec::with_capacity(entries.len());
        let mut zip_codes: Vec<Option<String>> = Vec::with_capacity(entries.len());
        let mut sale_dates: Vec<NaiveDate> = Vec::with_capacity(entries.len());
        let mut statuses: Vec<Option<String>> = Vec::with_capacity(entries.len());
        let mut providers: Vec<Option<String>> = Vec::with_capacity(entries.len());
        let mut accounts: Vec<Option<String>> = Vec::with_capacity(entries.len());
        let mut locations: Vec<Option<String>> = Vec::with_capacity(entries.len());
        let mut data_sources: Vec<String> = Vec::with_capacity(entries.len());
        let mut properties: Vec<String> = Vec::with_capacity(entries.len());

        for entry in entries {
            dedup_keys.push(entry.dedup_key());
            external_ref_ids.push(entry.external_ref_id.clone());
            customer_names.push(entry.customer_name.clone());
            addresses.push(entry.address_full.clone());
            cities.push(entry.city.clone());
            states.push(entry.state.clone());
            zip_codes.push(entry.zip_code.clone());
            sale_dates.push(entry.sale_date);
            statuses.push(entry.status.clone());
            providers.push(entry.utility_provider.clone());
            accounts.push(entry.utility_account.clone());
            locations.push(entry.location.clone());
            data_sources.push(entry.data_source.clone());
            properties.push(
                serde_json::to_string(&entry.properties)
                    .context("Failed to serialize sales entry properties")?,
            );
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let result = sqlx::query(INSERT_SALES_ENTRIES)
            .bind(&dedup_keys)
            .bind(&external_ref_ids)
            .bind(&customer_names)
            .bind(&addresses)
            .bind(&cities)
            .bind(&states)
            .bind(&zip_codes)
            .bind(&sale_dates)
            .bind(&statuses)
            .bind(&providers)
            .bind(&accounts)
            .bind(&locations)
            .bind(&data_sources)
            .bind(&properties)
            .execute(&mut *tx)
            .await;

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                tx.rollback().await.ok();
                error!(
                    attempted = entries.len(),
                    error = %e,
                    "Sales batch insert failed, batch rolled back"
                );
                return Err(e).context("Failed to insert sales entries");
            },
        };

        tx.commit().await.context("Failed to commit transaction")?;

        let outcome = WriteOutcome::new(entries.len(), result.rows_affected() as usize);
        info!(
            attempted = outcome.attempted,
            written = outcome.written,
            skipped = outcome.skipped,
            "Sales batch committed"
        );

        Ok(outcome)
    }

    /// Insert a batch of territory zones, skipping natural-key conflicts.
    pub async fn insert_zones(&self, zones: &[TerritoryZone]) -> Result<WriteOutcome> {
        if zones.is_empty() {
            debug!("No zones to insert");
            return Ok(WriteOutcome::empty());
        }

        let mut names: Vec<String> = Vec::with_capacity(zones.len());
        let mut zone_types: Vec<String> = Vec::with_capacity(zones.len());
        let mut boundaries: Vec<String> = Vec::with_capacity(zones.len());
        let mut properties: Vec<String> = Vec::with_capacity(zones.len());

        for zone in zones {
            names.push(zone.name.clone());
            zone_types.push(zone.zone_type.clone());
            boundaries.push(
                serde_json::to_string(&zone.boundary)
                    .context("Failed to serialize zone boundary")?,
            );
            properties.push(
                serde_json::to_string(&zone.properties)
                    .context("Failed to serialize zone properties")?,
            );
        }

        let sql = format!(
            r#"
INSERT INTO territory_zones (name, zone_type, boundary, properties)
SELECT t.name, t.zone_type,
       ST_SetSRID(ST_GeomFromGeoJSON(t.boundary), {srid}),
       t.properties::jsonb
FROM UNNEST($1::text[], $2::text[], $3::text[], $4::text[])
     AS t(name, zone_type, boundary, properties)
ON CONFLICT (name, zone_type) DO NOTHING
"#,
            srid = SRID
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let result = sqlx::query(&sql)
            .bind(&names)
            .bind(&zone_types)
            .bind(&boundaries)
            .bind(&properties)
            .execute(&mut *tx)
            .await;

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                tx.rollback().await.ok();
                error!(
                    attempted = zones.len(),
                    error = %e,
                    "Zone batch insert failed, batch rolled back"
                );
                return Err(e).context("Failed to insert territory zones");
            },
        };

        tx.commit().await.context("Failed to commit transaction")?;

        let outcome = WriteOutcome::new(zones.len(), result.rows_affected() as usize);
        info!(
            attempted = outcome.attempted,
            written = outcome.written,
            skipped = outcome.skipped,
            "Zone batch committed"
        );

        Ok(outcome)
    }
}
