//! Ingestion pipelines
//!
//! Batch-oriented drivers: each input file is read wholesale, transformed,
//! and written as one batch before the next file is touched. A missing
//! input skips that source with a warning; a failed write fails only that
//! source's batch. Either way the run continues and every source ends up
//! in the run report.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::adapters::{self, RawRow, SourceKind, SourceSpec};
use crate::models::SalesEntry;
use crate::store::IngestStore;
use crate::zones::ZoneExtractor;

/// Rows read and records prepared from one sales export.
#[derive(Debug)]
pub struct PreparedSource {
    pub rows_read: usize,
    pub entries: Vec<SalesEntry>,
}

/// Read one sales export and adapt its rows to canonical entries.
///
/// Malformed CSV records are counted as read, then skipped like any other
/// dropped row.
pub fn prepare_source(spec: &SourceSpec) -> Result<PreparedSource> {
    let adapter = adapters::for_kind(spec.kind);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&spec.path)
        .with_context(|| format!("Failed to open {}", spec.path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();

    let mut rows_read = 0;
    let mut entries = Vec::new();
    for record in reader.records() {
        rows_read += 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(source = %spec.kind, row = rows_read, error = %e, "Skipping malformed CSV record");
                continue;
            },
        };

        if let Some(entry) = adapter.adapt(&RawRow::new(&headers, &record)) {
            entries.push(entry);
        }
    }

    Ok(PreparedSource { rows_read, entries })
}

/// Per-source ingestion counts for reconciliation.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: SourceKind,
    pub rows_read: usize,
    pub records_prepared: usize,
    pub records_written: usize,
    pub records_skipped: usize,
    /// Input file was missing or unreadable; nothing was attempted.
    pub skipped: bool,
    /// The batch write failed and was rolled back.
    pub failed: bool,
}

impl SourceReport {
    fn skipped(source: SourceKind) -> Self {
        Self {
            source,
            rows_read: 0,
            records_prepared: 0,
            records_written: 0,
            records_skipped: 0,
            skipped: true,
            failed: false,
        }
    }

    pub fn summary(&self) -> String {
        if self.skipped {
            return format!("{}: skipped (input not found)", self.source);
        }
        if self.failed {
            return format!(
                "{}: write failed after preparing {} records ({} read)",
                self.source, self.records_prepared, self.rows_read
            );
        }
        format!(
            "{}: {} read, {} prepared, {} written, {} skipped",
            self.source,
            self.rows_read,
            self.records_prepared,
            self.records_written,
            self.records_skipped
        )
    }
}

/// Outcome of one multi-source sales run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub sources: Vec<SourceReport>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.sources.iter().any(|s| s.failed)
    }

    pub fn summary(&self) -> String {
        let rows_read: usize = self.sources.iter().map(|s| s.rows_read).sum();
        let prepared: usize = self.sources.iter().map(|s| s.records_prepared).sum();
        let written: usize = self.sources.iter().map(|s| s.records_written).sum();
        let skipped: usize = self.sources.iter().map(|s| s.records_skipped).sum();

        let mut summary = format!(
            "Run {}: {} sources, {} rows read, {} prepared, {} written, {} skipped",
            self.run_id,
            self.sources.len(),
            rows_read,
            prepared,
            written,
            skipped
        );

        let sources_skipped = self.sources.iter().filter(|s| s.skipped).count();
        if sources_skipped > 0 {
            summary.push_str(&format!(", {} sources skipped", sources_skipped));
        }
        let sources_failed = self.sources.iter().filter(|s| s.failed).count();
        if sources_failed > 0 {
            summary.push_str(&format!(", {} sources failed", sources_failed));
        }

        summary
    }
}

/// Multi-source sales ingestion driver.
pub struct SalesPipeline {
    store: IngestStore,
}

impl SalesPipeline {
    pub fn new(store: IngestStore) -> Self {
        Self { store }
    }

    /// Ingest each source in order, one batch per source.
    pub async fn run(&self, specs: &[SourceSpec]) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, sources = specs.len(), "Starting sales ingestion run");

        let mut sources = Vec::with_capacity(specs.len());
        for spec in specs {
            let report = self.ingest_source(spec).await;
            info!(run_id = %run_id, "{}", report.summary());
            sources.push(report);
        }

        Ok(RunReport { run_id, sources })
    }

    async fn ingest_source(&self, spec: &SourceSpec) -> SourceReport {
        info!(source = %spec.kind, path = %spec.path.display(), "Ingesting sales export");

        if !spec.path.exists() {
            warn!(
                source = %spec.kind,
                path = %spec.path.display(),
                "Input file not found, skipping source"
            );
            return SourceReport::skipped(spec.kind);
        }

        let prepared = match prepare_source(spec) {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!(
                    source = %spec.kind,
                    path = %spec.path.display(),
                    error = %e,
                    "Failed to read source, skipping"
                );
                return SourceReport::skipped(spec.kind);
            },
        };

        let mut report = SourceReport {
            source: spec.kind,
            rows_read: prepared.rows_read,
            records_prepared: prepared.entries.len(),
            records_written: 0,
            records_skipped: 0,
            skipped: false,
            failed: false,
        };

        if prepared.entries.is_empty() {
            info!(source = %spec.kind, rows_read = prepared.rows_read, "No records prepared, nothing to write");
            return report;
        }

        match self.store.insert_sales_entries(&prepared.entries).await {
            Ok(outcome) => {
                report.records_written = outcome.written;
                report.records_skipped = outcome.skipped;
            },
            Err(e) => {
                error!(
                    source = %spec.kind,
                    attempted = prepared.entries.len(),
                    error = %e,
                    error_chain = ?e.chain().collect::<Vec<_>>(),
                    "Source batch failed"
                );
                report.failed = true;
            },
        }

        report
    }
}

/// Per-document zone ingestion counts.
#[derive(Debug, Clone)]
pub struct ZoneReport {
    pub zone_type: String,
    pub features_read: usize,
    pub zones_prepared: usize,
    pub zones_written: usize,
    pub zones_skipped: usize,
    pub skipped: bool,
    pub failed: bool,
}

impl ZoneReport {
    fn skipped(zone_type: &str) -> Self {
        Self {
            zone_type: zone_type.to_string(),
            features_read: 0,
            zones_prepared: 0,
            zones_written: 0,
            zones_skipped: 0,
            skipped: true,
            failed: false,
        }
    }

    pub fn summary(&self) -> String {
        if self.skipped {
            return format!("{}: skipped (input not found)", self.zone_type);
        }
        if self.failed {
            return format!(
                "{}: write failed after preparing {} zones ({} features read)",
                self.zone_type, self.zones_prepared, self.features_read
            );
        }
        format!(
            "{}: {} features read, {} prepared, {} written, {} skipped",
            self.zone_type,
            self.features_read,
            self.zones_prepared,
            self.zones_written,
            self.zones_skipped
        )
    }
}

/// Boundary document ingestion driver.
pub struct ZonePipeline {
    store: IngestStore,
}

impl ZonePipeline {
    pub fn new(store: IngestStore) -> Self {
        Self { store }
    }

    /// Ingest one boundary document under one zone classification.
    pub async fn run(
        &self,
        input: &Path,
        zone_type: &str,
        name_property: &str,
    ) -> Result<ZoneReport> {
        info!(
            path = %input.display(),
            zone_type = zone_type,
            name_property = name_property,
            "Ingesting boundary document"
        );

        if !input.exists() {
            warn!(path = %input.display(), "Input file not found, skipping");
            return Ok(ZoneReport::skipped(zone_type));
        }

        let document = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        let extracted = ZoneExtractor::new(zone_type, name_property)
            .extract(&document)
            .with_context(|| format!("Failed to parse {}", input.display()))?;

        let mut report = ZoneReport {
            zone_type: zone_type.to_string(),
            features_read: extracted.features_read,
            zones_prepared: extracted.zones.len(),
            zones_written: 0,
            zones_skipped: 0,
            skipped: false,
            failed: false,
        };

        if extracted.zones.is_empty() {
            info!(
                zone_type = zone_type,
                features_read = extracted.features_read,
                "No zones prepared, nothing to write"
            );
            return Ok(report);
        }

        match self.store.insert_zones(&extracted.zones).await {
            Ok(outcome) => {
                report.zones_written = outcome.written;
                report.zones_skipped = outcome.skipped;
            },
            Err(e) => {
                error!(
                    zone_type = zone_type,
                    attempted = extracted.zones.len(),
                    error = %e,
                    error_chain = ?e.chain().collect::<Vec<_>>(),
                    "Zone batch failed"
                );
                report.failed = true;
            },
        }

        info!("{}", report.summary());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(source: SourceKind) -> SourceReport {
        SourceReport {
            source,
            rows_read: 10,
            records_prepared: 8,
            records_written: 7,
            records_skipped: 1,
            skipped: false,
            failed: false,
        }
    }

    #[test]
    fn test_source_report_summary() {
        let r = report(SourceKind::Arcadia);
        assert_eq!(r.summary(), "arcadia: 10 read, 8 prepared, 7 written, 1 skipped");

        let skipped = SourceReport::skipped(SourceKind::ViperLegacy);
        assert_eq!(skipped.summary(), "viper-legacy: skipped (input not found)");

        let mut failed = report(SourceKind::Arcadia);
        failed.failed = true;
        failed.records_written = 0;
        assert_eq!(failed.summary(), "arcadia: write failed after preparing 8 records (10 read)");
    }

    #[test]
    fn test_run_report_totals() {
        let run = RunReport {
            run_id: Uuid::new_v4(),
            sources: vec![report(SourceKind::Arcadia), report(SourceKind::ViperLegacy)],
        };
        assert!(!run.has_failures());
        let summary = run.summary();
        assert!(summary.contains("2 sources"));
        assert!(summary.contains("20 rows read"));
        assert!(summary.contains("14 written"));
        assert!(!summary.contains("failed"));
    }

    #[test]
    fn test_run_report_flags_failures_and_skips() {
        let mut failed = report(SourceKind::Arcadia);
        failed.failed = true;
        let run = RunReport {
            run_id: Uuid::new_v4(),
            sources: vec![failed, SourceReport::skipped(SourceKind::ViperLegacy)],
        };
        assert!(run.has_failures());
        let summary = run.summary();
        assert!(summary.contains("1 sources skipped"));
        assert!(summary.contains("1 sources failed"));
    }

    #[test]
    fn test_zone_report_summary() {
        let r = ZoneReport {
            zone_type: "Census_Tract".to_string(),
            features_read: 5,
            zones_prepared: 4,
            zones_written: 4,
            zones_skipped: 0,
            skipped: false,
            failed: false,
        };
        assert_eq!(r.summary(), "Census_Tract: 5 features read, 4 prepared, 4 written, 0 skipped");
        assert_eq!(
            ZoneReport::skipped("Census_Tract").summary(),
            "Census_Tract: skipped (input not found)"
        );
    }
}
