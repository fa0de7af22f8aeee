//! Source adapters: raw export rows into canonical sales entries
//!
//! One adapter per upstream schema. Each consumes a raw row and yields
//! either a complete `SalesEntry` or a drop decision, never a partial
//! record. Drop decisions are silent at the row level; callers reconcile
//! through aggregate counts.

mod arcadia;
mod viper_legacy;

pub use arcadia::ArcadiaAdapter;
pub use viper_legacy::ViperLegacyAdapter;

use std::path::PathBuf;
use std::str::FromStr;

use fieldmap_common::FieldmapError;
use serde::{Deserialize, Serialize};

use crate::models::SalesEntry;

/// Enumerated upstream source schemas.
///
/// Adding a source means adding a variant here and one adapter
/// implementation, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Arcadia,
    ViperLegacy,
}

impl SourceKind {
    /// Provenance tag stored on every record this source produces.
    pub fn data_source_tag(self) -> &'static str {
        match self {
            SourceKind::Arcadia => "Arcadia",
            SourceKind::ViperLegacy => "Viper_Legacy",
        }
    }
}

impl FromStr for SourceKind {
    type Err = FieldmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "arcadia" => Ok(SourceKind::Arcadia),
            "viper-legacy" | "viper_legacy" => Ok(SourceKind::ViperLegacy),
            other => Err(FieldmapError::Parse(format!(
                "Unknown source kind '{}' (expected: arcadia, viper-legacy)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Arcadia => write!(f, "arcadia"),
            SourceKind::ViperLegacy => write!(f, "viper-legacy"),
        }
    }
}

/// One input file paired with the adapter that understands it.
///
/// Parsed from `KIND=PATH` command-line specs.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub kind: SourceKind,
    pub path: PathBuf,
}

impl FromStr for SourceSpec {
    type Err = FieldmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, path) = s.split_once('=').ok_or_else(|| {
            FieldmapError::Parse(format!("Invalid source spec '{}' (expected KIND=PATH)", s))
        })?;

        let path = path.trim();
        if path.is_empty() {
            return Err(FieldmapError::Parse(format!(
                "Invalid source spec '{}' (empty path)",
                s
            )));
        }

        Ok(SourceSpec {
            kind: kind.parse()?,
            path: PathBuf::from(path),
        })
    }
}

/// Borrowed view of one delimited row keyed by column name.
pub struct RawRow<'a> {
    headers: &'a csv::StringRecord,
    record: &'a csv::StringRecord,
}

impl<'a> RawRow<'a> {
    pub fn new(headers: &'a csv::StringRecord, record: &'a csv::StringRecord) -> Self {
        Self { headers, record }
    }

    /// Look up a column by exact trimmed name.
    ///
    /// Returns `None` for an absent column, a short row, or a blank value.
    /// Excel exports prefix the first header with a BOM, which is stripped
    /// before comparison.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self
            .headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == column)?;
        self.record
            .get(index)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Map a source kind to its adapter implementation.
pub fn for_kind(kind: SourceKind) -> &'static dyn SourceAdapter {
    match kind {
        SourceKind::Arcadia => &ArcadiaAdapter,
        SourceKind::ViperLegacy => &ViperLegacyAdapter,
    }
}

/// Uniform "raw row to canonical record or drop" capability.
pub trait SourceAdapter: Send + Sync {
    /// Which source schema this adapter understands.
    fn kind(&self) -> SourceKind;

    /// Map one raw row to a canonical entry, or decide to drop it.
    fn adapt(&self, row: &RawRow<'_>) -> Option<SalesEntry>;
}
