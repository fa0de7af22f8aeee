//! Leaderboard feed maintenance
//!
//! The reporting frontend consumes a JSON feed of per-rep sale counts.
//! Fresh monthly counts arrive as a JSON object keyed `"repId|repName"`;
//! this module merges them into the existing feed without touching the
//! daily and weekly figures maintained elsewhere.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use fieldmap_common::Result;

/// One rep's entry in the leaderboard feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepEntry {
    pub id: String,
    pub name: String,
    pub daily: i64,
    pub weekly: i64,
    pub monthly: i64,
}

/// Merge fresh monthly counts into an existing feed.
///
/// Count keys are `"repId|repName"`. Known reps get their monthly count
/// replaced and their display name refreshed; unknown reps are appended
/// with zeroed daily and weekly counts. Reps absent from the counts keep
/// their existing entry. The result is sorted by monthly count,
/// descending.
pub fn merge_counts(
    mut feed: Vec<RepEntry>,
    counts: &serde_json::Map<String, Value>,
) -> Vec<RepEntry> {
    for (key, value) in counts {
        let Some((id, name)) = key.split_once('|') else {
            warn!(key = %key, "Skipping count with malformed rep key");
            continue;
        };
        let Some(monthly) = value.as_i64() else {
            warn!(key = %key, value = %value, "Skipping count with non-integer value");
            continue;
        };

        match feed.iter_mut().find(|rep| rep.id == id) {
            Some(rep) => {
                rep.name = name.to_string();
                rep.monthly = monthly;
            },
            None => feed.push(RepEntry {
                id: id.to_string(),
                name: name.to_string(),
                daily: 0,
                weekly: 0,
                monthly,
            }),
        }
    }

    feed.sort_by(|a, b| b.monthly.cmp(&a.monthly));
    feed
}

/// Load the current feed, treating a missing file as an empty feed.
pub fn load_feed(path: &Path) -> Result<Vec<RepEntry>> {
    if !path.exists() {
        info!(path = %path.display(), "No existing feed, starting empty");
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Merge a counts file into the feed file and rewrite it.
///
/// With `dry_run` the merged feed is returned but not written.
pub fn update_feed(counts_path: &Path, feed_path: &Path, dry_run: bool) -> Result<Vec<RepEntry>> {
    let contents = std::fs::read_to_string(counts_path)?;
    let counts: serde_json::Map<String, Value> = serde_json::from_str(&contents)?;

    let feed = load_feed(feed_path)?;
    let merged = merge_counts(feed, &counts);

    if dry_run {
        info!(reps = merged.len(), "Dry run, feed not written");
        return Ok(merged);
    }

    let mut rendered = serde_json::to_string_pretty(&merged)?;
    rendered.push('\n');
    std::fs::write(feed_path, rendered)?;
    info!(path = %feed_path.display(), reps = merged.len(), "Leaderboard feed updated");

    Ok(merged)
}
