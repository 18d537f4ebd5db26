//! Raw feed record -> [`VenueSnapshot`] normalization.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use swx_engine::VenueSnapshot;

const TENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Upstream item codes arrive as numbers in some deployments and strings in
/// others. Decoded leniently, rendered as a trimmed string either way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeField {
    Num(i64),
    Text(String),
}

impl Default for CodeField {
    fn default() -> Self {
        CodeField::Text(String::new())
    }
}

impl CodeField {
    fn render(&self) -> String {
        match self {
            CodeField::Num(n) => n.to_string(),
            CodeField::Text(s) => s.trim().to_string(),
        }
    }
}

/// Serde mirror of one object in the live feed array. Field names follow the
/// upstream wire format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawVenueRecord {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "isLive", default)]
    pub is_live: bool,
    #[serde(default)]
    pub item_code: CodeField,
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub participants: i64,
    #[serde(default)]
    pub completed: i64,
    /// "Y" / "N" flag upstream.
    #[serde(rename = "is_tabulation_finish", default)]
    pub tabulation_finish: String,
    #[serde(rename = "tent_time", default)]
    pub tent_time: String,
}

/// Decode the feed document (a JSON array of venue records).
///
/// Failure here is the UpstreamUnavailable case: the caller should log it and
/// hand the engine an empty venue list.
pub fn parse_snapshot_json(raw: &str) -> Result<Vec<RawVenueRecord>> {
    serde_json::from_str(raw).context("live feed document is not a venue record array")
}

/// Normalize raw records into engine snapshots, applying safe defaults for
/// malformed per-venue fields. Never fails and never drops a venue.
pub fn normalize_records(records: &[RawVenueRecord], now: NaiveDateTime) -> Vec<VenueSnapshot> {
    records.iter().map(|r| normalize_record(r, now)).collect()
}

fn normalize_record(record: &RawVenueRecord, now: NaiveDateTime) -> VenueSnapshot {
    let tentative_finish = match NaiveDateTime::parse_from_str(&record.tent_time, TENT_TIME_FORMAT)
    {
        Ok(t) => t,
        Err(_) => {
            tracing::debug!(
                venue = %record.name,
                tent_time = %record.tent_time,
                "unparseable tentative finish time, substituting now"
            );
            now
        }
    };

    VenueSnapshot {
        venue: record.name.clone(),
        location: record.location.clone(),
        is_live: record.is_live,
        item_code: record.item_code.render(),
        item_name: record.item_name.clone(),
        participants_total: clamp_count(record.participants),
        participants_completed: clamp_count(record.completed),
        tabulation_finished: record.tabulation_finish.trim().eq_ignore_ascii_case("y"),
        tentative_finish,
    }
}

/// Counts outside [0, u32::MAX] collapse to the nearest bound; negative
/// values are treated as missing (zero).
fn clamp_count(raw: i64) -> u32 {
    raw.clamp(0, i64::from(u32::MAX)) as u32
}
