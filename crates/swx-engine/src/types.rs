use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Set of item codes whose adjudicated result has been publicly announced.
/// Replaced wholesale every poll.
pub type PublishedCodes = BTreeSet<String>;

/// Tunable rule thresholds. The source dashboards baked these into each rule
/// with small inconsistent drift; here they are explicit configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minutes of lag tolerated on a live venue before TimeLag escalates
    /// from warning to critical.
    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: i64,

    /// Minimum similarity ratio in [0,1] for an observed item name to count
    /// as the scheduled item.
    #[serde(default = "default_similarity")]
    pub similarity: f64,
}

fn default_grace_minutes() -> i64 {
    10
}

fn default_similarity() -> f64 {
    0.65
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            grace_minutes: default_grace_minutes(),
            similarity: default_similarity(),
        }
    }
}

/// One pre-declared slot in a venue's schedule. `time` is kept as the raw
/// time-of-day string; the resolver parses it lazily and discards entries
/// that fail to parse (non-fatal).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub item: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ScheduleSlot {
    pub fn new(item: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            time: time.into(),
            code: None,
        }
    }
}

/// Static pre-schedule: venue id -> declared slots. Loaded once per
/// deployment, never mutated at runtime. A venue with no entry is an
/// explicit lookup miss, not an empty slot list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    venues: BTreeMap<String, Vec<ScheduleSlot>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slot for `venue`, creating the entry on first use.
    pub fn add_slot(&mut self, venue: impl Into<String>, slot: ScheduleSlot) {
        self.venues.entry(venue.into()).or_default().push(slot);
    }

    pub fn slots_for(&self, venue: &str) -> Option<&[ScheduleSlot]> {
        self.venues.get(venue).map(|v| v.as_slice())
    }

    /// Deterministic iteration (BTreeMap order) over all venues.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &[ScheduleSlot])> {
        self.venues.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}

/// One venue's operational state as reported by the live feed. Replaced
/// wholesale every poll; never merged with a prior snapshot.
///
/// `participants_completed` may exceed `participants_total` in the input —
/// that is not rejected here, it is itself an anomaly (CompletedExceedsTotal).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueSnapshot {
    pub venue: String,
    pub location: String,
    pub is_live: bool,
    pub item_code: String,
    pub item_name: String,
    pub participants_total: u32,
    pub participants_completed: u32,
    pub tabulation_finished: bool,
    /// Operator-projected completion time for the current item. Feed parse
    /// failures are substituted with "now" before the engine runs.
    pub tentative_finish: NaiveDateTime,
}

impl VenueSnapshot {
    /// Participants still to perform. Signed: negative when the feed claims
    /// more completed than total.
    pub fn pending(&self) -> i64 {
        i64::from(self.participants_total) - i64::from(self.participants_completed)
    }
}

/// Finding severity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// Typed anomaly kinds. Rule evaluation order is fixed in the detector; the
/// variants here are declared in that same order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Result public while the venue is still live.
    PublishConflict,
    /// Impossible counter state: completed > total.
    CompletedExceedsTotal,
    /// Nothing left to perform but still marked live.
    ZombieLive,
    /// Pending performers while the venue is inactive.
    StalledInactive,
    /// Tabulation marked finished with performers still pending.
    TabulationMismatch,
    /// Live venue behind its own projected finish time.
    TimeLag,
    /// Feed disagrees with the pre-declared schedule (wrong item shown).
    ScheduleMismatch,
    /// Schedule predicts an active item but no venue in the feed shows it.
    ScheduleGap,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::PublishConflict => "publish_conflict",
            AnomalyKind::CompletedExceedsTotal => "completed_exceeds_total",
            AnomalyKind::ZombieLive => "zombie_live",
            AnomalyKind::StalledInactive => "stalled_inactive",
            AnomalyKind::TabulationMismatch => "tabulation_mismatch",
            AnomalyKind::TimeLag => "time_lag",
            AnomalyKind::ScheduleMismatch => "schedule_mismatch",
            AnomalyKind::ScheduleGap => "schedule_gap",
        }
    }
}

/// One detected inconsistency, with enough numeric context for a
/// presentation layer to render without re-deriving anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub venue: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lag_minutes: Option<i64>,
}

impl Anomaly {
    pub fn new(
        kind: AnomalyKind,
        severity: Severity,
        venue: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            venue: venue.into(),
            message: message.into(),
            pending: None,
            lag_minutes: None,
        }
    }

    pub fn with_pending(mut self, pending: i64) -> Self {
        self.pending = Some(pending);
        self
    }

    pub fn with_lag(mut self, lag_minutes: i64) -> Self {
        self.lag_minutes = Some(lag_minutes);
        self
    }
}

/// Anomalies grouped under one venue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueFindings {
    pub venue: String,
    pub location: String,
    pub pending: i64,
    pub anomalies: Vec<Anomaly>,
}

/// Event-wide counters. `live` and `inactive` partition all venues;
/// `finished` counts tabulation-finished venues independently.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_venues: usize,
    pub live: usize,
    pub inactive: usize,
    pub finished: usize,
    pub participants_total: u64,
    pub participants_completed: u64,
    /// floor(100 * completed / total); 0 when total is 0.
    pub progress_pct: u64,
    /// Live venues past their own tentative finish time.
    pub live_behind_schedule: usize,
}

/// The venue projected to finish last across the whole event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastToFinish {
    pub venue: String,
    pub item: String,
    pub tentative_finish: NaiveDateTime,
}

/// Full audit output for one pass. Fully serializable and acyclic; the
/// engine makes no formatting or layout decisions beyond these fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// False when the upstream feed was unavailable and the engine was handed
    /// an empty venue list. Distinct from a clean, fully-monitored report.
    pub data_available: bool,
    pub generated_at: NaiveDateTime,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_to_finish: Option<LastToFinish>,
    /// Venues holding at least one anomaly, feed order; scheduled venues
    /// absent from the feed (gap-only) follow in schedule order.
    pub venues: Vec<VenueFindings>,
}

impl AuditReport {
    /// Report for the UpstreamUnavailable case: no venue data this poll.
    pub fn no_data(now: NaiveDateTime) -> Self {
        Self {
            data_available: false,
            generated_at: now,
            summary: Summary::default(),
            last_to_finish: None,
            venues: Vec::new(),
        }
    }

    /// True when data was available and no anomaly fired anywhere.
    pub fn is_clean(&self) -> bool {
        self.data_available && self.venues.is_empty()
    }
}
