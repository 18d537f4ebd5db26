//! swx-engine
//!
//! StageWatch reconciliation engine: cross-checks one poll of the live venue
//! feed against the static pre-schedule and the published-results set, and
//! produces a structured [`AuditReport`] of logical inconsistencies, delays
//! and schedule drift.
//!
//! Architectural decisions:
//! - Pure deterministic logic. No IO, no wall-clock: the caller captures
//!   "now" exactly once per pass and passes it in.
//! - Stateless across polls: every report is recomputed from scratch, so
//!   identical inputs yield byte-identical reports.
//! - Anomaly emission is the engine's normal output, never an error path.
//!   Malformed per-venue fields are defaulted upstream (swx-feed) and never
//!   abort evaluation of that venue or any other.

mod detector;
mod gaps;
mod matcher;
mod report;
mod schedule;
mod types;

pub use detector::evaluate_venue;
pub use gaps::detect_schedule_gaps;
pub use matcher::{items_match, similarity_ratio};
pub use report::run_audit;
pub use schedule::{parse_time_of_day, resolve_slot, ResolvedSlot, SlotResolution};
pub use types::*;
