//! swx-feed
//!
//! Normalization layer between the already-fetched upstream documents and the
//! engine's data model. Fetching, retry and caching stay with the caller;
//! this crate only decodes and defaults.
//!
//! Error policy (single-venue field failures never abort the poll):
//! - unparseable tentative finish time -> substituted with "now"
//! - missing or negative counts -> zero
//! - a wholly unreadable snapshot document is the caller's cue to hand the
//!   engine an empty venue list (explicit no-data report)

mod codes;
mod normalizer;

pub use codes::parse_published_codes;
pub use normalizer::{normalize_records, parse_snapshot_json, CodeField, RawVenueRecord};
