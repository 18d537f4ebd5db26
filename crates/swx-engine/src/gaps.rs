//! Schedule-gap detector: cross-venue check that every schedule-predicted
//! "currently active" item is actually present somewhere in the live feed.
//!
//! Independent of the per-venue ScheduleMismatch rule — that one flags the
//! wrong item being shown, this one flags no item being shown at all. Both
//! may fire for the same venue.

use chrono::NaiveDateTime;

use crate::matcher::items_match;
use crate::schedule::resolve_slot;
use crate::types::{Anomaly, AnomalyKind, Schedule, Severity, Thresholds, VenueSnapshot};

/// Emit one ScheduleGap per scheduled venue whose active expected item has no
/// similar item name in any of that venue's feed snapshots. Venue order is
/// the schedule map order, so output is deterministic.
pub fn detect_schedule_gaps(
    thresholds: &Thresholds,
    schedule: &Schedule,
    snapshots: &[VenueSnapshot],
    now: NaiveDateTime,
) -> Vec<Anomaly> {
    let mut gaps = Vec::new();
    for (venue, slots) in schedule.iter() {
        let resolution = resolve_slot(slots, now);
        let Some(active) = resolution.active else {
            continue;
        };
        let present = snapshots
            .iter()
            .filter(|s| s.venue == *venue)
            .any(|s| items_match(&active.item, &s.item_name, thresholds.similarity));
        if !present {
            gaps.push(Anomaly::new(
                AnomalyKind::ScheduleGap,
                Severity::Warning,
                venue,
                format!(
                    "'{}' should be running since {} but is absent from the live feed",
                    active.item,
                    active.at.format("%H:%M")
                ),
            ));
        }
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScheduleSlot;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap()
    }

    fn snap(venue: &str, item_name: &str) -> VenueSnapshot {
        VenueSnapshot {
            venue: venue.to_string(),
            location: "East Lawn".to_string(),
            is_live: true,
            item_code: "100".to_string(),
            item_name: item_name.to_string(),
            participants_total: 8,
            participants_completed: 2,
            tabulation_finished: false,
            tentative_finish: now() + Duration::hours(1),
        }
    }

    fn schedule_with(venue: &str, item: &str, time: &str) -> Schedule {
        let mut schedule = Schedule::new();
        schedule.add_slot(venue, ScheduleSlot::new(item, time));
        schedule
    }

    #[test]
    fn gap_fires_when_scheduled_venue_missing_from_feed() {
        let schedule = schedule_with("Stage 1", "Koodiyattam", "09:30");
        let gaps = detect_schedule_gaps(&Thresholds::default(), &schedule, &[], now());
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].kind, AnomalyKind::ScheduleGap);
        assert_eq!(gaps[0].venue, "Stage 1");
    }

    #[test]
    fn gap_fires_when_venue_present_with_dissimilar_item() {
        let schedule = schedule_with("Stage 1", "Koodiyattam", "09:30");
        let feed = vec![snap("Stage 1", "Band Melam")];
        let gaps = detect_schedule_gaps(&Thresholds::default(), &schedule, &feed, now());
        assert_eq!(gaps.len(), 1);
    }

    #[test]
    fn no_gap_when_similar_item_is_on_feed() {
        let schedule = schedule_with("Stage 1", "Koodiyattam", "09:30");
        let feed = vec![snap("Stage 1", "Koodiyattam (Girls)")];
        let gaps = detect_schedule_gaps(&Thresholds::default(), &schedule, &feed, now());
        assert!(gaps.is_empty());
    }

    #[test]
    fn no_gap_before_first_slot() {
        let schedule = schedule_with("Stage 1", "Koodiyattam", "14:00");
        let gaps = detect_schedule_gaps(&Thresholds::default(), &schedule, &[], now());
        assert!(gaps.is_empty());
    }

    #[test]
    fn gaps_come_out_in_schedule_order() {
        let mut schedule = Schedule::new();
        schedule.add_slot("Stage 2", ScheduleSlot::new("Oppana", "09:30"));
        schedule.add_slot("Stage 1", ScheduleSlot::new("Kathakali", "09:30"));
        let gaps = detect_schedule_gaps(&Thresholds::default(), &schedule, &[], now());
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].venue, "Stage 1");
        assert_eq!(gaps[1].venue, "Stage 2");
    }

    #[test]
    fn only_snapshots_for_the_same_venue_count() {
        // The expected item is on the feed, but under a different venue id.
        let schedule = schedule_with("Stage 1", "Koodiyattam", "09:30");
        let feed = vec![snap("Stage 2", "Koodiyattam")];
        let gaps = detect_schedule_gaps(&Thresholds::default(), &schedule, &feed, now());
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].venue, "Stage 1");
    }
}
