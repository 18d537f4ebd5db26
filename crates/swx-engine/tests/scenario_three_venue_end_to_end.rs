use chrono::{Duration, NaiveDate, NaiveDateTime};
use swx_engine::*;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Three venues in one pass:
/// - A: live with everyone done        -> ZombieLive only
/// - B: inactive, pending, 20 min late -> StalledInactive critical, pending=3
/// - C: on schedule, on time, live     -> nothing
#[test]
fn scenario_three_venues_audit_end_to_end() {
    let mut schedule = Schedule::new();
    schedule.add_slot("Stage C", ScheduleSlot::new("Kathaprasangam", "09:30"));

    let a = VenueSnapshot {
        venue: "Stage A".to_string(),
        location: "North Hall".to_string(),
        is_live: true,
        item_code: "101".to_string(),
        item_name: "Mimicry".to_string(),
        participants_total: 5,
        participants_completed: 5,
        tabulation_finished: false,
        tentative_finish: now() + Duration::hours(1),
    };
    let b = VenueSnapshot {
        venue: "Stage B".to_string(),
        location: "South Hall".to_string(),
        is_live: false,
        item_code: "202".to_string(),
        item_name: "Nadakam".to_string(),
        participants_total: 5,
        participants_completed: 2,
        tabulation_finished: false,
        tentative_finish: now() - Duration::minutes(20),
    };
    let c = VenueSnapshot {
        venue: "Stage C".to_string(),
        location: "Library".to_string(),
        is_live: true,
        item_code: "303".to_string(),
        item_name: "Kathaprasangam".to_string(),
        participants_total: 8,
        participants_completed: 3,
        tabulation_finished: false,
        tentative_finish: now() + Duration::hours(2),
    };

    let report = run_audit(
        &Thresholds::default(),
        &schedule,
        &[a, b, c],
        &PublishedCodes::new(),
        now(),
    );

    assert!(report.data_available);
    assert_eq!(report.summary.total_venues, 3);
    assert_eq!(report.summary.live, 2);
    assert_eq!(report.summary.inactive, 1);
    assert_eq!(report.summary.participants_total, 18);
    assert_eq!(report.summary.participants_completed, 10);
    // floor(100 * 10 / 18) = 55
    assert_eq!(report.summary.progress_pct, 55);
    assert_eq!(report.last_to_finish.as_ref().unwrap().venue, "Stage C");

    // Only A and B carry findings, in feed order.
    assert_eq!(report.venues.len(), 2);

    let group_a = &report.venues[0];
    assert_eq!(group_a.venue, "Stage A");
    assert_eq!(group_a.anomalies.len(), 1);
    assert_eq!(group_a.anomalies[0].kind, AnomalyKind::ZombieLive);

    let group_b = &report.venues[1];
    assert_eq!(group_b.venue, "Stage B");
    assert_eq!(group_b.anomalies.len(), 1);
    assert_eq!(group_b.anomalies[0].kind, AnomalyKind::StalledInactive);
    assert_eq!(group_b.anomalies[0].severity, Severity::Critical);
    assert_eq!(group_b.anomalies[0].pending, Some(3));
}
