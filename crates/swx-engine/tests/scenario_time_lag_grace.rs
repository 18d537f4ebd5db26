use chrono::{Duration, NaiveDate, NaiveDateTime};
use swx_engine::*;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap()
        .and_hms_opt(16, 45, 0)
        .unwrap()
}

fn live_snap(tentative_finish: NaiveDateTime) -> VenueSnapshot {
    VenueSnapshot {
        venue: "Stage 12".to_string(),
        location: "Auditorium".to_string(),
        is_live: true,
        item_code: "512".to_string(),
        item_name: "Kathakali".to_string(),
        participants_total: 12,
        participants_completed: 7,
        tabulation_finished: false,
        tentative_finish,
    }
}

#[test]
fn scenario_fifteen_minutes_late_with_default_grace_is_critical() {
    let snap = live_snap(now() - Duration::minutes(15));
    let report = run_audit(
        &Thresholds::default(),
        &Schedule::new(),
        &[snap],
        &PublishedCodes::new(),
        now(),
    );

    assert_eq!(report.venues.len(), 1);
    let anomalies = &report.venues[0].anomalies;
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].kind, AnomalyKind::TimeLag);
    assert_eq!(anomalies[0].severity, Severity::Critical);
    assert_eq!(anomalies[0].lag_minutes, Some(15));
}

#[test]
fn scenario_lag_within_grace_is_only_a_warning() {
    let snap = live_snap(now() - Duration::minutes(8));
    let report = run_audit(
        &Thresholds::default(),
        &Schedule::new(),
        &[snap],
        &PublishedCodes::new(),
        now(),
    );

    let anomalies = &report.venues[0].anomalies;
    assert_eq!(anomalies[0].kind, AnomalyKind::TimeLag);
    assert_eq!(anomalies[0].severity, Severity::Warning);
    assert_eq!(anomalies[0].lag_minutes, Some(8));
}
