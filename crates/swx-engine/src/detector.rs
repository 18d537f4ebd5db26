//! Per-venue anomaly detector.
//!
//! Pure function of one snapshot, its resolved schedule context, the
//! published-code set and "now". Rules are evaluated independently and in a
//! fixed order so report ordering is deterministic; a venue may accumulate
//! several anomalies and no rule short-circuits a later one.

use chrono::NaiveDateTime;

use crate::matcher::items_match;
use crate::schedule::SlotResolution;
use crate::types::{Anomaly, AnomalyKind, PublishedCodes, Severity, Thresholds, VenueSnapshot};

/// Evaluate every rule against one venue snapshot.
///
/// `slot` is the resolved schedule context for this venue, or `None` when the
/// pre-schedule has no entry for it (schedule rules are then skipped).
pub fn evaluate_venue(
    thresholds: &Thresholds,
    snap: &VenueSnapshot,
    slot: Option<&SlotResolution>,
    published: &PublishedCodes,
    now: NaiveDateTime,
) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();
    let pending = snap.pending();
    let overdue = now > snap.tentative_finish;
    // Lag is only meaningful once the projection has passed; num_minutes
    // truncates toward zero, which is floor for a non-negative delta.
    let lag_minutes = if snap.tentative_finish <= now {
        (now - snap.tentative_finish).num_minutes()
    } else {
        0
    };

    // 1. Publish conflict: result public while the venue is still live.
    if snap.is_live && published.contains(&snap.item_code) {
        anomalies.push(Anomaly::new(
            AnomalyKind::PublishConflict,
            Severity::Critical,
            &snap.venue,
            format!(
                "item [{}] is live but its result is already published",
                snap.item_code
            ),
        ));
    }

    // 2. Data integrity: impossible counter state.
    if snap.participants_completed > snap.participants_total {
        anomalies.push(
            Anomaly::new(
                AnomalyKind::CompletedExceedsTotal,
                Severity::Critical,
                &snap.venue,
                format!(
                    "completed ({}) exceeds total ({})",
                    snap.participants_completed, snap.participants_total
                ),
            )
            .with_pending(pending),
        );
    }

    // 3. Zombie live: nothing left to perform but still marked live.
    if snap.is_live && pending <= 0 {
        anomalies.push(Anomaly::new(
            AnomalyKind::ZombieLive,
            Severity::Critical,
            &snap.venue,
            "venue is live with zero pending performers".to_string(),
        ));
    }

    // 4. Stalled inactive: pending performers but the venue is not live.
    //    Critical once the venue's own projection has passed.
    if pending > 0 && !snap.is_live {
        let (severity, message) = if overdue {
            (
                Severity::Critical,
                format!("venue inactive and overdue by {} min", lag_minutes),
            )
        } else {
            (
                Severity::Warning,
                format!("venue inactive with {} performers pending", pending),
            )
        };
        anomalies.push(
            Anomaly::new(AnomalyKind::StalledInactive, severity, &snap.venue, message)
                .with_pending(pending),
        );
    }

    // 5. Tabulation mismatch: marked finished with performers pending.
    if snap.tabulation_finished && pending > 0 {
        anomalies.push(
            Anomaly::new(
                AnomalyKind::TabulationMismatch,
                Severity::Critical,
                &snap.venue,
                format!("tabulation finished but {} performers waiting", pending),
            )
            .with_pending(pending),
        );
    }

    // 6. Time lag: live venue behind its own projection. Grace period
    //    separates warning from critical.
    if snap.is_live && overdue {
        let (severity, message) = if lag_minutes > thresholds.grace_minutes {
            (
                Severity::Critical,
                format!("running {} min behind projection", lag_minutes),
            )
        } else {
            (
                Severity::Warning,
                format!("lagging {} min behind projection", lag_minutes),
            )
        };
        anomalies.push(
            Anomaly::new(AnomalyKind::TimeLag, severity, &snap.venue, message)
                .with_lag(lag_minutes),
        );
    }

    // 7. Schedule mismatch: the pre-schedule expects an item right now and
    //    the feed shows something else. Escalates when the venue is live.
    if let Some(active) = slot.and_then(|s| s.active.as_ref()) {
        if !items_match(&active.item, &snap.item_name, thresholds.similarity) {
            let severity = if snap.is_live {
                Severity::Critical
            } else {
                Severity::Warning
            };
            anomalies.push(Anomaly::new(
                AnomalyKind::ScheduleMismatch,
                severity,
                &snap.venue,
                format!(
                    "schedule expects '{}' but feed shows '{}'",
                    active.item, snap.item_name
                ),
            ));
        }
    }

    anomalies
}
