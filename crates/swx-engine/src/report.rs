//! Report assembler: one pass over the venue list combining the per-venue
//! detector, the schedule-gap pass, summary counters and the last-to-finish
//! projection into a single [`AuditReport`].

use chrono::NaiveDateTime;

use crate::detector::evaluate_venue;
use crate::gaps::detect_schedule_gaps;
use crate::schedule::resolve_slot;
use crate::types::{
    AuditReport, LastToFinish, PublishedCodes, Schedule, Summary, Thresholds, VenueFindings,
    VenueSnapshot,
};

/// Run one full audit pass.
///
/// `now` must be captured once by the caller and reused for every rule so no
/// two rules observe different clocks within one report. An empty snapshot
/// list means the upstream feed was unavailable and yields an explicit
/// no-data report, distinct from a clean one.
pub fn run_audit(
    thresholds: &Thresholds,
    schedule: &Schedule,
    snapshots: &[VenueSnapshot],
    published: &PublishedCodes,
    now: NaiveDateTime,
) -> AuditReport {
    if snapshots.is_empty() {
        return AuditReport::no_data(now);
    }

    let mut summary = Summary {
        total_venues: snapshots.len(),
        ..Summary::default()
    };
    let mut last: Option<&VenueSnapshot> = None;

    for snap in snapshots {
        if snap.is_live {
            summary.live += 1;
            if now > snap.tentative_finish {
                summary.live_behind_schedule += 1;
            }
        } else {
            summary.inactive += 1;
        }
        if snap.tabulation_finished {
            summary.finished += 1;
        }
        summary.participants_total += u64::from(snap.participants_total);
        summary.participants_completed += u64::from(snap.participants_completed);

        // Strict > keeps the earliest feed-order venue on ties.
        if last.map_or(true, |l| snap.tentative_finish > l.tentative_finish) {
            last = Some(snap);
        }
    }

    summary.progress_pct = if summary.participants_total == 0 {
        0
    } else {
        100 * summary.participants_completed / summary.participants_total
    };

    let last_to_finish = last.map(|snap| LastToFinish {
        venue: snap.venue.clone(),
        item: snap.item_name.clone(),
        tentative_finish: snap.tentative_finish,
    });

    let gap_anomalies = detect_schedule_gaps(thresholds, schedule, snapshots, now);

    // Per-venue groups in feed order; each group carries that venue's rule
    // anomalies followed by its schedule gap, if any.
    let mut venues: Vec<VenueFindings> = Vec::new();
    for snap in snapshots {
        let resolution = schedule
            .slots_for(&snap.venue)
            .map(|slots| resolve_slot(slots, now));
        let mut anomalies =
            evaluate_venue(thresholds, snap, resolution.as_ref(), published, now);
        anomalies.extend(
            gap_anomalies
                .iter()
                .filter(|a| a.venue == snap.venue)
                .cloned(),
        );
        if !anomalies.is_empty() {
            venues.push(VenueFindings {
                venue: snap.venue.clone(),
                location: snap.location.clone(),
                pending: snap.pending(),
                anomalies,
            });
        }
    }

    // Scheduled venues absent from the feed entirely: gap-only groups,
    // appended in schedule order.
    for gap in &gap_anomalies {
        if !snapshots.iter().any(|s| s.venue == gap.venue) {
            venues.push(VenueFindings {
                venue: gap.venue.clone(),
                location: String::new(),
                pending: 0,
                anomalies: vec![gap.clone()],
            });
        }
    }

    AuditReport {
        data_available: true,
        generated_at: now,
        summary,
        last_to_finish,
        venues,
    }
}
