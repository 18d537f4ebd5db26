//! Slot resolver: maps a venue's declared schedule onto "now".
//!
//! Slots may be declared out of time order and with unparseable time strings;
//! the resolver sorts and discards non-fatally. Pure logic, no wall clock.

use chrono::{NaiveDateTime, NaiveTime};

use crate::types::ScheduleSlot;

/// A schedule slot anchored to a concrete timestamp on the current date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSlot {
    pub item: String,
    pub code: Option<String>,
    pub at: NaiveDateTime,
}

/// Outcome of resolving one venue's schedule at a point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotResolution {
    /// The slot currently in effect, or none before the first slot.
    pub active: Option<ResolvedSlot>,
    /// The slot after the active one (the first slot when nothing is active).
    pub next: Option<ResolvedSlot>,
    /// True when some slot's start time has been reached.
    pub in_slot: bool,
}

/// Parse a declared time-of-day. Accepts "HH:MM" and the feed's legacy
/// "HH MM" spelling.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let cleaned = s.trim().replace(' ', ":");
    NaiveTime::parse_from_str(&cleaned, "%H:%M").ok()
}

/// Resolve the active and next slots for one venue at `now`.
///
/// Entries with unparseable times are discarded. The remainder are anchored
/// to `now`'s date and sorted ascending (stable, so ties keep declaration
/// order). The scan overwrites a running "active" pointer for every slot at
/// or before `now`; at identical timestamps the later-declared entry
/// therefore wins.
pub fn resolve_slot(slots: &[ScheduleSlot], now: NaiveDateTime) -> SlotResolution {
    let date = now.date();
    let mut timed: Vec<ResolvedSlot> = slots
        .iter()
        .filter_map(|s| {
            parse_time_of_day(&s.time).map(|t| ResolvedSlot {
                item: s.item.clone(),
                code: s.code.clone(),
                at: date.and_time(t),
            })
        })
        .collect();
    timed.sort_by_key(|s| s.at);

    let mut active_idx: Option<usize> = None;
    for (i, slot) in timed.iter().enumerate() {
        if slot.at <= now {
            active_idx = Some(i);
        }
    }

    match active_idx {
        Some(i) => SlotResolution {
            active: Some(timed[i].clone()),
            next: timed.get(i + 1).cloned(),
            in_slot: true,
        },
        None => SlotResolution {
            active: None,
            next: timed.first().cloned(),
            in_slot: false,
        },
    }
}
