use chrono::{NaiveTime, Timelike};
use crate::config::policy::SchedulePolicy;
use super::types::TimeSlot;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Slots for one day plus any range warnings raised while producing them.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotAllocation {
    pub slots: Vec<TimeSlot>,
    /// Session length actually used, after range fallback
    pub duration_minutes: u32,
    pub warnings: Vec<String>,
}

/// Resolve the session length, falling back to the policy default when the
/// request is missing or outside the allowed range.
pub fn resolve_session_duration(requested: Option<u32>, policy: &SchedulePolicy) -> (u32, Option<String>) {
    match requested {
        None => (policy.default_session_minutes, None),
        Some(m) if m >= policy.min_session_minutes && m <= policy.max_session_minutes => (m, None),
        Some(m) => (
            policy.default_session_minutes,
            Some(format!(
                "Session duration {} min is outside {}-{} min; using {} min",
                m, policy.min_session_minutes, policy.max_session_minutes, policy.default_session_minutes
            )),
        ),
    }
}

/// Lay out `count` equal sessions from the anchor, separated by the policy gap.
/// Slots that would run past midnight are not produced.
pub fn allocate_slots(session_minutes: u32, count: u32, policy: &SchedulePolicy) -> SlotAllocation {
    let (duration, range_warning) = resolve_session_duration(Some(session_minutes), policy);
    let mut warnings: Vec<String> = range_warning.into_iter().collect();

    let anchor = policy.slot_anchor.hour() * 60 + policy.slot_anchor.minute();
    let stride = duration + policy.slot_gap_minutes;
    let mut slots = Vec::with_capacity(count as usize);

    for i in 0..count {
        let start = anchor + i * stride;
        let end = start + duration;
        if end >= MINUTES_PER_DAY {
            warnings.push(format!(
                "Only {} of {} slots fit before midnight; the rest were dropped",
                i, count
            ));
            break;
        }
        slots.push(TimeSlot {
            start: minute_of_day(start),
            end: minute_of_day(end),
        });
    }

    tracing::debug!(duration, requested = count, produced = slots.len(), "Allocated time slots");
    SlotAllocation { slots, duration_minutes: duration, warnings }
}

fn minute_of_day(minutes: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
}
