use std::collections::BTreeMap;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use crate::config::PlannerPolicy;
use crate::curriculum::{self, DayType};
use crate::error::Result;
use crate::performance::PerformanceStore;
use crate::profile::{Difficulty, Level, UserProfile};
use crate::resources::ResourceCatalog;
use crate::schedule::builder::block_id;
use crate::schedule::validator::DAYS_PER_WEEK;
use crate::schedule::{validate_plan, DayPlan, PlanMeta, StudyBlock, TimeSlot, WeekPlanResult};

pub const EMERGENCY_BLOCK_MINUTES: u32 = 30;
const WEEKDAYS: usize = 5;

/// Sustained low accuracy: lifetime and this week's accuracy both under the
/// emergency rate, with enough questions answered to trust it.
pub fn is_warranted(store: &PerformanceStore, policy: &PlannerPolicy, as_of: NaiveDate) -> bool {
    let overall = store.overall();
    let a = &policy.adaptation;
    overall.total_questions >= a.emergency_min_questions
        && overall.success_rate() < a.emergency_success_rate
        && store.weekly_report(as_of).average_accuracy < a.emergency_success_rate
}

/// Minimal week: one easy 30 minute block on each weekday, a rest day and a
/// short review on day 7. Uses the first review anchor the profile has not
/// excluded; with both excluded the week has no blocks.
pub fn emergency_plan(
    profile: &UserProfile,
    week_start: NaiveDate,
    generated_at: DateTime<Utc>,
    policy: &PlannerPolicy,
    catalog: &ResourceCatalog,
) -> Result<WeekPlanResult> {
    let period = profile.period.as_deref();
    let subject = curriculum::anchors(profile.field)
        .into_iter()
        .find(|s| !profile.exclude_subjects.contains(s));
    let mut warnings = vec!["Emergency mode: the plan was reduced to short daily sessions".to_string()];
    if subject.is_none() {
        warnings.push("Every review anchor is excluded; the emergency week has no blocks".to_string());
    }

    let slot = TimeSlot {
        start: policy.schedule.slot_anchor,
        end: policy
            .schedule
            .slot_anchor
            .overflowing_add_signed(Duration::minutes(EMERGENCY_BLOCK_MINUTES as i64))
            .0,
    };
    let lookup = subject.map(|s| catalog.lookup(s, Level::Beginner, period));
    if lookup.as_ref().map_or(false, |l| l.degraded) {
        if let Some(s) = subject {
            warnings.push(format!("No curated resources for {}; generic suggestions used", s));
        }
    }

    let block = |day_index: usize, topic: &str| {
        subject.map(|subject| StudyBlock {
            id: block_id(week_start, day_index, 0, subject),
            time: slot.label(),
            subject,
            topic: topic.to_string(),
            resource: lookup
                .as_ref()
                .and_then(|l| l.suggestions.first())
                .map(|r| r.title.clone())
                .unwrap_or_else(|| format!("{} notes", subject)),
            duration_minutes: EMERGENCY_BLOCK_MINUTES,
            difficulty: Difficulty::Easy,
            priority: 5,
            done: false,
        })
    };
    let basics = subject
        .and_then(|s| s.topics(Level::Beginner).first().copied())
        .unwrap_or("Basics");

    let mut days = Vec::with_capacity(DAYS_PER_WEEK);
    for index in 0..DAYS_PER_WEEK {
        let date = week_start + Duration::days(index as i64);
        let (day_type, rest, blocks, note) = if index < WEEKDAYS {
            (DayType::TrackA, false, block(index, basics), "Only 30 minutes today, and that is enough")
        } else if index == DAYS_PER_WEEK - 1 {
            (DayType::Review, false, block(index, "Weekly review"), "Look back over the week")
        } else {
            (DayType::Review, true, None, "Rest day")
        };
        let blocks: Vec<StudyBlock> = blocks.into_iter().collect();
        let total_minutes = blocks.iter().map(|b| b.duration_minutes).sum();
        days.push(DayPlan {
            day_label: date.format("%A").to_string(),
            date,
            day_type,
            rest,
            blocks,
            total_minutes,
            notes: vec![note.to_string()],
        });
    }

    let total_minutes: u32 = days.iter().map(|d| d.total_minutes).sum();
    let active = days.iter().filter(|d| !d.blocks.is_empty()).count();
    let mut resources = BTreeMap::new();
    if let (Some(subject), Some(lookup)) = (subject, lookup) {
        resources.insert(subject.name().to_string(), lookup.suggestions);
    }

    let mut plan = WeekPlanResult {
        days,
        resources,
        warnings,
        meta: PlanMeta {
            generated_at,
            week_start_date: week_start,
            total_study_hours: total_minutes as f64 / 60.0,
            average_hours_per_day: if active == 0 { 0.0 } else { EMERGENCY_BLOCK_MINUTES as f64 / 60.0 },
            session_duration_minutes: EMERGENCY_BLOCK_MINUTES,
            study_days: active as u32,
            strategy: "emergency".to_string(),
        },
    };
    let advisories = validate_plan(&plan, &policy.validation).into_result()?;
    plan.warnings.extend(advisories);
    Ok(plan)
}
