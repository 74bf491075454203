use std::collections::HashMap;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sha2::{Digest, Sha256};
use crate::config::PlannerPolicy;
use crate::curriculum::{self, DayType, Subject};
use crate::error::Result;
use crate::profile::{Field, Level};
use crate::resources::{CatalogLookup, ResourceCatalog};
use super::slots::{allocate_slots, resolve_session_duration, SlotAllocation};
use super::types::{DayPlan, GenerateParams, PlanMeta, StudyBlock, WeekPlanResult};
use super::validator::{validate_plan, DAYS_PER_WEEK};

const QUICK_SESSION_MINUTES: u32 = 90;
const FOCUS_PRIORITY: u8 = 5;
const DEFAULT_PRIORITY: u8 = 3;
const FALLBACK_TOPIC: &str = "General review";

/// A way of turning a request into a week plan.
pub trait PlanStrategy {
    fn name(&self) -> &str;
    fn generate(&self, params: &GenerateParams, generated_at: DateTime<Utc>) -> Result<WeekPlanResult>;
}

/// Run a strategy and log the outcome.
pub fn generate_with_strategy(
    strategy: &dyn PlanStrategy,
    params: &GenerateParams,
    generated_at: DateTime<Utc>,
) -> Result<WeekPlanResult> {
    let plan = strategy.generate(params, generated_at)?;
    tracing::info!(
        strategy = strategy.name(),
        field = %params.field,
        level = %params.level,
        blocks = plan.block_count(),
        warnings = plan.warnings.len(),
        "Generated weekly plan"
    );
    Ok(plan)
}

/// Day type and rest flag for each of the 7 days.
/// The first `min(active, 6)` days alternate Track-A/Track-B, a 7th active day is Review.
pub fn day_types(active_days: u32) -> Vec<(DayType, bool)> {
    let alternating = active_days.min(6) as usize;
    (0..DAYS_PER_WEEK)
        .map(|i| {
            if i < alternating {
                let day_type = if i % 2 == 0 { DayType::TrackA } else { DayType::TrackB };
                (day_type, false)
            } else if i == DAYS_PER_WEEK - 1 && active_days >= 7 {
                (DayType::Review, false)
            } else {
                (DayType::Review, true)
            }
        })
        .collect()
}

/// Deterministic block id: first 12 hex chars of SHA-256 over its coordinates.
pub fn block_id(week_start: NaiveDate, day_index: usize, slot_index: usize, subject: Subject) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}|{}|{}|{}", week_start, day_index, slot_index, subject.id()).as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}

/// A subject is in focus when any focus entry mentions its name.
pub fn is_focus(subject: Subject, focus_topics: &[String]) -> bool {
    let name = subject.name().to_ascii_lowercase();
    focus_topics.iter().any(|t| t.to_ascii_lowercase().contains(&name))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-week cursors so topics and resources rotate across days.
#[derive(Default)]
struct Rotation {
    topics: HashMap<Subject, usize>,
    resources: HashMap<Subject, usize>,
    lookups: HashMap<Subject, CatalogLookup>,
}

/// Rule-based weekly schedule construction.
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    policy: PlannerPolicy,
    catalog: ResourceCatalog,
}

impl ScheduleBuilder {
    pub fn new(policy: PlannerPolicy) -> Self {
        let catalog = ResourceCatalog::new(policy.resources.drill_periods.clone());
        ScheduleBuilder { policy, catalog }
    }

    pub fn policy(&self) -> &PlannerPolicy {
        &self.policy
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// Plan with default options and 90 minute sessions.
    pub fn quick_plan(
        &self,
        field: Field,
        level: Level,
        study_days_per_week: u32,
        generated_at: DateTime<Utc>,
    ) -> Result<WeekPlanResult> {
        let params = GenerateParams::new(field, level, study_days_per_week)
            .with_session_duration(QUICK_SESSION_MINUTES);
        self.build(&params, generated_at)
    }

    pub fn build(&self, params: &GenerateParams, generated_at: DateTime<Utc>) -> Result<WeekPlanResult> {
        let mut warnings = Vec::new();
        let schedule = &self.policy.schedule;

        let study_days = params.study_days_per_week.clamp(1, DAYS_PER_WEEK as u32);
        if study_days != params.study_days_per_week {
            tracing::warn!(requested = params.study_days_per_week, used = study_days, "Study days out of range");
            warnings.push(format!(
                "Study days per week must be between 1 and 7; using {}",
                study_days
            ));
        }

        let (session_minutes, duration_warning) =
            resolve_session_duration(params.session_duration_minutes, schedule);
        if let Some(w) = duration_warning {
            tracing::warn!(requested = ?params.session_duration_minutes, used = session_minutes, "Session duration out of range");
            warnings.push(w);
        }

        let slot_count = match params.slots_per_day {
            Some(0) => {
                warnings.push("At least one slot per day is required; using 1".to_string());
                1
            }
            Some(n) => n,
            None => schedule.slots_per_day,
        };
        let allocation = allocate_slots(session_minutes, slot_count, schedule);
        warnings.extend(allocation.warnings.iter().cloned());

        if study_days < 4 {
            warnings.push("Few study days: not every subject can be covered this week".to_string());
        }
        if study_days <= 5 {
            warnings.push(format!(
                "{} study days may be insufficient for full exam preparation",
                study_days
            ));
        }

        let week_start = params.week_start_date.unwrap_or_else(|| generated_at.date_naive());
        let mut rotation = Rotation::default();
        let mut days = Vec::with_capacity(DAYS_PER_WEEK);

        for (index, (day_type, rest)) in day_types(study_days).into_iter().enumerate() {
            let date = week_start + Duration::days(index as i64);
            let day_label = date.format("%A").to_string();
            let mut notes = Vec::new();

            let blocks = if rest {
                notes.push("Rest day".to_string());
                Vec::new()
            } else {
                if day_type == DayType::Review {
                    notes.push("Review day".to_string());
                }
                self.fill_day(params, week_start, index, &day_label, day_type, &allocation, &mut rotation, &mut warnings)
            };

            let total_minutes = blocks.iter().map(|b| b.duration_minutes).sum();
            days.push(DayPlan {
                day_label,
                date,
                day_type,
                rest,
                blocks,
                total_minutes,
                notes,
            });
        }

        if let Some(target) = params.target_date {
            let remaining = (target - week_start).num_days();
            if remaining < 0 {
                warnings.push(format!("Target date {} is already past", target));
            } else if remaining <= self.policy.adaptation.exam_countdown_days {
                if let Some(first) = days.first_mut() {
                    first.notes.push(format!("{} days until the exam", remaining));
                }
            }
        }

        let total_minutes: u32 = days.iter().map(|d| d.total_minutes).sum();
        let active = days.iter().filter(|d| !d.blocks.is_empty()).count();
        let total_hours = total_minutes as f64 / 60.0;
        let meta = PlanMeta {
            generated_at,
            week_start_date: week_start,
            total_study_hours: round2(total_hours),
            average_hours_per_day: if active == 0 { 0.0 } else { round2(total_hours / active as f64) },
            session_duration_minutes: allocation.duration_minutes,
            study_days,
            strategy: self.name().to_string(),
        };

        let resources = self.catalog.suggestions_for_field(
            params.field,
            params.level,
            params.period.as_deref(),
            &params.exclude_subjects,
        );

        let mut plan = WeekPlanResult { days, resources, warnings, meta };
        let advisories = validate_plan(&plan, &self.policy.validation).into_result()?;
        plan.warnings.extend(advisories);
        Ok(plan)
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_day(
        &self,
        params: &GenerateParams,
        week_start: NaiveDate,
        day_index: usize,
        day_label: &str,
        day_type: DayType,
        allocation: &SlotAllocation,
        rotation: &mut Rotation,
        warnings: &mut Vec<String>,
    ) -> Vec<StudyBlock> {
        let mut table: Vec<(Subject, u32)> = curriculum::distribution(params.field, day_type)
            .into_iter()
            .filter(|(s, _)| !params.exclude_subjects.contains(s))
            .collect();
        if table.is_empty() {
            warnings.push(format!("{} has no subjects left after exclusions", day_label));
            return Vec::new();
        }
        // Stable: focus subjects first, table order otherwise
        table.sort_by_key(|(s, _)| !is_focus(*s, &params.focus_topics));

        let mut slots = allocation.slots.iter().enumerate();
        let mut blocks = Vec::new();
        let mut dropped = 0;

        for (subject, count) in table {
            let focus = is_focus(subject, &params.focus_topics);
            for _ in 0..count {
                let Some((slot_index, slot)) = slots.next() else {
                    dropped += 1;
                    continue;
                };
                blocks.push(StudyBlock {
                    id: block_id(week_start, day_index, slot_index, subject),
                    time: slot.label(),
                    subject,
                    topic: self.next_topic(subject, params.level, rotation),
                    resource: self.next_resource(subject, params, rotation, warnings),
                    duration_minutes: allocation.duration_minutes,
                    difficulty: params
                        .difficulty_overrides
                        .get(&subject)
                        .copied()
                        .unwrap_or_else(|| params.level.default_difficulty()),
                    priority: if focus { FOCUS_PRIORITY } else { DEFAULT_PRIORITY },
                    done: false,
                });
            }
        }

        if dropped > 0 {
            warnings.push(format!(
                "{}: {} blocks did not fit into {} slots",
                day_label,
                dropped,
                allocation.slots.len()
            ));
        }
        blocks
    }

    fn next_topic(&self, subject: Subject, level: Level, rotation: &mut Rotation) -> String {
        let topics = subject.topics(level);
        if topics.is_empty() {
            return FALLBACK_TOPIC.to_string();
        }
        let cursor = rotation.topics.entry(subject).or_insert(0);
        let topic = topics[*cursor % topics.len()];
        *cursor += 1;
        topic.to_string()
    }

    fn next_resource(
        &self,
        subject: Subject,
        params: &GenerateParams,
        rotation: &mut Rotation,
        warnings: &mut Vec<String>,
    ) -> String {
        let lookup = rotation.lookups.entry(subject).or_insert_with(|| {
            let lookup = self.catalog.lookup(subject, params.level, params.period.as_deref());
            if lookup.degraded {
                tracing::warn!(subject = %subject, "Using generic resources");
                warnings.push(format!("No curated resources for {}; generic suggestions used", subject));
            }
            lookup
        });
        let cursor = rotation.resources.entry(subject).or_insert(0);
        let title = lookup
            .suggestions
            .get(*cursor % lookup.suggestions.len().max(1))
            .map(|r| r.title.clone())
            .unwrap_or_else(|| format!("{} notes", subject));
        *cursor += 1;
        title
    }
}

impl PlanStrategy for ScheduleBuilder {
    fn name(&self) -> &str {
        "rule-based"
    }

    fn generate(&self, params: &GenerateParams, generated_at: DateTime<Utc>) -> Result<WeekPlanResult> {
        self.build(params, generated_at)
    }
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        ScheduleBuilder::new(PlannerPolicy::default())
    }
}
