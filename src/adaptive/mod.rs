//! Performance-driven adaptation: focus areas, difficulty bias, regeneration
//! decisions and the emergency plan.

pub mod analysis;
pub mod emergency;
pub mod motivation;
pub mod targets;

use std::collections::BTreeMap;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::config::PlannerPolicy;
use crate::curriculum::{self, Subject};
use crate::error::Result;
use crate::performance::PerformanceStore;
use crate::profile::{Difficulty, UserProfile};
use crate::schedule::{generate_with_strategy, GenerateParams, ScheduleBuilder, WeekPlanResult};

pub use analysis::{PerformanceInsights, PerformanceTier, Rating};
pub use motivation::MotivationCategory;
pub use targets::{AdaptationReason, BlockTarget};

/// Weak topics considered when choosing focus areas
const FOCUS_WEAK_LIMIT: usize = 10;
/// Subject success assumed before any practice
const UNKNOWN_SUBJECT_RATE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    Standard,
    Emergency,
}

/// A week plan with the reasoning that shaped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptivePlan {
    pub user_id: String,
    pub generated_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    /// Number of plans generated for this profile so far
    pub adaptation_level: u32,
    pub mode: PlanMode,
    pub plan: WeekPlanResult,
    pub focus_areas: Vec<String>,
    pub adaptation_notes: Vec<String>,
    /// One message per day
    pub motivation: Vec<String>,
    /// Question goal and reason per block, in plan order
    pub block_targets: Vec<BlockTarget>,
    pub insights: PerformanceInsights,
}

impl AdaptivePlan {
    pub fn is_current(&self, at: DateTime<Utc>) -> bool {
        at < self.valid_until
    }

    pub fn age(&self, at: DateTime<Utc>) -> Duration {
        at - self.generated_at
    }

    pub fn target_for(&self, block_id: &str) -> Option<&BlockTarget> {
        self.block_targets.iter().find(|t| t.block_id == block_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationReason {
    Struggling,
    Mastery,
    NoPlan,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationDecision {
    Reuse,
    Regenerate(RegenerationReason),
}

impl RegenerationDecision {
    pub fn should_regenerate(&self) -> bool {
        matches!(self, RegenerationDecision::Regenerate(_))
    }
}

/// Drives plan generation from a profile and its performance history.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveEngine {
    builder: ScheduleBuilder,
}

impl AdaptiveEngine {
    pub fn new(policy: PlannerPolicy) -> Self {
        AdaptiveEngine {
            builder: ScheduleBuilder::new(policy),
        }
    }

    pub fn builder(&self) -> &ScheduleBuilder {
        &self.builder
    }

    pub fn policy(&self) -> &PlannerPolicy {
        self.builder.policy()
    }

    /// Requested topics, then weak topic names, then the field's basics.
    pub fn focus_areas(&self, profile: &UserProfile, store: &PerformanceStore, requested: &[String]) -> Vec<String> {
        let cap = self.policy().adaptation.focus_area_cap;
        let weak = analysis::weak_topics(store, &self.policy().performance, FOCUS_WEAK_LIMIT);

        let mut areas: Vec<String> = Vec::new();
        let candidates = requested
            .iter()
            .cloned()
            .chain(weak.iter().map(|t| t.topic_name.clone()))
            .chain(curriculum::field_basics(profile.field).iter().map(|s| s.to_string()));
        for candidate in candidates {
            if areas.len() >= cap {
                break;
            }
            if !areas.contains(&candidate) {
                areas.push(candidate);
            }
        }
        areas
    }

    /// Difficulty for one subject given the overall tier.
    pub fn subject_difficulty(&self, store: &PerformanceStore, subject: Subject, tier: PerformanceTier) -> Difficulty {
        let rate = store.subject_success_rate(subject).unwrap_or(UNKNOWN_SUBJECT_RATE);
        if rate < 50.0 || tier == PerformanceTier::NeedsImprovement {
            Difficulty::Easy
        } else if rate < 80.0 || tier == PerformanceTier::Average {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    /// Per-subject difficulty for the profile's curriculum. Empty without any
    /// answered questions, so the level default applies.
    pub fn difficulty_overrides(&self, profile: &UserProfile, store: &PerformanceStore) -> BTreeMap<Subject, Difficulty> {
        let overall = store.overall();
        if overall.total_questions == 0 {
            return BTreeMap::new();
        }
        let tier = PerformanceTier::from_success_rate(overall.success_rate());
        curriculum::curriculum(profile.field)
            .iter()
            .map(|s| (*s, self.subject_difficulty(store, *s, tier)))
            .collect()
    }

    /// Slots per day that fit the profile's daily budget.
    pub fn slots_for_budget(&self, profile: &UserProfile, session_minutes: u32) -> Option<u32> {
        let cap = self.policy().schedule.slots_per_day;
        profile
            .daily_minutes
            .map(|daily| (daily / session_minutes.max(1)).clamp(1, cap))
    }

    /// Decide whether a just-sealed session warrants a new plan.
    pub fn should_regenerate(
        &self,
        answered: u32,
        correct: u32,
        current: Option<&AdaptivePlan>,
        at: DateTime<Utc>,
    ) -> RegenerationDecision {
        let a = &self.policy().adaptation;
        if answered > 0 {
            let accuracy = correct as f64 / answered as f64;
            if accuracy < a.struggling_accuracy {
                return RegenerationDecision::Regenerate(RegenerationReason::Struggling);
            }
            if accuracy > a.mastery_accuracy && answered >= a.mastery_min_questions {
                return RegenerationDecision::Regenerate(RegenerationReason::Mastery);
            }
        }
        match current {
            None => RegenerationDecision::Regenerate(RegenerationReason::NoPlan),
            Some(plan) if plan.age(at) > Duration::hours(a.plan_max_age_hours) => {
                RegenerationDecision::Regenerate(RegenerationReason::Stale)
            }
            Some(_) => RegenerationDecision::Reuse,
        }
    }

    pub fn emergency_warranted(&self, store: &PerformanceStore, as_of: NaiveDate) -> bool {
        emergency::is_warranted(store, self.policy(), as_of)
    }

    /// Schedule request for a profile, biased by its history.
    pub fn params_for(
        &self,
        profile: &UserProfile,
        store: &PerformanceStore,
        requested_focus: &[String],
        week_start: NaiveDate,
    ) -> GenerateParams {
        let session = profile
            .session_duration_minutes
            .unwrap_or(self.policy().schedule.default_session_minutes);
        let mut params = GenerateParams::new(profile.field, profile.level, profile.study_days_per_week)
            .with_week_start(week_start)
            .with_focus(self.focus_areas(profile, store, requested_focus))
            .excluding(profile.exclude_subjects.clone());
        params.session_duration_minutes = profile.session_duration_minutes;
        params.period = profile.period.clone();
        params.target_date = profile.target_date;
        params.slots_per_day = self.slots_for_budget(profile, session);
        params.difficulty_overrides = self.difficulty_overrides(profile, store);
        params
    }

    /// Build a fresh standard plan and refresh the profile's `last_updated`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        profile: &mut UserProfile,
        store: &PerformanceStore,
        previous: Option<&AdaptivePlan>,
        requested_focus: &[String],
        at: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<AdaptivePlan> {
        let today = at.date_naive();
        let insights = analysis::analyze(store, today);
        let params = self.params_for(profile, store, requested_focus, today);
        let plan = generate_with_strategy(&self.builder, &params, at)?;

        let motivation = plan
            .days
            .iter()
            .map(|d| {
                let category = motivation::category_for(insights.tier, insights.trend.trend, d.rest);
                motivation::pick(category, &mut *rng)
            })
            .collect();

        let block_targets = targets::block_targets(&plan, &params.focus_topics, store);

        profile.touch(at);
        let adaptive = AdaptivePlan {
            user_id: profile.id.clone(),
            generated_at: at,
            valid_until: at + Duration::days(self.policy().adaptation.plan_validity_days),
            adaptation_level: previous.map_or(0, |p| p.adaptation_level) + 1,
            mode: PlanMode::Standard,
            focus_areas: params.focus_topics.clone(),
            adaptation_notes: insights.notes.clone(),
            plan,
            motivation,
            block_targets,
            insights,
        };
        tracing::info!(
            user = %adaptive.user_id,
            level = adaptive.adaptation_level,
            focus = adaptive.focus_areas.len(),
            "Adaptive plan generated"
        );
        Ok(adaptive)
    }

    /// Replace the week with the minimal emergency plan.
    pub fn generate_emergency(
        &self,
        profile: &mut UserProfile,
        store: &PerformanceStore,
        previous: Option<&AdaptivePlan>,
        at: DateTime<Utc>,
    ) -> Result<AdaptivePlan> {
        let today = at.date_naive();
        let insights = analysis::analyze(store, today);
        let plan = emergency::emergency_plan(profile, today, at, self.policy(), self.builder.catalog())?;
        let focus: Vec<String> = plan
            .blocks()
            .next()
            .map(|b| format!("{} - {}", b.subject, b.topic))
            .into_iter()
            .collect();
        let block_targets = targets::block_targets(&plan, &focus, store);

        let motivation = plan
            .days
            .iter()
            .map(|d| {
                if d.rest {
                    "Rest today. Small steps add up.".to_string()
                } else {
                    "Just 30 minutes today is enough.".to_string()
                }
            })
            .collect();

        profile.touch(at);
        tracing::warn!(
            user = %profile.id,
            success_rate = insights.success_rate,
            "Emergency mode activated"
        );
        Ok(AdaptivePlan {
            user_id: profile.id.clone(),
            generated_at: at,
            valid_until: at + Duration::days(self.policy().adaptation.plan_validity_days),
            adaptation_level: previous.map_or(0, |p| p.adaptation_level) + 1,
            mode: PlanMode::Emergency,
            focus_areas: focus,
            adaptation_notes: vec![
                "Emergency mode active".to_string(),
                "Plan simplified".to_string(),
                "Focus is on fundamentals".to_string(),
            ],
            plan,
            motivation,
            block_targets,
            insights,
        })
    }
}
