use serde::{Deserialize, Serialize};
use crate::curriculum::Subject;
use crate::performance::PerformanceStore;
use crate::profile::Difficulty;
use crate::schedule::builder::is_focus;
use crate::schedule::WeekPlanResult;

/// Never ask for fewer questions than this in one block.
pub const MIN_QUESTIONS: u32 = 5;

/// Why a block looks the way it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationReason {
    FocusArea,
    LowSuccess,
    StrongArea,
}

impl AdaptationReason {
    pub fn message(&self) -> &'static str {
        match self {
            AdaptationReason::FocusArea => "Part of your focus areas",
            AdaptationReason::LowSuccess => "Low success rate, intensive practice",
            AdaptationReason::StrongArea => "Strong area, consolidation",
        }
    }
}

/// Question goal and reason for one block of an adaptive plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTarget {
    pub block_id: String,
    pub question_count: u32,
    pub reason: Option<AdaptationReason>,
}

fn minutes_per_question(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 1.5,
        Difficulty::Medium => 2.0,
        Difficulty::Hard => 2.5,
    }
}

pub fn question_count(minutes: u32, difficulty: Difficulty) -> u32 {
    ((minutes as f64 / minutes_per_question(difficulty)).floor() as u32).max(MIN_QUESTIONS)
}

/// Focus wins; otherwise the subject's success rate (or the overall one when
/// the subject was never practised) decides. No history, no reason.
pub fn reason_for(subject: Subject, focus_areas: &[String], store: &PerformanceStore) -> Option<AdaptationReason> {
    if is_focus(subject, focus_areas) {
        return Some(AdaptationReason::FocusArea);
    }
    let overall = store.overall();
    let rate = store
        .subject_success_rate(subject)
        .or_else(|| (overall.total_questions > 0).then(|| overall.success_rate()))?;
    if rate < 50.0 {
        Some(AdaptationReason::LowSuccess)
    } else if rate > 85.0 {
        Some(AdaptationReason::StrongArea)
    } else {
        None
    }
}

/// One target per block, in plan order.
pub fn block_targets(plan: &WeekPlanResult, focus_areas: &[String], store: &PerformanceStore) -> Vec<BlockTarget> {
    plan.blocks()
        .map(|b| BlockTarget {
            block_id: b.id.clone(),
            question_count: question_count(b.duration_minutes, b.difficulty),
            reason: reason_for(b.subject, focus_areas, store),
        })
        .collect()
}
