use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::performance::Trend;
use super::analysis::PerformanceTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotivationCategory {
    Strong,
    Improving,
    Struggling,
    Review,
}

const STRONG: &[&str] = &[
    "Great work! At this pace you will reach your goal.",
    "Success is waiting for you. Keep going!",
    "Outstanding performance. This determination will take you to the top.",
];

const IMPROVING: &[&str] = &[
    "You get a little better every day.",
    "Your progress looks great. Keep it up!",
    "Patience and work are starting to pay off.",
];

const STRUGGLING: &[&str] = &[
    "Difficulties make you stronger. Don't give up!",
    "Every expert was once a beginner.",
    "Invest in yourself today, reap the rewards tomorrow.",
];

const REVIEW: &[&str] = &[
    "Repetition is the key to learning.",
    "Time to consolidate. What you know will only get sturdier.",
    "Reviewing is what makes success stick.",
];

/// Rest days get review messages; otherwise good tiers are strong,
/// an improving trend is improving, anything else is struggling.
pub fn category_for(tier: PerformanceTier, trend: Trend, rest_day: bool) -> MotivationCategory {
    if rest_day {
        return MotivationCategory::Review;
    }
    match tier {
        PerformanceTier::Excellent | PerformanceTier::Good => MotivationCategory::Strong,
        _ if trend == Trend::Improving => MotivationCategory::Improving,
        _ => MotivationCategory::Struggling,
    }
}

pub fn messages(category: MotivationCategory) -> &'static [&'static str] {
    match category {
        MotivationCategory::Strong => STRONG,
        MotivationCategory::Improving => IMPROVING,
        MotivationCategory::Struggling => STRUGGLING,
        MotivationCategory::Review => REVIEW,
    }
}

/// Pick one message of the category. The only randomized output of the planner.
pub fn pick<R: Rng + ?Sized>(category: MotivationCategory, rng: &mut R) -> String {
    messages(category)
        .choose(rng)
        .map(|m| m.to_string())
        .unwrap_or_default()
}
