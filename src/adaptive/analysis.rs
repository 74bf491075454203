use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::config::policy::PerformancePolicy;
use crate::performance::{PerformanceStore, TopicPerformance, Trend, TrendReport, WeeklyReport};

const INSIGHT_TOPIC_LIMIT: usize = 5;
const MAX_SUGGESTIONS: usize = 5;
/// Minutes per question above which pacing advice is given
const SLOW_PACE_MINUTES: f64 = 3.0;

/// Overall standing from lifetime success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl PerformanceTier {
    pub fn from_success_rate(rate: f64) -> Self {
        if rate >= 85.0 {
            PerformanceTier::Excellent
        } else if rate >= 70.0 {
            PerformanceTier::Good
        } else if rate >= 50.0 {
            PerformanceTier::Average
        } else {
            PerformanceTier::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    High,
    Medium,
    Low,
}

/// Streak of 7+ days is high, 3+ medium.
pub fn consistency(streak_days: u32) -> Rating {
    match streak_days {
        d if d >= 7 => Rating::High,
        d if d >= 3 => Rating::Medium,
        _ => Rating::Low,
    }
}

/// Weekly average of 240+ minutes a day is high, 120+ medium.
pub fn intensity(average_minutes_per_day: f64) -> Rating {
    if average_minutes_per_day >= 240.0 {
        Rating::High
    } else if average_minutes_per_day >= 120.0 {
        Rating::Medium
    } else {
        Rating::Low
    }
}

/// Topics below the weak threshold or flagged for review, weakest first.
pub fn weak_topics<'a>(store: &'a PerformanceStore, policy: &PerformancePolicy, limit: usize) -> Vec<&'a TopicPerformance> {
    let mut weak: Vec<_> = store
        .topics()
        .filter(|t| t.success_rate() < policy.weak_threshold || t.needs_review)
        .collect();
    weak.sort_by(|a, b| a.success_rate().total_cmp(&b.success_rate()));
    weak.truncate(limit);
    weak
}

/// Topics at or above the strong threshold, strongest first.
pub fn strong_topics<'a>(store: &'a PerformanceStore, policy: &PerformancePolicy, limit: usize) -> Vec<&'a TopicPerformance> {
    let mut strong: Vec<_> = store
        .topics()
        .filter(|t| t.success_rate() >= policy.strong_threshold)
        .collect();
    strong.sort_by(|a, b| b.success_rate().total_cmp(&a.success_rate()));
    strong.truncate(limit);
    strong
}

/// Targets should move when performance is extreme and still heading further out.
pub fn should_update_targets(success_rate: f64, trend: Trend) -> bool {
    (success_rate >= 90.0 && trend == Trend::Improving) || (success_rate <= 40.0 && trend == Trend::Declining)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceInsights {
    pub tier: PerformanceTier,
    pub success_rate: f64,
    pub total_questions: u32,
    pub streak_days: u32,
    pub consistency: Rating,
    pub intensity: Rating,
    pub weekly: WeeklyReport,
    pub trend: TrendReport,
    pub weak_topics: Vec<String>,
    pub strong_topics: Vec<String>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
    pub target_update_needed: bool,
}

impl PerformanceInsights {
    /// Whether any question has been answered yet.
    pub fn has_history(&self) -> bool {
        self.total_questions > 0
    }
}

pub fn analyze(store: &PerformanceStore, as_of: NaiveDate) -> PerformanceInsights {
    let policy = store.policy();
    let overall = store.overall();
    let weekly = store.weekly_report(as_of);
    let trend = store.trend(as_of);
    let success_rate = overall.success_rate();

    let weak = weak_topics(store, policy, INSIGHT_TOPIC_LIMIT);
    let strong = strong_topics(store, policy, INSIGHT_TOPIC_LIMIT);
    let consistency = consistency(overall.streak_days);

    let mut notes = Vec::new();
    if success_rate < 50.0 {
        notes.push("Overall success rate is low; concentrate on fundamentals".to_string());
    } else if success_rate > 85.0 {
        notes.push("Excellent performance; move on to harder questions".to_string());
    }
    if !weak.is_empty() {
        let names: Vec<&str> = weak.iter().take(3).map(|t| t.topic_name.as_str()).collect();
        notes.push(format!("Weak topics detected: {}", names.join(", ")));
    }
    if consistency == Rating::Low {
        notes.push("Build a daily habit of at least one hour of study".to_string());
    }
    match trend.trend {
        Trend::Declining => notes.push("Performance is trending down; keep motivation high".to_string()),
        Trend::Improving => notes.push("Performance is rising; keep the momentum".to_string()),
        Trend::Stable => {}
    }

    let mut suggestions = Vec::new();
    if let Some(first) = weak.first() {
        suggestions.push(format!("Spend extra time on {}", first.topic_name));
    }
    match trend.trend {
        Trend::Declining => {
            suggestions.push("Review your study method".to_string());
            suggestions.push("Check the length of your breaks".to_string());
        }
        Trend::Improving => suggestions.push("Keep this pace, it is working".to_string()),
        Trend::Stable => {}
    }
    if overall.streak_days < 3 {
        suggestions.push("Build a regular study routine".to_string());
    }
    if overall.average_time_per_question() > SLOW_PACE_MINUTES {
        suggestions.push("Work on answering questions faster".to_string());
    }
    suggestions.truncate(MAX_SUGGESTIONS);

    PerformanceInsights {
        tier: PerformanceTier::from_success_rate(success_rate),
        success_rate,
        total_questions: overall.total_questions,
        streak_days: overall.streak_days,
        consistency,
        intensity: intensity(weekly.average_study_minutes),
        target_update_needed: should_update_targets(success_rate, trend.trend),
        weak_topics: weak.iter().map(|t| t.topic_name.clone()).collect(),
        strong_topics: strong.iter().map(|t| t.topic_name.clone()).collect(),
        weekly,
        trend,
        notes,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(PerformanceTier::from_success_rate(85.0), PerformanceTier::Excellent);
        assert_eq!(PerformanceTier::from_success_rate(84.9), PerformanceTier::Good);
        assert_eq!(PerformanceTier::from_success_rate(50.0), PerformanceTier::Average);
        assert_eq!(PerformanceTier::from_success_rate(0.0), PerformanceTier::NeedsImprovement);
    }

    #[test]
    fn target_update_needs_matching_trend() {
        assert!(should_update_targets(92.0, Trend::Improving));
        assert!(!should_update_targets(92.0, Trend::Stable));
        assert!(should_update_targets(35.0, Trend::Declining));
    }
}
