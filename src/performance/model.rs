use std::collections::BTreeSet;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub(crate) fn percent(correct: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 * 100.0 / total as f64
    }
}

/// Running totals for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicPerformance {
    pub topic_id: String,
    pub topic_name: String,
    pub questions_solved: u32,
    pub correct_answers: u32,
    pub time_spent_minutes: u32,
    pub last_studied: DateTime<Utc>,
    pub needs_review: bool,
}

impl TopicPerformance {
    /// Percentage in 0..=100, always derived from the counters.
    pub fn success_rate(&self) -> f64 {
        percent(self.correct_answers, self.questions_solved)
    }

    /// Minutes per question.
    pub fn average_time(&self) -> f64 {
        if self.questions_solved == 0 {
            0.0
        } else {
            self.time_spent_minutes as f64 / self.questions_solved as f64
        }
    }

    /// 5 for the weakest topics down to 2 for mastered ones.
    pub fn priority(&self) -> u8 {
        match self.success_rate() {
            r if r < 50.0 => 5,
            r if r < 70.0 => 4,
            r if r < 85.0 => 3,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub study_minutes: u32,
    pub questions_solved: u32,
    pub correct_answers: u32,
    pub session_count: u32,
    pub topics: BTreeSet<String>,
}

impl DailyAggregate {
    pub fn empty(date: NaiveDate) -> Self {
        DailyAggregate {
            date,
            study_minutes: 0,
            questions_solved: 0,
            correct_answers: 0,
            session_count: 0,
            topics: BTreeSet::new(),
        }
    }

    pub fn accuracy(&self) -> f64 {
        percent(self.correct_answers, self.questions_solved)
    }
}

/// Lifetime totals across all topics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallPerformance {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub study_minutes_total: u32,
    pub streak_days: u32,
    /// Last calendar day that moved the streak
    pub streak_counted_on: Option<NaiveDate>,
}

impl OverallPerformance {
    pub fn success_rate(&self) -> f64 {
        percent(self.correct_answers, self.total_questions)
    }

    pub fn incorrect_answers(&self) -> u32 {
        self.total_questions - self.correct_answers
    }

    pub fn average_time_per_question(&self) -> f64 {
        if self.total_questions == 0 {
            0.0
        } else {
            self.study_minutes_total as f64 / self.total_questions as f64
        }
    }
}
