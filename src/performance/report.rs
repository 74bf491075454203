use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBreakdown {
    pub date: NaiveDate,
    pub study_minutes: u32,
    pub questions: u32,
    pub accuracy: f64,
}

/// Totals over the 7 days ending on `as_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub as_of: NaiveDate,
    pub total_study_minutes: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub session_count: u32,
    pub topics_studied: usize,
    /// Percentage over all questions of the week
    pub average_accuracy: f64,
    /// Minutes per calendar day, empty days included
    pub average_study_minutes: f64,
    /// Oldest day first
    pub daily_breakdown: Vec<DailyBreakdown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// Daily series over the trend window, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub as_of: NaiveDate,
    pub accuracy: Vec<f64>,
    pub study_minutes: Vec<u32>,
    pub question_volume: Vec<u32>,
    pub recent_accuracy: f64,
    pub older_accuracy: f64,
    pub trend: Trend,
}

impl TrendReport {
    pub fn delta(&self) -> f64 {
        self.recent_accuracy - self.older_accuracy
    }
}

/// Classify an accuracy change against a symmetric threshold.
pub fn classify(delta: f64, threshold: f64) -> Trend {
    if delta > threshold {
        Trend::Improving
    } else if delta < -threshold {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
