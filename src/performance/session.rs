use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::error::{PlanError, Result};

/// Handle for an open practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Study,
    Review,
    Test,
}

/// One practice session. Open until `end` is set, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSession {
    pub id: SessionId,
    pub topic_id: String,
    pub session_type: SessionType,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub duration_minutes: u32,
}

impl PerformanceSession {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Correct share in 0..=1, `None` when nothing was answered.
    pub fn accuracy(&self) -> Option<f64> {
        if self.questions_answered == 0 {
            None
        } else {
            Some(self.correct_answers as f64 / self.questions_answered as f64)
        }
    }
}

pub(crate) fn check_answers(answered: u32, correct: u32, stage: &'static str) -> Result<()> {
    if correct > answered {
        return Err(PlanError::validation(
            format!("{} correct answers exceed {} answered", correct, answered),
            stage,
        ));
    }
    Ok(())
}

/// A session finished elsewhere, reported in one piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePerformanceRequest {
    pub user_id: String,
    pub topic_id: String,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub time_spent_minutes: u32,
    pub session_type: SessionType,
}

impl UpdatePerformanceRequest {
    pub fn validate(&self) -> Result<()> {
        if self.topic_id.trim().is_empty() {
            return Err(PlanError::validation("topic id is empty", "record_completed"));
        }
        check_answers(self.questions_answered, self.correct_answers, "record_completed")
    }
}
