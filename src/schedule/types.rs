use std::collections::BTreeMap;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use crate::curriculum::{DayType, Subject};
use crate::error::{PlanError, Result};
use crate::profile::{Difficulty, Field, Level};
use crate::resources::ResourceSuggestion;

/// Request for one weekly plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateParams {
    pub field: Field,
    pub level: Level,
    pub study_days_per_week: u32,
    #[serde(default)]
    pub week_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub session_duration_minutes: Option<u32>,
    /// Free-form focus entries, e.g. "AYT Physics - Optics"
    #[serde(default)]
    pub focus_topics: Vec<String>,
    #[serde(default)]
    pub exclude_subjects: Vec<Subject>,
    #[serde(default)]
    pub slots_per_day: Option<u32>,
    #[serde(default)]
    pub difficulty_overrides: BTreeMap<Subject, Difficulty>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

impl GenerateParams {
    pub fn new(field: Field, level: Level, study_days_per_week: u32) -> Self {
        GenerateParams {
            field,
            level,
            study_days_per_week,
            week_start_date: None,
            period: None,
            session_duration_minutes: None,
            focus_topics: Vec::new(),
            exclude_subjects: Vec::new(),
            slots_per_day: None,
            difficulty_overrides: BTreeMap::new(),
            target_date: None,
        }
    }

    /// Build params from raw strings, rejecting unknown field or level names.
    pub fn parse(field: &str, level: &str, study_days_per_week: u32) -> Result<Self> {
        Ok(Self::new(field.parse()?, level.parse()?, study_days_per_week))
    }

    /// Parse a request body. Any malformed value is a validation failure.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| {
            PlanError::validation(format!("invalid plan request: {}", e), "validate_params")
        })
    }

    /// Set the week start from a `YYYY-MM-DD` string.
    pub fn with_week_start_str(mut self, date: &str) -> Result<Self> {
        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
            PlanError::validation(format!("invalid week start '{}': {}", date, e), "validate_params")
        })?;
        self.week_start_date = Some(parsed);
        Ok(self)
    }

    pub fn with_week_start(mut self, date: NaiveDate) -> Self {
        self.week_start_date = Some(date);
        self
    }

    pub fn with_session_duration(mut self, minutes: u32) -> Self {
        self.session_duration_minutes = Some(minutes);
        self
    }

    pub fn with_period<S: Into<String>>(mut self, period: S) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_focus<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn excluding(mut self, subjects: Vec<Subject>) -> Self {
        self.exclude_subjects = subjects;
        self
    }
}

/// One time-of-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    /// `HH:MM-HH:MM`
    pub fn label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyBlock {
    pub id: String,
    pub time: String,
    pub subject: Subject,
    pub topic: String,
    pub resource: String,
    pub duration_minutes: u32,
    pub difficulty: Difficulty,
    /// 1-5, 5 for focus subjects
    pub priority: u8,
    #[serde(default)]
    pub done: bool,
}

impl StudyBlock {
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day_label: String,
    pub date: NaiveDate,
    pub day_type: DayType,
    #[serde(default)]
    pub rest: bool,
    pub blocks: Vec<StudyBlock>,
    pub total_minutes: u32,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl DayPlan {
    pub fn block_minutes(&self) -> u32 {
        self.blocks.iter().map(|b| b.duration_minutes).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMeta {
    pub generated_at: DateTime<Utc>,
    pub week_start_date: NaiveDate,
    pub total_study_hours: f64,
    pub average_hours_per_day: f64,
    pub session_duration_minutes: u32,
    pub study_days: u32,
    pub strategy: String,
}

/// A complete week. Regeneration replaces it; only block completion changes in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlanResult {
    pub days: Vec<DayPlan>,
    pub resources: BTreeMap<String, Vec<ResourceSuggestion>>,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub meta: PlanMeta,
}

impl WeekPlanResult {
    pub fn blocks(&self) -> impl Iterator<Item = &StudyBlock> {
        self.days.iter().flat_map(|d| d.blocks.iter())
    }

    pub fn block_count(&self) -> usize {
        self.days.iter().map(|d| d.blocks.len()).sum()
    }

    pub fn total_minutes(&self) -> u32 {
        self.days.iter().map(|d| d.total_minutes).sum()
    }

    /// Days that carry at least one block.
    pub fn active_days(&self) -> usize {
        self.days.iter().filter(|d| !d.blocks.is_empty()).count()
    }

    pub fn mark_block_done(&mut self, block_id: &str) -> Result<()> {
        let block = self
            .days
            .iter_mut()
            .flat_map(|d| d.blocks.iter_mut())
            .find(|b| b.id == block_id)
            .ok_or_else(|| {
                PlanError::not_found(format!("no block with id '{}'", block_id), "mark_block_done")
            })?;
        block.mark_done();
        Ok(())
    }

    /// Fraction of blocks marked done, 0.0 for an empty plan.
    pub fn completion_ratio(&self) -> f64 {
        let total = self.block_count();
        if total == 0 {
            return 0.0;
        }
        let done = self.blocks().filter(|b| b.done).count();
        done as f64 / total as f64
    }
}
