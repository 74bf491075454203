use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::curriculum::Subject;
use crate::error::PlanError;

/// Exam field a student is preparing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Field {
    Quantitative,
    Balanced,
    Humanities,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Quantitative, Field::Balanced, Field::Humanities];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Quantitative => "quantitative",
            Field::Balanced => "balanced",
            Field::Humanities => "humanities",
        }
    }
}

impl FromStr for Field {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quantitative" => Ok(Field::Quantitative),
            "balanced" => Ok(Field::Balanced),
            "humanities" => Ok(Field::Humanities),
            other => Err(PlanError::validation(
                format!("unknown field '{}' (expected quantitative, balanced or humanities)", other),
                "validate_params",
            )),
        }
    }
}

impl TryFrom<String> for Field {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.as_str().to_string()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-tier proficiency ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }

    /// Block difficulty implied by the level alone.
    pub fn default_difficulty(&self) -> Difficulty {
        match self {
            Level::Beginner => Difficulty::Easy,
            Level::Intermediate => Difficulty::Medium,
            Level::Advanced => Difficulty::Hard,
        }
    }
}

impl FromStr for Level {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(PlanError::validation(
                format!("unknown level '{}' (expected beginner, intermediate or advanced)", other),
                "validate_params",
            )),
        }
    }
}

impl TryFrom<String> for Level {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(s)
    }
}

/// Student profile consumed by the adaptive engine.
/// Only `last_updated` changes here, as a side effect of regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub field: Field,
    pub level: Level,
    pub study_days_per_week: u32,
    /// Daily study budget in minutes; caps the number of blocks per day
    pub daily_minutes: Option<u32>,
    pub session_duration_minutes: Option<u32>,
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub exclude_subjects: Vec<Subject>,
    pub last_updated: DateTime<Utc>,
}

impl UserProfile {
    pub fn new<S: Into<String>>(
        id: S,
        field: Field,
        level: Level,
        study_days_per_week: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        UserProfile {
            id: id.into(),
            field,
            level,
            study_days_per_week,
            daily_minutes: None,
            session_duration_minutes: None,
            target_date: None,
            period: None,
            exclude_subjects: Vec::new(),
            last_updated: created_at,
        }
    }

    pub fn with_daily_minutes(mut self, minutes: u32) -> Self {
        self.daily_minutes = Some(minutes);
        self
    }

    pub fn with_session_duration(mut self, minutes: u32) -> Self {
        self.session_duration_minutes = Some(minutes);
        self
    }

    pub fn with_target_date(mut self, date: NaiveDate) -> Self {
        self.target_date = Some(date);
        self
    }

    pub fn with_period<S: Into<String>>(mut self, period: S) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_updated = at;
    }
}
