use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use chrono::NaiveTime;
use lazy_static::lazy_static;
use crate::error::{PlanError, Result};

/// Tunable product policy for schedule construction and adaptation.
/// Every section falls back to its defaults when omitted from `policy.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlannerPolicy {
    pub schedule: SchedulePolicy,
    pub validation: ValidationPolicy,
    pub resources: ResourcePolicy,
    pub performance: PerformancePolicy,
    pub adaptation: AdaptationPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulePolicy {
    /// First slot of the day, "HH:MM"
    #[serde(with = "hhmm")]
    pub slot_anchor: NaiveTime,
    pub slot_gap_minutes: u32,
    pub default_session_minutes: u32,
    pub min_session_minutes: u32,
    pub max_session_minutes: u32,
    pub slots_per_day: u32,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        SchedulePolicy {
            slot_anchor: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            slot_gap_minutes: 30,
            default_session_minutes: 90,
            min_session_minutes: 30,
            max_session_minutes: 180,
            slots_per_day: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub max_blocks_per_day: usize,
    pub max_minutes_per_day: u32,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        ValidationPolicy {
            max_blocks_per_day: 6,
            max_minutes_per_day: 480,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePolicy {
    /// Period tags that mark an intensive question-drilling phase
    pub drill_periods: Vec<String>,
}

impl Default for ResourcePolicy {
    fn default() -> Self {
        ResourcePolicy {
            drill_periods: vec!["drill-phase".to_string(), "sep-nov".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformancePolicy {
    pub review_threshold: f64,
    pub stale_after_days: i64,
    /// Streak value after a day without study. Some products prefer 0.
    pub streak_reset_value: u32,
    pub trend_delta: f64,
    pub trend_window_days: u32,
    pub weak_threshold: f64,
    pub strong_threshold: f64,
}

impl Default for PerformancePolicy {
    fn default() -> Self {
        PerformancePolicy {
            review_threshold: 70.0,
            stale_after_days: 7,
            streak_reset_value: 1,
            trend_delta: 5.0,
            trend_window_days: 14,
            weak_threshold: 70.0,
            strong_threshold: 85.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptationPolicy {
    /// Single-session accuracy (0..1) below which the plan is rebuilt
    pub struggling_accuracy: f64,
    /// Single-session accuracy (0..1) above which difficulty escalates
    pub mastery_accuracy: f64,
    pub mastery_min_questions: u32,
    pub plan_max_age_hours: i64,
    pub plan_validity_days: i64,
    pub focus_area_cap: usize,
    pub emergency_success_rate: f64,
    pub emergency_min_questions: u32,
    pub exam_countdown_days: i64,
}

impl Default for AdaptationPolicy {
    fn default() -> Self {
        AdaptationPolicy {
            struggling_accuracy: 0.30,
            mastery_accuracy: 0.90,
            mastery_min_questions: 10,
            plan_max_age_hours: 24,
            plan_validity_days: 7,
            focus_area_cap: 8,
            emergency_success_rate: 40.0,
            emergency_min_questions: 30,
            exam_countdown_days: 30,
        }
    }
}

impl PlannerPolicy {
    /// Reject values no schedule could satisfy.
    pub fn validate(&self) -> Result<()> {
        let s = &self.schedule;
        if s.min_session_minutes == 0 || s.min_session_minutes > s.max_session_minutes {
            return Err(PlanError::config(format!(
                "session range {}-{} is empty",
                s.min_session_minutes, s.max_session_minutes
            )));
        }
        if s.default_session_minutes < s.min_session_minutes
            || s.default_session_minutes > s.max_session_minutes
        {
            return Err(PlanError::config(format!(
                "default session {} outside {}-{}",
                s.default_session_minutes, s.min_session_minutes, s.max_session_minutes
            )));
        }
        if s.slots_per_day == 0 {
            return Err(PlanError::config("slots_per_day must be at least 1"));
        }
        let a = &self.adaptation;
        if !(0.0..=1.0).contains(&a.struggling_accuracy)
            || !(0.0..=1.0).contains(&a.mastery_accuracy)
            || a.struggling_accuracy >= a.mastery_accuracy
        {
            return Err(PlanError::config(format!(
                "accuracy thresholds {} / {} must satisfy 0 <= struggling < mastery <= 1",
                a.struggling_accuracy, a.mastery_accuracy
            )));
        }
        if self.performance.trend_window_days < 2 {
            return Err(PlanError::config("trend_window_days must be at least 2"));
        }
        Ok(())
    }

    /// Parse and validate a policy from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let policy: PlannerPolicy = toml::from_str(content)?;
        policy.validate()?;
        Ok(policy)
    }
}

fn get_policy_path() -> PathBuf {
    // Use platform-specific app data directory
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push("Library/Application Support/studyplan");
            dir.push("policy.toml");
            return dir;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            let mut dir = PathBuf::from(appdata);
            dir.push("studyplan");
            dir.push("policy.toml");
            return dir;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push(".local/share/studyplan");
            dir.push("policy.toml");
            return dir;
        }
    }

    // Fallback
    PathBuf::from("policy.toml")
}

/// Load a policy file. A missing file is an error here; see `load_policy_or_default`.
pub fn load_policy(path: &Path) -> Result<PlannerPolicy> {
    let content = fs::read_to_string(path)
        .map_err(|e| PlanError::from(e).with_context(format!("path: {:?}", path)))?;
    PlannerPolicy::from_toml_str(&content)
        .map_err(|e| e.with_context(format!("path: {:?}", path)))
}

/// Load a policy file, falling back to defaults when it is absent or unusable.
pub fn load_policy_or_default(path: &Path) -> PlannerPolicy {
    if !path.exists() {
        tracing::debug!(path = ?path, "No policy file, using defaults");
        return PlannerPolicy::default();
    }
    match load_policy(path) {
        Ok(policy) => {
            tracing::info!(path = ?path, "Loaded planner policy");
            policy
        }
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Invalid policy file, using defaults");
            PlannerPolicy::default()
        }
    }
}

lazy_static! {
    static ref POLICY: PlannerPolicy = load_policy_or_default(&get_policy_path());
}

/// Get the cached policy from the app data directory (loaded once)
pub fn get_policy() -> &'static PlannerPolicy {
    &POLICY
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(serde::de::Error::custom)
    }
}
