use serde::{Deserialize, Serialize};
use crate::config::policy::ValidationPolicy;
use crate::error::{PlanError, Result};
use super::types::{DayPlan, WeekPlanResult};

pub const DAYS_PER_WEEK: usize = 7;

/// Outcome of a structural check. Errors are fatal, warnings are advisory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collapse into the warnings, or a validation error naming every problem.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(PlanError::validation(
                format!("plan failed validation: {}", self.errors.join("; ")),
                "validate_plan",
            ))
        }
    }
}

pub fn validate_plan(plan: &WeekPlanResult, policy: &ValidationPolicy) -> ValidationReport {
    let mut report = ValidationReport::default();

    if plan.days.len() != DAYS_PER_WEEK {
        report.errors.push(format!(
            "Plan must contain {} days, found {}",
            DAYS_PER_WEEK,
            plan.days.len()
        ));
    }

    for (index, day) in plan.days.iter().enumerate() {
        check_required_fields(index, day, &mut report.errors);

        let block_minutes = day.block_minutes();
        if block_minutes != day.total_minutes {
            report.errors.push(format!(
                "Day {} total {} min does not match its blocks ({} min)",
                index + 1,
                day.total_minutes,
                block_minutes
            ));
        }

        if day.blocks.len() > policy.max_blocks_per_day {
            report.warnings.push(format!(
                "{} is very busy ({} blocks)",
                day.day_label,
                day.blocks.len()
            ));
        }
        if day.total_minutes > policy.max_minutes_per_day {
            report.warnings.push(format!(
                "{} is very long ({} hours)",
                day.day_label,
                (day.total_minutes as f64 / 60.0).round()
            ));
        }
    }

    if !report.is_valid() {
        tracing::warn!(errors = report.errors.len(), "Plan failed validation");
    }
    report
}

fn check_required_fields(index: usize, day: &DayPlan, errors: &mut Vec<String>) {
    if day.day_label.trim().is_empty() {
        errors.push(format!("Day {} is missing its label", index + 1));
    }
    for block in &day.blocks {
        let missing = block.id.is_empty()
            || block.topic.trim().is_empty()
            || block.resource.trim().is_empty()
            || block.time.is_empty();
        if missing || block.duration_minutes == 0 {
            errors.push(format!("Day {} has an incomplete block '{}'", index + 1, block.id));
        }
    }
}
