use std::fs;
use chrono::{NaiveTime, TimeZone, Utc};
use studyplan_lib::config::{load_policy, load_policy_or_default, PlannerPolicy};
use studyplan_lib::profile::{Field, Level};
use studyplan_lib::schedule::{GenerateParams, ScheduleBuilder};
use studyplan_lib::ErrorKind;
use tempfile::TempDir;

#[test]
fn test_load_policy_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policy.toml");
    fs::write(
        &path,
        r#"
[schedule]
slot_anchor = "08:30"
slot_gap_minutes = 15
slots_per_day = 3

[adaptation]
plan_max_age_hours = 48
"#,
    )
    .unwrap();

    let policy = load_policy(&path).unwrap();
    assert_eq!(policy.schedule.slot_anchor, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
    assert_eq!(policy.schedule.slot_gap_minutes, 15);
    assert_eq!(policy.schedule.slots_per_day, 3);
    assert_eq!(policy.adaptation.plan_max_age_hours, 48);
    // Untouched sections keep their defaults
    assert_eq!(policy.validation.max_blocks_per_day, 6);
    assert_eq!(policy.performance.weak_threshold, 70.0);
}

#[test]
fn test_loaded_policy_drives_the_builder() {
    let policy = PlannerPolicy::from_toml_str("[schedule]\nslot_anchor = \"08:30\"\nslots_per_day = 3\n").unwrap();
    let at = Utc.with_ymd_and_hms(2025, 3, 3, 7, 0, 0).unwrap();
    let plan = ScheduleBuilder::new(policy)
        .build(&GenerateParams::new(Field::Humanities, Level::Advanced, 7), at)
        .unwrap();
    let first = &plan.days[0].blocks[0];
    assert_eq!(first.time, "08:30-10:00");
    assert!(plan.days.iter().all(|d| d.blocks.len() <= 3));
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policy.toml");
    fs::write(&path, "[schedule\nslot_gap_minutes = ").unwrap();

    let err = load_policy(&path).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
    assert!(err.context.as_deref().unwrap_or("").contains("policy.toml"));
    assert_eq!(load_policy_or_default(&path), PlannerPolicy::default());
}

#[test]
fn test_bad_anchor_is_rejected() {
    let err = PlannerPolicy::from_toml_str("[schedule]\nslot_anchor = \"9am\"\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
}

#[test]
fn test_empty_session_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policy.toml");
    fs::write(&path, "[schedule]\nmin_session_minutes = 120\nmax_session_minutes = 60\n").unwrap();

    let err = load_policy(&path).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
    assert_eq!(load_policy_or_default(&path), PlannerPolicy::default());
}

#[test]
fn test_inverted_accuracy_thresholds_are_rejected() {
    let err = PlannerPolicy::from_toml_str("[adaptation]\nstruggling_accuracy = 0.95\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    assert_eq!(load_policy(&path).unwrap_err().kind, ErrorKind::Io);
    assert_eq!(load_policy_or_default(&path), PlannerPolicy::default());
}
