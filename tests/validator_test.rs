use chrono::{NaiveTime, TimeZone, Utc};
use studyplan_lib::config::policy::{SchedulePolicy, ValidationPolicy};
use studyplan_lib::profile::{Field, Level};
use studyplan_lib::schedule::slots::resolve_session_duration;
use studyplan_lib::schedule::{allocate_slots, validate_plan, GenerateParams, ScheduleBuilder, WeekPlanResult};

fn sample_plan() -> WeekPlanResult {
    let at = Utc.with_ymd_and_hms(2025, 3, 3, 7, 0, 0).unwrap();
    ScheduleBuilder::default()
        .build(&GenerateParams::new(Field::Quantitative, Level::Intermediate, 6), at)
        .unwrap()
}

#[test]
fn test_generated_plan_is_valid() {
    let report = validate_plan(&sample_plan(), &ValidationPolicy::default());
    assert!(report.is_valid());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_missing_day_is_an_error() {
    let mut plan = sample_plan();
    plan.days.pop();
    let report = validate_plan(&plan, &ValidationPolicy::default());
    assert!(!report.is_valid());
    assert!(report.errors[0].contains("7 days"));

    let err = report.into_result().unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_total_mismatch_is_an_error() {
    let mut plan = sample_plan();
    plan.days[0].total_minutes += 1;
    let report = validate_plan(&plan, &ValidationPolicy::default());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("does not match"));
}

#[test]
fn test_incomplete_block_is_an_error() {
    let mut plan = sample_plan();
    plan.days[1].blocks[0].topic.clear();
    assert!(!validate_plan(&plan, &ValidationPolicy::default()).is_valid());

    let mut plan = sample_plan();
    plan.days[1].blocks[0].duration_minutes = 0;
    plan.days[1].total_minutes -= 90;
    assert!(!validate_plan(&plan, &ValidationPolicy::default()).is_valid());

    let mut plan = sample_plan();
    plan.days[2].day_label = " ".to_string();
    assert!(!validate_plan(&plan, &ValidationPolicy::default()).is_valid());
}

#[test]
fn test_busy_and_long_days_only_warn() {
    let mut plan = sample_plan();
    let extra = plan.days[0].blocks.clone();
    plan.days[0].blocks.extend(extra.into_iter().take(3));
    plan.days[0].total_minutes = plan.days[0].block_minutes();

    let report = validate_plan(&plan, &ValidationPolicy::default());
    assert!(report.is_valid());
    // 7 blocks of 90 minutes: both limits exceeded
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings.iter().any(|w| w.contains("very busy")));
    assert!(report.warnings.iter().any(|w| w.contains("very long")));
    assert_eq!(report.into_result().unwrap().len(), 2);
}

#[test]
fn test_slots_start_at_anchor_with_gap() {
    let alloc = allocate_slots(60, 3, &SchedulePolicy::default());
    let labels: Vec<String> = alloc.slots.iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["09:00-10:00", "10:30-11:30", "12:00-13:00"]);
    assert!(alloc.warnings.is_empty());
    assert_eq!(alloc.duration_minutes, 60);
}

#[test]
fn test_slot_duration_out_of_range_falls_back() {
    let alloc = allocate_slots(15, 2, &SchedulePolicy::default());
    assert_eq!(alloc.duration_minutes, 90);
    assert_eq!(alloc.warnings.len(), 1);
    assert_eq!(alloc.slots[1].label(), "11:00-12:30");

    assert_eq!(resolve_session_duration(None, &SchedulePolicy::default()), (90, None));
    assert_eq!(resolve_session_duration(Some(180), &SchedulePolicy::default()), (180, None));
}

#[test]
fn test_custom_anchor_moves_every_slot() {
    let policy = SchedulePolicy {
        slot_anchor: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        slot_gap_minutes: 15,
        ..SchedulePolicy::default()
    };
    let alloc = allocate_slots(45, 2, &policy);
    assert_eq!(alloc.slots[0].label(), "07:30-08:15");
    assert_eq!(alloc.slots[1].label(), "08:30-09:15");
}
