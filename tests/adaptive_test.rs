use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use studyplan_lib::adaptive::analysis::{self, PerformanceTier, Rating};
use studyplan_lib::adaptive::motivation::{self, MotivationCategory};
use studyplan_lib::adaptive::{AdaptiveEngine, PlanMode, RegenerationDecision, RegenerationReason};
use studyplan_lib::config::PlannerPolicy;
use studyplan_lib::curriculum::{DayType, Subject};
use studyplan_lib::performance::{PerformanceStore, SessionType, Trend, UpdatePerformanceRequest};
use studyplan_lib::profile::{Difficulty, Field, Level, UserProfile};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

fn profile() -> UserProfile {
    UserProfile::new("u1", Field::Quantitative, Level::Intermediate, 6, now() - Duration::days(30))
}

fn store() -> PerformanceStore {
    PerformanceStore::new(PlannerPolicy::default().performance)
}

fn fold(store: &mut PerformanceStore, topic: &str, answered: u32, correct: u32, at: DateTime<Utc>) {
    let request = UpdatePerformanceRequest {
        user_id: "u1".to_string(),
        topic_id: topic.to_string(),
        questions_answered: answered,
        correct_answers: correct,
        time_spent_minutes: 30,
        session_type: SessionType::Study,
    };
    store.record_completed(&request, at).unwrap();
}

#[test]
fn test_low_accuracy_session_triggers_regeneration() {
    let engine = AdaptiveEngine::default();
    let mut user = profile();
    let plan = engine.generate(&mut user, &store(), None, &[], now(), &mut StdRng::seed_from_u64(1)).unwrap();

    let decision = engine.should_regenerate(20, 4, Some(&plan), now() + Duration::hours(1));
    assert_eq!(decision, RegenerationDecision::Regenerate(RegenerationReason::Struggling));
    assert!(decision.should_regenerate());
}

#[test]
fn test_regeneration_rules() {
    let engine = AdaptiveEngine::default();
    let mut user = profile();
    let plan = engine.generate(&mut user, &store(), None, &[], now(), &mut StdRng::seed_from_u64(1)).unwrap();
    let soon = now() + Duration::hours(1);

    assert_eq!(
        engine.should_regenerate(10, 10, Some(&plan), soon),
        RegenerationDecision::Regenerate(RegenerationReason::Mastery)
    );
    // Mastery needs at least 10 questions
    assert_eq!(engine.should_regenerate(9, 9, Some(&plan), soon), RegenerationDecision::Reuse);
    // Exactly 30 % is not struggling
    assert_eq!(engine.should_regenerate(10, 3, Some(&plan), soon), RegenerationDecision::Reuse);
    assert_eq!(engine.should_regenerate(0, 0, Some(&plan), soon), RegenerationDecision::Reuse);
    assert_eq!(
        engine.should_regenerate(10, 6, None, soon),
        RegenerationDecision::Regenerate(RegenerationReason::NoPlan)
    );
    assert_eq!(
        engine.should_regenerate(10, 6, Some(&plan), now() + Duration::hours(25)),
        RegenerationDecision::Regenerate(RegenerationReason::Stale)
    );
}

#[test]
fn test_generate_builds_a_full_week() {
    let engine = AdaptiveEngine::default();
    let mut user = profile();
    let plan = engine.generate(&mut user, &store(), None, &[], now(), &mut StdRng::seed_from_u64(7)).unwrap();

    assert_eq!(plan.mode, PlanMode::Standard);
    assert_eq!(plan.adaptation_level, 1);
    assert_eq!(plan.user_id, "u1");
    assert_eq!(plan.plan.days.len(), 7);
    assert_eq!(plan.motivation.len(), 7);
    assert_eq!(plan.valid_until, now() + Duration::days(7));
    assert!(plan.is_current(now() + Duration::days(6)));
    assert!(!plan.is_current(now() + Duration::days(7)));
    assert_eq!(user.last_updated, now());
    assert_eq!(plan.plan.meta.week_start_date, now().date_naive());

    // No history: the field basics are the focus
    assert_eq!(plan.focus_areas.len(), 5);
    assert_eq!(plan.focus_areas[0], "TYT Mathematics - Basic operations");

    let rest = &plan.plan.days[6];
    assert!(rest.rest);
    assert!(motivation::messages(MotivationCategory::Review).contains(&plan.motivation[6].as_str()));

    let next = engine
        .generate(&mut user, &store(), Some(&plan), &[], now() + Duration::days(1), &mut StdRng::seed_from_u64(7))
        .unwrap();
    assert_eq!(next.adaptation_level, 2);
}

#[test]
fn test_same_seed_same_motivation() {
    let engine = AdaptiveEngine::default();
    let a = engine
        .generate(&mut profile(), &store(), None, &[], now(), &mut StdRng::seed_from_u64(42))
        .unwrap();
    let b = engine
        .generate(&mut profile(), &store(), None, &[], now(), &mut StdRng::seed_from_u64(42))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_focus_areas_order_and_dedup() {
    let engine = AdaptiveEngine::default();
    let mut history = store();
    fold(&mut history, "ayt_physics_optics", 10, 2, now());

    let requested = vec![
        "TYT Turkish - Grammar".to_string(),
        "TYT Mathematics - Basic operations".to_string(),
    ];
    let areas = engine.focus_areas(&profile(), &history, &requested);
    assert_eq!(areas[0], "TYT Turkish - Grammar");
    assert_eq!(areas[1], "TYT Mathematics - Basic operations");
    assert_eq!(areas[2], "AYT Physics - optics");
    // Two requested, one weak, four remaining basics
    assert_eq!(areas.len(), 7);
}

#[test]
fn test_focus_areas_are_capped() {
    let mut policy = PlannerPolicy::default();
    policy.adaptation.focus_area_cap = 3;
    let engine = AdaptiveEngine::new(policy);
    let areas = engine.focus_areas(&profile(), &store(), &[]);
    assert_eq!(areas.len(), 3);
}

#[test]
fn test_weak_and_strong_topic_ranking() {
    let mut history = store();
    fold(&mut history, "a", 10, 4, now());
    fold(&mut history, "b", 10, 6, now());
    fold(&mut history, "c", 10, 9, now());
    fold(&mut history, "d", 10, 10, now());
    let policy = history.policy().clone();

    let weak: Vec<&str> = analysis::weak_topics(&history, &policy, 5).iter().map(|t| t.topic_id.as_str()).collect();
    assert_eq!(weak, vec!["a", "b"]);
    let strong: Vec<&str> = analysis::strong_topics(&history, &policy, 5).iter().map(|t| t.topic_id.as_str()).collect();
    assert_eq!(strong, vec!["d", "c"]);
    assert_eq!(analysis::weak_topics(&history, &policy, 1).len(), 1);
}

#[test]
fn test_subject_difficulty_rules() {
    let engine = AdaptiveEngine::default();
    let mut history = store();
    fold(&mut history, "tyt_mathematics_functions", 10, 9, now());
    fold(&mut history, "ayt_chemistry_solutions", 10, 4, now());

    assert_eq!(engine.subject_difficulty(&history, Subject::TytMathematics, PerformanceTier::Excellent), Difficulty::Hard);
    assert_eq!(engine.subject_difficulty(&history, Subject::TytMathematics, PerformanceTier::Average), Difficulty::Medium);
    assert_eq!(
        engine.subject_difficulty(&history, Subject::TytMathematics, PerformanceTier::NeedsImprovement),
        Difficulty::Easy
    );
    assert_eq!(engine.subject_difficulty(&history, Subject::AytChemistry, PerformanceTier::Excellent), Difficulty::Easy);
    // Unknown subjects count as 50
    assert_eq!(engine.subject_difficulty(&history, Subject::AytPhysics, PerformanceTier::Good), Difficulty::Medium);
}

#[test]
fn test_difficulty_overrides_need_history() {
    let engine = AdaptiveEngine::default();
    assert!(engine.difficulty_overrides(&profile(), &store()).is_empty());

    let mut history = store();
    fold(&mut history, "tyt_mathematics_functions", 20, 18, now());
    let overrides = engine.difficulty_overrides(&profile(), &history);
    assert_eq!(overrides.len(), 8);
    assert_eq!(overrides[&Subject::TytMathematics], Difficulty::Hard);
    assert_eq!(overrides[&Subject::AytPhysics], Difficulty::Medium);

    let plan = engine
        .generate(&mut profile(), &history, None, &[], now(), &mut StdRng::seed_from_u64(3))
        .unwrap();
    assert!(plan
        .plan
        .blocks()
        .filter(|b| b.subject == Subject::TytMathematics)
        .all(|b| b.difficulty == Difficulty::Hard));
}

#[test]
fn test_daily_budget_limits_slots() {
    let engine = AdaptiveEngine::default();
    assert_eq!(engine.slots_for_budget(&profile(), 90), None);
    assert_eq!(engine.slots_for_budget(&profile().with_daily_minutes(200), 90), Some(2));
    assert_eq!(engine.slots_for_budget(&profile().with_daily_minutes(30), 90), Some(1));
    assert_eq!(engine.slots_for_budget(&profile().with_daily_minutes(1000), 90), Some(4));

    let mut user = profile().with_daily_minutes(180);
    let plan = engine.generate(&mut user, &store(), None, &[], now(), &mut StdRng::seed_from_u64(1)).unwrap();
    assert!(plan.plan.days.iter().take(6).all(|d| d.blocks.len() == 2));
}

#[test]
fn test_emergency_mode() {
    let engine = AdaptiveEngine::default();
    let mut history = store();
    fold(&mut history, "tyt_mathematics_functions", 20, 4, now());
    assert!(!engine.emergency_warranted(&history, now().date_naive()));
    fold(&mut history, "tyt_mathematics_functions", 20, 4, now());
    assert!(engine.emergency_warranted(&history, now().date_naive()));

    let mut user = profile();
    let plan = engine.generate_emergency(&mut user, &history, None, now()).unwrap();
    assert_eq!(plan.mode, PlanMode::Emergency);
    assert_eq!(plan.plan.meta.strategy, "emergency");
    assert_eq!(user.last_updated, now());

    let days = &plan.plan.days;
    assert_eq!(days.len(), 7);
    for day in &days[..5] {
        assert_eq!(day.blocks.len(), 1);
        let block = &day.blocks[0];
        assert_eq!(block.duration_minutes, 30);
        assert_eq!(block.difficulty, Difficulty::Easy);
        assert_eq!(block.subject, Subject::TytMathematics);
        assert_eq!(block.time, "09:00-09:30");
    }
    assert!(days[5].rest && days[5].blocks.is_empty());
    assert_eq!(days[6].day_type, DayType::Review);
    assert_eq!(days[6].blocks[0].topic, "Weekly review");
    assert_eq!(days[6].total_minutes, 30);
    assert_eq!(plan.plan.total_minutes(), 180);
}

#[test]
fn test_insights_notes_and_suggestions() {
    let mut history = store();
    fold(&mut history, "ayt_physics_optics", 10, 3, now());
    fold(&mut history, "tyt_turkish_grammar", 10, 9, now());
    let insights = analysis::analyze(&history, now().date_naive());

    assert_eq!(insights.tier, PerformanceTier::Average);
    assert_eq!(insights.success_rate, 60.0);
    assert_eq!(insights.consistency, Rating::Low);
    assert_eq!(insights.weak_topics, vec!["AYT Physics - optics".to_string()]);
    assert_eq!(insights.strong_topics, vec!["TYT Turkish - grammar".to_string()]);
    assert!(insights.notes.iter().any(|n| n.contains("Weak topics detected")));
    assert!(insights.suggestions.len() <= 5);
    assert_eq!(insights.suggestions[0], "Spend extra time on AYT Physics - optics");
    assert!(insights.has_history());
}

#[test]
fn test_motivation_categories() {
    use motivation::category_for;
    assert_eq!(category_for(PerformanceTier::Good, Trend::Declining, true), MotivationCategory::Review);
    assert_eq!(category_for(PerformanceTier::Excellent, Trend::Stable, false), MotivationCategory::Strong);
    assert_eq!(category_for(PerformanceTier::Average, Trend::Improving, false), MotivationCategory::Improving);
    assert_eq!(category_for(PerformanceTier::Average, Trend::Stable, false), MotivationCategory::Struggling);

    let mut rng = StdRng::seed_from_u64(11);
    let message = motivation::pick(MotivationCategory::Strong, &mut rng);
    assert!(motivation::messages(MotivationCategory::Strong).contains(&message.as_str()));
}

#[test]
fn test_rating_thresholds() {
    assert_eq!(analysis::consistency(7), Rating::High);
    assert_eq!(analysis::consistency(3), Rating::Medium);
    assert_eq!(analysis::consistency(2), Rating::Low);
    assert_eq!(analysis::intensity(240.0), Rating::High);
    assert_eq!(analysis::intensity(120.0), Rating::Medium);
    assert_eq!(analysis::intensity(119.9), Rating::Low);
}

#[test]
fn test_emergency_plan_honours_drill_period() {
    use studyplan_lib::resources::ResourceType;
    let engine = AdaptiveEngine::default();
    let mut user = profile().with_period("drill-phase");
    let plan = engine.generate_emergency(&mut user, &store(), None, now()).unwrap();

    let suggestions: Vec<_> = plan.plan.resources.values().flatten().collect();
    assert!(!suggestions.is_empty());
    assert!(suggestions.iter().all(|r| r.resource_type.is_drill_material()));
    assert!(suggestions.iter().all(|r| r.resource_type != ResourceType::Book));
    let titles: Vec<&str> = suggestions.iter().map(|r| r.title.as_str()).collect();
    assert!(plan.plan.blocks().all(|b| titles.contains(&b.resource.as_str())));
}

#[test]
fn test_emergency_plan_skips_excluded_anchor() {
    let engine = AdaptiveEngine::default();
    let mut user = profile();
    user.exclude_subjects = vec![Subject::TytMathematics];
    let plan = engine.generate_emergency(&mut user, &store(), None, now()).unwrap();
    assert!(plan.plan.blocks().all(|b| b.subject == Subject::AytMathematics));
    assert_eq!(plan.plan.block_count(), 6);
    assert!(!plan.plan.resources.contains_key("TYT Mathematics"));
}

#[test]
fn test_emergency_plan_with_every_anchor_excluded_is_empty() {
    let engine = AdaptiveEngine::default();
    let mut user = profile();
    user.exclude_subjects = vec![Subject::TytMathematics, Subject::AytMathematics];
    let plan = engine.generate_emergency(&mut user, &store(), None, now()).unwrap();

    assert_eq!(plan.plan.days.len(), 7);
    assert_eq!(plan.plan.block_count(), 0);
    assert_eq!(plan.plan.meta.study_days, 0);
    assert!(plan.plan.resources.is_empty());
    assert!(plan.plan.warnings.iter().any(|w| w.contains("review anchor is excluded")));
    assert!(plan.block_targets.is_empty());
}

#[test]
fn test_block_targets_follow_difficulty_and_history() {
    use studyplan_lib::adaptive::{AdaptationReason, targets};
    let engine = AdaptiveEngine::default();
    let mut history = store();
    fold(&mut history, "tyt_turkish_grammar", 10, 3, now());
    fold(&mut history, "tyt_science_cells", 10, 9, now());

    let plan = engine
        .generate(&mut profile(), &history, None, &[], now(), &mut StdRng::seed_from_u64(8))
        .unwrap();
    assert_eq!(plan.block_targets.len(), plan.plan.block_count());

    for block in plan.plan.blocks() {
        let target = plan.target_for(&block.id).unwrap();
        assert_eq!(target.question_count, targets::question_count(block.duration_minutes, block.difficulty));
        let expected = match block.subject {
            // Strong and not a focus area
            Subject::TytScience => Some(AdaptationReason::StrongArea),
            // Field basics and the weak Turkish topic are focus areas
            _ => Some(AdaptationReason::FocusArea),
        };
        assert_eq!(target.reason, expected, "{}", block.subject);
    }
    let mut weak_only = store();
    fold(&mut weak_only, "tyt_turkish_grammar", 10, 2, now());
    // Never practised: the overall rate decides
    assert_eq!(targets::reason_for(Subject::TytScience, &[], &weak_only), Some(AdaptationReason::LowSuccess));
    assert_eq!(targets::reason_for(Subject::TytScience, &[], &store()), None);

    // 90 minutes of easy Turkish work at 1.5 minutes a question
    let turkish = plan.plan.blocks().find(|b| b.subject == Subject::TytTurkish).unwrap();
    assert_eq!(turkish.difficulty, Difficulty::Easy);
    assert_eq!(plan.target_for(&turkish.id).unwrap().question_count, 60);
}

#[test]
fn test_block_targets_without_history_have_no_reason_outside_focus() {
    let engine = AdaptiveEngine::default();
    let plan = engine
        .generate(&mut profile(), &store(), None, &[], now(), &mut StdRng::seed_from_u64(8))
        .unwrap();
    let turkish = plan.plan.blocks().find(|b| b.subject == Subject::TytTurkish).unwrap();
    assert_eq!(plan.target_for(&turkish.id).unwrap().reason, None);
    // Intermediate level, medium difficulty
    assert_eq!(plan.target_for(&turkish.id).unwrap().question_count, 45);
}

#[test]
fn test_adaptive_plan_json_round_trip() {
    let engine = AdaptiveEngine::default();
    let mut history = store();
    fold(&mut history, "ayt_physics_optics", 9, 7, now() - Duration::days(3));
    fold(&mut history, "tyt_mathematics_functions", 13, 5, now());
    let plan = engine
        .generate(&mut profile().with_daily_minutes(200), &history, None, &[], now(), &mut StdRng::seed_from_u64(21))
        .unwrap();
    assert!(plan.insights.success_rate.fract() != 0.0);

    let json = serde_json::to_string(&plan).unwrap();
    let restored: studyplan_lib::AdaptivePlan = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, plan);
}
