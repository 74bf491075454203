use studyplan_lib::curriculum::Subject;
use studyplan_lib::profile::{Field, Level};
use studyplan_lib::resources::{ResourceCatalog, ResourceType};

#[test]
fn test_curated_lookup_is_priority_ordered() {
    let catalog = ResourceCatalog::default();
    let lookup = catalog.lookup(Subject::TytMathematics, Level::Intermediate, None);
    assert!(!lookup.degraded);
    assert_eq!(lookup.suggestions.len(), 3);
    let priorities: Vec<u8> = lookup.suggestions.iter().map(|r| r.priority).collect();
    assert_eq!(priorities, vec![5, 4, 3]);
    assert_eq!(lookup.suggestions[0].provenance, "3D Publishing");
}

#[test]
fn test_uncurated_subject_gets_placeholders() {
    let catalog = ResourceCatalog::default();
    let lookup = catalog.lookup(Subject::AytBiology, Level::Beginner, None);
    assert!(lookup.degraded);
    assert_eq!(lookup.suggestions.len(), 3);
    assert!(lookup.suggestions.iter().all(|r| r.provenance == "Generic"));
    assert!(lookup.suggestions[0].title.contains("AYT Biology"));

    // Deterministic
    assert_eq!(lookup, catalog.lookup(Subject::AytBiology, Level::Beginner, None));
}

#[test]
fn test_drill_period_filters_types() {
    let catalog = ResourceCatalog::default();
    let lookup = catalog.lookup(Subject::AytChemistry, Level::Intermediate, Some("drill-phase"));
    assert!(!lookup.degraded);
    assert_eq!(lookup.suggestions.len(), 1);
    assert_eq!(lookup.suggestions[0].resource_type, ResourceType::QuestionBank);

    let lookup = catalog.lookup(Subject::AytLiterature, Level::Intermediate, Some("SEP-NOV"));
    assert_eq!(lookup.suggestions.len(), 1);
    assert_eq!(lookup.suggestions[0].resource_type, ResourceType::OnlineCourse);
}

#[test]
fn test_drill_filter_applies_to_placeholders() {
    let catalog = ResourceCatalog::default();
    let lookup = catalog.lookup(Subject::AytHistory, Level::Advanced, Some("drill-phase"));
    assert!(lookup.degraded);
    assert_eq!(lookup.suggestions.len(), 2);
    assert!(lookup.suggestions.iter().all(|r| r.resource_type.is_drill_material()));
}

#[test]
fn test_filter_emptying_curated_set_degrades() {
    let catalog = ResourceCatalog::new(vec!["cram".to_string()]);
    // Only a video and a book are curated here
    let lookup = catalog.lookup(Subject::AytPhysics, Level::Beginner, Some("cram"));
    assert!(lookup.degraded);
    assert!(lookup.suggestions.iter().all(|r| r.resource_type.is_drill_material()));
}

#[test]
fn test_unknown_period_does_not_filter() {
    let catalog = ResourceCatalog::default();
    assert!(!catalog.is_drill_period(Some("summer")));
    assert!(!catalog.is_drill_period(None));
    let lookup = catalog.lookup(Subject::TytTurkish, Level::Intermediate, Some("summer"));
    assert!(lookup.suggestions.iter().any(|r| r.resource_type == ResourceType::Video));
}

#[test]
fn test_field_suggestions_cover_curriculum_minus_excluded() {
    let catalog = ResourceCatalog::default();
    let map = catalog.suggestions_for_field(Field::Humanities, Level::Beginner, None, &[Subject::AytPhilosophy]);
    assert_eq!(map.len(), 5);
    assert!(map.contains_key("TYT Turkish"));
    assert!(!map.contains_key("AYT Philosophy"));
    assert!(map.values().all(|list| !list.is_empty()));
}

#[test]
fn test_suggestion_serializes_type_in_kebab_case() {
    let catalog = ResourceCatalog::default();
    let lookup = catalog.lookup(Subject::TytMathematics, Level::Beginner, None);
    let json = serde_json::to_value(&lookup.suggestions[1]).unwrap();
    assert_eq!(json["type"], "question-bank");
    assert_eq!(json["difficulty"], "easy");
}
