use std::collections::{BTreeMap, HashMap};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use crate::curriculum::{self, Subject};
use crate::profile::{Difficulty, Field, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    Book,
    Video,
    QuestionBank,
    OnlineCourse,
    PracticeTest,
}

impl ResourceType {
    /// Types kept during an intensive drilling period.
    pub fn is_drill_material(&self) -> bool {
        matches!(self, ResourceType::QuestionBank | ResourceType::OnlineCourse)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSuggestion {
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub difficulty: Difficulty,
    pub estimated_hours: u32,
    /// 1-5, 5 is the strongest recommendation
    pub priority: u8,
    /// Publisher or channel
    pub provenance: String,
}

/// Result of a catalog lookup. `degraded` marks a generic placeholder set.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLookup {
    pub suggestions: Vec<ResourceSuggestion>,
    pub degraded: bool,
}

fn entry(
    title: &str,
    resource_type: ResourceType,
    difficulty: Difficulty,
    estimated_hours: u32,
    priority: u8,
    provenance: &str,
) -> ResourceSuggestion {
    ResourceSuggestion {
        title: title.to_string(),
        resource_type,
        difficulty,
        estimated_hours,
        priority,
        provenance: provenance.to_string(),
    }
}

lazy_static! {
    /// Curated resources keyed by subject and level.
    static ref CURATED: HashMap<(Subject, Level), Vec<ResourceSuggestion>> = {
        use Difficulty::*;
        use Level::*;
        use ResourceType::*;
        let mut m = HashMap::new();

        m.insert((Subject::TytMathematics, Beginner), vec![
            entry("TYT Mathematics Topic Guide", Book, Easy, 60, 5, "Limit Publishing"),
            entry("TYT Mathematics Question Bank (Fundamentals)", QuestionBank, Easy, 40, 4, "Karekok Publishing"),
            entry("TYT Mathematics Video Course", OnlineCourse, Easy, 30, 3, "Tonguc Academy"),
        ]);
        m.insert((Subject::TytMathematics, Intermediate), vec![
            entry("TYT Mathematics Intermediate Question Bank", QuestionBank, Medium, 45, 5, "3D Publishing"),
            entry("Tonguc TYT Mathematics", Book, Medium, 50, 4, "Tonguc Academy"),
            entry("TYT Mathematics Problem Walkthroughs", Video, Medium, 20, 3, "Rehber Matematik"),
        ]);
        m.insert((Subject::TytMathematics, Advanced), vec![
            entry("TYT Mathematics Advanced Problems", QuestionBank, Hard, 50, 5, "Palme Publishing"),
            entry("TYT Full-Length Mock Exams", PracticeTest, Hard, 15, 4, "Ozdebir"),
        ]);

        m.insert((Subject::AytMathematics, Beginner), vec![
            entry("AYT Mathematics Foundations", Book, Easy, 70, 5, "Limit Publishing"),
            entry("AYT Mathematics Starter Course", OnlineCourse, Easy, 35, 4, "Khan Academy"),
        ]);
        m.insert((Subject::AytMathematics, Intermediate), vec![
            entry("AYT Mathematics Question Bank", QuestionBank, Medium, 55, 5, "Karekok Publishing"),
            entry("AYT Calculus Lectures", Video, Medium, 25, 3, "Rehber Matematik"),
        ]);
        m.insert((Subject::AytMathematics, Advanced), vec![
            entry("AYT Mathematics Advanced Question Bank", QuestionBank, Hard, 60, 5, "Palme Publishing"),
            entry("AYT Mathematics Mock Exams", PracticeTest, Hard, 15, 4, "Ozdebir"),
        ]);

        m.insert((Subject::AytPhysics, Beginner), vec![
            entry("AYT Physics Topic Guide", Book, Easy, 55, 5, "Final Publishing"),
            entry("Everyday Physics Videos", Video, Easy, 15, 3, "Fizik Kurdu"),
        ]);
        m.insert((Subject::AytPhysics, Intermediate), vec![
            entry("AYT Physics Question Bank", QuestionBank, Medium, 45, 5, "Okyanus Publishing"),
            entry("AYT Physics Problem Solving Course", OnlineCourse, Medium, 30, 4, "Fizik Kurdu"),
        ]);
        m.insert((Subject::AytPhysics, Advanced), vec![
            entry("AYT Physics Advanced Problems", QuestionBank, Hard, 50, 5, "Gur Publishing"),
        ]);

        m.insert((Subject::TytTurkish, Beginner), vec![
            entry("TYT Turkish Topic Guide", Book, Easy, 40, 5, "Puan Publishing"),
            entry("Paragraph Reading Drills", QuestionBank, Easy, 25, 4, "Limit Publishing"),
        ]);
        m.insert((Subject::TytTurkish, Intermediate), vec![
            entry("TYT Turkish Question Bank", QuestionBank, Medium, 38, 5, "Baska Publishing"),
            entry("TYT Turkish Grammar Lectures", Video, Medium, 20, 3, "Rustu Hoca"),
        ]);
        m.insert((Subject::TytTurkish, Advanced), vec![
            entry("TYT Turkish Advanced Text Analysis", QuestionBank, Hard, 42, 5, "Acil Publishing"),
        ]);

        m.insert((Subject::AytChemistry, Intermediate), vec![
            entry("AYT Chemistry Question Bank", QuestionBank, Medium, 45, 5, "Orbital Publishing"),
            entry("AYT Chemistry Concept Videos", Video, Medium, 20, 3, "Benim Hocam"),
        ]);
        m.insert((Subject::AytLiterature, Intermediate), vec![
            entry("AYT Literature Topic Guide", Book, Medium, 40, 5, "Limit Publishing"),
            entry("AYT Literature Online Course", OnlineCourse, Medium, 25, 4, "Benim Hocam"),
        ]);

        m
    };
}

/// Deterministic stand-ins for subjects without curated material.
fn placeholders(subject: Subject, level: Level) -> Vec<ResourceSuggestion> {
    let difficulty = level.default_difficulty();
    vec![
        entry(&format!("{} Study Material", subject.name()), ResourceType::Book, difficulty, 30, 3, "Generic"),
        entry(&format!("{} Practice Questions", subject.name()), ResourceType::QuestionBank, difficulty, 20, 3, "Generic"),
        entry(&format!("{} Online Lessons", subject.name()), ResourceType::OnlineCourse, difficulty, 15, 2, "Generic"),
    ]
}

/// Ranked resource lookup for (subject, level, period).
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    drill_periods: Vec<String>,
}

impl ResourceCatalog {
    pub fn new(drill_periods: Vec<String>) -> Self {
        ResourceCatalog { drill_periods }
    }

    pub fn is_drill_period(&self, period: Option<&str>) -> bool {
        period.map_or(false, |tag| {
            self.drill_periods.iter().any(|p| p.eq_ignore_ascii_case(tag.trim()))
        })
    }

    /// Suggestions for one subject, highest priority first. Never empty.
    pub fn lookup(&self, subject: Subject, level: Level, period: Option<&str>) -> CatalogLookup {
        let drilling = self.is_drill_period(period);
        let keep = |r: &ResourceSuggestion| !drilling || r.resource_type.is_drill_material();

        let mut suggestions: Vec<ResourceSuggestion> = CURATED
            .get(&(subject, level))
            .map(|list| list.iter().filter(|r| keep(r)).cloned().collect())
            .unwrap_or_default();

        let degraded = suggestions.is_empty();
        if degraded {
            tracing::debug!(subject = %subject, level = %level, drilling, "No curated resources, using placeholders");
            suggestions = placeholders(subject, level).into_iter().filter(|r| keep(r)).collect();
        }

        // Stable sort keeps curated order among equal priorities
        suggestions.sort_by(|a, b| b.priority.cmp(&a.priority));
        CatalogLookup { suggestions, degraded }
    }

    /// Subject-keyed suggestions for the whole curriculum of a field.
    pub fn suggestions_for_field(
        &self,
        field: Field,
        level: Level,
        period: Option<&str>,
        excluded: &[Subject],
    ) -> BTreeMap<String, Vec<ResourceSuggestion>> {
        curriculum::curriculum(field)
            .iter()
            .filter(|s| !excluded.contains(s))
            .map(|s| (s.name().to_string(), self.lookup(*s, level, period).suggestions))
            .collect()
    }
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        ResourceCatalog::new(crate::config::PlannerPolicy::default().resources.drill_periods)
    }
}
