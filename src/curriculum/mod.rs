//! Static exam curriculum: subjects, the per-field day distribution table,
//! review anchors and topic lists.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::PlanError;
use crate::profile::{Field, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Subject {
    TytMathematics,
    TytTurkish,
    TytScience,
    TytSocialSciences,
    AytMathematics,
    AytPhysics,
    AytChemistry,
    AytBiology,
    AytLiterature,
    AytHistory,
    AytGeography,
    AytPhilosophy,
}

impl Subject {
    pub const ALL: [Subject; 12] = [
        Subject::TytMathematics,
        Subject::TytTurkish,
        Subject::TytScience,
        Subject::TytSocialSciences,
        Subject::AytMathematics,
        Subject::AytPhysics,
        Subject::AytChemistry,
        Subject::AytBiology,
        Subject::AytLiterature,
        Subject::AytHistory,
        Subject::AytGeography,
        Subject::AytPhilosophy,
    ];

    /// Display name, also the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Subject::TytMathematics => "TYT Mathematics",
            Subject::TytTurkish => "TYT Turkish",
            Subject::TytScience => "TYT Science",
            Subject::TytSocialSciences => "TYT Social Sciences",
            Subject::AytMathematics => "AYT Mathematics",
            Subject::AytPhysics => "AYT Physics",
            Subject::AytChemistry => "AYT Chemistry",
            Subject::AytBiology => "AYT Biology",
            Subject::AytLiterature => "AYT Literature",
            Subject::AytHistory => "AYT History",
            Subject::AytGeography => "AYT Geography",
            Subject::AytPhilosophy => "AYT Philosophy",
        }
    }

    /// Identifier prefix used in topic ids, e.g. `ayt_physics_optics`.
    pub fn id(&self) -> &'static str {
        match self {
            Subject::TytMathematics => "tyt_mathematics",
            Subject::TytTurkish => "tyt_turkish",
            Subject::TytScience => "tyt_science",
            Subject::TytSocialSciences => "tyt_social",
            Subject::AytMathematics => "ayt_mathematics",
            Subject::AytPhysics => "ayt_physics",
            Subject::AytChemistry => "ayt_chemistry",
            Subject::AytBiology => "ayt_biology",
            Subject::AytLiterature => "ayt_literature",
            Subject::AytHistory => "ayt_history",
            Subject::AytGeography => "ayt_geography",
            Subject::AytPhilosophy => "ayt_philosophy",
        }
    }

    /// Subject owning a topic id, matched on the id prefix.
    pub fn from_topic_id(topic_id: &str) -> Option<Subject> {
        let lowered = topic_id.to_ascii_lowercase();
        Subject::ALL
            .iter()
            .copied()
            .find(|s| lowered == s.id() || lowered.starts_with(&format!("{}_", s.id())))
    }

    /// Topics studied at a level. Empty when the subject has no curated list.
    pub fn topics(&self, level: Level) -> &'static [&'static str] {
        use Level::*;
        match (self, level) {
            (Subject::TytMathematics, Beginner) => &["Basic operations", "Algebraic expressions", "Functions"],
            (Subject::TytMathematics, Intermediate) => &["Trigonometry", "Logarithms", "Sequences"],
            (Subject::TytMathematics, Advanced) => &["Derivatives", "Integrals", "Analytic geometry"],
            (Subject::AytMathematics, Beginner) => &["Limits", "Continuity", "Definition of the derivative"],
            (Subject::AytMathematics, Intermediate) => &["Applications of derivatives", "Integrals", "Analytic geometry"],
            (Subject::AytMathematics, Advanced) => &["Applications of integrals", "Series", "Probability"],
            (Subject::AytPhysics, Beginner) => &["Force and motion", "Energy", "Momentum"],
            (Subject::AytPhysics, Intermediate) => &["Electricity", "Magnetism", "Waves"],
            (Subject::AytPhysics, Advanced) => &["Modern physics", "Atomic physics", "Optics"],
            (Subject::TytTurkish, Beginner) => &["Grammar", "Word meaning"],
            (Subject::TytTurkish, _) => &["Paragraph comprehension", "Sentence meaning", "Grammar"],
            (Subject::AytChemistry, _) => &["Atomic structure", "Chemical bonds", "Solutions", "Acids and bases"],
            (Subject::AytBiology, _) => &["Cell", "Genetics", "Nervous system", "Ecology"],
            (Subject::AytLiterature, _) => &["Divan literature", "Tanzimat period", "Modern Turkish literature"],
            (Subject::AytHistory, _) => &["Islamic history", "Ottoman history", "Modern era", "Principles of Ataturk"],
            (Subject::AytGeography, _) => &["Physical geography", "Human geography", "Geography of Turkey"],
            _ => &[],
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Subject {
    type Err = PlanError;

    /// Accepts the display name or the id, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Subject::ALL
            .iter()
            .copied()
            .find(|subject| {
                subject.name().eq_ignore_ascii_case(wanted) || subject.id().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| PlanError::validation(format!("unknown subject '{}'", wanted), "validate_params"))
    }
}

impl TryFrom<String> for Subject {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        subject.name().to_string()
    }
}

/// Day categories of a weekly plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayType {
    /// Foundation-track (TYT) day
    #[serde(rename = "Track-A")]
    TrackA,
    /// Field-track (AYT) day
    #[serde(rename = "Track-B")]
    TrackB,
    #[serde(rename = "Review")]
    Review,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayType::TrackA => "Track-A",
            DayType::TrackB => "Track-B",
            DayType::Review => "Review",
        };
        f.write_str(s)
    }
}

/// Every subject a field studies, in priority order.
pub fn curriculum(field: Field) -> &'static [Subject] {
    use Subject::*;
    match field {
        Field::Quantitative => &[
            TytMathematics, TytTurkish, TytScience, TytSocialSciences,
            AytMathematics, AytPhysics, AytChemistry, AytBiology,
        ],
        Field::Balanced => &[
            TytMathematics, TytTurkish, TytScience, TytSocialSciences,
            AytMathematics, AytLiterature, AytHistory, AytGeography,
        ],
        Field::Humanities => &[
            TytTurkish, TytSocialSciences,
            AytLiterature, AytHistory, AytGeography, AytPhilosophy,
        ],
    }
}

/// The two subjects a field revisits on review days.
pub fn anchors(field: Field) -> [Subject; 2] {
    match field {
        Field::Quantitative => [Subject::TytMathematics, Subject::AytMathematics],
        Field::Balanced => [Subject::TytMathematics, Subject::AytLiterature],
        Field::Humanities => [Subject::TytTurkish, Subject::AytLiterature],
    }
}

/// Block counts per subject for one day, in table order.
pub fn distribution(field: Field, day_type: DayType) -> Vec<(Subject, u32)> {
    use Subject::*;
    match (field, day_type) {
        (_, DayType::Review) => anchors(field).iter().map(|s| (*s, 2)).collect(),
        (Field::Quantitative, DayType::TrackA) => vec![(TytMathematics, 2), (TytScience, 1), (TytTurkish, 1)],
        (Field::Quantitative, DayType::TrackB) => vec![(AytMathematics, 2), (AytPhysics, 1), (AytChemistry, 1)],
        (Field::Balanced, DayType::TrackA) => vec![(TytMathematics, 2), (TytSocialSciences, 1), (TytTurkish, 1)],
        (Field::Balanced, DayType::TrackB) => vec![
            (AytMathematics, 1), (AytLiterature, 1), (AytHistory, 1), (AytGeography, 1),
        ],
        (Field::Humanities, DayType::TrackA) => vec![(TytTurkish, 2), (TytSocialSciences, 2)],
        (Field::Humanities, DayType::TrackB) => vec![
            (AytLiterature, 1), (AytHistory, 1), (AytGeography, 1), (AytPhilosophy, 1),
        ],
    }
}

/// Entry-level focus topics suggested for a field when no history exists.
pub fn field_basics(field: Field) -> &'static [&'static str] {
    match field {
        Field::Quantitative => &[
            "TYT Mathematics - Basic operations",
            "TYT Mathematics - Functions",
            "AYT Mathematics - Derivatives",
            "AYT Physics - Mechanics",
            "AYT Chemistry - Atomic structure",
        ],
        Field::Balanced => &[
            "TYT Mathematics - Basic operations",
            "TYT Social Sciences - History",
            "AYT Literature - Modern Turkish literature",
            "AYT History - Modern era",
            "AYT Geography - Human geography",
        ],
        Field::Humanities => &[
            "TYT Turkish - Grammar",
            "TYT Social Sciences - History",
            "AYT Literature - Divan literature",
            "AYT History - Islamic history",
            "AYT Geography - Physical geography",
        ],
    }
}

/// Human readable name for a topic id: `tyt_mathematics_functions` becomes
/// `TYT Mathematics - functions`. Unknown prefixes are returned unchanged.
pub fn topic_display_name(topic_id: &str) -> String {
    match Subject::from_topic_id(topic_id) {
        Some(subject) => {
            let rest = topic_id[subject.id().len()..].trim_start_matches('_').replace('_', " ");
            if rest.is_empty() {
                subject.name().to_string()
            } else {
                format!("{} - {}", subject.name(), rest)
            }
        }
        None => topic_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_days_fill_four_blocks() {
        for field in Field::ALL {
            for day in [DayType::TrackA, DayType::TrackB, DayType::Review] {
                let total: u32 = distribution(field, day).iter().map(|(_, n)| n).sum();
                assert_eq!(total, 4, "{:?} {:?}", field, day);
            }
        }
    }

    #[test]
    fn topic_names_from_ids() {
        assert_eq!(topic_display_name("tyt_mathematics_functions"), "TYT Mathematics - functions");
        assert_eq!(topic_display_name("ayt_physics"), "AYT Physics");
        assert_eq!(topic_display_name("custom-topic"), "custom-topic");
        assert_eq!(Subject::from_topic_id("AYT_PHYSICS_optics"), Some(Subject::AytPhysics));
    }
}
