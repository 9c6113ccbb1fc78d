use serde::{Deserialize, Serialize};

/// Test family, as stored in the `type` column of a test.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TestFamily {
    Riasec,
    Personality,
    Skills,
    Interests,
    Aptitude,
    #[serde(other)]
    Unknown,
}

/// How a family is scored. Skills, interests, aptitude and unknown families share
/// the generic path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringKind {
    Riasec,
    Personality,
    Generic,
}

impl TestFamily {
    /// Total parse: anything unrecognised becomes `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "riasec" => TestFamily::Riasec,
            "personality" => TestFamily::Personality,
            "skills" => TestFamily::Skills,
            "interests" => TestFamily::Interests,
            "aptitude" => TestFamily::Aptitude,
            _ => TestFamily::Unknown,
        }
    }

    pub fn scoring_kind(self) -> ScoringKind {
        match self {
            TestFamily::Riasec => ScoringKind::Riasec,
            TestFamily::Personality => ScoringKind::Personality,
            TestFamily::Skills
            | TestFamily::Interests
            | TestFamily::Aptitude
            | TestFamily::Unknown => ScoringKind::Generic,
        }
    }
}
