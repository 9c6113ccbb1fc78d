use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::orientation::{CareerRow, SchoolProgramMatch};

/// Raw answers keyed by question id. Values are JSON-ish: strings, numbers, null.
pub type Responses = Map<String, Value>;

/// Trait name → percentage in `[0, 100]`, one decimal.
pub type ScoreMap = BTreeMap<String, f64>;

/// Dominant trait used when the computation itself failed.
pub const COMPUTATION_ERROR_TRAIT: &str = "Erreur de calcul";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraitDetail {
    pub score: f64,
    pub description: String,
}

/// Structured narrative generated from the dominant traits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Interpretation {
    pub profile_summary: String,
    /// RIASEC only: code letters of the dominant traits, e.g. `RIA`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_code: Option<String>,
    pub strengths: Vec<String>,
    pub work_style: String,
    pub advice: String,
    pub recommended_sectors: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub trait_details: BTreeMap<String, TraitDetail>,
}

/// A career ranked against a user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub sector_name: String,
    pub job_demand: Option<String>,
    pub salary_avg_fcfa: Option<i64>,
    pub image_url: Option<String>,
    pub match_score: f64,
    pub matching_traits: Vec<String>,
    pub required_skills: Vec<String>,
    pub related_traits: Vec<String>,
    pub education_minimum_level: Option<String>,
    pub salary_min_fcfa: Option<i64>,
    pub salary_max_fcfa: Option<i64>,
}

impl CareerSummary {
    /// Listing view: no match data, full skill list.
    pub fn from_row(row: &CareerRow) -> Self {
        CareerSummary {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            sector_name: row.sector_name.clone(),
            job_demand: row.job_demand.clone(),
            salary_avg_fcfa: row.salary_avg_fcfa,
            image_url: row.image_url.clone(),
            match_score: 0.0,
            matching_traits: vec![],
            required_skills: row.required_skills.clone(),
            related_traits: row.related_traits.clone(),
            education_minimum_level: Some(row.education_minimum_level()),
            salary_min_fcfa: row.salary_min_fcfa,
            salary_max_fcfa: row.salary_max_fcfa,
        }
    }
}

/// Outcome of one submission.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub test_id: Uuid,
    pub scores: ScoreMap,
    pub dominant_traits: Vec<String>,
    pub recommendations: Vec<CareerSummary>,
    /// `None` only for the degraded result; serialized as `{}`.
    #[serde(serialize_with = "serialize_interpretation")]
    pub interpretation: Option<Interpretation>,
    pub matching_programs: Vec<SchoolProgramMatch>,
}

impl TestResult {
    /// Lowest-common-denominator result returned when scoring fails unexpectedly.
    pub fn computation_error(test_id: Uuid) -> Self {
        TestResult {
            test_id,
            scores: ScoreMap::new(),
            dominant_traits: vec![COMPUTATION_ERROR_TRAIT.to_string()],
            recommendations: vec![],
            interpretation: None,
            matching_programs: vec![],
        }
    }

    /// Interpretation as stored alongside the result; `{}` for the degraded result,
    /// the same shape the HTTP response carries.
    pub fn interpretation_value(&self) -> serde_json::Result<Value> {
        match &self.interpretation {
            Some(interpretation) => serde_json::to_value(interpretation),
            None => Ok(Value::Object(Map::new())),
        }
    }

    pub fn recommended_sectors(&self) -> &[String] {
        self.interpretation
            .as_ref()
            .map(|i| i.recommended_sectors.as_slice())
            .unwrap_or(&[])
    }
}

fn serialize_interpretation<S: Serializer>(
    interpretation: &Option<Interpretation>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match interpretation {
        Some(i) => i.serialize(serializer),
        None => Map::new().serialize(serializer),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    pub user_id: Uuid,
    pub responses: Responses,
}
