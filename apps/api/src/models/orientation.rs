use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::orientation::family::TestFamily;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub test_type: String,
    pub duration_minutes: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
}

impl TestRow {
    pub fn family(&self) -> TestFamily {
        TestFamily::parse(&self.test_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub test_id: Uuid,
    pub question_text: String,
    pub question_type: String,
    pub category: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OptionRow {
    pub id: Uuid,
    pub question_id: Uuid,
    pub option_text: String,
    pub option_value: Option<String>,
    pub icon: Option<String>,
    pub emoji: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionWithOptions {
    #[serde(flatten)]
    pub question: QuestionRow,
    pub options: Vec<OptionRow>,
}

/// A test with its ordered questions; the source of the question → category map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDefinition {
    #[serde(flatten)]
    pub test: TestRow,
    pub questions: Vec<QuestionWithOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub sector_name: String,
    pub image_url: Option<String>,
    pub required_skills: Vec<String>,
    /// Mixed encodings: accented French, English or unaccented French.
    pub related_traits: Vec<String>,
    pub education_path: Option<Value>,
    pub salary_min_fcfa: Option<i64>,
    pub salary_max_fcfa: Option<i64>,
    pub salary_avg_fcfa: Option<i64>,
    pub salary_note: Option<String>,
    pub job_demand: Option<String>,
    pub growth_trend: Option<String>,
    pub outlook_description: Option<String>,
    pub top_employers: Vec<String>,
    pub entrepreneurship_potential: bool,
}

impl CareerRow {
    /// Minimum education level from the `education_path` document; `BAC` when absent.
    /// Older rows store the document as a JSON string.
    pub fn education_minimum_level(&self) -> String {
        let parsed;
        let path = match &self.education_path {
            Some(Value::String(raw)) => {
                parsed = serde_json::from_str::<Value>(raw).ok();
                parsed.as_ref()
            }
            other => other.as_ref(),
        };
        path.and_then(|p| p.get("minimum_level"))
            .and_then(Value::as_str)
            .unwrap_or("BAC")
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SchoolProgramMatch {
    pub program_id: Uuid,
    pub program_name: String,
    pub program_level: Option<String>,
    pub program_duration: Option<i32>,
    pub school_id: Uuid,
    pub school_name: String,
    pub school_city: Option<String>,
    pub school_logo_url: Option<String>,
    pub school_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredResultRow {
    pub session_id: Uuid,
    pub test_id: Uuid,
    pub user_id: Uuid,
    pub scores: Value,
    pub dominant_traits: Vec<String>,
    pub interpretation: Value,
    pub calculated_at: DateTime<Utc>,
}
