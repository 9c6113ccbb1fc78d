//! Orientation persistence — pluggable store behind a trait.
//!
//! Default: `PgOrientationStore` (sqlx on PostgreSQL).
//! `AppState` holds an `Arc<dyn OrientationStore>` so handlers never touch SQL directly.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::orientation::{
    CareerRow, OptionRow, QuestionRow, QuestionWithOptions, SchoolProgramMatch, StoredResultRow,
    TestDefinition, TestRow,
};
use crate::orientation::models::TestResult;

#[async_trait]
pub trait OrientationStore: Send + Sync {
    async fn list_tests(&self) -> Result<Vec<TestRow>, AppError>;

    /// Test with its questions and options. `AppError::NotFound` when absent.
    async fn get_test(&self, test_id: Uuid) -> Result<TestDefinition, AppError>;

    async fn list_careers(&self, sector: Option<&str>, limit: i64)
        -> Result<Vec<CareerRow>, AppError>;

    async fn get_career(&self, career_id: Uuid) -> Result<CareerRow, AppError>;

    /// Active careers whose `related_traits` overlap any of `traits` (exact spellings).
    async fn careers_by_traits(&self, traits: &[String], limit: i64)
        -> Result<Vec<CareerRow>, AppError>;

    async fn matching_school_programs(&self, limit: i64)
        -> Result<Vec<SchoolProgramMatch>, AppError>;

    async fn create_session(&self, user_id: Uuid, test_id: Uuid) -> Result<Uuid, AppError>;

    async fn complete_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        responses: &Value,
        result: &TestResult,
    ) -> Result<(), AppError>;

    async fn user_results(&self, user_id: Uuid) -> Result<Vec<StoredResultRow>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL implementation
// ────────────────────────────────────────────────────────────────────────────

const CAREER_COLUMNS: &str = r#"
    id, name, COALESCE(description, '') AS description, sector_name, image_url,
    COALESCE(required_skills, '{}') AS required_skills,
    COALESCE(related_traits, '{}') AS related_traits,
    education_path, salary_min_fcfa, salary_max_fcfa, salary_avg_fcfa, salary_note,
    job_demand, growth_trend, outlook_description,
    COALESCE(top_employers, '{}') AS top_employers,
    COALESCE(entrepreneurship_potential, FALSE) AS entrepreneurship_potential
"#;

pub struct PgOrientationStore {
    pool: PgPool,
}

impl PgOrientationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrientationStore for PgOrientationStore {
    async fn list_tests(&self) -> Result<Vec<TestRow>, AppError> {
        let tests = sqlx::query_as::<_, TestRow>(
            r#"
            SELECT id, name, description, type, duration_minutes, image_url,
                   is_active, display_order
            FROM orientation_tests
            WHERE is_active = TRUE
            ORDER BY display_order ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tests)
    }

    async fn get_test(&self, test_id: Uuid) -> Result<TestDefinition, AppError> {
        let test: Option<TestRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, type, duration_minutes, image_url,
                   is_active, display_order
            FROM orientation_tests
            WHERE id = $1
            "#,
        )
        .bind(test_id)
        .fetch_optional(&self.pool)
        .await?;

        let test = test.ok_or_else(|| AppError::NotFound(format!("Test {test_id} not found")))?;

        let questions: Vec<QuestionRow> = sqlx::query_as(
            r#"
            SELECT id, test_id, question_text, question_type, category, display_order
            FROM test_questions
            WHERE test_id = $1
            ORDER BY display_order ASC
            "#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        let question_ids: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
        let options: Vec<OptionRow> = sqlx::query_as(
            r#"
            SELECT id, question_id, option_text, option_value, icon, emoji, display_order
            FROM question_options
            WHERE question_id = ANY($1)
            ORDER BY display_order ASC
            "#,
        )
        .bind(&question_ids)
        .fetch_all(&self.pool)
        .await?;

        let questions = questions
            .into_iter()
            .map(|question| {
                let options = options
                    .iter()
                    .filter(|o| o.question_id == question.id)
                    .cloned()
                    .collect();
                QuestionWithOptions { question, options }
            })
            .collect();

        Ok(TestDefinition { test, questions })
    }

    async fn list_careers(
        &self,
        sector: Option<&str>,
        limit: i64,
    ) -> Result<Vec<CareerRow>, AppError> {
        let sql = format!(
            "SELECT {CAREER_COLUMNS} FROM careers \
             WHERE is_active = TRUE AND ($1::text IS NULL OR sector_name = $1) \
             ORDER BY name ASC LIMIT $2"
        );
        let careers = sqlx::query_as::<_, CareerRow>(&sql)
            .bind(sector)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(careers)
    }

    async fn get_career(&self, career_id: Uuid) -> Result<CareerRow, AppError> {
        let sql = format!("SELECT {CAREER_COLUMNS} FROM careers WHERE id = $1");
        let career: Option<CareerRow> = sqlx::query_as(&sql)
            .bind(career_id)
            .fetch_optional(&self.pool)
            .await?;
        career.ok_or_else(|| AppError::NotFound(format!("Career {career_id} not found")))
    }

    async fn careers_by_traits(
        &self,
        traits: &[String],
        limit: i64,
    ) -> Result<Vec<CareerRow>, AppError> {
        let careers = sqlx::query_as::<_, CareerRow>(&careers_by_traits_sql())
            .bind(traits)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(careers)
    }

    async fn matching_school_programs(
        &self,
        limit: i64,
    ) -> Result<Vec<SchoolProgramMatch>, AppError> {
        let programs = sqlx::query_as::<_, SchoolProgramMatch>(
            r#"
            SELECT p.id AS program_id, p.name AS program_name, p.level AS program_level,
                   p.duration_years AS program_duration, s.id AS school_id,
                   s.name AS school_name, s.city AS school_city,
                   s.logo_url AS school_logo_url, s.type AS school_type
            FROM school_programs p
            JOIN schools s ON s.id = p.school_id
            WHERE p.is_active = TRUE AND s.is_active = TRUE
            ORDER BY s.name ASC, p.name ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(programs)
    }

    async fn create_session(&self, user_id: Uuid, test_id: Uuid) -> Result<Uuid, AppError> {
        let session_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO test_sessions (id, user_id, test_id, status, started_at)
            VALUES ($1, $2, $3, 'in_progress', NOW())
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(test_id)
        .execute(&self.pool)
        .await?;

        info!("Created test session {session_id} for user {user_id}");
        Ok(session_id)
    }

    async fn complete_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        responses: &Value,
        result: &TestResult,
    ) -> Result<(), AppError> {
        let scores = serde_json::to_value(&result.scores).map_err(anyhow::Error::from)?;
        let interpretation = result
            .interpretation_value()
            .map_err(anyhow::Error::from)?;
        let recommendations = serde_json::to_value(&result.recommendations)
            .map_err(anyhow::Error::from)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE test_sessions
            SET status = 'completed', completed_at = NOW(), responses = $1
            WHERE id = $2 AND user_id = $3
            "#,
        )
        .bind(responses)
        .bind(session_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO test_results
                (session_id, test_id, user_id, scores, dominant_traits,
                 recommendations, interpretation, calculated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            "#,
        )
        .bind(session_id)
        .bind(result.test_id)
        .bind(user_id)
        .bind(scores)
        .bind(&result.dominant_traits)
        .bind(recommendations)
        .bind(interpretation)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn user_results(&self, user_id: Uuid) -> Result<Vec<StoredResultRow>, AppError> {
        let rows = sqlx::query_as::<_, StoredResultRow>(
            r#"
            SELECT session_id, test_id, user_id, scores, dominant_traits,
                   interpretation, calculated_at
            FROM test_results
            WHERE user_id = $1
            ORDER BY calculated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Careers sharing at least one trait spelling. Ordered so a limited fetch is stable.
fn careers_by_traits_sql() -> String {
    format!(
        "SELECT {CAREER_COLUMNS} FROM careers \
         WHERE is_active = TRUE AND related_traits && $1 \
         ORDER BY name ASC LIMIT $2"
    )
}
