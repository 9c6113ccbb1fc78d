use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::orientation::{CareerRow, StoredResultRow, TestDefinition, TestRow};
use crate::orientation::engine::calculate_result;
use crate::orientation::family::TestFamily;
use crate::orientation::matching::rank_careers;
use crate::orientation::models::{CareerSummary, SubmitRequest, TestResult};
use crate::orientation::repository::OrientationStore;
use crate::orientation::traits::{riasec_code_to_english, trait_search_variants};
use crate::state::AppState;

/// Candidate careers fetched per submission before ranking.
const CANDIDATE_CAREERS: i64 = 8;
const MATCHING_PROGRAMS: i64 = 8;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct CareerListQuery {
    pub sector: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct RecommendationQuery {
    /// Comma separated RIASEC codes, e.g. `R,I,A`.
    pub traits: String,
    pub limit: Option<i64>,
}

fn validate_limit(limit: Option<i64>, default: i64, max: i64) -> Result<i64, AppError> {
    let limit = limit.unwrap_or(default);
    if !(1..=max).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {max}"
        )));
    }
    Ok(limit)
}

/// GET /api/v1/orientation/tests
pub async fn handle_list_tests(
    State(state): State<AppState>,
) -> Result<Json<Vec<TestRow>>, AppError> {
    let tests = state.store.list_tests().await?;
    info!("Retrieved {} tests", tests.len());
    Ok(Json(tests))
}

/// GET /api/v1/orientation/tests/:test_id
pub async fn handle_get_test(
    State(state): State<AppState>,
    Path(test_id): Path<Uuid>,
) -> Result<Json<TestDefinition>, AppError> {
    Ok(Json(state.store.get_test(test_id).await?))
}

/// POST /api/v1/orientation/sessions/:test_id/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(test_id): Path<Uuid>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<TestResult>, AppError> {
    let definition = match state.store.get_test(test_id).await {
        Ok(definition) => Some(definition),
        Err(e) if e.is_not_found() => return Err(e),
        Err(e) => {
            warn!("Could not load test {test_id}, scoring as RIASEC without definition: {e}");
            None
        }
    };
    let family = definition
        .as_ref()
        .map(|d| d.test.family())
        .unwrap_or(TestFamily::Riasec);

    let responses = req.responses.clone();
    let mut result = score_off_thread(test_id, move || {
        calculate_result(test_id, family, &responses, definition.as_ref())
    })
    .await;

    if result.interpretation.is_some() && !result.dominant_traits.is_empty() {
        result.recommendations = recommend_careers(state.store.as_ref(), &result)
            .await
            .unwrap_or_else(|e| {
                error!("Error fetching recommended careers: {e}");
                vec![]
            });

        if !result.recommended_sectors().is_empty() {
            result.matching_programs = state
                .store
                .matching_school_programs(MATCHING_PROGRAMS)
                .await
                .unwrap_or_else(|e| {
                    error!("Error fetching matching school programs: {e}");
                    vec![]
                });
        }
    }

    let responses = Value::Object(req.responses);
    match save_submission(state.store.as_ref(), req.user_id, &responses, &result).await {
        Ok(session_id) => info!(
            %test_id,
            user_id = %req.user_id,
            %session_id,
            dominant_traits = ?result.dominant_traits,
            "Test submitted successfully"
        ),
        Err(e) => warn!("Could not save test results to DB: {e}"),
    }

    Ok(Json(result))
}

/// Runs CPU-only scoring off the async workers. A panic yields the degraded result.
async fn score_off_thread<F>(test_id: Uuid, score: F) -> TestResult
where
    F: FnOnce() -> TestResult + Send + 'static,
{
    tokio::task::spawn_blocking(score)
        .await
        .unwrap_or_else(|e| {
            error!("Error calculating result for test {test_id}: {e}");
            TestResult::computation_error(test_id)
        })
}

async fn recommend_careers(
    store: &dyn OrientationStore,
    result: &TestResult,
) -> Result<Vec<CareerSummary>, AppError> {
    let search = trait_search_variants(&result.dominant_traits);
    let candidates = store.careers_by_traits(&search, CANDIDATE_CAREERS).await?;
    Ok(rank_careers(
        &candidates,
        &result.dominant_traits,
        &result.scores,
    ))
}

async fn save_submission(
    store: &dyn OrientationStore,
    user_id: Uuid,
    responses: &Value,
    result: &TestResult,
) -> Result<Uuid, AppError> {
    let session_id = store.create_session(user_id, result.test_id).await?;
    store
        .complete_session(session_id, user_id, responses, result)
        .await?;
    Ok(session_id)
}

/// GET /api/v1/orientation/careers
pub async fn handle_list_careers(
    State(state): State<AppState>,
    Query(params): Query<CareerListQuery>,
) -> Result<Json<Vec<CareerSummary>>, AppError> {
    let limit = validate_limit(params.limit, 50, 100)?;
    let careers = state
        .store
        .list_careers(params.sector.as_deref(), limit)
        .await?;
    Ok(Json(careers.iter().map(CareerSummary::from_row).collect()))
}

/// GET /api/v1/orientation/careers/:career_id
pub async fn handle_get_career(
    State(state): State<AppState>,
    Path(career_id): Path<Uuid>,
) -> Result<Json<CareerRow>, AppError> {
    Ok(Json(state.store.get_career(career_id).await?))
}

/// GET /api/v1/orientation/recommendations?traits=R,I,A
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> Result<Json<Vec<CareerSummary>>, AppError> {
    let limit = validate_limit(params.limit, 10, 20)?;
    let traits: Vec<String> = params
        .traits
        .split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .map(|t| riasec_code_to_english(&t))
        .collect();

    if traits.is_empty() {
        return Err(AppError::Validation(
            "traits must list at least one RIASEC code".to_string(),
        ));
    }

    let careers = state
        .store
        .careers_by_traits(&trait_search_variants(&traits), limit)
        .await?;
    Ok(Json(careers.iter().map(CareerSummary::from_row).collect()))
}

/// GET /api/v1/orientation/results?user_id=
pub async fn handle_user_results(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<StoredResultRow>>, AppError> {
    Ok(Json(state.store.user_results(params.user_id).await?))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use chrono::Utc;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, Environment};
    use crate::models::orientation::{QuestionRow, QuestionWithOptions, SchoolProgramMatch};
    use crate::routes::build_router;

    #[derive(Default)]
    struct MemoryStore {
        tests: Vec<TestDefinition>,
        careers: Vec<CareerRow>,
        programs: Vec<SchoolProgramMatch>,
        fail_test_lookup: bool,
        fail_saves: bool,
        saved: Mutex<Vec<(Uuid, Value, Vec<String>)>>,
    }

    #[async_trait]
    impl OrientationStore for MemoryStore {
        async fn list_tests(&self) -> Result<Vec<TestRow>, AppError> {
            Ok(self
                .tests
                .iter()
                .filter(|t| t.test.is_active)
                .map(|t| t.test.clone())
                .collect())
        }

        async fn get_test(&self, test_id: Uuid) -> Result<TestDefinition, AppError> {
            if self.fail_test_lookup {
                return Err(AppError::Internal(anyhow::anyhow!("connection reset")));
            }
            self.tests
                .iter()
                .find(|t| t.test.id == test_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Test {test_id} not found")))
        }

        async fn list_careers(
            &self,
            sector: Option<&str>,
            limit: i64,
        ) -> Result<Vec<CareerRow>, AppError> {
            Ok(self
                .careers
                .iter()
                .filter(|c| sector.map_or(true, |s| c.sector_name == s))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn get_career(&self, career_id: Uuid) -> Result<CareerRow, AppError> {
            self.careers
                .iter()
                .find(|c| c.id == career_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Career {career_id} not found")))
        }

        async fn careers_by_traits(
            &self,
            traits: &[String],
            limit: i64,
        ) -> Result<Vec<CareerRow>, AppError> {
            Ok(self
                .careers
                .iter()
                .filter(|c| c.related_traits.iter().any(|t| traits.contains(t)))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn matching_school_programs(
            &self,
            limit: i64,
        ) -> Result<Vec<SchoolProgramMatch>, AppError> {
            Ok(self.programs.iter().take(limit as usize).cloned().collect())
        }

        async fn create_session(&self, _user_id: Uuid, _test_id: Uuid) -> Result<Uuid, AppError> {
            if self.fail_saves {
                return Err(AppError::Internal(anyhow::anyhow!("read-only replica")));
            }
            Ok(Uuid::new_v4())
        }

        async fn complete_session(
            &self,
            session_id: Uuid,
            _user_id: Uuid,
            responses: &Value,
            result: &TestResult,
        ) -> Result<(), AppError> {
            self.saved.lock().unwrap().push((
                session_id,
                responses.clone(),
                result.dominant_traits.clone(),
            ));
            Ok(())
        }

        async fn user_results(&self, user_id: Uuid) -> Result<Vec<StoredResultRow>, AppError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .map(|(session_id, _, dominant)| StoredResultRow {
                    session_id: *session_id,
                    test_id: Uuid::nil(),
                    user_id,
                    scores: json!({}),
                    dominant_traits: dominant.clone(),
                    interpretation: json!({}),
                    calculated_at: Utc::now(),
                })
                .collect())
        }
    }

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/orientation_test".to_string(),
            db_max_connections: 1,
            port: 0,
            rust_log: "debug".to_string(),
            environment: Environment::Development,
            cors_origins: vec![],
        }
    }

    fn riasec_test(questions: &[(Uuid, &str)]) -> TestDefinition {
        let test_id = Uuid::new_v4();
        TestDefinition {
            test: TestRow {
                id: test_id,
                name: "Test RIASEC".to_string(),
                description: "Intérêts professionnels".to_string(),
                test_type: "riasec".to_string(),
                duration_minutes: 15,
                image_url: None,
                is_active: true,
                display_order: 0,
            },
            questions: questions
                .iter()
                .enumerate()
                .map(|(i, (id, category))| QuestionWithOptions {
                    question: QuestionRow {
                        id: *id,
                        test_id,
                        question_text: format!("Question {i}"),
                        question_type: "likert".to_string(),
                        category: Some(category.to_string()),
                        display_order: i as i32,
                    },
                    options: vec![],
                })
                .collect(),
        }
    }

    fn career(name: &str, related: &[&str]) -> CareerRow {
        CareerRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} description"),
            sector_name: "Ingénierie & BTP".to_string(),
            image_url: None,
            required_skills: vec!["Rigueur".to_string()],
            related_traits: related.iter().map(|t| t.to_string()).collect(),
            education_path: Some(json!({"minimum_level": "BAC+3"})),
            salary_min_fcfa: Some(150_000),
            salary_max_fcfa: Some(600_000),
            salary_avg_fcfa: Some(350_000),
            salary_note: None,
            job_demand: Some("high".to_string()),
            growth_trend: Some("growing".to_string()),
            outlook_description: None,
            top_employers: vec![],
            entrepreneurship_potential: true,
        }
    }

    fn program() -> SchoolProgramMatch {
        SchoolProgramMatch {
            program_id: Uuid::new_v4(),
            program_name: "Licence Génie Civil".to_string(),
            program_level: Some("Licence".to_string()),
            program_duration: Some(3),
            school_id: Uuid::new_v4(),
            school_name: "Université de Lomé".to_string(),
            school_city: Some("Lomé".to_string()),
            school_logo_url: None,
            school_type: Some("public".to_string()),
        }
    }

    fn app(store: Arc<MemoryStore>) -> Router {
        build_router(AppState {
            store,
            config: test_config(),
        })
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json")
        };
        (status, payload)
    }

    fn post_json(uri: String, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn test_submit_scores_ranks_and_saves() {
        let (q1, q2, q3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let test = riasec_test(&[(q1, "R"), (q2, "I"), (q3, "A")]);
        let test_id = test.test.id;
        let store = Arc::new(MemoryStore {
            tests: vec![test],
            careers: vec![
                career("Technicien", &["Realiste"]),
                career("Ingénieur", &["Realistic", "Investigative"]),
                career("Comptable", &["Conventional"]),
            ],
            programs: vec![program()],
            ..Default::default()
        });

        let user_id = Uuid::new_v4();
        let (status, payload) = send(
            app(store.clone()),
            post_json(
                format!("/api/v1/orientation/sessions/{test_id}/submit"),
                json!({
                    "user_id": user_id,
                    "responses": {
                        q1.to_string(): "5",
                        q2.to_string(): "4",
                        q3.to_string(): "3"
                    }
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["test_id"], json!(test_id));
        assert_eq!(
            payload["dominant_traits"],
            json!(["Réaliste", "Investigateur", "Artistique"])
        );
        assert_eq!(payload["scores"]["Social"], json!(0.0));
        assert_eq!(payload["interpretation"]["profile_code"], json!("RIA"));

        let recommendations = payload["recommendations"].as_array().unwrap();
        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0]["name"], json!("Ingénieur"));
        // 2/3 * 60 + 90/100 * 40
        assert_eq!(recommendations[0]["match_score"], json!(76.0));
        assert_eq!(recommendations[1]["name"], json!("Technicien"));
        assert_eq!(recommendations[1]["matching_traits"], json!(["Réaliste"]));
        assert_eq!(recommendations[0]["education_minimum_level"], json!("BAC+3"));

        assert_eq!(payload["matching_programs"].as_array().unwrap().len(), 1);

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].1[q1.to_string()], json!("5"));
    }

    #[tokio::test]
    async fn test_submit_unknown_test_is_404() {
        let store = Arc::new(MemoryStore::default());
        let (status, payload) = send(
            app(store),
            post_json(
                format!("/api/v1/orientation/sessions/{}/submit", Uuid::new_v4()),
                json!({"user_id": Uuid::new_v4(), "responses": {"R_1": "5"}}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["error"]["code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_submit_falls_back_to_riasec_when_store_fails() {
        let store = Arc::new(MemoryStore {
            fail_test_lookup: true,
            ..Default::default()
        });
        let (status, payload) = send(
            app(store),
            post_json(
                format!("/api/v1/orientation/sessions/{}/submit", Uuid::new_v4()),
                json!({
                    "user_id": Uuid::new_v4(),
                    "responses": {"R_1": "2", "S_2": "5", "C_3": "1"}
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["dominant_traits"][0], json!("Social"));
        assert_eq!(payload["scores"]["Réaliste"], json!(40.0));
        assert_eq!(payload["scores"].as_object().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_submit_inconclusive_skips_recommendations() {
        let test = riasec_test(&[]);
        let test_id = test.test.id;
        let store = Arc::new(MemoryStore {
            tests: vec![test],
            careers: vec![career("Ingénieur", &["Realistic"])],
            programs: vec![program()],
            ..Default::default()
        });

        let (status, payload) = send(
            app(store),
            post_json(
                format!("/api/v1/orientation/sessions/{test_id}/submit"),
                json!({"user_id": Uuid::new_v4(), "responses": {}}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["dominant_traits"], json!([]));
        assert_eq!(payload["recommendations"], json!([]));
        assert_eq!(payload["matching_programs"], json!([]));
        assert_eq!(payload["interpretation"]["strengths"], json!([]));
        assert!(payload["interpretation"].get("profile_code").is_none());
    }

    #[tokio::test]
    async fn test_submit_survives_persistence_failure() {
        let store = Arc::new(MemoryStore {
            tests: vec![riasec_test(&[])],
            fail_saves: true,
            ..Default::default()
        });
        let test_id = store.tests[0].test.id;

        let (status, payload) = send(
            app(store.clone()),
            post_json(
                format!("/api/v1/orientation/sessions/{test_id}/submit"),
                json!({"user_id": Uuid::new_v4(), "responses": {"E_1": "4"}}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["dominant_traits"], json!(["Entrepreneur"]));
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_results_history_lists_saved_submissions() {
        let store = Arc::new(MemoryStore {
            tests: vec![riasec_test(&[])],
            ..Default::default()
        });
        let test_id = store.tests[0].test.id;
        let user_id = Uuid::new_v4();

        let (status, _) = send(
            app(store.clone()),
            post_json(
                format!("/api/v1/orientation/sessions/{test_id}/submit"),
                json!({"user_id": user_id, "responses": {"A_1": "5", "S_1": "3"}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, payload) = send(
            app(store),
            get(&format!("/api/v1/orientation/results?user_id={user_id}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload[0]["user_id"], json!(user_id));
        assert_eq!(payload[0]["dominant_traits"], json!(["Artistique", "Social"]));
    }

    #[tokio::test]
    async fn test_list_tests_hides_inactive() {
        let mut inactive = riasec_test(&[]);
        inactive.test.is_active = false;
        let store = Arc::new(MemoryStore {
            tests: vec![riasec_test(&[]), inactive],
            ..Default::default()
        });

        let (status, payload) = send(app(store), get("/api/v1/orientation/tests")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.as_array().unwrap().len(), 1);
        assert_eq!(payload[0]["type"], json!("riasec"));
    }

    #[tokio::test]
    async fn test_get_test_includes_questions() {
        let q1 = Uuid::new_v4();
        let test = riasec_test(&[(q1, "S")]);
        let test_id = test.test.id;
        let store = Arc::new(MemoryStore {
            tests: vec![test],
            ..Default::default()
        });

        let (status, payload) = send(
            app(store),
            get(&format!("/api/v1/orientation/tests/{test_id}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["questions"][0]["id"], json!(q1));
        assert_eq!(payload["questions"][0]["category"], json!("S"));
    }

    #[tokio::test]
    async fn test_list_careers_rejects_bad_limit() {
        let store = Arc::new(MemoryStore::default());
        let (status, payload) = send(
            app(store),
            get("/api/v1/orientation/careers?limit=500"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"]["code"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_get_career_not_found() {
        let store = Arc::new(MemoryStore::default());
        let (status, _) = send(
            app(store),
            get(&format!("/api/v1/orientation/careers/{}", Uuid::new_v4())),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_recommendations_by_codes_match_any_encoding() {
        let store = Arc::new(MemoryStore {
            careers: vec![
                career("Technicien", &["Realiste"]),
                career("Chercheur", &["Investigative"]),
                career("Artiste", &["Artistique"]),
            ],
            ..Default::default()
        });

        let (status, payload) = send(
            app(store),
            get("/api/v1/orientation/recommendations?traits=r,%20I"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = payload
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Technicien", "Chercheur"]);
    }

    #[tokio::test]
    async fn test_recommendations_require_traits() {
        let store = Arc::new(MemoryStore::default());
        let (status, _) = send(
            app(store),
            get("/api/v1/orientation/recommendations?traits=,"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, payload) = send(app(Arc::new(MemoryStore::default())), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], json!("ok"));
    }

    #[tokio::test]
    async fn test_scoring_panic_yields_degraded_result() {
        let test_id = Uuid::new_v4();
        let result = score_off_thread(test_id, || -> TestResult {
            panic!("scoring blew up");
        })
        .await;

        assert_eq!(result.test_id, test_id);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["dominant_traits"], json!(["Erreur de calcul"]));
        assert_eq!(value["scores"], json!({}));
        assert_eq!(value["interpretation"], json!({}));
        assert_eq!(value["recommendations"], json!([]));
        assert_eq!(value["matching_programs"], json!([]));
    }

    #[tokio::test]
    async fn test_scoring_off_thread_returns_computed_result() {
        let test_id = Uuid::new_v4();
        let mut responses = crate::orientation::models::Responses::new();
        responses.insert("S_1".to_string(), json!("5"));
        let result = score_off_thread(test_id, move || {
            calculate_result(test_id, TestFamily::Riasec, &responses, None)
        })
        .await;

        assert_eq!(result.dominant_traits, vec!["Social"]);
        assert!(result.interpretation.is_some());
    }

    #[test]
    fn test_validate_limit_bounds() {
        assert_eq!(validate_limit(None, 50, 100).unwrap(), 50);
        assert_eq!(validate_limit(Some(100), 50, 100).unwrap(), 100);
        assert!(validate_limit(Some(0), 50, 100).is_err());
        assert!(validate_limit(Some(21), 10, 20).is_err());
    }
}
