// src/handlers/attempts.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::{
    ai::AnalysisInput,
    error::AppError,
    models::{
        attempt::{AnswerDetail, AttemptSummary, EthicsScores, SubmitAttemptRequest},
        question::Question,
        test::Test,
    },
    scoring,
    state::AppState,
};

const ATTEMPT_SUMMARY_SELECT: &str = r#"
    SELECT
        a.id, a.score, a.status, a.started_at, a.completed_at,
        a.total_time_taken, a.ai_analysis,
        u.name AS user_name, u.email AS user_email, u.department AS user_department,
        t.id AS test_id, t.title AS test_title, t.category AS test_category
    FROM test_attempts a
    JOIN users u ON a.user_id = u.id
    JOIN tests t ON a.test_id = t.id
"#;

/// Submits a test attempt: scores the answers, computes the dimension
/// profile, obtains the AI analysis (or its deterministic fallback) and
/// persists everything in a single transaction.
///
/// All scoring happens in memory before any write, so a failure anywhere
/// leaves no partially scored attempt behind. The partial unique index on
/// (user_id, test_id, status='completed') turns a concurrent duplicate
/// submission into a constraint violation, reported as a 409.
pub async fn submit_attempt(
    State(state): State<AppState>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.user_id.trim().is_empty() || req.test_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "userId and testId are required".to_string(),
        ));
    }

    let pool = &state.pool;

    let user: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(&req.user_id)
        .fetch_optional(pool)
        .await?;
    if user.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let test: Test = sqlx::query_as(
        r#"
        SELECT id, title, description, category, difficulty, total_questions,
               time_limit, status, created_by, created_at
        FROM tests
        WHERE id = ?
        "#,
    )
    .bind(&req.test_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Test not found".to_string()))?;

    // Fast-path duplicate check; the unique index below closes the race.
    let completed: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM test_attempts WHERE user_id = ? AND test_id = ? AND status = 'completed'",
    )
    .bind(&req.user_id)
    .bind(&req.test_id)
    .fetch_optional(pool)
    .await?;
    if completed.is_some() {
        return Err(AppError::Conflict(
            "You have already taken this test.".to_string(),
        ));
    }

    let questions: Vec<Question> = sqlx::query_as(
        r#"
        SELECT id, test_id, question_text, scenario, options, correct_answer,
               category, explanation, difficulty, order_index
        FROM questions
        WHERE test_id = ?
        ORDER BY order_index
        "#,
    )
    .bind(&req.test_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load questions for scoring: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if questions.is_empty() {
        return Err(AppError::BadRequest(
            "Test has no questions to score".to_string(),
        ));
    }

    let scored = scoring::score_attempt(&questions, &req.answers);
    let dims = scoring::dimension_scores(&scored.category_tallies, scored.overall_score);

    // The submission must never fail because the AI call failed.
    let analysis = match state
        .ai
        .analyze_attempt(&AnalysisInput {
            test_title: &test.title,
            scored: &scored,
        })
        .await
    {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!("AI analysis failed, using fallback: {}", e);
            scoring::fallback_analysis(&scored)
        }
    };

    let attempt_id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    // Purge stale attempts that never reached 'completed' (e.g. a crash
    // mid-submission); their answers and scores go with them via cascade.
    sqlx::query("DELETE FROM test_attempts WHERE user_id = ? AND test_id = ? AND status != 'completed'")
        .bind(&req.user_id)
        .bind(&req.test_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO test_attempts
        (id, user_id, test_id, started_at, completed_at, score, status, ai_analysis, total_time_taken)
        VALUES (?, ?, ?, ?, ?, ?, 'completed', ?, ?)
        "#,
    )
    .bind(&attempt_id)
    .bind(&req.user_id)
    .bind(&req.test_id)
    .bind(now)
    .bind(now)
    .bind(scored.overall_score)
    .bind(SqlJson(&analysis))
    .bind(req.time_taken)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict("You have already taken this test.".to_string())
        } else {
            tracing::error!("Failed to insert attempt: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    for answer in &scored.answers {
        sqlx::query(
            r#"
            INSERT INTO attempt_answers
            (id, attempt_id, question_id, selected_answer, is_correct, justification)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&attempt_id)
        .bind(&answer.question_id)
        .bind(&answer.selected_answer)
        .bind(answer.is_correct)
        .bind(&answer.justification)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO ethics_scores
        (id, user_id, attempt_id, integrity, fairness, accountability, transparency, respect, overall_score, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&req.user_id)
    .bind(&attempt_id)
    .bind(dims.integrity)
    .bind(dims.fairness)
    .bind(dims.accountability)
    .bind(dims.transparency)
    .bind(dims.respect)
    .bind(scored.overall_score)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        attempt = %attempt_id,
        score = scored.overall_score,
        "Attempt submitted"
    );

    Ok(Json(serde_json::json!({
        "attemptId": attempt_id,
        "score": scored.overall_score,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAttemptsQuery {
    pub user_id: Option<String>,
}

/// Lists attempts joined with user and test info, newest first.
/// `userId` matches either the user's id or their email.
pub async fn list_attempts(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListAttemptsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let attempts: Vec<AttemptSummary> = match &params.user_id {
        Some(user_id) => {
            let filtered = format!(
                "{} WHERE a.user_id = ? OR u.email = ? ORDER BY a.completed_at DESC",
                ATTEMPT_SUMMARY_SELECT
            );
            sqlx::query_as(&filtered)
                .bind(user_id)
                .bind(user_id)
                .fetch_all(&pool)
                .await?
        }
        None => {
            let all = format!("{} ORDER BY a.completed_at DESC", ATTEMPT_SUMMARY_SELECT);
            sqlx::query_as(&all).fetch_all(&pool).await?
        }
    };

    Ok(Json(serde_json::json!({ "attempts": attempts })))
}

/// Retrieves one attempt with its answers and dimension scores.
pub async fn get_attempt(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let query = format!("{} WHERE a.id = ?", ATTEMPT_SUMMARY_SELECT);
    let attempt: AttemptSummary = sqlx::query_as(&query)
        .bind(&id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Attempt not found".to_string()))?;

    let answers: Vec<AnswerDetail> = sqlx::query_as(
        r#"
        SELECT
            ans.id, ans.selected_answer, ans.is_correct, ans.justification,
            q.question_text, q.scenario, q.options, q.correct_answer,
            q.category, q.explanation
        FROM attempt_answers ans
        JOIN questions q ON ans.question_id = q.id
        WHERE ans.attempt_id = ?
        ORDER BY q.order_index
        "#,
    )
    .bind(&id)
    .fetch_all(&pool)
    .await?;

    let scores: Option<EthicsScores> = sqlx::query_as(
        r#"
        SELECT id, user_id, attempt_id, integrity, fairness, accountability,
               transparency, respect, overall_score, created_at
        FROM ethics_scores
        WHERE attempt_id = ?
        "#,
    )
    .bind(&id)
    .fetch_optional(&pool)
    .await?;

    Ok(Json(serde_json::json!({
        "attempt": attempt,
        "answers": answers,
        "ethicsScores": scores,
    })))
}
