// src/handlers/dashboard.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;

use crate::error::AppError;

/// Aggregated row for the recent attempts panel.
#[derive(Debug, FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RecentAttempt {
    id: String,
    score: Option<i64>,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
    user_name: String,
    user_department: String,
    test_title: String,
}

/// Admin dashboard aggregates: headline stats, the average dimension
/// profile, recent attempts and the pass/fail split at 70.
pub async fn get_dashboard(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let (total_employees,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'employee'")
            .fetch_one(&pool)
            .await?;

    let (total_tests,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tests")
        .fetch_one(&pool)
        .await?;

    let (completed_attempts,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM test_attempts WHERE status = 'completed'")
            .fetch_one(&pool)
            .await?;

    let (avg_score,): (Option<f64>,) =
        sqlx::query_as("SELECT AVG(score) FROM test_attempts WHERE status = 'completed'")
            .fetch_one(&pool)
            .await?;

    let profile: (Option<f64>, Option<f64>, Option<f64>, Option<f64>, Option<f64>) =
        sqlx::query_as(
            r#"
            SELECT AVG(integrity), AVG(fairness), AVG(accountability),
                   AVG(transparency), AVG(respect)
            FROM ethics_scores
            "#,
        )
        .fetch_one(&pool)
        .await?;

    let recent_attempts: Vec<RecentAttempt> = sqlx::query_as(
        r#"
        SELECT
            a.id, a.score, a.completed_at,
            u.name AS user_name, u.department AS user_department,
            t.title AS test_title
        FROM test_attempts a
        JOIN users u ON a.user_id = u.id
        JOIN tests t ON a.test_id = t.id
        WHERE a.status = 'completed'
        ORDER BY a.completed_at DESC
        LIMIT 10
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let (pass_count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM test_attempts WHERE status = 'completed' AND score >= 70",
    )
    .fetch_one(&pool)
    .await?;

    let (fail_count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM test_attempts WHERE status = 'completed' AND score < 70",
    )
    .fetch_one(&pool)
    .await?;

    let rounded = |v: Option<f64>| v.map(|v| v.round() as i64).unwrap_or(0);

    Ok(Json(serde_json::json!({
        "stats": {
            "totalEmployees": total_employees,
            "totalTests": total_tests,
            "completedAttempts": completed_attempts,
            "avgScore": rounded(avg_score),
        },
        "ethicsProfile": {
            "integrity": rounded(profile.0),
            "fairness": rounded(profile.1),
            "accountability": rounded(profile.2),
            "transparency": rounded(profile.3),
            "respect": rounded(profile.4),
        },
        "recentAttempts": recent_attempts,
        "distribution": {
            "pass": pass_count,
            "fail": fail_count,
        },
    })))
}
