// src/handlers/employees.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, models::user::User};

/// Lists all employee-role users, newest first.
pub async fn list_employees(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let employees: Vec<User> = sqlx::query_as(
        r#"
        SELECT id, name, email, role, department, created_at
        FROM users
        WHERE role = 'employee'
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list employees: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(serde_json::json!({ "employees": employees })))
}

/// DTO for creating an employee.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters."))]
    pub name: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    pub department: Option<String>,
}

/// Creates a new employee.
pub async fn create_employee(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, role, department, created_at)
        VALUES (?, ?, ?, 'employee', ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(payload.department.as_deref().unwrap_or("General"))
    .bind(Utc::now())
    .execute(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict(format!("Email '{}' already exists", payload.email))
        } else {
            tracing::error!("Failed to create employee: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}
