// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{attempts, dashboard, employees, tests},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (tests, attempts, employees, dashboard).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, AI provider).
pub fn create_router(state: AppState) -> Router {
    let origins: [HeaderValue; 2] = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let test_routes = Router::new()
        .route("/", get(tests::list_tests).post(tests::create_test))
        .route("/generate", post(tests::generate_questions))
        .route(
            "/{id}",
            get(tests::get_test)
                .put(tests::update_test)
                .delete(tests::delete_test),
        );

    let attempt_routes = Router::new()
        .route(
            "/",
            get(attempts::list_attempts).post(attempts::submit_attempt),
        )
        .route("/{id}", get(attempts::get_attempt));

    let employee_routes = Router::new().route(
        "/",
        get(employees::list_employees).post(employees::create_employee),
    );

    Router::new()
        .nest("/api/tests", test_routes)
        .nest("/api/attempts", attempt_routes)
        .nest("/api/employees", employee_routes)
        .route("/api/dashboard", get(dashboard::get_dashboard))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
