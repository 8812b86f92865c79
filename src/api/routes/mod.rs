pub mod health;
pub mod jobs;

use axum::http::{header, Method};
use axum::{middleware, routing::get, routing::post, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::middleware::request_logger;
use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.cors.allowed_origins);

    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .merge(job_routes())
        .layer(middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/create/jobPost", post(jobs::create_jobs))
        .route("/search_by_job_id/{job_id}", get(jobs::get_by_job_id))
        .route("/update_by_job_title", post(jobs::update_by_title))
        .route("/jobs_experience", get(jobs::list_by_experience))
        .route(
            "/delete_by_job_title",
            get(jobs::confirm_delete).delete(jobs::delete_by_title),
        )
        .route("/jobs_by_salary_range", get(jobs::list_by_salary_range))
        .route("/top_companies", get(jobs::top_companies))
}
