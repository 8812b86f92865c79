//! Router tests over the in-memory job store.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use careerhub::api::{create_router, AppState};
use careerhub::domain::ports::JobStore;
use careerhub::domain::{CompanyJobCount, DomainError, Job, JobFields, JobSummary};
use careerhub::infrastructure::{AppConfig, InMemoryJobStore};

const FORM: &str = "application/x-www-form-urlencoded";

fn test_app() -> (Router, Arc<InMemoryJobStore>) {
    let store = Arc::new(InMemoryJobStore::new());
    let app = create_router(AppState::new(store.clone(), AppConfig::default()));
    (app, store)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }

    let response = app
        .clone()
        .oneshot(request.body(body.into()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/create/jobPost",
        Some("application/json"),
        body.to_string(),
    )
    .await
}

async fn seed(store: &InMemoryJobStore) {
    let mut engineer = JobFields::new(1, "Engineer")
        .with_salary(90_000)
        .with_experience("Senior")
        .with_company("Acme", "Tech");
    engineer.location = Some("Berlin".into());
    engineer.description = Some("Builds services".into());

    store
        .insert_jobs(vec![
            engineer,
            JobFields::new(2, "Designer")
                .with_salary(60_000)
                .with_experience("Junior")
                .with_company("Globex", "Tech"),
            JobFields::new(3, "Analyst")
                .with_salary(75_000)
                .with_experience("Senior")
                .with_company("Globex", "Tech"),
            JobFields::new(4, "Banker")
                .with_salary(150_000)
                .with_company("Initech", "Finance"),
        ])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_welcome() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/", None, Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apiVersion"], "v1.0");
    assert_eq!(body["status"], "200");
    assert_eq!(body["message"], "Welcome to class on CareerHub MongoDB");
}

#[tokio::test]
async fn test_health_and_ready() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::GET, "/health", None, Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None, Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "connected");
}

#[tokio::test]
async fn test_create_then_fetch_by_job_id() {
    let (app, _) = test_app();

    let (status, id) = create(&app, json!({ "job_id": 1, "title": "Engineer" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(id.is_string());

    let (status, job) = send(&app, Method::GET, "/search_by_job_id/1", None, Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["_id"], id);
    assert_eq!(job["job_id"], 1);
    assert_eq!(job["title"], "Engineer");

    let (status, _) = send(&app, Method::GET, "/search_by_job_id/999", None, Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        send(&app, Method::GET, "/search_by_job_id/abc", None, Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("job_id"));
}

#[tokio::test]
async fn test_create_batch_returns_ids_in_order() {
    let (app, store) = test_app();

    let (status, ids) = create(
        &app,
        json!([
            { "job_id": 10, "title": "Engineer", "remote": true },
            { "job_id": 11, "title": "Designer" }
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let ids = ids.as_array().unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(store.len().unwrap(), 2);

    let (_, job) = send(&app, Method::GET, "/search_by_job_id/10", None, Body::empty()).await;
    assert_eq!(job["_id"], ids[0]);
    assert_eq!(job["remote"], true);
}

#[tokio::test]
async fn test_create_rejects_missing_fields_without_writing() {
    let (app, store) = test_app();

    let (status, body) = create(&app, json!({ "job_id": 1, "title": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing or empty fields: title");

    let (status, body) = create(&app, json!({ "job_id": 0, "title": "Zero" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing or empty fields: job_id");

    let (status, _) = create(
        &app,
        json!([{ "job_id": 1, "title": "Engineer" }, { "title": "Designer" }]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/create/jobPost",
        Some("application/json"),
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/create/jobPost",
        Some("application/json"),
        "{ not json",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn test_update_by_title_changes_only_supplied_fields() {
    let (app, store) = test_app();
    seed(&store).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/update_by_job_title",
        Some(FORM),
        "title=Engineer&average_salary=95000&location=",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job details updated successfully");
    assert_eq!(
        body["current_job_info"],
        json!({
            "title": "Engineer",
            "description": "Builds services",
            "average_salary": 90_000,
            "location": "Berlin"
        })
    );

    let job = store.find_by_title("Engineer").await.unwrap().unwrap();
    assert_eq!(job.fields.average_salary, Some(95_000));
    assert_eq!(job.fields.location.as_deref(), Some("Berlin"));
    assert_eq!(job.fields.description.as_deref(), Some("Builds services"));
    assert_eq!(job.fields.experience_level.as_deref(), Some("Senior"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/update_by_job_title",
        Some(FORM),
        "title=Astronaut&location=Moon",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_jobs_by_experience() {
    let (app, store) = test_app();
    seed(&store).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/jobs_experience?job_experience=Senior",
        None,
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Engineer", "Analyst"]);

    let (status, _) = send(&app, Method::GET, "/jobs_experience", None, Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_flow_requires_confirmation() {
    let (app, store) = test_app();
    seed(&store).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/delete_by_job_title",
        Some(FORM),
        "job_title=Designer",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "Designer");
    assert!(body["msg"].is_string());

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/delete_by_job_title",
        Some(FORM),
        "job_title=Designer",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/delete_by_job_title",
        Some(FORM),
        "job_title=Designer&confirmation=no",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job not deleted");
    assert_eq!(store.len().unwrap(), 4);

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/delete_by_job_title",
        Some(FORM),
        "job_title=Designer&confirmation=yes",
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(store.len().unwrap(), 3);

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/delete_by_job_title?job_title=Designer&confirmation=yes",
        None,
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_salary_range_projects_id_and_title() {
    let (app, store) = test_app();
    seed(&store).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/jobs_by_salary_range?min_salary=60000&max_salary=90000",
        None,
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let jobs = body.as_array().unwrap();
    let titles: Vec<&str> = jobs.iter().map(|j| j["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Engineer", "Designer", "Analyst"]);
    for job in jobs {
        let keys: Vec<&String> = job.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(job["_id"].is_string());
    }

    let (status, _) = send(
        &app,
        Method::GET,
        "/jobs_by_salary_range?min_salary=60000",
        None,
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_top_companies_ranked_by_job_count() {
    let (app, store) = test_app();
    seed(&store).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/top_companies",
        Some(FORM),
        "industry=Tech",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "_id": "Globex", "job_count": 2 },
            { "_id": "Acme", "job_count": 1 }
        ])
    );

    let (status, _) = send(&app, Method::GET, "/top_companies", None, Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn multipart_body(boundary: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body
}

#[tokio::test]
async fn test_multipart_form_fields_are_read() {
    let (app, store) = test_app();
    seed(&store).await;
    let content_type = "multipart/form-data; boundary=XyZ";

    let (status, body) = send(
        &app,
        Method::GET,
        "/top_companies",
        Some(content_type),
        multipart_body("XyZ", &[("industry", "Tech")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["_id"], "Globex");

    let (status, body) = send(
        &app,
        Method::POST,
        "/update_by_job_title",
        Some(content_type),
        multipart_body("XyZ", &[("title", "Designer"), ("location", "Porto")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_job_info"]["location"], "");

    let job = store.find_by_title("Designer").await.unwrap().unwrap();
    assert_eq!(job.fields.location.as_deref(), Some("Porto"));

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/delete_by_job_title",
        Some(content_type),
        multipart_body("XyZ", &[("job_title", "Designer"), ("confirmation", "yes")]),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(store.len().unwrap(), 3);
}

#[tokio::test]
async fn test_malformed_multipart_is_bad_request() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        Method::GET,
        "/top_companies",
        Some("multipart/form-data; boundary=XyZ"),
        "--XyZ\r\nno headers here",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

struct UnavailableStore;

#[async_trait]
impl JobStore for UnavailableStore {
    async fn insert_jobs(&self, _jobs: Vec<JobFields>) -> Result<Vec<String>, DomainError> {
        Err(DomainError::store("connection refused"))
    }
    async fn find_by_job_id(&self, _job_id: i64) -> Result<Option<Job>, DomainError> {
        Err(DomainError::store("connection refused"))
    }
    async fn find_by_title(&self, _title: &str) -> Result<Option<Job>, DomainError> {
        Err(DomainError::store("connection refused"))
    }
    async fn find_by_experience(&self, _level: &str) -> Result<Vec<Job>, DomainError> {
        Err(DomainError::store("connection refused"))
    }
    async fn find_by_salary_range(
        &self,
        _min: i64,
        _max: i64,
    ) -> Result<Vec<JobSummary>, DomainError> {
        Err(DomainError::store("connection refused"))
    }
    async fn set_fields_by_title(
        &self,
        _title: &str,
        _fields: &JobFields,
    ) -> Result<u64, DomainError> {
        Err(DomainError::store("connection refused"))
    }
    async fn delete_by_title(&self, _title: &str) -> Result<u64, DomainError> {
        Err(DomainError::store("connection refused"))
    }
    async fn top_companies(&self, _industry: &str) -> Result<Vec<CompanyJobCount>, DomainError> {
        Err(DomainError::store("connection refused"))
    }
    async fn ping(&self) -> Result<(), DomainError> {
        Err(DomainError::store("connection refused"))
    }
}

#[tokio::test]
async fn test_store_failures_become_server_errors() {
    let app = create_router(AppState::new(
        Arc::new(UnavailableStore),
        AppConfig::default(),
    ));

    let (status, body) = create(&app, json!({ "job_id": 1, "title": "Engineer" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Server error");

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/delete_by_job_title",
        Some(FORM),
        "job_title=Engineer&confirmation=yes",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::GET, "/ready", None, Body::empty()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_lookup_by_job_id_reports_store_failure_as_bad_request() {
    let app = create_router(AppState::new(
        Arc::new(UnavailableStore),
        AppConfig::default(),
    ));

    let (status, body) =
        send(&app, Method::GET, "/search_by_job_id/1", None, Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}
