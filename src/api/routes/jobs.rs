use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::FormParams;
use crate::api::state::AppState;
use crate::application::{CreatedJobs, DeleteOutcome, JobBatch};
use crate::domain::{CompanyJobCount, CurrentJobInfo, Job, JobSummary, NewJob};

#[derive(Debug, Deserialize)]
pub struct UpdateJobForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub average_salary: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceQuery {
    pub job_experience: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteJobForm {
    pub job_title: Option<String>,
    pub confirmation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SalaryRangeQuery {
    pub min_salary: Option<String>,
    pub max_salary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IndustryQuery {
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateJobResponse {
    pub message: String,
    pub current_job_info: CurrentJobInfo,
}

#[derive(Debug, Serialize)]
pub struct DeleteConfirmationResponse {
    pub msg: String,
    pub job: Job,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Parses a create body: a JSON object yields one job, an array many.
fn parse_job_batch(body: &[u8]) -> Result<JobBatch, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("Request body is required"));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))?;
    let invalid_job = |e: serde_json::Error| ApiError::bad_request(format!("Invalid job: {e}"));

    match value {
        Value::Object(map) => serde_json::from_value::<NewJob>(Value::Object(map))
            .map(JobBatch::One)
            .map_err(invalid_job),
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value::<NewJob>)
            .collect::<Result<Vec<_>, _>>()
            .map(JobBatch::Many)
            .map_err(invalid_job),
        _ => Err(ApiError::bad_request(
            "Expected a job object or an array of job objects",
        )),
    }
}

pub async fn create_jobs(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CreatedJobs>)> {
    let batch = parse_job_batch(&body)?;
    let created = state.job_service.create(batch).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_by_job_id(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Job>> {
    Ok(Json(state.job_service.get_by_job_id(&job_id).await?))
}

pub async fn update_by_title(
    State(state): State<AppState>,
    FormParams(form): FormParams<UpdateJobForm>,
) -> ApiResult<Json<UpdateJobResponse>> {
    let current_job_info = state
        .job_service
        .update_by_title(
            form.title.as_deref(),
            form.description.as_deref(),
            form.average_salary.as_deref(),
            form.location.as_deref(),
        )
        .await?;

    Ok(Json(UpdateJobResponse {
        message: "Job details updated successfully".into(),
        current_job_info,
    }))
}

pub async fn list_by_experience(
    State(state): State<AppState>,
    FormParams(query): FormParams<ExperienceQuery>,
) -> ApiResult<Json<Vec<Job>>> {
    let jobs = state
        .job_service
        .list_by_experience(query.job_experience.as_deref())
        .await?;
    Ok(Json(jobs))
}

pub async fn confirm_delete(
    State(state): State<AppState>,
    FormParams(form): FormParams<DeleteJobForm>,
) -> ApiResult<Json<DeleteConfirmationResponse>> {
    let job = state
        .job_service
        .confirm_delete(form.job_title.as_deref())
        .await?;

    Ok(Json(DeleteConfirmationResponse {
        msg: "If you want to delete this item, please confirm!!".into(),
        job,
    }))
}

pub async fn delete_by_title(
    State(state): State<AppState>,
    FormParams(form): FormParams<DeleteJobForm>,
) -> ApiResult<Response> {
    let outcome = state
        .job_service
        .delete_by_title(form.job_title.as_deref(), form.confirmation.as_deref())
        .await?;

    Ok(match outcome {
        DeleteOutcome::Deleted => StatusCode::NO_CONTENT.into_response(),
        DeleteOutcome::Kept => Json(MessageResponse {
            message: "Job not deleted".into(),
        })
        .into_response(),
    })
}

pub async fn list_by_salary_range(
    State(state): State<AppState>,
    FormParams(query): FormParams<SalaryRangeQuery>,
) -> ApiResult<Json<Vec<JobSummary>>> {
    let jobs = state
        .job_service
        .list_by_salary_range(query.min_salary.as_deref(), query.max_salary.as_deref())
        .await?;
    Ok(Json(jobs))
}

pub async fn top_companies(
    State(state): State<AppState>,
    FormParams(query): FormParams<IndustryQuery>,
) -> ApiResult<Json<Vec<CompanyJobCount>>> {
    let ranking = state
        .job_service
        .top_companies(query.industry.as_deref())
        .await?;
    Ok(Json(ranking))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_batch_shapes() {
        assert!(matches!(
            parse_job_batch(br#"{"job_id": 1, "title": "Engineer"}"#),
            Ok(JobBatch::One(_))
        ));
        assert!(matches!(
            parse_job_batch(br#"[{"job_id": 1, "title": "Engineer"}]"#),
            Ok(JobBatch::Many(jobs)) if jobs.len() == 1
        ));
    }

    #[test]
    fn test_parse_job_batch_rejects_bad_bodies() {
        let bodies: [&[u8]; 5] = [b"", b"  ", b"{not json", b"42", br#"{"job_id": "one"}"#];
        for body in bodies {
            assert!(matches!(
                parse_job_batch(body),
                Err(ApiError::BadRequest(_))
            ));
        }
    }
}
