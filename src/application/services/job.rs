use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::JobStore, CompanyJobCount, CurrentJobInfo, DomainError, Job, JobSummary, JobUpdate,
    NewJob,
};

/// Body of a create request: a single job or a list of jobs.
#[derive(Debug, Clone)]
pub enum JobBatch {
    One(NewJob),
    Many(Vec<NewJob>),
}

/// Ids generated on creation, shaped like the request that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreatedJobs {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Confirmation was given but was not `"yes"`.
    Kept,
}

pub const DELETE_CONFIRMATION: &str = "yes";

/// Treats absent and empty values the same way.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_int(value: &str, name: &str) -> Result<i64, DomainError> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("{name} must be an integer, got '{value}'")))
}

pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Validates every job before inserting any of them.
    #[instrument(skip(self, batch))]
    pub async fn create(&self, batch: JobBatch) -> Result<CreatedJobs, DomainError> {
        let (jobs, single) = match batch {
            JobBatch::One(job) => (vec![job], true),
            JobBatch::Many(jobs) => (jobs, false),
        };

        if jobs.is_empty() {
            return Err(DomainError::validation("At least one job is required"));
        }

        let fields = jobs
            .into_iter()
            .enumerate()
            .map(|(index, job)| {
                job.into_fields().map_err(|e| match (single, e) {
                    (false, DomainError::Validation(msg)) => {
                        DomainError::validation(format!("Job at index {index}: {msg}"))
                    }
                    (_, e) => e,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut ids = self.store.insert_jobs(fields).await?;
        tracing::info!(count = ids.len(), "jobs created");

        if single {
            ids.pop()
                .map(CreatedJobs::One)
                .ok_or_else(|| DomainError::internal("Store returned no id for inserted job"))
        } else {
            Ok(CreatedJobs::Many(ids))
        }
    }

    /// Any failure other than a missing document is reported as a bad
    /// request, store errors included.
    #[instrument(skip(self))]
    pub async fn get_by_job_id(&self, job_id: &str) -> Result<Job, DomainError> {
        let job_id = parse_int(job_id, "job_id")?;
        match self.store.find_by_job_id(job_id).await {
            Ok(Some(job)) => Ok(job),
            Ok(None) => Err(DomainError::not_found("Document not found")),
            Err(e) => {
                tracing::warn!(error = %e, job_id, "job lookup failed");
                Err(DomainError::validation(e.to_string()))
            }
        }
    }

    /// Applies the supplied fields to the job with this title and returns
    /// the display fields as they were before the write.
    #[instrument(skip(self, description, location))]
    pub async fn update_by_title(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        average_salary: Option<&str>,
        location: Option<&str>,
    ) -> Result<CurrentJobInfo, DomainError> {
        let title = present(title).ok_or_else(|| DomainError::validation("title is required"))?;
        let update = JobUpdate {
            description: present(description).map(String::from),
            average_salary: present(average_salary)
                .map(|s| parse_int(s, "average_salary"))
                .transpose()?,
            location: present(location).map(String::from),
        };

        let mut job = self
            .store
            .find_by_title(title)
            .await?
            .ok_or_else(|| DomainError::not_found("Job not found"))?;

        let current = CurrentJobInfo::from(&job.fields);
        update.apply(&mut job.fields);

        if self.store.set_fields_by_title(title, &job.fields).await? == 0 {
            return Err(DomainError::not_found("Job not found"));
        }

        tracing::info!(job_id = job.fields.job_id, "job updated");
        Ok(current)
    }

    #[instrument(skip(self))]
    pub async fn list_by_experience(&self, level: Option<&str>) -> Result<Vec<Job>, DomainError> {
        let level = present(level)
            .ok_or_else(|| DomainError::validation("Experience parameter is required"))?;
        self.store.find_by_experience(level).await
    }

    /// First step of deletion: shows the job that would be removed.
    #[instrument(skip(self))]
    pub async fn confirm_delete(&self, title: Option<&str>) -> Result<Job, DomainError> {
        let title =
            present(title).ok_or_else(|| DomainError::validation("job_title is required"))?;
        self.store
            .find_by_title(title)
            .await?
            .ok_or_else(|| DomainError::not_found("Job not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete_by_title(
        &self,
        title: Option<&str>,
        confirmation: Option<&str>,
    ) -> Result<DeleteOutcome, DomainError> {
        let title =
            present(title).ok_or_else(|| DomainError::validation("job_title is required"))?;

        if self.store.find_by_title(title).await?.is_none() {
            return Err(DomainError::not_found("Job not found"));
        }

        let confirmation = present(confirmation)
            .ok_or_else(|| DomainError::validation("Confirmation is required"))?;
        if confirmation != DELETE_CONFIRMATION {
            return Ok(DeleteOutcome::Kept);
        }

        match self.store.delete_by_title(title).await? {
            0 => Err(DomainError::not_found("Job not found")),
            _ => {
                tracing::info!(title, "job deleted");
                Ok(DeleteOutcome::Deleted)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_by_salary_range(
        &self,
        min_salary: Option<&str>,
        max_salary: Option<&str>,
    ) -> Result<Vec<JobSummary>, DomainError> {
        let (Some(min), Some(max)) = (present(min_salary), present(max_salary)) else {
            return Err(DomainError::validation(
                "Both min_salary and max_salary parameters are required",
            ));
        };
        let min = parse_int(min, "min_salary")?;
        let max = parse_int(max, "max_salary")?;

        self.store.find_by_salary_range(min, max).await
    }

    #[instrument(skip(self))]
    pub async fn top_companies(
        &self,
        industry: Option<&str>,
    ) -> Result<Vec<CompanyJobCount>, DomainError> {
        let industry = present(industry)
            .ok_or_else(|| DomainError::validation("The industry parameter is required"))?;
        self.store.top_companies(industry).await
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        self.store.ping().await
    }
}
