use async_trait::async_trait;

use crate::domain::{errors::DomainError, CompanyJobCount, Job, JobFields, JobSummary};

/// Access to the `jobs` collection. Each method is a single store call.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Inserts all jobs and returns their generated ids in input order.
    async fn insert_jobs(&self, jobs: Vec<JobFields>) -> Result<Vec<String>, DomainError>;
    async fn find_by_job_id(&self, job_id: i64) -> Result<Option<Job>, DomainError>;
    async fn find_by_title(&self, title: &str) -> Result<Option<Job>, DomainError>;
    async fn find_by_experience(&self, level: &str) -> Result<Vec<Job>, DomainError>;
    /// Jobs whose `average_salary` lies in `[min, max]`.
    async fn find_by_salary_range(&self, min: i64, max: i64)
        -> Result<Vec<JobSummary>, DomainError>;
    /// Sets every field of the first job titled `title`. Returns the matched count.
    async fn set_fields_by_title(&self, title: &str, fields: &JobFields)
        -> Result<u64, DomainError>;
    /// Removes the first job titled `title`. Returns the deleted count.
    async fn delete_by_title(&self, title: &str) -> Result<u64, DomainError>;
    /// Company names within `industry`, ranked by job count descending.
    async fn top_companies(&self, industry: &str) -> Result<Vec<CompanyJobCount>, DomainError>;
    async fn ping(&self) -> Result<(), DomainError>;
}
