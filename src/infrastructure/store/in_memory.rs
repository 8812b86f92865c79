use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::{
    ports::JobStore, CompanyJobCount, DomainError, Job, JobFields, JobSummary,
};

/// Process-local job collection with the same query semantics as
/// [`MongoJobStore`](super::MongoJobStore). Documents keep insertion order.
pub struct InMemoryJobStore {
    jobs: RwLock<Vec<Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Job>>, DomainError> {
        self.jobs
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Job>>, DomainError> {
        self.jobs
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert_jobs(&self, jobs: Vec<JobFields>) -> Result<Vec<String>, DomainError> {
        let mut store = self.write()?;

        let ids = jobs
            .into_iter()
            .map(|fields| {
                let id = ObjectId::new().to_hex();
                store.push(Job {
                    id: id.clone(),
                    fields,
                });
                id
            })
            .collect();

        Ok(ids)
    }

    async fn find_by_job_id(&self, job_id: i64) -> Result<Option<Job>, DomainError> {
        let store = self.read()?;
        Ok(store.iter().find(|job| job.fields.job_id == job_id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Job>, DomainError> {
        let store = self.read()?;
        Ok(store.iter().find(|job| job.fields.title == title).cloned())
    }

    async fn find_by_experience(&self, level: &str) -> Result<Vec<Job>, DomainError> {
        let store = self.read()?;
        Ok(store
            .iter()
            .filter(|job| job.fields.experience_level.as_deref() == Some(level))
            .cloned()
            .collect())
    }

    async fn find_by_salary_range(
        &self,
        min: i64,
        max: i64,
    ) -> Result<Vec<JobSummary>, DomainError> {
        let store = self.read()?;
        Ok(store
            .iter()
            .filter(|job| {
                job.fields
                    .average_salary
                    .is_some_and(|salary| (min..=max).contains(&salary))
            })
            .map(|job| JobSummary {
                id: job.id.clone(),
                title: job.fields.title.clone(),
            })
            .collect())
    }

    async fn set_fields_by_title(
        &self,
        title: &str,
        fields: &JobFields,
    ) -> Result<u64, DomainError> {
        let mut store = self.write()?;
        match store.iter_mut().find(|job| job.fields.title == title) {
            Some(job) => {
                job.fields = fields.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_title(&self, title: &str) -> Result<u64, DomainError> {
        let mut store = self.write()?;
        match store.iter().position(|job| job.fields.title == title) {
            Some(index) => {
                store.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn top_companies(&self, industry: &str) -> Result<Vec<CompanyJobCount>, DomainError> {
        let store = self.read()?;

        let mut counts: HashMap<Option<String>, i64> = HashMap::new();
        for job in store
            .iter()
            .filter(|job| job.fields.industry_name.as_deref() == Some(industry))
        {
            *counts.entry(job.fields.name.clone()).or_default() += 1;
        }

        let mut ranking: Vec<CompanyJobCount> = counts
            .into_iter()
            .map(|(company, job_count)| CompanyJobCount { company, job_count })
            .collect();
        ranking.sort_by(|a, b| b.job_count.cmp(&a.job_count));

        Ok(ranking)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.read().map(|_| ())
    }
}
