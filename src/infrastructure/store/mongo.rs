use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{
    ports::JobStore, CompanyJobCount, DomainError, Job, JobFields, JobSummary,
};
use crate::infrastructure::config::DatabaseConfig;

#[derive(Debug, Serialize, Deserialize)]
struct JobDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(flatten)]
    fields: JobFields,
}

impl TryFrom<JobDocument> for Job {
    type Error = DomainError;

    fn try_from(doc: JobDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| DomainError::internal("Stored job has no _id"))?;
        Ok(Job {
            id: id.to_hex(),
            fields: doc.fields,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SummaryDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    title: String,
}

fn store_err(e: mongodb::error::Error) -> DomainError {
    DomainError::store(e.to_string())
}

fn salary_range_filter(min: i64, max: i64) -> Document {
    doc! { "average_salary": { "$gte": min, "$lte": max } }
}

fn summary_projection() -> Document {
    doc! { "_id": 1, "title": 1 }
}

/// `$match` on industry, count jobs per company name, biggest first.
fn top_companies_pipeline(industry: &str) -> Vec<Document> {
    vec![
        doc! { "$match": { "industry_name": industry } },
        doc! { "$group": { "_id": "$name", "job_count": { "$sum": 1 } } },
        doc! { "$sort": { "job_count": -1 } },
    ]
}

fn set_fields_update(fields: &JobFields) -> Result<Document, DomainError> {
    let set = bson::to_document(fields).map_err(|e| DomainError::internal(e.to_string()))?;
    Ok(doc! { "$set": set })
}

/// `insert_many` reports ids keyed by input position; return them in input order.
fn ordered_ids(inserted: HashMap<usize, Bson>) -> Vec<String> {
    let mut inserted: Vec<_> = inserted.into_iter().collect();
    inserted.sort_by_key(|(index, _)| *index);

    inserted
        .into_iter()
        .map(|(_, id)| match id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => id.to_string(),
        })
        .collect()
}

/// `jobs` collection backed by MongoDB. The client pools its own
/// connections, so one instance is shared by every request.
pub struct MongoJobStore {
    client: Client,
    database: Database,
    jobs: Collection<JobDocument>,
}

impl MongoJobStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let client = Client::with_uri_str(&config.uri).await.map_err(store_err)?;
        let database = client.database(&config.name);
        let jobs = database.collection::<JobDocument>(&config.collections.jobs);

        tracing::info!(
            database = %config.name,
            collection = %config.collections.jobs,
            "MongoDB client created"
        );

        Ok(Self {
            client,
            database,
            jobs,
        })
    }

    /// Closes pooled connections and ends server sessions.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }

    async fn collect_jobs(&self, filter: Document) -> Result<Vec<Job>, DomainError> {
        let docs: Vec<JobDocument> = self
            .jobs
            .find(filter)
            .await
            .map_err(store_err)?
            .try_collect()
            .await
            .map_err(store_err)?;

        docs.into_iter().map(Job::try_from).collect()
    }

    async fn find_one_job(&self, filter: Document) -> Result<Option<Job>, DomainError> {
        self.jobs
            .find_one(filter)
            .await
            .map_err(store_err)?
            .map(Job::try_from)
            .transpose()
    }
}

#[async_trait]
impl JobStore for MongoJobStore {
    async fn insert_jobs(&self, jobs: Vec<JobFields>) -> Result<Vec<String>, DomainError> {
        let docs: Vec<JobDocument> = jobs
            .into_iter()
            .map(|fields| JobDocument { id: None, fields })
            .collect();

        let result = self.jobs.insert_many(docs).await.map_err(store_err)?;
        Ok(ordered_ids(result.inserted_ids))
    }

    async fn find_by_job_id(&self, job_id: i64) -> Result<Option<Job>, DomainError> {
        self.find_one_job(doc! { "job_id": job_id }).await
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Job>, DomainError> {
        self.find_one_job(doc! { "title": title }).await
    }

    async fn find_by_experience(&self, level: &str) -> Result<Vec<Job>, DomainError> {
        self.collect_jobs(doc! { "experience_level": level }).await
    }

    async fn find_by_salary_range(
        &self,
        min: i64,
        max: i64,
    ) -> Result<Vec<JobSummary>, DomainError> {
        let docs: Vec<SummaryDocument> = self
            .jobs
            .clone_with_type::<SummaryDocument>()
            .find(salary_range_filter(min, max))
            .projection(summary_projection())
            .await
            .map_err(store_err)?
            .try_collect()
            .await
            .map_err(store_err)?;

        Ok(docs
            .into_iter()
            .map(|doc| JobSummary {
                id: doc.id.to_hex(),
                title: doc.title,
            })
            .collect())
    }

    async fn set_fields_by_title(
        &self,
        title: &str,
        fields: &JobFields,
    ) -> Result<u64, DomainError> {
        let result = self
            .jobs
            .update_one(doc! { "title": title }, set_fields_update(fields)?)
            .await
            .map_err(store_err)?;

        Ok(result.matched_count)
    }

    async fn delete_by_title(&self, title: &str) -> Result<u64, DomainError> {
        let result = self
            .jobs
            .delete_one(doc! { "title": title })
            .await
            .map_err(store_err)?;

        Ok(result.deleted_count)
    }

    async fn top_companies(&self, industry: &str) -> Result<Vec<CompanyJobCount>, DomainError> {
        let rows: Vec<Document> = self
            .jobs
            .aggregate(top_companies_pipeline(industry))
            .await
            .map_err(store_err)?
            .try_collect()
            .await
            .map_err(store_err)?;

        rows.into_iter()
            .map(|row| {
                bson::from_document::<CompanyJobCount>(row)
                    .map_err(|e| DomainError::internal(e.to_string()))
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(store_err)
    }
}
