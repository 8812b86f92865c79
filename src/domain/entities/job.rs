use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::DomainError;

/// Everything a job document carries apart from its store-assigned `_id`.
///
/// Fields the service does not know about are kept in `extra` so that
/// documents round-trip through the API unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFields {
    pub job_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_salary: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_name: Option<String>,
    /// Name of the company offering the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobFields {
    pub fn new(job_id: i64, title: impl Into<String>) -> Self {
        Self {
            job_id,
            title: title.into(),
            description: None,
            average_salary: None,
            location: None,
            experience_level: None,
            industry_name: None,
            name: None,
            extra: Map::new(),
        }
    }

    pub fn with_salary(mut self, salary: i64) -> Self {
        self.average_salary = Some(salary);
        self
    }

    pub fn with_experience(mut self, level: impl Into<String>) -> Self {
        self.experience_level = Some(level.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>, industry: impl Into<String>) -> Self {
        self.name = Some(company.into());
        self.industry_name = Some(industry.into());
        self
    }
}

/// A stored job posting, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: JobFields,
}

/// Job payload accepted on creation, before presence checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewJob {
    #[serde(default)]
    pub job_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub average_salary: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub industry_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewJob {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        // Zero counts as empty, like a blank title.
        if self.job_id.map_or(true, |id| id == 0) {
            missing.push("job_id");
        }
        if self.title.as_deref().map_or(true, str::is_empty) {
            missing.push("title");
        }
        missing
    }

    /// Checks the required fields and produces the document to insert.
    ///
    /// A client supplied `_id` is discarded; the store assigns it.
    pub fn into_fields(mut self) -> Result<JobFields, DomainError> {
        let missing = self.missing_fields();
        let (Some(job_id), Some(title), true) = (self.job_id, self.title, missing.is_empty())
        else {
            return Err(DomainError::validation(format!(
                "Missing or empty fields: {}",
                missing.join(", ")
            )));
        };

        self.extra.remove("_id");

        Ok(JobFields {
            job_id,
            title,
            description: self.description,
            average_salary: self.average_salary,
            location: self.location,
            experience_level: self.experience_level,
            industry_name: self.industry_name,
            name: self.name,
            extra: self.extra,
        })
    }
}

/// Partial update applied by title. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub description: Option<String>,
    pub average_salary: Option<i64>,
    pub location: Option<String>,
}

impl JobUpdate {
    pub fn apply(&self, fields: &mut JobFields) {
        if let Some(description) = &self.description {
            fields.description = Some(description.clone());
        }
        if let Some(salary) = self.average_salary {
            fields.average_salary = Some(salary);
        }
        if let Some(location) = &self.location {
            fields.location = Some(location.clone());
        }
    }
}

/// Snapshot of the display fields taken before an update is written.
/// Absent fields render as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentJobInfo {
    pub title: String,
    pub description: String,
    pub average_salary: Value,
    pub location: String,
}

impl From<&JobFields> for CurrentJobInfo {
    fn from(fields: &JobFields) -> Self {
        Self {
            title: fields.title.clone(),
            description: fields.description.clone().unwrap_or_default(),
            average_salary: fields
                .average_salary
                .map_or_else(|| Value::String(String::new()), Value::from),
            location: fields.location.clone().unwrap_or_default(),
        }
    }
}

/// `_id` and `title` projection used by the salary range query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// One row of the per-industry company ranking. Jobs without a company
/// name are grouped under `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyJobCount {
    #[serde(rename = "_id")]
    pub company: Option<String>,
    pub job_count: i64,
}
