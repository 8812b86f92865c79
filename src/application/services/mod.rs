mod job;

pub use job::{CreatedJobs, DeleteOutcome, JobBatch, JobService, DELETE_CONFIRMATION};
