mod job;

pub use job::{
    CompanyJobCount, CurrentJobInfo, Job, JobFields, JobSummary, JobUpdate, NewJob,
};
