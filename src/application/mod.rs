//! Application layer - Use cases and orchestration.
//!
//! `JobService` owns request validation and talks to the store only through
//! the `JobStore` port, so the HTTP layer never sees a concrete backend.

pub mod services;

pub use services::{CreatedJobs, DeleteOutcome, JobBatch, JobService};
