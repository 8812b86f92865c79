pub mod in_memory;
pub mod mongo;

pub use in_memory::InMemoryJobStore;
pub use mongo::MongoJobStore;
