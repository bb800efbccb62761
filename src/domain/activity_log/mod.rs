//! Activity log (audit trail)

pub mod model;
pub mod repository;

pub use model::{ActivityLogEntry, ActivityType};
pub use repository::ActivityLogRepositoryInterface;
