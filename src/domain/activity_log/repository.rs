use async_trait::async_trait;

use super::{ActivityLogEntry, ActivityType};
use crate::domain::DomainResult;

/// Append-only audit trail. There is no update or delete path.
#[async_trait]
pub trait ActivityLogRepositoryInterface: Send + Sync {
    async fn append(
        &self,
        user_id: &str,
        activity_type: ActivityType,
        description: &str,
    ) -> DomainResult<()>;

    /// Entries for one user, oldest first
    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<ActivityLogEntry>>;
}
