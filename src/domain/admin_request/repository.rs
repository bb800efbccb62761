use async_trait::async_trait;

use super::{AdminRequest, CreateAdminRequestDto};
use crate::domain::DomainResult;
use crate::shared::PageRequest;

#[async_trait]
pub trait AdminRequestRepositoryInterface: Send + Sync {
    /// Insert a new pending request
    async fn create(&self, dto: CreateAdminRequestDto) -> DomainResult<AdminRequest>;

    /// Find a request by id, only if it is still pending
    async fn find_pending(&self, id: &str) -> DomainResult<Option<AdminRequest>>;

    /// Pending requests, newest first
    async fn list_pending(&self, page: PageRequest) -> DomainResult<Vec<AdminRequest>>;

    /// `SET is_validated = true` guarded by the pending condition.
    /// Returns `false` if the request was not pending at write time.
    async fn mark_validated(&self, id: &str) -> DomainResult<bool>;

    /// Compensating write for a failed approval only: undoes the `mark_validated`
    /// whose follow-up user creation failed. No other caller may clear the marker.
    async fn unmark_validated(&self, id: &str) -> DomainResult<()>;

    /// `SET deleted_at = now` guarded by the pending condition.
    /// Returns `false` if the request was not pending at write time.
    async fn soft_delete_pending(&self, id: &str) -> DomainResult<bool>;
}
