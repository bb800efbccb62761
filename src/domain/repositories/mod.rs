//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::activity_log::ActivityLogRepositoryInterface;
use super::admin_request::AdminRequestRepositoryInterface;
use super::user::UserRepositoryInterface;

pub use crate::shared::errors::DomainResult;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().find_active_by_id("u-1").await?;
///     repos.activity_logs().append("u-1", ActivityType::Login, "User logged in").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn admin_requests(&self) -> &dyn AdminRequestRepositoryInterface;
    fn activity_logs(&self) -> &dyn ActivityLogRepositoryInterface;
}
