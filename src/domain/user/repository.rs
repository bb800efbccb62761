use async_trait::async_trait;

use super::{CreateUserDto, UpdateProfileDto, User, UserRole};
use crate::domain::DomainResult;

/// Credential store for user accounts.
///
/// Every lookup and mutation only matches active (non-tombstoned) rows.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Insert a new user. A uniqueness violation maps to `DomainError::Conflict`.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn find_active_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_active_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// True if an active user already uses `email` or `username`
    async fn exists_active_with_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> DomainResult<bool>;

    async fn update_profile(&self, id: &str, dto: UpdateProfileDto) -> DomainResult<Option<User>>;

    /// Returns `false` when no active user matched
    async fn update_password_hash(&self, id: &str, password_hash: &str) -> DomainResult<bool>;

    /// Sets role and `updated_at` in one statement; `None` when no active user matched
    async fn set_role(&self, id: &str, role: UserRole) -> DomainResult<Option<User>>;

    /// Tombstones the user; returns `false` when no active user matched
    async fn soft_delete(&self, id: &str) -> DomainResult<bool>;
}
