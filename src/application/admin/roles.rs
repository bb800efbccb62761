//! Privileged role changes

use std::sync::Arc;

use tracing::info;

use crate::domain::{ActivityType, DomainError, DomainResult, RepositoryProvider, User, UserRole};

#[derive(Clone)]
pub struct RoleService {
    repos: Arc<dyn RepositoryProvider>,
}

impl RoleService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn change_to_admin(&self, user_id: &str) -> DomainResult<User> {
        self.set_role(user_id, UserRole::Admin).await
    }

    pub async fn change_to_paid(&self, user_id: &str) -> DomainResult<User> {
        self.set_role(user_id, UserRole::Paid).await
    }

    pub async fn change_to_regular(&self, user_id: &str) -> DomainResult<User> {
        self.set_role(user_id, UserRole::Regular).await
    }

    /// Every call appends a `change_role` entry keyed to the target user,
    /// even when the role is unchanged. The acting admin is not recorded.
    async fn set_role(&self, user_id: &str, role: UserRole) -> DomainResult<User> {
        let user = self
            .repos
            .users()
            .set_role(user_id, role)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        self.repos
            .activity_logs()
            .append(
                user_id,
                ActivityType::ChangeRole,
                &format!("User role changed to {}", role),
            )
            .await?;

        metrics::counter!("role_changes_total", "role" => role.as_str()).increment(1);
        info!(user_id, role = %role, "User role changed");
        Ok(user)
    }
}
