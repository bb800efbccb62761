//! Admin-promotion request workflow
//!
//! A request is submitted without authentication, then resolved exactly once
//! by an admin: approval creates an admin account from the captured
//! identity and credential hash, rejection tombstones the request.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::{
    ActivityType, AdminRequest, CreateAdminRequestDto, CreateUserDto, DomainError, DomainResult,
    RepositoryProvider, User, UserRole,
};
use crate::infrastructure::crypto::password::hash_password;
use crate::shared::{validate_username, InfraError, PageRequest};

/// Submission input (plaintext password, hashed here)
#[derive(Debug, Clone)]
pub struct SubmitAdminRequest {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
}

/// Outcome of resolving a pending request
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The newly created admin account
    Approved(User),
    Rejected,
}

fn request_not_found(id: &str) -> DomainError {
    DomainError::not_found("Admin request", "id", id)
}

fn record_resolution(outcome: &'static str) {
    metrics::counter!("admin_requests_resolved_total", "outcome" => outcome).increment(1);
}

#[derive(Clone)]
pub struct AdminRequestService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AdminRequestService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Queue a self-service admin request.
    ///
    /// Uniqueness is checked against active users only; other pending
    /// requests with the same identity are allowed.
    pub async fn submit(&self, input: SubmitAdminRequest) -> DomainResult<AdminRequest> {
        validate_username(&input.username)?;

        if self
            .repos
            .users()
            .exists_active_with_email_or_username(&input.email, &input.username)
            .await?
        {
            return Err(DomainError::Conflict("User already exists".into()));
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| InfraError::Crypto(format!("Failed to hash password: {}", e)))?;

        let request = self
            .repos
            .admin_requests()
            .create(CreateAdminRequestDto {
                username: input.username,
                email: input.email,
                full_name: input.full_name,
                password_hash,
            })
            .await?;

        metrics::counter!("admin_requests_submitted_total").increment(1);
        info!(request_id = %request.id, username = %request.username, "Admin request submitted");
        Ok(request)
    }

    /// Pending requests, newest first
    pub async fn list_pending(&self, page: PageRequest) -> DomainResult<Vec<AdminRequest>> {
        self.repos.admin_requests().list_pending(page).await
    }

    /// Approve or reject a pending request.
    ///
    /// The pending -> resolved transition is a conditional write, so of two
    /// concurrent resolutions only one succeeds; the other gets `NotFound`.
    pub async fn resolve(&self, request_id: &str, approve: bool) -> DomainResult<Resolution> {
        if approve {
            self.approve(request_id).await
        } else {
            self.reject(request_id).await
        }
    }

    async fn approve(&self, request_id: &str) -> DomainResult<Resolution> {
        let requests = self.repos.admin_requests();

        let request = requests
            .find_pending(request_id)
            .await?
            .ok_or_else(|| request_not_found(request_id))?;

        if !requests.mark_validated(request_id).await? {
            warn!(request_id, "Admin request resolved concurrently");
            return Err(request_not_found(request_id));
        }

        // Hash is copied as-is: the candidate's password becomes the account's.
        let created = self
            .repos
            .users()
            .create_user(CreateUserDto {
                username: request.username,
                email: request.email,
                full_name: request.full_name,
                password_hash: request.password_hash,
                role: UserRole::Admin,
            })
            .await;

        let user = match created {
            Ok(user) => user,
            Err(e) => {
                if let Err(reopen) = requests.unmark_validated(request_id).await {
                    error!(request_id, "Failed to reopen admin request: {}", reopen);
                }
                return Err(e);
            }
        };

        self.repos
            .activity_logs()
            .append(&user.id, ActivityType::CreateAdmin, "Admin user created")
            .await?;

        record_resolution("approved");
        info!(request_id, user_id = %user.id, "Admin request approved");
        Ok(Resolution::Approved(user))
    }

    async fn reject(&self, request_id: &str) -> DomainResult<Resolution> {
        if !self
            .repos
            .admin_requests()
            .soft_delete_pending(request_id)
            .await?
        {
            return Err(request_not_found(request_id));
        }

        record_resolution("rejected");
        info!(request_id, "Admin request rejected");
        Ok(Resolution::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{connect_in_memory, SeaOrmRepositoryProvider};

    async fn setup() -> (AdminRequestService, Arc<dyn RepositoryProvider>) {
        let db = connect_in_memory().await.unwrap();
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        (AdminRequestService::new(repos.clone()), repos)
    }

    fn candidate(username: &str) -> SubmitAdminRequest {
        SubmitAdminRequest {
            username: username.into(),
            email: format!("{}@example.com", username),
            full_name: Some("Root Candidate".into()),
            password: "correct-horse".into(),
        }
    }

    async fn regular_user(repos: &Arc<dyn RepositoryProvider>, username: &str) -> User {
        repos
            .users()
            .create_user(CreateUserDto {
                username: username.into(),
                email: format!("{}@example.com", username),
                full_name: None,
                password_hash: "$2b$10$hash".into(),
                role: UserRole::Regular,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn submit_rejects_bad_username_without_writing() {
        let (service, repos) = setup().await;

        let err = service.submit(candidate("root-admin")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let pending = repos
            .admin_requests()
            .list_pending(PageRequest::default())
            .await
            .unwrap();
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn submit_conflicts_only_with_active_users() {
        let (service, repos) = setup().await;
        let existing = regular_user(&repos, "taken").await;

        assert!(matches!(
            service.submit(candidate("taken")).await,
            Err(DomainError::Conflict(_))
        ));

        repos.users().soft_delete(&existing.id).await.unwrap();
        let request = service.submit(candidate("taken")).await.unwrap();
        assert!(request.is_pending());
        assert_ne!(request.password_hash, "correct-horse");
    }

    #[tokio::test]
    async fn approve_creates_admin_and_logs_once() {
        let (service, repos) = setup().await;
        let request = service.submit(candidate("root")).await.unwrap();

        let Resolution::Approved(admin) = service.resolve(&request.id, true).await.unwrap() else {
            panic!("expected approval");
        };

        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.username, "root");
        assert_eq!(admin.password_hash, request.password_hash);
        assert_ne!(admin.id, request.id);

        let logs = repos.activity_logs().list_for_user(&admin.id).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].activity_type, ActivityType::CreateAdmin);

        assert!(repos
            .admin_requests()
            .find_pending(&request.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn reject_tombstones_without_side_effects() {
        let (service, repos) = setup().await;
        let request = service.submit(candidate("root")).await.unwrap();

        assert!(matches!(
            service.resolve(&request.id, false).await.unwrap(),
            Resolution::Rejected
        ));

        assert!(repos
            .users()
            .find_active_by_email("root@example.com")
            .await
            .unwrap()
            .is_none());
        assert!(service
            .list_pending(PageRequest::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn resolved_request_cannot_be_resolved_again() {
        let (service, _) = setup().await;

        let approved = service.submit(candidate("first")).await.unwrap();
        service.resolve(&approved.id, true).await.unwrap();
        for approve in [true, false] {
            assert!(matches!(
                service.resolve(&approved.id, approve).await,
                Err(DomainError::NotFound { .. })
            ));
        }

        let rejected = service.submit(candidate("second")).await.unwrap();
        service.resolve(&rejected.id, false).await.unwrap();
        for approve in [true, false] {
            assert!(matches!(
                service.resolve(&rejected.id, approve).await,
                Err(DomainError::NotFound { .. })
            ));
        }

        assert!(matches!(
            service.resolve("no-such-request", true).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn failed_account_creation_reopens_request() {
        let (service, repos) = setup().await;

        // Two requests for the same identity; the second approval collides.
        let first = service.submit(candidate("twin")).await.unwrap();
        let second = service.submit(candidate("twin")).await.unwrap();
        service.resolve(&first.id, true).await.unwrap();

        let err = service.resolve(&second.id, true).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(repos
            .admin_requests()
            .find_pending(&second.id)
            .await
            .unwrap()
            .is_some());
    }
}
