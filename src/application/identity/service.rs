//! User management service
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    ActivityType, CreateUserDto, DomainError, DomainResult, RepositoryProvider, UpdateProfileDto,
    User, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::{validate_new_password, validate_password, validate_username, InfraError};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Registration input (plaintext password, hashed here)
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
}

/// Orchestrates the self-service account use cases.
#[derive(Clone)]
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user with role `regular`.
    pub async fn register(&self, input: RegisterUser) -> DomainResult<User> {
        validate_username(&input.username)?;
        validate_password(&input.password)?;

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

        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                username: input.username,
                email: input.email,
                full_name: input.full_name,
                password_hash,
                role: UserRole::Regular,
            })
            .await?;

        self.repos
            .activity_logs()
            .append(&user.id, ActivityType::Register, "User registered")
            .await?;

        info!(user_id = %user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and issue a session token.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().find_active_by_email(email).await? else {
            return Err(DomainError::InvalidCredentials("User not found".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            self.repos
                .activity_logs()
                .append(&user.id, ActivityType::LoginFailed, "Invalid credentials")
                .await?;
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(DomainError::InvalidCredentials("Invalid credentials".into()));
        }

        let token = create_token(&user, &self.jwt_config)
            .map_err(|e| InfraError::Crypto(format!("Failed to create token: {}", e)))?;

        self.repos
            .activity_logs()
            .append(&user.id, ActivityType::Login, "User logged in")
            .await?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    /// Record a logout. The session cookie is cleared by the HTTP layer.
    pub async fn logout(&self, user_id: &str) -> DomainResult<()> {
        self.repos
            .activity_logs()
            .append(user_id, ActivityType::Logout, "User logged out")
            .await?;

        info!(user_id, "User logged out");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The caller's current profile, re-read from the store.
    pub async fn current_user(&self, user_id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_active_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Update own profile; absent fields keep their stored values.
    pub async fn update_profile(&self, user_id: &str, dto: UpdateProfileDto) -> DomainResult<User> {
        if let Some(username) = dto.username.as_deref() {
            validate_username(username)?;
        }

        let user = self
            .repos
            .users()
            .update_profile(user_id, dto)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        self.repos
            .activity_logs()
            .append(user_id, ActivityType::ProfileUpdate, "User updated profile")
            .await?;

        info!(user_id, "Profile updated");
        Ok(user)
    }

    /// Change own password. Verifies the old password first.
    pub async fn change_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        validate_new_password(new_password)?;

        let Some(user) = self.repos.users().find_active_by_id(user_id).await? else {
            return Err(DomainError::Validation("User not found".into()));
        };

        let valid = verify_password(old_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Validation("Old password is incorrect".into()));
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| InfraError::Crypto(format!("Failed to hash password: {}", e)))?;

        if !self
            .repos
            .users()
            .update_password_hash(user_id, &new_hash)
            .await?
        {
            return Err(DomainError::Validation("User not found".into()));
        }

        self.repos
            .activity_logs()
            .append(user_id, ActivityType::PasswordChange, "User changed password")
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    /// Create an admin account from configuration unless an active user
    /// already holds its email. Returns `None` when nothing was created.
    pub async fn ensure_admin_account(&self, input: RegisterUser) -> DomainResult<Option<User>> {
        validate_username(&input.username)?;
        validate_password(&input.password)?;

        if self
            .repos
            .users()
            .find_active_by_email(&input.email)
            .await?
            .is_some()
        {
            return Ok(None);
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| InfraError::Crypto(format!("Failed to hash password: {}", e)))?;

        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                username: input.username,
                email: input.email,
                full_name: input.full_name,
                password_hash,
                role: UserRole::Admin,
            })
            .await?;

        self.repos
            .activity_logs()
            .append(&user.id, ActivityType::CreateAdmin, "Admin user created")
            .await?;

        info!(user_id = %user.id, "Bootstrap admin created");
        Ok(Some(user))
    }

    /// Tombstone own account.
    pub async fn delete_account(&self, user_id: &str) -> DomainResult<()> {
        if !self.repos.users().soft_delete(user_id).await? {
            return Err(DomainError::not_found("User", "id", user_id));
        }

        self.repos
            .activity_logs()
            .append(user_id, ActivityType::Delete, "User account deleted")
            .await?;

        info!(user_id, "User account deleted");
        Ok(())
    }
}
