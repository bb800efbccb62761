//! Session token handling
//!
//! HS256 JWTs signed with the process-wide secret from configuration.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{User, UserRole};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "super-secret-key-change-in-production".to_string(),
            expiration_hours: 24,
            issuer: "account-service".to_string(),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Session claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// User role
    pub role: UserRole,
    /// Username
    pub username: String,
    /// Holds the username rather than the email address; existing clients
    /// read it this way. Do not use for display.
    pub email: String,
    pub full_name: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl SessionClaims {
    /// Claims for `user`, valid for `config.expiration_hours` from `issued_at`
    pub fn for_user(user: &User, config: &JwtConfig, issued_at: DateTime<Utc>) -> Self {
        let exp = issued_at + Duration::hours(config.expiration_hours);

        Self {
            sub: user.id.clone(),
            role: user.role,
            username: user.username.clone(),
            email: user.username.clone(),
            full_name: user.full_name.clone(),
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

/// Create a session token for a user, issued now
pub fn create_token(user: &User, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    create_token_at(user, config, Utc::now())
}

/// Create a session token with an explicit issuance instant
pub fn create_token_at(
    user: &User,
    config: &JwtConfig,
    issued_at: DateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = SessionClaims::for_user(user, config, issued_at);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, issuer and expiry, and decode the claims
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}
