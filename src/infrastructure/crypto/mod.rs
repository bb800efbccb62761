//! Password hashing and session tokens

pub mod jwt;
pub mod password;

pub use jwt::{create_token, verify_token, JwtConfig, SessionClaims};
pub use password::{hash_password, verify_password};
