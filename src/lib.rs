//! # Account Service
//!
//! User accounts, cookie/bearer sessions, role-based authorization and a
//! human-reviewed workflow for promoting accounts to admin.
//!
//! ## Architecture
//!
//! - **domain**: entities, DTOs and repository traits
//! - **application**: use cases (identity, admin requests, role changes)
//! - **infrastructure**: SeaORM persistence, password hashing, session tokens
//! - **interfaces**: axum router, middleware and handlers
//! - **shared**: error taxonomy, pagination, input validation, shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, LoginThrottle};
