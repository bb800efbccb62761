//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;

pub use crypto::{create_token, hash_password, verify_password, verify_token, JwtConfig, SessionClaims};
pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{connect_in_memory, init_database, run_migrations, DatabaseConfig};
