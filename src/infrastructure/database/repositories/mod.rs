//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod activity_log_repository;
pub mod admin_request_repository;
pub mod repository_provider;
pub mod user_repository;

pub use activity_log_repository::SeaOrmActivityLogRepository;
pub use admin_request_repository::SeaOrmAdminRequestRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;
