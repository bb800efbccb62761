//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::activity_log::ActivityLogRepositoryInterface;
use crate::domain::admin_request::AdminRequestRepositoryInterface;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::UserRepositoryInterface;

use super::activity_log_repository::SeaOrmActivityLogRepository;
use super::admin_request_repository::SeaOrmAdminRequestRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let user = repos.users().find_active_by_email("alice@example.com").await?;
/// let pending = repos.admin_requests().list_pending(PageRequest::default()).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    admin_requests: SeaOrmAdminRequestRepository,
    activity_logs: SeaOrmActivityLogRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            admin_requests: SeaOrmAdminRequestRepository::new(db.clone()),
            activity_logs: SeaOrmActivityLogRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn admin_requests(&self) -> &dyn AdminRequestRepositoryInterface {
        &self.admin_requests
    }

    fn activity_logs(&self) -> &dyn ActivityLogRepositoryInterface {
        &self.activity_logs
    }
}
