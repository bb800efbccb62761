//! Domain layer: entities, DTOs and repository interfaces

pub mod activity_log;
pub mod admin_request;
pub mod repositories;
pub mod user;

pub use activity_log::{ActivityLogEntry, ActivityLogRepositoryInterface, ActivityType};
pub use admin_request::{AdminRequest, AdminRequestRepositoryInterface, CreateAdminRequestDto};
pub use repositories::{DomainResult, RepositoryProvider};
pub use user::{CreateUserDto, UpdateProfileDto, User, UserRepositoryInterface, UserRole};

pub use crate::shared::errors::DomainError;
