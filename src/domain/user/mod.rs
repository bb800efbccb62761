//! User aggregate
//!
//! Contains the User entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_update;

pub use model::{User, UserRole};

pub use dto_create::CreateUserDto;
pub use dto_update::UpdateProfileDto;

pub use repository::UserRepositoryInterface;
