//! Admin-promotion request aggregate

pub mod model;
pub mod repository;

pub use model::{AdminRequest, CreateAdminRequestDto};
pub use repository::AdminRequestRepositoryInterface;
