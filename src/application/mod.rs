//! Application layer: use-case services over the domain repositories

pub mod admin;
pub mod identity;

pub use admin::{AdminRequestService, Resolution, RoleService, SubmitAdminRequest};
pub use identity::{AuthResult, RegisterUser, UserService};
