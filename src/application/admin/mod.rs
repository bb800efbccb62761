//! Admin use-cases: the promotion request workflow and role changes

pub mod requests;
pub mod roles;

pub use requests::{AdminRequestService, Resolution, SubmitAdminRequest};
pub use roles::RoleService;
