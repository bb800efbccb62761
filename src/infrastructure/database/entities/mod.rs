//! Database entities module

pub mod activity_log;
pub mod admin_request;
pub mod user;

pub use activity_log::Entity as ActivityLog;
pub use admin_request::Entity as AdminRequest;
pub use user::Entity as User;
