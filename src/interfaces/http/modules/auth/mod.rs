//! Authentication module: registration, sessions, profile, password and self-delete

pub mod cookie;
pub mod dto;
pub mod handlers;

pub use cookie::SessionCookie;
pub use dto::*;
pub use handlers::*;
