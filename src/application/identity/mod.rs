//! Identity use cases
//!
//! Contains the `UserService` which orchestrates the self-service account
//! use-cases: registration, login/logout, profile edits, password changes
//! and account deletion.

pub mod service;

pub use service::{AuthResult, RegisterUser, UserService};
