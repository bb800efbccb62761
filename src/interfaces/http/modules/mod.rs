//! Route modules: one per resource, each with its DTOs and handlers

pub mod admin;
pub mod auth;
pub mod health;
pub mod metrics;
