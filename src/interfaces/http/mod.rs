//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validating extractors
//! - `middleware`: session authentication and role gates
//! - `rate_limit`: login throttle
//! - `request_id`: request correlation IDs
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod rate_limit;
pub mod request_id;
pub mod router;

pub use rate_limit::{LoginThrottle, LoginThrottleConfig};
pub use router::{create_api_router, ApiDoc};
