//! Shared HTTP plumbing: response envelope, error mapping, validating extractors

pub mod error;
pub mod response;
pub mod validated_json;

pub use error::{ApiError, ApiResult};
pub use response::{ApiResponse, MessageResponse};
pub use validated_json::{ValidatedJson, ValidatedQuery};
