//! Data Transfer Objects
//!
//! DTOs for request/response serialization at the edge of the core.

pub mod request;
pub mod response;

pub use request::AccessCheckRequest;
pub use response::{AccessCheckResponse, PermissionsResponse, SnowflakeResponse};
