//! Application Layer
//!
//! Contains services and data transfer objects (DTOs). This layer
//! orchestrates the flow of data between callers and the domain layer.

pub mod dto;
pub mod services;
