//! # Chat Core Library
//!
//! The identifier, partitioning and authorization core of a
//! Discord-compatible chat server:
//! - Snowflake ID generation with an injectable clock and worker identity
//! - Message bucket derivation for time-partitioned storage
//! - Layered permission resolution and role-hierarchy checks
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Value objects, plain records and the permission resolver
//! - **Application Layer**: Services adding logging and metrics, and DTOs
//! - **Infrastructure Layer**: Prometheus metrics
//!
//! ## Module Structure
//!
//! ```text
//! chat_core/
//! +-- config/        Configuration management
//! +-- domain/        Value objects, entities, and domain services
//! +-- application/   Application services and DTOs
//! +-- infrastructure/ Metrics
//! +-- shared/        Common utilities (errors, snowflake generator)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
