//! # Domain Services
//!
//! Domain services encapsulate business logic that doesn't naturally belong
//! to a single entity.
//!
//! ## Services
//!
//! - **PermissionResolver**: Permission resolution and role-hierarchy validation

mod permission_service;

pub use permission_service::*;
