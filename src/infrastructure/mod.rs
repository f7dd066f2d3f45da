//! Infrastructure Layer
//!
//! Contains implementations for process-level concerns:
//! - Prometheus metrics

pub mod metrics;
