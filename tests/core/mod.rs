//! Core behavior tests.

mod bucket_tests;
mod permission_tests;
mod snowflake_tests;
