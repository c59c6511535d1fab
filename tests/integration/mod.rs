//! Integration tests for shelf-lookup.

pub mod common;
pub mod lookup_flow_test;
pub mod postgres_test;
pub mod sqlite_test;
