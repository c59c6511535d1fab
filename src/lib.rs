//! shelf-lookup - predefined product and inventory lookups.
//!
//! This library exposes the core modules for the binary and for
//! integration tests.

pub mod binding;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod output;
pub mod tui;
