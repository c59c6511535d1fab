//! TUI widgets.

pub mod header;
pub mod table;
