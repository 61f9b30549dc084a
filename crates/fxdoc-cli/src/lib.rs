//! fxdoc library - expose modules for testing
//!
//! The binary lives in main.rs; integration tests and sibling tools reach
//! the command handlers and the doc writer through here.

pub mod commands;
pub mod common;
pub mod writer;

pub use common::GlobalOpts;
