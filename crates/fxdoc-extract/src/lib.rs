//! Static declaration discovery for CFX resources
//!
//! This crate does the analysis work behind fxdoc:
//! 1. Pattern-based scanning of Lua script text for event, callback,
//!    command, and export declarations ([`scanner`])
//! 2. Aggregation of a whole resource - manifest, resolved scripts, locale
//!    data, diagnostics ([`resource`])
//! 3. Rendering of each declaration into a reference fragment ([`render`])
//!
//! Scanning is structural text matching, not parsing: declarations a real
//! Lua parser would reject are simply not matched.

pub mod render;
pub mod resource;
pub mod scanner;

pub use resource::analyze;
pub use scanner::{scan, DeclarationSet};
