//! fxdoc resource manifest model
//!
//! This crate owns the shared data model for fxdoc and the logic that turns
//! an `fxmanifest.lua` on disk into a structured [`Manifest`]: field
//! extraction, framework-import filtering, wildcard script-list expansion,
//! and locale discovery.

pub mod errors;
pub mod globs;
pub mod manifest;
pub mod types;

pub use errors::ManifestError;
pub use manifest::{MANIFEST_FILENAME, NO_DESCRIPTION};
pub use types::{
    Callback, Command, CommandParam, Diagnostic, DiagnosticKind, Event, Export, ImportFlags,
    Manifest, ParamAnnotation, Resource, Script, ScriptScope,
};
