//! Data model for analyzed resources
//!
//! Every entity fxdoc extracts lives here: the manifest, the per-script
//! declaration records, and the aggregated resource tree. All values are
//! write-once - constructed by the parser/aggregator and read by renderers
//! and the CLI, never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// =============================================================================
// MANIFEST
// =============================================================================

/// Parsed view of a resource's `fxmanifest.lua`
///
/// Script lists are import-filtered, glob-expanded, deduplicated, and keep
/// their first-occurrence order from the manifest source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Resource name, taken from the resource directory name
    pub resource: String,
    /// Absolute path to the resource root
    pub path: PathBuf,
    pub description: String,
    #[serde(default)]
    pub shared_scripts: Vec<String>,
    #[serde(default)]
    pub client_scripts: Vec<String>,
    #[serde(default)]
    pub server_scripts: Vec<String>,
    /// Well-known framework imports recognized (and removed) from the lists
    pub imports: ImportFlags,
    /// `@`-prefixed entries that matched no known import, deduplicated and sorted
    #[serde(default)]
    pub unrecognized_imports: Vec<String>,
    /// Locale identifiers derived from the `locales/` directory listing
    #[serde(default)]
    pub locales: Vec<String>,
    /// Path to the English locale JSON file, when one exists on disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english_locale: Option<PathBuf>,
}

/// Which well-known framework libraries the manifest pulls in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFlags {
    #[serde(default)]
    pub ox_lib: bool,
    #[serde(default)]
    pub qbx_lib: bool,
    #[serde(default)]
    pub qbx_playerdata: bool,
    #[serde(default)]
    pub oxmysql: bool,
}

/// Which script list a script was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptScope {
    Shared,
    Client,
    Server,
}

impl ScriptScope {
    pub const ALL: [ScriptScope; 3] = [ScriptScope::Server, ScriptScope::Client, ScriptScope::Shared];

    pub fn as_str(self) -> &'static str {
        match self {
            ScriptScope::Shared => "shared",
            ScriptScope::Client => "client",
            ScriptScope::Server => "server",
        }
    }
}

impl std::fmt::Display for ScriptScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// DECLARATIONS
// =============================================================================

/// A `---@param <name> <type>` annotation attached to a declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamAnnotation {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A network event registration found in a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    /// Handler parameter names as written in the source
    #[serde(default)]
    pub args: Vec<String>,
    /// Annotations from the contiguous doc block above the registration.
    /// Matched to args by name; may cover only a subset of them.
    #[serde(default)]
    pub annotations: Vec<ParamAnnotation>,
}

/// A request/response callback registration found in a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    pub name: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<ParamAnnotation>,
}

/// One `{name = ..., type = ..., help = ...}` entry of a command's params array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub help: String,
}

/// A chat/console command registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default)]
    pub params: Vec<CommandParam>,
}

/// A function the resource exposes to other resources
///
/// Built by linking an `exports('<name>', <ident>)` binding to the nearest
/// preceding function definition with the bound identifier's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    pub name: String,
    /// Owning resource, for the `exports.<resource>:<name>()` invocation form
    pub resource: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Declared types for annotated arguments only
    #[serde(default)]
    pub arg_types: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

// =============================================================================
// SCRIPT / RESOURCE
// =============================================================================

/// One concrete script file from a resolved script list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// Forward-slash path relative to the resource root
    pub path: String,
    pub resource: String,
    pub exists: bool,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub callbacks: Vec<Callback>,
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(default)]
    pub exports: Vec<Export>,
}

impl Script {
    /// A placeholder for a declared script that could not be read
    pub fn missing(path: String, resource: String) -> Self {
        Script {
            path,
            resource,
            exists: false,
            events: Vec::new(),
            callbacks: Vec::new(),
            commands: Vec::new(),
            exports: Vec::new(),
        }
    }

    pub fn declaration_count(&self) -> usize {
        self.events.len() + self.callbacks.len() + self.commands.len() + self.exports.len()
    }
}

/// Root aggregate: one manifest plus the analyzed scripts of each scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub manifest: Manifest,
    /// English locale data, when the resource ships one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale_data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub shared: Vec<Script>,
    #[serde(default)]
    pub client: Vec<Script>,
    #[serde(default)]
    pub server: Vec<Script>,
    /// Non-fatal per-script problems encountered during aggregation
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Resource {
    pub fn scripts(&self, scope: ScriptScope) -> &[Script] {
        match scope {
            ScriptScope::Shared => &self.shared,
            ScriptScope::Client => &self.client,
            ScriptScope::Server => &self.server,
        }
    }
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Category of a non-fatal aggregation problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A declared script path does not exist on disk
    MissingScript,
    /// The script exists but could not be opened for reading
    ScriptUnreadable,
}

/// A collected diagnostic record, reported to the caller instead of printed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub resource: String,
    pub script: String,
    pub kind: DiagnosticKind,
    pub message: String,
}
