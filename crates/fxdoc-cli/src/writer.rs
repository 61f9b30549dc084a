//! Documentation tree writer
//!
//! Serializes rendered fragments to `<out>/<resource>/{events,callbacks,exports}/<scope>.md`.
//! A kind directory is only created when at least one scope has declarations
//! of that kind; a scope file is only written when its collection is
//! non-empty.

use fxdoc_extract::render;
use fxdoc_manifest::{Resource, Script, ScriptScope};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Declaration kinds that get their own directory in the output tree
const DOC_KINDS: [&str; 3] = ["events", "callbacks", "exports"];

/// Write the documentation tree for one analyzed resource
///
/// Returns the paths of every document written, in output order.
pub fn write_docs(resource: &Resource, out_root: &Path) -> io::Result<Vec<PathBuf>> {
    let resource_root = out_root.join(&resource.manifest.resource);
    let mut written = Vec::new();

    for kind in DOC_KINDS {
        let documents: Vec<(ScriptScope, String)> = ScriptScope::ALL
            .iter()
            .filter_map(|&scope| {
                let body = kind_document(resource, scope, kind)?;
                Some((scope, body))
            })
            .collect();

        if documents.is_empty() {
            continue;
        }

        let kind_dir = resource_root.join(kind);
        fs::create_dir_all(&kind_dir)?;

        for (scope, body) in documents {
            let path = kind_dir.join(format!("{scope}.md"));
            fs::write(&path, body)?;
            written.push(path);
        }
    }

    Ok(written)
}

/// Build one scope's document for a declaration kind, None when empty
fn kind_document(resource: &Resource, scope: ScriptScope, kind: &str) -> Option<String> {
    let fragments: Vec<String> = resource
        .scripts(scope)
        .iter()
        .flat_map(|script| script_fragments(script, scope, kind))
        .collect();

    if fragments.is_empty() {
        return None;
    }

    let title = format!(
        "# {} {} ({})\n\n",
        resource.manifest.resource, kind, scope
    );
    Some(title + &fragments.join("\n"))
}

fn script_fragments(script: &Script, scope: ScriptScope, kind: &str) -> Vec<String> {
    match kind {
        "events" => script
            .events
            .iter()
            .map(|event| render::event_fragment(event, scope))
            .collect(),
        "callbacks" => script
            .callbacks
            .iter()
            .map(render::callback_fragment)
            .collect(),
        "exports" => script.exports.iter().map(render::export_fragment).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxdoc_manifest::{Event, ImportFlags, Manifest};
    use tempfile::TempDir;

    fn empty_manifest(resource: &str) -> Manifest {
        Manifest {
            resource: resource.to_string(),
            path: PathBuf::from("."),
            description: "test".to_string(),
            shared_scripts: Vec::new(),
            client_scripts: Vec::new(),
            server_scripts: Vec::new(),
            imports: ImportFlags::default(),
            unrecognized_imports: Vec::new(),
            locales: Vec::new(),
            english_locale: None,
        }
    }

    fn script_with_event(resource: &str, event_name: &str) -> Script {
        Script {
            path: "server/main.lua".to_string(),
            resource: resource.to_string(),
            exists: true,
            events: vec![Event {
                name: event_name.to_string(),
                args: vec!["src".to_string()],
                annotations: Vec::new(),
            }],
            callbacks: Vec::new(),
            commands: Vec::new(),
            exports: Vec::new(),
        }
    }

    #[test]
    fn test_empty_resource_writes_nothing() {
        let out = TempDir::new().unwrap();
        let resource = Resource {
            manifest: empty_manifest("empty"),
            locale_data: None,
            shared: Vec::new(),
            client: Vec::new(),
            server: Vec::new(),
            diagnostics: Vec::new(),
        };

        let written = write_docs(&resource, out.path()).unwrap();
        assert!(written.is_empty());
        assert!(!out.path().join("empty").exists());
    }

    #[test]
    fn test_only_populated_kind_and_scope_written() {
        let out = TempDir::new().unwrap();
        let resource = Resource {
            manifest: empty_manifest("bank"),
            locale_data: None,
            shared: Vec::new(),
            client: Vec::new(),
            server: vec![script_with_event("bank", "bank:deposit")],
            diagnostics: Vec::new(),
        };

        let written = write_docs(&resource, out.path()).unwrap();
        assert_eq!(written.len(), 1);

        let doc = out.path().join("bank").join("events").join("server.md");
        assert_eq!(written[0], doc);
        let body = fs::read_to_string(doc).unwrap();
        assert!(body.starts_with("# bank events (server)"));
        assert!(body.contains("TriggerServerEvent('bank:deposit', src)"));

        // Kinds with no declarations anywhere get no directory at all
        assert!(!out.path().join("bank").join("callbacks").exists());
        assert!(!out.path().join("bank").join("exports").exists());
    }
}
