//! Resource aggregation - from a directory on disk to an analyzed [`Resource`]
//!
//! Builds the manifest model, reads and scans every resolved script, and
//! loads locale data. Manifest-level failures abort the resource; per-script
//! failures become collected diagnostics and the remaining scripts still
//! contribute their declarations.

use crate::scanner;
use fxdoc_manifest::{
    Diagnostic, DiagnosticKind, Manifest, ManifestError, Resource, Script, ScriptScope,
};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Analyze the resource rooted at `resource_root`
pub fn analyze(resource_root: &Path) -> Result<Resource, ManifestError> {
    let manifest = Manifest::parse(resource_root)?;
    info!(
        resource = %manifest.resource,
        shared = manifest.shared_scripts.len(),
        client = manifest.client_scripts.len(),
        server = manifest.server_scripts.len(),
        "analyzing resource"
    );

    let mut diagnostics = Vec::new();
    let shared = build_scripts(&manifest, ScriptScope::Shared, &mut diagnostics);
    let client = build_scripts(&manifest, ScriptScope::Client, &mut diagnostics);
    let server = build_scripts(&manifest, ScriptScope::Server, &mut diagnostics);

    let locale_data = load_locale_data(&manifest)?;

    Ok(Resource {
        manifest,
        locale_data,
        shared,
        client,
        server,
        diagnostics,
    })
}

fn build_scripts(
    manifest: &Manifest,
    scope: ScriptScope,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Script> {
    let list = match scope {
        ScriptScope::Shared => &manifest.shared_scripts,
        ScriptScope::Client => &manifest.client_scripts,
        ScriptScope::Server => &manifest.server_scripts,
    };

    list.iter()
        .map(|rel| build_script(manifest, rel, diagnostics))
        .collect()
}

fn build_script(manifest: &Manifest, rel: &str, diagnostics: &mut Vec<Diagnostic>) -> Script {
    let path = manifest.path.join(rel);

    if !path.exists() {
        diagnostics.push(Diagnostic {
            resource: manifest.resource.clone(),
            script: rel.to_string(),
            kind: DiagnosticKind::MissingScript,
            message: format!("declared script {rel} does not exist"),
        });
        return Script::missing(rel.to_string(), manifest.resource.clone());
    }

    match fs::read_to_string(&path) {
        Ok(source) => {
            let set = scanner::scan(&source, &manifest.resource);
            debug!(script = rel, declarations = set.events.len() + set.callbacks.len() + set.commands.len() + set.exports.len(), "scanned");
            Script {
                path: rel.to_string(),
                resource: manifest.resource.clone(),
                exists: true,
                events: set.events,
                callbacks: set.callbacks,
                commands: set.commands,
                exports: set.exports,
            }
        }
        Err(err) => {
            diagnostics.push(Diagnostic {
                resource: manifest.resource.clone(),
                script: rel.to_string(),
                kind: DiagnosticKind::ScriptUnreadable,
                message: format!("could not read {rel}: {err}"),
            });
            Script {
                exists: true,
                ..Script::missing(rel.to_string(), manifest.resource.clone())
            }
        }
    }
}

/// Load the English locale JSON when the manifest exposes one
///
/// A file that exists but does not parse as a JSON object aborts the
/// resource - documentation generated from bad locale data would be wrong.
fn load_locale_data(
    manifest: &Manifest,
) -> Result<Option<serde_json::Map<String, serde_json::Value>>, ManifestError> {
    let Some(path) = &manifest.english_locale else {
        return Ok(None);
    };

    let text = fs::read_to_string(path)?;
    let data = serde_json::from_str(&text).map_err(|source| ManifestError::LocaleDataCorrupt {
        path: path.clone(),
        source,
    })?;
    Ok(Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxdoc_manifest::MANIFEST_FILENAME;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_empty_directory_fails_before_any_script_work() {
        let dir = TempDir::new().unwrap();
        let err = analyze(dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound(_)));
    }

    #[test]
    fn test_aggregation_collects_declarations_per_scope() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            MANIFEST_FILENAME,
            concat!(
                "description 'Test resource'\n",
                "client_scripts {'client/main.lua'}\n",
                "server_scripts {'server/main.lua'}\n",
            ),
        );
        write(
            dir.path(),
            "client/main.lua",
            "RegisterNetEvent('demo:notify', function(msg)\nend)\n",
        );
        write(
            dir.path(),
            "server/main.lua",
            concat!(
                "lib.callback.register('demo:fetch', function(source)\n",
                "    return {}\n",
                "end)\n",
            ),
        );

        let resource = analyze(dir.path()).unwrap();
        assert_eq!(resource.client.len(), 1);
        assert_eq!(resource.client[0].events.len(), 1);
        assert_eq!(resource.server[0].callbacks.len(), 1);
        assert!(resource.shared.is_empty());
        assert!(resource.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_script_is_a_diagnostic_not_an_error() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            MANIFEST_FILENAME,
            "server_scripts {'server/gone.lua', 'server/here.lua'}\n",
        );
        write(
            dir.path(),
            "server/here.lua",
            "RegisterNetEvent('demo:ping', function()\nend)\n",
        );

        let resource = analyze(dir.path()).unwrap();
        assert_eq!(resource.server.len(), 2);
        assert!(!resource.server[0].exists);
        assert!(resource.server[0].events.is_empty());
        // The sibling script is unaffected
        assert_eq!(resource.server[1].events.len(), 1);

        assert_eq!(resource.diagnostics.len(), 1);
        assert_eq!(resource.diagnostics[0].kind, DiagnosticKind::MissingScript);
        assert_eq!(resource.diagnostics[0].script, "server/gone.lua");
    }

    #[test]
    fn test_locale_data_loaded_for_english() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), MANIFEST_FILENAME, "description 'x'\n");
        write(dir.path(), "locales/en.json", r#"{"greeting": "hello"}"#);

        let resource = analyze(dir.path()).unwrap();
        let data = resource.locale_data.unwrap();
        assert_eq!(data.get("greeting").and_then(|v| v.as_str()), Some("hello"));
    }

    #[test]
    fn test_corrupt_locale_data_is_fatal() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), MANIFEST_FILENAME, "description 'x'\n");
        write(dir.path(), "locales/en.json", "not json at all");

        let err = analyze(dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::LocaleDataCorrupt { .. }));
    }

    #[test]
    fn test_no_locales_directory_is_fine() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), MANIFEST_FILENAME, "description 'x'\n");

        let resource = analyze(dir.path()).unwrap();
        assert!(resource.locale_data.is_none());
        assert!(resource.manifest.locales.is_empty());
    }
}
