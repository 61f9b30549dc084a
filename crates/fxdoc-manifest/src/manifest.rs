//! Manifest parsing - from fxmanifest.lua text to the structured model
//!
//! Parsing is staged: read the file, extract the declared fields, filter
//! framework imports out of the script lists, expand the surviving entries
//! against the resource tree, then list locales. Each stage is a total
//! function over its input; nothing mutates a previously built value.

use crate::errors::ManifestError;
use crate::globs;
use crate::types::{ImportFlags, Manifest};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed manifest filename expected at the resource root
pub const MANIFEST_FILENAME: &str = "fxmanifest.lua";

/// Placeholder used when the manifest declares no description
pub const NO_DESCRIPTION: &str = "No description found";

/// Entries starting with this character reference another resource's files
const IMPORT_PREFIX: char = '@';

/// Shared-list import providing the ox_lib runtime
const OX_LIB_IMPORT: &str = "@ox_lib/init.lua";
/// Shared-list import providing the qbx library module
const QBX_LIB_IMPORT: &str = "@qbx_core/modules/lib.lua";
/// Client-list import providing qbx player data
const QBX_PLAYERDATA_IMPORT: &str = "@qbx_core/modules/playerdata.lua";
/// Server-list import providing the MySQL binding
const OXMYSQL_IMPORT: &str = "@oxmysql/lib/MySQL.lua";

static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^description\s*['"](.*)['"]\s*$"#).expect("static pattern")
});

static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).expect("static pattern"));

impl Manifest {
    /// Parse the manifest of the resource rooted at `resource_root`
    pub fn parse(resource_root: &Path) -> Result<Manifest, ManifestError> {
        let manifest_path = resource_root.join(MANIFEST_FILENAME);
        if !manifest_path.exists() {
            return Err(ManifestError::NotFound(resource_root.to_path_buf()));
        }

        let content = fs::read_to_string(&manifest_path)?;
        debug!(path = %manifest_path.display(), bytes = content.len(), "read manifest");

        let filtered = filter_imports(
            script_list(&content, "shared"),
            script_list(&content, "client"),
            script_list(&content, "server"),
        );

        let locales = list_locales(resource_root);
        let english_locale = find_english_locale(resource_root, &locales);

        Ok(Manifest {
            resource: resource_name(resource_root),
            path: resource_root.to_path_buf(),
            description: description(&content),
            shared_scripts: globs::expand(&filtered.shared, resource_root),
            client_scripts: globs::expand(&filtered.client, resource_root),
            server_scripts: globs::expand(&filtered.server, resource_root),
            imports: filtered.flags,
            unrecognized_imports: filtered.unrecognized,
            locales,
            english_locale,
        })
    }
}

fn resource_name(resource_root: &Path) -> String {
    resource_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| resource_root.display().to_string())
}

fn description(content: &str) -> String {
    DESCRIPTION_RE
        .captures(content)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

/// Extract one category's declared script entries
///
/// The single-line `<category>_script '<path>'` form wins when present;
/// otherwise every quoted string inside the `<category>_scripts { ... }`
/// block is taken in order.
fn script_list(content: &str, category: &str) -> Vec<String> {
    let single = Regex::new(&format!(
        r#"(?m)^{category}_script\s*['"](.*)['"]\s*$"#
    ))
    .expect("static pattern");

    if let Some(captures) = single.captures(content) {
        return vec![captures[1].to_string()];
    }

    let block = Regex::new(&format!(r#"(?ms)^{category}_scripts\s*\{{([^}}]*)\}}"#))
        .expect("static pattern");

    match block.captures(content) {
        Some(captures) => QUOTED_RE
            .captures_iter(&captures[1])
            .map(|c| c[1].to_string())
            .collect(),
        None => Vec::new(),
    }
}

struct FilteredLists {
    shared: Vec<String>,
    client: Vec<String>,
    server: Vec<String>,
    flags: ImportFlags,
    unrecognized: Vec<String>,
}

/// Remove framework-import entries from the user script lists
///
/// The four well-known literals set their flag; any other `@`-prefixed
/// entry moves into the unrecognized set.
fn filter_imports(
    mut shared: Vec<String>,
    mut client: Vec<String>,
    mut server: Vec<String>,
) -> FilteredLists {
    let flags = ImportFlags {
        ox_lib: take_import(&mut shared, OX_LIB_IMPORT),
        qbx_lib: take_import(&mut shared, QBX_LIB_IMPORT),
        qbx_playerdata: take_import(&mut client, QBX_PLAYERDATA_IMPORT),
        oxmysql: take_import(&mut server, OXMYSQL_IMPORT),
    };

    let mut unrecognized = BTreeSet::new();
    for list in [&mut shared, &mut client, &mut server] {
        list.retain(|entry| {
            if entry.starts_with(IMPORT_PREFIX) {
                unrecognized.insert(entry.clone());
                false
            } else {
                true
            }
        });
    }

    FilteredLists {
        shared,
        client,
        server,
        flags,
        unrecognized: unrecognized.into_iter().collect(),
    }
}

fn take_import(list: &mut Vec<String>, literal: &str) -> bool {
    let before = list.len();
    list.retain(|entry| entry != literal);
    list.len() != before
}

/// Locale identifiers from the `locales/` directory listing, sorted
fn list_locales(resource_root: &Path) -> Vec<String> {
    let dir = resource_root.join("locales");
    let Ok(entries) = fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut locales: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            entry
                .path()
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .collect();
    locales.sort();
    locales
}

/// Path to the English locale data file, if the resource ships one
///
/// `en` is preferred over `en-us`; the path is only exposed when the JSON
/// file actually exists. No other locale is ever used as a fallback.
fn find_english_locale(resource_root: &Path, locales: &[String]) -> Option<PathBuf> {
    ["en", "en-us"]
        .iter()
        .find(|id| locales.iter().any(|l| l == *id))
        .map(|id| resource_root.join("locales").join(format!("{id}.json")))
        .filter(|path| path.exists())
}
