//! Wildcard expansion for manifest script lists
//!
//! Manifest entries like `client/*.lua` or `modules/**/shared.lua` are
//! resolved against the resource's file tree. Matching happens on
//! forward-slash paths relative to the resource root, so metacharacters in
//! the root's own directory name are never reinterpreted as pattern syntax.

use glob_match::glob_match;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Characters that mark an entry as a glob pattern rather than a literal path
const WILDCARD_CHARS: [char; 4] = ['*', '?', '[', ']'];

fn is_pattern(entry: &str) -> bool {
    entry.contains(WILDCARD_CHARS)
}

/// Resolve a script list against the resource tree
///
/// Literal entries pass through verbatim whether or not the file exists.
/// Pattern entries expand to every matching file, lexicographically ordered.
/// The output never contains a path twice: the first emission wins, whether
/// it came from a literal entry or from an earlier pattern.
pub fn expand(entries: &[String], root: &Path) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut resolved = Vec::new();

    for entry in entries {
        let normalized = entry.replace('\\', "/");

        if !is_pattern(&normalized) {
            if seen.insert(normalized.clone()) {
                resolved.push(normalized);
            }
            continue;
        }

        let mut matches = matching_files(&normalized, root);
        matches.sort();
        debug!(pattern = %normalized, count = matches.len(), "expanded script glob");

        for path in matches {
            if seen.insert(path.clone()) {
                resolved.push(path);
            }
        }
    }

    resolved
}

/// All files under `root` whose root-relative path matches `pattern`
fn matching_files(pattern: &str, root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| relative_slash_path(entry.path(), root))
        .filter(|rel| glob_match(pattern, rel))
        .collect()
}

fn relative_slash_path(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_literal_entries_pass_through() {
        let dir = TempDir::new().unwrap();
        // No file on disk - literals still pass through verbatim
        let out = expand(&entries(&["client/main.lua"]), dir.path());
        assert_eq!(out, vec!["client/main.lua"]);
    }

    #[test]
    fn test_single_star_expansion_is_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "client/zebra.lua");
        touch(dir.path(), "client/alpha.lua");
        touch(dir.path(), "client/readme.md");

        let out = expand(&entries(&["client/*.lua"]), dir.path());
        assert_eq!(out, vec!["client/alpha.lua", "client/zebra.lua"]);
    }

    #[test]
    fn test_recursive_wildcard() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "modules/banking/server.lua");
        touch(dir.path(), "modules/garage/nested/server.lua");
        touch(dir.path(), "modules/garage/client.lua");

        let out = expand(&entries(&["modules/**/server.lua"]), dir.path());
        assert_eq!(
            out,
            vec![
                "modules/banking/server.lua",
                "modules/garage/nested/server.lua",
            ]
        );
    }

    #[test]
    fn test_global_dedup_across_entries() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "shared/util.lua");
        touch(dir.path(), "shared/config.lua");

        // util.lua shows up as a literal, then again via the glob
        let out = expand(&entries(&["shared/util.lua", "shared/*.lua"]), dir.path());
        assert_eq!(out, vec!["shared/util.lua", "shared/config.lua"]);
    }

    #[test]
    fn test_duplicate_literals_collapse() {
        let dir = TempDir::new().unwrap();
        let out = expand(&entries(&["a.lua", "a.lua", "b.lua"]), dir.path());
        assert_eq!(out, vec!["a.lua", "b.lua"]);
    }

    #[test]
    fn test_zero_match_glob_contributes_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "client/main.lua");

        let out = expand(&entries(&["missing/*.lua", "client/main.lua"]), dir.path());
        assert_eq!(out, vec!["client/main.lua"]);
    }

    #[test]
    fn test_first_occurrence_order_preserved() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "server/db.lua");
        touch(dir.path(), "server/api.lua");

        let out = expand(
            &entries(&["config.lua", "server/*.lua", "init.lua"]),
            dir.path(),
        );
        assert_eq!(
            out,
            vec!["config.lua", "server/api.lua", "server/db.lua", "init.lua"]
        );
    }

    #[test]
    fn test_backslash_entries_normalized() {
        let dir = TempDir::new().unwrap();
        let out = expand(&entries(&["client\\main.lua"]), dir.path());
        assert_eq!(out, vec!["client/main.lua"]);
    }
}
