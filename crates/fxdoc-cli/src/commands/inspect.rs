//! `fxdoc inspect` - print a summary of a resource's manifest and declarations

use crate::common::GlobalOpts;
use anyhow::{bail, Context, Result};
use colored::{ColoredString, Colorize};
use fxdoc_logger as logger;
use fxdoc_manifest::{Resource, ScriptScope};
use std::env;
use std::path::{Path, PathBuf};

pub fn handle_inspect(path: &Path, json: bool, _global: &GlobalOpts) -> Result<()> {
    let root = resolve_resource_root(path)?;
    let resource = fxdoc_extract::analyze(&root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resource)?);
        return Ok(());
    }

    print_summary(&resource);

    for diagnostic in &resource.diagnostics {
        logger::warn(&diagnostic.message);
    }

    Ok(())
}

/// Resolve and validate the resource directory argument
///
/// `.` means the current working directory, as in the original tooling this
/// replaces.
pub(crate) fn resolve_resource_root(path: &Path) -> Result<PathBuf> {
    let root = if path == Path::new(".") {
        env::current_dir().context("could not determine the current directory")?
    } else {
        path.to_path_buf()
    };

    if !root.is_dir() {
        bail!("resource directory {} does not exist", root.display());
    }
    Ok(root)
}

fn mark(enabled: bool) -> ColoredString {
    if enabled {
        "\u{2714}".green().bold()
    } else {
        "\u{2718}".red()
    }
}

fn print_summary(resource: &Resource) {
    let manifest = &resource.manifest;

    println!("{}", manifest.resource.bold());
    println!("Path: {}", manifest.path.display());
    println!("Description: {}", manifest.description);

    println!("\n{}", "Scripts".bold());
    for scope in ScriptScope::ALL {
        let scripts = resource.scripts(scope);
        let declarations: usize = scripts.iter().map(|s| s.declaration_count()).sum();
        println!(
            "  {:<7} {} scripts, {} declarations",
            scope,
            scripts.len(),
            declarations
        );
    }

    println!("\n{}", "Imports".bold());
    println!("  {} ox_lib", mark(manifest.imports.ox_lib));
    println!("  {} oxmysql", mark(manifest.imports.oxmysql));
    println!("  {} qbx_lib", mark(manifest.imports.qbx_lib));
    println!("  {} qbx_playerdata", mark(manifest.imports.qbx_playerdata));
    for import in &manifest.unrecognized_imports {
        println!("  {} {}", "?".yellow().bold(), import);
    }

    let commands: Vec<_> = ScriptScope::ALL
        .iter()
        .flat_map(|&scope| resource.scripts(scope))
        .flat_map(|script| &script.commands)
        .collect();
    if !commands.is_empty() {
        println!("\n{}", "Commands".bold());
        for command in commands {
            match &command.help {
                Some(help) => println!("  /{} - {}", command.name, help),
                None => println!("  /{}", command.name),
            }
        }
    }

    if !manifest.locales.is_empty() {
        println!("\nLocales: {}", manifest.locales.join(", "));
        if resource.locale_data.is_some() {
            println!("English locale data loaded");
        }
    }
}
