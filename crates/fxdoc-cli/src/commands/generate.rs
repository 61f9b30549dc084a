//! `fxdoc generate` - write the documentation tree for a resource

use crate::commands::inspect::resolve_resource_root;
use crate::common::GlobalOpts;
use crate::writer;
use anyhow::Result;
use fxdoc_logger as logger;
use std::path::Path;

pub fn handle_generate(path: &Path, output: &Path, _global: &GlobalOpts) -> Result<()> {
    let root = resolve_resource_root(path)?;

    logger::spinner_start(&format!("Analyzing {}", root.display()));
    let resource = match fxdoc_extract::analyze(&root) {
        Ok(resource) => resource,
        Err(err) => {
            logger::spinner_error("analysis failed");
            return Err(err.into());
        }
    };

    for diagnostic in &resource.diagnostics {
        logger::warn(&diagnostic.message);
    }

    let written = writer::write_docs(&resource, output)?;
    logger::spinner_success(&format!(
        "Wrote {} documents for {}",
        written.len(),
        resource.manifest.resource
    ));

    for path in &written {
        logger::info(&format!("  {}", path.display()));
    }

    if written.is_empty() {
        logger::warn("no documented declarations found; nothing was written");
    }

    Ok(())
}
