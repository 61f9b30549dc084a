use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a resource's manifest model
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("no fxmanifest.lua found in {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read manifest: {0}")]
    Unreadable(#[from] io::Error),

    #[error("locale data at {} is not valid JSON: {source}", path.display())]
    LocaleDataCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_directory() {
        let err = ManifestError::NotFound(PathBuf::from("/srv/resources/bank"));
        assert_eq!(err.to_string(), "no fxmanifest.lua found in /srv/resources/bank");
    }
}
