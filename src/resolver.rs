//! Base-name validation and extension probing.
//!
//! A request names an asset by its base name only. The resolver turns that into
//! a concrete file by trying each configured extension in preference order.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use crate::config::{AudioFormat, Config};
use crate::error::AudioServerError;

/// A base name matched to a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAudio {
    pub name: String,
    pub path: PathBuf,
    pub format: AudioFormat,
}

impl ResolvedAudio {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.format.extension)
    }
}

/// Response for the single-file info lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioInfo {
    pub name: String,
    pub extension: String,
}

/// Whether a base name can be served: not empty, not `.` or `..`, and free of
/// path separators and NUL bytes.
pub fn is_servable_name(name: &str) -> bool {
    !(name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('\0')
        || name.contains('/')
        || name.contains('\\'))
}

/// Reject base names that could address anything outside the audio directory.
///
/// Runs before any filesystem access.
pub fn validate_name(name: &str) -> Result<(), AudioServerError> {
    if !is_servable_name(name) {
        warn!("Path traversal attempt detected in base name: {:?}", name);
        return Err(AudioServerError::PathTraversal);
    }

    Ok(())
}

/// Find the most preferred existing file for `name`.
pub async fn resolve(
    root: &Path,
    config: &Config,
    name: &str,
) -> Result<ResolvedAudio, AudioServerError> {
    validate_name(name)?;

    for format in &config.formats {
        let candidate = root.join(format!("{}.{}", name, format.extension));

        let Ok(metadata) = fs::metadata(&candidate).await else {
            continue;
        };
        if !metadata.is_file() {
            debug!("Skipping non-file candidate: {}", candidate.display());
            continue;
        }

        let path = verify_within_root(root, &candidate).await?;
        return Ok(ResolvedAudio {
            name: name.to_string(),
            path,
            format: format.clone(),
        });
    }

    Err(AudioServerError::NotFound(name.to_string()))
}

/// Report the first matching extension for `name` without opening the file.
pub async fn lookup_info(
    root: &Path,
    config: &Config,
    name: &str,
) -> Result<AudioInfo, AudioServerError> {
    let resolved = resolve(root, config, name).await?;
    Ok(AudioInfo {
        name: resolved.name,
        extension: resolved.format.extension,
    })
}

/// Canonicalize an existing candidate and make sure symlinks did not lead it
/// out of the audio directory.
async fn verify_within_root(root: &Path, candidate: &Path) -> Result<PathBuf, AudioServerError> {
    let canonical_root = fs::canonicalize(root).await?;
    let canonical_path = fs::canonicalize(candidate).await?;

    if !canonical_path.starts_with(&canonical_root) {
        warn!(
            "Symlink escape attempt: {:?} resolved to {:?} which is outside {:?}",
            candidate, canonical_path, canonical_root
        );
        return Err(AudioServerError::PathTraversal);
    }

    Ok(canonical_path)
}
