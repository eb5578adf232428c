//! Source file discovery and request path validation
//!
//! Discovery walks the configured root for `.cs` files, skipping excluded
//! prefixes. Validation checks that files named by a request live under the
//! root, exist, and carry the source extension.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;

use tokio::fs;

use super::config::SyncConfig;
use super::constants::CS_EXTENSION;
use super::error::{DocSyncError, IoContext, SyncResult};

/// A request file resolved against the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    pub absolute: PathBuf,
    /// Path relative to the root, used in documents and manifests
    pub relative: PathBuf,
}

/// Find every source file under the root, as sorted root relative paths
pub async fn find_source_files(config: &SyncConfig) -> SyncResult<Vec<PathBuf>> {
    if !config.root.is_dir() {
        return Err(DocSyncError::RootNotFound {
            path: config.root.clone(),
        });
    }
    let mut files = find_cs_files_in_dir(&config.root, config).await?;
    files.sort();
    log::info!(
        "Found {} source files under {}",
        files.len(),
        config.root.display()
    );
    Ok(files)
}

fn find_cs_files_in_dir<'a>(
    dir: &'a Path,
    config: &'a SyncConfig,
) -> Pin<Box<dyn Future<Output = SyncResult<Vec<PathBuf>>> + 'a>> {
    Box::pin(async move {
        let mut cs_files = Vec::new();

        let mut entries = fs::read_dir(dir)
            .await
            .with_io_context(&format!("Failed to read directory {}", dir.display()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .with_io_context("Failed to read directory entry")?
        {
            let path = entry.path();
            if config.is_excluded(&path) {
                log::debug!("Skipping excluded path {}", path.display());
                continue;
            }
            if path.is_file() && has_source_extension(&path) {
                if let Ok(relative_path) = path.strip_prefix(&config.root) {
                    cs_files.push(relative_path.to_path_buf());
                }
            } else if path.is_dir() {
                let mut sub_files = find_cs_files_in_dir(&path, config).await?;
                cs_files.append(&mut sub_files);
            }
        }

        Ok(cs_files)
    })
}

fn has_source_extension(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(CS_EXTENSION)
}

/// Remove `.` and `..` components without touching the file system
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolve a root against the working directory, without following links
pub fn absolute_root(root: &Path) -> SyncResult<PathBuf> {
    let absolute = std::path::absolute(root).with_io_context("Failed to resolve root directory")?;
    Ok(normalize_path(&absolute))
}

/// Validate one request file: inside the root, present, with the source extension
pub fn validate_source_file(root: &Path, path: &Path) -> SyncResult<SourcePath> {
    let root = absolute_root(root)?;
    let absolute = if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&root.join(path))
    };

    let relative = match absolute.strip_prefix(&root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => {
            return Err(DocSyncError::OutsideRoot {
                path: path.to_path_buf(),
                root,
            });
        }
    };
    if !absolute.is_file() {
        return Err(DocSyncError::SourceFileNotFound { path: absolute });
    }
    if !has_source_extension(&absolute) {
        return Err(DocSyncError::WrongExtension {
            path: absolute,
            expected: CS_EXTENSION.to_string(),
        });
    }

    Ok(SourcePath { absolute, relative })
}

/// Validate every request file, failing on the first invalid one
pub fn validate_source_files(root: &Path, paths: &[PathBuf]) -> SyncResult<Vec<SourcePath>> {
    if !root.is_dir() {
        return Err(DocSyncError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    paths.iter().map(|p| validate_source_file(root, p)).collect()
}
