//! Sync configuration
//!
//! Root directory, excluded path prefixes, preprocessor symbols and the other
//! settings a request runs with. Can be loaded from a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use super::error::{DocSyncError, IoContext, JsonContext, SyncResult};

/// Settings of a documentation sync request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    /// Directory every source file must live in
    pub root: PathBuf,
    /// Path prefixes skipped during discovery, absolute or relative to the root
    pub excluded_paths: Vec<PathBuf>,
    /// Preprocessor symbols considered defined
    pub defines: Vec<String>,
    /// Extra reference files needed to resolve external attribute types
    pub references: Vec<PathBuf>,
    /// Directory receiving a copy of each manifest, for diagnostics
    pub dump_dir: Option<PathBuf>,
}

impl SyncConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file
    ///
    /// A relative `root` is resolved against the directory of the file.
    pub async fn load(path: &Path) -> SyncResult<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_io_context(&format!("Failed to read config file {}", path.display()))?;
        let mut config: SyncConfig = serde_json::from_str(&content)
            .with_json_context(&format!("Failed to parse config file {}", path.display()))?;

        if config.root.is_relative() {
            if let Some(parent) = path.parent() {
                config.root = parent.join(&config.root);
            }
        }
        Ok(config)
    }

    /// Check the root exists and every reference file is present
    pub fn validate(&self) -> SyncResult<()> {
        if !self.root.is_dir() {
            return Err(DocSyncError::RootNotFound {
                path: self.root.clone(),
            });
        }
        for reference in &self.references {
            let resolved = self.resolve(reference);
            if !resolved.is_file() {
                return Err(DocSyncError::Config {
                    message: format!("Reference file not found: {}", resolved.display()),
                });
            }
        }
        Ok(())
    }

    /// Resolve a path against the root unless it is absolute
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Whether a path falls under one of the excluded prefixes
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excluded_paths
            .iter()
            .any(|prefix| path.starts_with(self.resolve(prefix)))
    }
}
