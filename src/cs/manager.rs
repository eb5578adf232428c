//! Documentation sync manager
//!
//! `DocsSyncManager` is the entry point for requests: listing the documentable
//! types under a root, extracting documentation for types, and applying an
//! edited documentation document back to source files.

use std::path::PathBuf;

use tokio::fs;

use super::catalog::{TypeManifestEntry, build_catalog, write_manifest};
use super::config::SyncConfig;
use super::doc_xml::{read_documentation, write_documentation};
use super::error::{IoContext, SyncResult};
use super::extractor::extract_documentation;
use super::injector::apply_documentation;
use super::source_finder::{SourcePath, absolute_root, find_source_files, validate_source_files};
use super::symbols::{CsParser, SyntaxFile};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// File name of the manifest copy written to the dump directory
pub const MANIFEST_DUMP_FILE: &str = "types.xml";

/// A parsed request file and how to write it back
struct LoadedFile {
    path: SourcePath,
    has_bom: bool,
}

/// Main documentation sync manager
#[derive(Debug)]
pub struct DocsSyncManager {
    config: SyncConfig,
    parser: CsParser,
}

impl DocsSyncManager {
    /// Create a manager for a validated configuration
    pub fn new(mut config: SyncConfig) -> SyncResult<Self> {
        config.validate()?;
        config.root = absolute_root(&config.root)?;
        Ok(Self {
            config,
            parser: CsParser::new()?,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Read and parse files; nothing is parsed unless every file is valid
    async fn load_files(&mut self, paths: &[PathBuf]) -> SyncResult<(Vec<LoadedFile>, Vec<SyntaxFile>)> {
        let validated = validate_source_files(&self.config.root, paths)?;

        let mut loaded = Vec::with_capacity(validated.len());
        let mut parsed = Vec::with_capacity(validated.len());
        for path in validated {
            let content = fs::read_to_string(&path.absolute)
                .await
                .with_io_context(&format!("Failed to read {}", path.absolute.display()))?;
            let has_bom = content.starts_with(BYTE_ORDER_MARK);
            let text = content.trim_start_matches(BYTE_ORDER_MARK).to_string();

            parsed.push(self.parser.parse(&path.relative, text, &self.config.defines)?);
            loaded.push(LoadedFile { path, has_bom });
        }
        Ok((loaded, parsed))
    }

    /// Build the manifest entries of every documentable type under the root
    pub async fn list_type_entries(&mut self) -> SyncResult<Vec<TypeManifestEntry>> {
        let relative_paths = find_source_files(&self.config).await?;
        let (_, files) = self.load_files(&relative_paths).await?;
        Ok(build_catalog(&files))
    }

    /// List documentable types as a manifest document
    ///
    /// With a dump directory configured, the manifest is also written there.
    pub async fn list_types(&mut self) -> SyncResult<String> {
        let entries = self.list_type_entries().await?;
        let manifest = write_manifest(&entries)?;

        if let Some(dump_dir) = &self.config.dump_dir {
            fs::create_dir_all(dump_dir)
                .await
                .with_io_context(&format!("Failed to create dump directory {}", dump_dir.display()))?;
            let dump_path = dump_dir.join(MANIFEST_DUMP_FILE);
            fs::write(&dump_path, &manifest)
                .await
                .with_io_context(&format!("Failed to write {}", dump_path.display()))?;
            log::info!("Dumped manifest to {}", dump_path.display());
        }

        log::info!("Listed {} types under {}", entries.len(), self.config.root.display());
        Ok(manifest)
    }

    /// Extract the documentation document for types declared in `files`
    pub async fn get_documentation(&mut self, identities: &[String], files: &[PathBuf]) -> SyncResult<String> {
        let (_, parsed) = self.load_files(files).await?;
        let records = extract_documentation(identities, &parsed)?;
        write_documentation(&records)
    }

    /// Apply a documentation document to `files`, rewriting them in place
    ///
    /// Every file is validated, parsed and rewritten in memory before the
    /// first write, so a failing request leaves all files untouched. Returns
    /// the relative paths of the files written.
    pub async fn apply_documentation(&mut self, document: &str, files: &[PathBuf]) -> SyncResult<Vec<PathBuf>> {
        let records = read_documentation(document)?;
        let (loaded, parsed) = self.load_files(files).await?;
        let rewrites = apply_documentation(&records, &parsed)?;

        let mut written = Vec::with_capacity(rewrites.len());
        for rewrite in rewrites {
            let file = &loaded[rewrite.file_index];
            let content = if file.has_bom {
                format!("{}{}", BYTE_ORDER_MARK, rewrite.text)
            } else {
                rewrite.text
            };
            fs::write(&file.path.absolute, content)
                .await
                .with_io_context(&format!("Failed to write {}", file.path.absolute.display()))?;
            log::info!("Updated documentation in {}", rewrite.relative_path.display());
            written.push(rewrite.relative_path);
        }
        Ok(written)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
