//! Type catalog
//!
//! Groups the type declarations of a file set by identity, decides which types
//! and members are documentable, and produces the type manifest.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use super::constants::*;
use super::doc_xml::DocWriter;
use super::error::SyncResult;
use super::identity::identity;
use super::symbols::{Accessibility, Symbol, SymbolKind, SyntaxFile, TypeDeclaration};

/// Version written to type manifest documents
pub const MANIFEST_SCHEMA_VERSION: &str = "1";

/// One type of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeManifestEntry {
    pub id: String,
    /// Identity of the containing type, empty for top level types
    pub parent_id: String,
    pub name: String,
    pub kind: SymbolKind,
    pub namespace: String,
    /// Relative paths of the files declaring the type, in discovery order
    pub relative_file_paths: Vec<PathBuf>,
}

/// Merged view of all fragments of one type
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub identity: String,
    pub kind: SymbolKind,
    pub display_name: String,
    pub namespace: String,
    pub containing_type: Option<String>,
    pub containing_kind: Option<SymbolKind>,
    /// First accessibility spelled on any fragment
    pub accessibility: Option<Accessibility>,
    /// Modifiers of every fragment, deduplicated
    pub modifiers: Vec<String>,
    pub relative_file_paths: Vec<PathBuf>,
}

impl TypeInfo {
    pub fn effective_accessibility(&self) -> Accessibility {
        match (self.accessibility, &self.containing_type) {
            (Some(accessibility), _) => accessibility,
            // Types nested in an interface are public unless stated otherwise
            (None, Some(_)) if self.containing_kind == Some(SymbolKind::Interface) => Accessibility::Public,
            (None, Some(_)) => Accessibility::Private,
            (None, None) => Accessibility::Internal,
        }
    }

    fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    /// Types that can be derived from, making protected members reachable
    pub fn is_inheritable(&self) -> bool {
        self.kind == SymbolKind::Class
            && !self.has_modifier(SEALED_MODIFIER)
            && !self.has_modifier(STATIC_MODIFIER)
    }
}

/// All types of a file set, indexed by identity
#[derive(Debug, Default)]
pub struct TypeIndex {
    types: HashMap<String, TypeInfo>,
    /// Identities in order of first discovery
    order: Vec<String>,
    interface_names: HashSet<String>,
}

impl TypeIndex {
    pub fn build(files: &[SyntaxFile]) -> Self {
        let mut index = TypeIndex::default();
        for file in files {
            for type_decl in file.type_declarations() {
                index.add_fragment(file, type_decl);
            }
        }
        index
    }

    fn add_fragment(&mut self, file: &SyntaxFile, type_decl: &TypeDeclaration) {
        let symbol = &type_decl.symbol;
        let Ok(id) = identity(symbol) else {
            return;
        };

        if symbol.kind == SymbolKind::Interface {
            self.interface_names.insert(symbol.name.clone());
        }

        if !self.types.contains_key(&id) {
            self.order.push(id.clone());
        }
        let info = self.types.entry(id.clone()).or_insert_with(|| {
            TypeInfo {
                identity: id.clone(),
                kind: symbol.kind,
                display_name: type_decl.display_name.clone(),
                namespace: symbol.namespace.clone(),
                containing_type: symbol.containing_type.clone(),
                containing_kind: symbol.containing_kind,
                accessibility: None,
                modifiers: Vec::new(),
                relative_file_paths: Vec::new(),
            }
        });

        if info.accessibility.is_none() {
            info.accessibility = symbol.accessibility;
        }
        for modifier in &symbol.modifiers {
            if !info.modifiers.contains(modifier) {
                info.modifiers.push(modifier.clone());
            }
        }
        if !info.relative_file_paths.contains(&file.relative_path) {
            info.relative_file_paths.push(file.relative_path.clone());
        }
    }

    pub fn get(&self, identity: &str) -> Option<&TypeInfo> {
        self.types.get(identity)
    }

    /// Types in order of first discovery
    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.order.iter().filter_map(|id| self.types.get(id))
    }

    /// Whether a base list entry names an interface declared in the file set
    pub fn is_known_interface(&self, base: &str) -> bool {
        let without_arguments = base.split('<').next().unwrap_or(base).trim();
        let simple = without_arguments.rsplit('.').next().unwrap_or(without_arguments);
        self.interface_names.contains(simple)
    }

    /// Whether a type appears in documentation: it and every type containing
    /// it must be reachable from outside the assembly
    pub fn is_type_documentable(&self, identity: &str) -> bool {
        let Some(info) = self.types.get(identity) else {
            return false;
        };
        let parent = info.containing_type.as_deref().and_then(|p| self.types.get(p));
        let accessibility = info.effective_accessibility();
        let accessible = accessibility.is_public()
            || (accessibility.is_protected() && parent.is_some_and(TypeInfo::is_inheritable));
        accessible
            && info
                .containing_type
                .as_deref()
                .is_none_or(|p| self.is_type_documentable(p))
    }

    /// Whether a member of a type appears in documentation
    pub fn is_member_documentable(&self, symbol: &Symbol) -> bool {
        if symbol.kind == SymbolKind::LocalFunction {
            return false;
        }
        let Some(containing) = symbol.containing_type.as_deref() else {
            return false;
        };
        if !self.is_type_documentable(containing) {
            return false;
        }
        if symbol.is_explicit_interface_implementation {
            return true;
        }

        let accessibility = symbol.effective_accessibility();
        accessibility.is_public()
            || (accessibility.is_protected() && self.get(containing).is_some_and(TypeInfo::is_inheritable))
    }
}

/// Build the manifest of documentable types, in order of first discovery
pub fn build_catalog(files: &[SyntaxFile]) -> Vec<TypeManifestEntry> {
    let index = TypeIndex::build(files);
    let entries: Vec<TypeManifestEntry> = index
        .iter()
        .filter(|info| index.is_type_documentable(&info.identity))
        .map(|info| TypeManifestEntry {
            id: info.identity.clone(),
            parent_id: info.containing_type.clone().unwrap_or_default(),
            name: info.display_name.clone(),
            kind: info.kind,
            namespace: info.namespace.clone(),
            relative_file_paths: info.relative_file_paths.clone(),
        })
        .collect();

    log::debug!(
        "Catalog holds {} documentable types out of {}",
        entries.len(),
        index.order.len()
    );
    entries
}

/// Serialize a manifest as a type manifest document
pub fn write_manifest(entries: &[TypeManifestEntry]) -> SyncResult<String> {
    let mut writer = DocWriter::new(MANIFEST_SCHEMA_VERSION)?;
    writer.start("types", &[])?;
    for entry in entries {
        writer.start(
            "type",
            &[
                ("id", entry.id.as_str()),
                ("parentId", entry.parent_id.as_str()),
                ("name", entry.name.as_str()),
                ("kind", entry.kind.as_str()),
                ("namespace", entry.namespace.as_str()),
            ],
        )?;
        writer.start("relativeFilePaths", &[])?;
        for path in &entry.relative_file_paths {
            let path = path.to_string_lossy();
            writer.empty("path", &[("value", path.as_ref())])?;
        }
        writer.end("relativeFilePaths")?;
        writer.end("type")?;
    }
    writer.end("types")?;
    writer.finish()
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
