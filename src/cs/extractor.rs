//! Type documentation extraction
//!
//! Collects every fragment of a requested type across the given files and
//! builds its documentation record: type signature data merged over the
//! fragments, plus one record per documentable member. The comment text of
//! each identity comes from its documentation target, the same node the
//! injector writes to.

use std::collections::HashSet;

use super::catalog::TypeIndex;
use super::doc_record::{MemberFlags, MemberRecord};
use super::error::{DocSyncError, SyncResult};
use super::identity::{identity, metadata_name};
use super::priority::{PriorityMap, build_priority_map};
use super::symbols::{Declaration, DocUnit, Signature, Symbol, SymbolKind, SyntaxFile, TypeDeclaration};
use super::xml_text::{is_well_formed_fragment, malformed_placeholder};

struct ExtractionContext<'a> {
    index: TypeIndex,
    priority: PriorityMap,
    units: Vec<Vec<DocUnit<'a>>>,
}

impl ExtractionContext<'_> {
    /// Comment text of the documentation target of an identity
    fn doc_text(&self, id: &str) -> Option<String> {
        let target = self.priority.target(id)?;
        let raw = self.units.get(target.file)?.get(target.unit)?.slot.raw_text()?;
        if is_well_formed_fragment(&raw) {
            Some(raw)
        } else {
            log::warn!("Badly formed XML comment on {}, emitting placeholder", id);
            Some(malformed_placeholder(id))
        }
    }
}

/// Build documentation records for the requested type identities
///
/// Fails with [`DocSyncError::TypeNotFound`] when an identity has no
/// declaration in the files.
pub fn extract_documentation(identities: &[String], files: &[SyntaxFile]) -> SyncResult<Vec<MemberRecord>> {
    let ctx = ExtractionContext {
        index: TypeIndex::build(files),
        priority: build_priority_map(files),
        units: files.iter().map(|f| f.doc_units()).collect(),
    };

    let mut records = Vec::new();
    for id in identities {
        let fragments: Vec<&TypeDeclaration> = files
            .iter()
            .flat_map(|f| f.type_declarations())
            .filter(|t| identity(&t.symbol).is_ok_and(|candidate| candidate == *id))
            .collect();
        if fragments.is_empty() {
            return Err(DocSyncError::TypeNotFound {
                identity: id.clone(),
            });
        }
        let record = type_record(id, &fragments, &ctx);
        log::info!(
            "Extracted {} with {} members from {} fragments",
            id,
            record.members.len(),
            fragments.len()
        );
        records.push(record);
    }
    Ok(records)
}

fn type_record(id: &str, fragments: &[&TypeDeclaration], ctx: &ExtractionContext) -> MemberRecord {
    let first = fragments[0];
    let mut record = MemberRecord::new(metadata_name(&first.symbol), first.symbol.kind);
    record.namespace = Some(first.symbol.namespace.clone());
    record.containing_type = first.symbol.containing_type.clone();
    record.accessibility = ctx.index.get(id).map(|info| info.effective_accessibility());

    for fragment in fragments {
        record.flags.union(&MemberFlags::from_modifiers(&fragment.symbol.modifiers));
        classify_bases(fragment, &ctx.index, &mut record);
        record.attributes.extend(fragment.attributes.iter().cloned());
    }

    // Constraints are consistent across fragments; take the first one spelling them
    record.type_parameters = fragments
        .iter()
        .find(|f| f.type_parameters.iter().any(|p| !p.constraints.is_empty()))
        .unwrap_or(&first)
        .type_parameters
        .clone();

    record.signature = fragments.iter().find_map(|f| f.delegate_signature.clone());
    record.xmldoc = ctx.doc_text(id);

    let mut seen = HashSet::new();
    for fragment in fragments {
        for member in &fragment.members {
            match member {
                Declaration::Type(_) => {}
                Declaration::Member(member) => {
                    let signature = member_signature(&member.symbol, &member.signature);
                    push_member(ctx, &mut seen, &mut record, &member.symbol, signature, |r| {
                        r.type_parameters = member.signature.type_parameters.clone();
                        r.attributes = member.attributes.clone();
                        r.value = member.value.clone();
                    });
                }
                Declaration::FieldStatement(statement) => {
                    for variable in &statement.variables {
                        let signature = member_signature(&variable.symbol, &Signature::default());
                        push_member(ctx, &mut seen, &mut record, &variable.symbol, signature, |r| {
                            r.attributes = statement.attributes.clone();
                        });
                    }
                }
            }
        }
    }

    record
}

fn push_member(
    ctx: &ExtractionContext,
    seen: &mut HashSet<String>,
    parent: &mut MemberRecord,
    symbol: &Symbol,
    signature: Option<Signature>,
    fill: impl FnOnce(&mut MemberRecord),
) {
    if !ctx.index.is_member_documentable(symbol) {
        log::debug!("Skipping non-documentable member {}", symbol.name);
        return;
    }
    let id = match identity(symbol) {
        Ok(id) => id,
        Err(e) => {
            log::debug!("Skipping member {}: {}", symbol.name, e);
            return;
        }
    };
    // Partial members appear once per declaring fragment
    if !seen.insert(id.clone()) {
        return;
    }

    let mut record = MemberRecord::new(metadata_name(symbol), symbol.kind);
    record.accessibility = Some(symbol.effective_accessibility());
    record.flags = MemberFlags::from_modifiers(&symbol.modifiers);
    record.signature = signature;
    fill(&mut record);
    record.xmldoc = ctx.doc_text(&id);
    parent.members.push(record);
}

/// Signature data a member record carries
fn member_signature(symbol: &Symbol, declared: &Signature) -> Option<Signature> {
    match symbol.kind {
        SymbolKind::EnumMember => None,
        SymbolKind::Property | SymbolKind::Field | SymbolKind::Event => Some(Signature {
            return_type: symbol.return_type.clone(),
            type_parameters: Vec::new(),
            parameters: declared.parameters.clone(),
        }),
        _ => Some(Signature {
            return_type: declared.return_type.clone(),
            type_parameters: Vec::new(),
            parameters: declared.parameters.clone(),
        }),
    }
}

/// Split a fragment's base list into base class and interfaces
fn classify_bases(fragment: &TypeDeclaration, index: &TypeIndex, record: &mut MemberRecord) {
    for (position, base) in fragment.bases.iter().enumerate() {
        let is_base_class = fragment.symbol.kind == SymbolKind::Class
            && position == 0
            && !index.is_known_interface(base)
            && !looks_like_interface(base);
        if is_base_class {
            if record.inherits.is_none() {
                record.inherits = Some(base.clone());
            }
        } else if !record.interfaces.contains(base) {
            record.interfaces.push(base.clone());
        }
    }
}

/// Interface naming convention: `I` followed by an upper case letter
fn looks_like_interface(base: &str) -> bool {
    let without_arguments = base.split('<').next().unwrap_or(base).trim();
    let simple = without_arguments.rsplit('.').next().unwrap_or(without_arguments);
    let mut chars = simple.chars();
    chars.next() == Some('I') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
