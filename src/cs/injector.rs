//! Documentation injection
//!
//! Writes the comment text of edited documentation records back into source
//! text. Only `///` lines change: the target node of each identity receives
//! the record's text, other nodes sharing the identity lose their doc comment,
//! and everything else in the file is kept byte for byte.

use std::collections::HashMap;
use std::ops::Range;
use std::path::PathBuf;

use super::doc_record::MemberRecord;
use super::error::{DocSyncError, SyncResult};
use super::identity::{identity, lookup_key, signatures_match};
use super::priority::{NodeId, PriorityMap, build_priority_map};
use super::symbols::{DocSlot, Symbol, SyntaxFile};
use super::xml_text::is_malformed_placeholder;

const INDENT_UNIT: &str = "    ";

/// New text of a source file touched by injection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRewrite {
    /// Index of the file in the request
    pub file_index: usize,
    pub relative_path: PathBuf,
    pub text: String,
}

struct IndexedRecord<'a> {
    symbol: Symbol,
    record: &'a MemberRecord,
}

/// Records of a document grouped by lookup key, so overloads sharing a name
/// are found together and told apart by signature
struct RecordIndex<'a> {
    by_key: HashMap<String, Vec<IndexedRecord<'a>>>,
}

impl<'a> RecordIndex<'a> {
    fn build(records: &'a [MemberRecord]) -> SyncResult<Self> {
        let mut index = RecordIndex {
            by_key: HashMap::new(),
        };
        for record in records {
            index.add(record, None)?;
        }
        Ok(index)
    }

    fn add(&mut self, record: &'a MemberRecord, parent: Option<&str>) -> SyncResult<()> {
        let symbol = record.to_symbol(parent);
        let key = lookup_key(&symbol)?;
        let own_identity = identity(&symbol)?;
        self.by_key
            .entry(key)
            .or_default()
            .push(IndexedRecord { symbol, record });
        for member in &record.members {
            self.add(member, Some(&own_identity))?;
        }
        Ok(())
    }

    /// The record describing a declaration, if any
    fn find(&self, symbol: &Symbol, id: &str) -> SyncResult<Option<&'a MemberRecord>> {
        let Ok(key) = lookup_key(symbol) else {
            return Ok(None);
        };
        let matches: Vec<&IndexedRecord> = self
            .by_key
            .get(&key)
            .map(|candidates| {
                candidates
                    .iter()
                    .filter(|c| c.symbol.kind.is_type() == symbol.kind.is_type())
                    .filter(|c| signatures_match(&c.symbol, symbol))
                    .collect()
            })
            .unwrap_or_default();

        match matches.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(single.record)),
            _ => Err(DocSyncError::AmbiguousMember {
                identity: id.to_string(),
                fragments: matches.iter().map(|m| m.record.source_tag.clone()).collect(),
            }),
        }
    }
}

/// Apply documentation records to parsed files
///
/// Returns the new text of every file whose content changed. Nothing is
/// written here; callers persist the result once every file succeeded.
pub fn apply_documentation(records: &[MemberRecord], files: &[SyntaxFile]) -> SyncResult<Vec<FileRewrite>> {
    let index = RecordIndex::build(records)?;
    let priority = build_priority_map(files);

    let mut rewrites = Vec::new();
    for (file_index, file) in files.iter().enumerate() {
        let edits = plan_file_edits(file_index, file, &index, &priority)?;
        if edits.is_empty() {
            continue;
        }
        let text = apply_edits(&file.text, edits);
        if text != file.text {
            rewrites.push(FileRewrite {
                file_index,
                relative_path: file.relative_path.clone(),
                text,
            });
        }
    }

    log::info!(
        "Documentation changes {} of {} files",
        rewrites.len(),
        files.len()
    );
    Ok(rewrites)
}

fn plan_file_edits(
    file_index: usize,
    file: &SyntaxFile,
    index: &RecordIndex,
    priority: &PriorityMap,
) -> SyncResult<Vec<(Range<usize>, String)>> {
    let mut edits = Vec::new();

    for (unit_index, unit) in file.doc_units().iter().enumerate() {
        let Ok(id) = identity(unit.symbol) else {
            continue;
        };
        let Some(record) = index.find(unit.symbol, &id)? else {
            continue;
        };
        let Some(text) = record.xmldoc.as_deref() else {
            continue;
        };
        // The comment was unreadable when extracted; keep the source as is
        if is_malformed_placeholder(text) {
            log::debug!("Leaving badly formed comment of {} untouched", id);
            continue;
        }

        let node = NodeId {
            file: file_index,
            unit: unit_index,
        };
        if priority.is_target(&id, node) {
            edits.extend(set_doc_edits(unit.slot, text, file.line_ending));
        } else {
            edits.extend(strip_doc_edits(unit.slot));
        }
    }

    Ok(edits)
}

/// Edits that remove every doc line of a slot
fn strip_doc_edits(slot: &DocSlot) -> Vec<(Range<usize>, String)> {
    slot.existing
        .iter()
        .map(|line| (line.span.clone(), String::new()))
        .collect()
}

/// Edits that make a slot hold exactly `text`
fn set_doc_edits(slot: &DocSlot, text: &str, eol: &str) -> Vec<(Range<usize>, String)> {
    let new_text = normalize_doc_text(text);
    if new_text.is_empty() {
        return strip_doc_edits(slot);
    }
    if slot
        .raw_text()
        .is_some_and(|existing| normalize_doc_text(&existing) == new_text)
    {
        return Vec::new();
    }

    match slot.existing.split_first() {
        Some((first, rest)) => {
            let mut edits = vec![(
                first.span.clone(),
                format!("{}{}", render_doc_lines(&new_text, &slot.indent, eol), eol),
            )];
            edits.extend(rest.iter().map(|line| (line.span.clone(), String::new())));
            edits
        }
        None if slot.inline => {
            // Break the line so the comment can sit before the declarator
            let indent = format!("{}{}", slot.indent, INDENT_UNIT);
            let replacement = format!(
                "{}{}{}{}",
                eol,
                render_doc_lines(&new_text, &indent, eol),
                eol,
                indent
            );
            vec![(slot.insert_span.clone(), replacement)]
        }
        None => vec![(
            slot.insert_span.clone(),
            format!("{}{}", render_doc_lines(&new_text, &slot.indent, eol), eol),
        )],
    }
}

/// Turn raw comment text into `///` lines, without a final line break
pub fn render_doc_lines(text: &str, indent: &str, eol: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                format!("{}///", indent)
            } else {
                format!("{}/// {}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join(eol)
}

/// Canonical form of comment text: `\n` line breaks, common indentation and
/// trailing whitespace removed, no blank lines at either end
pub fn normalize_doc_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = unified.split('\n').map(str::trim_end).collect();

    let Some(start) = lines.iter().position(|l| !l.is_empty()) else {
        return String::new();
    };
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |e| e + 1);
    let lines = &lines[start..end];

    let common = lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.chars().take_while(|c| *c == ' ' || *c == '\t').count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| l.chars().skip(common).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply non-overlapping edits to a text
fn apply_edits(text: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start).then(b.0.end.cmp(&a.0.end)));
    let mut result = text.to_string();
    for (range, replacement) in edits {
        result.replace_range(range, &replacement);
    }
    result
}

#[cfg(test)]
#[path = "injector_tests.rs"]
mod tests;
