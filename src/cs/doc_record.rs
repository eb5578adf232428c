//! Documentation records
//!
//! A [`MemberRecord`] is the structured description of one declaration as it
//! travels through the documentation document: signature, attributes and the
//! raw comment text. Records for a type nest the records of its members.

use super::constants::*;
use super::error::SyncResult;
use super::identity;
use super::symbols::{Accessibility, AttributeInfo, Signature, Symbol, SymbolKind, TypeParameterInfo};

/// Version written to and required from documentation documents
pub const DOCUMENTATION_SCHEMA_VERSION: &str = "3";

/// Modifier flags carried by a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFlags {
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_sealed: bool,
    pub is_read_only: bool,
    pub is_const: bool,
}

impl MemberFlags {
    pub fn from_modifiers(modifiers: &[String]) -> Self {
        let has = |m: &str| modifiers.iter().any(|x| x == m);
        Self {
            is_static: has(STATIC_MODIFIER),
            is_abstract: has(ABSTRACT_MODIFIER),
            is_virtual: has(VIRTUAL_MODIFIER),
            is_override: has(OVERRIDE_MODIFIER),
            is_sealed: has(SEALED_MODIFIER),
            is_read_only: has(READONLY_MODIFIER),
            is_const: has(CONST_MODIFIER),
        }
    }

    /// Merge the flags of another partial fragment
    pub fn union(&mut self, other: &MemberFlags) {
        self.is_static |= other.is_static;
        self.is_abstract |= other.is_abstract;
        self.is_virtual |= other.is_virtual;
        self.is_override |= other.is_override;
        self.is_sealed |= other.is_sealed;
        self.is_read_only |= other.is_read_only;
        self.is_const |= other.is_const;
    }

    /// Flags as `(attribute name, value)` pairs in document order
    pub fn entries(&self) -> [(&'static str, bool); 7] {
        [
            ("isStatic", self.is_static),
            ("isAbstract", self.is_abstract),
            ("isVirtual", self.is_virtual),
            ("isOverride", self.is_override),
            ("isSealed", self.is_sealed),
            ("isReadOnly", self.is_read_only),
            ("isConst", self.is_const),
        ]
    }

    pub fn set(&mut self, attribute: &str, value: bool) {
        match attribute {
            "isStatic" => self.is_static = value,
            "isAbstract" => self.is_abstract = value,
            "isVirtual" => self.is_virtual = value,
            "isOverride" => self.is_override = value,
            "isSealed" => self.is_sealed = value,
            "isReadOnly" => self.is_read_only = value,
            "isConst" => self.is_const = value,
            _ => {}
        }
    }
}

/// One `member` element of a documentation document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// Metadata name including the arity suffix (`Box`1`, `Map``1`, `.ctor`)
    pub name: String,
    pub kind: SymbolKind,
    /// Namespace of a type record
    pub namespace: Option<String>,
    /// Identity of the containing type of a nested type record
    pub containing_type: Option<String>,
    /// Base class of a class record
    pub inherits: Option<String>,
    pub accessibility: Option<Accessibility>,
    pub flags: MemberFlags,
    /// Explicit value of an enum member
    pub value: Option<String>,
    pub interfaces: Vec<String>,
    pub type_parameters: Vec<TypeParameterInfo>,
    pub signature: Option<Signature>,
    pub attributes: Vec<AttributeInfo>,
    /// Raw comment text; `None` when the document carries no `xmldoc` element
    pub xmldoc: Option<String>,
    pub members: Vec<MemberRecord>,
    /// Start tag as written in the document, for error messages
    pub source_tag: String,
}

impl MemberRecord {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            namespace: None,
            containing_type: None,
            inherits: None,
            accessibility: None,
            flags: MemberFlags::default(),
            value: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            signature: None,
            attributes: Vec::new(),
            xmldoc: None,
            members: Vec::new(),
            source_tag: String::new(),
        }
    }

    /// Rebuild the symbol this record describes, so its identity can be
    /// computed the same way as for a parsed declaration
    ///
    /// `parent` is the identity of the enclosing type record, if any.
    pub fn to_symbol(&self, parent: Option<&str>) -> Symbol {
        let (name, arity) = if self.kind.is_type() {
            split_arity(&self.name, "`")
        } else {
            split_arity(&self.name, "``")
        };

        let mut symbol = Symbol::new(self.kind, name);
        symbol.arity = arity;
        symbol.namespace = self.namespace.clone().unwrap_or_default();
        symbol.containing_type = match (&self.containing_type, parent) {
            (Some(containing), _) => Some(containing.clone()),
            (None, Some(parent)) => Some(parent.to_string()),
            (None, None) => None,
        };
        symbol.accessibility = self.accessibility;
        if self.flags.is_static {
            symbol.modifiers.push(STATIC_MODIFIER.to_string());
        }
        if let Some(signature) = &self.signature {
            symbol.parameter_types = signature
                .parameters
                .iter()
                .map(|p| p.type_identity.clone())
                .collect();
            symbol.return_type = signature.return_type.clone();
        }
        symbol
    }

    /// Identity of the declaration this record describes
    pub fn identity(&self, parent: Option<&str>) -> SyncResult<String> {
        identity::identity(&self.to_symbol(parent))
    }
}

/// Split `Name`N` into its name and arity; a missing or malformed suffix
/// means arity zero
fn split_arity(name: &str, marker: &str) -> (String, usize) {
    if let Some((base, suffix)) = name.rsplit_once(marker) {
        if let Ok(arity) = suffix.parse::<usize>() {
            // `Name``1` must not be read as a type arity of `Name``
            if !base.ends_with('`') {
                return (base.to_string(), arity);
            }
        }
    }
    (name.to_string(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::symbols::ParameterInfo;

    #[test]
    fn test_split_arity() {
        assert_eq!(split_arity("Box`1", "`"), ("Box".to_string(), 1));
        assert_eq!(split_arity("Map``2", "``"), ("Map".to_string(), 2));
        assert_eq!(split_arity("Widget", "`"), ("Widget".to_string(), 0));
        assert_eq!(split_arity("Map``2", "`"), ("Map``2".to_string(), 0));
    }

    #[test]
    fn test_type_record_identity() {
        let mut record = MemberRecord::new("Box`1", SymbolKind::Class);
        record.namespace = Some("Acme".to_string());
        assert_eq!(record.identity(None).unwrap(), "Acme.Box`1");

        let mut nested = MemberRecord::new("Lid", SymbolKind::Class);
        nested.namespace = Some("Acme".to_string());
        nested.containing_type = Some("Acme.Box`1".to_string());
        assert_eq!(nested.identity(None).unwrap(), "Acme.Box`1.Lid");
    }

    #[test]
    fn test_member_record_identity() {
        let mut record = MemberRecord::new("Map``1", SymbolKind::Method);
        record.flags.is_static = true;
        record.signature = Some(Signature {
            return_type: Some("System.Void".to_string()),
            type_parameters: Vec::new(),
            parameters: vec![ParameterInfo {
                name: "count".to_string(),
                type_identity: "System.Int32@".to_string(),
                modifier: Some("ref".to_string()),
                default_value: None,
            }],
        });
        assert_eq!(
            record.identity(Some("Acme.Worker")).unwrap(),
            "static:Acme.Worker.Map``1(System.Int32@)"
        );
    }

    #[test]
    fn test_flags_from_modifiers() {
        let modifiers = vec!["public".to_string(), "static".to_string(), "readonly".to_string()];
        let flags = MemberFlags::from_modifiers(&modifiers);
        assert!(flags.is_static);
        assert!(flags.is_read_only);
        assert!(!flags.is_const);
    }
}
