//! Declaration symbol model for C# source files
//!
//! This module uses tree-sitter to parse C# source files into an owned tree of
//! declarations. Each declaration carries its resolved [`Symbol`] (kind, names,
//! accessibility, signature) and a [`DocSlot`] describing where its `///`
//! documentation lives in the text. No tree-sitter node outlives the parse;
//! links to containing types are identity strings.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tree_sitter::{Node, Parser};

use super::constants::*;
use super::error::{DocSyncError, SyncResult};
use super::identity::type_identity;
use super::preprocessor::evaluate_condition;
use super::type_names::{GenericContext, normalize_whitespace, split_parameters, type_identity as normalize_type};

/// Kind of a declared symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Method,
    Constructor,
    Destructor,
    Operator,
    Conversion,
    Property,
    Indexer,
    Event,
    Field,
    EnumMember,
    /// Functions declared inside statements; never documentable
    LocalFunction,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "Class",
            SymbolKind::Struct => "Struct",
            SymbolKind::Interface => "Interface",
            SymbolKind::Enum => "Enum",
            SymbolKind::Delegate => "Delegate",
            SymbolKind::Method => "Method",
            SymbolKind::Constructor => "Constructor",
            SymbolKind::Destructor => "Destructor",
            SymbolKind::Operator => "Operator",
            SymbolKind::Conversion => "Conversion",
            SymbolKind::Property => "Property",
            SymbolKind::Indexer => "Indexer",
            SymbolKind::Event => "Event",
            SymbolKind::Field => "Field",
            SymbolKind::EnumMember => "EnumMember",
            SymbolKind::LocalFunction => "LocalFunction",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let kind = match value {
            "Class" => SymbolKind::Class,
            "Struct" => SymbolKind::Struct,
            "Interface" => SymbolKind::Interface,
            "Enum" => SymbolKind::Enum,
            "Delegate" => SymbolKind::Delegate,
            "Method" => SymbolKind::Method,
            "Constructor" => SymbolKind::Constructor,
            "Destructor" => SymbolKind::Destructor,
            "Operator" => SymbolKind::Operator,
            "Conversion" => SymbolKind::Conversion,
            "Property" => SymbolKind::Property,
            "Indexer" => SymbolKind::Indexer,
            "Event" => SymbolKind::Event,
            "Field" => SymbolKind::Field,
            "EnumMember" => SymbolKind::EnumMember,
            "LocalFunction" => SymbolKind::LocalFunction,
            _ => return None,
        };
        Some(kind)
    }

    /// Types get their own manifest entry and documentation record
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class
                | SymbolKind::Struct
                | SymbolKind::Interface
                | SymbolKind::Enum
                | SymbolKind::Delegate
        )
    }

    /// Members whose identity includes their parameter list
    pub fn is_overloadable(&self) -> bool {
        matches!(
            self,
            SymbolKind::Method
                | SymbolKind::Constructor
                | SymbolKind::Destructor
                | SymbolKind::Operator
                | SymbolKind::Conversion
                | SymbolKind::Indexer
                | SymbolKind::LocalFunction
        )
    }
}

/// Declared accessibility of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessibility {
    Public,
    ProtectedInternal,
    Protected,
    Internal,
    PrivateProtected,
    Private,
}

impl Accessibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessibility::Public => "Public",
            Accessibility::ProtectedInternal => "ProtectedInternal",
            Accessibility::Protected => "Protected",
            Accessibility::Internal => "Internal",
            Accessibility::PrivateProtected => "PrivateProtected",
            Accessibility::Private => "Private",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let accessibility = match value {
            "Public" => Accessibility::Public,
            "ProtectedInternal" => Accessibility::ProtectedInternal,
            "Protected" => Accessibility::Protected,
            "Internal" => Accessibility::Internal,
            "PrivateProtected" => Accessibility::PrivateProtected,
            "Private" => Accessibility::Private,
            _ => return None,
        };
        Some(accessibility)
    }

    /// Explicit accessibility spelled by a modifier list, if any
    pub fn from_modifiers(modifiers: &[String]) -> Option<Self> {
        let has = |m: &str| modifiers.iter().any(|x| x == m);
        match (
            has(PUBLIC_MODIFIER),
            has(PROTECTED_MODIFIER),
            has(INTERNAL_MODIFIER),
            has(PRIVATE_MODIFIER),
        ) {
            (true, _, _, _) => Some(Accessibility::Public),
            (_, true, true, _) => Some(Accessibility::ProtectedInternal),
            (_, true, _, true) => Some(Accessibility::PrivateProtected),
            (_, true, _, _) => Some(Accessibility::Protected),
            (_, _, true, _) => Some(Accessibility::Internal),
            (_, _, _, true) => Some(Accessibility::Private),
            _ => None,
        }
    }

    /// Visible from outside the declaring assembly
    pub fn is_public(&self) -> bool {
        *self == Accessibility::Public
    }

    /// Visible to derived types in other assemblies
    pub fn is_protected(&self) -> bool {
        matches!(self, Accessibility::Protected | Accessibility::ProtectedInternal)
    }
}

/// A resolved declaration symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// Metadata name without arity suffix (`List`, `.ctor`, `op_Addition`, `IDisposable.Dispose`)
    pub name: String,
    /// Number of generic type parameters declared by this symbol itself
    pub arity: usize,
    pub namespace: String,
    /// Identity of the containing type
    pub containing_type: Option<String>,
    pub containing_kind: Option<SymbolKind>,
    /// Accessibility spelled in source, if any
    pub accessibility: Option<Accessibility>,
    pub modifiers: Vec<String>,
    pub is_explicit_interface_implementation: bool,
    /// Parameter type identities in declaration order
    pub parameter_types: Vec<String>,
    pub return_type: Option<String>,
}

impl Symbol {
    pub fn new(kind: SymbolKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            arity: 0,
            namespace: String::new(),
            containing_type: None,
            containing_kind: None,
            accessibility: None,
            modifiers: Vec::new(),
            is_explicit_interface_implementation: false,
            parameter_types: Vec::new(),
            return_type: None,
        }
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn is_static(&self) -> bool {
        self.has_modifier(STATIC_MODIFIER)
    }

    /// Accessibility after applying the language defaults
    pub fn effective_accessibility(&self) -> Accessibility {
        if let Some(accessibility) = self.accessibility {
            return accessibility;
        }
        match self.containing_kind {
            _ if self.kind == SymbolKind::EnumMember => Accessibility::Public,
            Some(SymbolKind::Interface) => Accessibility::Public,
            Some(_) => Accessibility::Private,
            None => Accessibility::Internal,
        }
    }
}

/// A generic type parameter with its constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameterInfo {
    pub name: String,
    /// `in` or `out` for variant interface and delegate parameters
    pub variance: Option<String>,
    pub constraints: Vec<String>,
}

/// A declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    /// Type identity, with `@` appended for by-reference parameters
    pub type_identity: String,
    pub modifier: Option<String>,
    pub default_value: Option<String>,
}

/// One argument of an attribute application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeArgument {
    /// Set for named arguments (`Name = value`)
    pub name: Option<String>,
    pub value: String,
    pub value_type: String,
}

/// An attribute applied to a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub type_name: String,
    pub arguments: Vec<AttributeArgument>,
}

/// Return type, generic parameters and parameters of a declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub return_type: Option<String>,
    pub type_parameters: Vec<TypeParameterInfo>,
    pub parameters: Vec<ParameterInfo>,
}

/// One existing `///` line in the leading trivia of a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLine {
    /// The whole line including indentation and line break
    pub span: Range<usize>,
    /// Text after the `///` marker and one following space
    pub text: String,
}

/// Location of a declaration's documentation in its file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSlot {
    pub existing: Vec<DocLine>,
    /// Range replaced when a comment is inserted where none exists
    pub insert_span: Range<usize>,
    /// Indentation of the declaration's line
    pub indent: String,
    /// The declaration shares its line with preceding code
    pub inline: bool,
}

impl DocSlot {
    pub fn has_doc(&self) -> bool {
        !self.existing.is_empty()
    }

    /// Raw documentation text, one entry per `///` line joined by `\n`
    pub fn raw_text(&self) -> Option<String> {
        if self.existing.is_empty() {
            return None;
        }
        Some(
            self.existing
                .iter()
                .map(|line| line.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

/// A type declaration; one fragment of a possibly partial type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub symbol: Symbol,
    /// Name as shown to readers (`Dictionary<TKey, TValue>`)
    pub display_name: String,
    pub type_parameters: Vec<TypeParameterInfo>,
    /// Base list entries as written (whitespace normalized)
    pub bases: Vec<String>,
    pub attributes: Vec<AttributeInfo>,
    /// Return type and parameters of a delegate
    pub delegate_signature: Option<Signature>,
    pub slot: DocSlot,
    pub members: Vec<Declaration>,
}

/// A non-field member declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDeclaration {
    pub symbol: Symbol,
    pub signature: Signature,
    pub attributes: Vec<AttributeInfo>,
    /// Explicit value of an enum member
    pub value: Option<String>,
    pub slot: DocSlot,
}

/// One variable of a field or event field statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclarator {
    pub symbol: Symbol,
    pub slot: DocSlot,
}

/// A field statement, possibly declaring several variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStatement {
    pub attributes: Vec<AttributeInfo>,
    /// Identity of the declared type
    pub declared_type: String,
    pub variables: Vec<VariableDeclarator>,
}

/// Declaration tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Type(TypeDeclaration),
    Member(MemberDeclaration),
    FieldStatement(FieldStatement),
}

/// A parsed source file
#[derive(Debug, Clone)]
pub struct SyntaxFile {
    /// Path relative to the configured root
    pub relative_path: PathBuf,
    pub text: String,
    /// Dominant line ending of the file
    pub line_ending: &'static str,
    pub declarations: Vec<Declaration>,
}

/// A symbol together with the slot holding its documentation
#[derive(Debug, Clone, Copy)]
pub struct DocUnit<'a> {
    pub symbol: &'a Symbol,
    pub slot: &'a DocSlot,
}

impl SyntaxFile {
    /// Every documentable unit in traversal order: outer before inner,
    /// declaration order within a container, one unit per field variable
    pub fn doc_units(&self) -> Vec<DocUnit<'_>> {
        let mut units = Vec::new();
        collect_units(&self.declarations, &mut units);
        units
    }

    /// Every type fragment in traversal order
    pub fn type_declarations(&self) -> Vec<&TypeDeclaration> {
        let mut types = Vec::new();
        collect_types(&self.declarations, &mut types);
        types
    }
}

fn collect_units<'a>(declarations: &'a [Declaration], units: &mut Vec<DocUnit<'a>>) {
    for declaration in declarations {
        match declaration {
            Declaration::Type(type_decl) => {
                units.push(DocUnit {
                    symbol: &type_decl.symbol,
                    slot: &type_decl.slot,
                });
                collect_units(&type_decl.members, units);
            }
            Declaration::Member(member) => units.push(DocUnit {
                symbol: &member.symbol,
                slot: &member.slot,
            }),
            Declaration::FieldStatement(statement) => {
                for variable in &statement.variables {
                    units.push(DocUnit {
                        symbol: &variable.symbol,
                        slot: &variable.slot,
                    });
                }
            }
        }
    }
}

fn collect_types<'a>(declarations: &'a [Declaration], types: &mut Vec<&'a TypeDeclaration>) {
    for declaration in declarations {
        if let Declaration::Type(type_decl) = declaration {
            types.push(type_decl);
            collect_types(&type_decl.members, types);
        }
    }
}

/// C# parser wrapper around tree-sitter-c-sharp
pub struct CsParser {
    parser: Parser,
}

impl std::fmt::Debug for CsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsParser")
            .field("parser", &"<Parser>")
            .finish()
    }
}

impl CsParser {
    /// Create a new C# parser
    pub fn new() -> SyncResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| DocSyncError::TreeSitterLanguage {
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }

    /// Parse one source file into its declaration tree
    pub fn parse(
        &mut self,
        relative_path: &Path,
        text: String,
        defines: &[String],
    ) -> SyncResult<SyntaxFile> {
        let tree = self
            .parser
            .parse(&text, None)
            .ok_or_else(|| DocSyncError::Parse {
                file: relative_path.to_path_buf(),
                message: "tree-sitter returned no tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            log::debug!(
                "Syntax errors in {}, continuing with partial tree",
                relative_path.display()
            );
        }

        let ctx = WalkContext {
            source: &text,
            defines,
            namespace: String::new(),
            containing_type: None,
            containing_kind: None,
            generics: GenericContext::new(),
        };
        let mut declarations = Vec::new();
        walk_nodes(children_of(root), &ctx, &mut declarations);

        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        Ok(SyntaxFile {
            relative_path: relative_path.to_path_buf(),
            line_ending,
            declarations,
            text,
        })
    }
}

/// Traversal state threaded explicitly through the walk
#[derive(Clone)]
struct WalkContext<'s> {
    source: &'s str,
    defines: &'s [String],
    namespace: String,
    containing_type: Option<String>,
    containing_kind: Option<SymbolKind>,
    generics: GenericContext,
}

impl<'s> WalkContext<'s> {
    fn with_namespace(&self, name: &str) -> Self {
        let mut inner = self.clone();
        inner.namespace = if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.namespace, name)
        };
        inner
    }

    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }
}

fn children_of(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn children_of_kind<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == kind)
        .collect()
}

/// Whether a using directive imports the System namespace itself
fn imports_system(directive: &str) -> bool {
    let tokens: Vec<&str> = directive
        .trim_end()
        .trim_end_matches(';')
        .split_whitespace()
        .filter(|token| *token != "global" && *token != "using")
        .collect();
    matches!(tokens.as_slice(), ["System"] | ["global::System"])
}

fn walk_nodes(nodes: Vec<Node>, ctx: &WalkContext, out: &mut Vec<Declaration>) {
    // File scoped namespaces and using directives apply to every declaration after them
    let mut scoped: Option<WalkContext> = None;

    for node in nodes {
        let active = scoped.as_ref().unwrap_or(ctx);
        match node.kind() {
            USING_DIRECTIVE => {
                if !active.generics.imports_system && imports_system(ctx.text(node)) {
                    let mut inner = active.clone();
                    inner.generics.imports_system = true;
                    scoped = Some(inner);
                }
            }
            NAMESPACE_DECLARATION => {
                let name = declared_name(node, active);
                let inner = active.with_namespace(&name);
                if let Some(body) = node.child_by_field_name(BODY_FIELD) {
                    walk_nodes(children_of(body), &inner, out);
                }
            }
            FILE_SCOPED_NAMESPACE_DECLARATION => {
                let name = declared_name(node, active);
                let inner = active.with_namespace(&name);
                walk_nodes(children_of(node), &inner, out);
                scoped = Some(inner);
            }
            PREPROC_IF | PREPROC_ELIF | PREPROC_ELSE => walk_preprocessor(node, active, out),
            GLOBAL_STATEMENT => {
                if let Some(function) = child_of_kind(node, LOCAL_FUNCTION_STATEMENT) {
                    out.push(Declaration::Member(walk_local_function(function, active)));
                }
            }
            CLASS_DECLARATION | STRUCT_DECLARATION | INTERFACE_DECLARATION | ENUM_DECLARATION
            | RECORD_DECLARATION | RECORD_STRUCT_DECLARATION | DELEGATE_DECLARATION => {
                out.push(Declaration::Type(walk_type(node, active)));
            }
            FIELD_DECLARATION | EVENT_FIELD_DECLARATION => {
                if let Some(statement) = walk_field_statement(node, active) {
                    out.push(Declaration::FieldStatement(statement));
                }
            }
            METHOD_DECLARATION | CONSTRUCTOR_DECLARATION | DESTRUCTOR_DECLARATION
            | OPERATOR_DECLARATION | CONVERSION_OPERATOR_DECLARATION | PROPERTY_DECLARATION
            | INDEXER_DECLARATION | EVENT_DECLARATION | ENUM_MEMBER_DECLARATION => {
                if let Some(member) = walk_member(node, active) {
                    out.push(Declaration::Member(member));
                }
            }
            _ => {}
        }
    }
}

fn walk_preprocessor(node: Node, ctx: &WalkContext, out: &mut Vec<Declaration>) {
    let condition = node.child_by_field_name(CONDITION_FIELD);
    let alternative = node.child_by_field_name(ALTERNATIVE_FIELD);

    let active = match node.kind() {
        PREPROC_ELSE => true,
        _ => condition.is_some_and(|c| evaluate_condition(ctx.text(c).trim(), ctx.defines)),
    };

    if active {
        let skipped: Vec<usize> = [condition, alternative]
            .iter()
            .flatten()
            .map(|n| n.id())
            .collect();
        let branch: Vec<Node> = children_of(node)
            .into_iter()
            .filter(|c| !skipped.contains(&c.id()))
            .collect();
        walk_nodes(branch, ctx, out);
    } else if let Some(alternative) = alternative {
        walk_preprocessor(alternative, ctx, out);
    }
}

fn declared_name(node: Node, ctx: &WalkContext) -> String {
    let name_node = node
        .child_by_field_name(NAME_FIELD)
        .or_else(|| child_of_kind(node, IDENTIFIER));
    name_node
        .map(|n| ctx.text(n).trim().trim_start_matches('@').to_string())
        .unwrap_or_default()
}

fn modifiers_of(node: Node, ctx: &WalkContext) -> Vec<String> {
    children_of_kind(node, MODIFIER)
        .into_iter()
        .map(|m| ctx.text(m).trim().to_string())
        .collect()
}

fn explicit_interface_prefix(node: Node, ctx: &WalkContext) -> Option<String> {
    child_of_kind(node, EXPLICIT_INTERFACE_SPECIFIER).map(|specifier| {
        let text = ctx.text(specifier).trim().trim_end_matches('.');
        normalize_whitespace(text).replace(' ', "")
    })
}

fn declared_type_text<'s>(node: Node, ctx: &WalkContext<'s>) -> Option<&'s str> {
    node.child_by_field_name(TYPE_FIELD)
        .or_else(|| node.child_by_field_name(RETURNS_FIELD))
        .map(|t| ctx.text(t))
}

fn base_symbol(kind: SymbolKind, name: String, node: Node, ctx: &WalkContext) -> Symbol {
    let modifiers = modifiers_of(node, ctx);
    let mut symbol = Symbol::new(kind, name);
    symbol.namespace = ctx.namespace.clone();
    symbol.containing_type = ctx.containing_type.clone();
    symbol.containing_kind = ctx.containing_kind;
    symbol.accessibility = Accessibility::from_modifiers(&modifiers);
    symbol.modifiers = modifiers;
    symbol
}

fn walk_type(node: Node, ctx: &WalkContext) -> TypeDeclaration {
    let kind = match node.kind() {
        STRUCT_DECLARATION | RECORD_STRUCT_DECLARATION => SymbolKind::Struct,
        INTERFACE_DECLARATION => SymbolKind::Interface,
        ENUM_DECLARATION => SymbolKind::Enum,
        DELEGATE_DECLARATION => SymbolKind::Delegate,
        RECORD_DECLARATION => {
            let is_struct = children_of(node).iter().any(|c| ctx.text(*c) == "struct");
            if is_struct {
                SymbolKind::Struct
            } else {
                SymbolKind::Class
            }
        }
        _ => SymbolKind::Class,
    };

    let name = declared_name(node, ctx);
    let type_parameters = type_parameters_of(node, ctx);
    let mut symbol = base_symbol(kind, name.clone(), node, ctx);
    symbol.arity = type_parameters.len();

    let identity = type_identity(
        symbol.containing_type.as_deref(),
        &symbol.namespace,
        &symbol.name,
        symbol.arity,
    );
    let own_parameters: Vec<String> = type_parameters.iter().map(|p| p.name.clone()).collect();
    let generics = ctx.generics.nested(&own_parameters);

    let display_name = if own_parameters.is_empty() {
        name
    } else {
        format!("{}<{}>", name, own_parameters.join(", "))
    };

    let bases = child_of_kind(node, BASE_LIST)
        .map(|list| {
            children_of(list)
                .into_iter()
                .filter(|c| c.is_named() && c.kind() != ARGUMENT_LIST && c.kind() != COMMENT)
                .map(|c| base_type_text(ctx.text(c)))
                .collect()
        })
        .unwrap_or_default();

    let delegate_signature = (kind == SymbolKind::Delegate).then(|| {
        let return_type = declared_type_text(node, ctx).map(|t| normalize_type(t, &generics));
        let parameters = parameters_of(node, ctx, &generics);
        Signature {
            return_type,
            type_parameters: Vec::new(),
            parameters,
        }
    });
    if let Some(signature) = &delegate_signature {
        symbol.return_type = signature.return_type.clone();
        symbol.parameter_types = signature
            .parameters
            .iter()
            .map(|p| p.type_identity.clone())
            .collect();
    }

    let inner = WalkContext {
        source: ctx.source,
        defines: ctx.defines,
        namespace: ctx.namespace.clone(),
        containing_type: Some(identity),
        containing_kind: Some(kind),
        generics,
    };

    let mut members = Vec::new();
    let body = node
        .child_by_field_name(BODY_FIELD)
        .or_else(|| child_of_kind(node, DECLARATION_LIST))
        .or_else(|| child_of_kind(node, ENUM_MEMBER_DECLARATION_LIST));
    if let Some(body) = body {
        walk_nodes(children_of(body), &inner, &mut members);
    }

    TypeDeclaration {
        attributes: attributes_of(node, ctx),
        slot: leading_slot(node, ctx.source),
        symbol,
        display_name,
        type_parameters,
        bases,
        delegate_signature,
        members,
    }
}

fn base_type_text(text: &str) -> String {
    let text = text.trim();
    // Primary constructor arguments (`Base(x)`) are not part of the type
    let text = match text.find('(') {
        Some(index) if index > 0 => &text[..index],
        _ => text,
    };
    normalize_whitespace(text)
}

fn walk_member(node: Node, ctx: &WalkContext) -> Option<MemberDeclaration> {
    let kind = match node.kind() {
        METHOD_DECLARATION => SymbolKind::Method,
        CONSTRUCTOR_DECLARATION => SymbolKind::Constructor,
        DESTRUCTOR_DECLARATION => SymbolKind::Destructor,
        OPERATOR_DECLARATION => SymbolKind::Operator,
        CONVERSION_OPERATOR_DECLARATION => SymbolKind::Conversion,
        PROPERTY_DECLARATION => SymbolKind::Property,
        INDEXER_DECLARATION => SymbolKind::Indexer,
        EVENT_DECLARATION => SymbolKind::Event,
        ENUM_MEMBER_DECLARATION => SymbolKind::EnumMember,
        _ => return None,
    };

    let interface_prefix = explicit_interface_prefix(node, ctx);
    let type_parameters = if kind == SymbolKind::Method {
        type_parameters_of(node, ctx)
    } else {
        Vec::new()
    };
    let method_parameters: Vec<String> = type_parameters.iter().map(|p| p.name.clone()).collect();
    let generics = ctx.generics.with_method(&method_parameters);
    let parameters = parameters_of(node, ctx, &generics);

    let mut symbol = base_symbol(kind, String::new(), node, ctx);
    let name = match kind {
        SymbolKind::Constructor if symbol.is_static() => STATIC_CONSTRUCTOR_NAME.to_string(),
        SymbolKind::Constructor => CONSTRUCTOR_NAME.to_string(),
        SymbolKind::Destructor => DESTRUCTOR_NAME.to_string(),
        SymbolKind::Indexer => INDEXER_NAME.to_string(),
        SymbolKind::Operator => operator_name(node, ctx, parameters.len()),
        SymbolKind::Conversion => {
            let is_explicit = children_of(node).iter().any(|c| ctx.text(*c) == "explicit");
            if is_explicit {
                EXPLICIT_CONVERSION_NAME.to_string()
            } else {
                IMPLICIT_CONVERSION_NAME.to_string()
            }
        }
        _ => declared_name(node, ctx),
    };
    symbol.name = match &interface_prefix {
        Some(prefix) => format!("{}.{}", prefix, name),
        None => name,
    };
    symbol.is_explicit_interface_implementation = interface_prefix.is_some();
    symbol.arity = type_parameters.len();
    symbol.parameter_types = parameters.iter().map(|p| p.type_identity.clone()).collect();

    let return_type = match kind {
        SymbolKind::Constructor | SymbolKind::Destructor | SymbolKind::EnumMember => None,
        _ => declared_type_text(node, ctx).map(|t| normalize_type(t, &generics)),
    };
    symbol.return_type = return_type.clone();

    let value = (kind == SymbolKind::EnumMember)
        .then(|| enum_member_value(node, ctx))
        .flatten();

    Some(MemberDeclaration {
        attributes: attributes_of(node, ctx),
        slot: leading_slot(node, ctx.source),
        signature: Signature {
            return_type,
            type_parameters,
            parameters,
        },
        symbol,
        value,
    })
}

fn walk_local_function(node: Node, ctx: &WalkContext) -> MemberDeclaration {
    let name = declared_name(node, ctx);
    let mut symbol = base_symbol(SymbolKind::LocalFunction, name, node, ctx);
    let parameters = parameters_of(node, ctx, &ctx.generics);
    symbol.parameter_types = parameters.iter().map(|p| p.type_identity.clone()).collect();
    MemberDeclaration {
        symbol,
        signature: Signature {
            return_type: None,
            type_parameters: Vec::new(),
            parameters,
        },
        attributes: Vec::new(),
        value: None,
        slot: leading_slot(node, ctx.source),
    }
}

fn walk_field_statement(node: Node, ctx: &WalkContext) -> Option<FieldStatement> {
    let declaration = child_of_kind(node, VARIABLE_DECLARATION)?;
    let kind = if node.kind() == EVENT_FIELD_DECLARATION {
        SymbolKind::Event
    } else {
        SymbolKind::Field
    };
    let declared_type = declared_type_text(declaration, ctx)
        .map(|t| normalize_type(t, &ctx.generics))
        .unwrap_or_default();

    let statement_slot = leading_slot(node, ctx.source);
    let variables = children_of_kind(declaration, VARIABLE_DECLARATOR)
        .into_iter()
        .enumerate()
        .map(|(index, declarator)| {
            let mut symbol = base_symbol(kind, declared_name(declarator, ctx), node, ctx);
            symbol.return_type = Some(declared_type.clone());
            // The statement's trivia belongs to its first variable
            let slot = if index == 0 {
                statement_slot.clone()
            } else {
                leading_slot(declarator, ctx.source)
            };
            VariableDeclarator { symbol, slot }
        })
        .collect();

    Some(FieldStatement {
        attributes: attributes_of(node, ctx),
        declared_type,
        variables,
    })
}

fn operator_name(node: Node, ctx: &WalkContext, parameter_count: usize) -> String {
    let token = node
        .child_by_field_name(OPERATOR_FIELD)
        .map(|n| ctx.text(n).trim().to_string())
        .or_else(|| {
            // Fall back to the first operator token after the `operator` keyword
            children_of(node)
                .into_iter()
                .map(|c| ctx.text(c).trim())
                .skip_while(|t| *t != "operator")
                .skip(1)
                .find(|t| OPERATOR_NAMES.iter().any(|(op, _, _)| op == t))
                .map(str::to_string)
        })
        .unwrap_or_default();

    OPERATOR_NAMES
        .iter()
        .find(|(op, _, _)| *op == token)
        .map(|(_, unary, binary)| {
            if parameter_count == 1 {
                unary.to_string()
            } else {
                binary.to_string()
            }
        })
        .unwrap_or_else(|| format!("op_{}", token))
}

fn enum_member_value(node: Node, ctx: &WalkContext) -> Option<String> {
    if let Some(value) = node.child_by_field_name(VALUE_FIELD) {
        return Some(normalize_whitespace(ctx.text(value)));
    }
    let text = ctx.text(node);
    text.split_once('=')
        .map(|(_, value)| normalize_whitespace(value))
        .filter(|v| !v.is_empty())
}

fn type_parameters_of(node: Node, ctx: &WalkContext) -> Vec<TypeParameterInfo> {
    let Some(list) = child_of_kind(node, TYPE_PARAMETER_LIST) else {
        return Vec::new();
    };

    let mut parameters: Vec<TypeParameterInfo> = children_of_kind(list, TYPE_PARAMETER)
        .into_iter()
        .map(|p| {
            let variance = children_of(p)
                .into_iter()
                .map(|c| ctx.text(c).trim())
                .find(|t| *t == IN_MODIFIER || *t == OUT_MODIFIER)
                .map(str::to_string);
            let name = p
                .child_by_field_name(NAME_FIELD)
                .or_else(|| children_of_kind(p, IDENTIFIER).into_iter().last())
                .map(|n| ctx.text(n).trim().to_string())
                .unwrap_or_default();
            TypeParameterInfo {
                name,
                variance,
                constraints: Vec::new(),
            }
        })
        .collect();

    for clause in children_of_kind(node, TYPE_PARAMETER_CONSTRAINTS_CLAUSE) {
        let Some(captures) = constraint_regex().captures(ctx.text(clause)) else {
            continue;
        };
        let target = &captures[1];
        let constraints: Vec<String> = split_parameters(&captures[2])
            .iter()
            .map(|c| normalize_whitespace(c))
            .collect();
        if let Some(parameter) = parameters.iter_mut().find(|p| p.name == target) {
            parameter.constraints = constraints;
        }
    }

    parameters
}

fn constraint_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\s*where\s+@?(\w+)\s*:\s*(.*?)\s*$")
            .expect("Failed to compile constraint regex")
    })
}

fn parameters_of(node: Node, ctx: &WalkContext, generics: &GenericContext) -> Vec<ParameterInfo> {
    let list = node
        .child_by_field_name(PARAMETERS_FIELD)
        .filter(|l| l.kind() == PARAMETER_LIST || l.kind() == BRACKETED_PARAMETER_LIST)
        .or_else(|| child_of_kind(node, PARAMETER_LIST))
        .or_else(|| child_of_kind(node, BRACKETED_PARAMETER_LIST));
    let Some(list) = list else {
        return Vec::new();
    };

    children_of(list)
        .into_iter()
        .filter(|c| c.kind() == PARAMETER || c.kind() == "parameter_array")
        .map(|p| parameter_info(p, ctx, generics))
        .collect()
}

fn parameter_info(node: Node, ctx: &WalkContext, generics: &GenericContext) -> ParameterInfo {
    let type_node = node.child_by_field_name(TYPE_FIELD);
    let name_node = node
        .child_by_field_name(NAME_FIELD)
        .or_else(|| children_of_kind(node, IDENTIFIER).into_iter().last());
    let skipped: Vec<usize> = [type_node, name_node].iter().flatten().map(|n| n.id()).collect();

    let mut modifier: Option<String> = None;
    let mut default_value = None;
    let mut after_equals = false;
    for child in children_of(node) {
        if skipped.contains(&child.id()) || child.kind() == ATTRIBUTE_LIST {
            continue;
        }
        let text = ctx.text(child).trim();
        if after_equals {
            default_value = Some(normalize_whitespace(text));
            after_equals = false;
            continue;
        }
        if child.kind() == EQUALS_VALUE_CLAUSE {
            default_value = Some(normalize_whitespace(text.trim_start_matches('=')));
            continue;
        }
        if text == "=" {
            after_equals = true;
            continue;
        }
        if [REF_MODIFIER, OUT_MODIFIER, IN_MODIFIER, PARAMS_MODIFIER, THIS_MODIFIER]
            .contains(&text)
        {
            // `this` and `params` never override a by-reference modifier
            let by_ref = modifier
                .as_deref()
                .is_some_and(|m| [REF_MODIFIER, OUT_MODIFIER, IN_MODIFIER].contains(&m));
            if !by_ref {
                modifier = Some(text.to_string());
            }
        }
    }

    let mut type_text = type_node.map(|t| ctx.text(t).trim()).unwrap_or_default();
    // Some grammar versions fold the by-reference modifier into the type
    for by_ref in [REF_MODIFIER, OUT_MODIFIER, IN_MODIFIER] {
        if let Some(rest) = type_text.strip_prefix(by_ref) {
            if rest.starts_with(char::is_whitespace) {
                type_text = rest.trim_start();
                modifier = Some(by_ref.to_string());
            }
        }
    }

    let mut type_identity = normalize_type(type_text, generics);
    if modifier
        .as_deref()
        .is_some_and(|m| [REF_MODIFIER, OUT_MODIFIER, IN_MODIFIER].contains(&m))
    {
        type_identity.push('@');
    }

    ParameterInfo {
        name: name_node
            .map(|n| ctx.text(n).trim().trim_start_matches('@').to_string())
            .unwrap_or_default(),
        type_identity,
        modifier,
        default_value,
    }
}

fn attributes_of(node: Node, ctx: &WalkContext) -> Vec<AttributeInfo> {
    let mut attributes = Vec::new();
    for list in children_of_kind(node, ATTRIBUTE_LIST) {
        // `[return: X]` and friends do not describe the declaration itself
        if child_of_kind(list, ATTRIBUTE_TARGET_SPECIFIER).is_some() {
            continue;
        }
        for attribute in children_of_kind(list, ATTRIBUTE) {
            let name_node = attribute
                .child_by_field_name(NAME_FIELD)
                .or_else(|| attribute.named_child(0));
            let Some(name_node) = name_node else {
                continue;
            };
            let arguments = child_of_kind(attribute, ATTRIBUTE_ARGUMENT_LIST)
                .map(|args| {
                    children_of_kind(args, ATTRIBUTE_ARGUMENT)
                        .into_iter()
                        .map(|a| attribute_argument(ctx.text(a)))
                        .collect()
                })
                .unwrap_or_default();
            attributes.push(AttributeInfo {
                type_name: attribute_type_name(ctx.text(name_node)),
                arguments,
            });
        }
    }
    attributes
}

/// Attribute class name for an attribute as written (`Serializable` -> `SerializableAttribute`)
pub fn attribute_type_name(written: &str) -> String {
    let name = normalize_whitespace(written).replace(' ', "");
    let name = name.strip_prefix("global::").unwrap_or(&name).to_string();
    let base_end = name.find('<').unwrap_or(name.len());
    let simple = name[..base_end].rsplit('.').next().unwrap_or_default();
    if simple.ends_with("Attribute") {
        name
    } else {
        format!("{}Attribute{}", &name[..base_end], &name[base_end..])
    }
}

fn named_argument_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\s*@?([A-Za-z_]\w*)\s*[=:]\s*(.+?)\s*$")
            .expect("Failed to compile named argument regex")
    })
}

fn attribute_argument(text: &str) -> AttributeArgument {
    let (name, value) = match named_argument_regex().captures(text) {
        Some(captures) if !captures[2].starts_with('=') => {
            (Some(captures[1].to_string()), captures[2].to_string())
        }
        _ => (None, text.trim().to_string()),
    };
    let value = normalize_whitespace(&value);
    AttributeArgument {
        name,
        value_type: literal_type(&value),
        value,
    }
}

/// Infer the type of an attribute argument from its literal syntax
pub fn literal_type(value: &str) -> String {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();
    let system = |name: &str| name.to_string();

    if value.starts_with('"') || value.starts_with("@\"") || value.starts_with("$\"") || value.starts_with("\"\"\"") {
        return system(SYSTEM_STRING_TYPE);
    }
    if value.starts_with('\'') {
        return system(SYSTEM_CHAR_TYPE);
    }
    if value == "true" || value == "false" {
        return system(SYSTEM_BOOLEAN_TYPE);
    }
    if value == "null" {
        return system(SYSTEM_OBJECT_TYPE);
    }
    if value.starts_with("typeof") {
        return system(SYSTEM_TYPE_TYPE);
    }
    if value.starts_with("nameof") {
        return system(SYSTEM_STRING_TYPE);
    }

    let numeric = value.trim_start_matches('-');
    if numeric.starts_with(|c: char| c.is_ascii_digit()) {
        let is_hex = lower.trim_start_matches('-').starts_with("0x");
        return if lower.ends_with("ul") || lower.ends_with("lu") {
            system(SYSTEM_UINT64_TYPE)
        } else if lower.ends_with('l') {
            system(SYSTEM_INT64_TYPE)
        } else if lower.ends_with('u') {
            system(SYSTEM_UINT32_TYPE)
        } else if lower.ends_with('m') {
            system(SYSTEM_DECIMAL_TYPE)
        } else if !is_hex && lower.ends_with('f') {
            system(SYSTEM_SINGLE_TYPE)
        } else if !is_hex && (lower.ends_with('d') || lower.contains('.') || lower.contains('e')) {
            system(SYSTEM_DOUBLE_TYPE)
        } else {
            system(SYSTEM_INT32_TYPE)
        };
    }

    // `AttributeTargets.Class | AttributeTargets.Method` -> AttributeTargets
    let first = value.split('|').next().unwrap_or(value).trim();
    match first.rsplit_once('.') {
        Some((owner, _)) if !owner.is_empty() && !owner.contains('(') => normalize_whitespace(owner),
        _ => system(SYSTEM_OBJECT_TYPE),
    }
}

/// Compute the documentation slot of a declaration from its leading trivia
fn leading_slot(node: Node, source: &str) -> DocSlot {
    // Leading comments the grammar attached inside the node are trivia too
    let anchor = children_of(node)
        .into_iter()
        .find(|c| c.kind() != COMMENT)
        .map(|c| c.start_byte())
        .unwrap_or_else(|| node.start_byte());

    let mut previous = node.prev_sibling();
    while let Some(sibling) = previous {
        if sibling.kind() != COMMENT {
            break;
        }
        previous = sibling.prev_sibling();
    }
    let floor = previous
        .map(|p| p.end_byte())
        .or_else(|| node.parent().map(|p| p.start_byte()))
        .unwrap_or(0)
        .min(anchor);

    scan_doc_slot(source, floor, anchor)
}

/// Find the `///` lines between `floor` and `anchor`
///
/// Only lines that start within the region count: a comment trailing code on
/// the same line belongs to that code.
pub fn scan_doc_slot(source: &str, floor: usize, anchor: usize) -> DocSlot {
    let bytes = source.as_bytes();
    let mut existing = Vec::new();
    let mut offset = floor;
    let mut in_block_comment = false;

    for segment in source[floor..anchor].split_inclusive('\n') {
        let segment_start = offset;
        offset += segment.len();
        if !segment.ends_with('\n') {
            break;
        }

        let line = segment.trim_end_matches('\n').trim_end_matches('\r');
        let content = line.trim_start();
        let at_line_start = segment_start == 0 || bytes[segment_start - 1] == b'\n';

        if in_block_comment {
            if content.contains("*/") {
                in_block_comment = false;
            }
            continue;
        }
        if let Some(rest) = content.strip_prefix("/*") {
            in_block_comment = !rest.contains("*/");
            continue;
        }
        if !at_line_start {
            continue;
        }
        if let Some(rest) = content.strip_prefix(XML_DOC_COMMENT_PREFIX) {
            if rest.starts_with('/') {
                continue;
            }
            let text = rest.strip_prefix(' ').unwrap_or(rest).trim_end();
            existing.push(DocLine {
                span: segment_start..offset,
                text: text.to_string(),
            });
        }
    }

    let line_start = source[..anchor].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let prefix = &source[line_start..anchor];
    let inline = !prefix.trim().is_empty();
    let indent: String = source[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();

    let insert_span = if inline {
        let trimmed = source[..anchor].trim_end_matches([' ', '\t']).len();
        trimmed.max(floor)..anchor
    } else {
        line_start..line_start
    };

    DocSlot {
        existing,
        insert_span,
        indent,
        inline,
    }
}

#[cfg(test)]
#[path = "symbols_tests.rs"]
mod tests;
