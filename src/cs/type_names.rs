//! Type name normalization for C# declarations
//!
//! This module turns type syntax as written in source (`List<string>`, `int[,]`,
//! `(int a, T b)`, `global::Ns.Type*`) into the canonical type identity used
//! inside member identities, so that the same declaration always produces the
//! same key regardless of spelling.

use super::constants::*;

/// Type parameters visible at a declaration, used to render references to
/// them positionally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericContext {
    /// Type parameters of all containing types, outermost first
    pub type_parameters: Vec<String>,
    /// Type parameters of the method being rendered
    pub method_type_parameters: Vec<String>,
    /// Whether the file has `using System;` in scope
    pub imports_system: bool,
}

impl GenericContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for the members of a type whose own parameters are `own`
    pub fn nested(&self, own: &[String]) -> Self {
        let mut type_parameters = self.type_parameters.clone();
        type_parameters.extend(own.iter().cloned());
        Self {
            type_parameters,
            method_type_parameters: Vec::new(),
            imports_system: self.imports_system,
        }
    }

    /// Context for a generic method declared with `method_params`
    pub fn with_method(&self, method_params: &[String]) -> Self {
        Self {
            type_parameters: self.type_parameters.clone(),
            method_type_parameters: method_params.to_vec(),
            imports_system: self.imports_system,
        }
    }

    fn resolve(&self, name: &str) -> Option<String> {
        // Method type parameters shadow type parameters of the same name
        if let Some(index) = self.method_type_parameters.iter().position(|p| p == name) {
            return Some(format!("``{}", index));
        }
        self.type_parameters
            .iter()
            .rposition(|p| p == name)
            .map(|index| format!("`{}", index))
    }
}

/// Look up the System type behind a C# keyword alias
///
/// Returns the fully qualified name and whether the type is a value type
pub fn predefined_system_name(alias: &str) -> Option<(&'static str, bool)> {
    PREDEFINED_TYPES
        .iter()
        .find(|(keyword, _, _)| *keyword == alias)
        .map(|(_, system_name, is_value_type)| (*system_name, *is_value_type))
}

/// Look up a predefined type by its fully qualified System name
fn predefined_by_system_name(name: &str) -> Option<(&'static str, bool)> {
    PREDEFINED_TYPES
        .iter()
        .find(|(_, system_name, _)| *system_name == name)
        .map(|(_, system_name, is_value_type)| (*system_name, *is_value_type))
}

/// Look up a predefined type by its simple name, such as `Int32`
fn predefined_by_simple_name(name: &str) -> Option<(&'static str, bool)> {
    PREDEFINED_TYPES
        .iter()
        .find(|(_, system_name, _)| system_name.strip_prefix("System.") == Some(name))
        .map(|(_, system_name, is_value_type)| (*system_name, *is_value_type))
}

/// Compute the canonical identity of a type as written in source
pub fn type_identity(type_text: &str, ctx: &GenericContext) -> String {
    let mut parser = TypeSyntaxParser::new(type_text, ctx);
    let rendered = parser.parse_type();
    parser.skip_whitespace();
    if parser.at_end() {
        rendered
    } else {
        // Syntax we do not model; fall back to the compacted source text
        compact_whitespace(type_text)
    }
}

/// Remove all whitespace from a piece of type syntax
pub fn compact_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Collapse runs of whitespace into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a comma separated list, ignoring commas nested in generics,
/// parentheses or brackets
pub fn split_parameters(params: &str) -> Vec<String> {
    if params.trim().is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in params.chars() {
        match ch {
            '<' | '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            '>' | ')' | ']' | '}' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                result.push(current.trim().to_string());
                current.clear();
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.trim().is_empty() {
        result.push(current.trim().to_string());
    }

    result
}

/// Small recursive descent parser over C# type syntax
struct TypeSyntaxParser<'a> {
    chars: Vec<char>,
    pos: usize,
    ctx: &'a GenericContext,
}

impl<'a> TypeSyntaxParser<'a> {
    fn new(text: &str, ctx: &'a GenericContext) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            ctx,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a keyword only when it is followed by a non identifier char
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let len = keyword.chars().count();
        let matches = keyword
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c));
        let boundary = self
            .peek_at(len)
            .map_or(true, |c| !is_identifier_char(c));
        if matches && boundary {
            self.pos += len;
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> Option<String> {
        self.skip_whitespace();
        let start = self.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        let ident: String = self.chars[start..self.pos].iter().collect();
        Some(ident.trim_start_matches('@').to_string())
    }

    fn parse_type(&mut self) -> String {
        // `ref readonly T` return types carry no identity information
        while self.eat_keyword(REF_MODIFIER)
            || self.eat_keyword(READONLY_MODIFIER)
            || self.eat_keyword(SCOPED_MODIFIER)
        {}

        self.skip_whitespace();
        let (mut rendered, mut is_value_type) = if self.peek() == Some('(') {
            (self.parse_tuple(), true)
        } else {
            self.parse_named()
        };

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('[') => {
                    self.pos += 1;
                    let mut rank_marker = String::from("[");
                    while let Some(c) = self.peek() {
                        self.pos += 1;
                        match c {
                            ',' => rank_marker.push(','),
                            ']' => break,
                            _ => {}
                        }
                    }
                    rank_marker.push(']');
                    rendered.push_str(&rank_marker);
                    is_value_type = false;
                }
                Some('*') => {
                    self.pos += 1;
                    rendered.push('*');
                    is_value_type = false;
                }
                Some('?') => {
                    self.pos += 1;
                    if is_value_type {
                        rendered = format!("{}{{{}}}", SYSTEM_NULLABLE_TYPE, rendered);
                    }
                    is_value_type = false;
                }
                _ => break,
            }
        }

        rendered
    }

    fn parse_tuple(&mut self) -> String {
        self.pos += 1; // (
        let mut elements = Vec::new();
        loop {
            self.skip_whitespace();
            if self.at_end() || self.eat(')') {
                break;
            }
            elements.push(self.parse_type());
            // Element names (`(int count, string name)`) are not part of the type
            let checkpoint = self.pos;
            if self.identifier().is_none() {
                self.pos = checkpoint;
            }
            if !self.eat(',') {
                self.eat(')');
                break;
            }
        }
        format!("{}{{{}}}", SYSTEM_VALUE_TUPLE_TYPE, elements.join(","))
    }

    fn parse_named(&mut self) -> (String, bool) {
        let mut segments: Vec<String> = Vec::new();
        let mut single_plain: Option<String> = None;

        loop {
            let Some(ident) = self.identifier() else {
                break;
            };

            // Function pointers keep their compacted syntax
            if ident == "delegate" && self.peek() == Some('*') {
                let rest: String = self.chars[self.pos..].iter().collect();
                self.pos = self.chars.len();
                return (format!("delegate{}", compact_whitespace(&rest)), false);
            }

            self.skip_whitespace();
            let mut segment = ident.clone();
            let mut has_arguments = false;
            if self.peek() == Some('<') {
                self.pos += 1;
                has_arguments = true;
                let mut arguments = Vec::new();
                loop {
                    self.skip_whitespace();
                    if self.at_end() || self.eat('>') {
                        break;
                    }
                    if self.peek() == Some(',') {
                        // Unbound generic such as `Dictionary<,>`
                        self.pos += 1;
                        arguments.push(String::new());
                        continue;
                    }
                    arguments.push(self.parse_type());
                    if !self.eat(',') {
                        self.eat('>');
                        break;
                    }
                }
                segment = format!("{}{{{}}}", segment, arguments.join(","));
            }

            if segments.is_empty() && !has_arguments {
                single_plain = Some(ident);
            } else {
                single_plain = None;
            }
            segments.push(segment);

            self.skip_whitespace();
            if self.peek() == Some(':') && self.peek_at(1) == Some(':') {
                // Alias qualifier; `global::` contributes nothing
                self.pos += 2;
                if segments.len() == 1 && segments[0] == "global" {
                    segments.clear();
                } else {
                    // Keep other aliases as a plain prefix
                    let alias = segments.pop().unwrap_or_default();
                    segments.push(alias);
                }
                single_plain = None;
                continue;
            }
            if self.peek() == Some('.') {
                self.pos += 1;
                continue;
            }
            break;
        }

        if segments.len() == 1 {
            if let Some(plain) = single_plain {
                if let Some((system_name, is_value_type)) = predefined_system_name(&plain) {
                    return (system_name.to_string(), is_value_type);
                }
                if let Some(positional) = self.ctx.resolve(&plain) {
                    return (positional, false);
                }
                if self.ctx.imports_system {
                    if let Some((system_name, is_value_type)) = predefined_by_simple_name(&plain) {
                        return (system_name.to_string(), is_value_type);
                    }
                }
            }
        }

        if segments.is_empty() {
            // Unknown syntax: consume one character so parsing always advances
            if let Some(c) = self.peek() {
                self.pos += 1;
                return (c.to_string(), false);
            }
        }

        let name = segments.join(".");
        match predefined_by_system_name(&name) {
            Some((_, is_value_type)) => (name, is_value_type),
            None => (name, false),
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '@'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_parameters() {
        assert_eq!(split_parameters(""), Vec::<String>::new());
        assert_eq!(split_parameters("int"), vec!["int"]);
        assert_eq!(split_parameters("int, string"), vec!["int", "string"]);
        assert_eq!(
            split_parameters("List<int>, Dictionary<string, int>"),
            vec!["List<int>", "Dictionary<string, int>"]
        );
        assert_eq!(
            split_parameters("(int a, int b) pair, int[,] grid"),
            vec!["(int a, int b) pair", "int[,] grid"]
        );
    }

    #[test]
    fn test_predefined_types_map_to_system_names() {
        let ctx = GenericContext::new();
        assert_eq!(type_identity("int", &ctx), SYSTEM_INT32_TYPE);
        assert_eq!(type_identity("string", &ctx), SYSTEM_STRING_TYPE);
        assert_eq!(type_identity("System.String", &ctx), SYSTEM_STRING_TYPE);
        assert_eq!(type_identity("object", &ctx), SYSTEM_OBJECT_TYPE);
    }

    #[test]
    fn test_system_names_match_their_aliases() {
        let plain = GenericContext::new();
        let ctx = GenericContext {
            imports_system: true,
            ..GenericContext::new()
        };

        assert_eq!(type_identity("System.Int32", &plain), SYSTEM_INT32_TYPE);
        assert_eq!(
            type_identity("System.Int32?", &plain),
            type_identity("int?", &plain)
        );
        assert_eq!(
            type_identity("global::System.Double[]", &plain),
            "System.Double[]"
        );

        // Simple names only resolve when System is imported
        assert_eq!(type_identity("Int32", &plain), "Int32");
        assert_eq!(type_identity("Int32", &ctx), SYSTEM_INT32_TYPE);
        assert_eq!(type_identity("Boolean?", &ctx), "System.Nullable{System.Boolean}");
        assert_eq!(
            type_identity("List<String>", &ctx),
            type_identity("List<string>", &plain)
        );
        assert_eq!(type_identity("Guid", &ctx), "Guid");

        // Type parameters shadow System names
        let shadowed = ctx.nested(&["Int32".to_string()]);
        assert_eq!(type_identity("Int32", &shadowed), "`0");
        assert!(shadowed.with_method(&[]).imports_system);
    }

    #[test]
    fn test_generic_types_render_recursively() {
        let ctx = GenericContext::new();
        assert_eq!(
            type_identity("List<string>", &ctx),
            "List{System.String}"
        );
        assert_eq!(
            type_identity("Dictionary<string, List<int>>", &ctx),
            "Dictionary{System.String,List{System.Int32}}"
        );
        assert_eq!(
            type_identity("global::System.Collections.Generic.List< int >", &ctx),
            "System.Collections.Generic.List{System.Int32}"
        );
    }

    #[test]
    fn test_arrays_pointers_and_nullables() {
        let ctx = GenericContext::new();
        assert_eq!(type_identity("int[]", &ctx), "System.Int32[]");
        assert_eq!(type_identity("int[,]", &ctx), "System.Int32[,]");
        assert_eq!(type_identity("int[][]", &ctx), "System.Int32[][]");
        assert_eq!(type_identity("byte*", &ctx), "System.Byte*");
        assert_eq!(type_identity("int?", &ctx), "System.Nullable{System.Int32}");
        // Reference type nullability is an annotation only
        assert_eq!(type_identity("string?", &ctx), SYSTEM_STRING_TYPE);
        assert_eq!(type_identity("List<string?>", &ctx), "List{System.String}");
    }

    #[test]
    fn test_tuples() {
        let ctx = GenericContext::new();
        assert_eq!(
            type_identity("(int count, string name)", &ctx),
            "System.ValueTuple{System.Int32,System.String}"
        );
        assert_eq!(
            type_identity("(int, (bool, char))", &ctx),
            "System.ValueTuple{System.Int32,System.ValueTuple{System.Boolean,System.Char}}"
        );
    }

    #[test]
    fn test_type_parameters_render_positionally() {
        let outer = GenericContext::new().nested(&["TKey".to_string(), "TValue".to_string()]);
        let method = outer.with_method(&["T".to_string()]);
        assert_eq!(type_identity("TValue", &method), "`1");
        assert_eq!(type_identity("List<T>", &method), "List{``0}");
        assert_eq!(type_identity("T[]", &method), "``0[]");
        // Same shape, different spelling, same identity
        let renamed = outer.with_method(&["U".to_string()]);
        assert_eq!(
            type_identity("List<U>", &renamed),
            type_identity("List<T>", &method)
        );
    }

    #[test]
    fn test_ref_returns_and_unknown_syntax() {
        let ctx = GenericContext::new();
        assert_eq!(type_identity("ref readonly int", &ctx), SYSTEM_INT32_TYPE);
        assert_eq!(
            type_identity("delegate* unmanaged<int, void>", &ctx),
            "delegate*unmanaged<int,void>"
        );
    }
}
