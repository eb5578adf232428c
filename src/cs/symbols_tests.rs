use super::*;
use crate::test_utils::{parse_cs, parse_cs_with_defines};

fn unit_names(file: &SyntaxFile) -> Vec<String> {
    file.doc_units()
        .iter()
        .map(|u| u.symbol.name.clone())
        .collect()
}

fn find_symbol<'a>(file: &'a SyntaxFile, name: &str) -> DocUnit<'a> {
    *file
        .doc_units()
        .iter()
        .find(|u| u.symbol.name == name)
        .unwrap_or_else(|| panic!("Symbol {} not found", name))
}

#[test]
fn test_namespaces_and_nesting() {
    let source = r#"
namespace Acme.Core
{
    public class Outer<T>
    {
        public class Inner
        {
            public void Run() { }
        }
    }
}
"#;
    let file = parse_cs("Outer.cs", source);
    assert_eq!(unit_names(&file), vec!["Outer", "Inner", "Run"]);

    let outer = find_symbol(&file, "Outer");
    assert_eq!(outer.symbol.kind, SymbolKind::Class);
    assert_eq!(outer.symbol.namespace, "Acme.Core");
    assert_eq!(outer.symbol.arity, 1);
    assert_eq!(outer.symbol.containing_type, None);

    let inner = find_symbol(&file, "Inner");
    assert_eq!(inner.symbol.containing_type.as_deref(), Some("Acme.Core.Outer`1"));
    assert_eq!(inner.symbol.containing_kind, Some(SymbolKind::Class));

    let run = find_symbol(&file, "Run");
    assert_eq!(run.symbol.containing_type.as_deref(), Some("Acme.Core.Outer`1.Inner"));
    assert_eq!(run.symbol.return_type.as_deref(), Some("System.Void"));
}

#[test]
fn test_file_scoped_namespace() {
    let source = r#"namespace Acme.Tools;

public interface IRunner
{
    void Run();
}
"#;
    let file = parse_cs("IRunner.cs", source);
    let runner = find_symbol(&file, "IRunner");
    assert_eq!(runner.symbol.kind, SymbolKind::Interface);
    assert_eq!(runner.symbol.namespace, "Acme.Tools");

    let run = find_symbol(&file, "Run");
    assert_eq!(run.symbol.containing_type.as_deref(), Some("Acme.Tools.IRunner"));
    assert_eq!(run.symbol.effective_accessibility(), Accessibility::Public);
}

#[test]
fn test_doc_slot_raw_text() {
    let source = r#"namespace Acme
{
    // Ordinary comment
    /// <summary>
    ///  Indented line
    /// </summary>
    [Serializable]
    public class Widget { }
}
"#;
    let file = parse_cs("Widget.cs", source);
    let widget = find_symbol(&file, "Widget");
    assert!(widget.slot.has_doc());
    assert_eq!(
        widget.slot.raw_text().as_deref(),
        Some("<summary>\n Indented line\n</summary>")
    );
    assert_eq!(widget.slot.indent, "    ");
    assert!(!widget.slot.inline);
    // The ordinary comment is not part of the documentation
    assert_eq!(widget.slot.existing.len(), 3);
}

#[test]
fn test_four_slashes_are_not_documentation() {
    let source = r#"public class Widget
{
    //// Disabled doc
    public int Size;
}
"#;
    let file = parse_cs("Widget.cs", source);
    let size = find_symbol(&file, "Size");
    assert!(!size.slot.has_doc());
}

#[test]
fn test_multi_declarator_field_slots() {
    let source = r#"public class Point
{
    public int X, /// <summary>Y axis</summary>
        Y;
}
"#;
    let file = parse_cs("Point.cs", source);
    let x = find_symbol(&file, "X");
    let y = find_symbol(&file, "Y");

    assert_eq!(x.symbol.kind, SymbolKind::Field);
    assert_eq!(x.symbol.return_type.as_deref(), Some("System.Int32"));
    assert!(!x.slot.has_doc());
    assert!(!x.slot.inline);

    // A comment trailing code on the same line is not leading documentation
    assert!(!y.slot.has_doc());
    assert_eq!(y.symbol.modifiers, vec!["public".to_string()]);
}

#[test]
fn test_second_declarator_on_own_line_has_own_doc() {
    let source = r#"public class Point
{
    public int X,
        /// <summary>Y axis</summary>
        Y;
}
"#;
    let file = parse_cs("Point.cs", source);
    let x = find_symbol(&file, "X");
    let y = find_symbol(&file, "Y");
    assert!(!x.slot.has_doc());
    assert_eq!(y.slot.raw_text().as_deref(), Some("<summary>Y axis</summary>"));
}

#[test]
fn test_inline_declarator_slot() {
    let source = "public class Point\n{\n    public int X, Y;\n}\n";
    let file = parse_cs("Point.cs", source);
    let y = find_symbol(&file, "Y");
    assert!(y.slot.inline);
    assert_eq!(&source[y.slot.insert_span.clone()], " ");
}

#[test]
fn test_special_member_names() {
    let source = r#"public class Money : IDisposable
{
    static Money() { }
    public Money(int cents) { }
    ~Money() { }
    public int this[int index] => index;
    public static Money operator +(Money a, Money b) => a;
    public static Money operator -(Money a) => a;
    public static explicit operator int(Money m) => 0;
    void IDisposable.Dispose() { }
}
"#;
    let file = parse_cs("Money.cs", source);
    let names = unit_names(&file);
    assert!(names.contains(&".cctor".to_string()));
    assert!(names.contains(&".ctor".to_string()));
    assert!(names.contains(&"Finalize".to_string()));
    assert!(names.contains(&"Item".to_string()));
    assert!(names.contains(&"op_Addition".to_string()));
    assert!(names.contains(&"op_UnaryNegation".to_string()));
    assert!(names.contains(&"op_Explicit".to_string()));
    assert!(names.contains(&"IDisposable.Dispose".to_string()));

    let dispose = find_symbol(&file, "IDisposable.Dispose");
    assert!(dispose.symbol.is_explicit_interface_implementation);

    let conversion = find_symbol(&file, "op_Explicit");
    assert_eq!(conversion.symbol.kind, SymbolKind::Conversion);
    assert_eq!(conversion.symbol.return_type.as_deref(), Some("System.Int32"));
    assert_eq!(conversion.symbol.parameter_types, vec!["Money".to_string()]);
}

#[test]
fn test_parameters_and_generics() {
    let source = r#"public class Mapper<T>
{
    public TOut Map<TOut>(T input, ref int count, List<TOut> results, int? limit = null) => default;
}
"#;
    let file = parse_cs("Mapper.cs", source);
    let map = find_symbol(&file, "Map");
    assert_eq!(map.symbol.arity, 1);
    assert_eq!(
        map.symbol.parameter_types,
        vec![
            "`0".to_string(),
            "System.Int32@".to_string(),
            "List{``0}".to_string(),
            "System.Nullable{System.Int32}".to_string(),
        ]
    );

    let member = file
        .declarations
        .iter()
        .find_map(|d| match d {
            Declaration::Type(t) => t.members.iter().find_map(|m| match m {
                Declaration::Member(m) if m.symbol.name == "Map" => Some(m.clone()),
                _ => None,
            }),
            _ => None,
        })
        .expect("Map member");
    assert_eq!(member.signature.parameters[1].modifier.as_deref(), Some("ref"));
    assert_eq!(member.signature.parameters[3].default_value.as_deref(), Some("null"));
    assert_eq!(member.signature.type_parameters[0].name, "TOut");
}

#[test]
fn test_type_details() {
    let source = r#"namespace Acme
{
    [Obsolete("Use Other", false)]
    public sealed class Repo<TKey, TValue> : Base, IDisposable where TKey : class, new()
    {
        public enum Mode { Fast = 1, Slow }
    }
}
"#;
    let file = parse_cs("Repo.cs", source);
    let types = file.type_declarations();
    let repo = types[0];
    assert_eq!(repo.display_name, "Repo<TKey, TValue>");
    assert_eq!(repo.bases, vec!["Base".to_string(), "IDisposable".to_string()]);
    assert_eq!(repo.type_parameters[0].constraints, vec!["class".to_string(), "new()".to_string()]);
    assert!(repo.symbol.has_modifier("sealed"));

    assert_eq!(repo.attributes.len(), 1);
    assert_eq!(repo.attributes[0].type_name, "ObsoleteAttribute");
    assert_eq!(repo.attributes[0].arguments[0].value, "\"Use Other\"");
    assert_eq!(repo.attributes[0].arguments[0].value_type, "System.String");
    assert_eq!(repo.attributes[0].arguments[1].value_type, "System.Boolean");

    let mode = types[1];
    assert_eq!(mode.symbol.kind, SymbolKind::Enum);
    let values: Vec<Option<String>> = mode
        .members
        .iter()
        .filter_map(|m| match m {
            Declaration::Member(m) => Some(m.value.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec![Some("1".to_string()), None]);
}

#[test]
fn test_preprocessor_branches() {
    let source = r#"public class Toggle
{
#if FEATURE_A
    public void OnlyA() { }
#else
    public void NotA() { }
#endif
}
"#;
    let with_a = parse_cs_with_defines("Toggle.cs", source, &["FEATURE_A"]);
    let names = unit_names(&with_a);
    assert!(names.contains(&"OnlyA".to_string()));
    assert!(!names.contains(&"NotA".to_string()));

    let without = parse_cs("Toggle.cs", source);
    let names = unit_names(&without);
    assert!(!names.contains(&"OnlyA".to_string()));
    assert!(names.contains(&"NotA".to_string()));
}

#[test]
fn test_accessibility_defaults() {
    let source = r#"class Hidden
{
    int count;
    protected internal void Shared() { }
}
"#;
    let file = parse_cs("Hidden.cs", source);
    assert_eq!(
        find_symbol(&file, "Hidden").symbol.effective_accessibility(),
        Accessibility::Internal
    );
    assert_eq!(
        find_symbol(&file, "count").symbol.effective_accessibility(),
        Accessibility::Private
    );
    assert_eq!(
        find_symbol(&file, "Shared").symbol.effective_accessibility(),
        Accessibility::ProtectedInternal
    );
}

#[test]
fn test_crlf_line_endings() {
    let source = "/// <summary>Doc</summary>\r\npublic class Widget { }\r\n";
    let file = parse_cs("Widget.cs", source);
    assert_eq!(file.line_ending, "\r\n");
    let widget = find_symbol(&file, "Widget");
    assert_eq!(widget.slot.raw_text().as_deref(), Some("<summary>Doc</summary>"));
}

#[test]
fn test_literal_types() {
    assert_eq!(literal_type("42"), "System.Int32");
    assert_eq!(literal_type("42L"), "System.Int64");
    assert_eq!(literal_type("1.5f"), "System.Single");
    assert_eq!(literal_type("1.5"), "System.Double");
    assert_eq!(literal_type("0xFF"), "System.Int32");
    assert_eq!(literal_type("'c'"), "System.Char");
    assert_eq!(literal_type("typeof(int)"), "System.Type");
    assert_eq!(literal_type("AttributeTargets.Class | AttributeTargets.Method"), "AttributeTargets");
}

#[test]
fn test_attribute_type_name() {
    assert_eq!(attribute_type_name("Serializable"), "SerializableAttribute");
    assert_eq!(attribute_type_name("ObsoleteAttribute"), "ObsoleteAttribute");
    assert_eq!(attribute_type_name("System.Flags"), "System.FlagsAttribute");
}

#[test]
fn test_system_simple_names_follow_using_directives() {
    let source = r#"namespace Before
{
    public class A { public void Run(Int32 value) { } }
}
namespace Acme
{
    using System;

    public class B { public void Run(Int32 value, String name) { } }
}
"#;
    let file = parse_cs("Scoped.cs", source);
    let runs: Vec<Vec<String>> = file
        .doc_units()
        .iter()
        .filter(|u| u.symbol.name == "Run")
        .map(|u| u.symbol.parameter_types.clone())
        .collect();
    assert_eq!(runs[0], vec!["Int32".to_string()]);
    assert_eq!(
        runs[1],
        vec!["System.Int32".to_string(), "System.String".to_string()]
    );

    let file = parse_cs(
        "Global.cs",
        "global using System;\nnamespace Acme;\npublic class C { public void Run(Int32? value) { } }\n",
    );
    assert_eq!(
        find_symbol(&file, "Run").symbol.parameter_types,
        vec!["System.Nullable{System.Int32}".to_string()]
    );
}

#[test]
fn test_imports_system_directive_forms() {
    assert!(imports_system("using System;"));
    assert!(imports_system("global using System ;"));
    assert!(imports_system("using global::System;"));
    assert!(!imports_system("using System.Collections;"));
    assert!(!imports_system("using static System.Math;"));
    assert!(!imports_system("using Sys = System;"));
}
