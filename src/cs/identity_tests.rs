use super::*;
use crate::test_utils::parse_cs;

fn identities(source: &str) -> Vec<String> {
    let file = parse_cs("Test.cs", source);
    file.doc_units()
        .iter()
        .filter_map(|u| identity(u.symbol).ok())
        .collect()
}

#[test]
fn test_type_identities_include_arity() {
    let ids = identities(
        r#"namespace Acme
{
    public class Box { }
    public class Box<T> { public class Lid { } }
}
"#,
    );
    assert_eq!(ids, vec!["Acme.Box", "Acme.Box`1", "Acme.Box`1.Lid"]);
}

#[test]
fn test_overloads_are_distinct() {
    let ids = identities(
        r#"namespace Acme
{
    public class Worker
    {
        public void Method() { }
        public void Method(int value) { }
        public void Method(int value, List<string> names) { }
        public static void Method(string value) { }
    }
}
"#,
    );
    assert_eq!(
        ids,
        vec![
            "Acme.Worker",
            "Acme.Worker.Method()",
            "Acme.Worker.Method(System.Int32)",
            "Acme.Worker.Method(System.Int32,List{System.String})",
            "static:Acme.Worker.Method(System.String)",
        ]
    );
}

#[test]
fn test_method_arity_is_in_name() {
    let ids = identities(
        r#"public class Mapper<T>
{
    public void Map<TOut>(T source, TOut[] target, int* raw) { }
}
"#,
    );
    assert_eq!(ids[1], "Mapper`1.Map``1(`0,``0[],System.Int32*)");
}

#[test]
fn test_member_identities() {
    let ids = identities(
        r#"public class Money
{
    public int Cents;
    public string Name { get; set; }
    public event Action Changed;
    public Money(int cents) { }
    public int this[int index] => index;
    public static implicit operator long(Money m) => 0;
    public static explicit operator int(Money m) => 0;
}
"#,
    );
    assert_eq!(
        ids,
        vec![
            "Money",
            "Money.Cents",
            "Money.Name",
            "Money.Changed",
            "Money..ctor(System.Int32)",
            "Money.Item(System.Int32)",
            "static:Money.op_Implicit(Money)~System.Int64",
            "static:Money.op_Explicit(Money)~System.Int32",
        ]
    );
}

#[test]
fn test_identity_is_stable_across_spellings() {
    let first = identities("public class A { public void F(System.Int32 x, global::Acme.Thing t) { } }");
    let second = identities("public class A { public void F(int x, Acme.Thing t) { } }");
    assert_eq!(first, second);
}

#[test]
fn test_local_function_is_unnameable() {
    let file = parse_cs("Program.cs", "int Add(int a, int b) => a + b;\n");
    let units = file.doc_units();
    let local = units
        .iter()
        .find(|u| u.symbol.kind == SymbolKind::LocalFunction)
        .expect("local function");
    let error = identity(local.symbol).unwrap_err();
    assert!(matches!(error, DocSyncError::UnnameableSymbol { .. }));
}

#[test]
fn test_member_without_containing_type_is_unnameable() {
    let symbol = Symbol::new(SymbolKind::Method, "Orphan");
    assert!(matches!(
        identity(&symbol),
        Err(DocSyncError::UnnameableSymbol { .. })
    ));
}

#[test]
fn test_signatures_match() {
    let mut a = Symbol::new(SymbolKind::Method, "Run");
    a.containing_type = Some("Acme.Worker".to_string());
    a.parameter_types = vec!["System.Int32".to_string()];
    let mut b = a.clone();
    assert!(signatures_match(&a, &b));

    b.parameter_types = vec!["System.String".to_string()];
    assert!(!signatures_match(&a, &b));

    b.parameter_types = a.parameter_types.clone();
    b.modifiers.push("static".to_string());
    assert!(!signatures_match(&a, &b));
}
