use super::*;
use crate::test_utils::parse_cs;

#[test]
fn test_partial_fragments_share_one_entry() {
    let first = parse_cs(
        "Widget.cs",
        "namespace Acme\n{\n    public partial class Widget { }\n}\n",
    );
    let second = parse_cs(
        "Widget.Events.cs",
        "namespace Acme\n{\n    partial class Widget { }\n}\n",
    );
    let entries = build_catalog(&[first, second]);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "Acme.Widget");
    assert_eq!(entries[0].kind, SymbolKind::Class);
    assert_eq!(
        entries[0].relative_file_paths,
        vec![PathBuf::from("Widget.cs"), PathBuf::from("Widget.Events.cs")]
    );
}

#[test]
fn test_visibility_filtering() {
    let source = r#"namespace Acme
{
    public class Visible
    {
        public class PublicNested { }
        protected class ProtectedNested { }
        private class PrivateNested { }
        internal class InternalNested { }
    }

    public sealed class Closed
    {
        protected class Unreachable { }
    }

    class Hidden
    {
        public class InsideHidden { }
    }

    public enum Mode { A }
    public delegate void Callback(int value);
    public interface IRunner { }
    public struct Point { }
}
"#;
    let entries = build_catalog(&[parse_cs("Types.cs", source)]);
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "Acme.Visible",
            "Acme.Visible.PublicNested",
            "Acme.Visible.ProtectedNested",
            "Acme.Closed",
            "Acme.Mode",
            "Acme.Callback",
            "Acme.IRunner",
            "Acme.Point",
        ]
    );

    let nested = &entries[1];
    assert_eq!(nested.parent_id, "Acme.Visible");
    let callback = entries.iter().find(|e| e.id == "Acme.Callback").unwrap();
    assert_eq!(callback.kind, SymbolKind::Delegate);
}

#[test]
fn test_partial_accessibility_comes_from_any_fragment() {
    // Only the second fragment spells the accessibility
    let first = parse_cs("A.cs", "partial class Widget { }\n");
    let second = parse_cs("B.cs", "public partial class Widget { }\n");
    let entries = build_catalog(&[first, second]);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "Widget");
}

#[test]
fn test_generic_display_name_and_identity() {
    let file = parse_cs("Box.cs", "public class Box<T> { }\npublic class Box { }\n");
    let entries = build_catalog(&[file]);
    assert_eq!(entries[0].id, "Box`1");
    assert_eq!(entries[0].name, "Box<T>");
    assert_eq!(entries[1].id, "Box");
}

#[test]
fn test_member_visibility() {
    let source = r#"public class Base
{
    public void Open() { }
    protected void Guarded() { }
    private void Secret() { }
    internal void Local() { }
    protected internal void Shared() { }
    void IDisposable.Dispose() { }
}
public struct Value
{
    public int A;
    int b;
}
"#;
    let file = parse_cs("Base.cs", source);
    let index = TypeIndex::build(std::slice::from_ref(&file));
    let documented: Vec<String> = file
        .doc_units()
        .iter()
        .filter(|u| !u.symbol.kind.is_type() && index.is_member_documentable(u.symbol))
        .map(|u| u.symbol.name.clone())
        .collect();
    assert_eq!(
        documented,
        vec!["Open", "Guarded", "Shared", "IDisposable.Dispose", "A"]
    );
}

#[test]
fn test_manifest_document() {
    let entries = vec![TypeManifestEntry {
        id: "Acme.Widget".to_string(),
        parent_id: String::new(),
        name: "Widget".to_string(),
        kind: SymbolKind::Class,
        namespace: "Acme".to_string(),
        relative_file_paths: vec![PathBuf::from("Widget.cs")],
    }];
    let xml = write_manifest(&entries).unwrap();
    let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<doc version="1">
  <types>
    <type id="Acme.Widget" parentId="" name="Widget" kind="Class" namespace="Acme">
      <relativeFilePaths>
        <path value="Widget.cs"/>
      </relativeFilePaths>
    </type>
  </types>
</doc>
"#;
    assert_eq!(xml, expected);
}

#[test]
fn test_catalog_is_deterministic() {
    let source = "namespace A { public class X { } public class Y { } }\n";
    let first = build_catalog(&[parse_cs("One.cs", source)]);
    let second = build_catalog(&[parse_cs("One.cs", source)]);
    assert_eq!(
        write_manifest(&first).unwrap(),
        write_manifest(&second).unwrap()
    );
}

#[test]
fn test_types_nested_in_interfaces_default_to_public() {
    let source = r#"public interface IOuter
{
    class Nested { }
    private class Hidden { }
}
public class Outer
{
    class Private { }
}
"#;
    let entries = build_catalog(&[parse_cs("Outer.cs", source)]);
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["IOuter", "IOuter.Nested", "Outer"]);
    assert_eq!(entries[1].parent_id, "IOuter");
}
