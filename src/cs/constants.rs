//! Tree-sitter node kind constants for C# parsing
//!
//! This module contains string constants for the tree-sitter node kinds and
//! field names the declaration walker relies on, plus the C# spellings the
//! identity resolver needs.

// Containers

/// Tree-sitter node kind for block namespace declarations
///
/// Example: `namespace MyNamespace { ... }`
pub const NAMESPACE_DECLARATION: &str = "namespace_declaration";

/// Tree-sitter node kind for file scoped namespace declarations
///
/// Example: `namespace MyNamespace;`
pub const FILE_SCOPED_NAMESPACE_DECLARATION: &str = "file_scoped_namespace_declaration";

/// Tree-sitter node kind for using directives
///
/// Example: `using System;`
pub const USING_DIRECTIVE: &str = "using_directive";

/// Tree-sitter node kind for declaration lists (type and namespace bodies)
pub const DECLARATION_LIST: &str = "declaration_list";

/// Tree-sitter node kind for the body of an enum
pub const ENUM_MEMBER_DECLARATION_LIST: &str = "enum_member_declaration_list";

/// Tree-sitter node kind for top level statements
pub const GLOBAL_STATEMENT: &str = "global_statement";

/// Tree-sitter node kinds for structured preprocessor blocks
pub const PREPROC_IF: &str = "preproc_if";
pub const PREPROC_ELIF: &str = "preproc_elif";
pub const PREPROC_ELSE: &str = "preproc_else";

// Type declarations

/// Example: `public class MyClass { ... }`
pub const CLASS_DECLARATION: &str = "class_declaration";

/// Example: `public interface IMyInterface { ... }`
pub const INTERFACE_DECLARATION: &str = "interface_declaration";

/// Example: `public struct MyStruct { ... }`
pub const STRUCT_DECLARATION: &str = "struct_declaration";

/// Example: `public enum MyEnum { ... }`
pub const ENUM_DECLARATION: &str = "enum_declaration";

/// Example: `public record Point(int X, int Y);`
pub const RECORD_DECLARATION: &str = "record_declaration";

/// Example: `public record struct Point(int X, int Y);` (older grammars)
pub const RECORD_STRUCT_DECLARATION: &str = "record_struct_declaration";

/// Example: `public delegate void Handler(int value);`
pub const DELEGATE_DECLARATION: &str = "delegate_declaration";

// Member declarations

/// Example: `public void MyMethod() { ... }`
pub const METHOD_DECLARATION: &str = "method_declaration";

/// Example: `public MyClass() { ... }`
pub const CONSTRUCTOR_DECLARATION: &str = "constructor_declaration";

/// Example: `~MyClass() { ... }`
pub const DESTRUCTOR_DECLARATION: &str = "destructor_declaration";

/// Example: `public static Vector operator +(Vector a, Vector b) { ... }`
pub const OPERATOR_DECLARATION: &str = "operator_declaration";

/// Example: `public static implicit operator int(Meters m) { ... }`
pub const CONVERSION_OPERATOR_DECLARATION: &str = "conversion_operator_declaration";

/// Example: `public string MyProperty { get; set; }`
pub const PROPERTY_DECLARATION: &str = "property_declaration";

/// Example: `public int this[int index] { get; }`
pub const INDEXER_DECLARATION: &str = "indexer_declaration";

/// Example: `public event Action Changed { add { } remove { } }`
pub const EVENT_DECLARATION: &str = "event_declaration";

/// Example: `public event Action Changed;`
pub const EVENT_FIELD_DECLARATION: &str = "event_field_declaration";

/// Example: `private int myField;`
pub const FIELD_DECLARATION: &str = "field_declaration";

/// Example: `Red = 1` inside an enum body
pub const ENUM_MEMBER_DECLARATION: &str = "enum_member_declaration";

/// Example: `void Helper() { }` as a top level statement
pub const LOCAL_FUNCTION_STATEMENT: &str = "local_function_statement";

// Declaration parts

/// Tree-sitter node kind for variable declarations
///
/// Example: `int x, y`
pub const VARIABLE_DECLARATION: &str = "variable_declaration";

/// Tree-sitter node kind for variable declarators
///
/// Example: `x = 5` in `int x = 5;`
pub const VARIABLE_DECLARATOR: &str = "variable_declarator";

/// Tree-sitter node kind for modifier keywords
///
/// Example: `public`, `private`, `static`, etc.
pub const MODIFIER: &str = "modifier";

pub const ATTRIBUTE_LIST: &str = "attribute_list";
pub const ATTRIBUTE: &str = "attribute";
pub const ATTRIBUTE_ARGUMENT_LIST: &str = "attribute_argument_list";
pub const ATTRIBUTE_ARGUMENT: &str = "attribute_argument";
pub const ATTRIBUTE_TARGET_SPECIFIER: &str = "attribute_target_specifier";

pub const TYPE_PARAMETER_LIST: &str = "type_parameter_list";
pub const TYPE_PARAMETER: &str = "type_parameter";
pub const TYPE_PARAMETER_CONSTRAINTS_CLAUSE: &str = "type_parameter_constraints_clause";

pub const PARAMETER_LIST: &str = "parameter_list";
pub const BRACKETED_PARAMETER_LIST: &str = "bracketed_parameter_list";

/// Example: `int value` in `void Method(int value)`
pub const PARAMETER: &str = "parameter";

/// Example: `= 5` in `int value = 5`
pub const EQUALS_VALUE_CLAUSE: &str = "equals_value_clause";

/// Example: `: Base, IDisposable`
pub const BASE_LIST: &str = "base_list";

/// Example: `IDisposable.` in `void IDisposable.Dispose()`
pub const EXPLICIT_INTERFACE_SPECIFIER: &str = "explicit_interface_specifier";

pub const ARGUMENT_LIST: &str = "argument_list";

/// Tree-sitter node kind for simple identifiers
///
/// Example: `MyClass`, `myVariable`
pub const IDENTIFIER: &str = "identifier";

/// Tree-sitter node kind for comments
///
/// Example: `// comment` or `/* comment */`
pub const COMMENT: &str = "comment";

// Field names

/// Used with `node.child_by_field_name(NAME_FIELD)`
pub const NAME_FIELD: &str = "name";

/// Used with `node.child_by_field_name(BODY_FIELD)`
pub const BODY_FIELD: &str = "body";

/// Used with `node.child_by_field_name(TYPE_FIELD)`
pub const TYPE_FIELD: &str = "type";

/// Return type field of methods in recent grammars
pub const RETURNS_FIELD: &str = "returns";

/// Used with `node.child_by_field_name(PARAMETERS_FIELD)`
pub const PARAMETERS_FIELD: &str = "parameters";

pub const OPERATOR_FIELD: &str = "operator";
pub const VALUE_FIELD: &str = "value";
pub const CONDITION_FIELD: &str = "condition";
pub const ALTERNATIVE_FIELD: &str = "alternative";

// Keywords and markers

pub const PUBLIC_MODIFIER: &str = "public";
pub const PROTECTED_MODIFIER: &str = "protected";
pub const INTERNAL_MODIFIER: &str = "internal";
pub const PRIVATE_MODIFIER: &str = "private";
pub const STATIC_MODIFIER: &str = "static";
pub const SEALED_MODIFIER: &str = "sealed";
pub const ABSTRACT_MODIFIER: &str = "abstract";
pub const VIRTUAL_MODIFIER: &str = "virtual";
pub const OVERRIDE_MODIFIER: &str = "override";
pub const READONLY_MODIFIER: &str = "readonly";
pub const CONST_MODIFIER: &str = "const";

/// Parameter modifiers that take part in the signature
pub const REF_MODIFIER: &str = "ref";
pub const OUT_MODIFIER: &str = "out";
pub const IN_MODIFIER: &str = "in";

/// Parameter modifiers that do not change the signature
pub const PARAMS_MODIFIER: &str = "params";
pub const THIS_MODIFIER: &str = "this";
pub const SCOPED_MODIFIER: &str = "scoped";

/// File extension for C# source files
pub const CS_EXTENSION: &str = "cs";

/// Prefix for XML documentation comments
pub const XML_DOC_COMMENT_PREFIX: &str = "///";

/// Metadata names of special members
pub const CONSTRUCTOR_NAME: &str = ".ctor";
pub const STATIC_CONSTRUCTOR_NAME: &str = ".cctor";
pub const DESTRUCTOR_NAME: &str = "Finalize";
pub const INDEXER_NAME: &str = "Item";
pub const IMPLICIT_CONVERSION_NAME: &str = "op_Implicit";
pub const EXPLICIT_CONVERSION_NAME: &str = "op_Explicit";

// C# System type constants

/// Fully qualified name for System.Int32
pub const SYSTEM_INT32_TYPE: &str = "System.Int32";
pub const SYSTEM_STRING_TYPE: &str = "System.String";
pub const SYSTEM_BOOLEAN_TYPE: &str = "System.Boolean";
pub const SYSTEM_DOUBLE_TYPE: &str = "System.Double";
pub const SYSTEM_SINGLE_TYPE: &str = "System.Single";
pub const SYSTEM_INT64_TYPE: &str = "System.Int64";
pub const SYSTEM_INT16_TYPE: &str = "System.Int16";
pub const SYSTEM_BYTE_TYPE: &str = "System.Byte";
pub const SYSTEM_OBJECT_TYPE: &str = "System.Object";
pub const SYSTEM_SBYTE_TYPE: &str = "System.SByte";
pub const SYSTEM_UINT16_TYPE: &str = "System.UInt16";
pub const SYSTEM_UINT32_TYPE: &str = "System.UInt32";
pub const SYSTEM_UINT64_TYPE: &str = "System.UInt64";
pub const SYSTEM_CHAR_TYPE: &str = "System.Char";
pub const SYSTEM_DECIMAL_TYPE: &str = "System.Decimal";
pub const SYSTEM_INTPTR_TYPE: &str = "System.IntPtr";
pub const SYSTEM_UINTPTR_TYPE: &str = "System.UIntPtr";
pub const SYSTEM_VOID_TYPE: &str = "System.Void";
pub const SYSTEM_TYPE_TYPE: &str = "System.Type";
pub const SYSTEM_NULLABLE_TYPE: &str = "System.Nullable";
pub const SYSTEM_VALUE_TUPLE_TYPE: &str = "System.ValueTuple";

/// C# keyword aliases and the System types they stand for.
/// The flag tells whether the type is a value type (so `T?` means `Nullable<T>`).
pub const PREDEFINED_TYPES: &[(&str, &str, bool)] = &[
    ("bool", SYSTEM_BOOLEAN_TYPE, true),
    ("byte", SYSTEM_BYTE_TYPE, true),
    ("sbyte", SYSTEM_SBYTE_TYPE, true),
    ("char", SYSTEM_CHAR_TYPE, true),
    ("decimal", SYSTEM_DECIMAL_TYPE, true),
    ("double", SYSTEM_DOUBLE_TYPE, true),
    ("float", SYSTEM_SINGLE_TYPE, true),
    ("int", SYSTEM_INT32_TYPE, true),
    ("uint", SYSTEM_UINT32_TYPE, true),
    ("long", SYSTEM_INT64_TYPE, true),
    ("ulong", SYSTEM_UINT64_TYPE, true),
    ("short", SYSTEM_INT16_TYPE, true),
    ("ushort", SYSTEM_UINT16_TYPE, true),
    ("nint", SYSTEM_INTPTR_TYPE, true),
    ("nuint", SYSTEM_UINTPTR_TYPE, true),
    ("object", SYSTEM_OBJECT_TYPE, false),
    ("string", SYSTEM_STRING_TYPE, false),
    ("void", SYSTEM_VOID_TYPE, false),
    ("dynamic", SYSTEM_OBJECT_TYPE, false),
];

/// Operator tokens and their metadata names, as (token, unary name, binary name)
pub const OPERATOR_NAMES: &[(&str, &str, &str)] = &[
    ("+", "op_UnaryPlus", "op_Addition"),
    ("-", "op_UnaryNegation", "op_Subtraction"),
    ("*", "op_Multiply", "op_Multiply"),
    ("/", "op_Division", "op_Division"),
    ("%", "op_Modulus", "op_Modulus"),
    ("&", "op_BitwiseAnd", "op_BitwiseAnd"),
    ("|", "op_BitwiseOr", "op_BitwiseOr"),
    ("^", "op_ExclusiveOr", "op_ExclusiveOr"),
    ("<<", "op_LeftShift", "op_LeftShift"),
    (">>", "op_RightShift", "op_RightShift"),
    (">>>", "op_UnsignedRightShift", "op_UnsignedRightShift"),
    ("==", "op_Equality", "op_Equality"),
    ("!=", "op_Inequality", "op_Inequality"),
    ("<", "op_LessThan", "op_LessThan"),
    (">", "op_GreaterThan", "op_GreaterThan"),
    ("<=", "op_LessThanOrEqual", "op_LessThanOrEqual"),
    (">=", "op_GreaterThanOrEqual", "op_GreaterThanOrEqual"),
    ("!", "op_LogicalNot", "op_LogicalNot"),
    ("~", "op_OnesComplement", "op_OnesComplement"),
    ("++", "op_Increment", "op_Increment"),
    ("--", "op_Decrement", "op_Decrement"),
    ("true", "op_True", "op_True"),
    ("false", "op_False", "op_False"),
];
