//! Canonical identities for documentable declarations
//!
//! An identity names one logical declaration. Partial fragments of a type
//! share it, overloads never do. The extraction pass and the injection pass
//! both go through [`identity`], which is what keeps them symmetric.

use super::error::{DocSyncError, SyncResult};
use super::symbols::{Symbol, SymbolKind};

/// Marker placed in front of static overloadable member identities
pub const STATIC_MARKER: &str = "static:";

/// Identity of a type from its parts
pub fn type_identity(
    containing_type: Option<&str>,
    namespace: &str,
    name: &str,
    arity: usize,
) -> String {
    let own = type_metadata_name(name, arity);
    match containing_type {
        Some(parent) => format!("{}.{}", parent, own),
        None if namespace.is_empty() => own,
        None => format!("{}.{}", namespace, own),
    }
}

fn type_metadata_name(name: &str, arity: usize) -> String {
    if arity > 0 {
        format!("{}`{}", name, arity)
    } else {
        name.to_string()
    }
}

/// Name of a symbol including its generic arity suffix
///
/// Types use a single backtick (`Box`1`), methods a double one (`Map``1`).
pub fn metadata_name(symbol: &Symbol) -> String {
    if symbol.kind.is_type() {
        type_metadata_name(&symbol.name, symbol.arity)
    } else if symbol.arity > 0 {
        format!("{}``{}", symbol.name, symbol.arity)
    } else {
        symbol.name.clone()
    }
}

/// Identity without the signature part: the containing type plus the
/// metadata name. Overloads share their lookup key.
pub fn lookup_key(symbol: &Symbol) -> SyncResult<String> {
    if symbol.kind == SymbolKind::LocalFunction {
        return Err(unnameable(symbol));
    }
    if symbol.kind.is_type() {
        return Ok(type_identity(
            symbol.containing_type.as_deref(),
            &symbol.namespace,
            &symbol.name,
            symbol.arity,
        ));
    }
    let Some(containing_type) = symbol.containing_type.as_deref() else {
        return Err(unnameable(symbol));
    };
    Ok(format!("{}.{}", containing_type, metadata_name(symbol)))
}

/// Compute the canonical identity of a symbol
pub fn identity(symbol: &Symbol) -> SyncResult<String> {
    let key = lookup_key(symbol)?;
    if !symbol.kind.is_overloadable() {
        return Ok(key);
    }

    let mut result = String::new();
    if symbol.is_static() {
        result.push_str(STATIC_MARKER);
    }
    result.push_str(&key);
    result.push('(');
    result.push_str(&symbol.parameter_types.join(","));
    result.push(')');
    if symbol.kind == SymbolKind::Conversion {
        result.push('~');
        result.push_str(symbol.return_type.as_deref().unwrap_or_default());
    }
    Ok(result)
}

/// Whether two symbols sharing a lookup key are the same overload
pub fn signatures_match(a: &Symbol, b: &Symbol) -> bool {
    if !a.kind.is_overloadable() && !b.kind.is_overloadable() {
        return true;
    }
    a.parameter_types == b.parameter_types
        && a.is_static() == b.is_static()
        && (a.kind != SymbolKind::Conversion || a.return_type == b.return_type)
}

fn unnameable(symbol: &Symbol) -> DocSyncError {
    DocSyncError::UnnameableSymbol {
        kind: symbol.kind.as_str().to_string(),
        name: symbol.name.clone(),
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
