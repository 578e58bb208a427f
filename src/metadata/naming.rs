//! Canonical names for types and methods.
//!
//! Decoded metadata carries no identifier that survives the rebuild into the code model, so
//! every cross-reference (call target, field access, declaring type) is matched by the
//! strings produced here. Definitions and references implement the same declaration traits,
//! which guarantees that both sides of a lookup are rendered by the same rules.
//!
//! # Type names
//!
//! - A nested type renders as `Outer+Inner`, where `Outer` is the canonical name of the
//!   enclosing type and `Inner` the raw name of the nested type.
//! - A generic type renders as `Base<P1,P2>`; the arity marker (`` `2 ``) is stripped.
//! - Every other type renders as its raw name.
//!
//! # Method names
//!
//! Methods render as `Name(T1, T2)` using the full type names of their parameters. Return
//! types and generic constraints do not take part, so overloads that only differ there
//! collide on purpose.
//!
//! # Examples
//!
//! ```rust
//! use cilgraph::metadata::{naming, raw::RawTypeRef};
//!
//! let dictionary = RawTypeRef::new("System.Collections.Generic", "Dictionary`2")
//!     .with_generic_params(["TKey", "TValue"]);
//! assert_eq!(naming::type_name(&dictionary), "Dictionary<TKey,TValue>");
//!
//! let entry = RawTypeRef::new("", "Entry").nested_in(dictionary);
//! assert_eq!(naming::type_name(&entry), "Dictionary<TKey,TValue>+Entry");
//! assert_eq!(naming::namespace_name(&entry), "System.Collections.Generic");
//! ```

/// Namespace name used for types that are declared without a namespace.
pub const NO_NAMESPACE: &str = "-";

/// Marker that separates a generic type's base name from its arity.
pub const ARITY_MARKER: char = '`';

/// Separator between an enclosing type and a nested type.
pub const NESTED_SEPARATOR: char = '+';

/// The parts of a type declaration that take part in its canonical name.
///
/// Implemented by raw type definitions as well as raw type references.
pub trait TypeDeclaration {
    /// The raw name, including a possible arity marker
    fn name(&self) -> &str;

    /// The declared namespace, empty for nested types and global types
    fn namespace(&self) -> &str;

    /// Names of the declared generic parameters
    fn generic_params(&self) -> &[String];

    /// `true` if the declaration is flagged as nested
    fn is_nested(&self) -> bool;

    /// The enclosing type of a nested declaration
    fn declaring_type(&self) -> Option<&dyn TypeDeclaration>;
}

/// The parts of a method declaration that take part in its canonical name.
pub trait MethodDeclaration {
    /// The raw method name (`.ctor`, `get_Value`, `Run`, ...)
    fn name(&self) -> &str;

    /// Full type names of the parameters in declaration order
    fn parameter_types(&self) -> &[String];
}

/// The direct parent of `decl`, if `decl` is a nested declaration with a known parent.
fn enclosing(decl: &dyn TypeDeclaration) -> Option<&dyn TypeDeclaration> {
    if decl.is_nested() {
        decl.declaring_type()
    } else {
        None
    }
}

/// Removes the arity marker and everything after it (`List`1` becomes `List`).
#[must_use]
pub fn strip_arity(name: &str) -> &str {
    match name.find(ARITY_MARKER) {
        Some(position) => &name[..position],
        None => name,
    }
}

/// Renders a top-level declaration: `Base<P1,P2>` for generic types, the raw name otherwise.
fn outermost_name(decl: &dyn TypeDeclaration) -> String {
    let params = decl.generic_params();
    if params.is_empty() {
        decl.name().to_string()
    } else {
        format!("{}<{}>", strip_arity(decl.name()), params.join(","))
    }
}

/// Computes the canonical display name of a type.
///
/// The chain of enclosing types is walked iteratively, so arbitrarily deep nesting does not
/// grow the call stack.
#[must_use]
pub fn type_name(decl: &dyn TypeDeclaration) -> String {
    let mut chain = vec![decl];
    let mut current = decl;
    while let Some(parent) = enclosing(current) {
        chain.push(parent);
        current = parent;
    }

    let mut name = outermost_name(current);
    for nested in chain.iter().rev().skip(1) {
        name.push(NESTED_SEPARATOR);
        name.push_str(nested.name());
    }
    name
}

/// Computes the namespace a type belongs to.
///
/// Nested types take the namespace of their outermost enclosing type. Types without a
/// namespace map to [`NO_NAMESPACE`].
#[must_use]
pub fn namespace_name(decl: &dyn TypeDeclaration) -> &str {
    let mut current = decl;
    while let Some(parent) = enclosing(current) {
        current = parent;
    }

    if current.namespace().is_empty() {
        NO_NAMESPACE
    } else {
        current.namespace()
    }
}

/// Joins a namespace name and a canonical type name into the model-wide lookup key.
#[must_use]
pub fn join_fullname(namespace: &str, name: &str) -> String {
    format!("{namespace}.{name}")
}

/// The fully qualified lookup key of a type, `namespace.canonical-name`.
#[must_use]
pub fn fullname(decl: &dyn TypeDeclaration) -> String {
    join_fullname(namespace_name(decl), &type_name(decl))
}

/// Computes the canonical signature name of a method, `Name(T1, T2)`.
#[must_use]
pub fn method_name(decl: &dyn MethodDeclaration) -> String {
    format!("{}({})", decl.name(), decl.parameter_types().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::raw::{RawMethodRef, RawTypeDef, RawTypeRef};

    #[test]
    fn test_plain_type_name() {
        let decl = RawTypeRef::new("Acme.Core", "Widget");
        assert_eq!(type_name(&decl), "Widget");
        assert_eq!(namespace_name(&decl), "Acme.Core");
        assert_eq!(fullname(&decl), "Acme.Core.Widget");
    }

    #[test]
    fn test_generic_type_name() {
        let decl = RawTypeRef::new("Acme", "Foo`2").with_generic_params(["K", "V"]);
        assert_eq!(type_name(&decl), "Foo<K,V>");
    }

    #[test]
    fn test_arity_marker_without_params_is_kept() {
        let decl = RawTypeRef::new("Acme", "Foo`2");
        assert_eq!(type_name(&decl), "Foo`2");
    }

    #[test]
    fn test_nested_type_name() {
        let outer = RawTypeRef::new("Acme", "Outer");
        let inner = RawTypeRef::new("", "Inner").nested_in(outer.clone());
        let innermost = RawTypeRef::new("", "Deep").nested_in(inner.clone());

        assert_eq!(type_name(&inner), "Outer+Inner");
        assert_eq!(type_name(&innermost), "Outer+Inner+Deep");
        assert_eq!(namespace_name(&innermost), "Acme");
        assert_eq!(fullname(&innermost), "Acme.Outer+Inner+Deep");
    }

    #[test]
    fn test_nested_in_generic_keeps_raw_name() {
        let outer = RawTypeRef::new("Acme", "Cache`1").with_generic_params(["T"]);
        let inner = RawTypeRef::new("", "Node`1")
            .with_generic_params(["T"])
            .nested_in(outer);

        assert_eq!(type_name(&inner), "Cache<T>+Node`1");
    }

    #[test]
    fn test_nested_flag_without_parent() {
        let mut decl = RawTypeDef::new("", "Orphan");
        decl.flags = crate::metadata::raw::TypeAttributes::NESTED_PRIVATE;

        assert_eq!(type_name(&decl), "Orphan");
        assert_eq!(namespace_name(&decl), NO_NAMESPACE);
    }

    #[test]
    fn test_empty_namespace_sentinel() {
        let decl = RawTypeRef::new("", "Program");
        assert_eq!(namespace_name(&decl), "-");
        assert_eq!(fullname(&decl), "-.Program");
    }

    #[test]
    fn test_method_names() {
        let owner = RawTypeRef::new("Acme", "Widget");

        let no_params = RawMethodRef::new(owner.clone(), "Run", Vec::<String>::new());
        assert_eq!(method_name(&no_params), "Run()");

        let two_params = RawMethodRef::new(owner, "Name", ["int", "string"]);
        assert_eq!(method_name(&two_params), "Name(int, string)");
    }

    #[test]
    fn test_strip_arity() {
        assert_eq!(strip_arity("List`1"), "List");
        assert_eq!(strip_arity("Plain"), "Plain");
        assert_eq!(strip_arity("`3"), "");
    }
}
