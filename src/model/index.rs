//! Canonical-name index over all types of a module.
//!
//! Every cross-reference in the code model is resolved by name: declaring types of fields
//! and methods, call targets and event types. The [`TypeIndex`] is built once while the type
//! skeleton is created and answers those lookups in logarithmic time instead of scanning
//! every namespace.
//!
//! # Index layout
//!
//! - **Fullname index**: `Namespace.CanonicalName` to type, ordered, unique
//! - **Name index**: canonical name to all types carrying it, in registration order
//!
//! # Thread Safety
//!
//! Both indices are concurrent maps; lookups never block each other, which lets the member
//! and usage stages resolve references from many worker threads.

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    metadata::naming::{self, TypeDeclaration},
    model::TypeRc,
    Error::DuplicateType,
    Result,
};

/// Canonical-name index over all types of a module.
pub struct TypeIndex {
    /// Primary index: fullname to type, ordered for deterministic iteration
    by_fullname: SkipMap<String, TypeRc>,
    /// Secondary index: canonical name to types in registration order
    by_name: DashMap<String, Vec<TypeRc>>,
}

impl TypeIndex {
    pub(crate) fn new() -> Self {
        TypeIndex {
            by_fullname: SkipMap::new(),
            by_name: DashMap::new(),
        }
    }

    /// Register a type under its fullname and canonical name.
    ///
    /// # Errors
    /// Returns [`crate::Error::DuplicateType`] if another type already uses the fullname.
    pub(crate) fn insert(&self, type_rc: &TypeRc) -> Result<()> {
        let fullname = type_rc.fullname();
        let entry = self.by_fullname.get_or_insert(fullname.clone(), type_rc.clone());
        if !std::sync::Arc::ptr_eq(entry.value(), type_rc) {
            return Err(DuplicateType(fullname));
        }

        self.by_name
            .entry(type_rc.name.clone())
            .or_default()
            .push(type_rc.clone());
        Ok(())
    }

    /// Look up a type by fullname (`Namespace.CanonicalName`)
    #[must_use]
    pub fn get(&self, fullname: &str) -> Option<TypeRc> {
        self.by_fullname
            .get(fullname)
            .map(|entry| entry.value().clone())
    }

    /// Resolve a raw declaration to the type of the module carrying the same fullname.
    ///
    /// Returns `None` for declarations outside the analyzed module.
    #[must_use]
    pub fn resolve(&self, decl: &dyn TypeDeclaration) -> Option<TypeRc> {
        self.get(&naming::fullname(decl))
    }

    /// The first registered type whose canonical name equals `name`, in any namespace
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<TypeRc> {
        self.by_name
            .get(name)
            .and_then(|types| types.first().cloned())
    }

    /// All types whose canonical name equals `name`, in registration order
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Vec<TypeRc> {
        self.by_name
            .get(name)
            .map(|types| types.value().clone())
            .unwrap_or_default()
    }

    /// Iterate over all types ordered by fullname
    pub fn iter(&self) -> impl Iterator<Item = TypeRc> + '_ {
        self.by_fullname.iter().map(|entry| entry.value().clone())
    }

    /// Number of indexed types
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_fullname.len()
    }

    /// `true` if no type has been indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_fullname.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        metadata::raw::RawTypeRef,
        model::{Module, Namespace, Type},
        Error,
    };

    fn new_type(namespace: &Arc<Namespace>, name: &str) -> TypeRc {
        Arc::new(Type::new(name.to_string(), name, namespace, None))
    }

    #[test]
    fn test_insert_and_resolve() {
        let acme = Module::new("Acme.dll").namespace_or_insert("Acme");
        let widget = new_type(&acme, "Widget");

        let index = TypeIndex::new();
        assert!(index.is_empty());
        index.insert(&widget).unwrap();

        assert_eq!(index.len(), 1);
        assert!(Arc::ptr_eq(&index.get("Acme.Widget").unwrap(), &widget));
        assert!(index
            .resolve(&RawTypeRef::new("Acme", "Widget"))
            .is_some_and(|found| Arc::ptr_eq(&found, &widget)));
        assert!(index.resolve(&RawTypeRef::new("Other", "Widget")).is_none());
    }

    #[test]
    fn test_duplicate_fullname() {
        let acme = Module::new("Acme.dll").namespace_or_insert("Acme");
        let index = TypeIndex::new();
        index.insert(&new_type(&acme, "Widget")).unwrap();

        let result = index.insert(&new_type(&acme, "Widget"));
        assert!(matches!(result, Err(Error::DuplicateType(name)) if name == "Acme.Widget"));
        assert_eq!(index.get_by_name("Widget").len(), 1);
    }

    #[test]
    fn test_name_lookup_prefers_first_registered() {
        let first_ns = Module::new("Acme.dll").namespace_or_insert("First");
        let second_ns = Module::new("Acme.dll").namespace_or_insert("Second");
        let first = new_type(&first_ns, "Changed");
        let second = new_type(&second_ns, "Changed");

        let index = TypeIndex::new();
        index.insert(&first).unwrap();
        index.insert(&second).unwrap();

        assert!(Arc::ptr_eq(&index.find_by_name("Changed").unwrap(), &first));
        assert_eq!(index.get_by_name("Changed").len(), 2);
        assert!(index.find_by_name("Missing").is_none());
    }

    #[test]
    fn test_iteration_is_ordered() {
        let acme = Module::new("Acme.dll").namespace_or_insert("Acme");
        let index = TypeIndex::new();
        for name in ["Zeta", "Alpha", "Mu"] {
            index.insert(&new_type(&acme, name)).unwrap();
        }

        let names: Vec<String> = index.iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, ["Alpha", "Mu", "Zeta"]);
    }
}
