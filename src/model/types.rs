use std::{fmt, sync::Arc};

use crate::{
    metadata::naming,
    model::{
        EventList, EventRc, FieldList, FieldRc, MethodList, MethodRc, NamespaceRc, NamespaceRef,
    },
};

/// Reference to a [`Type`]
pub type TypeRc = Arc<Type>;
/// A vector that holds a list of [`Type`] references
pub type TypeList = Arc<boxcar::Vec<TypeRc>>;

weak_ref!(
    TypeRef,
    Type,
    TypeRc,
    "A smart, non-owning reference to a [`Type`] (owners, declaring types and usage edges)"
);

/// A type declared in the analyzed module (class, struct, interface or enum).
///
/// The canonical [`Type::name`] is nesting- and generics-aware (`Outer+Inner`,
/// `Map<K,V>`); together with the namespace it forms the [`Type::fullname`] through which
/// every reference to this type is resolved.
pub struct Type {
    /// Canonical display name
    pub name: String,
    /// Name as declared in metadata, including a possible arity marker
    pub raw_name: String,
    /// Name of the namespace this type belongs to
    namespace_name: String,
    /// The namespace this type is listed in
    namespace: NamespaceRef,
    /// Directly enclosing type, set iff this type is nested
    owner: Option<TypeRef>,
    /// Types declared inside this type
    pub nested_types: TypeList,
    /// Fields declared by this type
    pub fields: FieldList,
    /// Events declared by this type
    pub events: EventList,
    /// Methods declared by this type
    pub methods: MethodList,
}

impl Type {
    pub(crate) fn new(
        name: String,
        raw_name: &str,
        namespace: &NamespaceRc,
        owner: Option<&TypeRc>,
    ) -> Self {
        Type {
            name,
            raw_name: raw_name.to_string(),
            namespace_name: namespace.name.clone(),
            namespace: NamespaceRef::new(namespace),
            owner: owner.map(TypeRef::new),
            nested_types: Arc::new(boxcar::Vec::new()),
            fields: Arc::new(boxcar::Vec::new()),
            events: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Name of the namespace this type belongs to
    #[must_use]
    pub fn namespace_name(&self) -> &str {
        &self.namespace_name
    }

    /// The namespace this type is listed in
    #[must_use]
    pub fn namespace(&self) -> Option<NamespaceRc> {
        self.namespace.upgrade()
    }

    /// The directly enclosing type, `None` for top-level types
    #[must_use]
    pub fn owner(&self) -> Option<TypeRc> {
        self.owner.as_ref().and_then(TypeRef::upgrade)
    }

    /// `true` if this type is declared inside another type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.owner.is_some()
    }

    /// The fully qualified name (`Namespace.Name`), unique within a module
    #[must_use]
    pub fn fullname(&self) -> String {
        naming::join_fullname(&self.namespace_name, &self.name)
    }

    /// Find a method by its canonical signature name (`Name(T1, T2)`).
    ///
    /// If several methods share the signature (they only differ by return type), the first
    /// one declared wins.
    #[must_use]
    pub fn find_method(&self, signature: &str) -> Option<MethodRc> {
        self.methods
            .iter()
            .find(|(_, method)| method.name == signature)
            .map(|(_, method)| method.clone())
    }

    /// Find a field by name
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<FieldRc> {
        self.fields
            .iter()
            .find(|(_, field)| field.name == name)
            .map(|(_, field)| field.clone())
    }

    /// Find an event by name
    #[must_use]
    pub fn find_event(&self, name: &str) -> Option<EventRc> {
        self.events
            .iter()
            .find(|(_, event)| event.name == name)
            .map(|(_, event)| event.clone())
    }

    /// Iterate over the directly nested types
    pub fn nested_types(&self) -> impl Iterator<Item = &TypeRc> + '_ {
        self.nested_types.iter().map(|(_, nested)| nested)
    }

    /// Iterate over the fields
    pub fn fields(&self) -> impl Iterator<Item = &FieldRc> + '_ {
        self.fields.iter().map(|(_, field)| field)
    }

    /// Iterate over the events
    pub fn events(&self) -> impl Iterator<Item = &EventRc> + '_ {
        self.events.iter().map(|(_, event)| event)
    }

    /// Iterate over the methods in declaration order
    pub fn methods(&self) -> impl Iterator<Item = &MethodRc> + '_ {
        self.methods.iter().map(|(_, method)| method)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("namespace", &self.namespace_name)
            .field("nested", &self.is_nested())
            .field("nested_types", &self.nested_types.count())
            .field("fields", &self.fields.count())
            .field("events", &self.events.count())
            .field("methods", &self.methods.count())
            .finish()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace_name, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Event, Field, Method, Module};

    #[test]
    fn test_type_lookups() {
        let namespace = Module::new("Acme.dll").namespace_or_insert("Acme");
        let widget = Arc::new(Type::new("Widget".to_string(), "Widget", &namespace, None));

        widget
            .fields
            .push(Arc::new(Field::new("size", &widget, None)));
        widget
            .events
            .push(Arc::new(Event::new("Changed", &widget, None)));
        widget.methods.push(Arc::new(Method::new(
            "Run()".to_string(),
            "Run",
            false,
            &widget,
            None,
        )));

        assert_eq!(widget.fullname(), "Acme.Widget");
        assert_eq!(widget.to_string(), "Acme.Widget");
        assert!(widget.find_field("size").is_some());
        assert!(widget.find_field("missing").is_none());
        assert!(widget.find_event("Changed").is_some());
        assert!(widget.find_method("Run()").is_some());
        assert!(widget.find_method("Run").is_none());
        assert!(!widget.is_nested());
        assert!(widget.owner().is_none());
        assert_eq!(widget.namespace().unwrap().name, "Acme");
    }

    #[test]
    fn test_nested_type_owner() {
        let namespace = Module::new("Acme.dll").namespace_or_insert("Acme");
        let outer = Arc::new(Type::new("Outer".to_string(), "Outer", &namespace, None));
        let inner = Arc::new(Type::new(
            "Outer+Inner".to_string(),
            "Inner",
            &namespace,
            Some(&outer),
        ));
        outer.nested_types.push(inner.clone());

        assert!(inner.is_nested());
        assert!(Arc::ptr_eq(&inner.owner().unwrap(), &outer));
        assert_eq!(outer.nested_types().count(), 1);
        assert_eq!(inner.fullname(), "Acme.Outer+Inner");
    }
}
