use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{
    model::{FieldRc, FieldRef, TypeRc, TypeRef},
    Result,
};

/// Reference to a [`Method`]
pub type MethodRc = Arc<Method>;
/// A vector that holds a list of [`Method`] references
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;

weak_ref!(
    MethodRef,
    Method,
    MethodRc,
    "A smart, non-owning reference to a [`Method`] (method usage edges)"
);

/// Key of a member within the module, `Namespace.Type::member`
fn member_key(owner: Option<TypeRc>, member: &str) -> String {
    match owner {
        Some(owner) => format!("{}::{member}", owner.fullname()),
        None => member.to_string(),
    }
}

/// The usage edges of a single method.
///
/// Each edge set behaves like a set keyed by canonical identity: a type by its fullname, a
/// method or field by its owner's fullname plus its own name. Iteration follows that key
/// order, so two builds over the same input produce identical sequences. Edges are
/// non-owning and may form cycles (two methods using each other).
#[derive(Clone, Default)]
pub struct MethodUses {
    types: BTreeMap<String, TypeRef>,
    methods: BTreeMap<String, MethodRef>,
    fields: BTreeMap<String, FieldRef>,
}

impl MethodUses {
    /// Create an empty set of edges
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a type use, returns `false` if it was already recorded
    pub fn add_type(&mut self, type_rc: &TypeRc) -> bool {
        let key = type_rc.fullname();
        if self.types.contains_key(&key) {
            return false;
        }
        self.types.insert(key, TypeRef::new(type_rc));
        true
    }

    /// Record a method use, returns `false` if it was already recorded
    pub fn add_method(&mut self, method: &MethodRc) -> bool {
        let key = method.fullname();
        if self.methods.contains_key(&key) {
            return false;
        }
        self.methods.insert(key, MethodRef::new(method));
        true
    }

    /// Record a field use, returns `false` if it was already recorded
    pub fn add_field(&mut self, field: &FieldRc) -> bool {
        let key = member_key(field.owner(), &field.name);
        if self.fields.contains_key(&key) {
            return false;
        }
        self.fields.insert(key, FieldRef::new(field));
        true
    }

    /// The used types, ordered by fullname
    pub fn types(&self) -> impl Iterator<Item = TypeRc> + '_ {
        self.types.values().filter_map(TypeRef::upgrade)
    }

    /// The used methods, ordered by owner and signature
    pub fn methods(&self) -> impl Iterator<Item = MethodRc> + '_ {
        self.methods.values().filter_map(MethodRef::upgrade)
    }

    /// The used fields, ordered by owner and name
    pub fn fields(&self) -> impl Iterator<Item = FieldRc> + '_ {
        self.fields.values().filter_map(FieldRef::upgrade)
    }

    /// `true` if `type_rc` is among the used types
    #[must_use]
    pub fn contains_type(&self, type_rc: &TypeRc) -> bool {
        self.types
            .get(&type_rc.fullname())
            .is_some_and(|used| used.points_to(type_rc))
    }

    /// `true` if `method` is among the used methods
    #[must_use]
    pub fn contains_method(&self, method: &MethodRc) -> bool {
        self.methods
            .get(&method.fullname())
            .is_some_and(|used| used.points_to(method))
    }

    /// `true` if `field` is among the used fields
    #[must_use]
    pub fn contains_field(&self, field: &FieldRc) -> bool {
        self.fields
            .get(&member_key(field.owner(), &field.name))
            .is_some_and(|used| used.points_to(field))
    }

    /// Number of used types
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Number of used methods
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Number of used fields
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// `true` if no edge has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.methods.is_empty() && self.fields.is_empty()
    }
}

impl fmt::Debug for MethodUses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodUses")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A method declared by a [`crate::model::Type`].
///
/// The canonical [`Method::name`] is the signature `Name(T1, T2)`; it is the key every
/// method lookup uses. The usage edges are resolved once, after all types and members of
/// the module exist, and are read-only afterwards.
pub struct Method {
    /// Canonical signature name, `Name(T1, T2)`
    pub name: String,
    /// Name as declared in metadata
    pub raw_name: String,
    /// `true` for instance constructors and type initializers
    pub is_constructor: bool,
    /// The type that owns this method
    owner: TypeRef,
    /// The declaring type reported by metadata, if it is part of the analyzed module
    declaring_type: Option<TypeRef>,
    /// Usage edges, set by the usage stage for methods with a body
    uses: OnceLock<MethodUses>,
}

impl Method {
    pub(crate) fn new(
        name: String,
        raw_name: &str,
        is_constructor: bool,
        owner: &TypeRc,
        declaring_type: Option<&TypeRc>,
    ) -> Self {
        Method {
            name,
            raw_name: raw_name.to_string(),
            is_constructor,
            owner: TypeRef::new(owner),
            declaring_type: declaring_type.map(TypeRef::new),
            uses: OnceLock::new(),
        }
    }

    /// The type that owns this method
    #[must_use]
    pub fn owner(&self) -> Option<TypeRc> {
        self.owner.upgrade()
    }

    /// The declaring type, `None` if it lies outside the analyzed module
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        self.declaring_type.as_ref().and_then(TypeRef::upgrade)
    }

    /// `Namespace.Type::Name(T1, T2)`
    #[must_use]
    pub fn fullname(&self) -> String {
        member_key(self.owner(), &self.name)
    }

    /// The usage edges, `None` for methods without a body
    #[must_use]
    pub fn uses(&self) -> Option<&MethodUses> {
        self.uses.get()
    }

    /// Types referenced by this method
    #[must_use]
    pub fn type_uses(&self) -> Vec<TypeRc> {
        self.uses().map(|uses| uses.types().collect()).unwrap_or_default()
    }

    /// Methods of the owning type called by this method
    #[must_use]
    pub fn method_uses(&self) -> Vec<MethodRc> {
        self.uses().map(|uses| uses.methods().collect()).unwrap_or_default()
    }

    /// Fields of the owning type accessed by this method
    #[must_use]
    pub fn field_uses(&self) -> Vec<FieldRc> {
        self.uses().map(|uses| uses.fields().collect()).unwrap_or_default()
    }

    /// `true` if this method references `type_rc`
    #[must_use]
    pub fn uses_type(&self, type_rc: &TypeRc) -> bool {
        self.uses().is_some_and(|uses| uses.contains_type(type_rc))
    }

    /// `true` if this method calls `method`
    #[must_use]
    pub fn uses_method(&self, method: &MethodRc) -> bool {
        self.uses().is_some_and(|uses| uses.contains_method(method))
    }

    /// `true` if this method accesses `field`
    #[must_use]
    pub fn uses_field(&self, field: &FieldRc) -> bool {
        self.uses().is_some_and(|uses| uses.contains_field(field))
    }

    /// Publish the usage edges of this method.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the edges have already been published.
    pub(crate) fn set_uses(&self, uses: MethodUses) -> Result<()> {
        self.uses
            .set(uses)
            .map_err(|_| malformed_error!("Usage edges of {} resolved twice", self.fullname()))
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("is_constructor", &self.is_constructor)
            .field("uses", &self.uses())
            .finish()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fullname())
    }
}
