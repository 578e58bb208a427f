//! Raw, already decoded metadata consumed by the model builder.
//!
//! These structures are the hand-over point between a binary metadata reader and this
//! crate. A reader decodes a compiled module into a [`RawModule`] (types with their fields,
//! events, methods, nested types and instruction streams); the builder never looks at the
//! binary itself.
//!
//! References between entities are *descriptions*, not links: a field or a call operand
//! names its declaring type through a [`RawTypeRef`], and the builder resolves that
//! description by canonical name. References to entities outside the decoded module are
//! perfectly valid input, they simply resolve to nothing.
//!
//! # Examples
//!
//! ```rust
//! use cilgraph::metadata::raw::{RawField, RawMethod, RawModule, RawTypeDef};
//!
//! let widget = RawTypeDef::new("Acme", "Widget");
//! let widget = widget
//!     .clone()
//!     .with_field(RawField::new(widget.to_ref(), "size"))
//!     .with_method(RawMethod::new(widget.to_ref(), "Resize", ["System.Int32"]));
//!
//! let module = RawModule::new("Acme.dll").with_type(widget);
//! assert_eq!(module.type_count(), 1);
//! ```

use bitflags::bitflags;

use crate::{
    metadata::{
        instruction::RawInstructionRc,
        naming::{MethodDeclaration, TypeDeclaration},
    },
    Result,
};

#[allow(non_snake_case)]
/// Type attribute flag constants as found in the `TypeDef.Flags` column.
///
/// Only the visibility group is interpreted by the builder: the nested visibility values
/// mark a definition as nested.
pub mod TypeAttributes {
    /// Mask for extracting type visibility information.
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Type has no public scope (internal to assembly).
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    /// Type has public scope (visible outside assembly).
    pub const PUBLIC: u32 = 0x0000_0001;
    /// Nested type with public visibility.
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;
    /// Nested type with private visibility.
    pub const NESTED_PRIVATE: u32 = 0x0000_0003;
    /// Nested type with family (protected) visibility.
    pub const NESTED_FAMILY: u32 = 0x0000_0004;
    /// Nested type with assembly (internal) visibility.
    pub const NESTED_ASSEMBLY: u32 = 0x0000_0005;
    /// Nested type with family AND assembly visibility.
    pub const NESTED_FAM_AND_ASSEM: u32 = 0x0000_0006;
    /// Nested type with family OR assembly visibility.
    pub const NESTED_FAM_OR_ASSEM: u32 = 0x0000_0007;
    /// Type is an interface.
    pub const INTERFACE: u32 = 0x0000_0020;
    /// Type is abstract.
    pub const ABSTRACT: u32 = 0x0000_0080;
    /// Type cannot be derived from.
    pub const SEALED: u32 = 0x0000_0100;

    /// Returns `true` if the visibility bits of `flags` describe a nested type
    #[must_use]
    pub fn is_nested(flags: u32) -> bool {
        (flags & VISIBILITY_MASK) >= NESTED_PUBLIC
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    /// Method modifiers and properties (`MethodDef.Flags` without access and vtable bits)
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, depending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
    }
}

/// Name of an instance constructor
pub const CTOR_NAME: &str = ".ctor";
/// Name of a type initializer
pub const CCTOR_NAME: &str = ".cctor";

/// A reference to a type, as used by members and instruction operands.
///
/// The referenced type may or may not be defined in the decoded module.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTypeRef {
    /// The declared namespace (empty for nested and global types)
    pub namespace: String,
    /// The raw name, including a possible arity marker
    pub name: String,
    /// `TypeAttributes` bits, of which only the visibility group is inspected
    pub flags: u32,
    /// Names of the declared generic parameters
    pub generic_params: Vec<String>,
    /// The enclosing type, for nested types
    pub declaring_type: Option<Box<RawTypeRef>>,
}

impl RawTypeRef {
    /// Create a reference to a non-nested, non-generic type
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        RawTypeRef {
            namespace: namespace.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the declared generic parameters
    #[must_use]
    pub fn with_generic_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Turn this into a reference to a type nested in `parent`
    #[must_use]
    pub fn nested_in(mut self, parent: RawTypeRef) -> Self {
        self.flags =
            (self.flags & !TypeAttributes::VISIBILITY_MASK) | TypeAttributes::NESTED_PUBLIC;
        self.declaring_type = Some(Box::new(parent));
        self
    }
}

impl TypeDeclaration for RawTypeRef {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn generic_params(&self) -> &[String] {
        &self.generic_params
    }

    fn is_nested(&self) -> bool {
        TypeAttributes::is_nested(self.flags)
    }

    fn declaring_type(&self) -> Option<&dyn TypeDeclaration> {
        self.declaring_type
            .as_deref()
            .map(|parent| parent as &dyn TypeDeclaration)
    }
}

/// A reference to a method, as found in call and `ldftn` operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMethodRef {
    /// The type declaring the method
    pub declaring_type: RawTypeRef,
    /// The raw method name
    pub name: String,
    /// Full type names of the parameters in declaration order
    pub params: Vec<String>,
}

impl RawMethodRef {
    /// Create a new method reference
    pub fn new<I, S>(declaring_type: RawTypeRef, name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawMethodRef {
            declaring_type,
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

impl MethodDeclaration for RawMethodRef {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameter_types(&self) -> &[String] {
        &self.params
    }
}

/// A reference to a field, as found in `ldfld`/`stfld`/`ldsfld` operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFieldRef {
    /// The type declaring the field
    pub declaring_type: RawTypeRef,
    /// The field name
    pub name: String,
}

impl RawFieldRef {
    /// Create a new field reference
    pub fn new(declaring_type: RawTypeRef, name: impl Into<String>) -> Self {
        RawFieldRef {
            declaring_type,
            name: name.into(),
        }
    }
}

/// A field definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// The type declaring the field, as reported by the reader
    pub declaring_type: RawTypeRef,
    /// The field name
    pub name: String,
}

impl RawField {
    /// Create a new field definition
    pub fn new(declaring_type: RawTypeRef, name: impl Into<String>) -> Self {
        RawField {
            declaring_type,
            name: name.into(),
        }
    }
}

/// An event definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// The event name
    pub name: String,
}

impl RawEvent {
    /// Create a new event definition
    pub fn new(name: impl Into<String>) -> Self {
        RawEvent { name: name.into() }
    }
}

/// A method definition with its optional instruction stream.
#[derive(Debug, Clone)]
pub struct RawMethod {
    /// The type declaring the method, as reported by the reader
    pub declaring_type: RawTypeRef,
    /// The raw method name
    pub name: String,
    /// Method modifiers
    pub flags: MethodModifiers,
    /// Full type names of the parameters in declaration order
    pub params: Vec<String>,
    /// The decoded instructions, `None` for abstract, extern and runtime methods
    pub body: Option<Vec<RawInstructionRc>>,
}

impl RawMethod {
    /// Create a new method definition without a body
    pub fn new<I, S>(declaring_type: RawTypeRef, name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawMethod {
            declaring_type,
            name: name.into(),
            flags: MethodModifiers::empty(),
            params: params.into_iter().map(Into::into).collect(),
            body: None,
        }
    }

    /// Create an instance constructor (`.ctor`) with the given parameters
    pub fn constructor<I, S>(declaring_type: RawTypeRef, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut method = RawMethod::new(declaring_type, CTOR_NAME, params);
        method.flags = MethodModifiers::SPECIAL_NAME | MethodModifiers::RTSPECIAL_NAME;
        method
    }

    /// Set the method modifiers
    #[must_use]
    pub fn with_flags(mut self, flags: MethodModifiers) -> Self {
        self.flags = flags;
        self
    }

    /// Attach an instruction stream
    #[must_use]
    pub fn with_body(mut self, instructions: Vec<RawInstructionRc>) -> Self {
        self.body = Some(instructions);
        self
    }

    /// `true` for instance constructors and type initializers.
    ///
    /// Follows ECMA-335: the method has to carry `RTSpecialName` and be called `.ctor` or
    /// `.cctor`.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.flags.contains(MethodModifiers::RTSPECIAL_NAME)
            && (self.name == CTOR_NAME || self.name == CCTOR_NAME)
    }

    /// The instruction stream, if the method has a non-empty body
    #[must_use]
    pub fn instructions(&self) -> Option<&[RawInstructionRc]> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }

    /// A reference to this method, suitable as a call operand
    #[must_use]
    pub fn to_ref(&self) -> RawMethodRef {
        RawMethodRef {
            declaring_type: self.declaring_type.clone(),
            name: self.name.clone(),
            params: self.params.clone(),
        }
    }
}

impl MethodDeclaration for RawMethod {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameter_types(&self) -> &[String] {
        &self.params
    }
}

/// A type definition with all of its members and nested types.
#[derive(Debug, Clone, Default)]
pub struct RawTypeDef {
    /// The declared namespace (empty for nested and global types)
    pub namespace: String,
    /// The raw name, including a possible arity marker
    pub name: String,
    /// `TypeAttributes` bits
    pub flags: u32,
    /// Names of the declared generic parameters
    pub generic_params: Vec<String>,
    /// The enclosing type, for nested types
    pub declaring_type: Option<RawTypeRef>,
    /// Field definitions
    pub fields: Vec<RawField>,
    /// Event definitions
    pub events: Vec<RawEvent>,
    /// Method definitions
    pub methods: Vec<RawMethod>,
    /// Nested type definitions
    pub nested_types: Vec<RawTypeDef>,
}

impl RawTypeDef {
    /// Create a new, empty top-level type definition
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        RawTypeDef {
            namespace: namespace.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the declared generic parameters
    #[must_use]
    pub fn with_generic_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Add a field definition
    #[must_use]
    pub fn with_field(mut self, field: RawField) -> Self {
        self.fields.push(field);
        self
    }

    /// Add an event definition
    #[must_use]
    pub fn with_event(mut self, event: RawEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Add a method definition
    #[must_use]
    pub fn with_method(mut self, method: RawMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a nested type definition.
    ///
    /// The nested definition is flagged as nested and pointed at this type, the way a reader
    /// reports `NestedClass` rows. Types already nested inside `nested` are re-pointed so
    /// that their enclosing chain includes this type, and so are the declaring types of
    /// fields and methods that still refer to a definition by its previous reference.
    ///
    /// Instruction operands are shared and are never rewritten: operands that refer to a
    /// nested type must be built from its final reference, see [`RawTypeRef::nested_in`].
    #[must_use]
    pub fn with_nested(mut self, mut nested: RawTypeDef) -> Self {
        let previous = nested.to_ref();
        nested.flags =
            (nested.flags & !TypeAttributes::VISIBILITY_MASK) | TypeAttributes::NESTED_PUBLIC;
        nested.declaring_type = Some(self.to_ref());
        nested.repoint_members(&previous);
        nested.relink_nested();
        self.nested_types.push(nested);
        self
    }

    /// Point every nested definition below this one at its current enclosing definition
    fn relink_nested(&mut self) {
        let mut pending: Vec<&mut RawTypeDef> = vec![self];
        while let Some(def) = pending.pop() {
            let parent = def.to_ref();
            for nested in &mut def.nested_types {
                let previous = nested.to_ref();
                nested.declaring_type = Some(parent.clone());
                nested.repoint_members(&previous);
            }
            pending.extend(def.nested_types.iter_mut());
        }
    }

    /// Replace `previous` with the current reference in member declaring types
    fn repoint_members(&mut self, previous: &RawTypeRef) {
        let current = self.to_ref();
        if current == *previous {
            return;
        }
        for field in &mut self.fields {
            if field.declaring_type == *previous {
                field.declaring_type = current.clone();
            }
        }
        for method in &mut self.methods {
            if method.declaring_type == *previous {
                method.declaring_type = current.clone();
            }
        }
    }

    /// A reference describing this definition, suitable for members and operands
    #[must_use]
    pub fn to_ref(&self) -> RawTypeRef {
        RawTypeRef {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            flags: self.flags,
            generic_params: self.generic_params.clone(),
            declaring_type: self.declaring_type.clone().map(Box::new),
        }
    }

    /// Number of type definitions in this subtree, this definition included
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(def) = pending.pop() {
            count += 1;
            pending.extend(def.nested_types.iter());
        }
        count
    }
}

impl TypeDeclaration for RawTypeDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn generic_params(&self) -> &[String] {
        &self.generic_params
    }

    fn is_nested(&self) -> bool {
        TypeAttributes::is_nested(self.flags)
    }

    fn declaring_type(&self) -> Option<&dyn TypeDeclaration> {
        self.declaring_type
            .as_ref()
            .map(|parent| parent as &dyn TypeDeclaration)
    }
}

/// A decoded module: its name and its top-level type definitions.
#[derive(Debug, Clone, Default)]
pub struct RawModule {
    /// The module name (e.g. `Acme.dll`)
    pub name: String,
    /// Top-level type definitions, including the `<Module>` pseudo-type if the reader
    /// reports it
    pub types: Vec<RawTypeDef>,
}

impl RawModule {
    /// Create a new module without types
    pub fn new(name: impl Into<String>) -> Self {
        RawModule {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// Add a top-level type definition
    #[must_use]
    pub fn with_type(mut self, type_def: RawTypeDef) -> Self {
        self.types.push(type_def);
        self
    }

    /// Number of type definitions in the module, nested ones included
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.iter().map(RawTypeDef::subtree_len).sum()
    }
}

/// A producer of decoded modules, implemented by binary metadata readers.
///
/// The builder calls [`MetadataSource::read_module`] exactly once per build; a returned
/// error aborts the build before any model is created.
pub trait MetadataSource {
    /// Decode the module
    ///
    /// # Errors
    /// Returns an error if the underlying binary cannot be opened or decoded.
    fn read_module(&self) -> Result<RawModule>;
}

impl MetadataSource for RawModule {
    fn read_module(&self) -> Result<RawModule> {
        Ok(self.clone())
    }
}
