use std::{fmt, sync::Arc};

use crate::model::{ModuleRc, ModuleRef, TypeList, TypeRc};

/// Reference to a [`Namespace`]
pub type NamespaceRc = Arc<Namespace>;
/// A vector that holds a list of [`Namespace`] references
pub type NamespaceList = Arc<boxcar::Vec<NamespaceRc>>;

weak_ref!(
    NamespaceRef,
    Namespace,
    NamespaceRc,
    "A smart, non-owning reference to a [`Namespace`]"
);

/// A namespace of the analyzed module.
///
/// Lists every type whose namespace resolves to it, in creation order. Nested types are
/// listed in the namespace of their outermost enclosing type. Types without a namespace
/// share the [`crate::metadata::naming::NO_NAMESPACE`] namespace.
pub struct Namespace {
    /// The namespace name
    pub name: String,
    /// All types that belong to this namespace, nested types included
    pub types: TypeList,
    /// The module this namespace belongs to
    module: ModuleRef,
}

impl Namespace {
    pub(crate) fn new(name: &str, module: ModuleRef) -> Self {
        Namespace {
            name: name.to_string(),
            types: Arc::new(boxcar::Vec::new()),
            module,
        }
    }

    /// The module this namespace belongs to, `None` once the module has been dropped
    #[must_use]
    pub fn module(&self) -> Option<ModuleRc> {
        self.module.upgrade()
    }

    /// Iterate over the types of this namespace in creation order
    pub fn types(&self) -> impl Iterator<Item = &TypeRc> + '_ {
        self.types.iter().map(|(_, type_rc)| type_rc)
    }

    /// Number of types in this namespace
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.count()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("types", &self.type_count())
            .finish()
    }
}
