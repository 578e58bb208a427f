use std::{fmt, sync::Arc};

use dashmap::DashMap;

use crate::model::{ModelStats, Namespace, NamespaceList, NamespaceRc, TypeIndex, TypeRc};

/// Reference to a [`Module`]
pub type ModuleRc = Arc<Module>;

weak_ref!(
    ModuleRef,
    Module,
    ModuleRc,
    "A smart, non-owning reference to a [`Module`]"
);

/// The root of the code model for one analyzed binary.
///
/// Owns the namespaces (unique by name, in first-creation order) and the [`TypeIndex`]
/// used to resolve every cross-reference. A module handed out by
/// [`crate::ModelBuilder::build`] is complete and is not modified afterwards.
pub struct Module {
    /// The module name, as reported by the metadata reader
    pub name: String,
    /// Namespaces in creation order
    namespaces: NamespaceList,
    /// Namespaces by name
    namespace_map: DashMap<String, NamespaceRc>,
    /// Canonical-name index over all types
    index: TypeIndex,
    /// Handed to every namespace as its back-reference
    self_ref: ModuleRef,
}

impl Module {
    pub(crate) fn new(name: &str) -> ModuleRc {
        Arc::new_cyclic(|weak| Module {
            name: name.to_string(),
            namespaces: Arc::new(boxcar::Vec::new()),
            namespace_map: DashMap::new(),
            index: TypeIndex::new(),
            self_ref: ModuleRef {
                weak_ref: weak.clone(),
            },
        })
    }

    /// Find the namespace called `name`, creating it if it does not exist yet.
    ///
    /// The first caller creates the namespace; concurrent callers for the same name are
    /// serialized and receive the same instance.
    pub(crate) fn namespace_or_insert(&self, name: &str) -> NamespaceRc {
        self.namespace_map
            .entry(name.to_string())
            .or_insert_with(|| {
                let namespace = Arc::new(Namespace::new(name, self.self_ref.clone()));
                self.namespaces.push(namespace.clone());
                namespace
            })
            .value()
            .clone()
    }

    /// Iterate over the namespaces in creation order
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceRc> + '_ {
        self.namespaces.iter().map(|(_, namespace)| namespace)
    }

    /// Look up a namespace by name
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<NamespaceRc> {
        self.namespace_map
            .get(name)
            .map(|namespace| namespace.value().clone())
    }

    /// Iterate over all types, namespace by namespace, each in creation order
    pub fn types(&self) -> impl Iterator<Item = &TypeRc> + '_ {
        self.namespaces().flat_map(|namespace| namespace.types())
    }

    /// Look up a type by fullname (`Namespace.CanonicalName`)
    #[must_use]
    pub fn find_type(&self, fullname: &str) -> Option<TypeRc> {
        self.index.get(fullname)
    }

    /// The canonical-name index over all types
    #[must_use]
    pub fn index(&self) -> &TypeIndex {
        &self.index
    }

    /// Count the elements and usage edges of this module
    #[must_use]
    pub fn stats(&self) -> ModelStats {
        ModelStats::collect(self)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("namespaces", &self.namespaces.count())
            .field("types", &self.index.len())
            .finish()
    }
}
