use std::fmt;

use crate::model::Module;

/// Element and edge counts of a built [`Module`].
///
/// Used for build logging and to compare two builds; the counts are not metrics in their
/// own right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelStats {
    /// Number of namespaces
    pub namespaces: usize,
    /// Number of types, nested types included
    pub types: usize,
    /// Number of nested types
    pub nested_types: usize,
    /// Number of fields
    pub fields: usize,
    /// Number of fields that back an event
    pub event_fields: usize,
    /// Number of events
    pub events: usize,
    /// Number of methods
    pub methods: usize,
    /// Number of constructors and type initializers
    pub constructors: usize,
    /// Total number of type use edges
    pub type_uses: usize,
    /// Total number of method use edges
    pub method_uses: usize,
    /// Total number of field use edges
    pub field_uses: usize,
}

impl ModelStats {
    /// Count the elements and edges of `module`
    #[must_use]
    pub fn collect(module: &Module) -> Self {
        let mut stats = ModelStats {
            namespaces: module.namespaces().count(),
            ..Default::default()
        };

        for type_rc in module.types() {
            stats.types += 1;
            if type_rc.is_nested() {
                stats.nested_types += 1;
            }

            for field in type_rc.fields() {
                stats.fields += 1;
                if field.is_event() {
                    stats.event_fields += 1;
                }
            }
            stats.events += type_rc.events.count();

            for method in type_rc.methods() {
                stats.methods += 1;
                if method.is_constructor {
                    stats.constructors += 1;
                }
                if let Some(uses) = method.uses() {
                    stats.type_uses += uses.type_count();
                    stats.method_uses += uses.method_count();
                    stats.field_uses += uses.field_count();
                }
            }
        }

        stats
    }
}

impl fmt::Display for ModelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} namespaces, {} types ({} nested), {} fields, {} events, {} methods; \
             uses: {} types, {} methods, {} fields",
            self.namespaces,
            self.types,
            self.nested_types,
            self.fields,
            self.events,
            self.methods,
            self.type_uses,
            self.method_uses,
            self.field_uses
        )
    }
}
