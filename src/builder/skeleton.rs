//! Skeleton stage: namespaces and types.
//!
//! Creates one [`Type`] per raw type definition, nested definitions right after their
//! parent, groups them into namespaces and registers them in the module's
//! [`crate::model::TypeIndex`]. Every later stage resolves its references through that index.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    builder::{context::BuildContext, BuildStage, StageId},
    metadata::{naming, raw::RawTypeDef},
    model::{NamespaceRc, Type, TypeRc},
    Error::RecursionLimit,
    Result,
};

/// Builds the namespace and type tree
pub(crate) struct SkeletonStage;

impl SkeletonStage {
    /// Create the type for `def`, attach it to its namespace and parent and index it
    fn create_type(
        context: &BuildContext,
        def: &RawTypeDef,
        namespace: &NamespaceRc,
        parent: Option<&TypeRc>,
    ) -> Result<TypeRc> {
        let name = naming::type_name(def);
        if let Some(parent) = parent {
            let expected = format!("{}{}{}", parent.name, naming::NESTED_SEPARATOR, def.name);
            let declared = naming::fullname(def);
            if name != expected || declared != naming::join_fullname(&namespace.name, &expected) {
                return Err(malformed_error!(
                    "Nested type {} is declared as {} - expected {}",
                    def.name,
                    declared,
                    naming::join_fullname(&namespace.name, &expected)
                ));
            }
        }

        let type_rc = Arc::new(Type::new(name, &def.name, namespace, parent));
        context.module.index().insert(&type_rc)?;

        namespace.types.push(type_rc.clone());
        if let Some(parent) = parent {
            parent.nested_types.push(type_rc.clone());
        }

        Ok(type_rc)
    }
}

impl BuildStage for SkeletonStage {
    fn run(&self, context: &BuildContext) -> Result<()> {
        let config = &context.config;
        let mut definitions = Vec::with_capacity(context.raw.type_count());

        for root in &context.raw.types {
            if root.name == config.module_type_name {
                trace!(name = %root.name, "skipping module pseudo type");
                continue;
            }

            let namespace = context
                .module
                .namespace_or_insert(naming::namespace_name(root));

            let mut pending: Vec<(&RawTypeDef, Option<TypeRc>, usize)> = vec![(root, None, 0)];
            while let Some((def, parent, depth)) = pending.pop() {
                if depth > config.max_nesting_depth {
                    return Err(RecursionLimit(config.max_nesting_depth));
                }

                let type_rc = Self::create_type(context, def, &namespace, parent.as_ref())?;
                definitions.push(def);

                // Reversed, so that the first nested type is popped next
                for nested in def.nested_types.iter().rev() {
                    if nested.name == config.module_type_name {
                        continue;
                    }
                    pending.push((nested, Some(type_rc.clone()), depth + 1));
                }
            }
        }

        debug!(
            module = %context.raw.name,
            types = definitions.len(),
            namespaces = context.module.namespaces().count(),
            "type skeleton built"
        );
        context.set_definitions(definitions)
    }

    fn id(&self) -> StageId {
        StageId::Skeleton
    }

    fn dependencies(&self) -> &'static [StageId] {
        &[]
    }
}
