//! `BuildContext` - shared state of one model build.
//!
//! The context is created by [`crate::ModelBuilder::build`], handed to every stage in turn
//! and dropped once the build finished; only the [`ModuleRc`] survives it.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    OnceLock,
};

use rayon::prelude::*;
use strum::EnumCount;
use tracing::trace;

use crate::{
    builder::{BuildConfig, StageId},
    metadata::{
        naming,
        raw::{RawModule, RawTypeDef},
    },
    model::{ModuleRc, TypeRc},
    Error::TypeNotFound,
    Result,
};

/// State shared by all build stages.
pub(crate) struct BuildContext<'a> {
    /// The decoded input
    pub raw: &'a RawModule,
    /// Build settings
    pub config: BuildConfig,
    /// The module under construction
    pub module: ModuleRc,
    /// Every modelled type definition in skeleton (pre-)order, set by the skeleton stage
    definitions: OnceLock<Vec<&'a RawTypeDef>>,
    /// Completion flag per stage, indexed by `StageId as usize`
    completed: [AtomicBool; StageId::COUNT],
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(raw: &'a RawModule, config: BuildConfig, module: ModuleRc) -> Self {
        BuildContext {
            raw,
            config,
            module,
            definitions: OnceLock::new(),
            completed: std::array::from_fn(|_| AtomicBool::new(false)),
        }
    }

    /// Record the modelled definitions; may only happen once per build.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the definitions have already been recorded.
    pub(crate) fn set_definitions(&self, definitions: Vec<&'a RawTypeDef>) -> Result<()> {
        self.definitions
            .set(definitions)
            .map_err(|_| malformed_error!("Type definitions of {} recorded twice", self.raw.name))
    }

    /// The modelled definitions, empty before the skeleton stage ran
    pub(crate) fn definitions(&self) -> &[&'a RawTypeDef] {
        self.definitions.get().map(Vec::as_slice).unwrap_or_default()
    }

    /// Locate the model type that was built for `def`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the skeleton has no type for `def`.
    pub(crate) fn type_for(&self, def: &RawTypeDef) -> Result<TypeRc> {
        let fullname = naming::fullname(def);
        self.module
            .index()
            .get(&fullname)
            .ok_or(TypeNotFound(fullname))
    }

    /// Run `f` for every modelled definition together with its type.
    ///
    /// Runs on the rayon thread pool if [`BuildConfig::parallel`] is set. The first error
    /// aborts the iteration and is returned.
    pub(crate) fn for_each_type<F>(&self, f: F) -> Result<()>
    where
        F: Fn(&'a RawTypeDef, &TypeRc) -> Result<()> + Send + Sync,
    {
        let run = |def: &&'a RawTypeDef| -> Result<()> {
            let type_rc = self.type_for(def)?;
            f(*def, &type_rc)
        };

        if self.config.parallel {
            self.definitions().par_iter().try_for_each(run)
        } else {
            self.definitions().iter().try_for_each(run)
        }
    }

    pub(crate) fn is_completed(&self, stage: StageId) -> bool {
        self.completed[stage as usize].load(Ordering::Acquire)
    }

    pub(crate) fn mark_completed(&self, stage: StageId) {
        trace!(%stage, "stage completed");
        self.completed[stage as usize].store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Module;

    #[test]
    fn test_stage_completion() {
        let raw = RawModule::new("Acme.dll");
        let module = Module::new("Acme.dll");
        let context = BuildContext::new(&raw, BuildConfig::default(), module);

        assert!(!context.is_completed(StageId::Skeleton));
        context.mark_completed(StageId::Skeleton);
        assert!(context.is_completed(StageId::Skeleton));
        assert!(!context.is_completed(StageId::Members));
    }

    #[test]
    fn test_definitions_recorded_once() {
        let raw = RawModule::new("Acme.dll").with_type(RawTypeDef::new("Acme", "Widget"));
        let module = Module::new("Acme.dll");
        let context = BuildContext::new(&raw, BuildConfig::default(), module);

        assert!(context.definitions().is_empty());
        context.set_definitions(raw.types.iter().collect()).unwrap();
        assert_eq!(context.definitions().len(), 1);
        assert!(context.set_definitions(Vec::new()).is_err());
    }

    #[test]
    fn test_missing_type() {
        let raw = RawModule::new("Acme.dll");
        let module = Module::new("Acme.dll");
        let context = BuildContext::new(&raw, BuildConfig::default(), module);

        let result = context.type_for(&RawTypeDef::new("Acme", "Widget"));
        assert!(matches!(result, Err(crate::Error::TypeNotFound(name)) if name == "Acme.Widget"));
    }
}
