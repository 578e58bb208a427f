//! Model Builder
//!
//! This module turns a decoded [`RawModule`] into a [`crate::model::Module`]. The work is
//! split into stages that run one after another, because each stage resolves references
//! against what the previous stages created:
//!
//! 1. [`StageId::Skeleton`] - namespaces and types, the type index
//! 2. [`StageId::Members`] - fields, events and methods of every type
//! 3. [`StageId::Usage`] - usage edges of every method with a body
//!
//! Within the member and usage stages the types are independent of each other and are
//! processed on the rayon thread pool, unless [`BuildConfig::parallel`] is disabled.
//!
//! # Usage
//!
//! ```rust
//! use cilgraph::{
//!     metadata::raw::{RawMethod, RawModule, RawTypeDef},
//!     BuildConfig, ModelBuilder,
//! };
//!
//! let program = RawTypeDef::new("", "Program");
//! let program = program
//!     .clone()
//!     .with_method(RawMethod::new(program.to_ref(), "Main", ["System.String[]"]));
//!
//! let raw = RawModule::new("Hello.exe").with_type(program);
//! let module = ModelBuilder::with_config(BuildConfig::sequential()).build(&raw)?;
//!
//! let program = module.find_type("-.Program").expect("type was built");
//! assert!(program.find_method("Main(System.String[])").is_some());
//! # Ok::<(), cilgraph::Error>(())
//! ```
mod config;
mod context;
mod members;
mod skeleton;
mod usage;

pub use config::BuildConfig;

use strum::{Display, EnumCount, EnumIter};
use tracing::{debug, info};

use crate::{
    metadata::raw::{MetadataSource, RawModule},
    model::{Module, ModuleRc},
    Result,
};
use context::BuildContext;

/// Identifies a build stage; stages run in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum StageId {
    /// Namespaces, types and the type index
    Skeleton,
    /// Fields, events and methods
    Members,
    /// Method usage edges
    Usage,
}

/// A single step of a model build.
///
/// A stage declares the stages it depends on; it is only run after all of them completed.
trait BuildStage: Send + Sync {
    /// Run this stage against the shared build state.
    ///
    /// # Errors
    /// Returns an error if the input violates a structural rule; the build is aborted.
    fn run(&self, context: &BuildContext) -> Result<()>;

    /// The identifier of this stage
    fn id(&self) -> StageId;

    /// Stages that have to be completed before this stage runs
    fn dependencies(&self) -> &'static [StageId];
}

static STAGES: [&'static dyn BuildStage; StageId::COUNT] = [
    &skeleton::SkeletonStage,
    &members::MemberStage,
    &usage::UsageStage,
];

/// Run `stages` in order, checking each stage's dependencies first.
///
/// The first failing stage aborts the build.
fn execute_stages(context: &BuildContext, stages: &[&'static dyn BuildStage]) -> Result<()> {
    for stage in stages {
        if let Some(missing) = stage
            .dependencies()
            .iter()
            .find(|dependency| !context.is_completed(**dependency))
        {
            return Err(crate::Error::StageOrder {
                stage: stage.id(),
                requires: *missing,
            });
        }

        debug!(stage = %stage.id(), "running build stage");
        stage.run(context)?;
        context.mark_completed(stage.id());
    }

    Ok(())
}

/// Builds code models from decoded metadata.
///
/// A builder holds nothing but its [`BuildConfig`] and can be reused for any number of
/// modules. Building is all-or-nothing: either the complete model is returned or the first
/// error that was encountered.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelBuilder {
    config: BuildConfig,
}

impl ModelBuilder {
    /// Create a builder with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with a custom configuration
    #[must_use]
    pub fn with_config(config: BuildConfig) -> Self {
        ModelBuilder { config }
    }

    /// The configuration used by this builder
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the code model of `raw`.
    ///
    /// # Errors
    /// Returns [`crate::Error::DuplicateType`] if two definitions share a fully qualified
    /// name, [`crate::Error::RecursionLimit`] if types are nested deeper than configured and
    /// [`crate::Error::Malformed`] if the input is structurally inconsistent.
    pub fn build(&self, raw: &RawModule) -> Result<ModuleRc> {
        let module = Module::new(&raw.name);
        let context = BuildContext::new(raw, self.config, module.clone());

        execute_stages(&context, &STAGES)?;
        drop(context);

        info!(module = %module.name, stats = %module.stats(), "code model built");
        Ok(module)
    }

    /// Read a module from `source` and build its code model.
    ///
    /// # Errors
    /// Returns the error of the source unchanged if it cannot provide a module, or any error
    /// of [`ModelBuilder::build`].
    pub fn build_from(&self, source: &dyn MetadataSource) -> Result<ModuleRc> {
        let raw = source.read_module()?;
        self.build(&raw)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{metadata::raw::RawTypeDef, Error};

    #[test]
    fn test_stage_table_matches_ids() {
        let ids: Vec<StageId> = STAGES.iter().map(|stage| stage.id()).collect();
        assert_eq!(ids, StageId::iter().collect::<Vec<_>>());

        for (position, stage) in STAGES.iter().enumerate() {
            assert!(stage
                .dependencies()
                .iter()
                .all(|dependency| (*dependency as usize) < position));
        }
    }

    #[test]
    fn test_stage_order_enforced() {
        let raw = RawModule::new("Acme.dll").with_type(RawTypeDef::new("Acme", "Widget"));
        let module = Module::new(&raw.name);
        let context = BuildContext::new(&raw, BuildConfig::default(), module);

        let result = execute_stages(&context, &[&usage::UsageStage]);
        assert!(matches!(
            result,
            Err(Error::StageOrder {
                stage: StageId::Usage,
                requires: StageId::Skeleton
            })
        ));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(StageId::Skeleton.to_string(), "Skeleton");
        assert_eq!(StageId::Usage.to_string(), "Usage");
    }

    #[test]
    fn test_builder_config() {
        let builder = ModelBuilder::with_config(BuildConfig::sequential());
        assert!(!builder.config().parallel);
        assert!(ModelBuilder::new().config().parallel);
    }
}
