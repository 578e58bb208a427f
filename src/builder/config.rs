//! Build configuration
//!
//! Controls how a [`crate::model::Module`] is built from a decoded module: whether the
//! per-type work runs on the rayon thread pool, how deep type nesting may go, and which
//! optional usage edges are recorded.

/// Configuration for building a code model
///
/// The defaults reproduce the classic usage-graph semantics (only member references produce
/// edges) while using every available core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Run the member and usage stages per type on the rayon thread pool
    pub parallel: bool,

    /// Maximum nesting depth for nested types (default: 64)
    pub max_nesting_depth: usize,

    /// Record types referenced by type-token operands (`ldtoken`, `newarr`, `castclass`, ...)
    /// as type uses. When disabled only method and field references produce edges.
    pub record_type_operands: bool,

    /// Name of the per-module pseudo type that holds global members; it is not modelled
    pub module_type_name: &'static str,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            max_nesting_depth: 64,
            record_type_operands: false,
            module_type_name: "<Module>",
        }
    }
}

impl BuildConfig {
    /// Creates a configuration that processes every type on the calling thread
    ///
    /// Produces the same model as [`BuildConfig::parallel`]; useful for debugging and for
    /// callers that already parallelize over modules.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Creates a configuration that spreads per-type work over the rayon thread pool
    #[must_use]
    pub fn parallel() -> Self {
        Self::default()
    }

    /// Creates a configuration pinned to the classic edge set
    ///
    /// Every field is fixed here rather than taken from [`BuildConfig::default`]: parallel
    /// per-type work, a nesting depth of 64, `<Module>` as the pseudo type and no edges for
    /// type-token operands.
    #[must_use]
    pub fn strict_original() -> Self {
        Self {
            parallel: true,
            max_nesting_depth: 64,
            record_type_operands: false,
            module_type_name: "<Module>",
        }
    }

    /// Returns a copy of this configuration with type-token operand recording set
    #[must_use]
    pub fn with_type_operands(mut self, enabled: bool) -> Self {
        self.record_type_operands = enabled;
        self
    }
}
