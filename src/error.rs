use thiserror::Error;

use crate::builder::StageId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Building a code model is all-or-nothing: every variant aborts the build and no partially
/// constructed [`crate::model::Module`] is ever handed out. Lookups that simply find nothing
/// (a call into a type that lives outside the analyzed module, an event without a matching
/// handler type, ...) are *not* errors and never show up here.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::Source`] - The metadata reader failed to provide a module
/// - [`Error::FileError`] - Filesystem I/O errors surfaced by a reader
///
/// ## Structural Errors
/// - [`Error::Malformed`] - Input or intermediate state violates a structural rule
/// - [`Error::DuplicateType`] - Two type definitions share one fully qualified name
/// - [`Error::TypeNotFound`] - A type that must exist in the model could not be located
/// - [`Error::RecursionLimit`] - Type nesting exceeded the configured depth
/// - [`Error::StageOrder`] - A build stage ran before one of its dependencies
///
/// # Examples
///
/// ```rust
/// use cilgraph::{Error, ModelBuilder, metadata::raw::RawModule};
///
/// let raw = RawModule::new("Empty.dll");
/// match ModelBuilder::new().build(&raw) {
///     Ok(module) => println!("{} namespaces", module.namespaces().count()),
///     Err(Error::DuplicateType(name)) => eprintln!("ambiguous type {name}"),
///     Err(e) => eprintln!("build failed: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input or an intermediate build structure is damaged.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// File I/O error.
    ///
    /// Wraps standard I/O errors raised by a [`crate::metadata::raw::MetadataSource`]
    /// while it opens or decodes the binary.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// The metadata reader could not produce a module.
    ///
    /// Readers use this variant to report decoding failures that are not plain I/O errors.
    #[error("Metadata source failed - {0}")]
    Source(String),

    /// Two type definitions canonicalize to the same fully qualified name.
    ///
    /// Every cross-reference is resolved through this name, so an ambiguous name would make
    /// every later lookup non-deterministic.
    #[error("Duplicate type definition - {0}")]
    DuplicateType(String),

    /// A type which has to be part of the model could not be located.
    ///
    /// Raised when a type created by the skeleton stage cannot be found again by a later
    /// stage. Unresolved *references* never raise this error.
    #[error("Failed to find type in model - {0}")]
    TypeNotFound(String),

    /// Recursion limit reached.
    ///
    /// Nested types deeper than [`crate::BuildConfig::max_nesting_depth`] abort the build.
    /// The associated value shows the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// A build stage was executed before a stage it depends on.
    #[error("Stage {stage} requires {requires} to be completed first")]
    StageOrder {
        /// The stage that was about to run
        stage: StageId,
        /// The dependency that has not been completed
        requires: StageId,
    },
}
