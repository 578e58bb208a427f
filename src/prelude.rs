//! # cilgraph Prelude
//!
//! Re-exports the types needed to describe a decoded module, build its code model and
//! query the result.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilgraph operations
pub use crate::Error;

/// The result type used throughout cilgraph
pub use crate::Result;

// ================================================================================================
// Building
// ================================================================================================

pub use crate::builder::{BuildConfig, ModelBuilder, StageId};

// ================================================================================================
// Decoded Input
// ================================================================================================

pub use crate::metadata::{
    instruction::{Immediate, RawInstruction, RawInstructionRc, RawOperand},
    naming::{MethodDeclaration, TypeDeclaration},
    raw::{
        MetadataSource, MethodModifiers, RawEvent, RawField, RawFieldRef, RawMethod,
        RawMethodRef, RawModule, RawTypeDef, RawTypeRef, TypeAttributes,
    },
};

// ================================================================================================
// Code Model
// ================================================================================================

pub use crate::model::{
    Event, EventRc, Field, FieldRc, Method, MethodRc, MethodUses, ModelStats, Module,
    ModuleRc, ModuleRef, Namespace, NamespaceRc, Type, TypeIndex, TypeRc,
};
