//! Decoded metadata input and the naming rules used to match it.
//!
//! This module contains everything the builder consumes: the raw definitions produced by a
//! binary metadata reader, the decoded instruction streams of method bodies, and the name
//! canonicalizer which turns raw declarations into comparable lookup keys.
//!
//! # Key Components
//!
//! - [`raw`] - Raw module, type, field, event and method definitions plus the
//!   [`raw::MetadataSource`] trait implemented by readers
//! - [`instruction`] - Decoded instructions, operands and the operand chase
//! - [`naming`] - Canonical type, namespace and method signature names
//!
//! # Examples
//!
//! ```rust
//! use cilgraph::metadata::{naming, raw::RawTypeDef};
//!
//! let map = RawTypeDef::new("Acme.Collections", "Map`2").with_generic_params(["K", "V"]);
//! assert_eq!(naming::type_name(&map), "Map<K,V>");
//! assert_eq!(naming::fullname(&map), "Acme.Collections.Map<K,V>");
//! ```

/// Decoded instructions and operand resolution
pub mod instruction;
/// Canonical names for types and methods
pub mod naming;
/// Raw definitions handed over by a metadata reader
pub mod raw;
