// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # cilgraph
//!
//! A code-model builder and usage-graph extractor for decoded .NET metadata.
//!
//! Given the types, members and instruction streams a metadata reader decoded from a
//! compiled module, `cilgraph` rebuilds a navigable object model (module, namespaces,
//! types, fields, events and methods) and derives the *usage edges* of every method: which
//! types, methods and fields it references. The resulting graph is the input for code
//! metrics such as coupling, fan-in/fan-out or cohesion.
//!
//! ## Identity by name
//!
//! Decoded metadata has no identifier that survives the rebuild, so every cross-reference
//! is resolved by canonical name:
//!
//! - Types are keyed by `Namespace.Name`, where nested types render as `Outer+Inner` and
//!   generic types as `Map<K,V>` (see [`metadata::naming`])
//! - Methods are keyed by their signature `Name(T1, T2)` within their type
//! - References to anything outside the decoded module simply do not resolve; they are not
//!   an error
//!
//! ## Quick Start
//!
//! ```rust
//! use cilgraph::prelude::*;
//!
//! let widget = RawTypeDef::new("Acme", "Widget");
//! let owner = widget.to_ref();
//! let size = RawFieldRef::new(owner.clone(), "size");
//! let body = vec![
//!     RawInstruction::new(0, "ldfld", Some(RawOperand::Field(size))),
//!     RawInstruction::new(5, "ret", None),
//! ];
//! let widget = widget
//!     .with_field(RawField::new(owner.clone(), "size"))
//!     .with_method(RawMethod::new(owner, "GetSize", Vec::<String>::new()).with_body(body));
//!
//! let module = ModelBuilder::new().build(&RawModule::new("Acme.dll").with_type(widget))?;
//!
//! let widget = module.find_type("Acme.Widget").expect("type was built");
//! let get_size = widget.find_method("GetSize()").expect("method was built");
//! assert_eq!(get_size.field_uses()[0].name, "size");
//! # Ok::<(), cilgraph::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - The decoded input: [`metadata::raw`] definitions, [`metadata::instruction`]
//!   streams and the [`metadata::naming`] rules
//! - [`builder`] - The staged [`ModelBuilder`] and its [`BuildConfig`]
//! - [`model`] - The resulting code model and its queries
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The builder emits [`tracing`](https://docs.rs/tracing) events: one `info` summary per
//! build, `debug` events per stage and `trace` events for every reference that did not
//! resolve. Installing a subscriber is left to the application.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use cilgraph::prelude::*;
///
/// let module = ModelBuilder::new().build(&RawModule::new("Empty.dll"))?;
/// assert_eq!(module.stats(), ModelStats::default());
/// # Ok::<(), cilgraph::Error>(())
/// ```
pub mod prelude;

pub mod builder;
pub mod metadata;
pub mod model;

/// `cilgraph` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cilgraph` Error type
///
/// Every fallible operation of this crate reports one of its variants.
pub use error::Error;

pub use builder::{BuildConfig, ModelBuilder};
