//! The code model: namespaces, types, members and method usage edges.
//!
//! A [`Module`] owns its [`Namespace`]s, each namespace owns its [`Type`]s and each type owns
//! its fields, events, methods and nested types. Every link pointing back up the tree
//! (owners, declaring types) and every usage edge is a non-owning reference, so the graph can
//! contain cycles (two methods calling each other) without keeping itself alive.
//!
//! # Key Components
//!
//! - [`Module`] - Root of the model, namespace lookup and the [`TypeIndex`]
//! - [`Namespace`] - Named group of types, nested types included
//! - [`Type`] - A type with its members; identified by its canonical [`Type::fullname`]
//! - [`Field`], [`Event`] - Data members; a field backing an event is flagged
//! - [`Method`] - Canonical signature plus its [`MethodUses`]
//! - [`ModelStats`] - Element and edge counts of a module
//!
//! # Examples
//!
//! ```rust
//! use cilgraph::{
//!     metadata::raw::{RawField, RawModule, RawTypeDef},
//!     ModelBuilder,
//! };
//!
//! let widget = RawTypeDef::new("Acme", "Widget");
//! let widget = widget.clone().with_field(RawField::new(widget.to_ref(), "size"));
//! let module = ModelBuilder::new().build(&RawModule::new("Acme.dll").with_type(widget))?;
//!
//! let widget = module.find_type("Acme.Widget").expect("type was built");
//! assert!(widget.find_field("size").is_some());
//! assert_eq!(module.stats().fields, 1);
//! # Ok::<(), cilgraph::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! All model types are `Send + Sync`. The collections are append-only and are filled while
//! the module is built; a module returned by the builder is read-only.

mod index;
mod members;
mod method;
mod module;
mod namespace;
mod stats;
mod types;

pub use index::TypeIndex;
pub use members::{Event, EventList, EventRc, Field, FieldList, FieldRc, FieldRef};
pub use method::{Method, MethodList, MethodRc, MethodRef, MethodUses};
pub use module::{Module, ModuleRc, ModuleRef};
pub use namespace::{Namespace, NamespaceList, NamespaceRc, NamespaceRef};
pub use stats::ModelStats;
pub use types::{Type, TypeList, TypeRc, TypeRef};
