use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::model::{TypeRc, TypeRef};

/// Reference to a [`Field`]
pub type FieldRc = Arc<Field>;
/// A vector that holds a list of [`Field`] references
pub type FieldList = Arc<boxcar::Vec<FieldRc>>;
/// Reference to an [`Event`]
pub type EventRc = Arc<Event>;
/// A vector that holds a list of [`Event`] references
pub type EventList = Arc<boxcar::Vec<EventRc>>;

weak_ref!(
    FieldRef,
    Field,
    FieldRc,
    "A smart, non-owning reference to a [`Field`] (field usage edges)"
);

/// A field declared by a [`crate::model::Type`].
pub struct Field {
    /// The field name
    pub name: String,
    /// The type that owns this field
    owner: TypeRef,
    /// The declaring type reported by metadata, if it is part of the analyzed module
    declaring_type: Option<TypeRef>,
    /// `true` if this field is the backing storage of a same-named event
    is_event: AtomicBool,
}

impl Field {
    pub(crate) fn new(name: &str, owner: &TypeRc, declaring_type: Option<&TypeRc>) -> Self {
        Field {
            name: name.to_string(),
            owner: TypeRef::new(owner),
            declaring_type: declaring_type.map(TypeRef::new),
            is_event: AtomicBool::new(false),
        }
    }

    /// The type that owns this field
    #[must_use]
    pub fn owner(&self) -> Option<TypeRc> {
        self.owner.upgrade()
    }

    /// The declaring type, `None` if it lies outside the analyzed module
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        self.declaring_type.as_ref().and_then(TypeRef::upgrade)
    }

    /// `true` if this field is the storage behind an event of the same name
    #[must_use]
    pub fn is_event(&self) -> bool {
        self.is_event.load(Ordering::Acquire)
    }

    pub(crate) fn mark_event(&self) {
        self.is_event.store(true, Ordering::Release);
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("is_event", &self.is_event())
            .field("declaring_type", &self.declaring_type().map(|t| t.fullname()))
            .finish()
    }
}

/// An event declared by a [`crate::model::Type`].
pub struct Event {
    /// The event name
    pub name: String,
    /// The type that owns this event
    owner: TypeRef,
    /// A type of the module whose canonical name equals the event name, if any
    event_type: Option<TypeRef>,
}

impl Event {
    pub(crate) fn new(name: &str, owner: &TypeRc, event_type: Option<&TypeRc>) -> Self {
        Event {
            name: name.to_string(),
            owner: TypeRef::new(owner),
            event_type: event_type.map(TypeRef::new),
        }
    }

    /// The type that owns this event
    #[must_use]
    pub fn owner(&self) -> Option<TypeRc> {
        self.owner.upgrade()
    }

    /// The type matched to this event by name.
    ///
    /// This is a best-effort lookup of a type named like the event itself, not the event's
    /// delegate type; most events therefore report `None`.
    #[must_use]
    pub fn event_type(&self) -> Option<TypeRc> {
        self.event_type.as_ref().and_then(TypeRef::upgrade)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("event_type", &self.event_type().map(|t| t.fullname()))
            .finish()
    }
}
