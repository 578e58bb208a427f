#![allow(unused_macros)]

/// Declares a smart, non-owning reference to a model entity.
///
/// The generated type wraps a [`std::sync::Weak`] so that back-references (owner, namespace)
/// and usage edges (which may form cycles between methods) never keep the graph alive on
/// their own.
///
/// ```rust, ignore
///  weak_ref!(TypeRef, Type, TypeRc, "A smart reference to a [`Type`]");
///  let type_ref = TypeRef::new(&type_rc);
///  assert!(type_ref.upgrade().is_some());
/// ```
macro_rules! weak_ref {
    ($name:ident, $target:ty, $strong:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug)]
        pub struct $name {
            weak_ref: std::sync::Weak<$target>,
        }

        impl $name {
            /// Create a new reference from a strong reference
            pub fn new(strong_ref: &$strong) -> Self {
                Self {
                    weak_ref: std::sync::Arc::downgrade(strong_ref),
                }
            }

            /// Get a strong reference, returning `None` if the entity has been dropped
            #[must_use]
            pub fn upgrade(&self) -> Option<$strong> {
                self.weak_ref.upgrade()
            }

            /// Check if the referenced entity is still alive
            #[must_use]
            pub fn is_valid(&self) -> bool {
                self.weak_ref.strong_count() > 0
            }

            /// Check if this reference points at `other`
            #[must_use]
            pub fn points_to(&self, other: &$strong) -> bool {
                std::ptr::eq(self.weak_ref.as_ptr(), std::sync::Arc::as_ptr(other))
            }
        }

        impl From<$strong> for $name {
            fn from(strong_ref: $strong) -> Self {
                Self::new(&strong_ref)
            }
        }

        impl From<&$strong> for $name {
            fn from(strong_ref: &$strong) -> Self {
                Self::new(strong_ref)
            }
        }
    };
}
