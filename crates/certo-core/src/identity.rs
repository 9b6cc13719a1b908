//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout Certo. Each
//! identifier is a distinct type — you cannot pass a [`CourseId`] where a
//! [`UserId`] is expected.
//!
//! All identifiers wrap a UUID and are always valid by construction. The
//! learning platform owns user, course, module, and lesson identity; this
//! subsystem owns only [`CredentialId`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id! {
    /// A learner registered with the learning platform.
    UserId
}

uuid_id! {
    /// A course in the learning platform's catalog.
    CourseId
}

uuid_id! {
    /// A module within a course (an ordered group of lessons).
    ModuleId
}

uuid_id! {
    /// A single lesson within a course module. Completion facts are
    /// reported per lesson id by the Progress Source.
    LessonId
}

uuid_id! {
    /// A credential minted by this subsystem. Assigned once at creation,
    /// immutable thereafter.
    CredentialId
}
