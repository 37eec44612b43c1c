//! Strongly-typed identifiers for journal records
//!
//! Every list in the journal document gets its own id type so that, for
//! example, a buddy id can never be passed to `remove_if_then`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a logged relapse
    RelapseId
);
uuid_id!(
    /// Identifier of an if-then rule
    RuleId
);
uuid_id!(
    /// Identifier of a buddy contact
    BuddyId
);
uuid_id!(
    /// Identifier of a daily check-in
    CheckInId
);
uuid_id!(
    /// Identifier of a tracked urge
    UrgeId
);
