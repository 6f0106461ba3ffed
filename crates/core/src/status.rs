//! Status helper enums mapping to SMALLSERIAL lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding lookup table (`project_statuses`,
//! `segment_statuses`, `file_kinds`).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::StatusId;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        $(#[$meta])*
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed-data order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database status ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                Self::ALL.iter().copied().find(|s| s.id() == id)
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = CoreError;

            fn try_from(id: StatusId) -> Result<Self, Self::Error> {
                Self::from_id(id).ok_or_else(|| {
                    CoreError::Internal(format!(
                        "Unknown {} id {id}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

define_status_enum! {
    /// Project ownership lifecycle status.
    ///
    /// Only the claim lifecycle commands may change a project's status.
    #[serde(rename_all = "snake_case")]
    ProjectStatus {
        Unclaimed = 1,
        Claimed = 2,
        Completed = 3,
    }
}

define_status_enum! {
    /// Translation status of a single segment.
    SegmentStatus {
        /// Machine translated, untouched by a human.
        #[serde(rename = "MT")]
        Mt = 1,
        /// Pre-filled from a fuzzy translation-memory match.
        Fuzzy = 2,
        /// Pre-filled from an exact translation-memory match.
        #[serde(rename = "100%")]
        ExactMatch = 3,
        Edited = 4,
        Reviewed = 5,
        Rejected = 6,
    }
}

define_status_enum! {
    /// Role of a file within a project.
    #[serde(rename_all = "snake_case")]
    FileKind {
        /// Translatable deliverable. Counts towards statistics.
        Work = 1,
        /// Supporting material. Never counted.
        Reference = 2,
    }
}

impl SegmentStatus {
    /// Wire label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Mt => "MT",
            Self::Fuzzy => "Fuzzy",
            Self::ExactMatch => "100%",
            Self::Edited => "Edited",
            Self::Reviewed => "Reviewed",
            Self::Rejected => "Rejected",
        }
    }
}
