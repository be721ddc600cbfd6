//! Common type definitions used throughout tripdesk
//!
//! This module provides newtype wrappers around UUID for type-safe identifiers,
//! plus the [`Role`] of whoever is talking to the assistant.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
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

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a Conversation
    ConversationId
);
define_id!(
    /// Unique identifier for a Message
    MessageId
);
define_id!(
    /// Unique identifier for a response Rule
    RuleId
);
define_id!(
    /// Unique identifier for a Negotiation
    NegotiationId
);
define_id!(
    /// Unique identifier for a Vendor profile
    VendorId
);

/// Who is talking to the assistant.
///
/// Each role has its own rule book; see [`crate::responder::RuleBook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Travel agent building itineraries and negotiating rates
    Agent,
    /// Traveler reviewing a trip
    Traveler,
    /// Supplier answering negotiation requests
    Vendor,
}

impl Role {
    /// All roles, in a stable order
    pub const ALL: [Role; 3] = [Role::Agent, Role::Traveler, Role::Vendor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Agent => "agent",
            Role::Traveler => "traveler",
            Role::Vendor => "vendor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
