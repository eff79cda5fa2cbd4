//! Typed ID wrappers for flow, node, edge, and session identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed ID wrappers prevent mixing up flow ids, node ids, session ids, etc.
/// These are plain strings underneath — no UUID enforcement, no format
/// requirement. The runtime doesn't care what your ids look like, only that
/// they're stable and unique within their namespace.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new typed id from anything that converts to String.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

typed_id!(FlowId, "Unique identifier for a flow definition.");
typed_id!(NodeId, "Unique identifier for a node within a flow.");
typed_id!(EdgeId, "Unique identifier for an edge within a flow.");
typed_id!(SessionId, "Unique identifier for a conversation session.");
