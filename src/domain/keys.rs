use super::{Client, Group, GroupId};
use serde::{Deserialize, Serialize};

pub const KEY_SEPARATOR: &str = "::";
const NEW_GROUP_PREFIX: &str = "new";
const TEXT_GROUP_PREFIX: &str = "text";

macro_rules! define_key_type {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.as_str()
            }
        }
    };
}

define_key_type!(ClientKey);
define_key_type!(GroupKey);

impl ClientKey {
    pub fn new(broker: &str, identifier: &str) -> Self {
        Self(format!("{broker}{KEY_SEPARATOR}{identifier}"))
    }

    /// Broker and identifier halves of the key.
    pub fn split(&self) -> Option<(&str, &str)> {
        split_key(self.as_str())
    }

    pub fn identifier(&self) -> Option<&str> {
        self.split().map(|(_, identifier)| identifier)
    }
}

/// Composite identity of a client: `broker::userid`, falling back to the
/// legacy `client_id` field for older records.
pub fn key_of(broker: &str, client: &Client) -> ClientKey {
    ClientKey::new(broker, client.identifier())
}

/// Splits on the first separator; everything after it is the identifier.
/// Identifiers containing the separator are not supported.
pub fn split_key(raw: &str) -> Option<(&str, &str)> {
    raw.split_once(KEY_SEPARATOR)
}

/// Selection key of a group: a numeric id as-is, a text id as `text::<id>`,
/// or `new::<name>` while unsaved. Numeric and text ids never share a key.
pub fn group_key(group: &Group) -> GroupKey {
    match &group.id {
        Some(GroupId::Number(id)) => GroupKey(id.to_string()),
        Some(GroupId::Text(id)) => GroupKey(format!("{TEXT_GROUP_PREFIX}{KEY_SEPARATOR}{id}")),
        None => GroupKey(format!("{NEW_GROUP_PREFIX}{KEY_SEPARATOR}{}", group.name)),
    }
}
