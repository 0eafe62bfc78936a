use crate::shared::serde_ext::{format_number, lenient_optional_number};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_MULTIPLIER: f64 = 1.0;

fn default_multiplier() -> f64 {
    DEFAULT_MULTIPLIER
}

fn multiplier_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_number(deserializer)?.unwrap_or(DEFAULT_MULTIPLIER))
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GroupId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// A named set of clients traded with a common multiplier. `members` is keyed
/// by client composite key; its values are opaque to the panel.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<GroupId>,
    #[serde(default)]
    pub name: String,
    #[serde(
        default = "default_multiplier",
        deserialize_with = "multiplier_or_default"
    )]
    pub multiplier: f64,
    #[serde(default)]
    pub members: BTreeMap<String, Value>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            multiplier: DEFAULT_MULTIPLIER,
            members: BTreeMap::new(),
        }
    }
}

impl Group {
    pub fn multiplier_display(&self) -> String {
        format_number(self.multiplier)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
