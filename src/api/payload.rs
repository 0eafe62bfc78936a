use super::Endpoint;
use crate::domain::GroupId;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Body of `add_client` / `edit_client`. Blank optional fields are omitted
/// rather than sent as empty values.
#[derive(Clone, PartialEq, Serialize)]
pub struct ClientPayload {
    pub broker: String,
    pub userid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital: Option<f64>,
    pub password: String,
    pub mpin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_userid: Option<String>,
}

impl std::fmt::Debug for ClientPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientPayload")
            .field("broker", &self.broker)
            .field("userid", &self.userid)
            .field("name", &self.name)
            .field("capital", &self.capital)
            .field("password", &"<redacted>")
            .field("mpin", &"<redacted>")
            .field("original_userid", &self.original_userid)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMutation {
    Add(ClientPayload),
    Edit(ClientPayload),
}

impl ClientMutation {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Add(_) => Endpoint::AddClient,
            Self::Edit(_) => Endpoint::EditClient,
        }
    }

    pub fn payload(&self) -> &ClientPayload {
        match self {
            Self::Add(payload) | Self::Edit(payload) => payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DeleteClientItem {
    pub broker: String,
    pub userid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteClientsRequest {
    pub items: Vec<DeleteClientItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<GroupId>,
    pub name: String,
    pub multiplier: f64,
    pub members: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupMutation {
    Add(GroupPayload),
    Edit(GroupPayload),
}

impl GroupMutation {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Add(_) => Endpoint::AddGroup,
            Self::Edit(_) => Endpoint::EditGroup,
        }
    }

    pub fn payload(&self) -> &GroupPayload {
        match self {
            Self::Add(payload) | Self::Edit(payload) => payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteGroupItem {
    pub id: GroupId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteGroupsRequest {
    pub items: Vec<DeleteGroupItem>,
}
