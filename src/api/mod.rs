//! Typed access to the account/session service.

pub mod endpoints;
pub mod error;
pub mod http;
pub mod payload;

pub use endpoints::Endpoint;
pub use error::ApiError;
pub use http::HttpAccountService;
pub use payload::{
    ClientMutation, ClientPayload, DeleteClientItem, DeleteClientsRequest, DeleteGroupItem,
    DeleteGroupsRequest, GroupMutation, GroupPayload,
};

use serde_json::Value;

/// The remote service as the panel sees it. Reads return the raw JSON body so
/// that shape normalization happens in one place, at the loader boundary.
pub trait AccountService: Send + Sync {
    fn fetch_clients(&self) -> Result<Value, ApiError>;
    fn fetch_groups(&self) -> Result<Value, ApiError>;
    fn save_client(&self, mutation: &ClientMutation) -> Result<(), ApiError>;
    fn delete_clients(&self, request: &DeleteClientsRequest) -> Result<(), ApiError>;
    fn save_group(&self, mutation: &GroupMutation) -> Result<(), ApiError>;
    fn delete_groups(&self, request: &DeleteGroupsRequest) -> Result<(), ApiError>;
}
