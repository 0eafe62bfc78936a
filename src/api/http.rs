use super::{
    AccountService, ApiError, ClientMutation, DeleteClientsRequest, DeleteGroupsRequest, Endpoint,
    GroupMutation,
};
use crate::config::Settings;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const MAX_ERROR_DETAIL_CHARS: usize = 200;

/// Blocking HTTP client for the account/session service.
#[derive(Debug, Clone)]
pub struct HttpAccountService {
    api_base: String,
    agent: ureq::Agent,
}

fn truncate_detail(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= MAX_ERROR_DETAIL_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
    out.push('…');
    out
}

fn request_error(url: &str, err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => ApiError::Status {
            url: url.to_string(),
            status,
            detail: truncate_detail(&response.into_string().unwrap_or_default()),
        },
        ureq::Error::Transport(transport) => ApiError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}

/// A 2xx body may still carry an explicit refusal such as
/// `{"ok": false, "error": "..."}`. Empty or non-JSON bodies count as success.
fn check_acknowledgement(url: &str, body: &str) -> Result<(), ApiError> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return Ok(());
    };
    let refused = ["ok", "success"]
        .iter()
        .any(|field| map.get(*field) == Some(&Value::Bool(false)));
    if !refused {
        return Ok(());
    }
    let message = ["error", "message", "detail"]
        .iter()
        .find_map(|field| map.get(*field).and_then(Value::as_str))
        .unwrap_or("service refused the request");
    Err(ApiError::Rejected {
        url: url.to_string(),
        message: message.to_string(),
    })
}

impl HttpAccountService {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            api_base: api_base.into(),
            agent,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_base.clone(), settings.request_timeout())
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn get_json(&self, endpoint: Endpoint) -> Result<Value, ApiError> {
        let url = endpoint.url(&self.api_base);
        let response = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .set("Cache-Control", "no-store")
            .set("Pragma", "no-cache")
            .call()
            .map_err(|e| request_error(&url, e))?;

        response.into_json::<Value>().map_err(|e| ApiError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })
    }

    fn post_json<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<(), ApiError> {
        let url = endpoint.url(&self.api_base);
        let body = serde_json::to_value(body).map_err(|e| ApiError::Encode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        let response = self
            .agent
            .post(&url)
            .set("Accept", "application/json")
            .send_json(body)
            .map_err(|e| request_error(&url, e))?;

        let text = response.into_string().map_err(|e| ApiError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        check_acknowledgement(&url, &text)
    }
}

impl AccountService for HttpAccountService {
    fn fetch_clients(&self) -> Result<Value, ApiError> {
        self.get_json(Endpoint::Clients)
    }

    fn fetch_groups(&self) -> Result<Value, ApiError> {
        self.get_json(Endpoint::Groups)
    }

    fn save_client(&self, mutation: &ClientMutation) -> Result<(), ApiError> {
        self.post_json(mutation.endpoint(), mutation.payload())
    }

    fn delete_clients(&self, request: &DeleteClientsRequest) -> Result<(), ApiError> {
        self.post_json(Endpoint::DeleteClient, request)
    }

    fn save_group(&self, mutation: &GroupMutation) -> Result<(), ApiError> {
        self.post_json(mutation.endpoint(), mutation.payload())
    }

    fn delete_groups(&self, request: &DeleteGroupsRequest) -> Result<(), ApiError> {
        self.post_json(Endpoint::DeleteGroup, request)
    }
}
