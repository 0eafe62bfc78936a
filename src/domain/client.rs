use crate::shared::serde_ext::{format_number, lenient_optional_number};
use serde::{Deserialize, Serialize};

/// One brokerage login as reported by the service. Secrets are write-only and
/// have no field here, so anything the service echoes back is dropped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Client {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub capital: Option<f64>,
    #[serde(default)]
    pub session_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    LoggingIn,
    LoggedIn,
    LoggedOut,
}

impl ClientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoggingIn => "logging…",
            Self::LoggedIn => "logged_in",
            Self::LoggedOut => "logged_out",
        }
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Client {
    pub fn identifier(&self) -> &str {
        self.userid
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(self.client_id.as_deref())
            .unwrap_or("")
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|v| !v.is_empty()).unwrap_or("-")
    }

    pub fn capital_display(&self) -> String {
        self.capital.map(format_number).unwrap_or_else(|| "-".to_string())
    }

    /// Capital as the edit form shows it; blank when unset.
    pub fn capital_input(&self) -> String {
        self.capital.map(format_number).unwrap_or_default()
    }

    pub fn status(&self, logging_in: bool) -> ClientStatus {
        if logging_in {
            ClientStatus::LoggingIn
        } else if self.session_active {
            ClientStatus::LoggedIn
        } else {
            ClientStatus::LoggedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_drops_echoed_secrets_and_accepts_string_capital() {
        let client: Client = serde_json::from_str(
            r#"{"userid":"U1","name":"Asha","capital":"50000","password":"p","mpin":"1234","session_active":true}"#,
        )
        .expect("parse client");
        assert_eq!(client.identifier(), "U1");
        assert_eq!(client.capital, Some(50000.0));
        assert_eq!(client.capital_input(), "50000");

        let encoded = serde_json::to_string(&client).expect("encode");
        assert!(!encoded.contains("password"));
        assert!(!encoded.contains("mpin"));
    }

    #[test]
    fn status_prefers_in_flight_login() {
        let client = Client {
            userid: Some("U1".to_string()),
            session_active: true,
            ..Client::default()
        };
        assert_eq!(client.status(true), ClientStatus::LoggingIn);
        assert_eq!(client.status(false), ClientStatus::LoggedIn);
        assert_eq!(Client::default().status(false), ClientStatus::LoggedOut);
    }

    #[test]
    fn display_helpers_use_dash_for_missing_values() {
        let client = Client::default();
        assert_eq!(client.display_name(), "-");
        assert_eq!(client.capital_display(), "-");
        assert_eq!(client.capital_input(), "");
    }
}
