#![allow(dead_code)]

use clientdesk::api::{
    AccountService, ApiError, ClientMutation, DeleteClientsRequest, DeleteGroupsRequest,
    GroupMutation,
};
use clientdesk::cache::PersistentCache;
use clientdesk::panel::PanelContext;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SaveClient(ClientMutation),
    DeleteClients(DeleteClientsRequest),
    SaveGroup(GroupMutation),
    DeleteGroups(DeleteGroupsRequest),
}

#[derive(Debug, Default)]
struct FakeState {
    clients: Option<Result<Value, ApiError>>,
    groups: Option<Result<Value, ApiError>>,
    write_failure: Option<ApiError>,
    calls: Vec<Call>,
}

/// In-memory account service. Reads return whatever was configured; writes
/// are recorded and succeed unless a write failure is armed.
#[derive(Debug, Clone, Default)]
pub struct FakeAccountService {
    state: Arc<Mutex<FakeState>>,
}

pub fn transport_error() -> ApiError {
    ApiError::Transport {
        url: "http://127.0.0.1:1/stub".to_string(),
        message: "connection refused".to_string(),
    }
}

impl FakeAccountService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_clients(&self, body: Value) {
        self.state.lock().expect("lock").clients = Some(Ok(body));
    }

    pub fn fail_clients(&self) {
        self.state.lock().expect("lock").clients = Some(Err(transport_error()));
    }

    pub fn set_groups(&self, body: Value) {
        self.state.lock().expect("lock").groups = Some(Ok(body));
    }

    pub fn fail_groups(&self) {
        self.state.lock().expect("lock").groups = Some(Err(transport_error()));
    }

    pub fn fail_writes(&self, err: Option<ApiError>) {
        self.state.lock().expect("lock").write_failure = err;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().expect("lock").calls.clone()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let mut state = self.state.lock().expect("lock");
        state.calls.push(call);
        match &state.write_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl AccountService for FakeAccountService {
    fn fetch_clients(&self) -> Result<Value, ApiError> {
        self.state
            .lock()
            .expect("lock")
            .clients
            .clone()
            .unwrap_or_else(|| Ok(Value::Array(Vec::new())))
    }

    fn fetch_groups(&self) -> Result<Value, ApiError> {
        self.state
            .lock()
            .expect("lock")
            .groups
            .clone()
            .unwrap_or_else(|| Ok(Value::Array(Vec::new())))
    }

    fn save_client(&self, mutation: &ClientMutation) -> Result<(), ApiError> {
        self.record(Call::SaveClient(mutation.clone()))
    }

    fn delete_clients(&self, request: &DeleteClientsRequest) -> Result<(), ApiError> {
        self.record(Call::DeleteClients(request.clone()))
    }

    fn save_group(&self, mutation: &GroupMutation) -> Result<(), ApiError> {
        self.record(Call::SaveGroup(mutation.clone()))
    }

    fn delete_groups(&self, request: &DeleteGroupsRequest) -> Result<(), ApiError> {
        self.record(Call::DeleteGroups(request.clone()))
    }
}

pub fn fake_context(service: &FakeAccountService, state_root: &Path) -> PanelContext {
    PanelContext::new(
        "motilal",
        Arc::new(service.clone()),
        PersistentCache::new(state_root.join("cache")),
    )
    .with_log_path(state_root.join("logs/panel.log"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is json")
    }
}

pub type Route = dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync;

/// Minimal HTTP/1.1 server on an ephemeral port. Every request is recorded
/// and answered by `route`; connections are closed after one exchange.
pub fn spawn_stub_server(
    route: impl Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
) -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&recorded);
    let route: Arc<Route> = Arc::new(route);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else {
                continue;
            };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() || request_line.is_empty() {
                continue;
            }
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();

            let mut headers = BTreeMap::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read header line");
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                }
            }
            let length = headers
                .get("content-length")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0);
            let mut body = vec![0u8; length];
            reader.read_exact(&mut body).expect("read body");

            let request = RecordedRequest {
                method,
                path,
                headers,
                body: String::from_utf8_lossy(&body).to_string(),
            };
            let (status, response_body) = route(&request);
            sink.lock().expect("lock").push(request);

            let reason = if status < 300 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response_body.len(),
                response_body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    (format!("http://{addr}"), recorded)
}
