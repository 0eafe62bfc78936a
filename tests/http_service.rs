mod support;

use clientdesk::api::{
    AccountService, ApiError, ClientMutation, ClientPayload, DeleteClientItem,
    DeleteClientsRequest, DeleteGroupItem, DeleteGroupsRequest, HttpAccountService,
};
use clientdesk::domain::GroupId;
use serde_json::json;
use std::time::Duration;
use support::spawn_stub_server;

fn service(base: &str) -> HttpAccountService {
    HttpAccountService::new(base, Duration::from_secs(5))
}

fn payload() -> ClientPayload {
    ClientPayload {
        broker: "motilal".to_string(),
        userid: "U1".to_string(),
        name: None,
        capital: Some(5000.0),
        password: "p".to_string(),
        mpin: "1234".to_string(),
        original_userid: None,
    }
}

#[test]
fn reads_bypass_caches() {
    let (base, recorded) = spawn_stub_server(|_| (200, r#"[{"userid":"U1"}]"#.to_string()));
    let body = service(&base).fetch_clients().expect("fetch clients");
    assert_eq!(body, json!([{"userid": "U1"}]));

    let requests = recorded.lock().expect("lock");
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/clients");
    assert_eq!(
        requests[0].headers.get("cache-control").map(String::as_str),
        Some("no-store")
    );
}

#[test]
fn writes_post_json_to_their_endpoints() {
    let (base, recorded) = spawn_stub_server(|_| (200, r#"{"ok":true}"#.to_string()));
    let svc = service(&base);
    svc.save_client(&ClientMutation::Add(payload()))
        .expect("add");
    let mut edit = payload();
    edit.original_userid = Some("U0".to_string());
    svc.save_client(&ClientMutation::Edit(edit)).expect("edit");
    svc.delete_clients(&DeleteClientsRequest {
        items: vec![DeleteClientItem {
            broker: "motilal".to_string(),
            userid: "U1".to_string(),
        }],
    })
    .expect("delete");
    svc.delete_groups(&DeleteGroupsRequest {
        items: vec![DeleteGroupItem {
            id: GroupId::Number(4),
        }],
    })
    .expect("delete groups");

    let requests = recorded.lock().expect("lock");
    let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["/add_client", "/edit_client", "/delete_client", "/delete_group"]
    );
    assert!(requests.iter().all(|r| r.method == "POST"));
    assert_eq!(
        requests[0].json(),
        json!({"broker": "motilal", "userid": "U1", "capital": 5000.0, "password": "p", "mpin": "1234"})
    );
    assert_eq!(requests[1].json()["original_userid"], json!("U0"));
    assert_eq!(
        requests[2].json(),
        json!({"items": [{"broker": "motilal", "userid": "U1"}]})
    );
    assert_eq!(requests[3].json(), json!({"items": [{"id": 4}]}));
}

#[test]
fn non_success_status_is_a_failure() {
    let (base, _) = spawn_stub_server(|_| (500, r#"{"error":"boom"}"#.to_string()));
    let err = service(&base).fetch_groups().expect_err("status error");
    match err {
        ApiError::Status { status, detail, .. } => {
            assert_eq!(status, 500);
            assert!(detail.contains("boom"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn explicit_refusal_in_body_is_a_failure() {
    let (base, _) =
        spawn_stub_server(|_| (200, r#"{"ok":false,"message":"bad mpin"}"#.to_string()));
    let err = service(&base)
        .save_client(&ClientMutation::Add(payload()))
        .expect_err("rejected");
    assert!(matches!(err, ApiError::Rejected { ref message, .. } if message == "bad mpin"));
}

#[test]
fn unreachable_service_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let err = service(&format!("http://{addr}"))
        .fetch_clients()
        .expect_err("transport");
    assert!(matches!(err, ApiError::Transport { .. }));
}
