mod support;

use clientdesk::api::{ClientMutation, DeleteClientItem, GroupMutation};
use clientdesk::app::command_support::CliSession;
use clientdesk::domain::{ClientKey, ClientStatus, GroupId, GroupKey};
use clientdesk::panel::{
    dispatch, ClientField, ConfirmPrompt, EffectRunner, FailureKind, GroupField, NoticeLevel,
    PanelEffect, PanelMessage, PanelState,
};
use serde_json::json;
use std::collections::BTreeSet;
use support::{fake_context, transport_error, Call, FakeAccountService};
use tempfile::tempdir;

fn session_with(service: &FakeAccountService, root: &std::path::Path) -> CliSession {
    let mut session = CliSession::new(fake_context(service, root));
    session.mount();
    session
}

fn roster() -> serde_json::Value {
    json!([
        {"userid": "U1", "name": "Alice", "capital": 100000, "session_active": true},
        {"userid": "U2", "name": "Bob", "capital": "2500.5"},
        {"client_id": "C3", "name": "Carol"}
    ])
}

#[test]
fn mount_loads_both_collections_and_keys_are_injective() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(json!({"clients": roster()}));
    service.set_groups(json!({"groups": [{"id": 7, "name": "G", "multiplier": "2"}]}));

    let session = session_with(&service, dir.path());
    let keys: BTreeSet<ClientKey> = session.state.client_keys().into_iter().collect();
    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&ClientKey::new("motilal", "C3")));
    assert_eq!(session.state.groups().len(), 1);
    assert_eq!(session.state.groups()[0].multiplier, 2.0);
}

#[test]
fn selection_stays_subset_of_loaded_keys_across_reload() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(roster());
    let mut session = session_with(&service, dir.path());

    session.send(PanelMessage::ToggleAllClients(true));
    assert_eq!(session.state.client_selection().len(), 3);

    service.set_clients(json!([{"userid": "U9"}]));
    session.send(PanelMessage::Refresh);
    let loaded: BTreeSet<ClientKey> = session.state.client_keys().into_iter().collect();
    assert!(session.state.client_selection().is_subset_of(&loaded));
    assert!(session.state.client_selection().is_empty());
}

#[test]
fn toggle_all_is_idempotent_and_reversible() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(roster());
    let mut session = session_with(&service, dir.path());

    session.send(PanelMessage::ToggleAllClients(true));
    let first = session.state.client_selection().clone();
    session.send(PanelMessage::ToggleAllClients(true));
    assert_eq!(session.state.client_selection(), &first);
    assert!(session.state.client_affordances().all_checked);

    session.send(PanelMessage::ToggleAllClients(false));
    assert!(session.state.client_selection().is_empty());
}

#[test]
fn affordance_boundaries_follow_selection_size() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(roster());
    let mut session = session_with(&service, dir.path());

    let none = session.state.client_affordances();
    assert!(!none.edit_enabled && !none.delete_enabled);

    session.send(PanelMessage::ToggleClient(ClientKey::new("motilal", "U1"), true));
    let one = session.state.client_affordances();
    assert!(one.edit_enabled && one.delete_enabled);

    session.send(PanelMessage::ToggleClient(ClientKey::new("motilal", "U2"), true));
    let two = session.state.client_affordances();
    assert!(!two.edit_enabled && two.delete_enabled);
}

#[test]
fn add_client_omits_blank_optionals_and_reloads_on_success() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    let mut session = session_with(&service, dir.path());

    session.send(PanelMessage::OpenAddClient);
    session.send(PanelMessage::SetClientField(ClientField::Userid, "U1".to_string()));
    session.send(PanelMessage::SetClientField(ClientField::Password, "p".to_string()));
    session.send(PanelMessage::SetClientField(ClientField::Mpin, "1234".to_string()));
    service.set_clients(json!([{"userid": "U1"}]));
    session.send(PanelMessage::SubmitClient);

    let calls = service.calls();
    let [Call::SaveClient(ClientMutation::Add(payload))] = calls.as_slice() else {
        panic!("unexpected calls {calls:?}");
    };
    let body = serde_json::to_value(payload).expect("encode");
    assert_eq!(
        body,
        json!({"broker": "motilal", "userid": "U1", "password": "p", "mpin": "1234"})
    );
    assert!(!session.state.client_workflow().is_open());
    assert_eq!(session.state.clients().len(), 1);
}

#[test]
fn edit_client_carries_original_identifier() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(roster());
    let mut session = session_with(&service, dir.path());

    session.send(PanelMessage::ToggleClient(ClientKey::new("motilal", "U1"), true));
    session.send(PanelMessage::OpenEditClient);
    assert_eq!(session.state.client_workflow().form().name, "Alice");
    assert_eq!(session.state.client_workflow().form().password, "");
    session.send(PanelMessage::SetClientField(ClientField::Password, "p".to_string()));
    session.send(PanelMessage::SetClientField(ClientField::Mpin, "9".to_string()));
    session.send(PanelMessage::SubmitClient);

    let calls = service.calls();
    let [Call::SaveClient(ClientMutation::Edit(payload))] = calls.as_slice() else {
        panic!("unexpected calls {calls:?}");
    };
    assert_eq!(payload.original_userid.as_deref(), Some("U1"));
    assert_eq!(payload.userid, "U1");
}

#[test]
fn failed_save_keeps_modal_open_with_retry() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.fail_writes(Some(transport_error()));
    let mut session = session_with(&service, dir.path());

    session.send(PanelMessage::OpenAddClient);
    session.send(PanelMessage::SetClientField(ClientField::Userid, "U1".to_string()));
    session.send(PanelMessage::SetClientField(ClientField::Password, "p".to_string()));
    session.send(PanelMessage::SetClientField(ClientField::Mpin, "1".to_string()));
    session.send(PanelMessage::SubmitClient);

    let workflow = session.state.client_workflow();
    assert!(workflow.is_open());
    assert!(!workflow.is_pending());
    assert_eq!(workflow.failure().map(|f| f.kind), Some(FailureKind::Network));

    service.fail_writes(None);
    session.send(PanelMessage::SubmitClient);
    assert!(!session.state.client_workflow().is_open());
    assert_eq!(service.calls().len(), 2);
}

#[test]
fn missing_required_fields_never_reach_the_service() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    let mut session = session_with(&service, dir.path());

    session.send(PanelMessage::OpenAddClient);
    session.send(PanelMessage::SetClientField(ClientField::Userid, "U1".to_string()));
    session.send(PanelMessage::SubmitClient);

    assert!(service.calls().is_empty());
    assert_eq!(
        session.state.client_workflow().failure().map(|f| f.kind),
        Some(FailureKind::Validation)
    );
}

#[test]
fn delete_batch_sends_each_selected_key_once() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(roster());
    let mut session = session_with(&service, dir.path());

    session.send(PanelMessage::ToggleClient(ClientKey::new("motilal", "U1"), true));
    session.send(PanelMessage::ToggleClient(ClientKey::new("motilal", "U2"), true));
    session.send(PanelMessage::ToggleClient(ClientKey::new("motilal", "U2"), true));
    session.send(PanelMessage::RequestDeleteClients);
    assert_eq!(
        session.state.confirm(),
        Some(ConfirmPrompt::DeleteClients { count: 2 })
    );
    session.send(PanelMessage::AcceptPrompt);

    let calls = service.calls();
    let [Call::DeleteClients(request)] = calls.as_slice() else {
        panic!("unexpected calls {calls:?}");
    };
    let items: Vec<&DeleteClientItem> = request.items.iter().collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].userid, "U1");
    assert_eq!(items[1].userid, "U2");
    assert!(items.iter().all(|item| item.broker == "motilal"));
    assert!(session.state.client_selection().is_empty());
}

#[test]
fn failed_delete_surfaces_error_and_keeps_selection() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(roster());
    let mut session = session_with(&service, dir.path());
    service.fail_writes(Some(transport_error()));

    session.send(PanelMessage::ToggleClient(ClientKey::new("motilal", "U1"), true));
    session.send(PanelMessage::RequestDeleteClients);
    session.send(PanelMessage::AcceptPrompt);

    assert_eq!(session.state.client_selection().len(), 1);
    assert_eq!(
        session.state.notice().map(|n| n.level),
        Some(NoticeLevel::Error)
    );
}

#[test]
fn saving_client_shows_logging_status_until_completion() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(json!([{"userid": "U1", "session_active": false}]));
    let mut state = PanelState::new("motilal");
    let mut runner = EffectRunner::new(fake_context(&service, dir.path()));
    dispatch(&mut state, &mut runner, PanelMessage::Mount);
    clientdesk::panel::run_until_idle(&mut state, &mut runner);

    state_open_edit(&mut state, &mut runner);
    let effects = clientdesk::panel::update(&mut state, PanelMessage::SubmitClient);
    let [PanelEffect::SaveClient { key, .. }] = effects.as_slice() else {
        panic!("unexpected effects {effects:?}");
    };
    let client = state.clients()[0].clone();
    assert_eq!(state.client_status(&client), ClientStatus::LoggingIn);
    assert_eq!(ClientStatus::LoggingIn.as_str(), "logging…");

    clientdesk::panel::update(
        &mut state,
        PanelMessage::ClientSaved {
            key: key.clone(),
            result: Err(transport_error()),
        },
    );
    assert_eq!(state.client_status(&client), ClientStatus::LoggedOut);
}

fn state_open_edit(state: &mut PanelState, runner: &mut EffectRunner) {
    dispatch(
        state,
        runner,
        PanelMessage::ToggleClient(ClientKey::new("motilal", "U1"), true),
    );
    dispatch(state, runner, PanelMessage::OpenEditClient);
    dispatch(
        state,
        runner,
        PanelMessage::SetClientField(ClientField::Password, "p".to_string()),
    );
    dispatch(
        state,
        runner,
        PanelMessage::SetClientField(ClientField::Mpin, "1".to_string()),
    );
}

#[test]
fn group_add_edit_and_delete_flow() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(roster());
    service.set_groups(json!([
        {"id": 1, "name": "G1", "multiplier": 2, "members": {"motilal::U1": true}},
        {"name": "Draft"}
    ]));
    let mut session = session_with(&service, dir.path());

    session.send(PanelMessage::OpenAddGroup);
    session.send(PanelMessage::SetGroupField(GroupField::Name, "Swing".to_string()));
    session.send(PanelMessage::SetGroupField(GroupField::Multiplier, "1.5".to_string()));
    session.send(PanelMessage::ToggleGroupMember("motilal::U2".to_string()));
    session.send(PanelMessage::SubmitGroup);
    assert!(!session.state.group_workflow().is_open());

    session.send(PanelMessage::ToggleGroup(GroupKey::from_raw("1"), true));
    session.send(PanelMessage::OpenEditGroup);
    assert_eq!(session.state.group_workflow().form().name, "G1");
    session.send(PanelMessage::ToggleGroupMember("motilal::U1".to_string()));
    session.send(PanelMessage::SubmitGroup);

    session.send(PanelMessage::ToggleAllGroups(true));
    session.send(PanelMessage::RequestDeleteGroups);
    session.send(PanelMessage::AcceptPrompt);

    let calls = service.calls();
    assert_eq!(calls.len(), 3, "{calls:?}");
    let Call::SaveGroup(GroupMutation::Add(added)) = &calls[0] else {
        panic!("expected add, got {:?}", calls[0]);
    };
    assert_eq!(added.multiplier, 1.5);
    assert!(added.members.contains_key("motilal::U2"));
    let Call::SaveGroup(GroupMutation::Edit(edited)) = &calls[1] else {
        panic!("expected edit, got {:?}", calls[1]);
    };
    assert!(edited.members.is_empty());
    let Call::DeleteGroups(request) = &calls[2] else {
        panic!("expected delete, got {:?}", calls[2]);
    };
    assert_eq!(request.items.len(), 1);
}

#[test]
fn numeric_and_text_group_ids_select_independently() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_groups(json!([
        {"id": 7, "name": "Numeric"},
        {"id": "7", "name": "Text"}
    ]));
    let mut session = session_with(&service, dir.path());
    assert_eq!(session.state.group_keys().len(), 2);

    session.send(PanelMessage::ToggleAllGroups(true));
    assert!(session.state.group_affordances().all_checked);
    session.send(PanelMessage::ToggleAllGroups(false));

    session.send(PanelMessage::ToggleGroup(GroupKey::from_raw("7"), true));
    session.send(PanelMessage::RequestDeleteGroups);
    assert_eq!(
        session.state.confirm(),
        Some(ConfirmPrompt::DeleteGroups { count: 1 })
    );
    session.send(PanelMessage::AcceptPrompt);

    let calls = service.calls();
    let [Call::DeleteGroups(request)] = calls.as_slice() else {
        panic!("expected one delete, got {calls:?}");
    };
    assert_eq!(request.items.len(), 1);
    assert_eq!(request.items[0].id, GroupId::Number(7));
}

#[test]
fn unsaved_groups_sharing_a_name_load_once() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_groups(json!([{"name": "Draft"}, {"name": "Draft", "multiplier": 3}]));
    let mut session = session_with(&service, dir.path());

    assert_eq!(session.state.groups().len(), 1);
    assert_eq!(session.state.groups()[0].multiplier, 1.0);
    session.send(PanelMessage::ToggleAllGroups(true));
    assert!(session.state.group_affordances().all_checked);
    let log = std::fs::read_to_string(dir.path().join("logs/panel.log")).expect("log written");
    assert!(log.contains("groups.duplicate_key"));
}

#[test]
fn concurrent_loads_complete_independently() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(roster());
    service.fail_groups();
    let session = session_with(&service, dir.path());

    assert_eq!(session.state.clients().len(), 3);
    assert!(session.state.groups().is_empty());
    assert!(!session.state.is_loading());
    assert_eq!(session.runner.in_flight(), 0);
}

#[test]
fn revoked_runner_drops_late_completions() {
    let dir = tempdir().expect("tempdir");
    let service = FakeAccountService::new();
    service.set_clients(roster());
    let mut state = PanelState::new("motilal");
    let mut runner = EffectRunner::new(fake_context(&service, dir.path()));
    dispatch(&mut state, &mut runner, PanelMessage::Mount);
    runner.shutdown();

    std::thread::sleep(std::time::Duration::from_millis(50));
    assert!(runner.try_next().is_none());
    assert!(runner.next_blocking().is_none());
    assert!(state.clients().is_empty());
}
