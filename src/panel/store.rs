use super::delete::{
    build_delete_clients_request, build_delete_groups_request, delete_clients_prompt,
    delete_groups_prompt,
};
use super::{
    ClientField, ClientWorkflow, FocusMove, GroupField, GroupLoad, GroupSource, GroupWorkflow,
    Selection, SelectionAffordances,
};
use crate::api::{
    ApiError, ClientMutation, DeleteClientsRequest, DeleteGroupsRequest, GroupMutation,
};
use crate::domain::{group_key, key_of, Client, ClientKey, ClientStatus, Group, GroupKey};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subtab {
    #[default]
    Clients,
    Groups,
}

impl Subtab {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Groups => "groups",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Clients => Self::Groups,
            Self::Groups => Self::Clients,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPrompt {
    DeleteClients { count: usize },
    DeleteGroups { count: usize },
}

impl ConfirmPrompt {
    pub fn text(self) -> String {
        match self {
            Self::DeleteClients { count } => delete_clients_prompt(count),
            Self::DeleteGroups { count } => delete_groups_prompt(count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything that can happen to the panel: user intents and completions of
/// effects. `update` is the only place state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelMessage {
    Mount,
    Refresh,
    ClientsLoaded {
        generation: u64,
        clients: Vec<Client>,
    },
    GroupsLoaded {
        generation: u64,
        load: GroupLoad,
    },
    SelectSubtab(Subtab),
    ToggleAllClients(bool),
    ToggleClient(ClientKey, bool),
    ToggleAllGroups(bool),
    ToggleGroup(GroupKey, bool),
    OpenAddClient,
    OpenEditClient,
    CancelClientModal,
    SetClientField(ClientField, String),
    RemapClientUserid(String),
    MoveClientFocus(FocusMove),
    SubmitClient,
    ClientSaved {
        key: ClientKey,
        result: Result<(), ApiError>,
    },
    DismissClientFailure,
    RequestDeleteClients,
    ClientsDeleted(Result<(), ApiError>),
    OpenAddGroup,
    OpenEditGroup,
    CancelGroupModal,
    SetGroupField(GroupField, String),
    ToggleGroupMember(String),
    MoveGroupFocus(FocusMove),
    MoveMemberCursor(FocusMove),
    SubmitGroup,
    GroupSaved(Result<(), ApiError>),
    DismissGroupFailure,
    RequestDeleteGroups,
    GroupsDeleted(Result<(), ApiError>),
    AcceptPrompt,
    DismissPrompt,
    GroupSnapshotStored,
}

/// Work the store asks the outside world to do. Each effect completes with
/// exactly one message.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEffect {
    LoadClients { generation: u64 },
    LoadGroups { generation: u64 },
    SaveClient { key: ClientKey, mutation: ClientMutation },
    DeleteClients(DeleteClientsRequest),
    SaveGroup(GroupMutation),
    DeleteGroups(DeleteGroupsRequest),
    StoreGroupSnapshot(Vec<Group>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    broker: String,
    subtab: Subtab,
    clients: Vec<Client>,
    groups: Vec<Group>,
    group_source: Option<GroupSource>,
    client_selection: Selection<ClientKey>,
    group_selection: Selection<GroupKey>,
    client_workflow: ClientWorkflow,
    group_workflow: GroupWorkflow,
    confirm: Option<ConfirmPrompt>,
    logging_now: BTreeSet<ClientKey>,
    delete_clients_pending: bool,
    delete_groups_pending: bool,
    client_generation: u64,
    group_generation: u64,
    clients_loading: bool,
    groups_loading: bool,
    notice: Option<Notice>,
}

impl PanelState {
    pub fn new(broker: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            subtab: Subtab::Clients,
            clients: Vec::new(),
            groups: Vec::new(),
            group_source: None,
            client_selection: Selection::default(),
            group_selection: Selection::default(),
            client_workflow: ClientWorkflow::default(),
            group_workflow: GroupWorkflow::default(),
            confirm: None,
            logging_now: BTreeSet::new(),
            delete_clients_pending: false,
            delete_groups_pending: false,
            client_generation: 0,
            group_generation: 0,
            clients_loading: false,
            groups_loading: false,
            notice: None,
        }
    }

    pub fn broker(&self) -> &str {
        &self.broker
    }

    pub fn subtab(&self) -> Subtab {
        self.subtab
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_source(&self) -> Option<GroupSource> {
        self.group_source
    }

    pub fn client_selection(&self) -> &Selection<ClientKey> {
        &self.client_selection
    }

    pub fn group_selection(&self) -> &Selection<GroupKey> {
        &self.group_selection
    }

    pub fn client_workflow(&self) -> &ClientWorkflow {
        &self.client_workflow
    }

    pub fn group_workflow(&self) -> &GroupWorkflow {
        &self.group_workflow
    }

    pub fn confirm(&self) -> Option<ConfirmPrompt> {
        self.confirm
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.clients_loading || self.groups_loading
    }

    pub fn client_key(&self, client: &Client) -> ClientKey {
        key_of(&self.broker, client)
    }

    pub fn client_keys(&self) -> Vec<ClientKey> {
        self.clients.iter().map(|c| self.client_key(c)).collect()
    }

    pub fn group_keys(&self) -> Vec<GroupKey> {
        self.groups.iter().map(group_key).collect()
    }

    pub fn client_status(&self, client: &Client) -> ClientStatus {
        client.status(self.logging_now.contains(&self.client_key(client)))
    }

    pub fn client_affordances(&self) -> SelectionAffordances {
        self.client_selection.affordances(self.clients.len())
    }

    pub fn group_affordances(&self) -> SelectionAffordances {
        self.group_selection.affordances(self.groups.len())
    }

    /// Keys offered in the group membership picker: every loaded client plus
    /// any member the form already holds that is no longer loaded.
    pub fn member_candidates(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .client_keys()
            .into_iter()
            .map(|key| key.as_str().to_string())
            .collect();
        for member in self.group_workflow.form().members.keys() {
            if !keys.contains(member) {
                keys.push(member.clone());
            }
        }
        keys
    }

    fn begin_client_load(&mut self) -> PanelEffect {
        self.client_generation += 1;
        self.clients_loading = true;
        PanelEffect::LoadClients {
            generation: self.client_generation,
        }
    }

    fn begin_group_load(&mut self) -> PanelEffect {
        self.group_generation += 1;
        self.groups_loading = true;
        PanelEffect::LoadGroups {
            generation: self.group_generation,
        }
    }

    /// A reload clears the selection an open delete prompt was counted from,
    /// so the prompt goes with it.
    fn cancel_stale_prompt(&mut self, subtab: Subtab) {
        let stale = matches!(
            (self.confirm, subtab),
            (Some(ConfirmPrompt::DeleteClients { .. }), Subtab::Clients)
                | (Some(ConfirmPrompt::DeleteGroups { .. }), Subtab::Groups)
        );
        if stale {
            self.confirm = None;
            self.notice = Some(Notice::info(format!(
                "{} reloaded; delete cancelled, select again",
                subtab.as_str()
            )));
        }
    }

    fn has_client_key(&self, key: &ClientKey) -> bool {
        self.clients.iter().any(|c| &self.client_key(c) == key)
    }

    fn has_group_key(&self, key: &GroupKey) -> bool {
        self.groups.iter().any(|g| &group_key(g) == key)
    }
}

/// Applies one message and returns the effects it requests.
pub fn update(state: &mut PanelState, message: PanelMessage) -> Vec<PanelEffect> {
    match message {
        PanelMessage::Mount | PanelMessage::Refresh => {
            vec![state.begin_client_load(), state.begin_group_load()]
        }
        PanelMessage::ClientsLoaded {
            generation,
            clients,
        } => {
            if generation != state.client_generation {
                return Vec::new();
            }
            state.clients = clients;
            state.clients_loading = false;
            state.client_selection.clear();
            state.cancel_stale_prompt(Subtab::Clients);
            Vec::new()
        }
        PanelMessage::GroupsLoaded { generation, load } => {
            if generation != state.group_generation {
                return Vec::new();
            }
            state.groups = load.groups;
            state.group_source = Some(load.source);
            state.groups_loading = false;
            state.group_selection.clear();
            state.cancel_stale_prompt(Subtab::Groups);
            match load.source {
                GroupSource::Live => vec![PanelEffect::StoreGroupSnapshot(state.groups.clone())],
                GroupSource::Cache => {
                    state.notice = Some(Notice::error(
                        "group service unreachable; showing cached groups",
                    ));
                    Vec::new()
                }
            }
        }
        PanelMessage::SelectSubtab(subtab) => {
            state.subtab = subtab;
            Vec::new()
        }
        PanelMessage::ToggleAllClients(checked) => {
            let keys = state.client_keys();
            state.client_selection.toggle_all(checked, keys);
            Vec::new()
        }
        PanelMessage::ToggleClient(key, checked) => {
            if !checked || state.has_client_key(&key) {
                state.client_selection.toggle_one(key, checked);
            }
            Vec::new()
        }
        PanelMessage::ToggleAllGroups(checked) => {
            let keys = state.group_keys();
            state.group_selection.toggle_all(checked, keys);
            Vec::new()
        }
        PanelMessage::ToggleGroup(key, checked) => {
            if !checked || state.has_group_key(&key) {
                state.group_selection.toggle_one(key, checked);
            }
            Vec::new()
        }
        PanelMessage::OpenAddClient => {
            state.client_workflow.open_add();
            Vec::new()
        }
        PanelMessage::OpenEditClient => {
            let broker = state.broker.clone();
            state
                .client_workflow
                .open_edit(&broker, &state.client_selection, &state.clients);
            Vec::new()
        }
        PanelMessage::CancelClientModal => {
            state.client_workflow.cancel();
            Vec::new()
        }
        PanelMessage::SetClientField(field, value) => {
            state.client_workflow.set_field(field, value);
            Vec::new()
        }
        PanelMessage::RemapClientUserid(userid) => {
            state.client_workflow.remap_userid(&userid);
            Vec::new()
        }
        PanelMessage::MoveClientFocus(step) => {
            state.client_workflow.move_focus(step);
            Vec::new()
        }
        PanelMessage::SubmitClient => {
            let broker = state.broker.clone();
            match state.client_workflow.begin_submit(&broker) {
                Ok(mutation) => {
                    let key = ClientKey::new(&broker, &mutation.payload().userid);
                    state.logging_now.insert(key.clone());
                    state.notice = Some(Notice::info(format!("saving and logging in {key}")));
                    vec![PanelEffect::SaveClient { key, mutation }]
                }
                Err(err) => {
                    state.notice = Some(Notice::error(err.to_string()));
                    Vec::new()
                }
            }
        }
        PanelMessage::ClientSaved { key, result } => {
            state.logging_now.remove(&key);
            if state.client_workflow.finish_submit(&result) {
                state.client_selection.clear();
                state.notice = Some(Notice::info(format!("saved {key}")));
                vec![state.begin_client_load()]
            } else {
                if let Err(err) = result {
                    state.notice = Some(Notice::error(format!("save failed: {err}")));
                }
                Vec::new()
            }
        }
        PanelMessage::DismissClientFailure => {
            state.client_workflow.dismiss_failure();
            Vec::new()
        }
        PanelMessage::RequestDeleteClients => {
            if state.client_selection.is_empty() || state.delete_clients_pending {
                return Vec::new();
            }
            state.confirm = Some(ConfirmPrompt::DeleteClients {
                count: state.client_selection.len(),
            });
            Vec::new()
        }
        PanelMessage::ClientsDeleted(result) => {
            state.delete_clients_pending = false;
            match result {
                Ok(()) => {
                    state.client_selection.clear();
                    state.notice = Some(Notice::info("deleted selected clients"));
                    vec![state.begin_client_load()]
                }
                Err(err) => {
                    state.notice = Some(Notice::error(format!("delete failed: {err}")));
                    Vec::new()
                }
            }
        }
        PanelMessage::OpenAddGroup => {
            state.group_workflow.open_add();
            Vec::new()
        }
        PanelMessage::OpenEditGroup => {
            state
                .group_workflow
                .open_edit(&state.group_selection, &state.groups);
            Vec::new()
        }
        PanelMessage::CancelGroupModal => {
            state.group_workflow.cancel();
            Vec::new()
        }
        PanelMessage::SetGroupField(field, value) => {
            state.group_workflow.set_field(field, value);
            Vec::new()
        }
        PanelMessage::ToggleGroupMember(key) => {
            state.group_workflow.toggle_member(&key);
            Vec::new()
        }
        PanelMessage::MoveGroupFocus(step) => {
            state.group_workflow.move_focus(step);
            Vec::new()
        }
        PanelMessage::MoveMemberCursor(step) => {
            let count = state.member_candidates().len();
            state.group_workflow.move_member_cursor(step, count);
            Vec::new()
        }
        PanelMessage::SubmitGroup => match state.group_workflow.begin_submit() {
            Ok(mutation) => {
                state.notice = Some(Notice::info(format!(
                    "saving group {}",
                    mutation.payload().name
                )));
                vec![PanelEffect::SaveGroup(mutation)]
            }
            Err(err) => {
                state.notice = Some(Notice::error(err.to_string()));
                Vec::new()
            }
        },
        PanelMessage::GroupSaved(result) => {
            if state.group_workflow.finish_submit(&result) {
                state.group_selection.clear();
                state.notice = Some(Notice::info("saved group"));
                vec![state.begin_group_load()]
            } else {
                if let Err(err) = result {
                    state.notice = Some(Notice::error(format!("group save failed: {err}")));
                }
                Vec::new()
            }
        }
        PanelMessage::DismissGroupFailure => {
            state.group_workflow.dismiss_failure();
            Vec::new()
        }
        PanelMessage::RequestDeleteGroups => {
            if state.group_selection.is_empty() || state.delete_groups_pending {
                return Vec::new();
            }
            state.confirm = Some(ConfirmPrompt::DeleteGroups {
                count: state.group_selection.len(),
            });
            Vec::new()
        }
        PanelMessage::GroupsDeleted(result) => {
            state.delete_groups_pending = false;
            match result {
                Ok(()) => {
                    state.group_selection.clear();
                    state.notice = Some(Notice::info("deleted selected groups"));
                    vec![state.begin_group_load()]
                }
                Err(err) => {
                    state.notice = Some(Notice::error(format!("group delete failed: {err}")));
                    Vec::new()
                }
            }
        }
        PanelMessage::AcceptPrompt => match state.confirm.take() {
            Some(ConfirmPrompt::DeleteClients { .. }) => {
                let request = build_delete_clients_request(&state.broker, &state.client_selection);
                if request.items.is_empty() {
                    state.notice = Some(Notice::error("no loaded clients selected"));
                    return Vec::new();
                }
                state.delete_clients_pending = true;
                vec![PanelEffect::DeleteClients(request)]
            }
            Some(ConfirmPrompt::DeleteGroups { .. }) => {
                let request = build_delete_groups_request(&state.group_selection, &state.groups);
                if request.items.is_empty() {
                    state.notice = Some(Notice::error("selected groups have no server id"));
                    return Vec::new();
                }
                state.delete_groups_pending = true;
                vec![PanelEffect::DeleteGroups(request)]
            }
            None => Vec::new(),
        },
        PanelMessage::DismissPrompt => {
            state.confirm = None;
            Vec::new()
        }
        PanelMessage::GroupSnapshotStored => Vec::new(),
    }
}
