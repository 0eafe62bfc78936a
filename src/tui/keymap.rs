use crate::domain::group_key;
use crate::panel::{
    ClientField, FocusMove, GroupField, PanelMessage, PanelState, Subtab,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press means in the current panel state.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyIntent {
    Quit,
    CursorUp,
    CursorDown,
    Dispatch(PanelMessage),
}

/// Highlighted row per subtab. View-only; the store never sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCursor {
    pub clients: usize,
    pub groups: usize,
}

impl RowCursor {
    pub fn get(&self, subtab: Subtab) -> usize {
        match subtab {
            Subtab::Clients => self.clients,
            Subtab::Groups => self.groups,
        }
    }

    pub fn step(&mut self, subtab: Subtab, step: FocusMove, len: usize) {
        let slot = match subtab {
            Subtab::Clients => &mut self.clients,
            Subtab::Groups => &mut self.groups,
        };
        *slot = match step {
            FocusMove::Next if len > 0 => (*slot + 1).min(len - 1),
            FocusMove::Next => 0,
            FocusMove::Prev => slot.saturating_sub(1),
        };
    }

    /// Keeps both cursors inside freshly reloaded collections.
    pub fn clamp(&mut self, clients: usize, groups: usize) {
        self.clients = self.clients.min(clients.saturating_sub(1));
        self.groups = self.groups.min(groups.saturating_sub(1));
    }
}

fn dispatch(message: PanelMessage) -> Option<KeyIntent> {
    Some(KeyIntent::Dispatch(message))
}

fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

fn edited(current: &str, key: &KeyEvent) -> Option<String> {
    if key.code == KeyCode::Backspace {
        let mut value = current.to_string();
        value.pop();
        return Some(value);
    }
    typed_char(key).map(|c| format!("{current}{c}"))
}

pub fn map_key(state: &PanelState, cursor: &RowCursor, key: KeyEvent) -> Option<KeyIntent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyIntent::Quit);
    }
    if state.confirm().is_some() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                dispatch(PanelMessage::AcceptPrompt)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                dispatch(PanelMessage::DismissPrompt)
            }
            _ => None,
        };
    }
    if state.client_workflow().is_open() {
        return map_client_modal_key(state, key);
    }
    if state.group_workflow().is_open() {
        return map_group_modal_key(state, key);
    }
    map_table_key(state, cursor, key)
}

fn map_client_modal_key(state: &PanelState, key: KeyEvent) -> Option<KeyIntent> {
    let workflow = state.client_workflow();
    match key.code {
        KeyCode::Esc if workflow.failure().is_some() => {
            dispatch(PanelMessage::DismissClientFailure)
        }
        KeyCode::Esc => dispatch(PanelMessage::CancelClientModal),
        KeyCode::Enter => dispatch(PanelMessage::SubmitClient),
        KeyCode::Tab | KeyCode::Down => dispatch(PanelMessage::MoveClientFocus(FocusMove::Next)),
        KeyCode::BackTab | KeyCode::Up => {
            dispatch(PanelMessage::MoveClientFocus(FocusMove::Prev))
        }
        _ => {
            let field: ClientField = workflow.focus();
            edited(workflow.form().value(field), &key)
                .map(|value| KeyIntent::Dispatch(PanelMessage::SetClientField(field, value)))
        }
    }
}

fn map_group_modal_key(state: &PanelState, key: KeyEvent) -> Option<KeyIntent> {
    let workflow = state.group_workflow();
    let on_members = workflow.focus() == GroupField::Members;
    match key.code {
        KeyCode::Esc if workflow.failure().is_some() => dispatch(PanelMessage::DismissGroupFailure),
        KeyCode::Esc => dispatch(PanelMessage::CancelGroupModal),
        KeyCode::Enter => dispatch(PanelMessage::SubmitGroup),
        KeyCode::Tab => dispatch(PanelMessage::MoveGroupFocus(FocusMove::Next)),
        KeyCode::BackTab => dispatch(PanelMessage::MoveGroupFocus(FocusMove::Prev)),
        KeyCode::Down if on_members => dispatch(PanelMessage::MoveMemberCursor(FocusMove::Next)),
        KeyCode::Up if on_members => dispatch(PanelMessage::MoveMemberCursor(FocusMove::Prev)),
        KeyCode::Down => dispatch(PanelMessage::MoveGroupFocus(FocusMove::Next)),
        KeyCode::Up => dispatch(PanelMessage::MoveGroupFocus(FocusMove::Prev)),
        KeyCode::Char(' ') if on_members => state
            .member_candidates()
            .get(workflow.member_cursor())
            .cloned()
            .map(|member| KeyIntent::Dispatch(PanelMessage::ToggleGroupMember(member))),
        _ if on_members => None,
        _ => {
            let field = workflow.focus();
            let current = match field {
                GroupField::Name => &workflow.form().name,
                _ => &workflow.form().multiplier,
            };
            edited(current, &key)
                .map(|value| KeyIntent::Dispatch(PanelMessage::SetGroupField(field, value)))
        }
    }
}

fn map_table_key(state: &PanelState, cursor: &RowCursor, key: KeyEvent) -> Option<KeyIntent> {
    let subtab = state.subtab();
    let row = cursor.get(subtab);
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyIntent::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(KeyIntent::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => Some(KeyIntent::CursorDown),
        KeyCode::Tab | KeyCode::BackTab => dispatch(PanelMessage::SelectSubtab(subtab.next())),
        KeyCode::Char('r') => dispatch(PanelMessage::Refresh),
        KeyCode::Char(' ') => match subtab {
            Subtab::Clients => state.clients().get(row).map(|client| {
                let key = state.client_key(client);
                let checked = !state.client_selection().contains(&key);
                KeyIntent::Dispatch(PanelMessage::ToggleClient(key, checked))
            }),
            Subtab::Groups => state.groups().get(row).map(|group| {
                let key = group_key(group);
                let checked = !state.group_selection().contains(&key);
                KeyIntent::Dispatch(PanelMessage::ToggleGroup(key, checked))
            }),
        },
        KeyCode::Char('t') => match subtab {
            Subtab::Clients => dispatch(PanelMessage::ToggleAllClients(
                !state.client_affordances().all_checked,
            )),
            Subtab::Groups => dispatch(PanelMessage::ToggleAllGroups(
                !state.group_affordances().all_checked,
            )),
        },
        KeyCode::Char('a') => match subtab {
            Subtab::Clients => dispatch(PanelMessage::OpenAddClient),
            Subtab::Groups => dispatch(PanelMessage::OpenAddGroup),
        },
        KeyCode::Char('e') => match subtab {
            Subtab::Clients if state.client_affordances().edit_enabled => {
                dispatch(PanelMessage::OpenEditClient)
            }
            Subtab::Groups if state.group_affordances().edit_enabled => {
                dispatch(PanelMessage::OpenEditGroup)
            }
            _ => None,
        },
        KeyCode::Char('d') => match subtab {
            Subtab::Clients if state.client_affordances().delete_enabled => {
                dispatch(PanelMessage::RequestDeleteClients)
            }
            Subtab::Groups if state.group_affordances().delete_enabled => {
                dispatch(PanelMessage::RequestDeleteGroups)
            }
            _ => None,
        },
        _ => None,
    }
}
