use super::modal::{step_index, FailureKind, FocusMove, ModalFailure, ModalState};
use super::{Selection, WorkflowError};
use crate::api::{ApiError, GroupMutation, GroupPayload};
use crate::domain::{group_key, Group, GroupId, GroupKey};
use crate::shared::serde_ext::format_number;
use serde_json::Value;
use std::collections::BTreeMap;

pub const GROUP_NAME_REQUIRED_MESSAGE: &str = "Group name is required";
pub const MULTIPLIER_INVALID_MESSAGE: &str = "Multiplier must be a positive number";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupField {
    #[default]
    Name,
    Multiplier,
    Members,
}

pub const GROUP_FIELDS: [GroupField; 3] =
    [GroupField::Name, GroupField::Multiplier, GroupField::Members];

impl GroupField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name *",
            Self::Multiplier => "Multiplier",
            Self::Members => "Members",
        }
    }

    fn index(self) -> usize {
        GROUP_FIELDS
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupForm {
    pub id: Option<GroupId>,
    pub name: String,
    pub multiplier: String,
    pub members: BTreeMap<String, Value>,
}

impl Default for GroupForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            multiplier: "1".to_string(),
            members: BTreeMap::new(),
        }
    }
}

impl GroupForm {
    pub fn from_group(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            multiplier: format_number(group.multiplier),
            members: group.members.clone(),
        }
    }

    pub fn is_member(&self, client_key: &str) -> bool {
        self.members.contains_key(client_key)
    }
}

pub fn build_group_mutation(form: &GroupForm, editing: bool) -> Result<GroupMutation, WorkflowError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(WorkflowError::Validation(
            GROUP_NAME_REQUIRED_MESSAGE.to_string(),
        ));
    }
    let multiplier = match form.multiplier.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => {
            return Err(WorkflowError::Validation(
                MULTIPLIER_INVALID_MESSAGE.to_string(),
            ))
        }
    };

    let payload = GroupPayload {
        id: form.id.clone(),
        name: name.to_string(),
        multiplier,
        members: form.members.clone(),
    };
    Ok(if editing {
        GroupMutation::Edit(payload)
    } else {
        GroupMutation::Add(payload)
    })
}

/// Add/edit modal for groups. Membership is toggled by client key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupWorkflow {
    modal: ModalState<Option<GroupId>>,
    form: GroupForm,
    focus: GroupField,
    member_cursor: usize,
    pending: bool,
    failure: Option<ModalFailure>,
}

impl GroupWorkflow {
    pub fn modal(&self) -> &ModalState<Option<GroupId>> {
        &self.modal
    }

    pub fn form(&self) -> &GroupForm {
        &self.form
    }

    pub fn focus(&self) -> GroupField {
        self.focus
    }

    pub fn member_cursor(&self) -> usize {
        self.member_cursor
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn failure(&self) -> Option<&ModalFailure> {
        self.failure.as_ref()
    }

    pub fn title(&self) -> &'static str {
        if self.modal.is_editing() {
            "Edit Group"
        } else {
            "Add Group"
        }
    }

    fn reset(&mut self, modal: ModalState<Option<GroupId>>, form: GroupForm) {
        self.modal = modal;
        self.form = form;
        self.focus = GroupField::Name;
        self.member_cursor = 0;
        self.failure = None;
    }

    pub fn open_add(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.reset(ModalState::Creating, GroupForm::default());
        true
    }

    pub fn open_edit(&mut self, selection: &Selection<GroupKey>, groups: &[Group]) -> bool {
        if self.pending {
            return false;
        }
        let Some(selected) = selection.single() else {
            return false;
        };
        let Some(group) = groups.iter().find(|g| &group_key(g) == selected) else {
            return false;
        };
        self.reset(
            ModalState::Editing(group.id.clone()),
            GroupForm::from_group(group),
        );
        true
    }

    pub fn cancel(&mut self) -> bool {
        if self.pending || !self.modal.is_open() {
            return false;
        }
        self.reset(ModalState::Closed, GroupForm::default());
        true
    }

    fn editable(&self) -> bool {
        self.modal.is_open() && !self.pending
    }

    fn clear_validation_failure(&mut self) {
        if self
            .failure
            .as_ref()
            .is_some_and(|f| f.kind == FailureKind::Validation)
        {
            self.failure = None;
        }
    }

    pub fn set_field(&mut self, field: GroupField, value: String) -> bool {
        if !self.editable() {
            return false;
        }
        match field {
            GroupField::Name => self.form.name = value,
            GroupField::Multiplier => self.form.multiplier = value,
            GroupField::Members => return false,
        }
        self.clear_validation_failure();
        true
    }

    pub fn toggle_member(&mut self, client_key: &str) -> bool {
        if !self.editable() {
            return false;
        }
        if self.form.members.remove(client_key).is_none() {
            self.form
                .members
                .insert(client_key.to_string(), Value::Bool(true));
        }
        self.clear_validation_failure();
        true
    }

    pub fn move_focus(&mut self, step: FocusMove) {
        let next = step_index(self.focus.index(), GROUP_FIELDS.len(), step);
        self.focus = GROUP_FIELDS[next];
    }

    pub fn move_member_cursor(&mut self, step: FocusMove, member_count: usize) {
        if member_count == 0 {
            self.member_cursor = 0;
            return;
        }
        self.member_cursor = match step {
            FocusMove::Next => (self.member_cursor + 1).min(member_count - 1),
            FocusMove::Prev => self.member_cursor.saturating_sub(1),
        };
    }

    pub fn begin_submit(&mut self) -> Result<GroupMutation, WorkflowError> {
        if !self.modal.is_open() {
            return Err(WorkflowError::NotOpen("group"));
        }
        if self.pending {
            return Err(WorkflowError::Busy("group save"));
        }
        match build_group_mutation(&self.form, self.modal.is_editing()) {
            Ok(mutation) => {
                self.pending = true;
                self.failure = None;
                Ok(mutation)
            }
            Err(err) => {
                self.failure = Some(ModalFailure::validation(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn finish_submit(&mut self, result: &Result<(), ApiError>) -> bool {
        self.pending = false;
        match result {
            Ok(()) => {
                self.reset(ModalState::Closed, GroupForm::default());
                true
            }
            Err(err) => {
                self.failure = Some(ModalFailure::network(err.to_string()));
                false
            }
        }
    }

    pub fn dismiss_failure(&mut self) -> bool {
        self.failure.take().is_some()
    }
}
