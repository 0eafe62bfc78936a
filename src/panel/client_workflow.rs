use super::modal::{step_index, FocusMove, ModalFailure, ModalState};
use super::{Selection, WorkflowError};
use crate::api::{ApiError, ClientMutation, ClientPayload};
use crate::domain::{key_of, Client, ClientKey};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Client ID, Password and MPIN are required";
pub const CAPITAL_NOT_NUMBER_MESSAGE: &str = "Capital must be a number";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientField {
    #[default]
    Name,
    Userid,
    Password,
    Mpin,
    Capital,
}

pub const CLIENT_FIELDS: [ClientField; 5] = [
    ClientField::Name,
    ClientField::Userid,
    ClientField::Password,
    ClientField::Mpin,
    ClientField::Capital,
];

impl ClientField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Userid => "Client ID *",
            Self::Password => "Password *",
            Self::Mpin => "MPIN *",
            Self::Capital => "Capital",
        }
    }

    pub fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::Mpin)
    }

    fn index(self) -> usize {
        CLIENT_FIELDS
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

/// Raw modal input. Values are kept exactly as typed until submit.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientForm {
    pub name: String,
    pub userid: String,
    pub password: String,
    pub mpin: String,
    pub capital: String,
}

impl std::fmt::Debug for ClientForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientForm")
            .field("name", &self.name)
            .field("userid", &self.userid)
            .field("password_set", &!self.password.is_empty())
            .field("mpin_set", &!self.mpin.is_empty())
            .field("capital", &self.capital)
            .finish()
    }
}

impl ClientForm {
    /// Pre-fill for editing. Secrets are never pre-filled.
    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.clone().unwrap_or_default(),
            userid: client.identifier().to_string(),
            password: String::new(),
            mpin: String::new(),
            capital: client.capital_input(),
        }
    }

    pub fn value(&self, field: ClientField) -> &str {
        match field {
            ClientField::Name => &self.name,
            ClientField::Userid => &self.userid,
            ClientField::Password => &self.password,
            ClientField::Mpin => &self.mpin,
            ClientField::Capital => &self.capital,
        }
    }

    fn value_mut(&mut self, field: ClientField) -> &mut String {
        match field {
            ClientField::Name => &mut self.name,
            ClientField::Userid => &mut self.userid,
            ClientField::Password => &mut self.password,
            ClientField::Mpin => &mut self.mpin,
            ClientField::Capital => &mut self.capital,
        }
    }
}

/// Validates the form and builds the add or edit call. Passing the original
/// identifier selects `edit_client` and lets the service rename the record.
pub fn build_client_mutation(
    broker: &str,
    form: &ClientForm,
    original_userid: Option<&str>,
) -> Result<ClientMutation, WorkflowError> {
    if form.userid.is_empty() || form.password.is_empty() || form.mpin.is_empty() {
        return Err(WorkflowError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
    }

    let capital = match form.capital.trim() {
        "" => None,
        raw => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                return Err(WorkflowError::Validation(
                    CAPITAL_NOT_NUMBER_MESSAGE.to_string(),
                ))
            }
        },
    };
    let name = Some(form.name.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let payload = ClientPayload {
        broker: broker.to_string(),
        userid: form.userid.clone(),
        name,
        capital,
        password: form.password.clone(),
        mpin: form.mpin.clone(),
        original_userid: original_userid.map(str::to_string),
    };
    Ok(match original_userid {
        Some(_) => ClientMutation::Edit(payload),
        None => ClientMutation::Add(payload),
    })
}

/// Add/edit modal for client credentials ("Save & Login").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientWorkflow {
    modal: ModalState<String>,
    form: ClientForm,
    focus: ClientField,
    pending: bool,
    failure: Option<ModalFailure>,
}

impl ClientWorkflow {
    pub fn modal(&self) -> &ModalState<String> {
        &self.modal
    }

    pub fn form(&self) -> &ClientForm {
        &self.form
    }

    pub fn focus(&self) -> ClientField {
        self.focus
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

    pub fn title(&self, broker: &str) -> String {
        let verb = if self.modal.is_editing() {
            "Edit Client"
        } else {
            "Add Client"
        };
        format!("{verb} ({})", capitalize(broker))
    }

    fn reset(&mut self, modal: ModalState<String>, form: ClientForm) {
        self.modal = modal;
        self.form = form;
        self.focus = ClientField::Name;
        self.failure = None;
    }

    /// Opens an empty form. Ignored while a save is outstanding.
    pub fn open_add(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.reset(ModalState::Creating, ClientForm::default());
        true
    }

    /// Opens the form for the single selected client; a no-op for any other
    /// selection size or when the selected row is not loaded.
    pub fn open_edit(
        &mut self,
        broker: &str,
        selection: &Selection<ClientKey>,
        clients: &[Client],
    ) -> bool {
        if self.pending {
            return false;
        }
        let Some(selected) = selection.single() else {
            return false;
        };
        let Some(row) = clients.iter().find(|c| &key_of(broker, c) == selected) else {
            return false;
        };
        let form = ClientForm::from_client(row);
        self.reset(ModalState::Editing(form.userid.clone()), form);
        true
    }

    pub fn cancel(&mut self) -> bool {
        if self.pending || !self.modal.is_open() {
            return false;
        }
        self.reset(ModalState::Closed, ClientForm::default());
        true
    }

    /// Updates one field. The identifier is read-only while editing.
    pub fn set_field(&mut self, field: ClientField, value: String) -> bool {
        if !self.modal.is_open() || self.pending {
            return false;
        }
        if field == ClientField::Userid && self.modal.is_editing() {
            return false;
        }
        let value = if field == ClientField::Userid {
            value.trim().to_string()
        } else {
            value
        };
        *self.form.value_mut(field) = value;
        if self
            .failure
            .as_ref()
            .is_some_and(|f| f.kind == super::FailureKind::Validation)
        {
            self.failure = None;
        }
        true
    }

    /// Explicit rename of the record being edited. The original identifier is
    /// still sent so the service can remap it.
    pub fn remap_userid(&mut self, new_userid: &str) -> bool {
        if !self.modal.is_editing() || self.pending {
            return false;
        }
        self.form.userid = new_userid.trim().to_string();
        true
    }

    pub fn move_focus(&mut self, step: FocusMove) {
        let next = step_index(self.focus.index(), CLIENT_FIELDS.len(), step);
        self.focus = CLIENT_FIELDS[next];
    }

    /// Validates and marks the workflow pending. Validation failures keep the
    /// modal open and are recorded for display.
    pub fn begin_submit(&mut self, broker: &str) -> Result<ClientMutation, WorkflowError> {
        if !self.modal.is_open() {
            return Err(WorkflowError::NotOpen("client"));
        }
        if self.pending {
            return Err(WorkflowError::Busy("client save"));
        }
        match build_client_mutation(broker, &self.form, self.modal.original().map(String::as_str))
        {
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

    /// Applies the service outcome. Success closes the modal; failure keeps
    /// it open with the reason so the user can retry or dismiss.
    pub fn finish_submit(&mut self, result: &Result<(), ApiError>) -> bool {
        self.pending = false;
        match result {
            Ok(()) => {
                self.reset(ModalState::Closed, ClientForm::default());
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

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
