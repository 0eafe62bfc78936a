/// Lifecycle of an add/edit modal. `Editing` carries the identity of the record
/// being edited as it was when the modal opened.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState<O> {
    #[default]
    Closed,
    Creating,
    Editing(O),
}

impl<O> ModalState<O> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    pub fn original(&self) -> Option<&O> {
        match self {
            Self::Editing(original) => Some(original),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Network,
}

/// Why the last submit did not close the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ModalFailure {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Validation,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            message: message.into(),
        }
    }

    pub fn prompt(&self) -> String {
        match self.kind {
            FailureKind::Validation => self.message.clone(),
            FailureKind::Network => format!("{} (Enter retry, Esc dismiss)", self.message),
        }
    }
}

pub(crate) fn step_index(current: usize, len: usize, step: FocusMove) -> usize {
    if len == 0 {
        return 0;
    }
    match step {
        FocusMove::Next => (current + 1) % len,
        FocusMove::Prev => (current + len - 1) % len,
    }
}
