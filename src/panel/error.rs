use crate::api::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),
    #[error("a {0} request is already in progress")]
    Busy(&'static str),
    #[error("no {0} form is open")]
    NotOpen(&'static str),
    #[error(transparent)]
    Network(#[from] ApiError),
}
