//! Panel state: the loaders that mirror server-owned collections, the
//! selection model, the mutation workflows and the store that ties them
//! together.

pub mod client_workflow;
pub mod context;
pub mod delete;
pub mod error;
pub mod executor;
pub mod group_workflow;
pub mod loader;
pub mod modal;
pub mod selection;
pub mod store;

pub use client_workflow::{ClientField, ClientForm, ClientWorkflow, CLIENT_FIELDS};
pub use context::PanelContext;
pub use error::WorkflowError;
pub use executor::{dispatch, run_effect, run_until_idle, EffectRunner, LiveToken};
pub use group_workflow::{GroupField, GroupForm, GroupWorkflow, GROUP_FIELDS};
pub use loader::{
    fetch_group_load, load_clients, load_groups, normalize_sequence, store_group_snapshot,
    GroupLoad, GroupSource,
};
pub use modal::{FailureKind, FocusMove, ModalFailure, ModalState};
pub use selection::{Selection, SelectionAffordances};
pub use store::{update, ConfirmPrompt, Notice, NoticeLevel, PanelEffect, PanelMessage, PanelState, Subtab};
