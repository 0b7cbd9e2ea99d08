//! Backend-to-UI events and error modeling for the contacts controller.

use serde_json::Value;
use shared::{domain::ContactId, error::ValidationError};

use crate::{controller::state::RequestId, ui::messages};

#[derive(Debug)]
pub enum UiEvent {
    ContactsLoaded {
        request_id: RequestId,
        body: Value,
    },
    ContactsFailed {
        request_id: RequestId,
        error: UiError,
    },
    StatsLoaded {
        request_id: RequestId,
        body: Value,
    },
    StatsFailed {
        request_id: RequestId,
        error: UiError,
    },
    ContactLoaded {
        body: Value,
    },
    SearchLoaded {
        query: String,
        body: Value,
    },
    ContactCreated {
        body: Value,
    },
    ContactUpdated {
        id: ContactId,
    },
    ContactDeleted {
        id: ContactId,
    },
    ContactsBulkDeleted {
        ids: Vec<ContactId>,
    },
    Exported {
        body: Value,
    },
    Imported {
        body: Value,
    },
    ActionFailed(UiError),
    /// Not tied to a queued command: the worker could not start.
    BackendUnavailable(UiError),
}

impl UiEvent {
    /// Whether this event is the single reply to a dispatched command.
    pub fn completes_command(&self) -> bool {
        !matches!(self, Self::BackendUnavailable(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FetchContacts,
    FetchStats,
    FetchContact,
    Search,
    CreateContact,
    UpdateContact,
    DeleteContact,
    BulkDelete,
    Export,
    Import,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Blank messages fall back to the generic failure text for the context.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            messages::failure_fallback(context).to_string()
        } else {
            message
        };
        Self { context, message }
    }

    pub fn from_validation(err: &ValidationError) -> Self {
        Self {
            context: UiErrorContext::Validation,
            message: messages::validation_message(err),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
