//! Backend commands queued from the controller to the backend worker.

use serde_json::Value;
use shared::{
    domain::ContactId,
    protocol::{ContactDraft, ContactUpdate, ExportQuery, ListQuery},
};

use crate::controller::state::RequestId;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    FetchContacts {
        request_id: RequestId,
        query: ListQuery,
    },
    FetchStats {
        request_id: RequestId,
    },
    FetchContact {
        id: ContactId,
    },
    Search {
        query: String,
    },
    CreateContact {
        draft: ContactDraft,
    },
    UpdateContact {
        id: ContactId,
        update: ContactUpdate,
    },
    DeleteContact {
        id: ContactId,
    },
    BulkDelete {
        ids: Vec<ContactId>,
    },
    Export {
        query: ExportQuery,
    },
    Import {
        payload: Value,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchContacts { .. } => "fetch_contacts",
            Self::FetchStats { .. } => "fetch_stats",
            Self::FetchContact { .. } => "fetch_contact",
            Self::Search { .. } => "search",
            Self::CreateContact { .. } => "create_contact",
            Self::UpdateContact { .. } => "update_contact",
            Self::DeleteContact { .. } => "delete_contact",
            Self::BulkDelete { .. } => "bulk_delete",
            Self::Export { .. } => "export",
            Self::Import { .. } => "import",
        }
    }
}
