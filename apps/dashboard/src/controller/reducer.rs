//! The contacts list controller: state transitions driven by user actions and
//! backend events. Transitions that need network I/O return the commands to
//! queue; nothing here blocks or performs I/O itself.

use serde_json::Value;
use shared::{
    domain::{Contact, ContactId, ContactStats},
    error::ValidationError,
    protocol::{ContactDraft, ContactUpdate, ExportQuery, ListQuery},
};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{UiError, UiEvent},
        normalize::{normalize_contact_page, normalize_single_contact, normalize_stats},
        state::{CreateForm, FilterKey, FilterState, Pagination, RequestTracker, RowMenu, RowsPerPage, Selection},
    },
    ui::messages,
};

/// Interactive yes/no prompt shown before destructive actions.
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirmer for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Default)]
pub struct ContactsDashboard {
    contacts: Vec<Contact>,
    stats: ContactStats,
    search: String,
    filters: FilterState,
    pagination: Pagination,
    selection: Selection,
    row_menu: RowMenu,
    create_form: CreateForm,
    requests: RequestTracker,
    /// Query inputs changed since the last refresh.
    dirty: bool,
    banner: Option<UiError>,
    alert: Option<UiError>,
    notice: Option<String>,
    detail: Option<Contact>,
    search_results: Option<(String, Vec<Contact>)>,
    last_export: Option<Value>,
}

impl ContactsDashboard {
    pub fn new(rows_per_page: RowsPerPage) -> Self {
        Self {
            pagination: Pagination {
                rows_per_page,
                ..Pagination::default()
            },
            ..Self::default()
        }
    }

    // ---- read access -------------------------------------------------

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn stats(&self) -> ContactStats {
        self.stats
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn row_menu(&self) -> &RowMenu {
        &self.row_menu
    }

    pub fn create_form(&self) -> &CreateForm {
        &self.create_form
    }

    pub fn is_loading(&self) -> bool {
        self.requests.list_in_flight()
    }

    pub fn stats_loading(&self) -> bool {
        self.requests.stats_in_flight()
    }

    pub fn banner(&self) -> Option<&UiError> {
        self.banner.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn detail(&self) -> Option<&Contact> {
        self.detail.as_ref()
    }

    pub fn search_results(&self) -> Option<(&str, &[Contact])> {
        self.search_results
            .as_ref()
            .map(|(query, contacts)| (query.as_str(), contacts.as_slice()))
    }

    pub fn last_export(&self) -> Option<&Value> {
        self.last_export.as_ref()
    }

    /// Blocking alert raised by a failed action; taking it dismisses it.
    pub fn take_alert(&mut self) -> Option<UiError> {
        self.alert.take()
    }

    /// True when every row on the loaded page is selected.
    pub fn select_all(&self) -> bool {
        !self.contacts.is_empty() && self.contacts.iter().all(|c| self.selection.contains(&c.id))
    }

    pub fn bulk_actions_available(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Query for `GET /contacts`: paging plus every constrained filter.
    pub fn list_query(&self) -> ListQuery {
        let search = self.search.trim();
        ListQuery {
            page: self.pagination.current_page,
            limit: self.pagination.rows_per_page.get(),
            search: (!search.is_empty()).then(|| search.to_string()),
            source: self.filters.source.clone(),
            temperature: self.filters.temperature,
            stage: self.filters.stage.clone(),
            group: self.filters.group.clone(),
            sort_by: self.filters.sort_by.clone(),
        }
    }

    /// Export forwards only the source and temperature filters.
    pub fn export_query(&self) -> ExportQuery {
        ExportQuery {
            source: self.filters.source.clone(),
            temperature: self.filters.temperature,
        }
    }

    // ---- fetching ----------------------------------------------------

    /// Initial load.
    pub fn mount(&mut self) -> Vec<BackendCommand> {
        self.refresh()
    }

    /// Fetches the current page and the stats; both run concurrently.
    pub fn refresh(&mut self) -> Vec<BackendCommand> {
        self.dirty = false;
        self.banner = None;
        vec![
            BackendCommand::FetchContacts {
                request_id: self.requests.begin_list(),
                query: self.list_query(),
            },
            BackendCommand::FetchStats {
                request_id: self.requests.begin_stats(),
            },
        ]
    }

    pub fn retry(&mut self) -> Vec<BackendCommand> {
        self.refresh()
    }

    /// Refreshes if any query input changed since the last fetch.
    pub fn sync(&mut self) -> Vec<BackendCommand> {
        if self.dirty {
            self.refresh()
        } else {
            Vec::new()
        }
    }

    // ---- query inputs ------------------------------------------------

    pub fn set_search(&mut self, text: &str) {
        if self.search != text {
            self.search = text.to_string();
            self.reset_to_first_page();
        }
    }

    pub fn set_filter(&mut self, key: FilterKey, value: &str) -> Result<(), ValidationError> {
        let before = self.filters.clone();
        self.filters.set(key, value)?;
        if self.filters != before {
            self.reset_to_first_page();
        }
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        if !self.filters.is_unconstrained() {
            self.filters = FilterState::default();
            self.reset_to_first_page();
        }
    }

    pub fn set_rows_per_page(&mut self, rows: RowsPerPage) {
        if self.pagination.rows_per_page != rows {
            self.pagination.rows_per_page = rows;
            self.reset_to_first_page();
        }
    }

    /// Moves to `page`, clamped to the pages the last response reported.
    pub fn set_page(&mut self, page: u32) {
        let page = self.pagination.clamp_page(page);
        if page != self.pagination.current_page {
            self.pagination.current_page = page;
            self.dirty = true;
        }
    }

    pub fn next_page(&mut self) {
        self.set_page(self.pagination.current_page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.pagination.current_page.saturating_sub(1));
    }

    fn reset_to_first_page(&mut self) {
        self.pagination.current_page = 1;
        self.dirty = true;
    }

    // ---- selection and row menu --------------------------------------

    /// Adds `id` to the selection; selecting it again keeps it selected.
    pub fn select(&mut self, id: ContactId) {
        self.selection.insert(id);
    }

    pub fn toggle_select(&mut self, id: ContactId) {
        self.selection.toggle(id);
    }

    pub fn toggle_select_all(&mut self) {
        if self.select_all() {
            self.selection.clear();
        } else {
            self.selection
                .replace_with(self.contacts.iter().map(|c| c.id.clone()));
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn toggle_row_menu(&mut self, id: ContactId) {
        self.row_menu.toggle(id);
    }

    pub fn close_row_menu(&mut self) {
        self.row_menu = RowMenu::Closed;
    }

    // ---- actions -----------------------------------------------------

    pub fn view_details(&mut self, id: ContactId) -> Vec<BackendCommand> {
        self.close_row_menu();
        if let Err(err) = id.require_server_id() {
            return self.reject(&err);
        }
        vec![BackendCommand::FetchContact { id }]
    }

    pub fn quick_search(&mut self, query: &str) -> Vec<BackendCommand> {
        let query = query.trim();
        if query.is_empty() {
            self.search_results = None;
            return Vec::new();
        }
        vec![BackendCommand::Search {
            query: query.to_string(),
        }]
    }

    pub fn delete_one(&mut self, id: ContactId, confirmer: &dyn Confirmer) -> Vec<BackendCommand> {
        if let Err(err) = id.require_server_id() {
            return self.reject(&err);
        }
        if !confirmer.confirm(messages::CONFIRM_DELETE_ONE) {
            return Vec::new();
        }
        vec![BackendCommand::DeleteContact { id }]
    }

    /// Deletes every selected contact in one request. Does nothing with an
    /// empty selection.
    pub fn delete_selected(&mut self, confirmer: &dyn Confirmer) -> Vec<BackendCommand> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let ids: Vec<ContactId> = self.selection.ids().cloned().collect();
        if let Some(err) = ids.iter().find_map(|id| id.require_server_id().err()) {
            return self.reject(&err);
        }
        if !confirmer.confirm(&messages::confirm_bulk_delete(ids.len())) {
            return Vec::new();
        }
        vec![BackendCommand::BulkDelete { ids }]
    }

    pub fn export_current(&mut self) -> Vec<BackendCommand> {
        vec![BackendCommand::Export {
            query: self.export_query(),
        }]
    }

    pub fn import_contacts(&mut self, payload: Value) -> Vec<BackendCommand> {
        vec![BackendCommand::Import { payload }]
    }

    pub fn update_contact(&mut self, id: ContactId, update: ContactUpdate) -> Vec<BackendCommand> {
        self.close_row_menu();
        if let Err(err) = id.require_server_id() {
            return self.reject(&err);
        }
        if update.is_empty() {
            return Vec::new();
        }
        vec![BackendCommand::UpdateContact { id, update }]
    }

    pub fn open_create_form(&mut self) {
        self.create_form.open = true;
    }

    pub fn close_create_form(&mut self) {
        self.create_form.reset();
    }

    pub fn edit_draft(&mut self, edit: impl FnOnce(&mut ContactDraft)) {
        edit(&mut self.create_form.draft);
    }

    pub fn create_contact(&mut self) -> Vec<BackendCommand> {
        let draft = &self.create_form.draft;
        if let Err(err) = draft.validate() {
            return self.reject(&err);
        }
        vec![BackendCommand::CreateContact {
            draft: draft.normalized(),
        }]
    }

    fn reject(&mut self, err: &ValidationError) -> Vec<BackendCommand> {
        self.alert = Some(UiError::from_validation(err));
        Vec::new()
    }

    // ---- backend events ----------------------------------------------

    /// Folds a backend event into state and returns any follow-up commands.
    pub fn apply(&mut self, event: UiEvent) -> Vec<BackendCommand> {
        match event {
            UiEvent::ContactsLoaded { request_id, body } => {
                if !self.requests.finish_list(request_id) {
                    tracing::debug!(request_id = request_id.0, "dropping stale contacts response");
                    return Vec::new();
                }
                let page = normalize_contact_page(&body);
                self.contacts = page.contacts;
                self.pagination.total_count = page.total_count;
                Vec::new()
            }
            UiEvent::ContactsFailed { request_id, error } => {
                if self.requests.finish_list(request_id) {
                    self.banner = Some(error);
                } else {
                    tracing::debug!(request_id = request_id.0, "dropping stale contacts failure");
                }
                Vec::new()
            }
            UiEvent::StatsLoaded { request_id, body } => {
                if self.requests.finish_stats(request_id) {
                    self.stats = normalize_stats(&body);
                } else {
                    tracing::debug!(request_id = request_id.0, "dropping stale stats response");
                }
                Vec::new()
            }
            UiEvent::StatsFailed { request_id, error } => {
                if self.requests.finish_stats(request_id) {
                    tracing::warn!(error = error.message(), "contact stats unavailable");
                }
                Vec::new()
            }
            UiEvent::ContactLoaded { body } => {
                self.detail = normalize_single_contact(&body);
                Vec::new()
            }
            UiEvent::SearchLoaded { query, body } => {
                let page = normalize_contact_page(&body);
                self.search_results = Some((query, page.contacts));
                Vec::new()
            }
            UiEvent::ContactCreated { .. } => {
                self.create_form.reset();
                self.refresh()
            }
            UiEvent::ContactUpdated { id } => {
                if self.detail.as_ref().is_some_and(|d| d.id == id) {
                    self.detail = None;
                }
                self.refresh()
            }
            UiEvent::ContactDeleted { id } => {
                self.contacts.retain(|c| c.id != id);
                self.selection.remove(&id);
                self.close_row_menu();
                self.refresh()
            }
            UiEvent::ContactsBulkDeleted { ids } => {
                self.contacts.retain(|c| !ids.contains(&c.id));
                self.selection.clear();
                self.refresh()
            }
            UiEvent::Exported { body } => {
                self.last_export = Some(body);
                self.notice = Some(messages::EXPORT_COMPLETE.to_string());
                Vec::new()
            }
            UiEvent::Imported { .. } => self.refresh(),
            UiEvent::ActionFailed(error) => {
                self.alert = Some(error);
                Vec::new()
            }
            UiEvent::BackendUnavailable(error) => {
                self.banner = Some(error);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
