//! Runtime bridge between the controller's command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ApiClientError, ContactsApi};
use crossbeam_channel::{Receiver, Sender};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

/// Starts the backend worker thread. Every command runs as its own task, so
/// a list fetch and a stats fetch queued together proceed concurrently.
pub fn launch(
    api: Arc<dyn ContactsApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let api = Arc::clone(&api);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = execute(api.as_ref(), cmd).await;
                    if ui_tx.try_send(event).is_err() {
                        tracing::warn!("ui event queue unavailable; dropping backend result");
                    }
                });
            }
            tracing::debug!("backend command queue closed; worker exiting");
        });
    })
}

fn failure(context: UiErrorContext, err: &ApiClientError) -> UiError {
    UiError::from_message(context, err.user_message())
}

pub async fn execute(api: &dyn ContactsApi, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::FetchContacts { request_id, query } => {
            tracing::info!(
                request_id = request_id.0,
                page = query.page,
                limit = query.limit,
                "backend: list_contacts"
            );
            match api.get_all(&query).await {
                Ok(body) => UiEvent::ContactsLoaded { request_id, body },
                Err(err) => {
                    tracing::error!(request_id = request_id.0, "backend: list_contacts failed: {err}");
                    UiEvent::ContactsFailed {
                        request_id,
                        error: failure(UiErrorContext::FetchContacts, &err),
                    }
                }
            }
        }
        BackendCommand::FetchStats { request_id } => {
            tracing::info!(request_id = request_id.0, "backend: contact_stats");
            match api.get_stats().await {
                Ok(body) => UiEvent::StatsLoaded { request_id, body },
                Err(err) => {
                    tracing::error!(request_id = request_id.0, "backend: contact_stats failed: {err}");
                    UiEvent::StatsFailed {
                        request_id,
                        error: failure(UiErrorContext::FetchStats, &err),
                    }
                }
            }
        }
        BackendCommand::FetchContact { id } => {
            tracing::info!(contact_id = %id, "backend: get_contact");
            let server_id = match id.require_server_id() {
                Ok(server_id) => server_id,
                Err(err) => return UiEvent::ActionFailed(UiError::from_validation(&err)),
            };
            match api.get_by_id(server_id).await {
                Ok(body) => UiEvent::ContactLoaded { body },
                Err(err) => {
                    tracing::error!(contact_id = %id, "backend: get_contact failed: {err}");
                    UiEvent::ActionFailed(failure(UiErrorContext::FetchContact, &err))
                }
            }
        }
        BackendCommand::Search { query } => {
            tracing::info!("backend: search_contacts");
            match api.search(&query).await {
                Ok(body) => UiEvent::SearchLoaded { query, body },
                Err(err) => {
                    tracing::error!("backend: search_contacts failed: {err}");
                    UiEvent::ActionFailed(failure(UiErrorContext::Search, &err))
                }
            }
        }
        BackendCommand::CreateContact { draft } => {
            tracing::info!("backend: create_contact");
            match api.create(&draft).await {
                Ok(body) => UiEvent::ContactCreated { body },
                Err(err) => {
                    tracing::error!("backend: create_contact failed: {err}");
                    UiEvent::ActionFailed(failure(UiErrorContext::CreateContact, &err))
                }
            }
        }
        BackendCommand::UpdateContact { id, update } => {
            tracing::info!(contact_id = %id, "backend: update_contact");
            let server_id = match id.require_server_id() {
                Ok(server_id) => server_id,
                Err(err) => return UiEvent::ActionFailed(UiError::from_validation(&err)),
            };
            match api.update(server_id, &update).await {
                Ok(_) => UiEvent::ContactUpdated { id },
                Err(err) => {
                    tracing::error!(contact_id = %id, "backend: update_contact failed: {err}");
                    UiEvent::ActionFailed(failure(UiErrorContext::UpdateContact, &err))
                }
            }
        }
        BackendCommand::DeleteContact { id } => {
            tracing::info!(contact_id = %id, "backend: delete_contact");
            let server_id = match id.require_server_id() {
                Ok(server_id) => server_id,
                Err(err) => return UiEvent::ActionFailed(UiError::from_validation(&err)),
            };
            match api.delete(server_id).await {
                Ok(_) => UiEvent::ContactDeleted { id },
                Err(err) => {
                    tracing::error!(contact_id = %id, "backend: delete_contact failed: {err}");
                    UiEvent::ActionFailed(failure(UiErrorContext::DeleteContact, &err))
                }
            }
        }
        BackendCommand::BulkDelete { ids } => {
            tracing::info!(count = ids.len(), "backend: bulk_delete");
            let server_ids: Result<Vec<String>, _> = ids
                .iter()
                .map(|id| id.require_server_id().map(str::to_string))
                .collect();
            let server_ids = match server_ids {
                Ok(server_ids) => server_ids,
                Err(err) => return UiEvent::ActionFailed(UiError::from_validation(&err)),
            };
            match api.bulk_delete(&server_ids).await {
                Ok(_) => UiEvent::ContactsBulkDeleted { ids },
                Err(err) => {
                    tracing::error!(count = ids.len(), "backend: bulk_delete failed: {err}");
                    UiEvent::ActionFailed(failure(UiErrorContext::BulkDelete, &err))
                }
            }
        }
        BackendCommand::Export { query } => {
            tracing::info!("backend: export_contacts");
            match api.export(&query).await {
                Ok(body) => UiEvent::Exported { body },
                Err(err) => {
                    tracing::error!("backend: export_contacts failed: {err}");
                    UiEvent::ActionFailed(failure(UiErrorContext::Export, &err))
                }
            }
        }
        BackendCommand::Import { payload } => {
            tracing::info!("backend: import_contacts");
            match api.import(&payload).await {
                Ok(body) => UiEvent::Imported { body },
                Err(err) => {
                    tracing::error!("backend: import_contacts failed: {err}");
                    UiEvent::ActionFailed(failure(UiErrorContext::Import, &err))
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
