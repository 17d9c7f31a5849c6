use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;

use crate::controller::{ActiveDocument, EditorEvent, StatusUpdate};
use crate::lsp::backend::{ActiveEditor, Backend};
use crate::lsp::document::DocumentState;
use crate::lsp::protocol::{MetricsParams, StatusNotification, StatusParams};
use crate::metrics::{DocumentMetrics, TextMetrics};
use crate::watch::{ConfigWatcher, WatchEvent};

/// Trait for routing editor events through the controller
#[tower_lsp::async_trait]
pub trait HandleEditorEvents {
    async fn dispatch(&self, event: EditorEvent);
    async fn refresh_status(&self);
    async fn publish_status(&self, update: StatusUpdate);
}

/// Trait for handling metrics requests
#[tower_lsp::async_trait]
pub trait HandleMetrics {
    async fn handle_metrics(&self, params: MetricsParams) -> LspResult<Option<DocumentMetrics>>;
}

/// Trait for watching and reloading the project configuration
#[tower_lsp::async_trait]
pub trait HandleConfigReload {
    async fn start_config_watcher(&self);
    async fn reload_config(&self, path: &Path);
}

/// Snapshot of the focused document, if it is open on the server
fn active_document<'a>(
    docs: &'a HashMap<Url, DocumentState>,
    editor: Option<&ActiveEditor>,
) -> Option<ActiveDocument<'a>> {
    let editor = editor?;
    let doc = docs.get(&editor.uri)?;
    Some(ActiveDocument {
        language_id: &doc.language_id,
        text: &doc.content,
        selections: doc.selection_ranges(&editor.selections),
    })
}

#[tower_lsp::async_trait]
impl HandleEditorEvents for Backend {
    /// Recompute for a subscribed event and forward any change
    async fn dispatch(&self, event: EditorEvent) {
        let update = {
            let docs = self.documents.lock().await;
            let active = self.active_editor.lock().await;
            let mut controller = self.controller.lock().await;
            controller.handle(event, active_document(&docs, active.as_ref()))
        };

        if let Some(update) = update {
            self.publish_status(update).await;
        }
    }

    /// Recompute without an event, e.g. after the configuration changed
    async fn refresh_status(&self) {
        let update = {
            let docs = self.documents.lock().await;
            let active = self.active_editor.lock().await;
            let mut controller = self.controller.lock().await;
            controller.refresh(active_document(&docs, active.as_ref()))
        };

        if let Some(update) = update {
            self.publish_status(update).await;
        }
    }

    async fn publish_status(&self, update: StatusUpdate) {
        log::debug!("status update: {:?}", update);
        self.client
            .send_notification::<StatusNotification>(StatusParams::from(update))
            .await;
    }
}

#[tower_lsp::async_trait]
impl HandleMetrics for Backend {
    async fn handle_metrics(&self, params: MetricsParams) -> LspResult<Option<DocumentMetrics>> {
        let uri = params.text_document.uri;

        let docs = self.documents.lock().await;
        let doc = match docs.get(&uri) {
            Some(doc) => doc,
            None => return Ok(None),
        };

        let active = self.active_editor.lock().await;
        let options = self.controller.lock().await.options().clone();

        // Selections are only known for the focused editor
        let selections = match active.as_ref() {
            Some(editor) if editor.uri == uri && options.track_selection => {
                doc.selection_ranges(&editor.selections)
            }
            _ => Vec::new(),
        };

        Ok(Some(
            TextMetrics::new(options.count).compute_document(&doc.content, &selections),
        ))
    }
}

#[tower_lsp::async_trait]
impl HandleConfigReload for Backend {
    async fn start_config_watcher(&self) {
        let path = self.config.read().await.watch_target();

        let (watcher, mut rx) = match ConfigWatcher::start(&path) {
            Ok(started) => started,
            Err(e) => {
                log::warn!("Config watching disabled: {:#}", e);
                return;
            }
        };
        *self.watcher.lock().await = Some(watcher);
        self.client
            .log_message(
                MessageType::INFO,
                format!("Watching {} for config changes", path.display()),
            )
            .await;

        let backend = self.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    WatchEvent::ConfigChanged(path) => {
                        backend.reload_config(&path).await;
                    }
                    WatchEvent::WatcherError(e) => {
                        log::error!("Config watcher error: {}", e);
                        backend
                            .client
                            .log_message(
                                MessageType::ERROR,
                                format!("Config file watcher error: {}", e),
                            )
                            .await;
                    }
                }
            }
        });
    }

    /// Re-read the config file after a change on disk. The fallback rules
    /// live in [`crate::Config::reload_project`].
    async fn reload_config(&self, path: &Path) {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                log::error!("Failed to read config {}: {}", path.display(), e);
                return;
            }
        };

        let reloaded = {
            let mut config = self.config.write().await;
            config
                .reload_project(path, content.as_deref())
                .map(|()| config.controller_options())
        };
        let options = match reloaded {
            Ok(options) => options,
            Err(e) => {
                let message = format!("Invalid config, keeping previous settings: {:#}", e);
                log::error!("{}", message);
                self.client.log_message(MessageType::ERROR, message).await;
                return;
            }
        };
        self.controller.lock().await.reconfigure(options);

        self.client
            .log_message(
                MessageType::INFO,
                format!("Reloaded config from {}", path.display()),
            )
            .await;
        self.refresh_status().await;
    }
}
