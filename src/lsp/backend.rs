use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::controller::{Controller, EditorEvent};
use crate::lsp::document::DocumentState;
use crate::lsp::handlers::{HandleConfigReload, HandleEditorEvents, HandleMetrics};
use crate::lsp::protocol::{ActiveEditorParams, MetricsParams, SelectionParams};
use crate::metrics::DocumentMetrics;
use crate::watch::ConfigWatcher;
use crate::Config;

/// The editor that currently has focus, as last reported by the client
#[derive(Debug, Clone)]
pub struct ActiveEditor {
    pub uri: Url,
    /// Selections in editor coordinates, converted when counting
    pub selections: Vec<Range>,
}

/// The main LSP backend that holds state and implements the Language Server Protocol
#[derive(Clone)]
pub struct Backend {
    pub client: Client,
    pub documents: Arc<Mutex<HashMap<Url, DocumentState>>>,
    pub active_editor: Arc<Mutex<Option<ActiveEditor>>>,
    pub controller: Arc<Mutex<Controller>>,
    pub config: Arc<RwLock<Config>>,
    pub(crate) watcher: Arc<Mutex<Option<ConfigWatcher>>>,
}

impl Backend {
    pub fn new(client: Client, config: Config) -> Self {
        let controller = Controller::new(config.controller_options());

        Self {
            client,
            documents: Arc::new(Mutex::new(HashMap::new())),
            active_editor: Arc::new(Mutex::new(None)),
            controller: Arc::new(Mutex::new(controller)),
            config: Arc::new(RwLock::new(config)),
            watcher: Arc::new(Mutex::new(None)),
        }
    }

    /// `wordCount/didChangeActiveEditor`
    pub async fn did_change_active_editor(&self, params: ActiveEditorParams) {
        let editor = params.text_document.map(|doc| ActiveEditor {
            uri: doc.uri,
            selections: params.selections,
        });
        log::debug!(
            "active editor: {}",
            editor
                .as_ref()
                .map(|e| e.uri.as_str())
                .unwrap_or("<none>")
        );

        *self.active_editor.lock().await = editor;
        self.dispatch(EditorEvent::ActiveEditorChanged).await;
    }

    /// `wordCount/didChangeSelection`
    pub async fn did_change_selection(&self, params: SelectionParams) {
        {
            let mut active = self.active_editor.lock().await;
            match active.as_mut() {
                Some(editor) if editor.uri == params.text_document.uri => {
                    editor.selections = params.selections;
                }
                _ => {
                    log::debug!(
                        "selection change for inactive document {}",
                        params.text_document.uri
                    );
                    return;
                }
            }
        }

        self.dispatch(EditorEvent::SelectionChanged).await;
    }

    /// `wordCount/metrics`
    pub async fn metrics(&self, params: MetricsParams) -> LspResult<Option<DocumentMetrics>> {
        self.handle_metrics(params).await
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
        if let Some(root) = workspace_root(&params) {
            let rediscovered = self.config.write().await.rediscover(&root);
            let changed = match rediscovered {
                Ok(changed) => {
                    if changed {
                        log::info!("using project config under {}", root.display());
                    }
                    changed
                }
                Err(e) => {
                    log::warn!("Ignoring workspace config until fixed: {:#}", e);
                    true
                }
            };
            if changed {
                let options = self.config.read().await.controller_options();
                self.controller.lock().await.reconfigure(options);
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                experimental: Some(serde_json::json!({
                    "wordCount": {
                        "statusNotification": "wordCount/status",
                        "metricsRequest": crate::lsp::protocol::METRICS_REQUEST,
                    }
                })),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "wordcount-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "wordcount-language-server initialized")
            .await;

        self.start_config_watcher().await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        let update = self.controller.lock().await.teardown();
        if let Some(update) = update {
            self.publish_status(update).await;
        }

        // Dropping the watcher closes its channel and ends the reload task
        self.watcher.lock().await.take();
        Ok(())
    }

    // An opened document takes focus
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let uri = doc.uri.clone();

        let mut docs = self.documents.lock().await;
        docs.insert(
            uri.clone(),
            DocumentState::new(doc.text, doc.language_id, doc.version),
        );
        drop(docs);

        *self.active_editor.lock().await = Some(ActiveEditor {
            uri,
            selections: Vec::new(),
        });

        self.dispatch(EditorEvent::ActiveEditorChanged).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };

        let mut docs = self.documents.lock().await;
        match docs.get_mut(&uri) {
            Some(doc) => doc.replace(change.text, params.text_document.version),
            None => {
                log::warn!("didChange for unknown document {}", uri);
                return;
            }
        }
        drop(docs);

        let is_active = self
            .active_editor
            .lock()
            .await
            .as_ref()
            .is_some_and(|editor| editor.uri == uri);
        if is_active {
            self.dispatch(EditorEvent::ContentChanged).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.lock().await.remove(&uri);

        let was_active = {
            let mut active = self.active_editor.lock().await;
            if active.as_ref().is_some_and(|editor| editor.uri == uri) {
                *active = None;
                true
            } else {
                false
            }
        };
        if was_active {
            self.dispatch(EditorEvent::ActiveEditorChanged).await;
        }
    }
}

fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    if let Some(folder) = params.workspace_folders.as_ref().and_then(|f| f.first()) {
        return folder.uri.to_file_path().ok();
    }

    #[allow(deprecated)] // root_uri is still what most clients send
    let root_uri = params.root_uri.as_ref();
    root_uri.and_then(|uri| uri.to_file_path().ok())
}
