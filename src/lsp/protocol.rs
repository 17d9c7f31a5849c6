//! Custom protocol extensions.
//!
//! Plain LSP has no notion of the focused editor or its selection, so the
//! client extension reports both with these notifications, and the server
//! answers with `wordCount/status`.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::{Range, TextDocumentIdentifier};

use crate::controller::StatusUpdate;
use crate::metrics::DocumentMetrics;

pub const DID_CHANGE_ACTIVE_EDITOR: &str = "wordCount/didChangeActiveEditor";
pub const DID_CHANGE_SELECTION: &str = "wordCount/didChangeSelection";
pub const METRICS_REQUEST: &str = "wordCount/metrics";

/// `wordCount/didChangeActiveEditor`. A missing document means no editor
/// has focus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEditorParams {
    #[serde(default)]
    pub text_document: Option<TextDocumentIdentifier>,
    #[serde(default)]
    pub selections: Vec<Range>,
}

/// `wordCount/didChangeSelection`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionParams {
    pub text_document: TextDocumentIdentifier,
    #[serde(default)]
    pub selections: Vec<Range>,
}

/// `wordCount/metrics` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsParams {
    pub text_document: TextDocumentIdentifier,
}

/// Payload of `wordCount/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusParams {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<DocumentMetrics>,
}

impl From<StatusUpdate> for StatusParams {
    fn from(update: StatusUpdate) -> Self {
        match update {
            StatusUpdate::Show { text, metrics } => Self {
                visible: true,
                text: Some(text),
                metrics: Some(metrics),
            },
            StatusUpdate::Hide => Self {
                visible: false,
                text: None,
                metrics: None,
            },
        }
    }
}

/// Server-to-client status bar update
pub enum StatusNotification {}

impl Notification for StatusNotification {
    type Params = StatusParams;
    const METHOD: &'static str = "wordCount/status";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;

    #[test]
    fn show_serializes_text_and_metrics() {
        let params = StatusParams::from(StatusUpdate::Show {
            text: "$(pencil) 2 Words | 9 Chars".to_string(),
            metrics: DocumentMetrics {
                total: Metrics {
                    characters: 9,
                    words: 2,
                },
                selected: Metrics::default(),
            },
        });
        let json = serde_json::to_value(&params).expect("serialize");
        assert_eq!(json["visible"], true);
        assert_eq!(json["text"], "$(pencil) 2 Words | 9 Chars");
        assert_eq!(json["metrics"]["total"]["words"], 2);
        assert_eq!(json["metrics"]["selected"]["characters"], 0);
    }

    #[test]
    fn hide_omits_text() {
        let json =
            serde_json::to_value(StatusParams::from(StatusUpdate::Hide)).expect("serialize");
        assert_eq!(json, serde_json::json!({ "visible": false }));
    }

    #[test]
    fn active_editor_params_accept_null_document() {
        let params: ActiveEditorParams =
            serde_json::from_value(serde_json::json!({ "textDocument": null })).expect("parse");
        assert!(params.text_document.is_none());
        assert!(params.selections.is_empty());
    }

    #[test]
    fn selection_params_parse_ranges() {
        let params: SelectionParams = serde_json::from_value(serde_json::json!({
            "textDocument": { "uri": "file:///notes.md" },
            "selections": [
                { "start": { "line": 0, "character": 0 }, "end": { "line": 0, "character": 3 } }
            ]
        }))
        .expect("parse");
        assert_eq!(params.selections.len(), 1);
        assert_eq!(params.selections[0].end.character, 3);
    }
}
