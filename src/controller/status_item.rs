use crate::metrics::DocumentMetrics;

/// What the display should do after a recomputation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    Show {
        text: String,
        metrics: DocumentMetrics,
    },
    Hide,
}

/// The one persistent status bar entry, mirrored on the server side so only
/// real changes are forwarded to the editor.
#[derive(Debug, Default)]
pub struct StatusItem {
    text: Option<String>,
    metrics: DocumentMetrics,
    visible: bool,
}

impl StatusItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set the content and make the item visible.
    ///
    /// The label alone can hide a change ("1 Word" carries no character
    /// count), so the metrics are compared as well.
    pub fn show(&mut self, text: String, metrics: DocumentMetrics) -> Option<StatusUpdate> {
        if self.visible && self.metrics == metrics && self.text.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.visible = true;
        self.metrics = metrics;
        self.text = Some(text.clone());
        Some(StatusUpdate::Show { text, metrics })
    }

    pub fn hide(&mut self) -> Option<StatusUpdate> {
        if !self.visible {
            return None;
        }
        self.visible = false;
        Some(StatusUpdate::Hide)
    }
}
