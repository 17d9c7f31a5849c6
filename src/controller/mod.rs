//! Status Controller
//!
//! Recomputes document metrics when the editor reports a change and decides
//! what the status bar shows. Synchronous and free of I/O: the caller
//! delivers the returned [`StatusUpdate`] to the editor.

pub mod status_item;
pub mod subscriptions;

pub use status_item::{StatusItem, StatusUpdate};
pub use subscriptions::{EditorEvent, Subscription, Subscriptions};

use crate::metrics::{CountOptions, DocumentMetrics, SelectionRange, TextMetrics};
use crate::status::{format_status, DEFAULT_ICON};

/// Settings the controller needs from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    pub icon: String,
    /// Content-type tags that get counted
    pub languages: Vec<String>,
    pub count: CountOptions,
    pub track_selection: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            icon: DEFAULT_ICON.to_string(),
            languages: vec!["markdown".to_string()],
            count: CountOptions::default(),
            track_selection: true,
        }
    }
}

/// Snapshot of the focused document handed in by the host
#[derive(Debug, Clone)]
pub struct ActiveDocument<'a> {
    pub language_id: &'a str,
    pub text: &'a str,
    pub selections: Vec<SelectionRange>,
}

pub struct Controller {
    options: ControllerOptions,
    subscriptions: Subscriptions,
    selection_subscription: Option<Subscription>,
    item: Option<StatusItem>,
    current: Option<DocumentMetrics>,
    torn_down: bool,
}

impl Controller {
    pub fn new(options: ControllerOptions) -> Self {
        let mut subscriptions = Subscriptions::new();
        subscriptions.subscribe(EditorEvent::ActiveEditorChanged);
        subscriptions.subscribe(EditorEvent::ContentChanged);

        let selection_subscription = options
            .track_selection
            .then(|| subscriptions.subscribe(EditorEvent::SelectionChanged));

        Self {
            options,
            subscriptions,
            selection_subscription,
            item: None,
            current: None,
            torn_down: false,
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Latest metrics, if the status is currently showing any
    pub fn current(&self) -> Option<DocumentMetrics> {
        self.current
    }

    pub fn is_subscribed(&self, event: EditorEvent) -> bool {
        self.subscriptions.is_subscribed(event)
    }

    pub fn is_visible(&self) -> bool {
        self.item.as_ref().is_some_and(StatusItem::is_visible)
    }

    /// Dispatch an editor event. Events without a live subscription are
    /// dropped.
    pub fn handle(
        &mut self,
        event: EditorEvent,
        active: Option<ActiveDocument<'_>>,
    ) -> Option<StatusUpdate> {
        if !self.subscriptions.is_subscribed(event) {
            log::trace!("ignoring {:?}: not subscribed", event);
            return None;
        }
        self.refresh(active)
    }

    /// Recompute for the given document regardless of subscriptions.
    /// Does nothing once the controller is torn down.
    pub fn refresh(&mut self, active: Option<ActiveDocument<'_>>) -> Option<StatusUpdate> {
        if self.torn_down {
            return None;
        }
        let item = self.item.get_or_insert_with(|| {
            log::debug!("creating status item");
            StatusItem::new()
        });

        let document = match active {
            Some(doc) if self.options.languages.iter().any(|l| l == doc.language_id) => doc,
            _ => {
                self.current = None;
                return item.hide();
            }
        };

        let selections = if self.options.track_selection {
            document.selections.as_slice()
        } else {
            &[]
        };
        let metrics =
            TextMetrics::new(self.options.count).compute_document(document.text, selections);
        self.current = Some(metrics);

        item.show(format_status(&self.options.icon, &metrics), metrics)
    }

    /// Replace the options, adding or revoking the selection subscription
    /// when tracking was toggled.
    pub fn reconfigure(&mut self, options: ControllerOptions) {
        if self.torn_down {
            self.options = options;
            return;
        }
        match (options.track_selection, self.selection_subscription) {
            (true, None) => {
                self.selection_subscription =
                    Some(self.subscriptions.subscribe(EditorEvent::SelectionChanged));
            }
            (false, Some(subscription)) => {
                self.subscriptions.revoke(subscription);
                self.selection_subscription = None;
            }
            _ => {}
        }
        self.options = options;
    }

    /// Dispose every subscription and release the status item.
    ///
    /// Returns `Hide` when the item was visible so the editor can clear it.
    /// Safe to call more than once.
    pub fn teardown(&mut self) -> Option<StatusUpdate> {
        self.torn_down = true;
        let revoked = self.subscriptions.dispose();
        self.selection_subscription = None;
        self.current = None;

        let update = self.item.take().and_then(|mut item| item.hide());
        if revoked > 0 {
            log::debug!("controller torn down, {} subscriptions revoked", revoked);
        }
        update
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.teardown();
    }
}
