//! Event Subscriptions
//!
//! Registrations of the controller's dispatcher against editor event
//! sources. Each registration can be revoked on its own, and the whole set
//! is disposed in one call.

use std::collections::HashMap;

/// Editor event sources the controller can listen to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorEvent {
    /// The focused editor switched, or no editor is focused any more
    ActiveEditorChanged,
    /// The selection inside the active editor moved
    SelectionChanged,
    /// The active document's content was edited
    ContentChanged,
}

/// Handle for one registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    event: EditorEvent,
}

impl Subscription {
    pub fn event(&self) -> EditorEvent {
        self.event
    }
}

/// The live registrations of one dispatcher
#[derive(Debug, Default)]
pub struct Subscriptions {
    next_id: u64,
    active: HashMap<u64, EditorEvent>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the dispatcher against `event`
    pub fn subscribe(&mut self, event: EditorEvent) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(id, event);
        log::debug!("subscribed to {:?} (#{})", event, id);
        Subscription { id, event }
    }

    /// Revoke a single registration. Returns false if it was already gone.
    pub fn revoke(&mut self, subscription: Subscription) -> bool {
        let removed = self.active.remove(&subscription.id).is_some();
        if removed {
            log::debug!("revoked {:?} (#{})", subscription.event, subscription.id);
        }
        removed
    }

    /// Whether any live registration listens to `event`
    pub fn is_subscribed(&self, event: EditorEvent) -> bool {
        self.active.values().any(|e| *e == event)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Revoke every registration at once, returning how many were live
    pub fn dispose(&mut self) -> usize {
        let count = self.active.len();
        self.active.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_and_revoke_individually() {
        let mut subs = Subscriptions::new();
        let selection = subs.subscribe(EditorEvent::SelectionChanged);
        let editor = subs.subscribe(EditorEvent::ActiveEditorChanged);

        assert!(subs.is_subscribed(EditorEvent::SelectionChanged));
        assert!(subs.revoke(selection));
        assert!(!subs.is_subscribed(EditorEvent::SelectionChanged));
        assert!(subs.is_subscribed(EditorEvent::ActiveEditorChanged));

        // revoking twice is a no-op
        assert!(!subs.revoke(selection));
        assert_eq!(editor.event(), EditorEvent::ActiveEditorChanged);
    }

    #[test]
    fn duplicate_registrations_are_independent() {
        let mut subs = Subscriptions::new();
        let first = subs.subscribe(EditorEvent::ContentChanged);
        let _second = subs.subscribe(EditorEvent::ContentChanged);

        subs.revoke(first);
        assert!(subs.is_subscribed(EditorEvent::ContentChanged));
    }

    #[test]
    fn dispose_revokes_everything() {
        let mut subs = Subscriptions::new();
        subs.subscribe(EditorEvent::SelectionChanged);
        subs.subscribe(EditorEvent::ActiveEditorChanged);

        assert_eq!(subs.dispose(), 2);
        assert!(subs.is_empty());
        assert_eq!(subs.dispose(), 0);
    }
}
