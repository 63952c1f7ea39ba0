use std::cell::RefCell;

use serde::Serialize;

/// Outcome notifications for the caller, which owns persistence.
pub trait EditorCallbacks<A> {
    fn annotation_created(&self, annotation: A);
    fn annotation_updated(&self, updated: A, original: &A);
    fn annotation_deleted(&self, original: &A);
    fn cancel(&self);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum EditorEvent<A> {
    Created(A),
    Updated { updated: A, original: A },
    Deleted(A),
    Cancelled,
}

impl<A> EditorEvent<A> {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated { .. } => "updated",
            Self::Deleted(_) => "deleted",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Collects every callback as an [`EditorEvent`].
#[derive(Debug)]
pub struct EventRecorder<A> {
    events: RefCell<Vec<EditorEvent<A>>>,
}

impl<A: Clone> EventRecorder<A> {
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<EditorEvent<A>> {
        self.events.borrow().clone()
    }

    pub fn take(&self) -> Vec<EditorEvent<A>> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn count(&self, name: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    fn push(&self, event: EditorEvent<A>) {
        tracing::debug!(event = event.name(), "editor callback");
        self.events.borrow_mut().push(event);
    }
}

impl<A: Clone> Default for EventRecorder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Clone> EditorCallbacks<A> for EventRecorder<A> {
    fn annotation_created(&self, annotation: A) {
        self.push(EditorEvent::Created(annotation));
    }

    fn annotation_updated(&self, updated: A, original: &A) {
        self.push(EditorEvent::Updated {
            updated,
            original: original.clone(),
        });
    }

    fn annotation_deleted(&self, original: &A) {
        self.push(EditorEvent::Deleted(original.clone()));
    }

    fn cancel(&self) {
        self.push(EditorEvent::Cancelled);
    }
}
