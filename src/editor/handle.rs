use std::rc::Weak;

use crate::annotation::{AnnotationValue, Body, BodyRef};
use crate::state::SubscriptionId;

use super::component::EditorCore;

/// What a child editing widget gets to work with: the current local state,
/// the read-only flag, the body mutators and commit.
///
/// Holds the editor weakly; once the editor is dropped every call is a no-op.
pub struct EditorHandle<A: AnnotationValue + 'static> {
    core: Weak<EditorCore<A>>,
}

impl<A: AnnotationValue + 'static> EditorHandle<A> {
    pub(super) fn new(core: Weak<EditorCore<A>>) -> Self {
        Self { core }
    }

    pub fn annotation(&self) -> Option<A> {
        self.core.upgrade().and_then(|core| core.state.get())
    }

    pub fn read_only(&self) -> bool {
        self.core.upgrade().is_some_and(|core| core.read_only())
    }

    pub fn append_body(&self, body: Body) {
        if let Some(core) = self.core.upgrade() {
            core.append_body(body);
        }
    }

    pub fn update_body(&self, previous: &BodyRef, body: Body) {
        if let Some(core) = self.core.upgrade() {
            core.update_body(previous, body);
        }
    }

    pub fn remove_body(&self, target: &BodyRef) {
        if let Some(core) = self.core.upgrade() {
            core.remove_body(target);
        }
    }

    pub fn save_and_close(&self) {
        if let Some(core) = self.core.upgrade() {
            core.commit();
        }
    }

    pub fn subscribe(&self, subscriber: impl Fn(Option<&A>) + 'static) -> Option<SubscriptionId> {
        self.core
            .upgrade()
            .map(|core| core.state.subscribe(subscriber))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(core) = self.core.upgrade() {
            core.state.unsubscribe(id);
        }
    }
}

impl<A: AnnotationValue + 'static> Clone for EditorHandle<A> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}
