use std::rc::Rc;

use crate::annotation::{AnnotationValue, Body, BodyRef, PURPOSE_TAGGING};
use crate::editor::EditorHandle;

pub struct TagWidget<A: AnnotationValue + 'static> {
    handle: EditorHandle<A>,
}

impl<A: AnnotationValue + 'static> TagWidget<A> {
    pub fn new(handle: EditorHandle<A>) -> Self {
        Self { handle }
    }

    pub fn tags(&self) -> Vec<BodyRef> {
        self.handle
            .annotation()
            .map(|annotation| {
                annotation
                    .bodies()
                    .iter()
                    .filter(|body| body.has_purpose(PURPOSE_TAGGING))
                    .map(Rc::clone)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Blank and already-present tags are ignored. Returns whether a tag was added.
    pub fn add_tag(&self, value: &str) -> bool {
        let value = value.trim();
        if self.handle.read_only() || value.is_empty() {
            return false;
        }
        if self
            .tags()
            .iter()
            .any(|tag| tag.value.as_deref() == Some(value))
        {
            return false;
        }
        self.handle
            .append_body(Body::textual(PURPOSE_TAGGING, value));
        true
    }

    pub fn remove_tag(&self, tag: &BodyRef) {
        if self.handle.read_only() {
            return;
        }
        self.handle.remove_body(tag);
    }
}
