use std::rc::Rc;

use crate::annotation::{AnnotationValue, Body, BodyRef, PURPOSE_COMMENTING, TEXTUAL_BODY};
use crate::editor::EditorHandle;

const PURPOSE_REPLYING: &str = "replying";

/// Lists comments, keeps one draft reply and edits or deletes comments.
pub struct CommentWidget<A: AnnotationValue + 'static> {
    handle: EditorHandle<A>,
}

impl<A: AnnotationValue + 'static> CommentWidget<A> {
    pub fn new(handle: EditorHandle<A>) -> Self {
        Self { handle }
    }

    /// Finalized comments, in body order.
    pub fn comments(&self) -> Vec<BodyRef> {
        self.bodies_where(|body| is_comment(body) && !body.draft)
    }

    pub fn draft_reply(&self) -> Option<BodyRef> {
        self.bodies_where(|body| is_comment(body) && body.draft)
            .into_iter()
            .next()
    }

    /// Mirrors the reply field: typing creates or updates the draft, clearing
    /// the field removes it.
    pub fn set_reply_text(&self, text: &str) {
        if self.handle.read_only() {
            return;
        }
        match (self.draft_reply(), text.trim().is_empty()) {
            (None, true) => {}
            (None, false) => self
                .handle
                .append_body(Body::textual(PURPOSE_COMMENTING, text).into_draft()),
            (Some(draft), true) => self.handle.remove_body(&draft),
            (Some(draft), false) => {
                let mut next = (*draft).clone();
                next.value = Some(text.to_string());
                self.handle.update_body(&draft, next);
            }
        }
    }

    pub fn edit_comment(&self, comment: &BodyRef, text: &str) {
        if self.handle.read_only() {
            return;
        }
        let mut next = Body::clone(comment);
        next.value = Some(text.to_string());
        self.handle.update_body(comment, next);
    }

    pub fn delete_comment(&self, comment: &BodyRef) {
        if self.handle.read_only() {
            return;
        }
        self.handle.remove_body(comment);
    }

    /// Commits the session; the draft reply is finalized on the way out.
    pub fn save(&self) {
        self.handle.save_and_close();
    }

    fn bodies_where(&self, keep: impl Fn(&Body) -> bool) -> Vec<BodyRef> {
        self.handle
            .annotation()
            .map(|annotation| {
                annotation
                    .bodies()
                    .iter()
                    .filter(|body| keep(body))
                    .map(Rc::clone)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn is_comment(body: &Body) -> bool {
    body.kind.as_deref() == Some(TEXTUAL_BODY)
        && (body.purpose.is_none()
            || body.has_purpose(PURPOSE_COMMENTING)
            || body.has_purpose(PURPOSE_REPLYING))
}
