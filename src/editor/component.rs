use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::annotation::{AnnotationValue, Body, BodyRef};
use crate::environment::Environment;
use crate::host::{Host, NodeId, PointerEvent, PopupSurface};
use crate::state::{
    AnnotationCell, SessionEvent, SessionMachine, SessionPhase, StateTransition,
};

use super::bodies::{appended, removed, updated};
use super::callbacks::EditorCallbacks;
use super::handle::EditorHandle;
use super::lifecycle::{decide_commit, dispatch_commit};
use super::metadata::creation_meta;
use super::outside_click::OutsideClickListener;
use super::props::{EditorProps, EffectDeps};
use super::reconcile::reconcile;
use super::tracking::{start_resize_tracking, PlacementTarget, ResizeTracking};

pub(super) struct EditorCore<A: AnnotationValue + 'static> {
    pub(super) state: AnnotationCell<A>,
    props: RefCell<EditorProps<A>>,
    machine: RefCell<SessionMachine>,
    env: Rc<dyn Environment>,
    callbacks: Rc<dyn EditorCallbacks<A>>,
    host: Rc<dyn Host>,
    outside_click: OutsideClickListener,
    surface: RefCell<Option<Rc<dyn PopupSurface>>>,
    resize: RefCell<Option<Box<dyn ResizeTracking>>>,
    deps: RefCell<Option<EffectDeps<A>>>,
    mounted: Cell<bool>,
}

impl<A: AnnotationValue + 'static> EditorCore<A> {
    pub(super) fn read_only(&self) -> bool {
        self.props.borrow().read_only
    }

    fn props(&self) -> EditorProps<A> {
        self.props.borrow().clone()
    }

    fn phase(&self) -> SessionPhase {
        self.machine.borrow().phase()
    }

    fn contains(&self, node: NodeId) -> bool {
        self.surface
            .borrow()
            .as_ref()
            .is_some_and(|surface| surface.contains(node))
    }

    fn transition(&self, event: SessionEvent) -> bool {
        self.machine.borrow_mut().transition(event).is_ok()
    }

    /// Re-runs reconciliation when the annotation reference or the selected
    /// element's geometry changed since the last run.
    fn render(self: &Rc<Self>) {
        if !self.mounted.get() {
            return;
        }
        let props = self.props();
        let deps = EffectDeps::of(&props);
        let changed = self
            .deps
            .borrow()
            .as_ref()
            .is_none_or(|previous| !previous.same_as(&deps));
        if !changed {
            return;
        }
        *self.deps.borrow_mut() = Some(deps);
        self.run_effect(props);
    }

    fn run_effect(self: &Rc<Self>, props: EditorProps<A>) {
        self.teardown_effect();

        let Some(external) = props.annotation.clone() else {
            self.dismiss();
            return;
        };

        let local = self.state.get();
        let outcome = reconcile(
            local.as_ref(),
            external.as_ref(),
            props.apply_template.as_deref(),
        );
        if outcome.replace_local {
            tracing::debug!(
                selection = outcome.working.is_selection(),
                template_applied = outcome.template_applied,
                bodies = outcome.working.bodies().len(),
                "local editor state replaced"
            );
            self.state.set(Some(outcome.working.clone()));
        } else {
            tracing::debug!("reconcile suppressed; keeping local editor state");
        }
        self.transition(SessionEvent::Open);

        self.attach_outside_click();
        self.start_tracking(&props);

        // Template bodies are passed through as-is; drafts stay drafts.
        if outcome.template_applied && props.apply_immediately {
            tracing::info!("template applied immediately; creating annotation");
            self.callbacks
                .annotation_created(outcome.working.to_annotation());
        }
    }

    fn attach_outside_click(self: &Rc<Self>) {
        let core = Rc::downgrade(self);
        self.outside_click
            .attach(Rc::new(move |event: &PointerEvent| {
                let Some(core) = core.upgrade() else {
                    return;
                };
                if core.contains(event.target) {
                    return;
                }
                tracing::debug!(node = event.target, "pointer down outside editor");
                core.cancel();
            }));
    }

    fn start_tracking(&self, props: &EditorProps<A>) {
        let Some(surface) = self.surface.borrow().clone() else {
            return;
        };
        let target = PlacementTarget {
            selected: props.selected_element.clone(),
            wrapper: Rc::clone(&props.wrapper),
            surface,
        };
        let tracking = start_resize_tracking(self.host.as_ref(), target);
        *self.resize.borrow_mut() = Some(tracking);
    }

    fn teardown_effect(&self) {
        let tracking = self.resize.borrow_mut().take();
        if let Some(mut tracking) = tracking {
            tracking.stop();
        }
        self.outside_click.detach();
    }

    fn dismiss(&self) {
        self.state.clear();
        if self.phase().is_editing() {
            self.transition(SessionEvent::Dismiss);
        }
    }

    fn close_session(&self) {
        self.teardown_effect();
        self.state.clear();
        self.transition(SessionEvent::Finish);
    }

    pub(super) fn commit(&self) {
        self.finish(SessionEvent::Commit);
    }

    /// Outside-click close: save what was edited, then tell the caller.
    pub(super) fn cancel(&self) {
        self.finish(SessionEvent::Cancel);
    }

    fn finish(&self, event: SessionEvent) {
        let props = self.props();
        if props.read_only && event == SessionEvent::Commit {
            tracing::debug!("commit ignored: editor is read-only");
            return;
        }
        let Some(local) = self.state.get() else {
            tracing::debug!(?event, "no local editor state to finish");
            return;
        };
        let Some(original) = props.annotation else {
            tracing::debug!(?event, "no external annotation to finish against");
            return;
        };
        if !self.transition(event) {
            return;
        }

        let outcome = (!props.read_only).then(|| decide_commit(&local, self.env.as_ref()));
        self.close_session();

        let cancelled = outcome.as_ref().is_some_and(|outcome| outcome.is_cancel());
        if let Some(outcome) = outcome {
            tracing::info!(?event, outcome = outcome.name(), "editor session committed");
            dispatch_commit(outcome, original.as_ref(), self.callbacks.as_ref());
        }
        // A commit that resolved to cancel already told the caller; one
        // cancel per outside click.
        if event == SessionEvent::Cancel && !cancelled {
            self.callbacks.cancel();
        }
    }

    pub(super) fn delete(&self) {
        let props = self.props();
        if props.read_only {
            tracing::debug!("delete ignored: editor is read-only");
            return;
        }
        let Some(original) = props.annotation else {
            return;
        };
        if !self.transition(SessionEvent::Delete) {
            return;
        }
        self.close_session();
        tracing::info!("editor session deleted annotation");
        self.callbacks.annotation_deleted(original.as_ref());
        self.callbacks.cancel();
    }

    pub(super) fn append_body(&self, body: Body) {
        self.mutate_bodies("append", |bodies| {
            let meta = creation_meta(&body, self.env.as_ref());
            Some(appended(bodies, body, meta))
        });
    }

    pub(super) fn update_body(&self, previous: &BodyRef, body: Body) {
        self.mutate_bodies("update", |bodies| {
            let meta = creation_meta(&body, self.env.as_ref());
            updated(bodies, previous, body, meta)
        });
    }

    pub(super) fn remove_body(&self, target: &BodyRef) {
        self.mutate_bodies("remove", |bodies| removed(bodies, target));
    }

    fn mutate_bodies(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&[BodyRef]) -> Option<Vec<BodyRef>>,
    ) {
        let Some(current) = self.state.get() else {
            tracing::debug!(operation, "body mutation ignored: no local editor state");
            return;
        };
        let Some(bodies) = apply(current.bodies()) else {
            tracing::debug!(operation, "body mutation ignored: target body not found");
            return;
        };
        self.state.set(Some(current.with_bodies(bodies)));
    }
}

/// The popup editor for one annotation or selection.
///
/// Drive it like a component: `mount` once, `set_props` on every render of
/// the host UI, `unmount` when it goes away. Child widgets receive an
/// [`EditorHandle`] from [`AnnotationEditor::handle`].
pub struct AnnotationEditor<A: AnnotationValue + 'static> {
    core: Rc<EditorCore<A>>,
}

impl<A: AnnotationValue + 'static> AnnotationEditor<A> {
    pub fn new(
        props: EditorProps<A>,
        host: Rc<dyn Host>,
        env: Rc<dyn Environment>,
        callbacks: Rc<dyn EditorCallbacks<A>>,
    ) -> Self {
        let core = EditorCore {
            state: AnnotationCell::new(),
            props: RefCell::new(props),
            machine: RefCell::new(SessionMachine::new()),
            env,
            callbacks,
            outside_click: OutsideClickListener::new(Rc::clone(&host)),
            host,
            surface: RefCell::new(None),
            resize: RefCell::new(None),
            deps: RefCell::new(None),
            mounted: Cell::new(false),
        };
        Self {
            core: Rc::new(core),
        }
    }

    /// `surface` is the popup's own element; without one there is nothing
    /// to position and every pointer event counts as outside.
    pub fn mount(&self, surface: Option<Rc<dyn PopupSurface>>) {
        if self.core.mounted.get() {
            return;
        }
        *self.core.surface.borrow_mut() = surface;
        self.core.mounted.set(true);
        self.core.render();
    }

    pub fn set_props(&self, props: EditorProps<A>) {
        *self.core.props.borrow_mut() = props;
        self.core.render();
    }

    pub fn unmount(&self) {
        if !self.core.mounted.replace(false) {
            return;
        }
        self.core.teardown_effect();
        self.core.dismiss();
        self.core.deps.borrow_mut().take();
        self.core.surface.borrow_mut().take();
    }

    pub fn handle(&self) -> EditorHandle<A> {
        EditorHandle::new(Rc::downgrade(&self.core))
    }

    pub fn current_annotation(&self) -> Option<A> {
        self.core.state.get()
    }

    pub fn phase(&self) -> SessionPhase {
        self.core.phase()
    }

    /// Phase transitions of the current or most recent session.
    pub fn session_history(&self) -> Vec<StateTransition> {
        self.core.machine.borrow().history().to_vec()
    }

    pub fn is_listening_for_outside_clicks(&self) -> bool {
        self.core.outside_click.is_attached()
    }

    pub fn commit(&self) {
        self.core.commit();
    }

    pub fn delete(&self) {
        self.core.delete();
    }
}

impl<A: AnnotationValue + 'static> Drop for AnnotationEditor<A> {
    fn drop(&mut self) {
        self.unmount();
    }
}
