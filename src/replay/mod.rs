//! Runs a scripted editing session against the in-memory host.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotation::{AnnotationValue, Body, WebAnnotation};
use crate::config::AppConfig;
use crate::editor::{AnnotationEditor, EditorEvent, EditorProps, EventRecorder};
use crate::geometry::{Bounds, PopupPlacement, Size};
use crate::host::{Anchor, MemoryAnchor, MemoryHost, MemorySurface, NodeId};
use crate::state::{SessionEvent, SessionPhase, StateError, StateTransition};
use crate::widgets::{CommentWidget, TagWidget};

const POPUP_NODE: NodeId = 1;
const DOCUMENT_NODE: NodeId = 0;
const DEFAULT_POPUP_SIZE: Size = Size::new(280.0, 160.0);
const DEFAULT_WRAPPER: Bounds = Bounds::new(0.0, 0.0, 1280.0, 800.0);

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse replay script: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("step {step}: no annotation is being edited")]
    NotEditing { step: usize },
    #[error("step {step}: {source}")]
    Rejected {
        step: usize,
        #[source]
        source: StateError,
    },
    #[error("step {step}: body index {index} out of range for {len} bodies")]
    BodyIndex {
        step: usize,
        index: usize,
        len: usize,
    },
}

pub type ReplayResult<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub annotation: WebAnnotation,
    #[serde(default)]
    pub selected: Option<Bounds>,
    #[serde(default)]
    pub wrapper: Option<Bounds>,
    /// Overrides the configured flag when present.
    #[serde(default)]
    pub read_only: Option<bool>,
    #[serde(default)]
    pub template: Option<Vec<Body>>,
    #[serde(default)]
    pub apply_immediately: Option<bool>,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ReplayStep {
    Append { body: Body },
    Update { index: usize, body: Body },
    Remove { index: usize },
    Reply { text: String },
    Tag { value: String },
    MoveSelection { bounds: Bounds },
    Resize,
    ClickInside,
    ClickOutside,
    Commit,
    Delete,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub events: Vec<EditorEvent<WebAnnotation>>,
    pub still_editing: bool,
    pub transitions: Vec<StateTransition>,
    pub last_placement: Option<PlacementSummary>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlacementSummary {
    pub left: f64,
    pub top: f64,
}

impl From<PopupPlacement> for PlacementSummary {
    fn from(placement: PopupPlacement) -> Self {
        Self {
            left: placement.left,
            top: placement.top,
        }
    }
}

pub fn load_script(path: &Path) -> ReplayResult<ReplayScript> {
    let contents = std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&contents)
}

pub fn parse_script(contents: &str) -> ReplayResult<ReplayScript> {
    serde_json::from_str(contents).map_err(|source| ReplayError::Parse { source })
}

pub fn run_script(script: ReplayScript, config: &AppConfig) -> ReplayResult<ReplayReport> {
    let host = Rc::new(MemoryHost::new());
    let recorder = Rc::new(EventRecorder::new());
    let surface = Rc::new(MemorySurface::new([POPUP_NODE], DEFAULT_POPUP_SIZE));
    let wrapper: Rc<dyn Anchor> = Rc::new(MemoryAnchor::new(
        script.wrapper.unwrap_or(DEFAULT_WRAPPER),
    ));
    let selected = Rc::new(MemoryAnchor::new(script.selected.unwrap_or_default()));

    let mut props = EditorProps::new(wrapper)
        .with_annotation(Rc::new(script.annotation))
        .with_selected_element(selected.clone())
        .read_only(script.read_only.unwrap_or(config.read_only));
    if let Some(template) = script.template.or_else(|| config.template.clone()) {
        let apply_immediately = script
            .apply_immediately
            .unwrap_or(config.apply_immediately);
        props = props.with_template(template, apply_immediately);
    }

    let editor = AnnotationEditor::new(
        props.clone(),
        host.clone(),
        Rc::new(config.environment()),
        recorder.clone(),
    );
    editor.mount(Some(surface.clone()));
    let handle = editor.handle();
    let comments = CommentWidget::new(handle.clone());
    let tags = TagWidget::new(handle.clone());

    for (step, op) in script.steps.into_iter().enumerate() {
        tracing::debug!(step, ?op, "replay step");
        match op {
            ReplayStep::Append { body } => handle.append_body(body),
            ReplayStep::Update { index, body } => {
                let previous = body_at(&editor, step, index)?;
                handle.update_body(&previous, body);
            }
            ReplayStep::Remove { index } => {
                let target = body_at(&editor, step, index)?;
                handle.remove_body(&target);
            }
            ReplayStep::Reply { text } => comments.set_reply_text(&text),
            ReplayStep::Tag { value } => {
                tags.add_tag(&value);
            }
            ReplayStep::MoveSelection { bounds } => {
                selected.set_bounds(bounds);
                editor.set_props(props.clone());
            }
            ReplayStep::Resize => host.notify_resize(),
            ReplayStep::ClickInside => host.dispatch_pointer_down(POPUP_NODE),
            ReplayStep::ClickOutside => host.dispatch_pointer_down(DOCUMENT_NODE),
            ReplayStep::Commit => {
                ensure_editing(&editor, step, SessionEvent::Commit)?;
                handle.save_and_close();
            }
            ReplayStep::Delete => {
                ensure_editing(&editor, step, SessionEvent::Delete)?;
                editor.delete();
            }
        }
    }

    let report = ReplayReport {
        events: recorder.take(),
        still_editing: editor.phase() == SessionPhase::Editing,
        transitions: editor.session_history(),
        last_placement: surface.last_placement().map(PlacementSummary::from),
    };
    editor.unmount();
    Ok(report)
}

/// A script may only finish a session that is still open.
fn ensure_editing(
    editor: &AnnotationEditor<WebAnnotation>,
    step: usize,
    event: SessionEvent,
) -> ReplayResult<()> {
    let from = editor.phase();
    if from.is_editing() {
        return Ok(());
    }
    Err(ReplayError::Rejected {
        step,
        source: StateError::InvalidStateTransition { from, event },
    })
}

fn body_at(
    editor: &AnnotationEditor<WebAnnotation>,
    step: usize,
    index: usize,
) -> ReplayResult<crate::annotation::BodyRef> {
    let annotation = editor
        .current_annotation()
        .ok_or(ReplayError::NotEditing { step })?;
    let len = annotation.bodies().len();
    annotation
        .bodies()
        .get(index)
        .cloned()
        .ok_or(ReplayError::BodyIndex { step, index, len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::UserIdentity;

    fn signed_in() -> AppConfig {
        AppConfig {
            user: Some(UserIdentity {
                id: Some("u1".to_string()),
                name: None,
            }),
            ..AppConfig::default()
        }
    }

    #[test]
    fn replay_reply_then_click_outside_creates_annotation() {
        let script = parse_script(
            r#"{
                "annotation": {"isSelection": true, "target": {"selector": "xywh=1,2,3,4"}},
                "selected": {"x": 40, "y": 40, "width": 10, "height": 10},
                "steps": [
                    {"op": "reply", "text": "nice"},
                    {"op": "click_inside"},
                    {"op": "click_outside"}
                ]
            }"#,
        )
        .expect("script should parse");

        let report = run_script(script, &signed_in()).expect("replay should run");

        assert!(!report.still_editing);
        assert_eq!(report.events.len(), 2);
        let EditorEvent::Created(created) = &report.events[0] else {
            panic!("expected created, got {:?}", report.events);
        };
        assert!(!created.bodies()[0].draft);
        assert_eq!(report.events[1], EditorEvent::Cancelled);
        let placement = report.last_placement.expect("popup should be placed");
        assert_eq!(placement.left, 40.0);
        assert_eq!(placement.top, 50.0);
    }

    #[test]
    fn replay_remove_all_bodies_then_commit_deletes() {
        let script = parse_script(
            r##"{
                "annotation": {"id": "#a", "body": [{"type": "TextualBody", "value": "x"}]},
                "steps": [{"op": "remove", "index": 0}, {"op": "commit"}]
            }"##,
        )
        .expect("script should parse");

        let report = run_script(script, &AppConfig::default()).expect("replay should run");

        assert_eq!(report.events.len(), 1);
        assert!(matches!(
            &report.events[0],
            EditorEvent::Deleted(original) if original.bodies().len() == 1
        ));
    }

    #[test]
    fn replay_reports_out_of_range_body_index() {
        let script = parse_script(
            r##"{"annotation": {"id": "#a"}, "steps": [{"op": "update", "index": 3, "body": {}}]}"##,
        )
        .expect("script should parse");

        let err =
            run_script(script, &AppConfig::default()).expect_err("index 3 is out of range");
        assert!(matches!(
            err,
            ReplayError::BodyIndex {
                step: 0,
                index: 3,
                len: 0
            }
        ));
    }

    #[test]
    fn replay_reports_session_transitions() {
        let script = parse_script(
            r##"{"annotation": {"id": "#a"}, "steps": [{"op": "delete"}]}"##,
        )
        .expect("script should parse");

        let report = run_script(script, &AppConfig::default()).expect("replay should run");

        let events: Vec<_> = report.transitions.iter().map(|t| t.event).collect();
        assert_eq!(
            events,
            vec![SessionEvent::Open, SessionEvent::Delete, SessionEvent::Finish]
        );
        assert_eq!(
            report.transitions.last().map(|t| t.to),
            Some(SessionPhase::Closed)
        );
    }

    #[test]
    fn replay_rejects_commit_after_session_closed() {
        let script = parse_script(
            r##"{"annotation": {"id": "#a"}, "steps": [{"op": "delete"}, {"op": "commit"}]}"##,
        )
        .expect("script should parse");

        let err = run_script(script, &AppConfig::default())
            .expect_err("a closed session cannot be committed");
        assert!(matches!(
            err,
            ReplayError::Rejected {
                step: 1,
                source: StateError::InvalidStateTransition {
                    from: SessionPhase::Closed,
                    event: SessionEvent::Commit
                }
            }
        ));
    }

    #[test]
    fn parse_script_rejects_unknown_ops() {
        let err = parse_script(r#"{"annotation": {}, "steps": [{"op": "undo"}]}"#)
            .expect_err("undo is not a replay step");
        assert!(matches!(err, ReplayError::Parse { .. }));
    }
}
