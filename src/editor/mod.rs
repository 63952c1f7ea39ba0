//! The popup editor: reconciliation, body mutation and session lifecycle.

mod bodies;
mod callbacks;
mod component;
mod handle;
mod lifecycle;
mod metadata;
mod outside_click;
mod props;
mod reconcile;
mod tracking;

pub use bodies::{appended, removed, updated};
pub use callbacks::{EditorCallbacks, EditorEvent, EventRecorder};
pub use component::AnnotationEditor;
pub use handle::EditorHandle;
pub use lifecycle::{decide_commit, dispatch_commit, CommitOutcome};
pub use metadata::{creation_meta, finalize_bodies, stamp, undraft, CreationMeta};
pub use outside_click::OutsideClickListener;
pub use props::EditorProps;
pub use reconcile::{reconcile, suppresses_update, Reconciliation};
pub use tracking::{
    start_resize_tracking, ObservedResize, OneShotPlacement, PlacementTarget, ResizeTracking,
};

