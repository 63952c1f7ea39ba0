use crate::annotation::AnnotationValue;
use crate::environment::Environment;

use super::callbacks::EditorCallbacks;
use super::metadata::finalize_bodies;

/// What committing the local state amounts to.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome<A> {
    /// Empty selection: nothing to keep.
    Cancel,
    /// Existing annotation emptied: remove the original.
    Delete,
    Create(A),
    Update(A),
}

impl<A> CommitOutcome<A> {
    pub const fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Delete => "delete",
            Self::Create(_) => "create",
            Self::Update(_) => "update",
        }
    }
}

pub fn decide_commit<A: AnnotationValue>(local: &A, env: &dyn Environment) -> CommitOutcome<A> {
    let finalized = local.with_bodies(finalize_bodies(local.bodies(), env));
    match (finalized.bodies().is_empty(), local.is_selection()) {
        (true, true) => CommitOutcome::Cancel,
        (true, false) => CommitOutcome::Delete,
        (false, true) => CommitOutcome::Create(finalized.to_annotation()),
        (false, false) => CommitOutcome::Update(finalized),
    }
}

pub fn dispatch_commit<A>(
    outcome: CommitOutcome<A>,
    original: &A,
    callbacks: &dyn EditorCallbacks<A>,
) {
    match outcome {
        CommitOutcome::Cancel => callbacks.cancel(),
        CommitOutcome::Delete => callbacks.annotation_deleted(original),
        CommitOutcome::Create(created) => callbacks.annotation_created(created),
        CommitOutcome::Update(updated) => callbacks.annotation_updated(updated, original),
    }
}
