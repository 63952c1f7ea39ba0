use crate::annotation::{fresh_bodies, AnnotationValue, Body};

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation<A> {
    /// External value, with template bodies when a template was applied.
    pub working: A,
    pub template_applied: bool,
    /// `false` when the local state must be left alone.
    pub replace_local: bool,
}

pub fn reconcile<A: AnnotationValue>(
    local: Option<&A>,
    external: &A,
    template: Option<&[Body]>,
) -> Reconciliation<A> {
    let (working, template_applied) = match template {
        Some(template) if external.is_selection() => {
            (external.with_bodies(fresh_bodies(template)), true)
        }
        _ => (external.clone(), false),
    };

    let replace_local = !suppresses_update(local, &working);
    Reconciliation {
        working,
        template_applied,
        replace_local,
    }
}

/// Local state wins when it already equals the working value, or when both
/// are selections: dragging a selection handle must not wipe staged edits.
pub fn suppresses_update<A: AnnotationValue>(local: Option<&A>, working: &A) -> bool {
    let Some(local) = local else {
        return false;
    };
    local == working || (local.is_selection() && working.is_selection())
}
