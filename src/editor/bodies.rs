//! Body sequence transforms behind append / update / remove.

use std::rc::Rc;

use crate::annotation::{Body, BodyRef};

use super::metadata::CreationMeta;

pub fn appended(bodies: &[BodyRef], body: Body, meta: CreationMeta) -> Vec<BodyRef> {
    let mut next = bodies.to_vec();
    next.push(Rc::new(meta.apply(body)));
    next
}

/// Replaces the first entry that is `previous` itself. `None` when no entry
/// matches.
pub fn updated(
    bodies: &[BodyRef],
    previous: &BodyRef,
    body: Body,
    meta: CreationMeta,
) -> Option<Vec<BodyRef>> {
    let index = position_of(bodies, previous)?;
    let mut next = bodies.to_vec();
    next[index] = Rc::new(meta.apply(body));
    Some(next)
}

pub fn removed(bodies: &[BodyRef], target: &BodyRef) -> Option<Vec<BodyRef>> {
    let index = position_of(bodies, target)?;
    let mut next = bodies.to_vec();
    next.remove(index);
    Some(next)
}

fn position_of(bodies: &[BodyRef], target: &BodyRef) -> Option<usize> {
    bodies.iter().position(|body| Rc::ptr_eq(body, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::PURPOSE_TAGGING;

    fn tags(values: &[&str]) -> Vec<BodyRef> {
        values
            .iter()
            .map(|value| Rc::new(Body::textual(PURPOSE_TAGGING, *value)))
            .collect()
    }

    fn values(bodies: &[BodyRef]) -> Vec<&str> {
        bodies
            .iter()
            .filter_map(|body| body.value.as_deref())
            .collect()
    }

    #[test]
    fn appended_adds_to_the_end() {
        let bodies = tags(&["a", "b"]);
        let next = appended(
            &bodies,
            Body::textual(PURPOSE_TAGGING, "c"),
            CreationMeta::default(),
        );
        assert_eq!(values(&next), vec!["a", "b", "c"]);
        assert!(Rc::ptr_eq(&next[0], &bodies[0]));
    }

    #[test]
    fn updated_targets_identity_not_content() {
        let mut bodies = tags(&["same", "other"]);
        bodies.push(Rc::new(Body::textual(PURPOSE_TAGGING, "same")));
        let target = Rc::clone(&bodies[2]);

        let next = updated(
            &bodies,
            &target,
            Body::textual(PURPOSE_TAGGING, "changed"),
            CreationMeta::default(),
        )
        .expect("target is present");

        assert_eq!(values(&next), vec!["same", "other", "changed"]);
        assert!(Rc::ptr_eq(&next[0], &bodies[0]));
        assert!(Rc::ptr_eq(&next[1], &bodies[1]));
    }

    #[test]
    fn removed_keeps_remaining_order() {
        let bodies = tags(&["a", "b", "c"]);
        let next = removed(&bodies, &bodies[1]).expect("target is present");
        assert_eq!(values(&next), vec!["a", "c"]);
    }

    #[test]
    fn update_and_remove_ignore_foreign_bodies() {
        let bodies = tags(&["a"]);
        let stranger = Rc::new(Body::textual(PURPOSE_TAGGING, "a"));

        assert!(removed(&bodies, &stranger).is_none());
        assert!(updated(&bodies, &stranger, Body::default(), CreationMeta::default()).is_none());
    }

    #[test]
    fn update_replaces_exactly_one_entry_when_a_handle_repeats() {
        let shared = Rc::new(Body::textual(PURPOSE_TAGGING, "dup"));
        let bodies = vec![Rc::clone(&shared), Rc::clone(&shared)];

        let next = updated(
            &bodies,
            &shared,
            Body::textual(PURPOSE_TAGGING, "new"),
            CreationMeta::default(),
        )
        .expect("target is present");

        assert_eq!(values(&next), vec!["new", "dup"]);
    }
}
