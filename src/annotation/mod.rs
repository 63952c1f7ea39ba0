//! Annotation value model consumed by the editor.

mod body;
mod web;

pub use body::{
    fresh_bodies, Body, BodyRef, Creator, PURPOSE_COMMENTING, PURPOSE_TAGGING, TEXTUAL_BODY,
};
pub use web::WebAnnotation;

/// An annotation or an in-progress selection, treated as an immutable value.
///
/// `PartialEq` is the structural equality the reconciler short-circuits on.
/// Implementations never mutate in place: `with_bodies` returns a new value.
pub trait AnnotationValue: Clone + PartialEq {
    fn is_selection(&self) -> bool;

    fn bodies(&self) -> &[BodyRef];

    fn with_bodies(&self, bodies: Vec<BodyRef>) -> Self;

    /// Converts a selection into a committed annotation. Committed values
    /// return an equal copy.
    fn to_annotation(&self) -> Self;
}
