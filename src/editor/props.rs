use std::rc::Rc;

use crate::annotation::Body;
use crate::geometry::Bounds;
use crate::host::Anchor;

/// Inputs supplied by the caller on every render.
pub struct EditorProps<A> {
    pub annotation: Option<Rc<A>>,
    pub apply_template: Option<Vec<Body>>,
    pub apply_immediately: bool,
    pub selected_element: Option<Rc<dyn Anchor>>,
    pub wrapper: Rc<dyn Anchor>,
    pub read_only: bool,
}

impl<A> EditorProps<A> {
    pub fn new(wrapper: Rc<dyn Anchor>) -> Self {
        Self {
            annotation: None,
            apply_template: None,
            apply_immediately: false,
            selected_element: None,
            wrapper,
            read_only: false,
        }
    }

    pub fn with_annotation(mut self, annotation: Rc<A>) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn with_selected_element(mut self, element: Rc<dyn Anchor>) -> Self {
        self.selected_element = Some(element);
        self
    }

    pub fn with_template(mut self, template: Vec<Body>, apply_immediately: bool) -> Self {
        self.apply_template = Some(template);
        self.apply_immediately = apply_immediately;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

impl<A> Clone for EditorProps<A> {
    fn clone(&self) -> Self {
        Self {
            annotation: self.annotation.clone(),
            apply_template: self.apply_template.clone(),
            apply_immediately: self.apply_immediately,
            selected_element: self.selected_element.clone(),
            wrapper: Rc::clone(&self.wrapper),
            read_only: self.read_only,
        }
    }
}

/// The inputs whose change re-runs reconciliation.
pub(super) struct EffectDeps<A> {
    annotation: Option<Rc<A>>,
    selected_bounds: Option<Bounds>,
}

impl<A> EffectDeps<A> {
    pub(super) fn of(props: &EditorProps<A>) -> Self {
        Self {
            annotation: props.annotation.clone(),
            selected_bounds: props.selected_element.as_ref().map(|element| element.bounds()),
        }
    }

    /// Annotation by reference, geometry by value.
    pub(super) fn same_as(&self, other: &Self) -> bool {
        let same_annotation = match (&self.annotation, &other.annotation) {
            (Some(left), Some(right)) => Rc::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        };
        same_annotation && self.selected_bounds == other.selected_bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::WebAnnotation;
    use crate::host::MemoryAnchor;

    fn anchor(x: f64) -> Rc<dyn Anchor> {
        Rc::new(MemoryAnchor::new(Bounds::new(x, 0.0, 10.0, 10.0)))
    }

    #[test]
    fn deps_compare_annotation_by_reference() {
        let annotation = Rc::new(WebAnnotation::selection(serde_json::Value::Null));
        let twin = Rc::new(WebAnnotation::selection(serde_json::Value::Null));
        let props = EditorProps::new(anchor(0.0)).with_annotation(Rc::clone(&annotation));

        let same = EditorProps::new(anchor(0.0)).with_annotation(annotation);
        let other = EditorProps::new(anchor(0.0)).with_annotation(twin);

        assert!(EffectDeps::of(&props).same_as(&EffectDeps::of(&same)));
        assert!(!EffectDeps::of(&props).same_as(&EffectDeps::of(&other)));
    }

    #[test]
    fn deps_compare_geometry_by_value() {
        let props = EditorProps::<WebAnnotation>::new(anchor(0.0)).with_selected_element(anchor(5.0));
        let moved_copy = EditorProps::new(anchor(0.0)).with_selected_element(anchor(5.0));
        let moved = EditorProps::new(anchor(0.0)).with_selected_element(anchor(6.0));

        assert!(EffectDeps::of(&props).same_as(&EffectDeps::of(&moved_copy)));
        assert!(!EffectDeps::of(&props).same_as(&EffectDeps::of(&moved)));
    }
}
