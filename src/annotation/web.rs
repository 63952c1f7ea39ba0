use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AnnotationValue, BodyRef};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "body")]
    pub bodies: Vec<BodyRef>,
    #[serde(default)]
    pub target: Value,
    #[serde(default, rename = "isSelection")]
    pub is_selection: bool,
}

impl WebAnnotation {
    pub fn selection(target: Value) -> Self {
        Self {
            id: None,
            bodies: Vec::new(),
            target,
            is_selection: true,
        }
    }

    pub fn annotation(id: impl Into<String>, target: Value, bodies: Vec<BodyRef>) -> Self {
        Self {
            id: Some(id.into()),
            bodies,
            target,
            is_selection: false,
        }
    }
}

impl AnnotationValue for WebAnnotation {
    fn is_selection(&self) -> bool {
        self.is_selection
    }

    fn bodies(&self) -> &[BodyRef] {
        &self.bodies
    }

    fn with_bodies(&self, bodies: Vec<BodyRef>) -> Self {
        Self {
            bodies,
            ..self.clone()
        }
    }

    fn to_annotation(&self) -> Self {
        if !self.is_selection {
            return self.clone();
        }
        Self {
            id: Some(format!("#{}", uuid::Uuid::new_v4())),
            is_selection: false,
            ..self.clone()
        }
    }
}
