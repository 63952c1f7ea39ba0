use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shared handle to a body. Mutators locate their target by pointer identity,
/// so two bodies with identical content stay distinguishable.
pub type BodyRef = Rc<Body>;

pub const TEXTUAL_BODY: &str = "TextualBody";
pub const PURPOSE_COMMENTING: &str = "commenting";
pub const PURPOSE_TAGGING: &str = "tagging";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One content entry attached to an annotation.
///
/// Only the fields the editor reasons about are typed; everything else a
/// widget stores rides along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Body {
    pub fn textual(purpose: &str, value: impl Into<String>) -> Self {
        Self {
            kind: Some(TEXTUAL_BODY.to_string()),
            value: Some(value.into()),
            purpose: Some(purpose.to_string()),
            ..Self::default()
        }
    }

    pub fn into_draft(mut self) -> Self {
        self.draft = true;
        self
    }

    pub fn has_purpose(&self, purpose: &str) -> bool {
        self.purpose.as_deref() == Some(purpose)
    }
}

/// Copies a template into freshly allocated bodies so the working value never
/// shares storage with the caller's template.
pub fn fresh_bodies(template: &[Body]) -> Vec<BodyRef> {
    template.iter().cloned().map(Rc::new).collect()
}
