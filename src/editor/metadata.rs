use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::annotation::{Body, BodyRef, Creator};
use crate::environment::Environment;

/// Authorship and timestamp fields to merge into a body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationMeta {
    pub creator: Option<Creator>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl CreationMeta {
    pub fn is_empty(&self) -> bool {
        self.creator.is_none() && self.created.is_none() && self.modified.is_none()
    }

    pub fn apply(self, mut body: Body) -> Body {
        if let Some(creator) = self.creator {
            body.creator = Some(creator);
        }
        if let Some(created) = self.created {
            body.created = Some(created);
        }
        if let Some(modified) = self.modified {
            body.modified = Some(modified);
        }
        body
    }
}

/// Drafts and anonymous sessions get an empty patch.
pub fn creation_meta(body: &Body, env: &dyn Environment) -> CreationMeta {
    if body.draft {
        return CreationMeta::default();
    }
    let Some(user) = env.current_user() else {
        return CreationMeta::default();
    };

    let now = env.current_time_adjusted();
    let creator = Creator {
        id: user.id,
        name: user.name,
    };
    let (created, modified) = if body.created.is_some() {
        (None, Some(now))
    } else {
        (Some(now), None)
    };

    CreationMeta {
        creator: Some(creator),
        created,
        modified,
    }
}

pub fn stamp(body: Body, env: &dyn Environment) -> Body {
    let meta = creation_meta(&body, env);
    meta.apply(body)
}

pub fn undraft(body: &Body, env: &dyn Environment) -> Body {
    let mut body = body.clone();
    body.draft = false;
    stamp(body, env)
}

/// Undrafts every draft body; finalized bodies keep their identity.
pub fn finalize_bodies(bodies: &[BodyRef], env: &dyn Environment) -> Vec<BodyRef> {
    bodies
        .iter()
        .map(|body| {
            if body.draft {
                Rc::new(undraft(body, env))
            } else {
                Rc::clone(body)
            }
        })
        .collect()
}
