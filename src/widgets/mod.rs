//! Headless child editors. Each one is built from an explicit
//! [`EditorHandle`](crate::editor::EditorHandle) and only touches state through it.

mod comment;
mod tag;

pub use comment::CommentWidget;
pub use tag::TagWidget;
