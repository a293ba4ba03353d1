//! # Yatube Shared
//!
//! Types exchanged with the browser: submitted forms and query strings,
//! plus the field-level error map used to re-render invalid forms.

pub mod forms;
pub mod query;

pub use forms::{CleanPost, CommentForm, FieldErrors, PostForm};
pub use query::PageQuery;
