//! Form pages.

use std::fmt::Write;

use uuid::Uuid;
use yatube_core::domain::Group;
use yatube_shared::{FieldErrors, PostForm};

use super::listings::comment_section;
use super::{CommentCard, PostCard, escape, layout, post_article, segment};

const NO_GROUP_LABEL: &str = "No group selected";

/// Whether the post form creates or edits.
#[derive(Debug, Clone)]
pub enum PostFormMode {
    New,
    Edit { username: String, post_id: Uuid },
}

/// A comment form with what the user typed and what was wrong with it.
#[derive(Debug, Clone)]
pub struct CommentBox<'a> {
    pub action: String,
    pub text: &'a str,
    pub errors: &'a FieldErrors,
}

pub fn post_form(mode: &PostFormMode, form: &PostForm, groups: &[Group], errors: &FieldErrors) -> String {
    let (heading, action, submit) = match mode {
        PostFormMode::New => ("New post".to_string(), "/new/".to_string(), "Add"),
        PostFormMode::Edit { username, post_id } => (
            "Edit post".to_string(),
            format!("/{}/{}/edit/", segment(username), post_id),
            "Save",
        ),
    };

    let selected = form.group.as_deref().unwrap_or("");
    let mut options = format!(r#"<option value="">{NO_GROUP_LABEL}</option>"#);
    for group in groups {
        let id = group.id.to_string();
        let mark = if id == selected { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{id}"{mark}>{}</option>"#,
            escape(&group.title)
        );
    }

    let body = format!(
        r#"<h1>{heading}</h1>
{general}
<form method="post" action="{action}">
<label for="id_text">Text</label>
<textarea name="text" id="id_text">{text}</textarea>
{text_errors}
<label for="id_group">Group</label>
<select name="group" id="id_group">{options}</select>
{group_errors}
<label for="id_image">Image</label>
<input type="text" name="image" id="id_image" value="{image}">
<button type="submit">{submit}</button>
</form>
"#,
        general = field_errors(errors, "__all__"),
        text = escape(&form.text),
        text_errors = field_errors(errors, "text"),
        group_errors = field_errors(errors, "group"),
        image = escape(form.image.as_deref().unwrap_or("")),
    );
    layout(&heading, &body)
}

/// Standalone comment submission page.
pub fn comment_page(card: &PostCard, comments: &[CommentCard], form: CommentBox<'_>) -> String {
    let mut body = post_article(card, true);
    body.push_str(&comment_section(comments, Some(form)));
    layout(&format!("Comments: {}", card.post.preview()), &body)
}

pub(super) fn comment_box(form: &CommentBox<'_>) -> String {
    format!(
        r#"<form method="post" action="{action}">
<h5>Add a comment</h5>
<textarea name="text" id="id_text">{text}</textarea>
{errors}
<button type="submit">Send</button>
</form>
"#,
        action = form.action,
        text = escape(form.text),
        errors = field_errors(form.errors, "text"),
    )
}

fn field_errors(errors: &FieldErrors, field: &str) -> String {
    match errors.get(field) {
        Some(messages) if !messages.is_empty() => {
            let mut html = String::from(r#"<ul class="errorlist">"#);
            for message in messages {
                let _ = write!(html, "<li>{}</li>", escape(message));
            }
            html.push_str("</ul>");
            html
        }
        _ => String::new(),
    }
}
