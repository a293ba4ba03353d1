//! Browser-submitted forms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Messages per form field, in a stable order for rendering.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Create/edit post form.
///
/// `group` is the selected group id, or empty for "no group".
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A post form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPost {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

impl PostForm {
    /// Trim, validate and parse the form.
    pub fn clean(&self) -> Result<CleanPost, FieldErrors> {
        let trimmed = Self {
            text: self.text.trim().to_string(),
            group: blank_to_none(self.group.as_deref()),
            image: blank_to_none(self.image.as_deref()),
        };

        let mut errors = match trimmed.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => field_errors(&e),
        };

        let group_id = match trimmed.group.as_deref().map(Uuid::parse_str) {
            None => None,
            Some(Ok(id)) => Some(id),
            Some(Err(_)) => {
                add_error(&mut errors, "group", INVALID_CHOICE);
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CleanPost {
            text: trimmed.text,
            group_id,
            image: trimmed.image,
        })
    }
}

/// Comment form shown on the post page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
}

impl CommentForm {
    pub fn clean(&self) -> Result<String, FieldErrors> {
        let trimmed = Self {
            text: self.text.trim().to_string(),
        };
        trimmed.validate().map_err(|e| field_errors(&e))?;
        Ok(trimmed.text)
    }
}

/// Flatten validator errors into per-field messages.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        for err in errs.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            add_error(&mut out, &field.to_string(), &message);
        }
    }
    out
}

pub fn add_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn blank_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(text: &str, group: Option<&str>) -> PostForm {
        PostForm {
            text: text.to_string(),
            group: group.map(str::to_string),
            image: None,
        }
    }

    #[test]
    fn blank_text_is_required() {
        let errors = form("   ", None).clean().unwrap_err();

        assert_eq!(errors["text"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn empty_group_means_no_group() {
        let clean = form("hello", Some("")).clean().unwrap();

        assert_eq!(clean.text, "hello");
        assert_eq!(clean.group_id, None);
    }

    #[test]
    fn malformed_group_is_an_invalid_choice() {
        let errors = form("hello", Some("cats")).clean().unwrap_err();

        assert_eq!(errors["group"], vec![INVALID_CHOICE.to_string()]);
        assert!(!errors.contains_key("text"));
    }

    #[test]
    fn group_id_is_parsed() {
        let id = Uuid::new_v4();
        let clean = form(" text ", Some(&id.to_string())).clean().unwrap();

        assert_eq!(clean.text, "text");
        assert_eq!(clean.group_id, Some(id));
    }

    #[test]
    fn comment_text_is_trimmed_and_required() {
        let ok = CommentForm { text: "  nice post ".into() }.clean();
        let blank = CommentForm { text: "\n".into() }.clean();

        assert_eq!(ok.unwrap(), "nice post");
        assert!(blank.unwrap_err().contains_key("text"));
    }
}
