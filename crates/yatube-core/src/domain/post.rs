use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PREVIEW_WIDTH, shorten};

/// Post entity - a user-authored text entry, optionally grouped and illustrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    /// Reference to stored media; storage itself is external.
    pub image: Option<String>,
}

impl Post {
    /// Create a new post.
    pub fn new(
        author_id: Uuid,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            created_at,
            author_id,
            group_id,
            image,
        }
    }

    /// Replace the mutable fields. Author and timestamp never change.
    pub fn replace_content(&mut self, text: String, group_id: Option<Uuid>, image: Option<String>) {
        self.text = text;
        self.group_id = group_id;
        self.image = image;
    }

    /// Short single-line rendition of the text.
    pub fn preview(&self) -> String {
        shorten(&self.text, PREVIEW_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_content_keeps_author_and_timestamp() {
        let author = Uuid::new_v4();
        let created = Utc::now();
        let mut post = Post::new(author, "first".into(), None, None, created);
        let id = post.id;

        post.replace_content("second".into(), Some(Uuid::new_v4()), Some("posts/a.gif".into()));

        assert_eq!(post.id, id);
        assert_eq!(post.author_id, author);
        assert_eq!(post.created_at, created);
        assert_eq!(post.text, "second");
        assert!(post.group_id.is_some());
    }
}
