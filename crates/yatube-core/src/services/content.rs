//! Content service - create, read and edit posts.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Identity, Post, User};
use crate::error::DomainError;
use crate::pagination::{Page, Paginator};
use crate::ports::{Clock, GroupRepository, PostFilter, PostRepository, UserRepository};

use super::{paginate_posts, resolve_user};

/// User-submitted post content, used for both creation and full-replace edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

impl PostDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            group_id: None,
            image: None,
        }
    }

    pub fn with_group(mut self, group_id: Uuid) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

pub struct ContentService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
    paginator: Paginator,
}

impl ContentService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        posts: Arc<dyn PostRepository>,
        clock: Arc<dyn Clock>,
        paginator: Paginator,
    ) -> Self {
        Self {
            users,
            groups,
            posts,
            clock,
            paginator,
        }
    }

    /// All posts, newest first.
    pub async fn list_posts(&self, page: Option<i64>) -> Result<Page<Post>, DomainError> {
        paginate_posts(self.posts.as_ref(), &self.paginator, &PostFilter::All, page).await
    }

    pub async fn create_post(&self, caller: &Identity, draft: PostDraft) -> Result<Post, DomainError> {
        let draft = self.check_draft(draft).await?;
        let post = Post::new(
            caller.user_id,
            draft.text,
            draft.group_id,
            draft.image,
            self.clock.now(),
        );
        let post = self.posts.create(post).await?;

        tracing::info!(post_id = %post.id, author = %caller.username, preview = %post.preview(), "Post created");
        Ok(post)
    }

    /// Find a post by id, only if `username` wrote it.
    pub async fn get_post(&self, username: &str, post_id: Uuid) -> Result<Post, DomainError> {
        let author = resolve_user(self.users.as_ref(), username).await?;
        self.posts
            .find_by_author(author.id, post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// Replace text, group and image of a post. Only the author may do this.
    pub async fn edit_post(
        &self,
        caller: &Identity,
        username: &str,
        post_id: Uuid,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let author = self.authorize_edit(caller, username).await?;
        let mut post = self
            .posts
            .find_by_author(author.id, post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let draft = self.check_draft(draft).await?;
        post.replace_content(draft.text, draft.group_id, draft.image);
        let post = self.posts.update(post).await?;

        tracing::info!(post_id = %post.id, author = %username, "Post edited");
        Ok(post)
    }

    /// Load a post for the edit form, applying the same permission rule as `edit_post`.
    pub async fn post_for_edit(
        &self,
        caller: &Identity,
        username: &str,
        post_id: Uuid,
    ) -> Result<Post, DomainError> {
        let author = self.authorize_edit(caller, username).await?;
        self.posts
            .find_by_author(author.id, post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn authorize_edit(
        &self,
        caller: &Identity,
        username: &str,
    ) -> Result<User, DomainError> {
        let author = resolve_user(self.users.as_ref(), username).await?;
        if caller.username != author.username {
            tracing::debug!(caller = %caller.username, owner = %author.username, "Edit refused");
            return Err(DomainError::PermissionDenied {
                owner: author.username,
            });
        }
        Ok(author)
    }

    async fn check_draft(&self, mut draft: PostDraft) -> Result<PostDraft, DomainError> {
        if draft.text.trim().is_empty() {
            return Err(DomainError::Validation("Post text must not be empty".to_string()));
        }
        if let Some(group_id) = draft.group_id {
            if self.groups.find_by_id(group_id).await?.is_none() {
                return Err(DomainError::Validation(format!("Unknown group {group_id}")));
            }
        }
        draft.image = draft.image.filter(|image| !image.trim().is_empty());
        Ok(draft)
    }
}
