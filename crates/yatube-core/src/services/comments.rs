//! Comment service - comments are append-only.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Identity};
use crate::error::DomainError;
use crate::ports::{Clock, CommentRepository, PostRepository, UserRepository};

use super::resolve_user;

pub struct CommentService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl CommentService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
            clock,
        }
    }

    /// Comments of a post, newest first.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.list_for_post(post_id).await?)
    }

    pub async fn add_comment(
        &self,
        caller: &Identity,
        username: &str,
        post_id: Uuid,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let author = resolve_user(self.users.as_ref(), username).await?;
        let post = self
            .posts
            .find_by_author(author.id, post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        if text.trim().is_empty() {
            return Err(DomainError::Validation(
                "Comment text must not be empty".to_string(),
            ));
        }

        let comment = Comment::new(post.id, caller.user_id, text.to_string(), self.clock.now());
        let comment = self.comments.create(comment).await?;

        tracing::info!(
            comment_id = %comment.id,
            post_id = %post.id,
            author = %caller.username,
            "Comment added"
        );
        Ok(comment)
    }
}
