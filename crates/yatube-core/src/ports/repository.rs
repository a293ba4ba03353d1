use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Follow, Group, Post, User};
use crate::error::RepoError;

/// User repository. Accounts are written by the authentication subsystem;
/// `save` exists for provisioning and fixtures.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    async fn save(&self, user: User) -> Result<User, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError>;

    /// All groups ordered by title.
    async fn list_all(&self) -> Result<Vec<Group>, RepoError>;

    async fn save(&self, group: Group) -> Result<Group, RepoError>;
}

/// Which posts a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(Uuid),
    Author(Uuid),
    Authors(Vec<Uuid>),
}

/// Post repository. Listings are newest first, ties broken by id descending.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Find a post only if it was written by `author_id`.
    async fn find_by_author(&self, author_id: Uuid, post_id: Uuid)
    -> Result<Option<Post>, RepoError>;

    async fn create(&self, post: Post) -> Result<Post, RepoError>;

    /// Overwrite text, group and image of an existing post.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    async fn list(&self, filter: &PostFilter, offset: u64, limit: u64)
    -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: Comment) -> Result<Comment, RepoError>;

    /// Comments of a post, newest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Follow edge repository.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn exists(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, RepoError>;

    /// Insert an edge. Returns `RepoError::Constraint` when the store rejects a duplicate.
    async fn create(&self, follow: Follow) -> Result<Follow, RepoError>;

    /// Remove the edge, returning the number of rows removed.
    async fn delete(&self, follower_id: Uuid, followee_id: Uuid) -> Result<u64, RepoError>;

    /// Ids of every user `follower_id` follows.
    async fn followees(&self, follower_id: Uuid) -> Result<Vec<Uuid>, RepoError>;
}
