//! In-memory repositories - used when no database is configured, and by tests.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{Comment, Follow, Group, Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostFilter, PostRepository,
    UserRepository,
};

/// Newest first, ties broken by id descending.
fn newest_first(a: &Post, b: &Post) -> Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
}

fn filter_matches(filter: &PostFilter, post: &Post) -> bool {
    match filter {
        PostFilter::All => true,
        PostFilter::Group(id) => post.group_id == Some(*id),
        PostFilter::Author(id) => post.author_id == *id,
        PostFilter::Authors(ids) => ids.contains(&post.author_id),
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint(format!(
                "username {} already taken",
                user.username
            )));
        }
        rows.retain(|u| u.id != user.id);
        rows.push(user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct InMemoryGroupRepository {
    rows: RwLock<Vec<Group>>,
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        Ok(self.rows.read().await.iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|g| g.slug == slug)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|g| ids.contains(&g.id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let mut groups = self.rows.read().await.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }

    async fn save(&self, group: Group) -> Result<Group, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|g| g.slug == group.slug && g.id != group.id) {
            return Err(RepoError::Constraint(format!(
                "slug {} already taken",
                group.slug
            )));
        }
        rows.retain(|g| g.id != group.id);
        rows.push(group.clone());
        Ok(group)
    }
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    rows: RwLock<Vec<Post>>,
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_author(
        &self,
        author_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<Post>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|p| p.id == post_id && p.author_id == author_id)
            .cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint(format!("post {} exists", post.id)));
        }
        rows.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        row.text = post.text;
        row.group_id = post.group_id;
        row.image = post.image;
        Ok(row.clone())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|p| filter_matches(filter, p))
            .count() as u64)
    }

    async fn list(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|p| filter_matches(filter, p))
            .cloned()
            .collect();
        posts.sort_by(newest_first);

        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryCommentRepository {
    rows: RwLock<Vec<Comment>>,
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.rows.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments: Vec<Comment> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(comments)
    }
}

/// Follow edges. Like the SQL schema, a second edge for the same pair is rejected.
#[derive(Default)]
pub struct InMemoryFollowRepository {
    rows: RwLock<Vec<Follow>>,
}

impl InMemoryFollowRepository {
    /// Number of stored edges, duplicates included.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn exists(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .any(|f| f.follower_id == follower_id && f.followee_id == followee_id))
    }

    async fn create(&self, follow: Follow) -> Result<Follow, RepoError> {
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|f| f.follower_id == follow.follower_id && f.followee_id == follow.followee_id)
        {
            return Err(RepoError::Constraint("follow edge already exists".to_string()));
        }
        rows.push(follow.clone());
        Ok(follow)
    }

    async fn delete(&self, follower_id: Uuid, followee_id: Uuid) -> Result<u64, RepoError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|f| !(f.follower_id == follower_id && f.followee_id == followee_id));
        Ok((before - rows.len()) as u64)
    }

    async fn followees(&self, follower_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|f| f.follower_id == follower_id)
            .map(|f| f.followee_id)
            .collect())
    }
}

/// All in-memory repositories, sharing one process lifetime.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub users: Arc<InMemoryUserRepository>,
    pub groups: Arc<InMemoryGroupRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    pub comments: Arc<InMemoryCommentRepository>,
    pub follows: Arc<InMemoryFollowRepository>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
