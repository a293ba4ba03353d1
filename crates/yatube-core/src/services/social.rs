//! Social graph service - follow edges, profiles and the personal feed.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Follow, Identity, Post, User};
use crate::error::{DomainError, RepoError};
use crate::pagination::{Page, Paginator};
use crate::ports::{Clock, FollowRepository, PostFilter, PostRepository, UserRepository};

use super::{paginate_posts, resolve_user};

/// Result of a follow request. Every variant leaves the edge present,
/// except `SelfFollow` which never creates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Created,
    AlreadyFollowing,
    SelfFollow,
}

/// Result of an unfollow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowOutcome {
    Removed,
    NotFollowing,
    SelfFollow,
}

/// A user's profile as seen by a (possibly anonymous) viewer.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub posts: Page<Post>,
    pub is_following: bool,
}

pub struct SocialService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    follows: Arc<dyn FollowRepository>,
    clock: Arc<dyn Clock>,
    paginator: Paginator,
}

impl SocialService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        follows: Arc<dyn FollowRepository>,
        clock: Arc<dyn Clock>,
        paginator: Paginator,
    ) -> Self {
        Self {
            users,
            posts,
            follows,
            clock,
            paginator,
        }
    }

    pub async fn follow(
        &self,
        caller: &Identity,
        target_username: &str,
    ) -> Result<FollowOutcome, DomainError> {
        let target = resolve_user(self.users.as_ref(), target_username).await?;
        if target.id == caller.user_id {
            return Ok(FollowOutcome::SelfFollow);
        }
        if self.follows.exists(caller.user_id, target.id).await? {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        // The existence check above is not atomic; a concurrent follow may
        // win the insert, in which case the store's unique index rejects ours.
        let edge = Follow::new(caller.user_id, target.id, self.clock.now());
        match self.follows.create(edge).await {
            Ok(_) => {
                tracing::info!(follower = %caller.username, followee = %target.username, "Follow created");
                Ok(FollowOutcome::Created)
            }
            Err(RepoError::Constraint(_)) => Ok(FollowOutcome::AlreadyFollowing),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn unfollow(
        &self,
        caller: &Identity,
        target_username: &str,
    ) -> Result<UnfollowOutcome, DomainError> {
        let target = resolve_user(self.users.as_ref(), target_username).await?;
        if target.id == caller.user_id {
            return Ok(UnfollowOutcome::SelfFollow);
        }

        let removed = self.follows.delete(caller.user_id, target.id).await?;
        if removed == 0 {
            return Ok(UnfollowOutcome::NotFollowing);
        }

        tracing::info!(follower = %caller.username, followee = %target.username, "Follow removed");
        Ok(UnfollowOutcome::Removed)
    }

    /// Whether `viewer` follows `target_id`. Anonymous viewers follow nobody.
    pub async fn is_following(
        &self,
        viewer: Option<&Identity>,
        target_id: Uuid,
    ) -> Result<bool, DomainError> {
        match viewer {
            Some(viewer) => Ok(self.follows.exists(viewer.user_id, target_id).await?),
            None => Ok(false),
        }
    }

    pub async fn profile(
        &self,
        viewer: Option<&Identity>,
        username: &str,
        page: Option<i64>,
    ) -> Result<Profile, DomainError> {
        let user = resolve_user(self.users.as_ref(), username).await?;
        let posts = paginate_posts(
            self.posts.as_ref(),
            &self.paginator,
            &PostFilter::Author(user.id),
            page,
        )
        .await?;
        let is_following = self.is_following(viewer, user.id).await?;

        Ok(Profile {
            user,
            posts,
            is_following,
        })
    }

    /// Posts by everyone `caller` follows, newest first.
    pub async fn feed(&self, caller: &Identity, page: Option<i64>) -> Result<Page<Post>, DomainError> {
        let followees = self.follows.followees(caller.user_id).await?;
        if followees.is_empty() {
            let window = self.paginator.resolve(page, 0);
            return Ok(Page::new(window, Vec::new(), 0));
        }

        paginate_posts(
            self.posts.as_ref(),
            &self.paginator,
            &PostFilter::Authors(followees),
            page,
        )
        .await
    }
}
