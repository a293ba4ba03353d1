//! Request-level services.
//!
//! Every operation takes the caller as an explicit [`Identity`](crate::domain::Identity)
//! argument; nothing is read from ambient request state.

mod comments;
mod community;
mod content;
mod page_cache;
mod social;

pub use comments::CommentService;
pub use community::CommunityService;
pub use content::{ContentService, PostDraft};
pub use page_cache::PageCache;
pub use social::{FollowOutcome, Profile, SocialService, UnfollowOutcome};

use crate::domain::{Post, User};
use crate::error::DomainError;
use crate::pagination::{Page, Paginator};
use crate::ports::{PostFilter, PostRepository, UserRepository};

/// Count, clamp and fetch one page of posts.
pub(crate) async fn paginate_posts(
    posts: &dyn PostRepository,
    paginator: &Paginator,
    filter: &PostFilter,
    requested: Option<i64>,
) -> Result<Page<Post>, DomainError> {
    let total = posts.count(filter).await?;
    let window = paginator.resolve(requested, total);
    let items = posts.list(filter, window.offset, window.limit).await?;
    Ok(Page::new(window, items, total))
}

pub(crate) async fn resolve_user(
    users: &dyn UserRepository,
    username: &str,
) -> Result<User, DomainError> {
    users
        .find_by_username(username)
        .await?
        .ok_or_else(|| DomainError::not_found("user", username))
}
