//! Community listing service.

use std::sync::Arc;

use crate::domain::{Group, Post};
use crate::error::DomainError;
use crate::pagination::{Page, Paginator};
use crate::ports::{GroupRepository, PostFilter, PostRepository};

use super::paginate_posts;

pub struct CommunityService {
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    paginator: Paginator,
}

impl CommunityService {
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        posts: Arc<dyn PostRepository>,
        paginator: Paginator,
    ) -> Self {
        Self {
            groups,
            posts,
            paginator,
        }
    }

    pub async fn get_group(&self, slug: &str) -> Result<Group, DomainError> {
        self.groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))
    }

    pub async fn list_group_posts(
        &self,
        slug: &str,
        page: Option<i64>,
    ) -> Result<Page<Post>, DomainError> {
        let group = self.get_group(slug).await?;
        self.list_posts_in(&group, page).await
    }

    /// Posts of an already resolved group. Ungrouped posts never appear.
    pub async fn list_posts_in(
        &self,
        group: &Group,
        page: Option<i64>,
    ) -> Result<Page<Post>, DomainError> {
        paginate_posts(
            self.posts.as_ref(),
            &self.paginator,
            &PostFilter::Group(group.id),
            page,
        )
        .await
    }

    /// Every group, ordered by title, for group pickers.
    pub async fn list_groups(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.list_all().await?)
    }
}
