//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use yatube_core::domain::{Comment, Follow, Group, Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostFilter, PostRepository,
    UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL follow repository.
pub type PostgresFollowRepository = PostgresBaseRepository<FollowEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        self.fetch_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let active_model: user::ActiveModel = entity.clone().into();
        UserEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_column(user::Column::Username)
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        Ok(entity)
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        self.fetch_by_id(id).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = GroupEntity::find()
            .filter(group::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, entity: Group) -> Result<Group, RepoError> {
        let active_model: group::ActiveModel = entity.clone().into();
        GroupEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(group::Column::Id)
                    .update_columns([
                        group::Column::Title,
                        group::Column::Slug,
                        group::Column::Description,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        Ok(entity)
    }
}

fn post_condition(filter: &PostFilter) -> Condition {
    match filter {
        PostFilter::All => Condition::all(),
        PostFilter::Group(id) => Condition::all().add(post::Column::GroupId.eq(*id)),
        PostFilter::Author(id) => Condition::all().add(post::Column::AuthorId.eq(*id)),
        PostFilter::Authors(ids) => {
            Condition::all().add(post::Column::AuthorId.is_in(ids.iter().copied()))
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.fetch_by_id(id).await
    }

    async fn find_by_author(
        &self,
        author_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(post_id)
            .filter(post::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, entity: Post) -> Result<Post, RepoError> {
        self.insert(entity).await
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        // Author and creation time are never written on update.
        let active_model = post::ActiveModel {
            id: ActiveValue::Unchanged(entity.id),
            text: ActiveValue::Set(entity.text),
            group_id: ActiveValue::Set(entity.group_id),
            image: ActiveValue::Set(entity.image),
            ..Default::default()
        };

        let model = active_model.update(&self.db).await.map_err(write_error)?;
        Ok(model.into())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post_condition(filter))
            .count(&self.db)
            .await
            .map_err(query_error)
    }

    async fn list(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post_condition(filter))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, entity: Comment) -> Result<Comment, RepoError> {
        self.insert(entity).await
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

fn edge(follower_id: Uuid, followee_id: Uuid) -> Condition {
    Condition::all()
        .add(follow::Column::FollowerId.eq(follower_id))
        .add(follow::Column::FolloweeId.eq(followee_id))
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn exists(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool, RepoError> {
        let count = FollowEntity::find()
            .filter(edge(follower_id, followee_id))
            .count(&self.db)
            .await
            .map_err(query_error)?;

        Ok(count > 0)
    }

    async fn create(&self, entity: Follow) -> Result<Follow, RepoError> {
        self.insert(entity).await
    }

    async fn delete(&self, follower_id: Uuid, followee_id: Uuid) -> Result<u64, RepoError> {
        let result = FollowEntity::delete_many()
            .filter(edge(follower_id, followee_id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected)
    }

    async fn followees(&self, follower_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        FollowEntity::find()
            .select_only()
            .column(follow::Column::FolloweeId)
            .filter(follow::Column::FollowerId.eq(follower_id))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(query_error)
    }
}
