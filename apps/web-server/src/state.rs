//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::pagination::Paginator;
use yatube_core::ports::{
    Cache, Clock, CommentRepository, FollowRepository, GroupRepository, PostRepository,
    SystemClock, TokenService, UserRepository,
};
use yatube_core::services::{
    CommentService, CommunityService, ContentService, PageCache, SocialService,
};
use yatube_infra::{InMemoryCache, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use yatube_infra::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresFollowRepository,
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

#[cfg(feature = "redis")]
use yatube_infra::{RedisCache, RedisConfig};

use crate::config::AppConfig;

/// The five repositories a running site needs.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    pub fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            users: store.users.clone(),
            groups: store.groups.clone(),
            posts: store.posts.clone(),
            comments: store.comments.clone(),
            follows: store.follows.clone(),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            follows: Arc::new(PostgresFollowRepository::new(db.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService>,
    pub community: Arc<CommunityService>,
    pub comments: Arc<CommentService>,
    pub social: Arc<SocialService>,
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub page_cache: PageCache,
    pub tokens: Arc<dyn TokenService>,
    pub login_url: String,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let repos = Self::repositories(config).await;
        let cache = Self::page_cache_backend(config).await?;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());

        tracing::info!("Application state initialized");
        Ok(Self::assemble(
            repos,
            cache,
            Arc::new(SystemClock),
            tokens,
            config,
        ))
    }

    /// Wire services over already constructed adapters.
    pub fn assemble(
        repos: Repositories,
        cache: Arc<dyn Cache>,
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenService>,
        config: &AppConfig,
    ) -> Self {
        let paginator = Paginator::new(config.paginate_by);

        let content = ContentService::new(
            repos.users.clone(),
            repos.groups.clone(),
            repos.posts.clone(),
            clock.clone(),
            paginator,
        );
        let community = CommunityService::new(repos.groups.clone(), repos.posts.clone(), paginator);
        let comments = CommentService::new(
            repos.users.clone(),
            repos.posts.clone(),
            repos.comments.clone(),
            clock.clone(),
        );
        let social = SocialService::new(
            repos.users.clone(),
            repos.posts.clone(),
            repos.follows.clone(),
            clock,
            paginator,
        );

        Self {
            content: Arc::new(content),
            community: Arc::new(community),
            comments: Arc::new(comments),
            social: Arc::new(social),
            users: repos.users,
            groups: repos.groups,
            page_cache: PageCache::new(cache, config.index_cache_ttl),
            tokens,
            login_url: config.login_url.clone(),
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running with in-memory storage.");
            return Repositories::in_memory(&InMemoryStore::new());
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => Repositories::postgres(&connections),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory storage.");
                Repositories::in_memory(&InMemoryStore::new())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory storage");
        Repositories::in_memory(&InMemoryStore::new())
    }

    #[cfg(feature = "redis")]
    async fn page_cache_backend(config: &AppConfig) -> std::io::Result<Arc<dyn Cache>> {
        if config.redis_url.is_none() {
            return Ok(Arc::new(InMemoryCache::new()));
        }

        let redis_config = RedisConfig::from_env();
        let fallback = redis_config.fallback_to_memory;
        match RedisCache::new(redis_config).await {
            Ok(cache) => Ok(Arc::new(cache)),
            Err(e) if fallback => {
                tracing::warn!(error = %e, "Redis unavailable. Using in-memory page cache.");
                Ok(Arc::new(InMemoryCache::new()))
            }
            Err(e) => Err(std::io::Error::other(e.to_string())),
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn page_cache_backend(_config: &AppConfig) -> std::io::Result<Arc<dyn Cache>> {
        Ok(Arc::new(InMemoryCache::new()))
    }
}
