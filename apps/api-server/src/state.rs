//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use folio_core::ports::{
    AssetError, AssetStore, Cache, MessageRepository, PostRepository, ProjectRepository,
    RateLimiter, RequestCredentials, Session, SessionError, SessionProvider,
};
use folio_core::{AllowList, AuthorizationGate, MessageService, PublishingService};
use folio_infra::{
    CachedSessionProvider, HttpSessionProvider, InMemoryCache, InMemoryMessageRepository,
    InMemoryPostRepository, InMemoryProjectRepository, NoopAssetStore, UploadThingAssetStore,
    ViewCacheInvalidator,
};

#[cfg(feature = "postgres")]
use folio_infra::{
    DatabaseConnections, PostgresMessageRepository, PostgresPostRepository,
    PostgresProjectRepository,
};

#[cfg(feature = "rate-limit")]
use folio_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Failures that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Auth service client: {0}")]
    Session(#[from] SessionError),

    #[error("Asset store client: {0}")]
    Assets(#[from] AssetError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub publishing: Arc<PublishingService>,
    pub messages: Arc<MessageService>,
    pub sessions: Arc<dyn SessionProvider>,
    /// Rendered public views.
    pub cache: Arc<dyn Cache>,
    pub view_cache_ttl: Duration,
    /// Throttle for the public contact form.
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    #[cfg(feature = "postgres")]
    pub db: Option<DatabaseConnections>,
}

/// Used when no auth service is configured: every caller is anonymous.
pub struct AnonymousSessions;

#[async_trait]
impl SessionProvider for AnonymousSessions {
    async fn get_session(
        &self,
        _credentials: &RequestCredentials,
    ) -> Result<Option<Session>, SessionError> {
        Ok(None)
    }
}

/// Repository backends for the three content tables.
struct Repositories {
    posts: Arc<dyn PostRepository>,
    projects: Arc<dyn ProjectRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            projects: Arc::new(InMemoryProjectRepository::new()),
            messages: Arc::new(InMemoryMessageRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: &DatabaseConnections) -> Self {
        Self {
            posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
            projects: Arc::new(PostgresProjectRepository::new(connections.main.clone())),
            messages: Arc::new(PostgresMessageRepository::new(connections.main.clone())),
        }
    }
}

/// Everything the services need, before they are assembled.
pub struct Components {
    pub allow_list: AllowList,
    pub posts: Arc<dyn PostRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub assets: Arc<dyn AssetStore>,
    pub sessions: Arc<dyn SessionProvider>,
    pub cache: Arc<dyn Cache>,
    pub view_cache_ttl: Duration,
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::new());

        #[cfg(feature = "postgres")]
        let (db, repositories) = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let repositories = Repositories::postgres(&connections);
                    (Some(connections), repositories)
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Failed to connect to database. Using in-memory fallback."
                    );
                    (None, Repositories::in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, Repositories::in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repositories = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Repositories::in_memory()
        };

        let sessions: Arc<dyn SessionProvider> = match &config.auth.base_url {
            Some(base_url) => {
                let http = HttpSessionProvider::new(base_url, config.auth.request_timeout)?;
                Arc::new(CachedSessionProvider::new(
                    Arc::new(http),
                    cache.clone(),
                    config.auth.session_cache_ttl,
                ))
            }
            None => {
                tracing::warn!("AUTH_BASE_URL not set. All mutating requests will be rejected.");
                Arc::new(AnonymousSessions)
            }
        };

        let assets: Arc<dyn AssetStore> = match &config.uploadthing {
            Some(uploadthing) => Arc::new(UploadThingAssetStore::new(uploadthing.clone())?),
            None => {
                tracing::warn!("UPLOADTHING_TOKEN not set. Images will not be released.");
                Arc::new(NoopAssetStore)
            }
        };

        #[cfg(feature = "rate-limit")]
        let rate_limiter: Option<Arc<dyn RateLimiter>> =
            Some(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())));
        #[cfg(not(feature = "rate-limit"))]
        let rate_limiter: Option<Arc<dyn RateLimiter>> = None;

        let state = Self::from_components(Components {
            allow_list: config.auth.allow_list.clone(),
            posts: repositories.posts,
            projects: repositories.projects,
            messages: repositories.messages,
            assets,
            sessions,
            cache,
            view_cache_ttl: config.view_cache_ttl,
            rate_limiter,
        });

        tracing::info!("Application state initialized");

        #[cfg(feature = "postgres")]
        let state = Self { db, ..state };
        Ok(state)
    }

    /// Assemble the services around already-built adapters.
    pub fn from_components(components: Components) -> Self {
        let Components {
            allow_list,
            posts,
            projects,
            messages,
            assets,
            sessions,
            cache,
            view_cache_ttl,
            rate_limiter,
        } = components;

        let invalidator = Arc::new(ViewCacheInvalidator::new(cache.clone()));
        let publishing = PublishingService::new(
            AuthorizationGate::new(allow_list.clone()),
            posts,
            projects,
            assets,
            invalidator,
        );
        let messages = MessageService::new(AuthorizationGate::new(allow_list), messages);

        Self {
            publishing: Arc::new(publishing),
            messages: Arc::new(messages),
            sessions,
            cache,
            view_cache_ttl,
            rate_limiter,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Short label for the health endpoint.
    pub async fn storage_status(&self) -> &'static str {
        #[cfg(feature = "postgres")]
        if let Some(db) = &self.db {
            return match db.ping().await {
                Ok(()) => "connected",
                Err(e) => {
                    tracing::error!(error = %e, "Database ping failed");
                    "unreachable"
                }
            };
        }
        "in-memory"
    }
}
