//! # snapdare
//!
//! The entry point that assembles the application. Every adapter is
//! constructed exactly once here and handed to the services by reference;
//! handlers never reach for globals.

use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api_adapters::{router, AppState};
use configs::AppConfig;
use domains::{
    ChallengeRepo, CommentRepo, FollowRepo, IdentityProvider, MediaStore, PostRepo,
    SubmissionRepo, UserRepo,
};
use services::{ChallengeService, CommentService, FollowService, PostService, SubmissionService};
use storage_adapters::memory::{
    MemoryChallengeRepo, MemoryCommentRepo, MemoryFollowRepo, MemoryPostRepo,
    MemorySubmissionRepo, MemoryUserRepo,
};

/// The six persistence ports, whichever backend they resolve to.
struct Backends {
    users: Arc<dyn UserRepo>,
    posts: Arc<dyn PostRepo>,
    challenges: Arc<dyn ChallengeRepo>,
    submissions: Arc<dyn SubmissionRepo>,
    comments: Arc<dyn CommentRepo>,
    follows: Arc<dyn FollowRepo>,
}

fn memory_backends() -> Backends {
    Backends {
        users: Arc::new(MemoryUserRepo::new()),
        posts: Arc::new(MemoryPostRepo::new()),
        challenges: Arc::new(MemoryChallengeRepo::new()),
        submissions: Arc::new(MemorySubmissionRepo::new()),
        comments: Arc::new(MemoryCommentRepo::new()),
        follows: Arc::new(MemoryFollowRepo::new()),
    }
}

#[cfg(feature = "db-postgres")]
async fn build_backends(config: &AppConfig) -> anyhow::Result<Backends> {
    use secrecy::ExposeSecret;
    use storage_adapters::postgres::{
        PgChallengeRepo, PgCommentRepo, PgFollowRepo, PgPostRepo, PgSubmissionRepo, PgUserRepo,
    };

    let Some(url) = config.database.url.as_ref() else {
        info!("no database url configured, using the in-memory backend");
        return Ok(memory_backends());
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(url.expose_secret())
        .await
        .context("failed to connect to Postgres")?;
    sqlx::migrate!("../../crates/storage-adapters/migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    Ok(Backends {
        users: Arc::new(PgUserRepo::new(pool.clone())),
        posts: Arc::new(PgPostRepo::new(pool.clone())),
        challenges: Arc::new(PgChallengeRepo::new(pool.clone())),
        submissions: Arc::new(PgSubmissionRepo::new(pool.clone())),
        comments: Arc::new(PgCommentRepo::new(pool.clone())),
        follows: Arc::new(PgFollowRepo::new(pool)),
    })
}

#[cfg(not(feature = "db-postgres"))]
async fn build_backends(_config: &AppConfig) -> anyhow::Result<Backends> {
    Ok(memory_backends())
}

#[cfg(feature = "auth-jwt")]
fn build_identity(config: &AppConfig) -> Arc<dyn IdentityProvider> {
    use secrecy::ExposeSecret;
    Arc::new(auth_adapters::JwtIdentityProvider::new(
        config.auth.jwt_secret.expose_secret(),
    ))
}

#[cfg(not(feature = "auth-jwt"))]
fn build_identity(_config: &AppConfig) -> Arc<dyn IdentityProvider> {
    tracing::warn!("built without auth-jwt: all bearer tokens will be rejected");
    Arc::new(auth_adapters::StaticTokenProvider::new())
}

#[cfg(feature = "media-local")]
fn build_media(config: &AppConfig) -> Arc<dyn MediaStore> {
    Arc::new(storage_adapters::LocalMediaStore::new(
        config.media.root.clone().into(),
        config.media.url_prefix.clone(),
    ))
}

#[cfg(not(feature = "media-local"))]
fn build_media(_config: &AppConfig) -> Arc<dyn MediaStore> {
    Arc::new(storage_adapters::memory::MemoryMediaStore::new())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = configs::load().context("failed to load configuration")?;

    let backends = build_backends(&config).await?;
    let identity = build_identity(&config);
    let media = build_media(&config);

    let state = AppState {
        challenges: Arc::new(ChallengeService::new(
            backends.challenges.clone(),
            backends.users.clone(),
        )),
        submissions: Arc::new(SubmissionService::new(
            backends.submissions.clone(),
            backends.challenges.clone(),
            backends.posts.clone(),
            backends.users.clone(),
        )),
        posts: Arc::new(PostService::new(
            backends.posts.clone(),
            backends.users.clone(),
        )),
        comments: Arc::new(CommentService::new(
            backends.comments.clone(),
            backends.posts.clone(),
            backends.users.clone(),
        )),
        follows: Arc::new(FollowService::new(
            backends.follows.clone(),
            backends.users.clone(),
        )),
        media,
        identity,
    };

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("snapdare listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
