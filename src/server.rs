use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    middleware,
    routing::get,
    Router,
};
use oso::Oso;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    actions::try_register_oso,
    auth::require_login,
    config::Config,
    handlers,
    repo::{self, ReviewRepository, UserRepository},
    store::{KeyStore, MemoryStore, RedisStore},
};

/// Everything a request handler may need, built once at startup.
pub(crate) struct State {
    pub(crate) config: Config,
    pub(crate) oso: Arc<Mutex<Oso>>,
    pub(crate) db: DatabaseConnection,
    pub(crate) users: UserRepository,
    pub(crate) reviews: ReviewRepository,
    pub(crate) store: Arc<dyn KeyStore>,
}

impl State {
    /// Assemble the context from already-opened connections.
    pub(crate) fn new(
        config: Config,
        db: DatabaseConnection,
        store: Arc<dyn KeyStore>,
    ) -> Result<State> {
        let oso = Arc::new(Mutex::new(try_register_oso()?));
        Ok(State {
            config,
            oso,
            users: UserRepository::new(db.clone()),
            reviews: ReviewRepository::new(db.clone()),
            db,
            store,
        })
    }

    /// Open the database and the session store described by `config`, creating tables as needed.
    pub(crate) async fn init(config: Config) -> Result<State> {
        let mut opts = ConnectOptions::new(config.database_url.clone());
        opts.sqlx_logging(config.sql_logging);
        let db = Database::connect(opts)
            .await
            .context("failed to connect to the database")?;
        repo::create_schema(&db)
            .await
            .context("failed to create the schema")?;

        let store: Arc<dyn KeyStore> = match &config.redis_url {
            Some(url) => Arc::new(
                RedisStore::connect(url)
                    .await
                    .context("failed to connect to redis")?,
            ),
            None => {
                info!("REDIS_URL not set, keeping sessions in memory");
                Arc::new(MemoryStore::default())
            }
        };

        State::new(config, db, store)
    }

    /// Release the connections. Dropping the last pool handle closes it.
    pub(crate) fn teardown(self) {
        let State { db, store, .. } = self;
        drop(store);
        drop(db);
        info!("Connections closed");
    }
}

/// Build the router with every route wired to `state`.
pub(crate) fn app(state: Arc<State>) -> Router {
    let protected = Router::new()
        .route(
            "/new_post",
            get(handlers::new_post_form).post(handlers::new_post),
        )
        .route(
            "/user_post",
            get(handlers::user_posts).post(handlers::user_posts),
        )
        .route_layer(middleware::from_fn(require_login));

    Router::new()
        .route("/", get(handlers::index))
        .route("/user_posts/delete/:id", get(handlers::delete_post))
        .route(
            "/user_posts/edit/:id",
            get(handlers::edit_post_form).post(handlers::edit_post),
        )
        .route(
            "/home/upvotes/:id",
            get(handlers::upvote).post(handlers::upvote),
        )
        .route(
            "/home/downvotes/:id",
            get(handlers::downvote).post(handlers::downvote),
        )
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

/// Run the server.
pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let addr = config.addr;
    let state = Arc::new(State::init(config).await?);

    info!("Listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app(state.clone()).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(state) {
        Ok(state) => state.teardown(),
        Err(_) => tracing::warn!("State still shared at shutdown, skipping teardown"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
