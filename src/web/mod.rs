use crate::auth::{Credentials, TokenStore};
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::signal;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod errors;
mod extract;
mod handlers;

pub use errors::AppError;

/// Shared application state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub tokens: Arc<TokenStore>,
    pub credentials: Option<Credentials>,
}

impl AppState {
    pub fn new(db: Database, credentials: Option<Credentials>, tokens: TokenStore) -> Self {
        AppState {
            db: Arc::new(Mutex::new(db)),
            tokens: Arc::new(tokens),
            credentials,
        }
    }

    /// Lock the database for the duration of one statement.
    fn db(&self) -> std::result::Result<MutexGuard<'_, Database>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal("database lock poisoned".to_string()))
    }
}

/// Build the axum router with all routes.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/where_to", post(handlers::where_to))
        .route("/logout", post(handlers::logout))
        .route("/get_reasons", get(handlers::list_reasons))
        .route("/reasons/{id}", delete(handlers::delete_reason))
        .route("/upload", post(handlers::create_post))
        .route("/get", get(handlers::list_posts))
        .route("/get/{id}", get(handlers::get_post))
        .route("/update/{id}", put(handlers::update_post))
        .route("/posts/{id}", delete(handlers::delete_post))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Credentialed CORS for an explicit origin list; methods and headers mirror the preflight.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Open the database, then serve until Ctrl-C or SIGTERM.
pub async fn serve(config: &Config) -> Result<()> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let db = Database::open(&config.db_path)?;
    db.migrate()?;

    if config.credentials.is_none() {
        warn!("ADMIN and KEY are not both set; admin login is disabled");
    }

    let state = AppState::new(
        db,
        config.credentials.clone(),
        TokenStore::new(config.token_ttl),
    );
    let app = create_router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = %listener.local_addr()?,
        environment = config.environment.as_str(),
        db = %config.db_path.display(),
        origins = ?config.cors_origins,
        "blogd listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
