use anyhow::{Context, Result};
use axum::Router;
use follow_backend::{
    app_state::AppState,
    config::{Config, LogFormat, StoreBackend},
    db, routes,
    store::{InMemoryStore, PgStore},
};
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    if let Err(e) = run(config).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "follow_backend=debug,tower_http=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

async fn run(config: Config) -> Result<()> {
    let app = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = db::connect_to_db(&config).await?;
            if config.run_migrations {
                db::run_migrations(&pool).await?;
                tracing::info!("database migrations applied");
            }

            let session_store = PostgresStore::new(pool.clone());
            session_store
                .migrate()
                .await
                .context("Failed to migrate session store")?;

            let state = AppState::new(PgStore::new(pool));
            routes::create_app(state, session_store, true)
        }
        StoreBackend::Memory => {
            let store = match &config.seed_users_path {
                Some(path) => InMemoryStore::from_seed_file(path)?,
                None => InMemoryStore::new(),
            };
            tracing::warn!(
                users = store.user_count(),
                "using in-memory store, data is lost on shutdown"
            );

            let state = AppState::new(store);
            routes::create_app(state, MemoryStore::default(), false)
        }
    };

    serve(&config.bind_addr, app).await
}

async fn serve(bind_addr: &str, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!("listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
