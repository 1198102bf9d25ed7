use anyhow::Result;
use project_catalog::{bootstrap, build_app, config, connect_database, services};
use std::{fs, io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- .env (optional) ---
    let dotenv = dotenvy::dotenv();

    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // --- Parse config + migrate flag ---
    let (cfg, migrate) = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting project-catalog with config: {:?}", cfg);
    if cfg.uses_default_token() {
        tracing::warn!(
            "No admin token configured, using the default `{}`. Set CATALOG_ADMIN_TOKEN.",
            config::DEFAULT_ADMIN_TOKEN
        );
    }

    // --- Ensure data directory exists ---
    if !cfg.data_dir.exists() {
        fs::create_dir_all(&cfg.data_dir)?;
        tracing::info!("Created data directory at {}", cfg.data_dir.display());
    }

    // --- Initialize SQLite connection ---
    let db = Arc::new(connect_database(&cfg.database_url).await?);

    // --- Handle migration mode ---
    if migrate {
        services::project_repository::ProjectRepository::new(db.clone())
            .initialize()
            .await?;
        tracing::info!("Database migration complete.");
        return Ok(());
    }

    // --- Initialize core service ---
    let catalog = bootstrap(db, &cfg).await?;

    // --- Build router ---
    let app = build_app(catalog, &cfg);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("API server ready on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
