//! Portfolio project catalog: a small REST API over one SQLite table plus
//! local image uploads, and the client adapter the site uses to call it.

use anyhow::{Context, Result};
use axum::Router;
use chrono::Utc;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{path::Path, str::FromStr, sync::Arc};

pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;

use config::AppConfig;
use services::{
    auth::AdminGate, catalog_service::CatalogService, image_store::ImageStore,
    project_repository::ProjectRepository,
};

/// Open (creating if needed) the SQLite database behind `database_url`.
pub async fn connect_database(database_url: &str) -> Result<SqlitePool> {
    let db_path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .trim_start_matches("file:");
    tracing::debug!("Interpreted SQLite path => {}", db_path);

    if !db_path.starts_with(":memory:") {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating database directory {:?}", parent))?;
                tracing::info!("Created missing directory {:?}", parent);
            }
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parsing database url `{}`", database_url))?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("connecting to {}", database_url))
}

/// Initialize the schema, seed an empty catalog when enabled, and assemble
/// the catalog service.
///
/// The emptiness check for seeding happens here, once per process.
pub async fn bootstrap(db: Arc<SqlitePool>, cfg: &AppConfig) -> Result<CatalogService> {
    let repo = ProjectRepository::new(db);
    repo.initialize().await.context("initializing projects schema")?;

    if cfg.seed {
        repo.seed_if_empty(&seed::seed_projects(Utc::now()))
            .await
            .context("seeding example projects")?;
    }

    Ok(CatalogService::new(
        repo,
        ImageStore::new(cfg.upload_dir()),
        AdminGate::new(cfg.admin_token.as_str()),
    ))
}

/// Full application router with state attached.
pub fn build_app(service: CatalogService, cfg: &AppConfig) -> Router {
    routes::routes::routes(&cfg.upload_dir(), cfg.max_body_bytes()).with_state(service)
}
