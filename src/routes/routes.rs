//! Defines routes for the project catalog API.
//!
//! ## Structure
//! - `GET    /`                   — text banner
//! - `GET    /api/health`         — liveness
//! - `GET    /api/ready`          — readiness (DB + upload dir)
//! - `GET    /api/projects`       — list projects, newest first
//! - `POST   /api/projects`       — create project (admin token, multipart)
//! - `DELETE /api/projects/{id}`  — delete project (admin token)
//! - `GET    /uploads/{file}`     — stored images, served from disk

use crate::{
    handlers::{
        health_handlers::{health, index, ready},
        project_handlers::{create_project, delete_project, list_projects},
    },
    services::{auth::ADMIN_TOKEN_HEADER, catalog_service::CatalogService, image_store::UPLOADS_PREFIX},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, header},
    routing::{delete, get},
};
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Build the router for every catalog route.
///
/// `max_body_bytes` caps multipart create requests; `upload_dir` is mounted
/// at `/uploads`.
pub fn routes(upload_dir: &Path, max_body_bytes: usize) -> Router<CatalogService> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(ADMIN_TOKEN_HEADER),
        ]);

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/ready", get(ready))
        .route(
            "/api/projects",
            get(list_projects)
                .post(create_project)
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .route("/api/projects/{id}", delete(delete_project))
        .nest_service(UPLOADS_PREFIX, ServeDir::new(upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
