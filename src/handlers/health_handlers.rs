//! Health & readiness handlers.
//!
//! - GET /api/health -> simple liveness ("ok")
//! - GET /api/ready  -> readiness that checks DB connectivity and upload dir I/O

use crate::services::catalog_service::CatalogService;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::HashMap;
use tokio::fs;
use uuid::Uuid;

/// Plain-text banner for `GET /`.
pub async fn index() -> &'static str {
    "API Project Catalog - endpoints: GET /api/health, GET /api/projects, \
     POST /api/projects (token), DELETE /api/projects/:id (token)"
}

/// `GET /api/health`
///
/// Liveness probe; never performs I/O.
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /api/ready`
///
/// Runs `SELECT 1` against SQLite and a write/read/delete round trip in the
/// upload directory. 200 when both pass, 503 otherwise.
pub async fn ready(State(service): State<CatalogService>) -> impl IntoResponse {
    let sqlite_check = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&*service.repo.db)
        .await
    {
        Ok(1) => (true, None::<String>),
        Ok(v) => (false, Some(format!("unexpected result: {}", v))),
        Err(e) => (false, Some(format!("error: {}", e))),
    };

    let disk_check = check_upload_dir(&service).await;

    let overall_ok = sqlite_check.0 && disk_check.0;

    let mut checks = HashMap::new();
    checks.insert(
        "sqlite",
        CheckStatus {
            ok: sqlite_check.0,
            error: sqlite_check.1,
        },
    );
    checks.insert(
        "uploads",
        CheckStatus {
            ok: disk_check.0,
            error: disk_check.1,
        },
    );

    let body = ReadyResponse {
        status: (if overall_ok { "ok" } else { "error" }).into(),
        checks,
    };
    let status = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

async fn check_upload_dir(service: &CatalogService) -> (bool, Option<String>) {
    let root = &service.images.root;
    if let Err(e) = fs::create_dir_all(root).await {
        return (false, Some(format!("could not create upload dir: {}", e)));
    }

    let tmp_path = root.join(format!(".ready-{}", Uuid::new_v4()));
    if let Err(e) = fs::write(&tmp_path, b"ready").await {
        return (false, Some(format!("could not write tmp file: {}", e)));
    }

    let result = match fs::read(&tmp_path).await {
        Ok(bytes) if bytes == b"ready" => (true, None),
        Ok(_) => (false, Some("file content mismatch".to_string())),
        Err(e) => (false, Some(format!("could not read tmp file: {}", e))),
    };
    let _ = fs::remove_file(&tmp_path).await;
    result
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}
