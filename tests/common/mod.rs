#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use project_catalog::{
    bootstrap, build_app,
    config::{AppConfig, Args},
    services::catalog_service::CatalogService,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::{collections::HashMap, env, sync::Arc};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_TOKEN: &str = "test-admin-token";
pub const BOUNDARY: &str = "----catalog-test-boundary";

/// A router wired to an in-memory database and a temporary data dir.
pub struct TestApp {
    pub router: Router,
    pub service: CatalogService,
    pub config: AppConfig,
    pub data_dir: TempDir,
}

impl TestApp {
    /// Number of files currently in the upload directory.
    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(self.config.upload_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Build a test `AppConfig` rooted at `data_dir`.
pub fn test_config(data_dir: &TempDir, seed: bool) -> AppConfig {
    let args = Args {
        data_dir: Some(data_dir.path().to_path_buf()),
        database_url: Some("sqlite::memory:".into()),
        admin_token: Some(TEST_TOKEN.into()),
        max_upload_mb: Some(5),
        no_seed: !seed,
        ..Args::default()
    };
    AppConfig::resolve(args, |_| Err(env::VarError::NotPresent)).unwrap()
}

/// Build the full application router, mirroring `main.rs`.
pub async fn build_test_app(seed: bool) -> TestApp {
    let data_dir = tempfile::tempdir().unwrap();
    let config = test_config(&data_dir, seed);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
        .unwrap();
    let service = bootstrap(Arc::new(pool), &config).await.unwrap();
    let router = build_app(service.clone(), &config);

    TestApp {
        router,
        service,
        config,
        data_dir,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-admin-token", token);
    }
    builder.body(Body::empty()).unwrap()
}

/// One part of a multipart form.
pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File(name, file_name, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// `POST /api/projects` with the given parts and headers.
pub fn post_project(parts: &[FormPart<'_>], headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/projects")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}

/// The four required text fields, all filled in.
pub fn required_fields() -> Vec<FormPart<'static>> {
    vec![
        FormPart::Text("title", "Toit A"),
        FormPart::Text("category", "Toiture"),
        FormPart::Text("location", "Québec"),
        FormPart::Text("description", "Test"),
    ]
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// GET /api/projects and return the parsed array.
pub async fn list(app: &TestApp) -> Vec<serde_json::Value> {
    let response = app.send(get("/api/projects")).await;
    body_json(response).await.as_array().cloned().unwrap()
}

pub fn ids(projects: &[serde_json::Value]) -> Vec<String> {
    projects
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

pub fn field_map(project: &serde_json::Value) -> HashMap<&'static str, String> {
    ["title", "category", "location", "description"]
        .into_iter()
        .map(|k| (k, project[k].as_str().unwrap_or_default().to_string()))
        .collect()
}
