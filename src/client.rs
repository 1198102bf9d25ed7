//! CatalogClient — the adapter the site's pages use to reach the catalog API.
//!
//! Responses are rewritten so stored upload paths (`/uploads/...`) become
//! absolute URLs on the API origin; absolute URLs pass through untouched.

use reqwest::{
    StatusCode,
    multipart::{Form, Part},
};
use serde::Deserialize;
use std::env;
use thiserror::Error;
use tracing::warn;

use crate::{
    models::project::Project,
    services::{auth::ADMIN_TOKEN_HEADER, image_store::UPLOADS_PREFIX},
};

pub const DEFAULT_API_ORIGIN: &str = "http://localhost:4000";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure or an undecodable response body.
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("catalog API returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    /// The configured API origin is not a usable base URL.
    #[error("invalid catalog API origin `{0}`")]
    InvalidOrigin(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Where the API lives and which token privileged calls use by default.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub api_origin: String,
    pub admin_token: Option<String>,
}

impl ClientConfig {
    pub fn new(api_origin: impl Into<String>) -> Self {
        Self {
            api_origin: api_origin.into().trim_end_matches('/').to_string(),
            admin_token: None,
        }
    }

    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    /// Read `CATALOG_API_URL` and `CATALOG_CLIENT_TOKEN`.
    pub fn from_env() -> Self {
        let origin = env::var("CATALOG_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_ORIGIN.into());
        let cfg = Self::new(origin);
        match env::var("CATALOG_CLIENT_TOKEN") {
            Ok(token) if !token.is_empty() => cfg.with_admin_token(token),
            _ => cfg,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_origin", &self.api_origin)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Text fields of a project to create.
#[derive(Clone, Debug, Default)]
pub struct ProjectDraft {
    pub title: String,
    pub category: String,
    pub location: String,
    pub description: String,
    /// Existing cover URL to reuse when no cover file is sent.
    pub image_url: Option<String>,
}

/// A local file to send in a create request.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub file_name: String,
    pub data: Vec<u8>,
    pub mime: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
            mime: None,
        }
    }

    fn into_part(self) -> ClientResult<Part> {
        let part = Part::bytes(self.data).file_name(self.file_name);
        match self.mime {
            Some(mime) => Ok(part.mime_str(&mime)?),
            None => Ok(part),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl CatalogClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    pub fn with_http(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// All projects, newest first, with absolute image URLs.
    pub async fn fetch_projects(&self) -> ClientResult<Vec<Project>> {
        let res = self.http.get(self.url("/api/projects")).send().await?;
        let res = ensure_success(res).await?;
        let projects: Vec<Project> = res.json().await?;
        Ok(projects
            .into_iter()
            .map(|p| absolutize_project(&self.config.api_origin, p))
            .collect())
    }

    /// Listing for the public portfolio page: failures reach the caller,
    /// which shows an error state.
    pub async fn portfolio_projects(&self) -> ClientResult<Vec<Project>> {
        self.fetch_projects().await
    }

    /// Listing for the admin page: a failure is logged and shown as an empty
    /// catalog so the create form stays usable.
    pub async fn admin_projects(&self) -> Vec<Project> {
        match self.fetch_projects().await {
            Ok(projects) => projects,
            Err(err) => {
                warn!(error = %err, "could not load projects for admin, showing empty list");
                Vec::new()
            }
        }
    }

    /// Create a project. `token` overrides the configured admin token.
    pub async fn create_project(
        &self,
        draft: &ProjectDraft,
        gallery: Vec<UploadFile>,
        token: Option<&str>,
        cover: Option<UploadFile>,
    ) -> ClientResult<Project> {
        let mut form = Form::new()
            .text("title", draft.title.clone())
            .text("category", draft.category.clone())
            .text("location", draft.location.clone())
            .text("description", draft.description.clone());
        if let Some(url) = draft.image_url.as_ref().filter(|u| !u.is_empty()) {
            form = form.text("imageUrl", url.clone());
        }
        for file in gallery {
            form = form.part("images", file.into_part()?);
        }
        if let Some(file) = cover {
            form = form.part("cover", file.into_part()?);
        }

        let req = self.authorized(self.http.post(self.url("/api/projects")), token);
        let res = ensure_success(req.multipart(form).send().await?).await?;
        let created: Project = res.json().await?;
        Ok(absolutize_project(&self.config.api_origin, created))
    }

    /// Delete a project; deleting an unknown id also succeeds.
    pub async fn remove_project(&self, id: &str, token: Option<&str>) -> ClientResult<()> {
        let url = self.project_url(id)?;
        let req = self.authorized(self.http.delete(url), token);
        ensure_success(req.send().await?).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_origin, path)
    }

    /// `/api/projects/{id}` with `id` encoded as a single path segment.
    fn project_url(&self, id: &str) -> ClientResult<reqwest::Url> {
        let invalid = || ClientError::InvalidOrigin(self.config.api_origin.clone());
        let mut url = reqwest::Url::parse(&self.url("/api/projects")).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(id);
        Ok(url)
    }

    fn authorized(
        &self,
        req: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let token = token
            .filter(|t| !t.is_empty())
            .or(self.config.admin_token.as_deref());
        match token {
            Some(token) => req.header(ADMIN_TOKEN_HEADER, token),
            None => req,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

async fn ensure_success(res: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let text = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Status { status, message })
}

/// Prefix `origin` onto upload paths; anything else is returned unchanged.
pub fn absolutize(origin: &str, url: &str) -> String {
    if url.starts_with(UPLOADS_PREFIX) {
        format!("{}{}", origin.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}

fn absolutize_project(origin: &str, mut project: Project) -> Project {
    project.image_url = absolutize(origin, &project.image_url);
    project.images = project
        .images
        .iter()
        .map(|url| absolutize(origin, url))
        .collect();
    project
}
