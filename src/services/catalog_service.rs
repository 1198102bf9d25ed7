//! CatalogService — the list/create/delete operations behind `/api/projects`.
//!
//! There is no update: an "edit" is a delete followed by a create, which
//! gives the project a new `id` and `createdAt`.

use axum::extract::FromRef;
use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    errors::{CatalogError, CatalogResult},
    models::project::{NewProject, Project},
    services::{auth::AdminGate, image_store::ImageStore, project_repository::ProjectRepository},
};

/// A file received in a multipart upload, held in memory until the request
/// has passed validation.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Everything a create request may carry. Text fields are `None` when the
/// form omitted them.
#[derive(Clone, Debug, Default)]
pub struct CreateProjectInput {
    pub title: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Existing cover URL, used when no `cover` file was uploaded.
    pub image_url: Option<String>,
    pub cover: Option<UploadedFile>,
    /// Gallery uploads in the order received.
    pub gallery: Vec<UploadedFile>,
}

/// Shared state for catalog handlers.
#[derive(Clone)]
pub struct CatalogService {
    pub repo: ProjectRepository,
    pub images: ImageStore,
    pub gate: AdminGate,
}

impl FromRef<CatalogService> for AdminGate {
    fn from_ref(service: &CatalogService) -> Self {
        service.gate.clone()
    }
}

impl CatalogService {
    pub fn new(repo: ProjectRepository, images: ImageStore, gate: AdminGate) -> Self {
        Self { repo, images, gate }
    }

    /// Every project, newest first. An empty catalog is an empty list.
    pub async fn list_projects(&self) -> CatalogResult<Vec<Project>> {
        self.repo.list_all().await
    }

    /// Validate, store uploads, and insert a new project.
    ///
    /// Nothing touches disk or the database until every required text field
    /// and a cover source are known to be present. Uploads written before a
    /// later failure are removed again.
    pub async fn create_project(&self, input: CreateProjectInput) -> CatalogResult<Project> {
        let title = required(input.title)?;
        let category = required(input.category)?;
        let location = required(input.location)?;
        let description = required(input.description)?;

        let cover = match (input.cover, input.image_url) {
            (Some(file), _) => CoverSource::Upload(file),
            (None, Some(url)) if !url.trim().is_empty() => CoverSource::Url(url),
            _ => {
                return Err(CatalogError::validation(
                    "Image principale requise (upload ou existante).",
                ));
            }
        };

        let mut written = Vec::with_capacity(1 + input.gallery.len());
        let result = self
            .store_and_insert(
                NewProjectFields {
                    title,
                    category,
                    location,
                    description,
                },
                cover,
                input.gallery,
                &mut written,
            )
            .await;

        if let Err(err) = &result {
            warn!(error = %err, "create failed, discarding {} stored uploads", written.len());
            for path in &written {
                self.images.discard(path).await;
            }
        }
        result
    }

    async fn store_and_insert(
        &self,
        fields: NewProjectFields,
        cover: CoverSource,
        gallery: Vec<UploadedFile>,
        written: &mut Vec<String>,
    ) -> CatalogResult<Project> {
        let image_url = match cover {
            CoverSource::Upload(file) => {
                let path = self.images.save(file.data, &file.file_name).await?;
                written.push(path.clone());
                path
            }
            CoverSource::Url(url) => url,
        };

        let mut images = Vec::with_capacity(gallery.len());
        for file in gallery {
            let path = self.images.save(file.data, &file.file_name).await?;
            written.push(path.clone());
            images.push(path);
        }

        let record = NewProject {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            category: fields.category,
            location: fields.location,
            description: fields.description,
            image_url,
            images,
            created_at: Utc::now(),
        };

        let project = self.repo.insert(&record).await?;
        info!(
            id = %project.id,
            title = %project.title,
            gallery = project.images.len(),
            "created project"
        );
        Ok(project)
    }

    /// Remove a project. Succeeds whether or not the id existed; stored
    /// upload files are left in place.
    pub async fn delete_project(&self, id: &str) -> CatalogResult<()> {
        let removed = self.repo.delete_by_id(id).await?;
        if removed {
            info!(id, "deleted project");
        } else {
            info!(id, "delete requested for unknown project");
        }
        Ok(())
    }
}

enum CoverSource {
    Upload(UploadedFile),
    Url(String),
}

struct NewProjectFields {
    title: String,
    category: String,
    location: String,
    description: String,
}

fn required(value: Option<String>) -> CatalogResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CatalogError::validation("Champs requis manquants")),
    }
}
