//! HTTP handlers for `/api/projects`.
//! Multipart bodies are read fully into memory and handed to
//! `CatalogService`, which decides whether anything gets written.

use crate::{
    errors::AppError,
    models::project::Project,
    services::{
        auth::RequireAdmin,
        catalog_service::{CatalogService, CreateProjectInput, UploadedFile},
    },
};
use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::Field},
    http::StatusCode,
    response::IntoResponse,
};

/// Most cover files accepted per request.
pub const MAX_COVER_FILES: usize = 1;
/// Most gallery files accepted per request.
pub const MAX_GALLERY_FILES: usize = 20;

/// `GET /api/projects` — public listing, newest first.
pub async fn list_projects(
    State(service): State<CatalogService>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(service.list_projects().await?))
}

/// `POST /api/projects` — create from a multipart form.
///
/// Text fields: `title`, `category`, `location`, `description`, optional
/// `imageUrl`. Files: optional `cover`, gallery under `images` or `images[]`.
pub async fn create_project(
    State(service): State<CatalogService>,
    _admin: RequireAdmin,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let input = read_create_form(multipart).await?;
    let project = service.create_project(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// `DELETE /api/projects/{id}` — always 204, known id or not.
pub async fn delete_project(
    State(service): State<CatalogService>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_project(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn read_create_form(mut multipart: Multipart) -> Result<CreateProjectInput, AppError> {
    let mut input = CreateProjectInput::default();
    let mut cover_count = 0;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => input.title = Some(field.text().await?),
            "category" => input.category = Some(field.text().await?),
            "location" => input.location = Some(field.text().await?),
            "description" => input.description = Some(field.text().await?),
            "imageUrl" => input.image_url = Some(field.text().await?),
            "cover" => {
                if let Some(file) = read_file(field).await? {
                    cover_count += 1;
                    if cover_count > MAX_COVER_FILES {
                        return Err(AppError::bad_request("Une seule image principale permise."));
                    }
                    input.cover = Some(file);
                }
            }
            "images" | "images[]" => {
                if let Some(file) = read_file(field).await? {
                    if input.gallery.len() >= MAX_GALLERY_FILES {
                        return Err(AppError::bad_request(format!(
                            "Maximum {MAX_GALLERY_FILES} images par projet."
                        )));
                    }
                    input.gallery.push(file);
                }
            }
            other => tracing::debug!("ignoring unexpected form field `{}`", other),
        }
    }

    Ok(input)
}

/// Read a file part. Parts without a file name (plain text values in a file
/// slot, or a file input left empty, which browsers send as `filename=""`)
/// and zero-byte parts are skipped.
async fn read_file(field: Field<'_>) -> Result<Option<UploadedFile>, AppError> {
    let file_name = match field.file_name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Ok(None),
    };
    let data = field.bytes().await?;
    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadedFile { file_name, data }))
}
