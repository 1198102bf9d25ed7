//! Represents a portfolio project — the only entity in the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A showcased construction job as returned by the API.
///
/// `images` is always a sequence here; the nullable storage form only exists
/// on [`ProjectRow`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Identifier assigned at creation, never reused for another record.
    pub id: String,

    pub title: String,

    /// One of the site's service categories (e.g. "Toiture"); not enforced.
    pub category: String,

    /// Free-text place name.
    pub location: String,

    pub description: String,

    /// Cover image: an absolute URL or an `/uploads/...` path.
    pub image_url: String,

    /// Gallery images in display order.
    #[serde(default)]
    pub images: Vec<String>,

    /// Insertion time, used for newest-first ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw `projects` table row.
#[derive(Clone, FromRow, Debug)]
pub struct ProjectRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: String,
    #[sqlx(rename = "imageUrl")]
    pub image_url: String,
    pub description: String,
    /// JSON array of strings, or NULL when the project has no gallery.
    pub images: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = serde_json::Error;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let images = match row.images.as_deref() {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)?,
            _ => Vec::new(),
        };

        Ok(Self {
            id: row.id,
            title: row.title,
            category: row.category,
            location: row.location,
            description: row.description,
            image_url: row.image_url,
            images,
            created_at: row.created_at,
        })
    }
}

/// A fully resolved record ready for insertion.
///
/// Built by the catalog service once every field has been validated and
/// every upload has been written.
#[derive(Clone, Debug)]
pub struct NewProject {
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: String,
    pub description: String,
    pub image_url: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl NewProject {
    /// Storage form of `images`: NULL for an empty gallery.
    pub fn images_column(&self) -> Result<Option<String>, serde_json::Error> {
        if self.images.is_empty() {
            Ok(None)
        } else {
            serde_json::to_string(&self.images).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(images: Option<&str>) -> ProjectRow {
        ProjectRow {
            id: "p1".into(),
            title: "Toit A".into(),
            category: "Toiture".into(),
            location: "Québec".into(),
            image_url: "/uploads/1_roof.jpg".into(),
            description: "Test".into(),
            images: images.map(str::to_string),
            created_at: None,
        }
    }

    #[test]
    fn null_images_read_back_as_empty_sequence() {
        let project = Project::try_from(row(None)).unwrap();
        assert!(project.images.is_empty());
    }

    #[test]
    fn stored_images_keep_order_and_duplicates() {
        let project =
            Project::try_from(row(Some(r#"["/uploads/b.jpg","/uploads/a.jpg","/uploads/b.jpg"]"#)))
                .unwrap();
        assert_eq!(
            project.images,
            vec!["/uploads/b.jpg", "/uploads/a.jpg", "/uploads/b.jpg"]
        );
    }

    #[test]
    fn corrupt_images_column_is_an_error() {
        assert!(Project::try_from(row(Some("not json"))).is_err());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let project = Project::try_from(row(None)).unwrap();
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["imageUrl"], "/uploads/1_roof.jpg");
        assert_eq!(json["images"], serde_json::json!([]));
        assert!(json.get("createdAt").is_none());
    }
}
