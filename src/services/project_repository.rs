//! ProjectRepository — durable `projects` table in SQLite.
//!
//! Owns the schema: [`initialize`](ProjectRepository::initialize) runs on
//! every startup and is idempotent, including the additive `images` column
//! migration for tables created before galleries existed.

use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    errors::{CatalogError, CatalogResult},
    models::project::{NewProject, Project, ProjectRow},
};

/// Base schema, executed statement by statement.
const SCHEMA_SQL: &str = include_str!("../../migrations/0001_projects.sql");

const SELECT_PROJECTS: &str = "SELECT id, title, category, location, imageUrl, description, \
     images, created_at FROM projects";

#[derive(Clone)]
pub struct ProjectRepository {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl ProjectRepository {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Ensure the `projects` table exists with every current column.
    pub async fn initialize(&self) -> CatalogResult<()> {
        let statements = split_statements(SCHEMA_SQL);
        debug!("running {} schema statements", statements.len());
        for stmt in statements {
            sqlx::query(stmt).execute(&*self.db).await?;
        }

        let columns = sqlx::query("PRAGMA table_info(projects)")
            .fetch_all(&*self.db)
            .await?;
        let has_images = columns
            .iter()
            .any(|row| row.try_get::<String, _>("name").is_ok_and(|name| name == "images"));
        if !has_images {
            sqlx::query("ALTER TABLE projects ADD COLUMN images TEXT")
                .execute(&*self.db)
                .await?;
            info!("added missing `images` column to projects table");
        }

        Ok(())
    }

    /// Insert `rows` in one transaction when the table holds no rows.
    ///
    /// Returns whether the seed was applied. Callers run this once at startup;
    /// a catalog emptied later through deletes is left empty.
    pub async fn seed_if_empty(&self, rows: &[NewProject]) -> CatalogResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&*self.db)
            .await?;
        if count > 0 {
            debug!("catalog already holds {} projects, skipping seed", count);
            return Ok(false);
        }

        let mut tx = self.db.begin().await?;
        for row in rows {
            insert_row(&mut *tx, row).await?;
        }
        tx.commit().await?;

        info!("seeded catalog with {} example projects", rows.len());
        Ok(true)
    }

    /// Insert a new project. An existing `id` is a [`CatalogError::Conflict`],
    /// never an overwrite.
    pub async fn insert(&self, record: &NewProject) -> CatalogResult<Project> {
        insert_row(&*self.db, record).await?;

        let row = sqlx::query_as::<_, ProjectRow>(&format!("{SELECT_PROJECTS} WHERE id = ?"))
            .bind(&record.id)
            .fetch_one(&*self.db)
            .await?;
        Ok(Project::try_from(row)?)
    }

    /// Every project, newest first. Rows sharing a timestamp list the later
    /// insertion first.
    pub async fn list_all(&self) -> CatalogResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "{SELECT_PROJECTS} ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&*self.db)
        .await?;

        rows.into_iter()
            .map(|row| Project::try_from(row).map_err(CatalogError::from))
            .collect()
    }

    /// Remove a project. Returns whether a row was deleted; absence is not an
    /// error.
    pub async fn delete_by_id(&self, id: &str) -> CatalogResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> CatalogResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&*self.db)
            .await?)
    }
}

async fn insert_row<'e, E>(executor: E, record: &NewProject) -> CatalogResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let images = record.images_column()?;
    match sqlx::query(
        "INSERT INTO projects (id, title, category, location, imageUrl, description, images, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.id)
    .bind(&record.title)
    .bind(&record.category)
    .bind(&record.location)
    .bind(&record.image_url)
    .bind(&record.description)
    .bind(images)
    .bind(record.created_at)
    .execute(executor)
    .await
    {
        Ok(_) => Ok(()),
        Err(err) if is_unique_violation(&err) => Err(CatalogError::Conflict(record.id.clone())),
        Err(err) => Err(CatalogError::Sqlx(err)),
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}

/// Split a SQL script on `;`, dropping comment-only and empty chunks.
fn split_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| {
            s.lines()
                .any(|line| !line.trim().is_empty() && !line.trim_start().starts_with("--"))
        })
        .collect()
}
