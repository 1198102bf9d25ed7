//! Core data model for the project catalog.
//!
//! `ProjectRow` maps the `projects` table via `sqlx::FromRow`; `Project` is
//! the shape served over JSON via `serde`.

pub mod project;
