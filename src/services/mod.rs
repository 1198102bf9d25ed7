//! Catalog components: storage, authorization, and the operations that
//! compose them.

pub mod auth;
pub mod catalog_service;
pub mod image_store;
pub mod project_repository;
