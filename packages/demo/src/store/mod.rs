//! Storage for projects and managers.
//!
//! The [`Store`] trait is the contract between the handlers and
//! persistence. Reads return projects with their manager attached.

pub mod memory;

use apishape::ApiException;
use async_trait::async_trait;

use crate::model::{Manager, NewProject, Project, ProjectChanges};

/// Errors that store operations can return.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record of `model` with this id.
    #[error("no {model} with id {id}")]
    NotFound { model: &'static str, id: u64 },

    /// An unexpected error in the backend.
    #[error("internal storage error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiException {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { model, id } => {
                ApiException::model_not_found(format!("No query results for {model} {id}"))
            }
            StoreError::Internal(msg) => ApiException::other(msg).with_code(500),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// One page of projects, newest first, and the total count.
    async fn list_projects(&self, page: u64, per_page: u64) -> Result<(Vec<Project>, u64), StoreError>;

    async fn find_project(&self, id: u64) -> Result<Project, StoreError>;

    async fn create_project(&self, project: NewProject) -> Result<Project, StoreError>;

    async fn update_project(&self, id: u64, changes: ProjectChanges) -> Result<Project, StoreError>;

    async fn delete_project(&self, id: u64) -> Result<(), StoreError>;

    async fn find_manager(&self, id: u64) -> Result<Manager, StoreError>;
}
