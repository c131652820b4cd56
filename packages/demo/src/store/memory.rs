//! In-memory store.
//!
//! All data is held in RAM behind a [`RwLock`] and is lost when the process
//! exits. [`MemoryStore::seeded`] fills it with ten managers and a hundred
//! projects.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use super::{Store, StoreError};
use crate::model::{Manager, NewProject, Project, ProjectChanges};

/// A project row; the manager is attached on read.
#[derive(Debug, Clone)]
struct ProjectRow {
    id: u64,
    title: String,
    description: Option<String>,
    deprecated: bool,
    manager_id: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    projects: BTreeMap<u64, ProjectRow>,
    managers: BTreeMap<u64, Manager>,
    next_project_id: u64,
    next_manager_id: u64,
}

impl Inner {
    fn hydrate(&self, row: &ProjectRow) -> Project {
        Project {
            id: row.id,
            title: row.title.clone(),
            description: row.description.clone(),
            deprecated: row.deprecated,
            manager_id: row.manager_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            manager: self.managers.get(&row.manager_id).cloned(),
        }
    }

    fn insert_manager(&mut self, name: String, email: String, created_at: DateTime<Utc>) -> Manager {
        self.next_manager_id += 1;
        let manager = Manager {
            id: self.next_manager_id,
            name,
            email,
            created_at,
        };
        self.managers.insert(manager.id, manager.clone());
        manager
    }

    fn insert_project(&mut self, project: NewProject, created_at: DateTime<Utc>) -> ProjectRow {
        self.next_project_id += 1;
        let row = ProjectRow {
            id: self.next_project_id,
            title: project.title,
            description: project.description,
            deprecated: project.deprecated,
            manager_id: project.manager_id,
            created_at,
            updated_at: created_at,
        };
        self.projects.insert(row.id, row.clone());
        row
    }
}

/// Thread-safe, in-memory implementation of [`Store`].
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with managers 1..=10 and projects 1..=100. Project `n` belongs
    /// to manager `(n - 1) % 10 + 1`, so project 1 has manager 1; every
    /// second project has a description and every third is deprecated.
    pub fn seeded() -> Self {
        let store = Self::new();
        let now = Utc::now();
        {
            let mut inner = store.inner.write().unwrap_or_else(|e| e.into_inner());
            for n in 1..=10 {
                inner.insert_manager(
                    format!("manager{n}"),
                    format!("manager{n}@example.com"),
                    now - TimeDelta::days(30),
                );
            }
            for n in 1..=100u64 {
                let project = NewProject {
                    title: format!("Project {n}"),
                    description: (n % 2 == 0).then(|| format!("Description of project {n}.")),
                    deprecated: n % 3 == 0,
                    manager_id: (n - 1) % 10 + 1,
                };
                // Spread creation times so that newest-first is id-descending.
                let created_at = now - TimeDelta::minutes(101 - n as i64);
                inner.insert_project(project, created_at);
            }
        }
        store
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Internal("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Internal("store lock poisoned".into()))
    }

    /// Add a manager; returns it with its id.
    pub fn add_manager(&self, name: &str, email: &str) -> Result<Manager, StoreError> {
        Ok(self.write()?.insert_manager(name.into(), email.into(), Utc::now()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_projects(&self, page: u64, per_page: u64) -> Result<(Vec<Project>, u64), StoreError> {
        let inner = self.read()?;
        let mut rows: Vec<&ProjectRow> = inner.projects.values().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = rows.len() as u64;
        let skip = page.saturating_sub(1).saturating_mul(per_page);
        let items = rows
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(per_page).unwrap_or(usize::MAX))
            .map(|row| inner.hydrate(row))
            .collect();
        Ok((items, total))
    }

    async fn find_project(&self, id: u64) -> Result<Project, StoreError> {
        let inner = self.read()?;
        inner
            .projects
            .get(&id)
            .map(|row| inner.hydrate(row))
            .ok_or(StoreError::NotFound { model: "project", id })
    }

    async fn create_project(&self, project: NewProject) -> Result<Project, StoreError> {
        let mut inner = self.write()?;
        let row = inner.insert_project(project, Utc::now());
        Ok(inner.hydrate(&row))
    }

    async fn update_project(&self, id: u64, changes: ProjectChanges) -> Result<Project, StoreError> {
        let mut inner = self.write()?;
        let row = inner
            .projects
            .get_mut(&id)
            .ok_or(StoreError::NotFound { model: "project", id })?;
        if let Some(title) = changes.title {
            row.title = title;
        }
        if let Some(description) = changes.description {
            row.description = description;
        }
        if let Some(deprecated) = changes.deprecated {
            row.deprecated = deprecated;
        }
        row.updated_at = Utc::now();
        let row = row.clone();
        Ok(inner.hydrate(&row))
    }

    async fn delete_project(&self, id: u64) -> Result<(), StoreError> {
        self.write()?
            .projects
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { model: "project", id })
    }

    async fn find_manager(&self, id: u64) -> Result<Manager, StoreError> {
        self.read()?
            .managers
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { model: "manager", id })
    }
}
