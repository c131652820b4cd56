//! Domain records.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Manager {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A project, with its manager loaded when one is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub deprecated: bool,
    pub manager_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub manager: Option<Manager>,
}

/// Fields for a new project.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub deprecated: bool,
    pub manager_id: u64,
}

/// A partial update. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub deprecated: Option<bool>,
}
