//! Public representations of projects and managers.

use apishape::attr::timestamp;
use apishape::{AttributeMap, Resource, ShapeError, TimestampFormat, Transformer};
use serde_json::json;

use crate::model::{Manager, Project};

/// `{id, title, description, deprecated, created_at}` plus the `manager`
/// include, on by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectTransformer {
    timestamps: TimestampFormat,
}

impl ProjectTransformer {
    pub fn new(timestamps: TimestampFormat) -> Self {
        Self { timestamps }
    }
}

impl Transformer<Project> for ProjectTransformer {
    fn transform(&self, project: &Project) -> AttributeMap {
        let mut out = AttributeMap::new();
        out.insert("id".into(), json!(project.id));
        out.insert("title".into(), json!(project.title));
        out.insert("description".into(), json!(project.description));
        out.insert("deprecated".into(), json!(project.deprecated));
        out.insert(
            "created_at".into(),
            timestamp(&project.created_at, self.timestamps),
        );
        out
    }

    fn available_includes(&self) -> &[&'static str] {
        &["manager"]
    }

    fn default_includes(&self) -> &[&'static str] {
        &["manager"]
    }

    fn include(&self, name: &str, project: &Project) -> Result<Option<Resource>, ShapeError> {
        match name {
            "manager" => Ok(project
                .manager
                .clone()
                .map(|m| Resource::item(m, ManagerTransformer::new(self.timestamps)))),
            other => Err(ShapeError::UnknownInclude(other.to_string())),
        }
    }
}

/// `{id, name, email, created_at}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagerTransformer {
    timestamps: TimestampFormat,
}

impl ManagerTransformer {
    pub fn new(timestamps: TimestampFormat) -> Self {
        Self { timestamps }
    }
}

impl Transformer<Manager> for ManagerTransformer {
    fn transform(&self, manager: &Manager) -> AttributeMap {
        let mut out = AttributeMap::new();
        out.insert("id".into(), json!(manager.id));
        out.insert("name".into(), json!(manager.name));
        out.insert("email".into(), json!(manager.email));
        out.insert(
            "created_at".into(),
            timestamp(&manager.created_at, self.timestamps),
        );
        out
    }
}
