use crate::error::{Error, Result};
use crate::model::Project;
use crate::store::ProjectStore;

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct ProjectService<P> {
    projects: P,
}

impl<P: ProjectStore> ProjectService<P> {
    pub fn new(projects: P) -> Self {
        Self { projects }
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        self.projects.all().await
    }

    pub async fn get(&self, id: u64) -> Result<Project> {
        self.projects
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("project not found"))
    }

    pub async fn create(&self, name: String, description: Option<String>) -> Result<Project> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::invalid_input("project name is required"));
        }
        self.projects.create(name, description).await
    }

    pub async fn update(&self, id: u64, patch: ProjectPatch) -> Result<Project> {
        let mut project = self.get(id).await?;
        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::invalid_input("project name is required"));
            }
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = Some(description);
        }
        self.projects.update(&project).await?;
        Ok(project)
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        if !self.projects.delete(id).await? {
            return Err(Error::not_found("project not found"));
        }
        Ok(())
    }
}
