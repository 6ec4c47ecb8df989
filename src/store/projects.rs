use sqlx::MySqlPool;

use crate::error::Result;
use crate::model::Project;

#[allow(async_fn_in_trait)]
pub trait ProjectStore {
    async fn all(&self) -> Result<Vec<Project>>;
    async fn by_id(&self, id: u64) -> Result<Option<Project>>;
    async fn create(&self, name: String, description: Option<String>) -> Result<Project>;
    async fn update(&self, project: &Project) -> Result<()>;
    async fn delete(&self, id: u64) -> Result<bool>;
}

#[derive(Clone)]
pub struct MySqlProjectStore {
    pool: MySqlPool,
}

impl MySqlProjectStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl ProjectStore for MySqlProjectStore {
    async fn all(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(
            "SELECT id, name, description FROM projects ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(
            "SELECT id, name, description FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, name: String, description: Option<String>) -> Result<Project> {
        let result = sqlx::query("INSERT INTO projects (name, description) VALUES (?, ?)")
            .bind(name.clone())
            .bind(description.clone())
            .execute(&self.pool)
            .await?;
        Ok(Project {
            id: result.last_insert_id(),
            name,
            description,
        })
    }

    async fn update(&self, project: &Project) -> Result<()> {
        sqlx::query("UPDATE projects SET name = ?, description = ? WHERE id = ?")
            .bind(project.name.as_str())
            .bind(project.description.as_deref())
            .bind(project.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
