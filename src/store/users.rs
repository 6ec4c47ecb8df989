use sqlx::MySqlPool;

use crate::error::Result;
use crate::model::{Role, User};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Already hashed; stores never see plaintext.
    pub password: String,
    pub role: Role,
    pub position: String,
    pub manager_id: Option<u64>,
    pub leave_entitlement: i32,
}

#[allow(async_fn_in_trait)]
pub trait UserStore {
    async fn all(&self) -> Result<Vec<User>>;
    async fn by_id(&self, id: u64) -> Result<Option<User>>;
    async fn by_email(&self, email: &str) -> Result<Option<User>>;
    async fn subordinates(&self, manager_id: u64) -> Result<Vec<User>>;
    async fn create(&self, new: NewUser) -> Result<User>;
    async fn update(&self, user: &User) -> Result<()>;
    async fn delete(&self, id: u64) -> Result<bool>;
}

#[derive(Clone)]
pub struct MySqlUserStore {
    pool: MySqlPool,
}

impl MySqlUserStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl UserStore for MySqlUserStore {
    async fn all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, position, manager_id, \
                    leave_entitlement, last_login_at \
             FROM users \
             ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, position, manager_id, \
                    leave_entitlement, last_login_at \
             FROM users \
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, position, manager_id, \
                    leave_entitlement, last_login_at \
             FROM users \
             WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn subordinates(&self, manager_id: u64) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, position, manager_id, \
                    leave_entitlement, last_login_at \
             FROM users \
             WHERE manager_id = ? \
             ORDER BY name ASC",
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, new: NewUser) -> Result<User> {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password, role, position, manager_id, \
                                leave_entitlement) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.name.clone())
        .bind(new.email.clone())
        .bind(new.password.clone())
        .bind(new.role)
        .bind(new.position.clone())
        .bind(new.manager_id)
        .bind(new.leave_entitlement)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: result.last_insert_id(),
            name: new.name,
            email: new.email,
            password: new.password,
            role: new.role,
            position: new.position,
            manager_id: new.manager_id,
            leave_entitlement: new.leave_entitlement,
            last_login_at: None,
        })
    }

    async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            "UPDATE users \
             SET name = ?, email = ?, password = ?, role = ?, position = ?, \
                 manager_id = ?, leave_entitlement = ? \
             WHERE id = ?",
        )
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_str())
        .bind(user.role)
        .bind(user.position.as_str())
        .bind(user.manager_id)
        .bind(user.leave_entitlement)
        .bind(user.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
