use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// Argon2 hash, never serialized out.
    pub password: String,
    pub role: Role,
    pub position: String,
    pub manager_id: Option<u64>,
    pub leave_entitlement: i32,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "name": "Amel Ben Salah",
        "email": "amel.bensalah@company.com",
        "role": "employee",
        "position": "Backend Developer",
        "manager_id": 2,
        "leave_entitlement": 30
    })
)]
pub struct UserResponse {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = "Amel Ben Salah")]
    pub name: String,

    #[schema(example = "amel.bensalah@company.com")]
    pub email: String,

    pub role: Role,

    #[schema(example = "Backend Developer")]
    pub position: String,

    #[schema(example = 2, nullable = true)]
    pub manager_id: Option<u64>,

    #[schema(example = 30)]
    pub leave_entitlement: i32,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            position: u.position,
            manager_id: u.manager_id,
            leave_entitlement: u.leave_entitlement,
        }
    }
}
