use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::AppUserService;
use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::error::Result;
use crate::model::{Role, UserResponse};
use crate::service::{CreateUser, UserPatch};
use crate::utils::{email_cache, email_filter};

#[derive(Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Amel Ben Salah")]
    pub name: String,

    #[schema(example = "amel.bensalah@example.com")]
    pub email: String,

    #[schema(example = "s3cret-pass")]
    pub password: String,

    #[schema(example = "employee")]
    pub role: Role,

    #[schema(example = "Ingénieure logiciel")]
    pub position: String,

    #[schema(example = 3, nullable = true)]
    pub manager_id: Option<u64>,

    /// Informational entitlement column; balances use the fixed yearly grant.
    #[schema(example = 30, nullable = true)]
    pub leave_entitlement: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[schema(nullable = true)]
    pub name: Option<String>,

    #[schema(nullable = true)]
    pub email: Option<String>,

    #[schema(nullable = true)]
    pub password: Option<String>,

    #[schema(example = "employee", nullable = true)]
    pub role: Option<Role>,

    #[schema(nullable = true)]
    pub position: Option<String>,

    #[schema(example = 3, nullable = true)]
    pub manager_id: Option<u64>,

    #[schema(example = 30, nullable = true)]
    pub leave_entitlement: Option<i32>,
}

/* =========================
List users (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn list_users(auth: AuthUser, users: web::Data<AppUserService>) -> Result<HttpResponse> {
    auth.require_admin()?;
    let data = users.list().await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Fetch one user
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn get_user(
    _auth: AuthUser,
    users: web::Data<AppUserService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    let data = users.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Direct reports of a manager
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/subordinates",
    params(("id" = u64, Path, description = "Manager's user ID")),
    responses(
        (status = 200, description = "Users managed by this user", body = [UserResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the manager or an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn subordinates(
    auth: AuthUser,
    users: web::Data<AppUserService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    let data = users.subordinates(path.into_inner(), auth.actor()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Create user (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Manager not found"),
        (status = 409, description = "Email already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn create_user(
    auth: AuthUser,
    users: web::Data<AppUserService>,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let payload = payload.into_inner();

    let created = users
        .create(CreateUser {
            name: payload.name,
            email: payload.email,
            password_hash: hash_password(&payload.password),
            role: payload.role,
            position: payload.position,
            manager_id: payload.manager_id,
            leave_entitlement: payload.leave_entitlement,
        })
        .await?;

    email_filter::insert(&created.email);
    email_cache::mark_taken(&created.email).await;

    Ok(HttpResponse::Created().json(created))
}

/* =========================
Update user (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User or manager not found"),
        (status = 409, description = "Email already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn update_user(
    auth: AuthUser,
    users: web::Data<AppUserService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let id = path.into_inner();
    let payload = payload.into_inner();

    let before = users.get(id).await?;

    let patch = UserPatch {
        name: payload.name,
        email: payload.email,
        password_hash: payload.password.as_deref().map(hash_password),
        role: payload.role,
        position: payload.position,
        manager_id: payload.manager_id,
        leave_entitlement: payload.leave_entitlement,
    };
    let updated = users.update(id, patch).await?;

    if updated.email != before.email {
        email_filter::remove(&before.email);
        email_cache::invalidate(&before.email).await;
        email_filter::insert(&updated.email);
        email_cache::mark_taken(&updated.email).await;
    }

    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Delete user (admin)
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User still manages subordinates")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn delete_user(
    auth: AuthUser,
    users: web::Data<AppUserService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let id = path.into_inner();

    let user = users.get(id).await?;
    users.delete(id).await?;

    email_filter::remove(&user.email);
    email_cache::invalidate(&user.email).await;

    Ok(HttpResponse::NoContent().finish())
}
