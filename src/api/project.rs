use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::AppProjectService;
use crate::auth::auth::AuthUser;
use crate::error::Result;
use crate::model::Project;
use crate::service::ProjectPatch;

#[derive(Deserialize, ToSchema)]
pub struct CreateProject {
    #[schema(example = "Refonte intranet")]
    pub name: String,

    #[schema(example = "Migration of the intranet portal", nullable = true)]
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProject {
    #[schema(example = "Refonte intranet", nullable = true)]
    pub name: Option<String>,

    #[schema(nullable = true)]
    pub description: Option<String>,
}

/* =========================
List projects
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    responses(
        (status = 200, description = "All projects", body = [Project]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn list_projects(
    _auth: AuthUser,
    projects: web::Data<AppProjectService>,
) -> Result<HttpResponse> {
    let data = projects.list().await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Fetch one project
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(("id" = u64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn get_project(
    _auth: AuthUser,
    projects: web::Data<AppProjectService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    let data = projects.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Create project (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = CreateProject,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Name required"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn create_project(
    auth: AuthUser,
    projects: web::Data<AppProjectService>,
    payload: web::Json<CreateProject>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let payload = payload.into_inner();
    let data = projects.create(payload.name, payload.description).await?;
    Ok(HttpResponse::Created().json(data))
}

/* =========================
Update project (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/projects/{id}",
    params(("id" = u64, Path, description = "Project ID")),
    request_body = UpdateProject,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 400, description = "Name required"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn update_project(
    auth: AuthUser,
    projects: web::Data<AppProjectService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateProject>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let payload = payload.into_inner();
    let patch = ProjectPatch {
        name: payload.name,
        description: payload.description,
    };
    let data = projects.update(path.into_inner(), patch).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Delete project (admin)
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    params(("id" = u64, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn delete_project(
    auth: AuthUser,
    projects: web::Data<AppProjectService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    projects.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
