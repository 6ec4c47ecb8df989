use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::AppExpenseService;
use crate::auth::auth::AuthUser;
use crate::error::Result;
use crate::model::ExpenseStatus;
use crate::service::ExpenseReportResponse;

#[derive(Deserialize, ToSchema)]
pub struct CreateReport {
    #[schema(example = 1)]
    pub project_id: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateReport {
    #[schema(example = 2)]
    pub project_id: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateReportStatus {
    #[schema(example = "approved")]
    pub status: ExpenseStatus,

    #[schema(example = "Receipts verified", nullable = true)]
    pub manager_comment: Option<String>,
}

/* =========================
Open a report
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/expense-reports",
    request_body = CreateReport,
    responses(
        (status = 201, description = "Report opened", body = ExpenseReportResponse),
        (status = 400, description = "No manager assigned"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "A report for this project is already open")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn create_report(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    payload: web::Json<CreateReport>,
) -> Result<HttpResponse> {
    let data = expenses
        .create_report(auth.user_id, payload.project_id)
        .await?;
    Ok(HttpResponse::Created().json(data))
}

/* =========================
List all reports (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/expense-reports",
    responses(
        (status = 200, description = "All reports, newest first", body = [ExpenseReportResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn list_reports(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let data = expenses.list_reports().await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Own reports
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/expense-reports/my",
    responses(
        (status = 200, description = "Reports opened by the caller", body = [ExpenseReportResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn my_reports(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
) -> Result<HttpResponse> {
    let data = expenses.list_reports_for_user(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Direct reports' reports
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/expense-reports/team",
    responses(
        (status = 200, description = "Reports from the caller's direct reports", body = [ExpenseReportResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn team_reports(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
) -> Result<HttpResponse> {
    let data = expenses.list_reports_for_manager(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Reports of a project (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/expense-reports/project/{project_id}",
    params(("project_id" = u64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Reports charged to the project", body = [ExpenseReportResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn project_reports(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let data = expenses.list_reports_for_project(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Fetch one report
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/expense-reports/{id}",
    params(("id" = u64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report found", body = ExpenseReportResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not owner, manager or admin"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn get_report(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    let data = expenses.get_report(path.into_inner(), auth.actor()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Reassign a pending report
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/expense-reports/{id}",
    params(("id" = u64, Path, description = "Report ID")),
    request_body = UpdateReport,
    responses(
        (status = 200, description = "Report updated", body = ExpenseReportResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Report or project not found"),
        (status = 409, description = "Already processed, or project already has an open report")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn update_report(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateReport>,
) -> Result<HttpResponse> {
    let data = expenses
        .update_report(path.into_inner(), auth.actor(), payload.project_id)
        .await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Process a report (manager/admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/expense-reports/{id}/status",
    params(("id" = u64, Path, description = "Report ID")),
    request_body = UpdateReportStatus,
    responses(
        (status = 200, description = "Report processed", body = ExpenseReportResponse),
        (status = 400, description = "Status must be approved or rejected"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the employee's manager"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn update_report_status(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateReportStatus>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let data = expenses
        .update_report_status(
            path.into_inner(),
            auth.actor(),
            payload.status,
            payload.manager_comment,
        )
        .await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Delete a report
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/expense-reports/{id}",
    params(("id" = u64, Path, description = "Report ID")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn delete_report(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    expenses.delete_report(path.into_inner(), auth.actor()).await?;
    Ok(HttpResponse::NoContent().finish())
}
