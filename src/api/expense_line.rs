use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::AppExpenseService;
use crate::auth::auth::AuthUser;
use crate::error::Result;
use crate::model::ExpenseLine;
use crate::service::LineInput;

#[derive(Deserialize, ToSchema)]
pub struct CreateLine {
    #[schema(example = 1)]
    pub report_id: u64,

    #[schema(example = "2026-03-12", format = "date", value_type = String)]
    pub date: NaiveDate,

    #[schema(example = "Client site round trip")]
    pub description: String,

    #[schema(example = "42.50", value_type = String)]
    pub amount: Decimal,

    #[schema(nullable = true)]
    pub receipt_path: Option<String>,

    #[schema(example = 2, nullable = true)]
    pub km_rate_id: Option<u64>,

    /// Required when `km_rate_id` is set.
    #[schema(example = 85, nullable = true)]
    pub distance_km: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLine {
    #[schema(example = "2026-03-12", format = "date", value_type = String)]
    pub date: NaiveDate,

    #[schema(example = "Client site round trip")]
    pub description: String,

    #[schema(example = "42.50", value_type = String)]
    pub amount: Decimal,

    #[schema(nullable = true)]
    pub receipt_path: Option<String>,

    #[schema(example = 2, nullable = true)]
    pub km_rate_id: Option<u64>,

    #[schema(example = 85, nullable = true)]
    pub distance_km: Option<i32>,
}

/* =========================
List all lines (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/expense-lines",
    responses(
        (status = 200, description = "All expense lines", body = [ExpenseLine]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn list_lines(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let data = expenses.list_lines().await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Lines of a report
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/expense-lines/report/{report_id}",
    params(("report_id" = u64, Path, description = "Parent report ID")),
    responses(
        (status = 200, description = "Lines attached to the report", body = [ExpenseLine]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn report_lines(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    let data = expenses
        .lines_for_report(path.into_inner(), auth.actor())
        .await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Fetch one line
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/expense-lines/{id}",
    params(("id" = u64, Path, description = "Line ID")),
    responses(
        (status = 200, description = "Line found", body = ExpenseLine),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Line not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn get_line(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    let data = expenses.get_line(path.into_inner(), auth.actor()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Add a line (report owner)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/expense-lines",
    request_body = CreateLine,
    responses(
        (status = 201, description = "Line added", body = ExpenseLine),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the report owner may add lines"),
        (status = 404, description = "Report or km rate not found"),
        (status = 409, description = "An identical line already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn create_line(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    payload: web::Json<CreateLine>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let data = expenses
        .create_line(
            payload.report_id,
            auth.user_id,
            LineInput {
                date: payload.date,
                description: payload.description,
                amount: payload.amount,
                receipt_path: payload.receipt_path,
                km_rate_id: payload.km_rate_id,
                distance_km: payload.distance_km,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(data))
}

/* =========================
Update a line (report owner)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/expense-lines/{id}",
    params(("id" = u64, Path, description = "Line ID")),
    request_body = UpdateLine,
    responses(
        (status = 200, description = "Line updated", body = ExpenseLine),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the report owner may modify lines"),
        (status = 404, description = "Line or km rate not found"),
        (status = 409, description = "An identical line already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn update_line(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLine>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let data = expenses
        .update_line(
            path.into_inner(),
            auth.user_id,
            LineInput {
                date: payload.date,
                description: payload.description,
                amount: payload.amount,
                receipt_path: payload.receipt_path,
                km_rate_id: payload.km_rate_id,
                distance_km: payload.distance_km,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Delete a line (report owner)
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/expense-lines/{id}",
    params(("id" = u64, Path, description = "Line ID")),
    responses(
        (status = 204, description = "Line deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the report owner may delete lines"),
        (status = 404, description = "Line not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn delete_line(
    auth: AuthUser,
    expenses: web::Data<AppExpenseService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    expenses.delete_line(path.into_inner(), auth.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
