use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::AppLeaveService;
use crate::auth::auth::AuthUser;
use crate::error::Result;
use crate::model::{LeaveStatus, LeaveType};
use crate::service::{LeavePatch, LeaveResponse};
use crate::store::LeaveFilter;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-06-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,

    #[schema(example = "2026-06-06", format = "date", value_type = String)]
    pub end_date: NaiveDate,

    #[schema(example = "annual")]
    pub leave_type: LeaveType, // enum ensures Swagger dropdown

    #[schema(example = "Family trip", nullable = true)]
    pub comment: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeave {
    #[schema(example = "2026-06-03", format = "date", value_type = String, nullable = true)]
    pub start_date: Option<NaiveDate>,

    #[schema(example = "2026-06-09", format = "date", value_type = String, nullable = true)]
    pub end_date: Option<NaiveDate>,

    #[schema(example = "sick", nullable = true)]
    pub leave_type: Option<LeaveType>,

    #[schema(nullable = true)]
    pub comment: Option<String>,
}

/// Optional manager note attached while approving or rejecting.
#[derive(Deserialize, ToSchema)]
pub struct ManagerDecision {
    #[schema(example = "Enjoy your break", nullable = true)]
    pub manager_comment: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveQuery {
    /// Filter by requesting user ID
    #[schema(example = 7)]
    pub user_id: Option<u64>,
    /// Filter by request status
    #[schema(example = "pending")]
    pub status: Option<LeaveStatus>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/// Created/updated request plus the formatted holiday dates that fall inside
/// the range. The list is advisory, never an error.
#[derive(Serialize, ToSchema)]
pub struct LeaveWithNotices {
    pub request: LeaveResponse,
    #[schema(example = json!(["01/01/2026"]))]
    pub holidays: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 7)]
    pub user_id: u64,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 25)]
    pub balance: i64,
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveWithNotices),
        (status = 400, description = "Invalid dates"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Overlaps an approved request"),
        (status = 422, description = "Insufficient balance")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let (request, holidays) = leaves
        .create(
            auth.user_id,
            payload.start_date,
            payload.end_date,
            payload.leave_type,
            payload.comment,
        )
        .await?;

    Ok(HttpResponse::Created().json(LeaveWithNotices { request, holidays }))
}

/* =========================
List leave requests (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveQuery),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
    query: web::Query<LeaveQuery>,
) -> Result<HttpResponse> {
    auth.require_admin()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);

    let filter = LeaveFilter {
        user_id: query.user_id,
        status: query.status,
        page: Some(page),
        per_page: Some(per_page),
    };
    let (data, total) = leaves.list_filtered(&filter).await?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/* =========================
Own requests
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/my",
    responses(
        (status = 200, description = "Requests submitted by the caller", body = [LeaveResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn my_leaves(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
) -> Result<HttpResponse> {
    let data = leaves.list_for_user(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Direct reports' requests
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/team",
    responses(
        (status = 200, description = "Requests from the caller's direct reports", body = [LeaveResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn team_leaves(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
) -> Result<HttpResponse> {
    let data = leaves.list_for_manager(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Requests by status (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/status/{status}",
    params(("status" = LeaveStatus, Path, description = "pending, approved or rejected")),
    responses(
        (status = 200, description = "Requests in the given status", body = [LeaveResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leaves_by_status(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
    path: web::Path<LeaveStatus>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let data = leaves.list_by_status(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Own balance for a year
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/balance/{year}",
    params(("year" = i32, Path, description = "Calendar year, e.g. 2026")),
    responses(
        (status = 200, description = "Remaining balance", body = BalanceResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn my_balance(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let year = path.into_inner();
    let balance = leaves.balance(auth.user_id, year).await?;
    Ok(HttpResponse::Ok().json(BalanceResponse {
        user_id: auth.user_id,
        year,
        balance,
    }))
}

/* =========================
Fetch one request
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/{id}",
    params(("id" = u64, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not owner, manager or admin"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    let data = leaves.get(path.into_inner(), auth.actor()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Update a pending request
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{id}",
    params(("id" = u64, Path, description = "Leave request ID")),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Request updated", body = LeaveWithNotices),
        (status = 400, description = "Invalid dates"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed, or overlaps an approved request"),
        (status = 422, description = "Insufficient balance")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn update_leave(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeave>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let patch = LeavePatch {
        start_date: payload.start_date,
        end_date: payload.end_date,
        leave_type: payload.leave_type,
        comment: payload.comment,
    };
    let (request, holidays) = leaves.update(path.into_inner(), auth.actor(), patch).await?;
    Ok(HttpResponse::Ok().json(LeaveWithNotices { request, holidays }))
}

/* =========================
Approve (manager/admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{id}/approve",
    params(("id" = u64, Path, description = "Leave request ID")),
    request_body = ManagerDecision,
    responses(
        (status = 200, description = "Leave approved", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the employee's manager"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
    path: web::Path<u64>,
    payload: Option<web::Json<ManagerDecision>>,
) -> Result<HttpResponse> {
    let data = leaves
        .update_status(
            path.into_inner(),
            auth.actor(),
            LeaveStatus::Approved,
            payload.and_then(|p| p.into_inner().manager_comment),
        )
        .await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Reject (manager/admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{id}/reject",
    params(("id" = u64, Path, description = "Leave request ID")),
    request_body = ManagerDecision,
    responses(
        (status = 200, description = "Leave rejected", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the employee's manager"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
    path: web::Path<u64>,
    payload: Option<web::Json<ManagerDecision>>,
) -> Result<HttpResponse> {
    let data = leaves
        .update_status(
            path.into_inner(),
            auth.actor(),
            LeaveStatus::Rejected,
            payload.and_then(|p| p.into_inner().manager_comment),
        )
        .await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Delete a pending request
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/leave/{id}",
    params(("id" = u64, Path, description = "Leave request ID")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    leaves: web::Data<AppLeaveService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    leaves.delete(path.into_inner(), auth.actor()).await?;
    Ok(HttpResponse::NoContent().finish())
}
