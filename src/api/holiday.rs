use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::AppHolidayService;
use crate::auth::auth::AuthUser;
use crate::error::Result;
use crate::model::Holiday;
use crate::service::HolidayPatch;

#[derive(Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,

    #[schema(example = "Jour de l'An")]
    pub description: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateHoliday {
    #[schema(example = "2026-01-01", format = "date", value_type = String, nullable = true)]
    pub date: Option<NaiveDate>,

    #[schema(example = "Jour de l'An", nullable = true)]
    pub description: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct CheckQuery {
    /// Date to test, e.g. 2026-01-01
    pub date: NaiveDate,
}

#[derive(Serialize, ToSchema)]
pub struct CheckResponse {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = true)]
    pub is_holiday: bool,
}

/* =========================
List holidays
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/holidays",
    responses(
        (status = 200, description = "All holidays, ascending by date", body = [Holiday]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn list_holidays(
    _auth: AuthUser,
    holidays: web::Data<AppHolidayService>,
) -> Result<HttpResponse> {
    let data = holidays.list().await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Holidays of a year
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/holidays/year/{year}",
    params(("year" = i32, Path, description = "Calendar year, e.g. 2026")),
    responses(
        (status = 200, description = "Holidays falling in the year", body = [Holiday]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn holidays_of_year(
    _auth: AuthUser,
    holidays: web::Data<AppHolidayService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let data = holidays.by_year(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Check one date
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/holidays/check",
    params(CheckQuery),
    responses(
        (status = 200, description = "Whether the date is a holiday", body = CheckResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn check_holiday(
    _auth: AuthUser,
    holidays: web::Data<AppHolidayService>,
    query: web::Query<CheckQuery>,
) -> Result<HttpResponse> {
    let date = query.date;
    let is_holiday = holidays.is_holiday(date).await?;
    Ok(HttpResponse::Ok().json(CheckResponse { date, is_holiday }))
}

/* =========================
Fetch one holiday
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/holidays/{id}",
    params(("id" = u64, Path, description = "Holiday ID")),
    responses(
        (status = 200, description = "Holiday found", body = Holiday),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Holiday not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn get_holiday(
    _auth: AuthUser,
    holidays: web::Data<AppHolidayService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    let data = holidays.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Create holiday (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/holidays",
    request_body = CreateHoliday,
    responses(
        (status = 201, description = "Holiday created", body = Holiday),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "A holiday already exists on this date")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn create_holiday(
    auth: AuthUser,
    holidays: web::Data<AppHolidayService>,
    payload: web::Json<CreateHoliday>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let payload = payload.into_inner();
    let data = holidays.create(payload.date, payload.description).await?;
    Ok(HttpResponse::Created().json(data))
}

/* =========================
Update holiday (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/holidays/{id}",
    params(("id" = u64, Path, description = "Holiday ID")),
    request_body = UpdateHoliday,
    responses(
        (status = 200, description = "Holiday updated", body = Holiday),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Holiday not found"),
        (status = 409, description = "A holiday already exists on this date")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn update_holiday(
    auth: AuthUser,
    holidays: web::Data<AppHolidayService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateHoliday>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let payload = payload.into_inner();
    let patch = HolidayPatch {
        date: payload.date,
        description: payload.description,
    };
    let data = holidays.update(path.into_inner(), patch).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Delete holiday (admin)
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/holidays/{id}",
    params(("id" = u64, Path, description = "Holiday ID")),
    responses(
        (status = 204, description = "Holiday deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Holiday not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn delete_holiday(
    auth: AuthUser,
    holidays: web::Data<AppHolidayService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    holidays.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
