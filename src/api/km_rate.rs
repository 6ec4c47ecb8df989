use actix_web::{HttpResponse, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::AppKmRateService;
use crate::auth::auth::AuthUser;
use crate::error::Result;
use crate::model::KmRate;
use crate::service::KmRatePatch;

#[derive(Deserialize, ToSchema)]
pub struct CreateKmRate {
    #[schema(example = "car-5cv")]
    pub vehicle_category: String,

    #[schema(example = "0.52", value_type = String)]
    pub rate_per_km: Decimal,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateKmRate {
    #[schema(example = "car-5cv", nullable = true)]
    pub vehicle_category: Option<String>,

    #[schema(example = "0.55", value_type = String, nullable = true)]
    pub rate_per_km: Option<Decimal>,
}

/* =========================
List rates
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/km-rates",
    responses(
        (status = 200, description = "All kilometre rates", body = [KmRate]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "KmRate"
)]
pub async fn list_rates(
    _auth: AuthUser,
    rates: web::Data<AppKmRateService>,
) -> Result<HttpResponse> {
    let data = rates.list().await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Fetch one rate
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/km-rates/{id}",
    params(("id" = u64, Path, description = "Rate ID")),
    responses(
        (status = 200, description = "Rate found", body = KmRate),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Rate not found")
    ),
    security(("bearer_auth" = [])),
    tag = "KmRate"
)]
pub async fn get_rate(
    _auth: AuthUser,
    rates: web::Data<AppKmRateService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    let data = rates.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Fetch by vehicle category
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/km-rates/category/{category}",
    params(("category" = String, Path, description = "Vehicle category, e.g. car-5cv")),
    responses(
        (status = 200, description = "Rate found", body = KmRate),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Rate not found")
    ),
    security(("bearer_auth" = [])),
    tag = "KmRate"
)]
pub async fn get_rate_by_category(
    _auth: AuthUser,
    rates: web::Data<AppKmRateService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let data = rates.by_category(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Create rate (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/km-rates",
    request_body = CreateKmRate,
    responses(
        (status = 201, description = "Rate created", body = KmRate),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Category already has a rate")
    ),
    security(("bearer_auth" = [])),
    tag = "KmRate"
)]
pub async fn create_rate(
    auth: AuthUser,
    rates: web::Data<AppKmRateService>,
    payload: web::Json<CreateKmRate>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let payload = payload.into_inner();
    let data = rates
        .create(payload.vehicle_category, payload.rate_per_km)
        .await?;
    Ok(HttpResponse::Created().json(data))
}

/* =========================
Update rate (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/km-rates/{id}",
    params(("id" = u64, Path, description = "Rate ID")),
    request_body = UpdateKmRate,
    responses(
        (status = 200, description = "Rate updated", body = KmRate),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Rate not found"),
        (status = 409, description = "Category already has a rate")
    ),
    security(("bearer_auth" = [])),
    tag = "KmRate"
)]
pub async fn update_rate(
    auth: AuthUser,
    rates: web::Data<AppKmRateService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateKmRate>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let payload = payload.into_inner();
    let patch = KmRatePatch {
        vehicle_category: payload.vehicle_category,
        rate_per_km: payload.rate_per_km,
    };
    let data = rates.update(path.into_inner(), patch).await?;
    Ok(HttpResponse::Ok().json(data))
}

/* =========================
Delete rate (admin)
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/km-rates/{id}",
    params(("id" = u64, Path, description = "Rate ID")),
    responses(
        (status = 204, description = "Rate deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Rate not found")
    ),
    security(("bearer_auth" = [])),
    tag = "KmRate"
)]
pub async fn delete_rate(
    auth: AuthUser,
    rates: web::Data<AppKmRateService>,
    path: web::Path<u64>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    rates.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
