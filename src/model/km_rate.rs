use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 2,
        "vehicle_category": "car_5cv",
        "rate_per_km": "0.536"
    })
)]
pub struct KmRate {
    #[schema(example = 2)]
    pub id: u64,

    #[schema(example = "car_5cv")]
    pub vehicle_category: String,

    #[schema(example = "0.536", value_type = String)]
    pub rate_per_km: Decimal,
}
