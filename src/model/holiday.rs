use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "date": "2026-01-01",
        "description": "Jour de l'An"
    })
)]
pub struct Holiday {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Jour de l'An")]
    pub description: String,
}
