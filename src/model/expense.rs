use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, sqlx::Type, Display,
    EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExpenseStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ExpenseReport {
    pub id: u64,
    pub user_id: u64,
    pub project_id: Option<u64>,
    pub status: ExpenseStatus,
    pub submitted_at: DateTime<Utc>,
    pub manager_comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 3,
        "report_id": 1,
        "date": "2026-03-12",
        "description": "Client site round trip",
        "amount": "42.50",
        "receipt_path": null,
        "km_rate_id": 2,
        "distance_km": 85
    })
)]
pub struct ExpenseLine {
    #[schema(example = 3)]
    pub id: u64,

    #[schema(example = 1)]
    pub report_id: u64,

    #[schema(example = "2026-03-12", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Client site round trip")]
    pub description: String,

    // rust_decimal serializes as a string, e.g. "42.50"
    #[schema(example = "42.50", value_type = String)]
    pub amount: Decimal,

    #[schema(nullable = true)]
    pub receipt_path: Option<String>,

    #[schema(example = 2, nullable = true)]
    pub km_rate_id: Option<u64>,

    #[schema(example = 85, nullable = true)]
    pub distance_km: Option<i32>,
}
