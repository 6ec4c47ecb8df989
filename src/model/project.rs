use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Refonte intranet",
        "description": "Internal portal rewrite"
    })
)]
pub struct Project {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Refonte intranet")]
    pub name: String,

    #[schema(example = "Internal portal rewrite", nullable = true)]
    pub description: Option<String>,
}
