use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Department {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Engineering")]
    pub name: String,

    /// Employee leading this department, if any.
    #[schema(example = 7, nullable = true)]
    pub lead_id: Option<u64>,
}
