use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Holiday {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "New Year's Day")]
    pub name: String,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = true)]
    pub is_paid: bool,
}
