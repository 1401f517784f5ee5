use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row per (employee, week). `week_start` is always a Monday;
/// `selected_days` holds at most three comma-separated weekday names.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Availability {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    pub week_start: NaiveDate,

    #[schema(example = "monday,wednesday")]
    pub selected_days: String,
}
