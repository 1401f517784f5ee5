use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Room booking, always exactly one 30-minute slot. `employee_name` and
/// `department_name` are denormalized at creation time.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "room_id": 2,
        "employee_id": 7,
        "employee_name": "Jane Doe",
        "department_name": "Engineering",
        "title": "Sprint planning",
        "date": "2026-03-02",
        "start_time": "09:00:00",
        "end_time": "09:30:00"
    })
)]
pub struct Booking {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 2)]
    pub room_id: u64,

    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = "Jane Doe")]
    pub employee_name: String,

    #[schema(example = "Engineering")]
    pub department_name: String,

    #[schema(example = "Sprint planning")]
    pub title: String,

    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "09:00:00", value_type = String)]
    pub start_time: NaiveTime,

    #[schema(example = "09:30:00", value_type = String)]
    pub end_time: NaiveTime,
}
