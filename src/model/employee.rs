use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Jane Doe",
        "email": "jane.doe@company.com",
        "role": "employee",
        "department_id": 10,
        "status": "active",
        "leave_balance": 12.5,
        "start_date": "2024-01-01",
        "birth_date": "1991-06-15"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Jane Doe")]
    pub name: String,

    #[schema(example = "jane.doe@company.com")]
    pub email: String,

    #[schema(example = "employee")]
    pub role: String,

    #[schema(example = 10, nullable = true)]
    pub department_id: Option<u64>,

    #[schema(example = "active")]
    pub status: String,

    #[schema(example = 12.5)]
    pub leave_balance: f64,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "1991-06-15", value_type = String, format = "date", nullable = true)]
    pub birth_date: Option<NaiveDate>,
}
