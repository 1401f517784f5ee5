use std::collections::HashMap;

use crate::auth::auth::AuthUser;
use crate::model::availability::Availability;
use crate::model::permission::Page;
use crate::utils::week::{
    WeekdayGrid, WorkDay, join_selected_days, parse_selected_days, target_week_start,
    validate_selection, week_monday,
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{MySqlPool, prelude::FromRow};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct SubmitAvailability {
    /// In-office days for the target week, lowercase names, max 3
    #[schema(example = json!(["monday", "wednesday"]))]
    pub days: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TargetWeekResponse {
    #[schema(example = "2026-03-09", value_type = String, format = "date")]
    pub week_start: NaiveDate,
    /// The caller's current selection for that week
    pub selected_days: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TeamMemberSchedule {
    #[schema(example = 7)]
    pub employee_id: u64,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub days: WeekdayGrid,
}

#[derive(Serialize, ToSchema)]
pub struct TeamScheduleResponse {
    #[schema(example = "2026-03-09", value_type = String, format = "date")]
    pub week_start: NaiveDate,
    pub members: Vec<TeamMemberSchedule>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TeamScheduleQuery {
    /// Week to show; any date inside the week works. Defaults to the
    /// target week.
    #[schema(example = "2026-03-09", value_type = String, format = "date")]
    pub week: Option<NaiveDate>,
}

#[derive(FromRow)]
struct AvailabilityRow {
    employee_id: u64,
    selected_days: String,
}

fn parse_submission(days: &[String]) -> Result<Vec<WorkDay>, HashMap<String, String>> {
    let mut parsed = Vec::with_capacity(days.len());
    for raw in days {
        match raw.parse::<WorkDay>() {
            Ok(day) => parsed.push(day),
            Err(_) => {
                return Err(HashMap::from([(
                    "days".to_string(),
                    format!("unknown weekday: {raw}"),
                )]));
            }
        }
    }
    validate_selection(&parsed)
        .map_err(|msg| HashMap::from([("days".to_string(), msg)]))?;
    Ok(parsed)
}

/* =========================
Target week and own selection
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/availability",
    responses(
        (status = 200, description = "Target week and the caller's selection", body = TargetWeekResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Availability"
)]
pub async fn my_availability(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::Availability)?;

    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let week_start = target_week_start(Utc::now().date_naive());

    let stored = sqlx::query_as::<_, Availability>(
        r#"
        SELECT id, employee_id, week_start, selected_days
        FROM availability
        WHERE employee_id = ? AND week_start = ?
        "#,
    )
    .bind(employee_id)
    .bind(week_start)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch availability");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let selected_days = match stored.as_ref() {
        Some(row) => parse_selected_days(&row.selected_days)
            .map_err(|e| {
                error!(employee_id, error = %e, "Corrupt availability row");
                ErrorInternalServerError("Internal Server Error")
            })?
            .iter()
            .map(|d| d.to_string())
            .collect(),
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(TargetWeekResponse {
        week_start,
        selected_days,
    }))
}

/* =========================
Submit selection for the target week
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/availability",
    request_body = SubmitAvailability,
    responses(
        (status = 200, description = "Selection saved", body = Object, example = json!({
            "message": "Availability saved",
            "week_start": "2026-03-09"
        })),
        (status = 400, description = "Validation failed (limit is 3 days)"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Availability"
)]
pub async fn submit_availability(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<SubmitAvailability>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Availability)?;

    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let days = match parse_submission(&payload.days) {
        Ok(days) => days,
        Err(errors) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Validation failed",
                "errors": errors
            })));
        }
    };

    let week_start = target_week_start(Utc::now().date_naive());

    // one row per employee and week; re-submission overwrites
    sqlx::query(
        r#"
        INSERT INTO availability (employee_id, week_start, selected_days)
        VALUES (?, ?, ?)
        ON DUPLICATE KEY UPDATE selected_days = VALUES(selected_days)
        "#,
    )
    .bind(employee_id)
    .bind(week_start)
    .bind(join_selected_days(&days))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to save availability");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Availability saved",
        "week_start": week_start
    })))
}

/* =========================
Team-wide weekday grid
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/availability/team",
    params(TeamScheduleQuery),
    responses(
        (status = 200, description = "Per-employee weekday grid for the week", body = TeamScheduleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Availability"
)]
pub async fn team_schedule(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TeamScheduleQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::Availability)?;

    let week_start = match query.week {
        Some(date) => week_monday(date),
        None => target_week_start(Utc::now().date_naive()),
    };

    let employees = sqlx::query_as::<_, (u64, String)>(
        "SELECT id, name FROM employees WHERE status = 'active' ORDER BY name ASC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch employees");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let rows = sqlx::query_as::<_, AvailabilityRow>(
        "SELECT employee_id, selected_days FROM availability WHERE week_start = ?",
    )
    .bind(week_start)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch availability");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let mut by_employee: HashMap<u64, Vec<WorkDay>> = HashMap::with_capacity(rows.len());
    for row in rows {
        let days = parse_selected_days(&row.selected_days).map_err(|e| {
            error!(employee_id = row.employee_id, error = %e, "Corrupt availability row");
            ErrorInternalServerError("Internal Server Error")
        })?;
        by_employee.insert(row.employee_id, days);
    }

    // employees with no submission still show up, all-false
    let members = employees
        .into_iter()
        .map(|(employee_id, name)| TeamMemberSchedule {
            employee_id,
            name,
            days: by_employee
                .get(&employee_id)
                .map(|days| WeekdayGrid::from_days(days))
                .unwrap_or_default(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(TeamScheduleResponse {
        week_start,
        members,
    }))
}
