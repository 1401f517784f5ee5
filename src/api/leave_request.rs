use crate::auth::auth::AuthUser;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, leave_day_count};
use crate::model::permission::Page;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
}

impl LeaveType {
    fn as_str(&self) -> &str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Unpaid => "unpaid",
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "sick")]
    pub leave_type: LeaveType,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID
    #[schema(example = 123)]
    pub employee_id: Option<u64>,
    /// Filter by leave status
    #[schema(example = "pending")]
    pub status: Option<String>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "sick")]
    pub leave_type: String,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

async fn fetch_leave_row(
    pool: &MySqlPool,
    leave_id: u64,
) -> Result<Option<LeaveRequest>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>(
        "SELECT id, employee_id, start_date, end_date, leave_type, status FROM leave_requests WHERE id = ?",
    )
    .bind(leave_id)
    .fetch_optional(pool)
    .await
}

/// Compare-and-swap status write: only succeeds if the status is still
/// what the caller just observed, so concurrent transitions surface as a
/// conflict instead of a lost update.
async fn cas_status<'e, E>(
    executor: E,
    leave_id: u64,
    expected: LeaveStatus,
    next: LeaveStatus,
) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::MySql>,
{
    let result = sqlx::query("UPDATE leave_requests SET status = ? WHERE id = ? AND status = ?")
        .bind(next.to_string())
        .bind(leave_id)
        .bind(expected.to_string())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

fn transition_error(current: &LeaveStatus, next: LeaveStatus) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "message": format!("Cannot move a {current} request to {next}")
    }))
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "status": "pending"
         })
        ),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::LeaveRequests)?;

    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": { "start_date": "start_date cannot be after end_date" }
        })));
    }

    if leave_day_count(payload.start_date, payload.end_date) == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": { "start_date": "range contains no working days" }
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, start_date, end_date, leave_type, status, created_at)
        VALUES (?, ?, ?, ?, ?, NOW())
        "#,
    )
    .bind(employee_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.leave_type.as_str())
    .bind(LeaveStatus::Pending.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create leave request");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request submitted",
        "status": LeaveStatus::Pending.to_string()
    })))
}

/* =========================
Manager approval: pending -> pending_rh_approval
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to forward to RH")
    ),
    responses(
        (status = 200, description = "Forwarded to RH", body = Object, example = json!({
            "message": "Leave request forwarded to RH"
        })),
        (status = 400, description = "Illegal transition"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Processed by someone else meanwhile"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::LeaveRequests)?;

    let leave_id = path.into_inner();

    let row = fetch_leave_row(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(row) = row else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    };

    let current: LeaveStatus = row.status.parse().map_err(|_| {
        tracing::error!(leave_id, status = %row.status, "Unknown status in store");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if !current.can_transition_to(LeaveStatus::PendingRhApproval) {
        return Ok(transition_error(&current, LeaveStatus::PendingRhApproval));
    }

    let swapped = cas_status(
        pool.get_ref(),
        leave_id,
        current,
        LeaveStatus::PendingRhApproval,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Forward to RH failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if !swapped {
        return Ok(HttpResponse::Conflict().json(json!({
            "message": "Leave request was processed by someone else"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request forwarded to RH"
    })))
}

/* =========================
RH approval: pending_rh_approval -> approved, balance debit
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/hr-approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved and balance debited", body = Object, example = json!({
            "message": "Leave approved",
            "days_debited": 3
        })),
        (status = 400, description = "Illegal transition"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Processed by someone else meanwhile"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn hr_approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_rh()?;

    let leave_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to open transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let row = sqlx::query_as::<_, LeaveRequest>(
        "SELECT id, employee_id, start_date, end_date, leave_type, status FROM leave_requests WHERE id = ? FOR UPDATE",
    )
    .bind(leave_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(row) = row else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    };

    let current: LeaveStatus = row.status.parse().map_err(|_| {
        tracing::error!(leave_id, status = %row.status, "Unknown status in store");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if !current.can_transition_to(LeaveStatus::Approved) {
        return Ok(transition_error(&current, LeaveStatus::Approved));
    }

    let swapped = cas_status(&mut *tx, leave_id, current, LeaveStatus::Approved)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Approve leave failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if !swapped {
        return Ok(HttpResponse::Conflict().json(json!({
            "message": "Leave request was processed by someone else"
        })));
    }

    // balance debit happens with the approval or not at all
    let days = leave_day_count(row.start_date, row.end_date);
    sqlx::query("UPDATE employees SET leave_balance = leave_balance - ? WHERE id = ?")
        .bind(days as f64)
        .bind(row.employee_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to debit leave balance");
            ErrorInternalServerError("Internal Server Error")
        })?;

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to commit approval");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave approved",
        "days_debited": days
    })))
}

/* =========================
Reject (manager or RH)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 400, description = "Illegal transition"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Processed by someone else meanwhile"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::LeaveRequests)?;

    let leave_id = path.into_inner();

    let row = fetch_leave_row(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(row) = row else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    };

    let current: LeaveStatus = row.status.parse().map_err(|_| {
        tracing::error!(leave_id, status = %row.status, "Unknown status in store");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if !current.can_transition_to(LeaveStatus::Rejected) {
        return Ok(transition_error(&current, LeaveStatus::Rejected));
    }

    let swapped = cas_status(pool.get_ref(), leave_id, current, LeaveStatus::Rejected)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Reject leave failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if !swapped {
        return Ok(HttpResponse::Conflict().json(json!({
            "message": "Leave request was processed by someone else"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave rejected"
    })))
}

/* =========================
Cancel (requester only)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    responses(
        (status = 200, description = "Leave cancelled", body = Object, example = json!({
            "message": "Leave request cancelled"
        })),
        (status = 400, description = "Illegal transition"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Processed by someone else meanwhile"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the requester can cancel")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;
    let leave_id = path.into_inner();

    let row = fetch_leave_row(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(row) = row else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    };

    if row.employee_id != employee_id {
        return Err(actix_web::error::ErrorForbidden(
            "Only the requester can cancel a leave request",
        ));
    }

    let current: LeaveStatus = row.status.parse().map_err(|_| {
        tracing::error!(leave_id, status = %row.status, "Unknown status in store");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if !current.can_transition_to(LeaveStatus::Cancelled) {
        return Ok(transition_error(&current, LeaveStatus::Cancelled));
    }

    let swapped = cas_status(pool.get_ref(), leave_id, current, LeaveStatus::Cancelled)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Cancel leave failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if !swapped {
        return Ok(HttpResponse::Conflict().json(json!({
            "message": "Leave request was processed by someone else"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request cancelled"
    })))
}

/* =========================
Get one leave request
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::LeaveRequests)?;

    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, LeaveResponse>(
        r#"
        SELECT id, employee_id, start_date, end_date, leave_type, status, created_at
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(leave) = leave else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    };

    // non-approvers only ever see their own requests
    if !auth.role.permission(Page::LeaveRequests).manage
        && auth.employee_id != Some(leave.employee_id)
    {
        return Err(actix_web::error::ErrorForbidden("Access denied"));
    }

    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
List leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::LeaveRequests)?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // non-approvers are pinned to their own requests
    let employee_filter = if auth.role.permission(Page::LeaveRequests).manage {
        query.employee_id
    } else {
        Some(
            auth.employee_id
                .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?,
        )
    };

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = employee_filter {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{where_sql}");

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, start_date, end_date, leave_type, status, created_at
        FROM leave_requests
        {where_sql}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#
    );

    let mut data_q = sqlx::query_as::<_, LeaveResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let response = LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}
