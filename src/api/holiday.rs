use crate::auth::auth::AuthUser;
use crate::model::{holiday::Holiday, permission::Page};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "New Year's Day")]
    pub name: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = true)]
    pub is_paid: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateHoliday {
    pub name: Option<String>,
    #[schema(format = "date", value_type = String)]
    pub date: Option<NaiveDate>,
    pub is_paid: Option<bool>,
}

/// Bulk payload from an external holiday source.
#[derive(Deserialize, ToSchema)]
pub struct ImportHolidays {
    pub holidays: Vec<CreateHoliday>,
}

/// Inserts the batch in one transaction; rows already present for the
/// same date and name are skipped, not duplicated.
async fn import_batch(pool: &MySqlPool, holidays: &[CreateHoliday]) -> anyhow::Result<u64> {
    let mut tx = pool.begin().await.context("open transaction")?;
    let mut imported = 0;

    for holiday in holidays {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO holidays (name, date, is_paid)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(holiday.name.trim())
        .bind(holiday.date)
        .bind(holiday.is_paid)
        .execute(&mut *tx)
        .await
        .context("insert holiday")?;

        imported += result.rows_affected();
    }

    tx.commit().await.context("commit import")?;
    Ok(imported)
}

/// Create Holiday
#[utoipa::path(
    post,
    path = "/api/v1/holidays",
    request_body = CreateHoliday,
    responses(
        (status = 201, description = "Holiday created"),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Holiday",
    security(("bearer_auth" = []))
)]
pub async fn create_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateHoliday>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Holidays)?;

    if payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": { "name": "name must not be empty" }
        })));
    }

    let result = sqlx::query("INSERT INTO holidays (name, date, is_paid) VALUES (?, ?, ?)")
        .bind(payload.name.trim())
        .bind(payload.date)
        .bind(payload.is_paid)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create holiday");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Holiday created",
        "id": result.last_insert_id()
    })))
}

/// List Holidays, ordered by date
#[utoipa::path(
    get,
    path = "/api/v1/holidays",
    responses(
        (status = 200, description = "All holidays", body = [Holiday]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Holiday",
    security(("bearer_auth" = []))
)]
pub async fn list_holidays(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::Holidays)?;

    let holidays = sqlx::query_as::<_, Holiday>(
        "SELECT id, name, date, is_paid FROM holidays ORDER BY date ASC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch holidays");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(holidays))
}

/// Update Holiday
#[utoipa::path(
    put,
    path = "/api/v1/holidays/{holiday_id}",
    params(("holiday_id", Path, description = "Holiday ID")),
    request_body = UpdateHoliday,
    responses(
        (status = 200, description = "Holiday updated"),
        (status = 404, description = "Holiday not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Holiday",
    security(("bearer_auth" = []))
)]
pub async fn update_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateHoliday>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Holidays)?;

    let holiday_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE holidays
        SET name = COALESCE(?, name),
            date = COALESCE(?, date),
            is_paid = COALESCE(?, is_paid)
        WHERE id = ?
        "#,
    )
    .bind(payload.name.as_deref().map(str::trim))
    .bind(payload.date)
    .bind(payload.is_paid)
    .bind(holiday_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, holiday_id, "Failed to update holiday");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Holiday not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Holiday updated"
    })))
}

/// Delete Holiday
#[utoipa::path(
    delete,
    path = "/api/v1/holidays/{holiday_id}",
    params(("holiday_id", Path, description = "Holiday ID")),
    responses(
        (status = 200, description = "Holiday deleted"),
        (status = 404, description = "Holiday not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Holiday",
    security(("bearer_auth" = []))
)]
pub async fn delete_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Holidays)?;

    let holiday_id = path.into_inner();

    let result = sqlx::query("DELETE FROM holidays WHERE id = ?")
        .bind(holiday_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, holiday_id, "Failed to delete holiday");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Holiday not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Holiday deleted"
    })))
}

/// Bulk import from an external holiday source
#[utoipa::path(
    post,
    path = "/api/v1/holidays/import",
    request_body = ImportHolidays,
    responses(
        (status = 200, description = "Batch imported", body = Object, example = json!({
            "message": "Holidays imported",
            "imported": 11
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Holiday",
    security(("bearer_auth" = []))
)]
pub async fn import_holidays(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ImportHolidays>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Holidays)?;

    let imported = import_batch(pool.get_ref(), &payload.holidays)
        .await
        .map_err(|e| {
            error!(error = %e, "Holiday import failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Holidays imported",
        "imported": imported
    })))
}
