use crate::auth::auth::AuthUser;
use crate::model::{booking::Booking, permission::Page, role::Role};
use crate::utils::slots::{
    BookedInterval, SlotAvailability, free_slots, is_valid_slot_start, slot_end, slot_is_free,
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use sqlx::{MySql, MySqlPool, Transaction, prelude::FromRow};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateBooking {
    #[schema(example = 2)]
    pub room_id: u64,
    #[schema(example = "Sprint planning")]
    pub title: String,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// Slot start, "HH:MM" on a 30-minute boundary between 08:00 and 17:30
    #[schema(example = "09:00")]
    pub start_time: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateBooking {
    #[schema(example = "Sprint review")]
    pub title: Option<String>,
    #[schema(example = 3)]
    pub room_id: Option<u64>,
    #[schema(example = "2026-03-03", format = "date", value_type = String)]
    pub date: Option<NaiveDate>,
    #[schema(example = "10:30")]
    pub start_time: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BookingQuery {
    #[schema(example = 2)]
    pub room_id: u64,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub date: NaiveDate,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SlotQuery {
    #[schema(example = 2)]
    pub room_id: u64,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// Booking id to leave out of the scan when editing
    #[schema(example = 1)]
    pub exclude: Option<u64>,
}

#[derive(FromRow)]
struct BookingTimeRow {
    id: u64,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

fn parse_start(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

fn can_touch_booking(auth: &AuthUser, owner_id: u64) -> bool {
    auth.employee_id == Some(owner_id)
        || matches!(auth.role, Role::Dev | Role::Owner | Role::Rh | Role::Manager)
}

/// Room's bookings for one day, locked for the rest of the transaction so
/// a concurrent create cannot slip between the check and the insert.
async fn locked_intervals(
    tx: &mut Transaction<'_, MySql>,
    room_id: u64,
    date: NaiveDate,
) -> Result<Vec<BookedInterval>, sqlx::Error> {
    let rows = sqlx::query_as::<_, BookingTimeRow>(
        "SELECT id, start_time, end_time FROM bookings WHERE room_id = ? AND date = ? FOR UPDATE",
    )
    .bind(room_id)
    .bind(date)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| BookedInterval {
            id: r.id,
            start: r.start_time,
            end: r.end_time,
        })
        .collect())
}

/* =========================
Slot availability for a room and day
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/bookings/slots",
    params(SlotQuery),
    responses(
        (status = 200, description = "All 20 slots with availability", body = [SlotAvailability]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Booking"
)]
pub async fn list_slots(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<SlotQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::Bookings)?;

    let rows = sqlx::query_as::<_, BookingTimeRow>(
        "SELECT id, start_time, end_time FROM bookings WHERE room_id = ? AND date = ?",
    )
    .bind(query.room_id)
    .bind(query.date)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, room_id = query.room_id, "Failed to fetch bookings");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let booked: Vec<BookedInterval> = rows
        .into_iter()
        .map(|r| BookedInterval {
            id: r.id,
            start: r.start_time,
            end: r.end_time,
        })
        .collect();

    Ok(HttpResponse::Ok().json(free_slots(&booked, query.exclude)))
}

/* =========================
List bookings for a room and day
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    params(BookingQuery),
    responses(
        (status = 200, description = "Bookings for the room and day", body = [Booking]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Booking"
)]
pub async fn list_bookings(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<BookingQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::Bookings)?;

    let bookings = sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, room_id, employee_id, employee_name, department_name,
               title, date, start_time, end_time
        FROM bookings
        WHERE room_id = ? AND date = ?
        ORDER BY start_time ASC
        "#,
    )
    .bind(query.room_id)
    .bind(query.date)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, room_id = query.room_id, "Failed to fetch bookings");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(bookings))
}

/* =========================
Create booking (transactional slot reservation)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = Object, example = json!({
            "message": "Booking created",
            "id": 1
        })),
        (status = 400, description = "Validation failed or slot already booked"),
        (status = 404, description = "Room not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Booking"
)]
pub async fn create_booking(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateBooking>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Bookings)?;

    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let Some(start) = parse_start(&payload.start_time) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": { "start_time": "expected HH:MM" }
        })));
    };

    if !is_valid_slot_start(start) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": { "start_time": "start must be a 30-minute slot between 08:00 and 17:30" }
        })));
    }

    if payload.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": { "title": "title must not be empty" }
        })));
    }

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let room_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM meeting_rooms WHERE id = ?")
        .bind(payload.room_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to check room");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if room_exists == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Room not found"
        })));
    }

    // denormalized at creation time, inside the same transaction
    let names = sqlx::query_as::<_, (String, Option<String>)>(
        r#"
        SELECT e.name, d.name
        FROM employees e
        LEFT JOIN departments d ON d.id = e.department_id
        WHERE e.id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to resolve employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some((employee_name, department_name)) = names else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    };

    let booked = locked_intervals(&mut tx, payload.room_id, payload.date)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to lock bookings");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if !slot_is_free(start, &booked, None) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Slot already booked"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO bookings
        (room_id, employee_id, employee_name, department_name, title, date, start_time, end_time)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.room_id)
    .bind(employee_id)
    .bind(&employee_name)
    .bind(department_name.unwrap_or_default())
    .bind(payload.title.trim())
    .bind(payload.date)
    .bind(start)
    .bind(slot_end(start))
    .execute(&mut *tx)
    .await;

    let inserted = match result {
        Ok(done) => done.last_insert_id(),
        Err(e) => {
            // unique key on (room_id, date, start_time) backstops the scan
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Slot already booked"
                    })));
                }
            }
            error!(error = %e, "Failed to create booking");
            return Err(ErrorInternalServerError("Internal Server Error"));
        }
    };

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit booking");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Booking created",
        "id": inserted
    })))
}

/* =========================
Update booking (re-validated, self excluded)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{booking_id}",
    params(("booking_id", Path, description = "Booking ID")),
    request_body = UpdateBooking,
    responses(
        (status = 200, description = "Booking updated"),
        (status = 400, description = "Validation failed or slot already booked"),
        (status = 404, description = "Booking not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Booking"
)]
pub async fn update_booking(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateBooking>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Bookings)?;

    let booking_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let existing = sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, room_id, employee_id, employee_name, department_name,
               title, date, start_time, end_time
        FROM bookings
        WHERE id = ?
        FOR UPDATE
        "#,
    )
    .bind(booking_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, booking_id, "Failed to fetch booking");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(existing) = existing else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Booking not found"
        })));
    };

    if !can_touch_booking(&auth, existing.employee_id) {
        return Err(actix_web::error::ErrorForbidden(
            "Only the booking owner or a manager can change it",
        ));
    }

    let start = match payload.start_time.as_deref() {
        Some(raw) => match parse_start(raw) {
            Some(t) => t,
            None => {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "message": "Validation failed",
                    "errors": { "start_time": "expected HH:MM" }
                })));
            }
        },
        None => existing.start_time,
    };

    if !is_valid_slot_start(start) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": { "start_time": "start must be a 30-minute slot between 08:00 and 17:30" }
        })));
    }

    let room_id = payload.room_id.unwrap_or(existing.room_id);
    let date = payload.date.unwrap_or(existing.date);
    let title = payload
        .title
        .clone()
        .unwrap_or_else(|| existing.title.clone());

    // the new slot must be re-checked, never assumed; own interval excluded
    let booked = locked_intervals(&mut tx, room_id, date).await.map_err(|e| {
        error!(error = %e, "Failed to lock bookings");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if !slot_is_free(start, &booked, Some(booking_id)) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Slot already booked"
        })));
    }

    let result = sqlx::query(
        r#"
        UPDATE bookings
        SET room_id = ?, title = ?, date = ?, start_time = ?, end_time = ?
        WHERE id = ?
        "#,
    )
    .bind(room_id)
    .bind(title.trim())
    .bind(date)
    .bind(start)
    .bind(slot_end(start))
    .bind(booking_id)
    .execute(&mut *tx)
    .await;

    if let Err(e) = result {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23000") {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "message": "Slot already booked"
                })));
            }
        }
        error!(error = %e, booking_id, "Failed to update booking");
        return Err(ErrorInternalServerError("Internal Server Error"));
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit booking update");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Booking updated"
    })))
}

/* =========================
Delete booking
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{booking_id}",
    params(("booking_id", Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted"),
        (status = 404, description = "Booking not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Booking"
)]
pub async fn delete_booking(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Bookings)?;

    let booking_id = path.into_inner();

    let owner = sqlx::query_scalar::<_, u64>("SELECT employee_id FROM bookings WHERE id = ?")
        .bind(booking_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, booking_id, "Failed to fetch booking");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(owner) = owner else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Booking not found"
        })));
    };

    if !can_touch_booking(&auth, owner) {
        return Err(actix_web::error::ErrorForbidden(
            "Only the booking owner or a manager can delete it",
        ));
    }

    sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(booking_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, booking_id, "Failed to delete booking");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Booking deleted"
    })))
}
