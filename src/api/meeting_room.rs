use crate::auth::auth::AuthUser;
use crate::model::meeting_room::{MeetingRoom, join_amenities};
use crate::model::permission::Page;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateRoom {
    #[schema(example = "Blue Room")]
    pub name: String,
    #[schema(example = 8)]
    pub capacity: u32,
    #[schema(example = json!(["whiteboard", "tv"]))]
    pub amenities: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateRoom {
    pub name: Option<String>,
    pub capacity: Option<u32>,
    pub amenities: Option<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
pub struct RoomResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Blue Room")]
    pub name: String,
    #[schema(example = 8)]
    pub capacity: u32,
    #[schema(example = json!(["whiteboard", "tv"]))]
    pub amenities: Vec<String>,
}

impl From<MeetingRoom> for RoomResponse {
    fn from(room: MeetingRoom) -> Self {
        let amenities = room.amenity_list();
        Self {
            id: room.id,
            name: room.name,
            capacity: room.capacity,
            amenities,
        }
    }
}

/// Create Meeting Room
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    request_body = CreateRoom,
    responses(
        (status = 201, description = "Room created"),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Room",
    security(("bearer_auth" = []))
)]
pub async fn create_room(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRoom>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Rooms)?;

    if payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": { "name": "name must not be empty" }
        })));
    }

    let amenities = match join_amenities(&payload.amenities) {
        Ok(joined) => joined,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Validation failed",
                "errors": { "amenities": msg }
            })));
        }
    };

    let result = sqlx::query("INSERT INTO meeting_rooms (name, capacity, amenities) VALUES (?, ?, ?)")
        .bind(payload.name.trim())
        .bind(payload.capacity)
        .bind(amenities)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create room");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Room created",
        "id": result.last_insert_id()
    })))
}

/// List Meeting Rooms
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    responses(
        (status = 200, description = "All rooms", body = [RoomResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Room",
    security(("bearer_auth" = []))
)]
pub async fn list_rooms(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::Rooms)?;

    let rooms = sqlx::query_as::<_, MeetingRoom>(
        "SELECT id, name, capacity, amenities FROM meeting_rooms ORDER BY name ASC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch rooms");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let response: Vec<RoomResponse> = rooms.into_iter().map(RoomResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Update Meeting Room
#[utoipa::path(
    put,
    path = "/api/v1/rooms/{room_id}",
    params(("room_id", Path, description = "Room ID")),
    request_body = UpdateRoom,
    responses(
        (status = 200, description = "Room updated"),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Room not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Room",
    security(("bearer_auth" = []))
)]
pub async fn update_room(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateRoom>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Rooms)?;

    let room_id = path.into_inner();

    let amenities = match payload.amenities.as_deref() {
        Some(list) => match join_amenities(list) {
            Ok(joined) => Some(joined),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "message": "Validation failed",
                    "errors": { "amenities": msg }
                })));
            }
        },
        None => None,
    };

    let result = sqlx::query(
        r#"
        UPDATE meeting_rooms
        SET name = COALESCE(?, name),
            capacity = COALESCE(?, capacity),
            amenities = COALESCE(?, amenities)
        WHERE id = ?
        "#,
    )
    .bind(payload.name.as_deref().map(str::trim))
    .bind(payload.capacity)
    .bind(amenities)
    .bind(room_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, room_id, "Failed to update room");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Room not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Room updated"
    })))
}

/// Delete Meeting Room
#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{room_id}",
    params(("room_id", Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room deleted"),
        (status = 404, description = "Room not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Room",
    security(("bearer_auth" = []))
)]
pub async fn delete_room(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Rooms)?;

    let room_id = path.into_inner();

    let result = sqlx::query("DELETE FROM meeting_rooms WHERE id = ?")
        .bind(room_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, room_id, "Failed to delete room");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Room not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Room deleted"
    })))
}
