use crate::auth::auth::AuthUser;
use actix_web::{HttpResponse, Responder};

/// Full page/permission map for the caller's role. The dashboard fetches
/// this once per role change and gates its navigation with it; the same
/// matrix is enforced server-side on every handler.
#[utoipa::path(
    get,
    path = "/api/v1/permissions",
    responses(
        (status = 200, description = "Page permissions for the caller's role", body = Object,
         example = json!({
            "role": "manager",
            "pages": {
                "dashboard": { "view": true, "manage": false },
                "settings": { "view": false, "manage": false }
            }
         })),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
pub async fn my_permissions(auth: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "role": auth.role.to_string(),
        "pages": auth.role.page_map()
    }))
}
