use std::collections::HashMap;

use crate::auth::auth::AuthUser;
use crate::model::permission::Page;
use crate::model::settings::{AppSettings, is_valid_hsl};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UpdateSettings {
    #[schema(example = "HR Dashboard")]
    pub project_name: Option<String>,
    #[schema(example = 1.5)]
    pub accrual_amount: Option<f64>,
    #[schema(example = "222 47% 11%")]
    pub theme_primary: Option<String>,
    #[schema(example = "0 0% 100%")]
    pub theme_background: Option<String>,
    #[schema(example = "262 83% 58%")]
    pub theme_accent: Option<String>,
}

fn validate_update(payload: &UpdateSettings) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    if let Some(name) = payload.project_name.as_deref() {
        if name.trim().is_empty() {
            errors.insert(
                "project_name".to_string(),
                "project name must not be empty".to_string(),
            );
        }
    }
    if let Some(amount) = payload.accrual_amount {
        if amount < 0.0 {
            errors.insert(
                "accrual_amount".to_string(),
                "accrual amount cannot be negative".to_string(),
            );
        }
    }
    for (field, value) in [
        ("theme_primary", &payload.theme_primary),
        ("theme_background", &payload.theme_background),
        ("theme_accent", &payload.theme_accent),
    ] {
        if let Some(color) = value.as_deref() {
            if !is_valid_hsl(color) {
                errors.insert(field.to_string(), "expected \"H S% L%\"".to_string());
            }
        }
    }

    errors
}

async fn load_settings(pool: &MySqlPool) -> Result<AppSettings, sqlx::Error> {
    let stored = sqlx::query_as::<_, AppSettings>(
        r#"
        SELECT project_name, accrual_amount, theme_primary, theme_background, theme_accent
        FROM app_settings
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    // defaults apply until the singleton row is first written
    Ok(stored.unwrap_or_default())
}

/// Current settings, defaults when the row is absent
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Current settings", body = AppSettings),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
pub async fn get_settings(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::Settings)?;

    let settings = load_settings(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch settings");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(settings))
}

/// Partial settings update; the singleton row is created on first write
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings updated", body = AppSettings),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
pub async fn update_settings(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpdateSettings>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Settings)?;

    let errors = validate_update(&payload);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": errors
        })));
    }

    let current = load_settings(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch settings");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let merged = AppSettings {
        project_name: payload
            .project_name
            .clone()
            .unwrap_or(current.project_name),
        accrual_amount: payload.accrual_amount.unwrap_or(current.accrual_amount),
        theme_primary: payload
            .theme_primary
            .clone()
            .unwrap_or(current.theme_primary),
        theme_background: payload
            .theme_background
            .clone()
            .unwrap_or(current.theme_background),
        theme_accent: payload.theme_accent.clone().unwrap_or(current.theme_accent),
    };

    sqlx::query(
        r#"
        INSERT INTO app_settings
            (id, project_name, accrual_amount, theme_primary, theme_background, theme_accent)
        VALUES (1, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            project_name = VALUES(project_name),
            accrual_amount = VALUES(accrual_amount),
            theme_primary = VALUES(theme_primary),
            theme_background = VALUES(theme_background),
            theme_accent = VALUES(theme_accent)
        "#,
    )
    .bind(&merged.project_name)
    .bind(merged.accrual_amount)
    .bind(&merged.theme_primary)
    .bind(&merged.theme_background)
    .bind(&merged.theme_accent)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to update settings");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(merged))
}

/// Credit every active employee's leave balance by the accrual amount
#[utoipa::path(
    post,
    path = "/api/v1/settings/accrual",
    responses(
        (status = 200, description = "Accrual applied", body = Object, example = json!({
            "message": "Accrual applied",
            "employees_credited": 42,
            "amount": 1.5
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
pub async fn run_accrual(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Settings)?;

    let settings = load_settings(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch settings");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let result = sqlx::query(
        "UPDATE employees SET leave_balance = leave_balance + ? WHERE status = 'active'",
    )
    .bind(settings.accrual_amount)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Accrual run failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Accrual applied",
        "employees_credited": result.rows_affected(),
        "amount": settings.accrual_amount
    })))
}
