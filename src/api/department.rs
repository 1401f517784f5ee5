use crate::{
    auth::auth::AuthUser,
    model::{department::Department, permission::Page},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateDepartment {
    #[schema(example = "Engineering")]
    pub name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RenameDepartment {
    #[schema(example = "Platform Engineering")]
    pub name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AssignLead {
    #[schema(example = 7)]
    pub employee_id: u64,
}

/// Create Department
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created"),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn create_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateDepartment>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Departments)?;

    if payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": { "name": "name must not be empty" }
        })));
    }

    let result = sqlx::query("INSERT INTO departments (name) VALUES (?)")
        .bind(payload.name.trim())
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create department");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Department created",
        "id": result.last_insert_id()
    })))
}

/// List Departments
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "All departments", body = [Department]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn list_departments(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::Departments)?;

    let departments = sqlx::query_as::<_, Department>(
        "SELECT id, name, lead_id FROM departments ORDER BY name ASC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch departments");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(departments))
}

/// Rename Department
#[utoipa::path(
    put,
    path = "/api/v1/departments/{department_id}",
    params(("department_id", Path, description = "Department ID")),
    request_body = RenameDepartment,
    responses(
        (status = 200, description = "Department updated"),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Department not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn update_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<RenameDepartment>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Departments)?;

    let department_id = path.into_inner();

    if payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": { "name": "name must not be empty" }
        })));
    }

    let result = sqlx::query("UPDATE departments SET name = ? WHERE id = ?")
        .bind(payload.name.trim())
        .bind(department_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, department_id, "Failed to update department");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department updated"
    })))
}

/// Assign a department lead. Sets `lead_id` and promotes the lead from
/// plain employee to manager in the same transaction.
#[utoipa::path(
    put,
    path = "/api/v1/departments/{department_id}/lead",
    params(("department_id", Path, description = "Department ID")),
    request_body = AssignLead,
    responses(
        (status = 200, description = "Lead assigned"),
        (status = 404, description = "Department or employee not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn assign_lead(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<AssignLead>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Departments)?;

    let department_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let employee_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM employees WHERE id = ?",
    )
    .bind(payload.employee_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to check employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if employee_exists == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    let updated = sqlx::query("UPDATE departments SET lead_id = ? WHERE id = ?")
        .bind(payload.employee_id)
        .bind(department_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, department_id, "Failed to set department lead");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if updated.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })));
    }

    // promote plain employees only; dev/owner/rh/manager keep their role
    sqlx::query("UPDATE employees SET role = 'manager' WHERE id = ? AND role = 'employee'")
        .bind(payload.employee_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to promote department lead");
            ErrorInternalServerError("Internal Server Error")
        })?;

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit lead assignment");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Lead assigned"
    })))
}

/// Delete Department. Members are detached (department cleared), never
/// deleted; both effects land in one transaction.
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{department_id}",
    params(("department_id", Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted, members detached"),
        (status = 404, description = "Department not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Department",
    security(("bearer_auth" = []))
)]
pub async fn delete_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Departments)?;

    let department_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    sqlx::query("UPDATE employees SET department_id = NULL WHERE department_id = ?")
        .bind(department_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, department_id, "Failed to detach department members");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let deleted = sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(department_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, department_id, "Failed to delete department");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if deleted.rows_affected() == 0 {
        // nothing deleted: roll back the detach too
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })));
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit department deletion");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department deleted"
    })))
}
