use std::collections::HashMap;

use crate::{
    auth::auth::AuthUser,
    model::{employee::Employee, permission::Page, role::Role},
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane.doe@company.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "employee")]
    pub role: String,
    #[schema(example = 1, nullable = true)]
    pub department_id: Option<u64>,
    #[schema(example = "active")]
    pub status: Option<String>,
    #[schema(example = 0.0)]
    pub leave_balance: Option<f64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "1991-06-15", format = "date", value_type = String, nullable = true)]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub department_id: Option<u64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/// Updatable via the partial-update endpoint. Ids and balances changed by
/// workflows (leave approval, accrual) stay server-owned.
const UPDATABLE_COLUMNS: &[&str] = &[
    "name",
    "email",
    "role",
    "department_id",
    "status",
    "leave_balance",
    "start_date",
    "birth_date",
];

fn validate_create(payload: &CreateEmployee) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    if payload.name.trim().is_empty() {
        errors.insert("name".to_string(), "name must not be empty".to_string());
    }
    if !payload.email.contains('@') {
        errors.insert("email".to_string(), "email is not valid".to_string());
    }
    if payload.role.parse::<Role>().is_err() {
        errors.insert(
            "role".to_string(),
            "role must be one of: dev, owner, rh, manager, employee".to_string(),
        );
    }
    if let Some(status) = payload.status.as_deref() {
        if !matches!(status, "active" | "inactive") {
            errors.insert(
                "status".to_string(),
                "status must be active or inactive".to_string(),
            );
        }
    }
    if let Some(balance) = payload.leave_balance {
        if balance < 0.0 {
            errors.insert(
                "leave_balance".to_string(),
                "leave balance cannot be negative".to_string(),
            );
        }
    }

    errors
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "message": "Employee created",
            "id": 1
        })),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Email already in use")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Employees)?;

    let errors = validate_create(&payload);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Validation failed",
            "errors": errors
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (name, email, role, department_id, status, leave_balance, start_date, birth_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.name.trim())
    .bind(payload.email.trim().to_lowercase())
    .bind(&payload.role)
    .bind(payload.department_id)
    .bind(payload.status.as_deref().unwrap_or("active"))
    .bind(payload.leave_balance.unwrap_or(0.0))
    .bind(payload.start_date)
    .bind(payload.birth_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(done) => Ok(HttpResponse::Created().json(json!({
            "message": "Employee created",
            "id": done.last_insert_id()
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Email already in use"
                    })));
                }
            }
            error!(error = %e, "Failed to create employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Paginated, filterable employee directory
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::Employees)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let like = query.search.as_deref().map(|search| format!("%{search}%"));

    let mut conditions = Vec::new();
    let mut bindings: Vec<FilterValue> = Vec::new();

    if let Some(department_id) = query.department_id {
        conditions.push("department_id = ?");
        bindings.push(FilterValue::U64(department_id));
    }

    if let Some(status) = query.status.as_deref() {
        conditions.push("status = ?");
        bindings.push(FilterValue::Str(status));
    }

    if let Some(like) = like.as_deref() {
        conditions.push("(name LIKE ? OR email LIKE ?)");
        bindings.push(FilterValue::Str(like));
        bindings.push(FilterValue::Str(like));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) FROM employees {where_clause}");
    debug!(sql = %count_sql, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::U64(v) => count_query.bind(*v),
            FilterValue::Str(s) => count_query.bind(*s),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql =
        format!("SELECT * FROM employees {where_clause} ORDER BY name ASC LIMIT ? OFFSET ?");
    debug!(sql = %data_sql, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in &bindings {
        data_query = match b {
            FilterValue::U64(v) => data_query.bind(*v),
            FilterValue::Str(s) => data_query.bind(*s),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_view(Page::Employees)?;

    let employee_id = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, name, email, role, department_id, status, leave_balance, start_date, birth_date
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}

/// Partial update over the allowlisted employee columns
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Employee updated", body = Object, example = json!({
            "message": "Employee updated"
        })),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Employees)?;

    let employee_id = path.into_inner();

    let update = match build_update_sql("employees", &body, UPDATABLE_COLUMNS, "id", employee_id) {
        Ok(update) => update,
        Err(errors) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Validation failed",
                "errors": errors
            })));
        }
    };

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to update employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated"
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manage(Page::Employees)?;

    let employee_id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Employee not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, employee_id, "Failed to delete employee");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}
