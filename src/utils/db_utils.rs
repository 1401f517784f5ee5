use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
/// Only columns on the allowlist may be updated; anything else comes back
/// as a field-level error map and nothing is written. Ids and other
/// server-owned columns stay out of the allowlist.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    allowed_columns: &[&str],
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, HashMap<String, String>> {
    let obj = match payload.as_object() {
        Some(obj) => obj,
        None => {
            return Err(HashMap::from([(
                "_payload".to_string(),
                "payload must be a JSON object".to_string(),
            )]));
        }
    };

    let mut errors = HashMap::new();

    if obj.is_empty() {
        errors.insert(
            "_payload".to_string(),
            "no fields provided for update".to_string(),
        );
        return Err(errors);
    }

    let mut columns = Vec::with_capacity(obj.len());
    let mut values = Vec::with_capacity(obj.len() + 1);

    for (key, value) in obj {
        if !allowed_columns.contains(&key.as_str()) {
            errors.insert(key.clone(), "unknown or read-only field".to_string());
            continue;
        }

        let sql_value = match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    SqlValue::Date(d)
                } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    SqlValue::DateTime(dt)
                } else {
                    SqlValue::String(s.clone())
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::I64(i)
                } else if let Some(f) = n.as_f64() {
                    SqlValue::F64(f)
                } else {
                    errors.insert(key.clone(), "unsupported numeric value".to_string());
                    continue;
                }
            }
            Value::Bool(b) => SqlValue::Bool(*b),
            Value::Null => SqlValue::Null,
            _ => {
                errors.insert(key.clone(), "unsupported value type".to_string());
                continue;
            }
        };

        columns.push(key.as_str());
        values.push(sql_value);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let set_clause = columns
        .iter()
        .map(|c| format!("{c} = ?"))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {table} SET {set_clause} WHERE {id_column} = ?");

    // WHERE id = ?
    values.push(SqlValue::I64(id_value as i64));

    Ok(SqlUpdate { sql, values })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: &[&str] = &["name", "status", "leave_balance"];

    #[test]
    fn builds_allowlisted_update() {
        let payload = json!({"name": "Jane", "leave_balance": 10.5});
        let update = build_update_sql("employees", &payload, COLUMNS, "id", 7).unwrap();
        assert!(update.sql.starts_with("UPDATE employees SET "));
        assert!(update.sql.ends_with("WHERE id = ?"));
        assert!(update.sql.contains("name = ?"));
        assert!(update.sql.contains("leave_balance = ?"));
        // two SET values plus the id bind
        assert_eq!(update.values.len(), 3);
    }

    #[test]
    fn unknown_column_yields_field_error() {
        let payload = json!({"name": "Jane", "id": 99});
        let errors = build_update_sql("employees", &payload, COLUMNS, "id", 7).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("id"));
    }

    #[test]
    fn empty_payload_rejected() {
        let errors = build_update_sql("employees", &json!({}), COLUMNS, "id", 7).unwrap_err();
        assert!(errors.contains_key("_payload"));
    }

    #[test]
    fn date_strings_become_dates() {
        let payload = json!({"status": "2026-01-01"});
        let update = build_update_sql("employees", &payload, COLUMNS, "id", 7).unwrap();
        assert!(matches!(update.values[0], SqlValue::Date(_)));
    }
}
