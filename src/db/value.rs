//! Dynamic row decoding: PostgreSQL rows into flat JSON objects.
//!
//! The proxy has no schema knowledge, so each column is decoded by its
//! reported type name into one of the envelope's scalar shapes: string,
//! number, boolean, null, or timestamp-as-string.

use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Convert one row into a column-name → scalar map, in column order.
pub fn row_to_json(row: &PgRow) -> Value {
    let mut map = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = extract_value(row, index, column.type_info().name());
        map.insert(column.name().to_string(), value);
    }
    Value::Object(map)
}

/// Decode the value at `index` according to its PostgreSQL type name.
fn extract_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    let upper_type = type_name.to_uppercase();

    match upper_type.as_str() {
        "INT2" | "SMALLINT" => {
            if let Ok(v) = row.try_get::<Option<i16>, _>(index) {
                return v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null);
            }
        }
        "INT4" | "INTEGER" | "SERIAL" | "OID" => {
            if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
                return v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null);
            }
        }
        "INT8" | "BIGINT" | "BIGSERIAL" => {
            if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
                return v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null);
            }
        }
        "FLOAT4" | "REAL" => {
            if let Ok(v) = row.try_get::<Option<f32>, _>(index) {
                return v.map(|n| float_value(n as f64)).unwrap_or(Value::Null);
            }
        }
        "FLOAT8" | "DOUBLE PRECISION" => {
            if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
                return v.map(float_value).unwrap_or(Value::Null);
            }
        }
        // Reporting views aggregate into NUMERIC; decode through f64 and
        // fall back to text for precision beyond it
        "NUMERIC" | "DECIMAL" => {
            if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
                return v.map(float_value).unwrap_or(Value::Null);
            }
            if let Ok(v) = row.try_get::<Option<String>, _>(index) {
                return v.map(Value::String).unwrap_or(Value::Null);
            }
        }
        "BOOL" | "BOOLEAN" => {
            if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
                return v.map(Value::Bool).unwrap_or(Value::Null);
            }
        }
        "JSON" | "JSONB" => {
            if let Ok(v) = row.try_get::<Option<Value>, _>(index) {
                return v.unwrap_or(Value::Null);
            }
        }
        "UUID" => {
            if let Ok(v) = row.try_get::<Option<uuid::Uuid>, _>(index) {
                return v
                    .map(|u| Value::String(u.to_string()))
                    .unwrap_or(Value::Null);
            }
        }
        "TIMESTAMP" | "TIMESTAMP WITHOUT TIME ZONE" => {
            if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
                return v
                    .map(|dt| Value::String(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()))
                    .unwrap_or(Value::Null);
            }
        }
        "TIMESTAMPTZ" | "TIMESTAMP WITH TIME ZONE" => {
            if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index) {
                return v
                    .map(|dt| Value::String(dt.to_rfc3339()))
                    .unwrap_or(Value::Null);
            }
        }
        "DATE" => {
            if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(index) {
                return v
                    .map(|d| Value::String(d.to_string()))
                    .unwrap_or(Value::Null);
            }
        }
        "TIME" | "TIME WITHOUT TIME ZONE" => {
            if let Ok(v) = row.try_get::<Option<chrono::NaiveTime>, _>(index) {
                return v
                    .map(|t| Value::String(t.format("%H:%M:%S%.f").to_string()))
                    .unwrap_or(Value::Null);
            }
        }
        "BYTEA" => {
            if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
                return v
                    .map(|bytes| Value::String(format!("\\x{}", hex::encode(bytes))))
                    .unwrap_or(Value::Null);
            }
        }
        _ => {}
    }

    // Fallback: most remaining types (TEXT, VARCHAR, CHAR, NAME, intervals,
    // ranges, ...) decode as text
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }

    // Last resort: raw wire text, or null for types with no text form
    if let Ok(value_ref) = row.try_get_raw(index) {
        if value_ref.is_null() {
            return Value::Null;
        }
        if let Ok(s) = value_ref.as_str() {
            return Value::String(s.to_string());
        }
    }

    Value::Null
}

/// JSON has no NaN/infinity; render those as strings rather than dropping them.
fn float_value(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(n.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_value_keeps_finite_numbers() {
        assert_eq!(float_value(2.5), serde_json::json!(2.5));
    }

    #[test]
    fn float_value_stringifies_non_finite() {
        assert_eq!(float_value(f64::NAN), Value::String("NaN".to_string()));
        assert_eq!(float_value(f64::INFINITY), Value::String("inf".to_string()));
    }
}
