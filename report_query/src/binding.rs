//! Positional parameter binding
//!
//! Binds the `serde_json::Value` parameters produced by [`crate::QueryBuilder`]
//! onto sqlx Postgres queries in placeholder order.

use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryScalar;

/// Bind every parameter onto a scalar query
pub fn bind_query_scalar<'q, O>(
    mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    params: Vec<Value>,
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    debug_log!("[BINDING] binding {} scalar params", params.len());
    for param in params {
        query = match param {
            Value::String(s) => query.bind(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    query.bind(i)
                } else if let Some(f) = n.as_f64() {
                    query.bind(f)
                } else {
                    query.bind(n.to_string())
                }
            }
            Value::Bool(b) => query.bind(b),
            Value::Null => query.bind(Option::<String>::None),
            other => query.bind(sqlx::types::Json(other)),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::{Arguments, Execute};

    #[test]
    fn test_every_param_shape_becomes_one_argument() {
        let query = sqlx::query_scalar::<_, i64>("SELECT $1, $2, $3, $4, $5, $6");
        let params = vec![
            json!("x"),
            json!(7),
            json!(2.5),
            json!(false),
            Value::Null,
            json!(["a", "b"]),
        ];

        let mut bound = bind_query_scalar(query, params);
        let arguments = bound
            .take_arguments()
            .expect("every param should encode")
            .expect("arguments should be present");

        assert_eq!(arguments.len(), 6);
    }

    #[test]
    fn test_no_params_binds_nothing() {
        let mut bound = bind_query_scalar(sqlx::query_scalar::<_, i64>("SELECT 1"), Vec::new());
        let count = bound
            .take_arguments()
            .expect("no params to encode")
            .map(|arguments| arguments.len())
            .unwrap_or(0);

        assert_eq!(count, 0);
    }
}
