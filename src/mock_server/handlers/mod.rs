//! HTTP request handlers for the mock server.

pub mod domains;
pub mod hosts;
pub mod puppet_classes;
pub mod tasks;

pub use domains::*;
pub use hosts::*;
pub use puppet_classes::*;
pub use tasks::*;

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

pub(crate) type SharedState = Arc<RwLock<MockState>>;

/// Query parameters accepted by every index endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub order: Option<String>,
}

/// Error body in the shape Foreman uses.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": { "message": message } }))).into_response()
}

pub(crate) fn not_found(entity: &str, id: i64) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        &format!("Resource {entity} not found by id '{id}'"),
    )
}

/// Slice `records` into a page and wrap it in the index envelope.
pub(crate) fn index_page(total: usize, records: Vec<Value>, query: &IndexQuery) -> Value {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).max(1);
    let subtotal = records.len();

    let start = ((page - 1) * per_page) as usize;
    let results: Vec<Value> = records
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    json!({
        "total": total,
        "subtotal": subtotal,
        "page": page,
        "per_page": per_page,
        "search": query.search,
        "sort": { "by": null, "order": query.order },
        "results": results
    })
}

/// Reads an id that may arrive as a number or numeric string.
pub(crate) fn id_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Turns `[1, "2"]` into `[{"id": 1}, {"id": 2}]`.
pub(crate) fn id_objects(value: Option<&Value>) -> Vec<Value> {
    value
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id_value(Some(id)))
                .map(|id| json!({ "id": id }))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_page_slices_results() {
        let records: Vec<Value> = (1..=5).map(|i| json!({ "id": i })).collect();
        let query = IndexQuery {
            page: Some(2),
            per_page: Some(2),
            ..Default::default()
        };

        let page = index_page(7, records, &query);
        assert_eq!(page["total"], json!(7));
        assert_eq!(page["subtotal"], json!(5));
        assert_eq!(page["results"], json!([{ "id": 3 }, { "id": 4 }]));
    }

    #[test]
    fn test_id_helpers() {
        assert_eq!(id_value(Some(&json!("12"))), Some(12));
        assert_eq!(id_value(Some(&json!(null))), None);
        assert_eq!(
            id_objects(Some(&json!([1, "2", null]))),
            vec![json!({ "id": 1 }), json!({ "id": 2 })]
        );
    }
}
