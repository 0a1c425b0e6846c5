//! Puppet class endpoint handlers.
//!
//! The index endpoint groups results by module name.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use super::{index_page, not_found, IndexQuery, SharedState};

fn class_name(class: &Value) -> &str {
    class.get("name").and_then(Value::as_str).unwrap_or_default()
}

/// GET /api/puppetclasses
pub async fn list_puppet_classes(
    State(state): State<SharedState>,
    Query(query): Query<IndexQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    let fragment = query
        .search
        .as_deref()
        .map(|s| s.trim().trim_start_matches("name").trim_start_matches([' ', '=', '~']))
        .map(|s| s.trim_matches('"').to_string());

    let matches: Vec<Value> = state
        .puppet_classes
        .iter()
        .filter(|class| match fragment {
            Some(ref f) => class_name(class).contains(f.as_str()),
            None => true,
        })
        .cloned()
        .collect();

    let mut page = index_page(state.puppet_classes.len(), matches, &query);

    let mut grouped: Map<String, Value> = Map::new();
    if let Some(results) = page.get("results").and_then(Value::as_array) {
        for class in results {
            let module = class
                .get("module_name")
                .and_then(Value::as_str)
                .unwrap_or(class_name(class))
                .to_string();
            if let Value::Array(list) = grouped.entry(module).or_insert(Value::Array(Vec::new())) {
                list.push(class.clone());
            }
        }
    }
    page["results"] = Value::Object(grouped);
    Json(page)
}

/// GET /api/puppetclasses/{id}
pub async fn get_puppet_class(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let state = state.read().await;
    state
        .puppet_classes
        .iter()
        .find(|class| class.get("id").and_then(Value::as_i64) == Some(id))
        .map(|class| Json(class.clone()).into_response())
        .unwrap_or_else(|| not_found("Puppetclass", id))
}
