//! Domain endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use super::{error_response, id_objects, id_value, index_page, not_found, IndexQuery, SharedState};
use crate::mock_server::state::RecordKind;

/// Convert a `{"domain": {...}}` request envelope into response-shaped fields.
///
/// Top-level `organization_id` / `location_id` are folded into the
/// taxonomy lists, as the real server does for scoped resources.
fn domain_fields(body: &Value) -> Map<String, Value> {
    let mut fields = Map::new();
    let Some(domain) = body.get("domain").and_then(Value::as_object) else {
        return fields;
    };

    for key in ["name", "fullname"] {
        if let Some(value) = domain.get(key) {
            fields.insert(key.to_string(), value.clone());
        }
    }
    if domain.contains_key("dns_id") {
        fields.insert("dns_id".into(), json!(id_value(domain.get("dns_id"))));
    }

    for (list_key, scalar_key, out_key) in [
        ("location_ids", "location_id", "locations"),
        ("organization_ids", "organization_id", "organizations"),
    ] {
        let mut ids = id_objects(domain.get(list_key));
        if let Some(id) = id_value(body.get(scalar_key)) {
            if !ids.contains(&json!({ "id": id })) {
                ids.push(json!({ "id": id }));
            }
        }
        if domain.contains_key(list_key) || !ids.is_empty() {
            fields.insert(out_key.into(), Value::Array(ids));
        }
    }

    if let Some(params) = domain
        .get("domain_parameters_attributes")
        .and_then(Value::as_array)
    {
        fields.insert("parameters".into(), Value::Array(params.clone()));
    }

    fields
}

fn name_taken(state: &crate::mock_server::MockState, name: &str, except: Option<i64>) -> bool {
    state.domains.iter().any(|(id, record)| {
        Some(*id) != except && record.get("name").and_then(Value::as_str) == Some(name)
    })
}

fn name_taken_response() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "error": {
                "id": null,
                "errors": { "name": ["has already been taken"] },
                "full_messages": ["Name has already been taken"]
            }
        })),
    )
        .into_response()
}

/// GET /api/domains
pub async fn list_domains(
    State(state): State<SharedState>,
    Query(query): Query<IndexQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    let matches = state.search(RecordKind::Domain, query.search.as_deref());
    Json(index_page(state.domains.len(), matches, &query))
}

/// GET /api/domains/{id}
pub async fn get_domain(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let state = state.read().await;
    match state.get_record(RecordKind::Domain, id) {
        Some(domain) => Json(domain.clone()).into_response(),
        None => not_found("Domain", id),
    }
}

/// POST /api/domains
pub async fn create_domain(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Response {
    let fields = domain_fields(&body);
    let name = fields.get("name").and_then(Value::as_str).unwrap_or_default();
    if name.is_empty() {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, "Name can't be blank");
    }

    let mut state = state.write().await;
    if name_taken(&state, name, None) {
        return name_taken_response();
    }

    let mut record = json!({
        "fullname": null,
        "dns_id": null,
        "locations": [],
        "organizations": [],
        "parameters": []
    });
    if let Value::Object(ref mut map) = record {
        map.extend(fields);
    }

    let created = state.insert_record(RecordKind::Domain, record);
    (StatusCode::CREATED, Json(created)).into_response()
}

/// PUT /api/domains/{id}
pub async fn update_domain(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let fields = domain_fields(&body);
    let mut state = state.write().await;

    if let Some(name) = fields.get("name").and_then(Value::as_str) {
        if name_taken(&state, name, Some(id)) {
            return name_taken_response();
        }
    }

    match state.update_record(RecordKind::Domain, id, fields) {
        Some(domain) => Json(domain).into_response(),
        None => not_found("Domain", id),
    }
}

/// DELETE /api/domains/{id}
pub async fn delete_domain(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let mut state = state.write().await;
    match state.delete_record(RecordKind::Domain, id) {
        Some(domain) => Json(domain).into_response(),
        None => not_found("Domain", id),
    }
}
