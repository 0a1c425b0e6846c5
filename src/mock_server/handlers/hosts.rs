//! Host endpoint handlers, including power and boot commands.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use super::{error_response, id_value, index_page, not_found, IndexQuery, SharedState};
use crate::mock_server::state::RecordKind;

const ID_FIELDS: [&str; 6] = [
    "hostgroup_id",
    "domain_id",
    "operatingsystem_id",
    "environment_id",
    "location_id",
    "organization_id",
];

fn host_fields(body: &Value) -> Map<String, Value> {
    let mut fields = Map::new();
    let Some(host) = body.get("host").and_then(Value::as_object) else {
        return fields;
    };

    for key in ["name", "comment", "build", "mac", "ip"] {
        if let Some(value) = host.get(key) {
            fields.insert(key.to_string(), value.clone());
        }
    }
    for key in ID_FIELDS {
        // Top-level taxonomy ids fill in for missing record values
        let value = id_value(host.get(key)).or_else(|| id_value(body.get(key)));
        if host.contains_key(key) || value.is_some() {
            fields.insert(key.to_string(), json!(value));
        }
    }
    if let Some(params) = host.get("host_parameters_attributes") {
        fields.insert("parameters".into(), params.clone());
    }
    fields
}

fn injected_failure() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "ERF42-4995 [Foreman::WrappedException]: Timed out talking to the compute resource",
    )
}

/// GET /api/hosts
pub async fn list_hosts(
    State(state): State<SharedState>,
    Query(query): Query<IndexQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    let matches = state.search(RecordKind::Host, query.search.as_deref());
    Json(index_page(state.hosts.len(), matches, &query))
}

/// GET /api/hosts/{id}
pub async fn get_host(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let state = state.read().await;
    match state.get_record(RecordKind::Host, id) {
        Some(host) => Json(host.clone()).into_response(),
        None => not_found("Host", id),
    }
}

/// POST /api/hosts
pub async fn create_host(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let fields = host_fields(&body);
    let mut state = state.write().await;
    if state.take_host_write_failure() {
        return injected_failure();
    }
    if fields.get("name").and_then(Value::as_str).unwrap_or_default().is_empty() {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, "Name can't be blank");
    }

    let mut record = json!({ "build": false, "puppetclasses": [], "parameters": [] });
    if let Value::Object(ref mut map) = record {
        map.extend(fields);
    }
    let created = state.insert_record(RecordKind::Host, record);
    if let Some(id) = created.get("id").and_then(Value::as_i64) {
        state.power.insert(id, "off".to_string());
    }
    (StatusCode::CREATED, Json(created)).into_response()
}

/// PUT /api/hosts/{id}
pub async fn update_host(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let fields = host_fields(&body);
    let mut state = state.write().await;
    if state.take_host_write_failure() {
        return injected_failure();
    }
    match state.update_record(RecordKind::Host, id, fields) {
        Some(host) => Json(host).into_response(),
        None => not_found("Host", id),
    }
}

/// DELETE /api/hosts/{id}
pub async fn delete_host(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let mut state = state.write().await;
    state.power.remove(&id);
    match state.delete_record(RecordKind::Host, id) {
        Some(host) => Json(host).into_response(),
        None => not_found("Host", id),
    }
}

/// PUT /api/hosts/{id}/power
pub async fn power_host(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if state.take_host_write_failure() {
        return injected_failure();
    }
    if state.get_record(RecordKind::Host, id).is_none() {
        return not_found("Host", id);
    }

    let action = body
        .get("power_action")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let current = state.power.get(&id).cloned().unwrap_or_else(|| "off".into());

    let power = match action {
        "on" | "start" => {
            state.power.insert(id, "on".into());
            json!(true)
        }
        "off" | "stop" | "soft" => {
            state.power.insert(id, "off".into());
            json!(true)
        }
        "cycle" | "reset" => json!(true),
        "state" | "status" => json!(current),
        other => {
            return error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                &format!("Unknown power action: {other}"),
            )
        }
    };
    Json(json!({ "power": power })).into_response()
}

/// GET /api/hosts/{id}/power
pub async fn host_power_state(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let state = state.read().await;
    if state.get_record(RecordKind::Host, id).is_none() {
        return not_found("Host", id);
    }
    let current = state.power.get(&id).cloned().unwrap_or_else(|| "off".into());
    let title = if current == "on" { "On" } else { "Off" };
    Json(json!({
        "id": id,
        "state": current,
        "title": title,
        "statusText": format!("Powered {}", current)
    }))
    .into_response()
}

/// PUT /api/hosts/{id}/boot
pub async fn boot_host(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if state.take_host_write_failure() {
        return injected_failure();
    }
    if state.get_record(RecordKind::Host, id).is_none() {
        return not_found("Host", id);
    }
    match body.get("device").and_then(Value::as_str) {
        Some("disk" | "cdrom" | "pxe" | "bios") => Json(json!({ "boot": true })).into_response(),
        _ => error_response(StatusCode::UNPROCESSABLE_ENTITY, "Unknown boot device"),
    }
}
