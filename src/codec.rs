//! Value conversions shared by resource encoders.
//!
//! The API returns foreign-key ids as JSON numbers but expects them back as
//! quoted strings, with `null` standing for "unset". Related entities come
//! back as nested objects and go out as id lists. Parameters travel as
//! `[{"name": .., "value": ..}]`.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

use crate::models::ForemanObject;

/// Encode an id for a request body.
///
/// `id <= 0` becomes `null`; positive ids become decimal strings.
pub fn int_id_to_json(id: i64) -> Value {
    if id <= 0 {
        Value::Null
    } else {
        Value::String(id.to_string())
    }
}

/// Serde adapter applying [`int_id_to_json`] to an `i64` field.
///
/// ```ignore
/// #[serde(serialize_with = "codec::serialize_id")]
/// domain_id: i64,
/// ```
pub fn serialize_id<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    int_id_to_json(*id).serialize(serializer)
}

/// Serde adapter for `Option<i64>` ids; `None` encodes as `null`.
pub fn serialize_optional_id<S: Serializer>(
    id: &Option<i64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    int_id_to_json(id.unwrap_or(0)).serialize(serializer)
}

/// Decode an id that may arrive as a number, a numeric string or `null`.
///
/// `null` and missing values decode as `0`, the "unset" id.
pub fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    id_from_value(value.as_ref()).map_err(de::Error::custom)
}

fn id_from_value(value: Option<&Value>) -> Result<i64, String> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| format!("id {n} is not an integer")),
        Some(Value::String(s)) if s.is_empty() => Ok(0),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| format!("id '{s}' is not an integer")),
        Some(other) => Err(format!("expected id, found {other}")),
    }
}

/// Keep only the `id` of each related object, in order.
pub fn object_array_to_ids(objects: &[ForemanObject]) -> Vec<i64> {
    objects.iter().map(|o| o.id).collect()
}

/// Serde adapter reading an id list from nested objects or plain ids.
///
/// Accepts `[{"id": 1, "name": ..}, ..]`, `[1, 2]` and `null`.
pub fn deserialize_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    values
        .iter()
        .map(|value| match value {
            Value::Object(map) => id_from_value(map.get("id")),
            other => id_from_value(Some(other)),
        })
        .collect::<Result<_, _>>()
        .map_err(de::Error::custom)
}

/// Serde adapter writing an id list as nested `{"id": ..}` objects, the
/// response shape [`deserialize_ids`] reads.
pub fn serialize_id_objects<S: Serializer>(ids: &[i64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(ids.iter().map(|id| json!({ "id": id })))
}

/// Encode a parameter map as the API's name/value list.
pub fn parameters_to_json(parameters: &BTreeMap<String, String>) -> Vec<Value> {
    parameters
        .iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect()
}

/// Serde adapter for [`parameters_to_json`].
pub fn serialize_parameters<S: Serializer>(
    parameters: &BTreeMap<String, String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    parameters_to_json(parameters).serialize(serializer)
}

/// Serde adapter reading a name/value list back into a map.
///
/// Non-string values are kept in their JSON text form.
pub fn deserialize_parameters<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    #[derive(Deserialize)]
    struct Parameter {
        name: String,
        #[serde(default)]
        value: Value,
    }

    let list = Option::<Vec<Parameter>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(list
        .into_iter()
        .map(|p| {
            let value = match p.value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (p.name, value)
        })
        .collect())
}
