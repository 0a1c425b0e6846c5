//! Outgoing payload envelopes.
//!
//! The API expects create/update bodies nested under a resource key, e.g.
//! `{"domain": {...}}`, optionally alongside top-level `organization_id` /
//! `location_id` scoping fields.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::codec::int_id_to_json;
use crate::config::TaxonomyDefaults;
use crate::error::Result;

const ORGANIZATION_ID: &str = "organization_id";
const LOCATION_ID: &str = "location_id";

/// Encode `record`, nested under `key` when one is given.
///
/// # Errors
///
/// Returns an error if the record fails to serialize.
pub fn wrap<T: Serialize + ?Sized>(key: Option<&str>, record: &T) -> Result<Vec<u8>> {
    let envelope = envelope_value(key, record)?;
    Ok(serde_json::to_vec(&envelope)?)
}

/// Like [`wrap`], injecting taxonomy defaults the record leaves unset.
///
/// A field counts as unset when it is absent from the encoded record or
/// encodes as `null`. Injected ids follow [`int_id_to_json`].
///
/// # Errors
///
/// Returns an error if the record fails to serialize.
pub fn wrap_with_taxonomy<T: Serialize + ?Sized>(
    key: Option<&str>,
    record: &T,
    defaults: &TaxonomyDefaults,
) -> Result<Vec<u8>> {
    let record_value = serde_json::to_value(record)?;

    let missing_org = is_unset(&record_value, ORGANIZATION_ID);
    let missing_loc = is_unset(&record_value, LOCATION_ID);

    let mut envelope = nest(key, record_value);

    if let Value::Object(top) = &mut envelope {
        if missing_org {
            inject(top, ORGANIZATION_ID, defaults.organization_id);
        }
        if missing_loc {
            inject(top, LOCATION_ID, defaults.location_id);
        }
    }

    Ok(serde_json::to_vec(&envelope)?)
}

fn envelope_value<T: Serialize + ?Sized>(key: Option<&str>, record: &T) -> Result<Value> {
    Ok(nest(key, serde_json::to_value(record)?))
}

fn nest(key: Option<&str>, record: Value) -> Value {
    match key {
        Some(key) => {
            let mut map = Map::new();
            map.insert(key.to_string(), record);
            Value::Object(map)
        }
        None => record,
    }
}

fn is_unset(record: &Value, field: &str) -> bool {
    record.get(field).map_or(true, Value::is_null)
}

fn inject(target: &mut Map<String, Value>, field: &str, default: Option<i64>) {
    let Some(id) = default.filter(|id| *id > 0) else {
        return;
    };
    target.insert(field.to_string(), int_id_to_json(id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_wrap_with_key_nests_record() {
        let bytes = wrap(Some("domain"), &json!({"name": "example.com"})).unwrap();
        assert_eq!(decode(&bytes), json!({"domain": {"name": "example.com"}}));
    }

    #[test]
    fn test_wrap_without_key_is_top_level() {
        let bytes = wrap(None, &json!({"power_action": "on"})).unwrap();
        assert_eq!(decode(&bytes), json!({"power_action": "on"}));
    }

    #[test]
    fn test_taxonomy_injected_when_unset() {
        let defaults = TaxonomyDefaults {
            organization_id: Some(1),
            location_id: Some(2),
        };
        let record = json!({"name": "web01", "organization_id": null});
        let bytes = wrap_with_taxonomy(Some("host"), &record, &defaults).unwrap();

        assert_eq!(
            decode(&bytes),
            json!({
                "host": {"name": "web01", "organization_id": null},
                "organization_id": "1",
                "location_id": "2"
            })
        );
    }

    #[test]
    fn test_taxonomy_not_injected_when_record_sets_it() {
        let defaults = TaxonomyDefaults {
            organization_id: Some(1),
            location_id: Some(2),
        };
        let record = json!({"name": "web01", "organization_id": "9", "location_id": "8"});
        let bytes = wrap_with_taxonomy(Some("host"), &record, &defaults).unwrap();

        assert_eq!(decode(&bytes), json!({"host": record}));
    }

    #[test]
    fn test_taxonomy_without_defaults_is_plain_wrap() {
        let record = json!({"name": "example.com"});
        let scoped = wrap_with_taxonomy(Some("domain"), &record, &TaxonomyDefaults::default()).unwrap();
        let plain = wrap(Some("domain"), &record).unwrap();
        assert_eq!(decode(&scoped), decode(&plain));
    }

    #[test]
    fn test_taxonomy_without_key_injects_into_record() {
        let defaults = TaxonomyDefaults {
            organization_id: None,
            location_id: Some(4),
        };
        let bytes = wrap_with_taxonomy(None, &json!({"name": "x"}), &defaults).unwrap();
        assert_eq!(decode(&bytes), json!({"name": "x", "location_id": "4"}));
    }
}
