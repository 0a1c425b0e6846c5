//! Resource metadata trait.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// An entity type exposed by the API.
///
/// `Serialize` and `Deserialize` both use the response shape, so a decoded
/// record serializes back to something that decodes to the same record.
/// Request bodies come from [`payload`](Resource::payload), where ids go out
/// as strings and related objects as id lists.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Human-readable entity name used in errors.
    const ENTITY: &'static str;

    /// Collection path relative to the API prefix, e.g. `domains`.
    const ENDPOINT: &'static str;

    /// Key the payload is nested under on create/update.
    const ENVELOPE: Option<&'static str>;

    /// Whether create/update payloads get taxonomy defaults.
    const SCOPED: bool = false;

    /// The record id; `0` when not yet created.
    fn id(&self) -> i64;

    /// The record name.
    fn name(&self) -> &str;

    /// Request body for create and update, before envelope wrapping.
    ///
    /// Defaults to the record's own serialization.
    ///
    /// # Errors
    ///
    /// Returns an error if the record fails to serialize.
    fn payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Path of a single record.
    fn member_path(id: i64) -> String {
        format!("{}/{}", Self::ENDPOINT, id)
    }
}
