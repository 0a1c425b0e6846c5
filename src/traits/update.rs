//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::client::ForemanClient;
use crate::error::Result;
use crate::traits::Resource;

/// Update an existing entity.
///
/// The record's own id selects the entity; the whole record is sent.
///
/// # Example
///
/// ```ignore
/// use foremanapi::{Domain, ForemanClient, Get, Update};
///
/// let client = ForemanClient::from_env()?;
/// let mut domain = Domain::get(&client, 3).await?;
/// domain.fullname = Some("Lab network".to_string());
/// let updated = Domain::update(&client, &domain).await?;
/// ```
#[async_trait]
pub trait Update: Resource {
    /// Update the entity and return the updated version.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(client: &ForemanClient, record: &Self) -> Result<Self> {
        update_record(client, record).await
    }
}

/// PUT `record` to its member path, wrapped in its envelope.
///
/// # Errors
///
/// Returns an error if encoding, the request, or decoding fails.
#[tracing::instrument(skip_all, fields(entity = T::ENTITY, id = record.id()))]
pub async fn update_record<T: Resource>(client: &ForemanClient, record: &T) -> Result<T> {
    let body = client.encode(T::ENVELOPE, &record.payload()?, T::SCOPED)?;
    client.put(&T::member_path(record.id()), body).await
}
