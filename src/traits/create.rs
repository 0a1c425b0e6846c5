//! Create trait for new entities.

use async_trait::async_trait;

use crate::client::ForemanClient;
use crate::error::Result;
use crate::traits::Resource;

/// Create a new entity.
///
/// # Example
///
/// ```ignore
/// use foremanapi::{Create, Domain, ForemanClient};
///
/// let client = ForemanClient::from_env()?;
/// let created = Domain::create(&client, &Domain::named("example.com")).await?;
/// println!("created domain {}", created.base.id);
/// ```
#[async_trait]
pub trait Create: Resource {
    /// Create the entity and return the server's version of it.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, the request, or decoding fails.
    async fn create(client: &ForemanClient, record: &Self) -> Result<Self> {
        create_record(client, record).await
    }
}

/// POST `record` to its collection, wrapped in its envelope.
///
/// # Errors
///
/// Returns an error if encoding, the request, or decoding fails.
#[tracing::instrument(skip_all, fields(entity = T::ENTITY, name = record.name()))]
pub async fn create_record<T: Resource>(client: &ForemanClient, record: &T) -> Result<T> {
    let body = client.encode(T::ENVELOPE, &record.payload()?, T::SCOPED)?;
    client.post(T::ENDPOINT, body).await
}
