//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::ForemanClient;
use crate::error::Result;
use crate::traits::Resource;

/// Fetch a single entity by id.
///
/// # Example
///
/// ```ignore
/// use foremanapi::{Domain, ForemanClient, Get};
///
/// let client = ForemanClient::from_env()?;
/// let domain = Domain::get(&client, 3).await?;
/// ```
#[async_trait]
pub trait Get: Resource {
    /// Fetch the entity by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &ForemanClient, id: i64) -> Result<Self> {
        client.get(&Self::member_path(id)).await
    }
}
