//! Delete trait for removing entities.

use async_trait::async_trait;

use crate::client::ForemanClient;
use crate::error::Result;
use crate::traits::Resource;

/// Delete an entity by id.
#[async_trait]
pub trait Delete: Resource {
    /// Delete the entity. Only the response status is checked.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 2xx.
    async fn delete(client: &ForemanClient, id: i64) -> Result<()> {
        client.delete(&Self::member_path(id)).await
    }
}
