//! Search trait for querying collections of entities.

use async_trait::async_trait;

use crate::client::ForemanClient;
use crate::error::{ForemanError, Result};
use crate::query::{QueryResponse, SearchQuery, DEFAULT_PER_PAGE};
use crate::traits::Resource;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// Search entities with pagination support.
///
/// # Example
///
/// ```ignore
/// use foremanapi::{Domain, ForemanClient, Search, SearchQuery};
///
/// let client = ForemanClient::from_env()?;
///
/// // Fetch a single page
/// let page = Domain::search_page(&client, &SearchQuery::new().per_page(50)).await?;
///
/// // Fetch all pages
/// let all_domains = Domain::search_all(&client, &SearchQuery::new()).await?;
///
/// // Exact lookup
/// let lab = Domain::find_by_name(&client, "lab.example.com").await?;
/// ```
#[async_trait]
pub trait Search: Resource {
    /// Fetch one page of matching entities.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or any result does not decode.
    async fn search_page(client: &ForemanClient, query: &SearchQuery) -> Result<QueryResponse<Self>> {
        client.search(Self::ENDPOINT, query).await?.normalize()
    }

    /// Fetch every matching entity across all pages.
    ///
    /// Pages are [`DEFAULT_PER_PAGE`] records unless the query sets its own
    /// page size.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn search_all(client: &ForemanClient, query: &SearchQuery) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut page = query.requested_page().unwrap_or(1);
        let per_page = query.requested_per_page().unwrap_or(DEFAULT_PER_PAGE);

        loop {
            let paged = query.clone().page(page).per_page(per_page);
            let result = Self::search_page(client, &paged).await?;
            let has_more = result.has_more() && !result.is_empty();
            all_items.extend(result);

            if !has_more {
                break;
            }
            page += 1;

            // Safety limit to prevent infinite loops
            if page > MAX_PAGES {
                tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
                break;
            }
        }

        Ok(all_items)
    }

    /// Fetch the single entity named exactly `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ForemanError::NotFound`] when nothing matches and
    /// [`ForemanError::AmbiguousMatch`] when several entities do.
    async fn find_by_name(client: &ForemanClient, name: &str) -> Result<Self> {
        let query = SearchQuery::new().eq("name", name);
        let mut matches: Vec<Self> = Self::search_page(client, &query)
            .await?
            .into_iter()
            .filter(|r| r.name() == name)
            .collect();

        match matches.len() {
            0 => Err(ForemanError::NotFound {
                entity_type: Self::ENTITY,
                query: name.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            count => Err(ForemanError::AmbiguousMatch {
                entity_type: Self::ENTITY,
                query: name.to_string(),
                count,
            }),
        }
    }
}
