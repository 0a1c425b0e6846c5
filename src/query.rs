//! Search responses and query parameters.
//!
//! Search endpoints return a paginated wrapper whose `results` element
//! shape depends on the endpoint. Responses are decoded first as
//! [`QueryResponse<Value>`] and then normalized into a concrete type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::request::ForemanRequest;

/// Default page size for search operations.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Paginated search result.
///
/// `T` defaults to [`Value`], the shape straight off the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse<T = Value> {
    /// Total number of records of this type.
    #[serde(default)]
    pub total: u64,
    /// Number of records matching the search.
    #[serde(default)]
    pub subtotal: u64,
    /// Current page number (1-indexed).
    #[serde(default)]
    pub page: u32,
    /// Records per page.
    #[serde(default)]
    pub per_page: u32,
    /// The search expression the server applied.
    #[serde(default)]
    pub search: Option<String>,
    /// Sort applied by the server.
    #[serde(default)]
    pub sort: Option<QuerySort>,
    /// Records on this page, in server order.
    pub results: Vec<T>,
}

/// Sort descriptor echoed by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySort {
    /// Sorted field.
    #[serde(default)]
    pub by: Option<String>,
    /// `ASC` or `DESC`.
    #[serde(default)]
    pub order: Option<String>,
}

impl QueryResponse<Value> {
    /// Re-type the generic results into `T`.
    ///
    /// Order and count are preserved. If any element fails to decode the
    /// whole response is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the results cannot be encoded or decoded as `T`.
    pub fn normalize<T: DeserializeOwned>(self) -> Result<QueryResponse<T>> {
        let results: Vec<T> = recode(&self.results)?;
        debug_assert_eq!(results.len(), self.results.len());
        Ok(self.with_results(results))
    }

    /// Decode a response whose `results` is an object keyed by name.
    ///
    /// The first entry is selected: a list value supplies the results, any
    /// other value becomes a single result. An empty object yields no
    /// results. Array-shaped results pass through untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining envelope does not decode.
    pub fn from_keyed(mut body: Value) -> Result<Self> {
        let selected = match body.get("results") {
            Some(Value::Object(map)) => match map.values().next() {
                Some(Value::Array(items)) => Some(items.clone()),
                Some(other) => Some(vec![other.clone()]),
                None => Some(Vec::new()),
            },
            _ => None,
        };
        if let Some(items) = selected {
            body["results"] = Value::Array(items);
        }
        Ok(serde_json::from_value(body)?)
    }
}

impl<T> QueryResponse<T> {
    fn with_results<U>(self, results: Vec<U>) -> QueryResponse<U> {
        QueryResponse {
            total: self.total,
            subtotal: self.subtotal,
            page: self.page,
            per_page: self.per_page,
            search: self.search,
            sort: self.sort,
            results,
        }
    }

    /// Whether later pages hold more matching records.
    #[must_use]
    pub fn has_more(&self) -> bool {
        if self.per_page == 0 {
            return false;
        }
        u64::from(self.page) * u64::from(self.per_page) < self.subtotal
    }

    /// Returns true if this page has no results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns the number of results on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns an iterator over the results.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.results.iter()
    }
}

impl<T> IntoIterator for QueryResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a QueryResponse<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Round-trip `source` through JSON bytes into `T`.
///
/// # Errors
///
/// Returns an error if either direction fails.
pub fn recode<S: Serialize + ?Sized, T: DeserializeOwned>(source: &S) -> Result<T> {
    let bytes = serde_json::to_vec(source)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Search expression and paging for a search endpoint.
///
/// Clauses render as `field="value"` joined by ` and `.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    clauses: Vec<String>,
    page: Option<u32>,
    per_page: Option<u32>,
    order: Option<String>,
}

impl SearchQuery {
    /// An empty query matching everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Match records whose `field` equals `value`.
    #[must_use]
    pub fn eq(mut self, field: &str, value: &str) -> Self {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        self.clauses.push(format!("{field}=\"{escaped}\""));
        self
    }

    /// Add a raw search clause.
    #[must_use]
    pub fn raw(mut self, clause: &str) -> Self {
        self.clauses.push(clause.to_string());
        self
    }

    /// Request a specific page (1-indexed).
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Sort expression, e.g. `name DESC`.
    #[must_use]
    pub fn order(mut self, order: &str) -> Self {
        self.order = Some(order.to_string());
        self
    }

    /// The rendered `search` parameter, if any clause was added.
    pub fn search_string(&self) -> Option<String> {
        if self.clauses.is_empty() {
            None
        } else {
            Some(self.clauses.join(" and "))
        }
    }

    /// The requested page, if set.
    pub fn requested_page(&self) -> Option<u32> {
        self.page
    }

    /// The requested page size, if set.
    pub fn requested_per_page(&self) -> Option<u32> {
        self.per_page
    }

    pub(crate) fn apply(&self, mut request: ForemanRequest) -> ForemanRequest {
        if let Some(search) = self.search_string() {
            request = request.with_query("search", search);
        }
        if let Some(page) = self.page {
            request = request.with_query("page", page.to_string());
        }
        if let Some(per_page) = self.per_page {
            request = request.with_query("per_page", per_page.to_string());
        }
        if let Some(order) = &self.order {
            request = request.with_query("order", order.clone());
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::{Domain, Host};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: i64,
        name: String,
    }

    fn sample() -> Value {
        json!({
            "total": 3,
            "subtotal": 2,
            "page": 1,
            "per_page": 20,
            "search": "name ~ web",
            "sort": {"by": null, "order": null},
            "results": [
                {"id": 1, "name": "web01", "ip": "10.0.0.1"},
                {"id": 2, "name": "web02", "ip": "10.0.0.2"}
            ]
        })
    }

    #[test]
    fn test_normalize_preserves_order_and_count() {
        let generic: QueryResponse = serde_json::from_value(sample()).unwrap();
        assert_eq!(generic.len(), 2);

        let typed: QueryResponse<Item> = generic.normalize().unwrap();
        assert_eq!(typed.len(), 2);
        assert_eq!(typed.results[0].name, "web01");
        assert_eq!(typed.results[1].id, 2);
        assert_eq!(typed.subtotal, 2);
        assert_eq!(typed.search.as_deref(), Some("name ~ web"));
    }

    #[test]
    fn test_normalize_twice_is_stable() {
        let generic: QueryResponse = serde_json::from_value(sample()).unwrap();
        let first: QueryResponse<Item> = generic.clone().normalize().unwrap();

        // Feed the typed results back through the generic path
        let regeneric: QueryResponse = recode(&first).unwrap();
        let second: QueryResponse<Item> = regeneric.normalize().unwrap();

        assert_eq!(first.len(), second.len());
        assert_eq!(first.results, second.results);
    }

    fn renormalize<T: Serialize + DeserializeOwned>(page: &QueryResponse<T>) -> QueryResponse<T> {
        let regeneric: QueryResponse = recode(page).unwrap();
        regeneric.normalize().unwrap()
    }

    #[test]
    fn test_normalize_twice_is_stable_for_resources() {
        let domains: QueryResponse = serde_json::from_value(json!({
            "total": 1,
            "results": [{
                "id": 3,
                "name": "lab.example.com",
                "created_at": "2024-01-05 08:00:00 UTC",
                "locations": [{"id": 4, "name": "Berlin"}],
                "organizations": [{"id": 1}],
                "parameters": [{"name": "ntp", "value": "pool"}]
            }]
        }))
        .unwrap();
        let first: QueryResponse<Domain> = domains.normalize().unwrap();
        let second = renormalize(&first);
        assert_eq!(second.results[0].base.id, 3);
        assert_eq!(second.results[0].location_ids, vec![4]);
        assert_eq!(second.results[0].parameters["ntp"], "pool");
        assert_eq!(first.results, second.results);

        let hosts: QueryResponse = serde_json::from_value(json!({
            "total": 1,
            "results": [{
                "id": 10,
                "name": "web01.lab.example.com",
                "ip": "192.0.2.10",
                "domain_id": 3,
                "hostgroup_id": null,
                "puppetclasses": [{"id": 7, "name": "ntp"}],
                "parameters": [{"name": "role", "value": "web"}]
            }]
        }))
        .unwrap();
        let first: QueryResponse<Host> = hosts.normalize().unwrap();
        let second = renormalize(&first);
        assert_eq!(first.len(), second.len());
        assert_eq!(first.results, second.results);
    }

    #[test]
    fn test_normalize_rejects_whole_page_on_bad_element() {
        let mut body = sample();
        body["results"][1] = json!({"id": "not-a-number", "name": "bad"});
        let generic: QueryResponse = serde_json::from_value(body).unwrap();

        assert!(generic.normalize::<Item>().is_err());
    }

    #[test]
    fn test_generic_decode_rejects_map_results() {
        let body = json!({"total": 1, "results": {"apache": []}});
        assert!(serde_json::from_value::<QueryResponse>(body).is_err());
    }

    #[test]
    fn test_from_keyed_selects_first_entry() {
        let body = json!({
            "total": 2,
            "subtotal": 2,
            "page": 1,
            "per_page": 20,
            "results": {
                "apache": [
                    {"id": 5, "name": "apache"},
                    {"id": 6, "name": "apache::mod::ssl"}
                ]
            }
        });
        let generic = QueryResponse::from_keyed(body).unwrap();
        let typed: QueryResponse<Item> = generic.normalize().unwrap();
        assert_eq!(typed.len(), 2);
        assert_eq!(typed.results[1].name, "apache::mod::ssl");
    }

    #[test]
    fn test_from_keyed_handles_single_object_and_empty_map() {
        let single = json!({"results": {"ntp": {"id": 1, "name": "ntp"}}});
        assert_eq!(QueryResponse::from_keyed(single).unwrap().len(), 1);

        let empty = json!({"results": {}});
        assert!(QueryResponse::from_keyed(empty).unwrap().is_empty());

        let list = sample();
        assert_eq!(QueryResponse::from_keyed(list).unwrap().len(), 2);
    }

    #[test]
    fn test_has_more() {
        let mut page: QueryResponse = serde_json::from_value(sample()).unwrap();
        assert!(!page.has_more());

        page.subtotal = 45;
        assert!(page.has_more());

        page.page = 3;
        assert!(!page.has_more());
    }

    #[test]
    fn test_search_string_rendering() {
        assert_eq!(SearchQuery::new().search_string(), None);

        let query = SearchQuery::new()
            .eq("name", "example.com")
            .eq("location", "Data \"Center\"");
        assert_eq!(
            query.search_string().as_deref(),
            Some(r#"name="example.com" and location="Data \"Center\"""#)
        );
    }
}
