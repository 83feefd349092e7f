//! Table query builder.
//!
//! Mirrors the REST conventions of the hosted backend:
//!
//! - `select=*,categories(name,slug)` picks columns and embeds relations
//! - `column=eq.value` filters rows
//! - `order=column.asc` / `order=column.desc` sorts
//! - `limit=n` caps the result
//!
//! Mutations (`update`, `delete`) refuse to run without at least one filter.

use std::fmt::Display;

use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::client::BackendClient;
use crate::error::BackendError;

/// A pending query against one table.
#[must_use]
pub struct TableQuery<'a> {
    client: &'a BackendClient,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
    token: Option<&'a SecretString>,
}

impl<'a> TableQuery<'a> {
    pub(crate) fn new(client: &'a BackendClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            token: None,
        }
    }

    /// Columns to return, including embedded relations.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// Keep rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Keep rows where `column` is one of `values`.
    pub fn in_list<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push((column.to_string(), format!("in.({joined})")));
        self
    }

    /// Sort by `column`. May be called more than once.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{column}.{direction}"));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run as the signed-in user instead of with the client key.
    pub fn with_token(mut self, token: Option<&'a SecretString>) -> Self {
        self.token = token;
        self
    }

    /// Query string pairs in the order they are sent.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 3);
        if let Some(select) = &self.select {
            pairs.push(("select".to_string(), select.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        self.client
            .rest_request(method, &self.table, self.token)
            .query(&self.query_pairs())
    }

    fn require_filter(&self, action: &'static str) -> Result<(), BackendError> {
        if self.filters.is_empty() {
            return Err(BackendError::UnscopedMutation(action, self.table.clone()));
        }
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch all matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or rows don't match `T`.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, BackendError> {
        let response = self.client.send(self.request(Method::GET)).await?;
        let body = response.text().await?;
        let rows: Vec<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend rows"
            );
            e
        })?;
        debug!(count = rows.len(), "Fetched rows");
        Ok(rows)
    }

    /// Fetch the first matching row, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the row doesn't match `T`.
    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, BackendError> {
        Ok(self.limit(1).fetch::<T>().await?.into_iter().next())
    }

    /// Fetch exactly one row.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if nothing matches.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, BackendError> {
        let table = self.table.clone();
        self.fetch_optional()
            .await?
            .ok_or(BackendError::NotFound(table))
    }

    /// Count matching rows without transferring them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the count header is missing.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn count(self) -> Result<u64, BackendError> {
        let request = self
            .request(Method::HEAD)
            .header("Prefer", "count=exact");
        let response = self.client.send(request).await?;
        let total = response
            .headers()
            .get("Content-Range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| BackendError::Api {
                status: response.status().as_u16(),
                code: None,
                message: "missing Content-Range count".to_string(),
            })?;
        debug!(total, "Counted rows");
        Ok(total)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert one row without reading it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the row.
    #[instrument(skip(self, row), fields(table = %self.table))]
    pub async fn insert<B: Serialize + Sync>(self, row: &B) -> Result<(), BackendError> {
        let request = self
            .client
            .rest_request(Method::POST, &self.table, self.token)
            .header("Prefer", "return=minimal")
            .json(row);
        self.client.send(request).await?;
        debug!("Inserted row");
        Ok(())
    }

    /// Insert one or more rows and return what the backend stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the rows.
    #[instrument(skip(self, rows), fields(table = %self.table))]
    pub async fn insert_returning<B, T>(self, rows: &B) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .rest_request(Method::POST, &self.table, self.token)
            .header("Prefer", "return=representation")
            .json(rows);
        if let Some(select) = &self.select {
            request = request.query(&[("select", select)]);
        }
        let response = self.client.send(request).await?;
        let stored: Vec<T> = response.json().await?;
        debug!(count = stored.len(), "Inserted rows");
        Ok(stored)
    }

    /// Patch matching rows, returning how many changed.
    ///
    /// Zero means nothing matched or row-level security hid the row.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::UnscopedMutation` if no filter was given.
    #[instrument(skip(self, patch), fields(table = %self.table))]
    pub async fn update<B: Serialize + Sync>(self, patch: &B) -> Result<usize, BackendError> {
        self.require_filter("update")?;
        let request = self
            .request(Method::PATCH)
            .header("Prefer", "return=representation")
            .json(patch);
        let affected = self.affected_rows(request).await?;
        debug!(affected, "Updated rows");
        Ok(affected)
    }

    /// Delete matching rows, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::UnscopedMutation` if no filter was given.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn delete(self) -> Result<usize, BackendError> {
        self.require_filter("delete")?;
        let request = self
            .request(Method::DELETE)
            .header("Prefer", "return=representation");
        let affected = self.affected_rows(request).await?;
        debug!(affected, "Deleted rows");
        Ok(affected)
    }

    async fn affected_rows(&self, request: reqwest::RequestBuilder) -> Result<usize, BackendError> {
        let response = self.client.send(request).await?;
        let rows: Vec<serde_json::Value> = response.json().await?;
        Ok(rows.len())
    }
}

/// Parse the total from a `Content-Range` header such as `0-24/318` or `*/0`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::BackendConfig;

    fn client() -> Option<BackendClient> {
        BackendConfig::new(
            "https://proj.backend.example",
            SecretString::from("anon"),
            None,
        )
        .ok()
        .map(|config| BackendClient::new(&config))
    }

    fn pairs(query: &TableQuery<'_>) -> Vec<(String, String)> {
        query.query_pairs()
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_query_pairs_order() {
        let Some(client) = client() else {
            panic!("config should be valid");
        };
        let query = client
            .from("products")
            .select("*, categories(name, slug)")
            .eq("is_active", true)
            .eq("slug", "smart-pen")
            .order("created_at", false)
            .limit(8);
        assert_eq!(
            pairs(&query),
            vec![
                pair("select", "*, categories(name, slug)"),
                pair("is_active", "eq.true"),
                pair("slug", "eq.smart-pen"),
                pair("order", "created_at.desc"),
                pair("limit", "8"),
            ]
        );
    }

    #[test]
    fn test_multiple_orders_join() {
        let Some(client) = client() else {
            panic!("config should be valid");
        };
        let query = client
            .from("banners")
            .order("display_order", true)
            .order("created_at", false);
        assert_eq!(
            pairs(&query),
            vec![pair("order", "display_order.asc,created_at.desc")]
        );
    }

    #[test]
    fn test_in_list_filter() {
        let Some(client) = client() else {
            panic!("config should be valid");
        };
        let query = client.from("orders").in_list("status", ["pending", "processing"]);
        assert_eq!(pairs(&query), vec![pair("status", "in.(pending,processing)")]);
    }

    #[tokio::test]
    async fn test_unscoped_mutations_are_refused() {
        let Some(client) = client() else {
            panic!("config should be valid");
        };
        let update = client
            .from("products")
            .update(&serde_json::json!({ "is_active": false }))
            .await;
        assert!(matches!(
            update,
            Err(BackendError::UnscopedMutation("update", ref table)) if table == "products"
        ));

        let delete = client.from("orders").delete().await;
        assert!(matches!(
            delete,
            Err(BackendError::UnscopedMutation("delete", _))
        ));
    }

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-24/318"), Some(318));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-24/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
