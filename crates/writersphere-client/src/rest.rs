//! Table queries.
//!
//! A [`Query`] targets one table and accumulates a column selection,
//! filters, ordering, and a limit. It is finished by a read (`fetch`,
//! `single`, `maybe_single`, `count`) or a write (`insert`, `update`,
//! `upsert`, `delete`). Filters apply to writes too, so
//! `table("articles").eq("id", id).eq("writer_id", uid).update(..)` touches
//! only the matching row.
//!
//! Filter values use the backend's `column=op.value` query syntax:
//!
//! ```rust
//! use writersphere_client::rest::{in_list, ilike_any};
//!
//! assert_eq!(in_list(["a", "b c"]), r#"("a","b c")"#);
//! assert_eq!(
//!     ilike_any(&["title", "body_md"], "dune"),
//!     r#"title.ilike."%dune%",body_md.ilike."%dune%""#
//! );
//! ```

use std::fmt::Display;

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{BackendClient, Error, Result};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// A query against one table.
#[derive(Debug, Clone)]
pub struct Query {
    client: BackendClient,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl Query {
    pub(crate) fn new(client: BackendClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Columns to return, including embedded joins such as `categories(name)`.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// `column = value`.
    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, format!("eq.{value}"))
    }

    /// `column <> value`.
    pub fn neq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, format!("neq.{value}"))
    }

    /// `column` is one of `values`.
    pub fn in_<I>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.filter(column, format!("in.{}", in_list(values)))
    }

    /// Case-insensitive `LIKE`; `%` is the wildcard.
    pub fn ilike(self, column: &str, pattern: &str) -> Self {
        self.filter(column, format!("ilike.{pattern}"))
    }

    /// Any of the comma-separated conditions, e.g. from [`ilike_any`].
    pub fn or(self, conditions: &str) -> Self {
        self.filter("or", format!("({conditions})"))
    }

    /// Sort by `column`. Repeated calls add tie-breakers.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{column}.{direction}"));
        self
    }

    /// Return at most `n` rows.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    fn filter(mut self, key: &str, value: String) -> Self {
        self.filters.push((key.to_string(), value));
        self
    }

    fn params(&self, with_select: bool) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);
        if with_select && let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            params.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    fn request(&self, method: Method, with_select: bool) -> RequestBuilder {
        self.client
            .request(method, &["rest", "v1", self.table.as_str()])
            .query(&self.params(with_select))
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// All matching rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let response = self
            .client
            .send(self.request(Method::GET, true))
            .await?;
        Ok(response.json().await?)
    }

    /// Exactly one row; zero or several rows is an error from the backend.
    pub async fn single<T: DeserializeOwned>(self) -> Result<T> {
        let request = self
            .request(Method::GET, true)
            .header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));
        let response = self.client.send(request).await?;
        Ok(response.json().await?)
    }

    /// Zero or one row.
    pub async fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>> {
        let table = self.table.clone();
        let mut rows: Vec<T> = self.fetch().await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(Error::decode(format!(
                "expected at most one row from {table}, got {n}"
            ))),
        }
    }

    /// Exact number of matching rows, read from `Content-Range` on a HEAD
    /// request. `None` when the backend did not report a total.
    pub async fn count(self) -> Result<Option<u64>> {
        let request = self
            .request(Method::HEAD, false)
            .header("Prefer", "count=exact");
        let response = self.client.send(request).await?;
        Ok(response
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total))
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// Insert one row or an array of rows.
    pub async fn insert<B: Serialize + ?Sized>(self, body: &B) -> Result<()> {
        let request = self
            .request(Method::POST, false)
            .header("Prefer", "return=minimal")
            .json(body);
        self.client.send(request).await?;
        Ok(())
    }

    /// Insert and return the inserted rows, shaped by `select`.
    pub async fn insert_returning<B, T>(self, body: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, true)
            .header("Prefer", "return=representation")
            .json(body);
        Ok(self.client.send(request).await?.json().await?)
    }

    /// Update the matching rows.
    pub async fn update<B: Serialize + ?Sized>(self, body: &B) -> Result<()> {
        let request = self
            .request(Method::PATCH, false)
            .header("Prefer", "return=minimal")
            .json(body);
        self.client.send(request).await?;
        Ok(())
    }

    /// Update the matching rows and return them, shaped by `select`.
    pub async fn update_returning<B, T>(self, body: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::PATCH, true)
            .header("Prefer", "return=representation")
            .json(body);
        Ok(self.client.send(request).await?.json().await?)
    }

    /// Insert rows, merging into existing ones that collide on
    /// `on_conflict` (comma-separated columns). Returns all affected rows.
    pub async fn upsert_returning<B, T>(self, body: &B, on_conflict: &str) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, true)
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(body);
        Ok(self.client.send(request).await?.json().await?)
    }

    /// Delete the matching rows.
    pub async fn delete(self) -> Result<()> {
        self.client
            .send(self.request(Method::DELETE, false))
            .await?;
        Ok(())
    }
}

/// `("a","b")` with each value double-quoted and escaped.
pub fn in_list<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let quoted: Vec<String> = values
        .into_iter()
        .map(|v| quote(&v.to_string()))
        .collect();
    format!("({})", quoted.join(","))
}

/// Conditions for [`Query::or`]: any of `columns` contains `needle`,
/// case-insensitively.
pub fn ilike_any(columns: &[&str], needle: &str) -> String {
    let pattern = quote(&format!("%{needle}%"));
    columns
        .iter()
        .map(|column| format!("{column}.ilike.{pattern}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`.
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}
