//! Backend collaborator: where each layout lives and how to move it.
//!
//! Layouts are a single JSON field on an ordinary CMS record. Loading reads
//! the record and pulls that field out; saving replaces the whole field. There
//! is no partial update.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::config::AdminConfig;
use crate::error::StoreError;

/// Envelope key some backend endpoints wrap their record in.
const DATA_KEY: &str = "data";

/// A layout the admin can edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayoutTarget {
    /// The builder layout of one page.
    Page(String),
    /// The governance org chart.
    OrgChart,
}

impl LayoutTarget {
    /// Record path relative to the API root.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Page(id) => format!("/pages/{id}"),
            Self::OrgChart => "/governance/org-chart".to_owned(),
        }
    }

    /// Record field holding the layout.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Page(_) => "layout",
            Self::OrgChart => "chart",
        }
    }

    /// File-system-safe name for the local cache.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::Page(id) => format!("page-{id}"),
            Self::OrgChart => "org-chart".to_owned(),
        }
    }
}

impl fmt::Display for LayoutTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(id) => write!(f, "page:{id}"),
            Self::OrgChart => f.write_str("org-chart"),
        }
    }
}

impl FromStr for LayoutTarget {
    type Err = StoreError;

    /// Parses `page:<id>` (id of letters, digits, `-` or `_`) or `org-chart`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("org-chart") || s.eq_ignore_ascii_case("orgchart") {
            return Ok(Self::OrgChart);
        }
        match s.strip_prefix("page:") {
            Some(id) if is_valid_page_id(id) => Ok(Self::Page(id.to_owned())),
            _ => Err(StoreError::InvalidTarget(s.to_owned())),
        }
    }
}

fn is_valid_page_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Loads and saves whole layout fields. Enables mocking in tests.
#[async_trait]
pub trait LayoutStore: Send + Sync {
    /// Fetch the stored layout field. A record without the field yields
    /// `Value::Null`, which decodes as an empty layout.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails or the response is not a record.
    async fn fetch(&self, target: &LayoutTarget) -> Result<Value, StoreError>;

    /// Replace the stored layout field.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails or the backend rejects it.
    async fn store(&self, target: &LayoutTarget, layout: &Value) -> Result<(), StoreError>;
}

/// [`LayoutStore`] over the CMS REST API.
pub struct HttpLayoutStore {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    layout_as_string: bool,
}

impl HttpLayoutStore {
    /// # Errors
    ///
    /// Returns [`StoreError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &AdminConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StoreError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            token: config.api_token.clone(),
            layout_as_string: config.layout_as_string,
        })
    }

    /// Full URL of the record behind `target`.
    #[must_use]
    pub fn url(&self, target: &LayoutTarget) -> String {
        format!("{}{}", self.base_url, target.path())
    }

    async fn send(&self, method: Method, target: &LayoutTarget, body: Option<&Value>) -> Result<String, StoreError> {
        let url = self.url(target);
        let request = self.http.request(method.clone(), &url);
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let request = match body {
            Some(json) => request.json(json),
            None => request,
        };

        let response = request.send().await.map_err(|e| StoreError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| StoreError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            tracing::warn!(%method, %url, status, "layout request rejected");
            return Err(StoreError::Status { status, body: text });
        }
        tracing::debug!(%method, %url, status, bytes = text.len(), "layout request ok");
        Ok(text)
    }
}

#[async_trait]
impl LayoutStore for HttpLayoutStore {
    async fn fetch(&self, target: &LayoutTarget) -> Result<Value, StoreError> {
        let text = self.send(Method::GET, target, None).await?;
        let record: Value = serde_json::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))?;
        extract_layout(record, target.field())
    }

    async fn store(&self, target: &LayoutTarget, layout: &Value) -> Result<(), StoreError> {
        let body = layout_body(target.field(), layout, self.layout_as_string);
        self.send(Method::PUT, target, Some(&body)).await?;
        Ok(())
    }
}

/// Pull `field` out of a fetched record, looking inside a `data` envelope
/// when the record itself does not carry it.
pub(crate) fn extract_layout(record: Value, field: &str) -> Result<Value, StoreError> {
    let Value::Object(mut record) = record else {
        return Err(StoreError::Parse("expected a JSON object record".to_owned()));
    };
    if let Some(layout) = record.remove(field) {
        return Ok(layout);
    }
    match record.remove(DATA_KEY) {
        Some(Value::Object(mut data)) => Ok(data.remove(field).unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

/// Request body replacing `field` with `layout`.
pub(crate) fn layout_body(field: &str, layout: &Value, as_string: bool) -> Value {
    let value = if as_string { Value::String(layout.to_string()) } else { layout.clone() };
    let mut body = Map::new();
    body.insert(field.to_owned(), value);
    Value::Object(body)
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
