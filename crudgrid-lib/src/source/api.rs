//! Remote HTTP operation set

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::Operations;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Record;
use crate::model::Value;
use crate::query::ListQuery;
use crate::query::Page;

/// Endpoint paths for the four operations, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// GET endpoint for listing.
    pub list: String,
    /// POST endpoint for creation.
    pub create: String,
    /// PUT endpoint for updates; the identity key is appended as a path
    /// segment.
    pub update: String,
    /// DELETE endpoint; the identity key is appended as a path segment.
    pub delete: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            list: "/list".to_string(),
            create: "/create".to_string(),
            update: "/update".to_string(),
            delete: "/delete".to_string(),
        }
    }
}

impl Endpoints {
    /// Uses the same path for all four operations, REST-resource style
    /// (e.g. `/users`).
    pub fn resource(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            list: path.clone(),
            create: path.clone(),
            update: path.clone(),
            delete: path,
        }
    }
}

/// Remaps an outgoing partial record before it is sent as a JSON body.
pub type RequestTransform = Arc<dyn Fn(Record) -> Record + Send + Sync>;

/// Remaps a raw list response body into a [`Page`].
///
/// Use this when the API's list shape differs from the canonical
/// `{"items": [...], "total": n}` object, for example a bare array.
pub type ResponseTransform = Arc<dyn Fn(serde_json::Value) -> Result<Page, Error> + Send + Sync>;

/// Description of a remote HTTP API backing an operation set.
///
/// # Example
///
/// ```
/// use crudgrid_lib::source::{ApiConfig, Endpoints};
///
/// let config = ApiConfig::new("http://localhost:3000")
///     .endpoints(Endpoints::resource("/users"))
///     .header("X-Requested-With", "crudgrid");
/// ```
#[derive(Clone)]
pub struct ApiConfig {
    pub(crate) base_url: String,
    pub(crate) endpoints: Endpoints,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) request_transform: Option<RequestTransform>,
    pub(crate) response_transform: Option<ResponseTransform>,
}

impl ApiConfig {
    /// Creates a config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoints: Endpoints::default(),
            headers: Vec::new(),
            request_transform: None,
            response_transform: None,
        }
    }

    /// Sets the endpoint paths.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the outgoing record transform.
    pub fn request_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Record) -> Record + Send + Sync + 'static,
    {
        self.request_transform = Some(Arc::new(f));
        self
    }

    /// Sets the list response transform.
    pub fn response_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(serde_json::Value) -> Result<Page, Error> + Send + Sync + 'static,
    {
        self.response_transform = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("endpoints", &self.endpoints)
            .field("headers", &self.headers)
            .field("request_transform", &self.request_transform.is_some())
            .field("response_transform", &self.response_transform.is_some())
            .finish()
    }
}

/// Canonical wire shape of a list response.
#[derive(Debug, Deserialize)]
struct ListPayload {
    items: Vec<Record>,
    #[serde(default)]
    total: Option<u64>,
}

/// An operation set that forwards every call to a remote HTTP API.
///
/// `list` issues a GET with the full query appended as URL parameters;
/// `create`, `update`, and `delete` issue POST/PUT/DELETE with JSON bodies,
/// the latter two with the identity key as a trailing path segment.
#[derive(Debug)]
pub struct ApiSource {
    config: ApiConfig,
    http: reqwest::Client,
}

impl ApiSource {
    /// Creates a source from an API description.
    pub fn new(config: ApiConfig) -> Result<Self, Error> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|_| ApiError::InvalidUrl(config.base_url.clone()))?;

        Ok(Self {
            config,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn record_url(&self, endpoint: &str, key: &Value) -> String {
        format!(
            "{}/{}",
            self.endpoint_url(endpoint),
            urlencoding::encode(&key.display_text())
        )
    }

    fn list_url(&self, query: &ListQuery) -> String {
        format!(
            "{}?{}",
            self.endpoint_url(&self.config.endpoints.list),
            query.to_query_string()
        )
    }

    fn apply_headers(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (name, value) in &self.config.headers {
            request = request.header(name, value);
        }
        request
    }

    fn transform_request(&self, record: Record) -> Record {
        match &self.config.request_transform {
            Some(f) => f(record),
            None => record,
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::http(status.as_u16(), body).into())
    }
}

#[async_trait]
impl Operations for ApiSource {
    async fn list(&self, query: &ListQuery) -> Result<Page, Error> {
        let url = self.list_url(query);
        let response = self
            .apply_headers(self.http.get(&url))
            .send()
            .await
            .map_err(ApiError::from)?;
        let response = check_status(response).await?;

        let body: serde_json::Value = response.json().await.map_err(ApiError::from)?;
        match &self.config.response_transform {
            Some(f) => f(body),
            None => {
                let payload: ListPayload = serde_json::from_value(body)
                    .map_err(|e| ApiError::parse(e.to_string()))?;
                let total = payload.total.unwrap_or(payload.items.len() as u64);
                Ok(Page::new(payload.items, total))
            }
        }
    }

    async fn create(&self, record: Record) -> Result<Record, Error> {
        let url = self.endpoint_url(&self.config.endpoints.create);
        let payload = self.transform_request(record);
        let response = self
            .apply_headers(self.http.post(&url))
            .json(&payload)
            .send()
            .await
            .map_err(ApiError::from)?;
        let response = check_status(response).await?;

        let created: Record = response.json().await.map_err(ApiError::from)?;
        Ok(created)
    }

    async fn update(&self, key: &Value, patch: Record) -> Result<Record, Error> {
        let url = self.record_url(&self.config.endpoints.update, key);
        let payload = self.transform_request(patch);
        let response = self
            .apply_headers(self.http.put(&url))
            .json(&payload)
            .send()
            .await
            .map_err(ApiError::from)?;
        let response = check_status(response).await?;

        let updated: Record = response.json().await.map_err(ApiError::from)?;
        Ok(updated)
    }

    async fn delete(&self, key: &Value) -> Result<(), Error> {
        let url = self.record_url(&self.config.endpoints.delete, key);
        let response = self
            .apply_headers(self.http.delete(&url))
            .send()
            .await
            .map_err(ApiError::from)?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> ApiSource {
        let config = ApiConfig::new("http://localhost:3000/")
            .endpoints(Endpoints::resource("/users"));
        ApiSource::new(config).unwrap()
    }

    #[test]
    fn test_list_url() {
        let query = ListQuery::new(2, 5).filter("name", "jane smith");
        assert_eq!(
            source().list_url(&query),
            "http://localhost:3000/users?current=2&pageSize=5&name=jane%20smith"
        );
    }

    #[test]
    fn test_record_url_encodes_key() {
        assert_eq!(
            source().record_url("/users", &Value::Int(7)),
            "http://localhost:3000/users/7"
        );
        assert_eq!(
            source().record_url("/users", &Value::from("a b")),
            "http://localhost:3000/users/a%20b"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = ApiSource::new(ApiConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.list, "/list");
        assert_eq!(endpoints.create, "/create");
        assert_eq!(endpoints.update, "/update");
        assert_eq!(endpoints.delete, "/delete");
    }
}
