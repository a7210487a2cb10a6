use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    multipart, Client, Method, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use super::detail::extract_detail;
use crate::{
    config::ApiConfig,
    error::{PlannerError, Result},
    session::SessionHandle,
};

/// Shared, authenticated client for the Meal Planner API.
///
/// The bearer token is read from the injected [`SessionHandle`] on every
/// request, so a login or logout through any clone is seen by all of them.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionHandle) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let timeout = config.timeout();
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::Network {
                message: format!("Failed to create HTTP client: {e}"),
                timeout: false,
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            session,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn default_timeout(&self) -> Duration {
        self.timeout
    }

    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest<'_> {
        ApiRequest {
            api: self,
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            timeout: None,
            deferred: None,
        }
    }

    pub fn get(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::DELETE, path)
    }
}

enum RequestBody {
    Empty,
    Json(Vec<u8>),
    Multipart(multipart::Form),
}

/// One pending call. Nothing goes over the wire until a `send_*` method runs.
pub struct ApiRequest<'a> {
    api: &'a ApiClient,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    timeout: Option<Duration>,
    deferred: Option<PlannerError>,
}

impl<'a> ApiRequest<'a> {
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds the parameter only when a value is present.
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => self.body = RequestBody::Json(bytes),
            Err(e) => self.deferred = Some(e.into()),
        }
        self
    }

    /// Multipart body. The transport generates the boundary and the
    /// `Content-Type` header, so none is set here.
    pub fn multipart(mut self, form: multipart::Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Overrides the client-wide timeout for this call only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn send(self) -> Result<Response> {
        if let Some(err) = self.deferred {
            return Err(err);
        }

        let url = self.api.url(&self.path)?;
        let mut builder = self
            .api
            .client
            .request(self.method.clone(), url)
            .timeout(self.timeout.unwrap_or(self.api.timeout));

        if let Some(token) = self.api.session.token() {
            builder = builder.bearer_auth(token);
        }
        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        builder = match self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(bytes),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await.map_err(|e| {
            debug!(method = %self.method, path = %self.path, error = %e, "API request failed");
            PlannerError::from(e)
        })?;

        let status = response.status();
        debug!(method = %self.method, path = %self.path, status = status.as_u16(), "API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::ServerRejection {
                status,
                detail: extract_detail(&body),
            });
        }

        Ok(response)
    }

    pub async fn send_json<T: DeserializeOwned>(self) -> Result<T> {
        let path = self.path.clone();
        let response = self.send().await?;
        let bytes = response.bytes().await.map_err(PlannerError::from)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            let preview: String = String::from_utf8_lossy(&bytes).chars().take(100).collect();
            tracing::error!(path = %path, response_preview = %preview, error = %e, "Failed to decode API response");
            PlannerError::Decode(format!("{path}: {e}"))
        })
    }

    /// Sends and discards the response body.
    pub async fn send_empty(self) -> Result<()> {
        self.send().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 60,
        };
        ApiClient::new(&config, SessionHandle::default()).unwrap()
    }

    #[test]
    fn test_url_joining_keeps_base_path() {
        let api = client("http://10.0.0.2:8000/api");
        assert_eq!(
            api.url("/pantry/").unwrap().as_str(),
            "http://10.0.0.2:8000/api/pantry/"
        );
        assert_eq!(
            api.url("plans/3/add-meal").unwrap().as_str(),
            "http://10.0.0.2:8000/api/plans/3/add-meal"
        );
    }

    #[test]
    fn test_url_joining_on_bare_host() {
        let api = client("http://127.0.0.1:8000");
        assert_eq!(
            api.url("/grocery/7").unwrap().as_str(),
            "http://127.0.0.1:8000/grocery/7"
        );
    }

    #[test]
    fn test_default_timeout_is_sixty_seconds() {
        let api = client("http://127.0.0.1:8000");
        assert_eq!(api.default_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 60,
        };
        let result = ApiClient::new(&config, SessionHandle::default());
        assert!(matches!(result, Err(PlannerError::UrlParse(_))));
    }
}
