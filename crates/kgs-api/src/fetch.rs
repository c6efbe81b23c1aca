use std::{future::Future, time::Duration};

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Method, StatusCode,
};
use tracing::{debug, instrument, warn};

use crate::{ApiError, Result};

pub const DEFAULT_ENDPOINT: &str = "http://metakgs.org/api";

/// Anything that can turn a path into a decoded response.
///
/// Implementations never fail outright: transport and decode problems are
/// carried inside the returned [`Exchange`].
pub trait Fetch: Clone + Send + Sync + 'static {
    fn fetch(&self, path: &str) -> impl Future<Output = Exchange> + Send;
}

#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// All values of `field` joined by `", "`.
    pub fn header(&self, field: &str) -> Option<String> {
        let values = self
            .headers
            .get_all(field)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>();
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    pub fn set_header(&mut self, field: &str, value: &str) -> Result<()> {
        let (name, value) = header_pair(field, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn push_header(&mut self, field: &str, value: &str) -> Result<()> {
        let (name, value) = header_pair(field, value)?;
        self.headers.append(name, value);
        Ok(())
    }
}

fn header_pair(field: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(field.as_bytes()).map_err(|_| ApiError::InvalidArgument {
        field: "header",
        value: field.to_string(),
    })?;
    let value = HeaderValue::from_str(value).map_err(|_| ApiError::InvalidArgument {
        field: "header value",
        value: value.to_string(),
    })?;
    Ok((name, value))
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Text(String),
}

#[derive(Clone, Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
}

impl Response {
    pub fn is_informational(&self) -> bool {
        self.status.is_informational()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_redirection(&self) -> bool {
        self.status.is_redirection()
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    pub fn header(&self, field: &str) -> Option<&str> {
        self.headers.get(field).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> String {
        media_type(&self.headers)
    }
}

/// Lower-cased media type with any parameters stripped.
fn media_type(headers: &HeaderMap) -> String {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .collect::<String>()
        .to_lowercase()
}

/// A request together with whatever came back for it.
#[derive(Debug)]
pub struct Exchange {
    pub request: Request,
    pub response: Result<Response>,
}

impl Exchange {
    pub fn status(&self) -> Option<StatusCode> {
        self.response.as_ref().ok().map(|r| r.status)
    }

    /// The JSON body, but only for a `200 OK` response.
    pub(crate) fn ok_json(&self) -> Option<&serde_json::Value> {
        match &self.response {
            Ok(Response {
                status,
                body: Body::Json(body),
                ..
            }) if *status == StatusCode::OK => Some(body),
            _ => None,
        }
    }
}

/// Content produced by a fetch, with the exchange kept for diagnostics.
#[derive(Debug)]
pub struct Reply<C> {
    pub content: Option<C>,
    pub exchange: Exchange,
}

impl<C> Reply<C> {
    pub fn map<U>(self, f: impl FnOnce(C) -> U) -> Reply<U> {
        Reply {
            content: self.content.map(f),
            exchange: self.exchange,
        }
    }

}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::builder().build().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to build HTTP client, using defaults");
            Self {
                client: reqwest::Client::new(),
                endpoint: DEFAULT_ENDPOINT.to_string(),
            }
        })
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn uri_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.endpoint, path)
        }
    }

    async fn send(&self, request: &Request) -> Result<Response> {
        let res = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone())
            .send()
            .await
            .map_err(ApiError::Reqwest)?;
        let status = res.status();
        let headers = res.headers().clone();
        let text = res.text().await.map_err(ApiError::Reqwest)?;
        let body = if status == StatusCode::OK && media_type(&headers) == "application/json" {
            Body::Json(
                serde_json::from_str(&text).map_err(|source| ApiError::Decode {
                    url: request.url.clone(),
                    source,
                })?,
            )
        } else {
            Body::Text(text)
        };
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpClient {
    #[instrument(skip(self))]
    async fn fetch(&self, path: &str) -> Exchange {
        let request = Request::get(self.uri_for(path));
        debug!(url = %request.url, "Fetching");
        let response = self.send(&request).await;
        match &response {
            Ok(res) => debug!(status = %res.status, "Got response"),
            Err(e) => warn!(url = %request.url, error = %e, "Request failed"),
        }
        Exchange { request, response }
    }
}

#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpClientBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            client = client.user_agent(user_agent);
        }
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(HttpClient {
            client: client.build().map_err(ApiError::Reqwest)?,
            endpoint,
        })
    }
}
