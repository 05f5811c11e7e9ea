//! HTTP client for the RustMailer REST API.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, ErrorResponse, Result};

/// Path prefix shared by every REST endpoint.
const API_PREFIX: &str = "api/v1";

/// Async client for the RustMailer administration API.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Server base URL, always ending with `/`.
    base_url: Url,
    /// Bearer token sent with every request.
    access_token: Option<String>,
    /// HTTP client.
    http_client: Client,
}

impl ApiClient {
    /// Creates a new client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or not HTTP(S).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "unsupported URL scheme: {}",
                base_url.scheme()
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            access_token: None,
            http_client: Client::new(),
        })
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Replaces (or clears) the access token.
    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    /// Returns the access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Returns the server base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the absolute URL of an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        Ok(self.base_url.join(&format!("{API_PREFIX}/{path}"))?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        let response = self.send(self.http_client.get(url)).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        let response = self.send(self.http_client.get(url).query(query)).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        let response = self.send(self.http_client.post(url).json(body)).await?;
        Ok(response.json().await?)
    }

    /// Sends a POST and ignores the response body.
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        self.send(self.http_client.post(url).json(body)).await?;
        Ok(())
    }

    /// Sends a GET and ignores the response body.
    pub(crate) async fn get_unit(&self, path: &str) -> Result<()> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        self.send(self.http_client.get(url)).await?;
        Ok(())
    }

    /// Sends a POST and returns the response as text, stripped of JSON string quotes.
    pub(crate) async fn post_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        let response = self.send(self.http_client.post(url).json(body)).await?;
        Ok(unquote(response.text().await?))
    }

    /// Sends a POST without a body and returns the response as text.
    pub(crate) async fn post_empty_text(&self, path: &str) -> Result<String> {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        let response = self.send(self.http_client.post(url)).await?;
        Ok(unquote(response.text().await?))
    }

    pub(crate) async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.endpoint(path)?;
        debug!("PUT {url}");
        self.send(self.http_client.put(url).json(body)).await?;
        Ok(())
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<()> {
        let url = self.endpoint(path)?;
        debug!("DELETE {url}");
        self.send(self.http_client.delete(url)).await?;
        Ok(())
    }

    /// Attaches the bearer token, sends the request and maps error statuses.
    async fn send(&self, mut request: RequestBuilder) -> Result<Response> {
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("Request rejected with {status}");
            return Err(Error::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Request failed with {status}: {body}");
        let error = serde_json::from_str::<ErrorResponse>(&body).map_or_else(
            |_| Error::api(status.as_u16(), body.trim()),
            |parsed| parsed.into_error(status.as_u16()),
        );
        Err(error)
    }
}

/// Plain-text endpoints sometimes answer with a JSON string literal.
fn unquote(body: String) -> String {
    match serde_json::from_str::<String>(&body) {
        Ok(inner) => inner,
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""https://x/auth""#.into()), "https://x/auth");
        assert_eq!(unquote("plain-token\n".into()), "plain-token");
    }

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new("http://localhost:15630").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:15630/");
        assert!(client.access_token().is_none());
    }

    #[test]
    fn test_client_with_token() {
        let client = ApiClient::new("http://localhost:15630")
            .unwrap()
            .with_access_token("root-token");
        assert_eq!(client.access_token(), Some("root-token"));
    }

    #[test]
    fn test_endpoint_join() {
        let client = ApiClient::new("http://localhost:15630").unwrap();
        assert_eq!(
            client.endpoint("list-accounts").unwrap().as_str(),
            "http://localhost:15630/api/v1/list-accounts"
        );
    }

    #[test]
    fn test_endpoint_join_with_base_path() {
        let client = ApiClient::new("https://mail.example.com/rustmailer").unwrap();
        assert_eq!(
            client.endpoint("/account/7").unwrap().as_str(),
            "https://mail.example.com/rustmailer/api/v1/account/7"
        );
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert!(matches!(
            ApiClient::new("ftp://example.com"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_set_access_token_clears() {
        let mut client = ApiClient::new("http://localhost:15630")
            .unwrap()
            .with_access_token("abc");
        client.set_access_token(None);
        assert!(client.access_token().is_none());
    }
}
