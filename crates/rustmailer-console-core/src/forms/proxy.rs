//! Proxy form.

use rustmailer_console_api::types::{Proxy, ProxyRequest};

use super::{ValidationError, ValidationResult, finish};

/// Add/edit proxy form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyForm {
    /// Proxy being edited; `None` when adding.
    pub proxy_id: Option<u64>,
    /// Proxy URL (`socks5://host:port` or `http://host:port`).
    pub url: String,
}

impl ProxyForm {
    /// Creates an empty add form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills an edit form from a stored proxy.
    #[must_use]
    pub fn from_proxy(proxy: &Proxy) -> Self {
        Self {
            proxy_id: Some(proxy.id),
            url: proxy.url.clone(),
        }
    }

    /// Validates the form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyProxyUrl`] or
    /// [`ValidationError::InvalidProxyUrl`].
    pub fn validate(&self) -> ValidationResult<ProxyRequest> {
        let url = self.url.trim();
        let mut errors = Vec::new();
        if url.is_empty() {
            errors.push(ValidationError::EmptyProxyUrl);
        } else if !is_proxy_url(url) {
            errors.push(ValidationError::InvalidProxyUrl);
        }
        finish(errors, || ProxyRequest {
            url: url.to_string(),
        })
    }
}

/// A proxy URL needs a supported scheme, a host and an explicit port.
fn is_proxy_url(input: &str) -> bool {
    url::Url::parse(input).is_ok_and(|url| {
        matches!(url.scheme(), "socks5" | "http")
            && url.host_str().is_some_and(|host| !host.is_empty())
            && url.port().is_some()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_proxies() {
        for url in ["socks5://127.0.0.1:1080", "http://proxy.internal:3128"] {
            let form = ProxyForm {
                url: format!("  {url} "),
                ..ProxyForm::default()
            };
            assert_eq!(form.validate().unwrap().url, url);
        }
    }

    #[test]
    fn test_invalid_proxies() {
        for url in ["https://proxy:443", "socks5://proxy", "proxy:1080"] {
            let form = ProxyForm {
                url: url.into(),
                ..ProxyForm::default()
            };
            assert_eq!(
                form.validate().unwrap_err(),
                [ValidationError::InvalidProxyUrl],
                "{url}"
            );
        }
        assert_eq!(
            ProxyForm::new().validate().unwrap_err(),
            [ValidationError::EmptyProxyUrl]
        );
    }
}
