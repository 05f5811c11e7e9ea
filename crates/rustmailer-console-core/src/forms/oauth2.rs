//! OAuth2 client configuration form.

use std::collections::BTreeMap;

use rustmailer_console_api::types::{OAuth2Entity, OAuth2Request};

use super::{ValidationError, ValidationResult, finish, is_url_with_scheme};

const HTTP_SCHEMES: &[&str] = &["http", "https"];

/// Add/edit OAuth2 configuration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Form {
    /// Configuration being edited; `None` when adding.
    pub oauth2_id: Option<u64>,
    /// Unique name accounts refer to.
    pub description: String,
    /// Client id.
    pub client_id: String,
    /// Client secret. Blank on edit keeps the stored one.
    pub client_secret: String,
    /// Authorization endpoint.
    pub auth_url: String,
    /// Token endpoint.
    pub token_url: String,
    /// Redirect URI registered with the provider.
    pub redirect_uri: String,
    /// Scopes separated by whitespace or commas.
    pub scopes: String,
    /// Extra authorization parameters, `key=value` pairs separated by semicolons or new lines.
    pub extra_params: String,
    /// Whether the configuration is usable.
    pub enabled: bool,
    /// Proxy id.
    pub use_proxy: Option<u64>,
}

impl Default for OAuth2Form {
    fn default() -> Self {
        Self {
            oauth2_id: None,
            description: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            auth_url: String::new(),
            token_url: String::new(),
            redirect_uri: String::new(),
            scopes: String::new(),
            extra_params: String::new(),
            enabled: true,
            use_proxy: None,
        }
    }
}

impl OAuth2Form {
    /// Creates an empty add form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills an edit form from a stored configuration.
    #[must_use]
    pub fn from_entity(entity: &OAuth2Entity) -> Self {
        Self {
            oauth2_id: Some(entity.id),
            description: entity.description.clone(),
            client_id: entity.client_id.clone(),
            client_secret: String::new(),
            auth_url: entity.auth_url.clone(),
            token_url: entity.token_url.clone(),
            redirect_uri: entity.redirect_uri.clone(),
            scopes: entity.scopes.join(" "),
            extra_params: entity
                .extra_params
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
            enabled: entity.enabled,
            use_proxy: entity.use_proxy,
        }
    }

    /// Whether this form edits an existing configuration.
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.oauth2_id.is_some()
    }

    /// Parsed scope list.
    #[must_use]
    pub fn scope_list(&self) -> Vec<String> {
        self.scopes
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|scope| !scope.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Validates the form.
    ///
    /// # Errors
    ///
    /// Returns every invalid field.
    pub fn validate(&self) -> ValidationResult<OAuth2Request> {
        let mut errors = Vec::new();

        if self.description.trim().is_empty() {
            errors.push(ValidationError::EmptyOAuth2Name);
        }
        if self.client_id.trim().is_empty() {
            errors.push(ValidationError::EmptyClientId);
        }
        if self.client_secret.trim().is_empty() && !self.is_edit() {
            errors.push(ValidationError::EmptyClientSecret);
        }
        if !is_url_with_scheme(&self.auth_url, HTTP_SCHEMES) {
            errors.push(ValidationError::InvalidAuthUrl);
        }
        if !is_url_with_scheme(&self.token_url, HTTP_SCHEMES) {
            errors.push(ValidationError::InvalidTokenUrl);
        }
        if !is_url_with_scheme(&self.redirect_uri, HTTP_SCHEMES) {
            errors.push(ValidationError::InvalidRedirectUri);
        }
        let scopes = self.scope_list();
        if scopes.is_empty() {
            errors.push(ValidationError::EmptyScopes);
        }

        finish(errors, || OAuth2Request {
            description: self.description.trim().to_string(),
            client_id: self.client_id.trim().to_string(),
            client_secret: Some(self.client_secret.trim().to_string()).filter(|s| !s.is_empty()),
            auth_url: self.auth_url.trim().to_string(),
            token_url: self.token_url.trim().to_string(),
            redirect_uri: self.redirect_uri.trim().to_string(),
            scopes,
            extra_params: parse_extra_params(&self.extra_params),
            enabled: self.enabled,
            use_proxy: self.use_proxy,
        })
    }
}

/// `key=value` pairs split on semicolons and new lines; pairs without `=` are ignored.
fn parse_extra_params(input: &str) -> BTreeMap<String, String> {
    input
        .split(['\n', ';'])
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn google() -> OAuth2Form {
        OAuth2Form {
            description: "google".into(),
            client_id: "client".into(),
            client_secret: "secret".into(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".into(),
            token_url: "https://oauth2.googleapis.com/token".into(),
            redirect_uri: "http://localhost:15630/oauth2/callback".into(),
            scopes: "https://mail.google.com/, openid\nemail".into(),
            extra_params: "access_type=offline\nprompt = consent\nbogus".into(),
            ..OAuth2Form::default()
        }
    }

    #[test]
    fn test_scopes_split_on_whitespace_and_commas() {
        assert_eq!(
            google().scope_list(),
            ["https://mail.google.com/", "openid", "email"]
        );
    }

    #[test]
    fn test_valid_request() {
        let request = google().validate().unwrap();
        assert_eq!(request.client_secret.as_deref(), Some("secret"));
        assert_eq!(request.extra_params.len(), 2);
        assert_eq!(
            request.extra_params.get("prompt").map(String::as_str),
            Some("consent")
        );
    }

    #[test]
    fn test_invalid_urls_and_scopes() {
        let form = OAuth2Form {
            auth_url: "accounts.google.com".into(),
            redirect_uri: "urn:ietf:wg:oauth:2.0:oob".into(),
            scopes: " , ".into(),
            ..google()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            [
                ValidationError::InvalidAuthUrl,
                ValidationError::InvalidRedirectUri,
                ValidationError::EmptyScopes
            ]
        );
    }

    #[test]
    fn test_extra_params_on_one_line() {
        let form = OAuth2Form {
            extra_params: "access_type=offline; prompt=consent;".into(),
            ..google()
        };
        let params = form.validate().unwrap().extra_params;
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("access_type").map(String::as_str), Some("offline"));
    }

    #[test]
    fn test_edit_without_secret() {
        let form = OAuth2Form {
            oauth2_id: Some(1),
            client_secret: String::new(),
            ..google()
        };
        assert!(form.validate().unwrap().client_secret.is_none());
    }
}
