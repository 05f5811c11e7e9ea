//! Event hook form.

use std::collections::{BTreeMap, BTreeSet};

use rustmailer_console_api::types::{
    EventHook, EventHookRequest, EventType, HookType, HttpConfig, HttpMethod, NatsAuthType,
    NatsConfig,
};

use super::{ValidationError, ValidationResult, finish, is_url_with_scheme, non_blank, parse_port};

/// NATS authentication section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NatsAuthForm {
    /// No authentication.
    #[default]
    None,
    /// Token authentication.
    Token(String),
    /// Username and password.
    Password {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
}

impl NatsAuthForm {
    /// Auth type discriminant.
    #[must_use]
    pub const fn auth_type(&self) -> NatsAuthType {
        match self {
            Self::None => NatsAuthType::None,
            Self::Token(_) => NatsAuthType::Token,
            Self::Password { .. } => NatsAuthType::Password,
        }
    }

    /// Switches the auth type, clearing credentials when it changes.
    pub fn set_auth_type(&mut self, auth_type: NatsAuthType) {
        if self.auth_type() == auth_type {
            return;
        }
        *self = match auth_type {
            NatsAuthType::None => Self::None,
            NatsAuthType::Token => Self::Token(String::new()),
            NatsAuthType::Password => Self::Password {
                username: String::new(),
                password: String::new(),
            },
        };
    }
}

/// Delivery channel section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookChannelForm {
    /// HTTP webhook.
    Http {
        /// Target URL.
        target_url: String,
        /// HTTP method.
        method: HttpMethod,
        /// Custom headers, one `Name: value` per line.
        headers: String,
    },
    /// NATS publisher.
    Nats {
        /// Host.
        host: String,
        /// Port as typed.
        port: String,
        /// Authentication.
        auth: NatsAuthForm,
        /// Stream name.
        stream_name: String,
        /// Subject namespace.
        namespace: String,
    },
}

impl Default for HookChannelForm {
    fn default() -> Self {
        Self::Http {
            target_url: String::new(),
            method: HttpMethod::Post,
            headers: String::new(),
        }
    }
}

impl HookChannelForm {
    /// Hook type discriminant.
    #[must_use]
    pub const fn hook_type(&self) -> HookType {
        match self {
            Self::Http { .. } => HookType::Http,
            Self::Nats { .. } => HookType::Nats,
        }
    }

    fn nats_default() -> Self {
        Self::Nats {
            host: String::new(),
            port: "4222".to_string(),
            auth: NatsAuthForm::None,
            stream_name: String::new(),
            namespace: String::new(),
        }
    }
}

/// Add/edit hook form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookForm {
    /// Hook being edited; `None` when adding.
    pub hook_id: Option<u64>,
    /// Account to bind to; `None` makes the hook global.
    pub account_id: Option<u64>,
    /// Description.
    pub description: String,
    /// Whether the hook is active.
    pub enabled: bool,
    /// Delivery channel.
    pub channel: HookChannelForm,
    /// VRL script source.
    pub vrl_script: String,
    /// Watched events.
    pub watched_events: BTreeSet<EventType>,
}

impl Default for HookForm {
    fn default() -> Self {
        Self {
            hook_id: None,
            account_id: None,
            description: String::new(),
            enabled: true,
            channel: HookChannelForm::default(),
            vrl_script: String::new(),
            watched_events: BTreeSet::new(),
        }
    }
}

impl HookForm {
    /// Creates an empty add form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills an edit form from a stored hook.
    #[must_use]
    pub fn from_hook(hook: &EventHook) -> Self {
        let channel = match (hook.hook_type, &hook.http, &hook.nats) {
            (HookType::Http, Some(http), _) => HookChannelForm::Http {
                target_url: http.target_url.clone(),
                method: http.http_method,
                headers: format_headers(&http.custom_headers),
            },
            (HookType::Nats, _, Some(nats)) => HookChannelForm::Nats {
                host: nats.host.clone(),
                port: nats.port.to_string(),
                auth: match nats.auth_type {
                    NatsAuthType::None => NatsAuthForm::None,
                    NatsAuthType::Token => {
                        NatsAuthForm::Token(nats.token.clone().unwrap_or_default())
                    }
                    NatsAuthType::Password => NatsAuthForm::Password {
                        username: nats.username.clone().unwrap_or_default(),
                        password: nats.password.clone().unwrap_or_default(),
                    },
                },
                stream_name: nats.stream_name.clone(),
                namespace: nats.namespace.clone(),
            },
            (HookType::Http, None, _) => HookChannelForm::default(),
            (HookType::Nats, _, None) => HookChannelForm::nats_default(),
        };

        Self {
            hook_id: Some(hook.id),
            account_id: if hook.global { None } else { hook.account_id },
            description: hook.description.clone().unwrap_or_default(),
            enabled: hook.enabled,
            channel,
            vrl_script: hook.vrl_script.clone().unwrap_or_default(),
            watched_events: hook.watched_events.iter().copied().collect(),
        }
    }

    /// Switches the delivery channel, resetting its section when it changes.
    pub fn set_hook_type(&mut self, hook_type: HookType) {
        if self.channel.hook_type() == hook_type {
            return;
        }
        self.channel = match hook_type {
            HookType::Http => HookChannelForm::default(),
            HookType::Nats => HookChannelForm::nats_default(),
        };
    }

    /// Adds or removes a watched event.
    pub fn toggle_event(&mut self, event: EventType) {
        if !self.watched_events.remove(&event) {
            self.watched_events.insert(event);
        }
    }

    /// Whether the hook fires for every account.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.account_id.is_none()
    }

    /// Validates the form.
    ///
    /// # Errors
    ///
    /// Returns every invalid field.
    pub fn validate(&self) -> ValidationResult<EventHookRequest> {
        let mut errors = Vec::new();

        let (http, nats) = match &self.channel {
            HookChannelForm::Http {
                target_url,
                method,
                headers,
            } => {
                if target_url.trim().is_empty() {
                    errors.push(ValidationError::EmptyHookUrl);
                } else if !is_url_with_scheme(target_url, &["http", "https"]) {
                    errors.push(ValidationError::InvalidHookUrl);
                }
                let custom_headers = parse_headers(headers).unwrap_or_else(|| {
                    errors.push(ValidationError::InvalidHeader);
                    BTreeMap::new()
                });
                let http = HttpConfig {
                    target_url: target_url.trim().to_string(),
                    http_method: *method,
                    custom_headers,
                };
                (Some(http), None)
            }
            HookChannelForm::Nats {
                host,
                port,
                auth,
                stream_name,
                namespace,
            } => {
                if host.trim().is_empty() {
                    errors.push(ValidationError::EmptyNatsHost);
                }
                let port = parse_port(port).unwrap_or_else(|| {
                    errors.push(ValidationError::InvalidNatsPort);
                    0
                });
                if namespace.trim().is_empty() {
                    errors.push(ValidationError::EmptyNatsNamespace);
                }
                if stream_name.trim().is_empty() {
                    errors.push(ValidationError::EmptyNatsStream);
                }

                let mut nats = NatsConfig {
                    host: host.trim().to_string(),
                    port,
                    auth_type: auth.auth_type(),
                    stream_name: stream_name.trim().to_string(),
                    namespace: namespace.trim().to_string(),
                    ..NatsConfig::default()
                };
                match auth {
                    NatsAuthForm::None => {}
                    NatsAuthForm::Token(token) => {
                        nats.token = non_blank(token);
                        if nats.token.is_none() {
                            errors.push(ValidationError::EmptyNatsToken);
                        }
                    }
                    NatsAuthForm::Password { username, password } => {
                        nats.username = non_blank(username);
                        if nats.username.is_none() {
                            errors.push(ValidationError::EmptyNatsUsername);
                        }
                        if password.is_empty() {
                            errors.push(ValidationError::EmptyNatsPassword);
                        }
                        nats.password = Some(password.clone());
                    }
                }
                (None, Some(nats))
            }
        };

        if !self.is_global() && self.watched_events.is_empty() {
            errors.push(ValidationError::NoWatchedEvents);
        }

        finish(errors, || EventHookRequest {
            account_id: self.account_id,
            description: non_blank(&self.description),
            enabled: self.enabled,
            hook_type: self.channel.hook_type(),
            http,
            nats,
            vrl_script: non_blank(&self.vrl_script),
            watched_events: self.watched_events.iter().copied().collect(),
        })
    }
}

/// Parses `Name: value` lines. Blank lines are skipped.
fn parse_headers(input: &str) -> Option<BTreeMap<String, String>> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (name, value) = line.split_once(':')?;
            let name = name.trim();
            (!name.is_empty() && !name.contains(char::is_whitespace))
                .then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn format_headers(headers: &BTreeMap<String, String>) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_http_hook() {
        let mut form = HookForm::new();
        form.account_id = Some(1);
        form.channel = HookChannelForm::Http {
            target_url: "https://hooks.example.com/mail".into(),
            method: HttpMethod::Put,
            headers: "X-Token: abc\n\nX-Env: prod".into(),
        };
        form.toggle_event(EventType::EmailAddedToFolder);

        let request = form.validate().unwrap();
        assert_eq!(request.hook_type, HookType::Http);
        let http = request.http.unwrap();
        assert_eq!(http.http_method, HttpMethod::Put);
        assert_eq!(http.custom_headers.get("X-Env").map(String::as_str), Some("prod"));
        assert!(request.nats.is_none());
        assert_eq!(request.watched_events, [EventType::EmailAddedToFolder]);
    }

    #[test]
    fn test_http_hook_errors() {
        let mut form = HookForm::new();
        form.account_id = Some(1);
        form.channel = HookChannelForm::Http {
            target_url: "ftp://example.com".into(),
            method: HttpMethod::Post,
            headers: "broken header".into(),
        };
        assert_eq!(
            form.validate().unwrap_err(),
            [
                ValidationError::InvalidHookUrl,
                ValidationError::InvalidHeader,
                ValidationError::NoWatchedEvents
            ]
        );
    }

    #[test]
    fn test_global_hook_may_watch_nothing() {
        let mut form = HookForm::new();
        form.channel = HookChannelForm::Http {
            target_url: "http://localhost:8080".into(),
            method: HttpMethod::Post,
            headers: String::new(),
        };
        assert!(form.is_global());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_nats_auth_discriminants() {
        let mut form = HookForm::new();
        form.set_hook_type(HookType::Nats);
        let HookChannelForm::Nats { auth, .. } = &mut form.channel else {
            panic!("expected NATS channel");
        };
        auth.set_auth_type(NatsAuthType::Token);

        let errors = form.validate().unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyNatsHost));
        assert!(errors.contains(&ValidationError::EmptyNatsNamespace));
        assert!(errors.contains(&ValidationError::EmptyNatsToken));
        assert!(!errors.contains(&ValidationError::InvalidNatsPort));
        assert!(!errors.contains(&ValidationError::EmptyNatsUsername));
    }

    #[test]
    fn test_nats_password_hook() {
        let mut form = HookForm::new();
        form.channel = HookChannelForm::Nats {
            host: "nats.local".into(),
            port: "4222".into(),
            auth: NatsAuthForm::Password {
                username: "mailer".into(),
                password: "pw".into(),
            },
            stream_name: "mail".into(),
            namespace: "rustmailer".into(),
        };
        form.vrl_script = ". = .payload".into();
        let request = form.validate().unwrap();
        let nats = request.nats.unwrap();
        assert_eq!(nats.auth_type, NatsAuthType::Password);
        assert_eq!(nats.username.as_deref(), Some("mailer"));
        assert!(nats.token.is_none());
        assert_eq!(request.vrl_script.as_deref(), Some(". = .payload"));
    }

    #[test]
    fn test_from_hook_round_trip() {
        let hook: EventHook = serde_json::from_value(serde_json::json!({
            "id": 4,
            "account_id": 2,
            "hook_type": "Http",
            "enabled": true,
            "http": {"target_url": "https://x.test/h", "http_method": "Post",
                     "custom_headers": {"A": "1"}},
            "watched_events": ["EmailBounce"]
        }))
        .unwrap();
        let form = HookForm::from_hook(&hook);
        assert_eq!(form.hook_id, Some(4));
        let request = form.validate().unwrap();
        assert_eq!(request.account_id, Some(2));
        assert_eq!(request.http.unwrap().custom_headers.len(), 1);
    }
}
