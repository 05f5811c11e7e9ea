//! Event hooks (HTTP webhooks and NATS publishers) and VRL script testing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Delivery channel of a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HookType {
    /// HTTP webhook.
    #[default]
    Http,
    /// NATS JetStream publisher.
    Nats,
}

/// HTTP method used for webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HttpMethod {
    /// POST.
    #[default]
    Post,
    /// PUT.
    Put,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Post => "POST",
            Self::Put => "PUT",
        })
    }
}

/// Webhook settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Target URL.
    pub target_url: String,
    /// HTTP method.
    pub http_method: HttpMethod,
    /// Extra request headers.
    #[serde(default)]
    pub custom_headers: BTreeMap<String, String>,
}

/// NATS authentication mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NatsAuthType {
    /// No authentication.
    #[default]
    None,
    /// Token authentication.
    Token,
    /// Username/password.
    Password,
}

/// NATS publisher settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NatsConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Authentication mode.
    pub auth_type: NatsAuthType,
    /// Token for [`NatsAuthType::Token`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Username for [`NatsAuthType::Password`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password for [`NatsAuthType::Password`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// JetStream stream name.
    pub stream_name: String,
    /// Subject namespace.
    pub namespace: String,
}

/// Events a hook can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    /// New message in a mailbox.
    EmailAddedToFolder,
    /// Flags changed on a message.
    EmailFlagsChanged,
    /// Outbound message delivered to the MTA.
    EmailSentSuccess,
    /// Outbound message failed.
    EmailSendingError,
    /// Mailbox UIDVALIDITY changed.
    UIDValidityChange,
    /// Mailbox deleted.
    MailboxDeletion,
    /// Mailbox created.
    MailboxCreation,
    /// Initial account sync finished.
    AccountFirstSyncCompleted,
    /// Bounce received.
    EmailBounce,
    /// Feedback report received.
    EmailFeedBackReport,
    /// Tracked message opened.
    EmailOpened,
    /// Tracked link clicked.
    EmailLinkClicked,
}

impl EventType {
    /// Every event type, in display order.
    pub const ALL: [Self; 12] = [
        Self::EmailAddedToFolder,
        Self::EmailFlagsChanged,
        Self::EmailSentSuccess,
        Self::EmailSendingError,
        Self::UIDValidityChange,
        Self::MailboxDeletion,
        Self::MailboxCreation,
        Self::AccountFirstSyncCompleted,
        Self::EmailBounce,
        Self::EmailFeedBackReport,
        Self::EmailOpened,
        Self::EmailLinkClicked,
    ];
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Hook as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventHook {
    /// Hook id.
    pub id: u64,
    /// Account the hook is bound to (absent for global hooks).
    #[serde(default)]
    pub account_id: Option<u64>,
    /// Account email, for display.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time (ms since epoch).
    #[serde(default)]
    pub created_at: i64,
    /// Last update time (ms since epoch).
    #[serde(default)]
    pub updated_at: i64,
    /// Whether the hook fires for every account.
    #[serde(default)]
    pub global: bool,
    /// Whether the hook is active.
    #[serde(default)]
    pub enabled: bool,
    /// Delivery channel.
    pub hook_type: HookType,
    /// HTTP settings.
    #[serde(default)]
    pub http: Option<HttpConfig>,
    /// NATS settings.
    #[serde(default)]
    pub nats: Option<NatsConfig>,
    /// VRL transform applied to the payload.
    #[serde(default)]
    pub vrl_script: Option<String>,
    /// Total invocations.
    #[serde(default)]
    pub call_count: u64,
    /// Successful deliveries.
    #[serde(default)]
    pub success_count: u64,
    /// Failed deliveries.
    #[serde(default)]
    pub failure_count: u64,
    /// Last delivery error.
    #[serde(default)]
    pub last_error: Option<String>,
    /// Events the hook subscribes to.
    #[serde(default)]
    pub watched_events: Vec<EventType>,
}

/// Create or update a hook. Updates send the full record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventHookRequest {
    /// Account to bind to; `None` creates a global hook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the hook is active.
    pub enabled: bool,
    /// Delivery channel.
    pub hook_type: HookType,
    /// HTTP settings (required for [`HookType::Http`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpConfig>,
    /// NATS settings (required for [`HookType::Nats`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nats: Option<NatsConfig>,
    /// VRL transform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vrl_script: Option<String>,
    /// Events to subscribe to.
    pub watched_events: Vec<EventType>,
}

/// Evaluate a VRL program against a sample event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrlScriptTestRequest {
    /// VRL source.
    pub program: String,
    /// Event payload to run against; the server picks a sample when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<serde_json::Value>,
}

/// Result of a VRL evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveResult {
    /// Transformed payload.
    pub result: Option<serde_json::Value>,
    /// Compile or runtime error.
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_request_wire_format() {
        let request = EventHookRequest {
            enabled: true,
            hook_type: HookType::Nats,
            nats: Some(NatsConfig {
                host: "nats.local".into(),
                port: 4222,
                stream_name: "mail".into(),
                namespace: "rustmailer".into(),
                ..Default::default()
            }),
            watched_events: vec![EventType::EmailAddedToFolder],
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["hook_type"], "Nats");
        assert_eq!(json["nats"]["auth_type"], "None");
        assert!(json.get("http").is_none());
        assert_eq!(json["watched_events"][0], "EmailAddedToFolder");
    }

    #[test]
    fn test_resolve_result_error() {
        let result: ResolveResult =
            serde_json::from_str(r#"{"error":"unexpected token"}"#).unwrap();
        assert!(result.result.is_none());
        assert_eq!(result.error.as_deref(), Some("unexpected token"));
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
    }
}
