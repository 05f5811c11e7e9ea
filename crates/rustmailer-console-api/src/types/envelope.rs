//! Message envelopes, pages and message actions.

use serde::{Deserialize, Serialize};

/// An email address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Addr {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Address (`local@domain`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Addr {
    /// Creates an address without display name.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: Some(address.into()),
        }
    }

    /// Creates an address with a display name.
    #[must_use]
    pub fn named(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: Some(address.into()),
        }
    }
}

/// Message flags as the server reports them.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum EnvelopeFlag {
    /// Message has been read.
    Seen,
    /// Message has been answered.
    Answered,
    /// Message is flagged for attention.
    Flagged,
    /// Message is marked for deletion.
    Deleted,
    /// Message is a draft.
    Draft,
    /// Message arrived since the last session.
    Recent,
    /// Keywords can be created.
    MayCreate,
    /// Server or user keyword.
    Custom(String),
}

impl EnvelopeFlag {
    /// Parses a flag name as typed by a user; unknown names become keywords.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().trim_start_matches('\\').to_ascii_lowercase().as_str() {
            "seen" => Self::Seen,
            "answered" => Self::Answered,
            "flagged" => Self::Flagged,
            "deleted" => Self::Deleted,
            "draft" => Self::Draft,
            "recent" => Self::Recent,
            _ => Self::Custom(name.trim().to_string()),
        }
    }
}

/// Attachment metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentInfo {
    /// File name.
    pub filename: Option<String>,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Whether the attachment is inline (referenced from HTML).
    pub inline: bool,
    /// Content-ID for inline parts.
    pub content_id: Option<String>,
}

/// Metadata about one body part.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyPartMeta {
    /// Part id within the MIME tree.
    pub id: String,
    /// `Plain` or `Html`.
    pub part_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// Message envelope (headers, flags and attachment list, no body).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailEnvelope {
    /// Server-wide envelope id.
    pub id: String,
    /// Owning account.
    pub account_id: u64,
    /// Containing mailbox id.
    pub mailbox_id: u64,
    /// Containing mailbox name.
    pub mailbox_name: String,
    /// IMAP UID (0 for Gmail API accounts).
    pub uid: u32,
    /// Size in bytes.
    pub size: u32,
    /// Flags.
    pub flags: Vec<EnvelopeFlag>,
    /// Subject.
    pub subject: Option<String>,
    /// Date header (ms since epoch).
    pub date: Option<i64>,
    /// Server arrival time (ms since epoch).
    pub internal_date: Option<i64>,
    /// Sender.
    pub from: Option<Addr>,
    /// Recipients.
    pub to: Option<Vec<Addr>>,
    /// Carbon-copy recipients.
    pub cc: Option<Vec<Addr>>,
    /// Blind carbon-copy recipients.
    pub bcc: Option<Vec<Addr>>,
    /// Reply-To addresses.
    pub reply_to: Option<Vec<Addr>>,
    /// Message-ID header.
    pub message_id: Option<String>,
    /// In-Reply-To header.
    pub in_reply_to: Option<String>,
    /// Thread id.
    pub thread_id: Option<u64>,
    /// Attachments.
    pub attachments: Option<Vec<AttachmentInfo>>,
    /// Body part metadata.
    pub body_meta: Option<Vec<BodyPartMeta>>,
    /// Short text preview.
    pub preview: Option<String>,
}

impl EmailEnvelope {
    /// Whether the message has been read.
    #[must_use]
    pub fn is_seen(&self) -> bool {
        self.flags.contains(&EnvelopeFlag::Seen)
    }

    /// Whether the message is flagged.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.flags.contains(&EnvelopeFlag::Flagged)
    }

    /// Whether the message has at least one non-inline attachment.
    #[must_use]
    pub fn has_attachments(&self) -> bool {
        self.attachments
            .as_ref()
            .is_some_and(|list| list.iter().any(|a| !a.inline))
    }
}

/// A page of results from a list or search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPage<T> {
    /// 1-based page number, when the server counts pages.
    #[serde(default)]
    pub current_page: Option<u64>,
    /// Requested page size.
    #[serde(default)]
    pub page_size: Option<u64>,
    /// Total number of matching items.
    #[serde(default)]
    pub total_items: u64,
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: Option<u64>,
    /// Token for the next page; absent on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl<T> DataPage<T> {
    /// Creates a page from items and an optional continuation token.
    #[must_use]
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            current_page: None,
            page_size: None,
            total_items: items.len() as u64,
            items,
            total_pages: None,
            next_page_token,
        }
    }
}

/// Query for listing a mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListMessagesQuery {
    /// Mailbox name.
    pub mailbox: String,
    /// Continuation token from the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Page size.
    pub page_size: u64,
    /// Query the mail server instead of the local cache.
    pub remote: bool,
    /// Newest first.
    pub desc: bool,
}

/// Body of a message search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    /// Filter expression.
    pub search: crate::types::SearchExpr,
    /// Mailbox to search; `None` searches all mailboxes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailbox: Option<String>,
    /// Continuation token from the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Page size.
    pub page_size: u64,
    /// Newest first.
    pub desc: bool,
}

/// Move messages between mailboxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxTransferRequest {
    /// Messages to move.
    pub uids: Vec<u32>,
    /// Source mailbox.
    pub current_mailbox: String,
    /// Destination mailbox.
    pub target_mailbox: String,
}

/// Flags to add and remove.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlagAction {
    /// Flags to add.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add: Option<Vec<EnvelopeFlag>>,
    /// Flags to remove.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove: Option<Vec<EnvelopeFlag>>,
}

/// Change flags on messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagMessageRequest {
    /// Messages to change.
    pub uids: Vec<u32>,
    /// Mailbox holding the messages.
    pub mailbox: String,
    /// Flags to add/remove.
    pub action: FlagAction,
}

/// Delete messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDeleteRequest {
    /// Messages to delete.
    pub uids: Vec<u32>,
    /// Mailbox holding the messages.
    pub mailbox: String,
}

/// Full body of a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageContent {
    /// Plain-text body.
    pub plain: Option<String>,
    /// HTML body.
    pub html: Option<String>,
    /// Whether the plain body was truncated by the server.
    pub truncated: bool,
}

/// An attachment to upload with an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingAttachment {
    /// File name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Base64-encoded content.
    pub base64_content: String,
    /// Inline attachment.
    pub inline: bool,
}

impl OutgoingAttachment {
    /// Size of the decoded content in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        let encoded = self.base64_content.trim_end();
        let padding = encoded.bytes().rev().take_while(|b| *b == b'=').count();
        ((encoded.len() / 4 * 3).saturating_sub(padding)) as u64
    }
}

/// Send a new message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendEmailRequest {
    /// Recipients.
    pub to: Vec<Addr>,
    /// Carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Addr>,
    /// Blind carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Addr>,
    /// Subject.
    pub subject: String,
    /// Plain-text body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// HTML body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Attachments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<OutgoingAttachment>,
}

/// Reply to an existing message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplyEmailRequest {
    /// Mailbox of the original message.
    pub mailbox_name: String,
    /// UID of the original message.
    pub uid: u32,
    /// Reply to all recipients.
    pub reply_all: bool,
    /// Extra carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Addr>,
    /// Extra blind carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Addr>,
    /// Plain-text body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// HTML body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Attachments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<OutgoingAttachment>,
}

/// Forward an existing message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForwardEmailRequest {
    /// Mailbox of the original message.
    pub mailbox_name: String,
    /// UID of the original message.
    pub uid: u32,
    /// Recipients.
    pub to: Vec<Addr>,
    /// Carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Addr>,
    /// Blind carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Addr>,
    /// Plain-text note placed above the forwarded message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// HTML note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Attachments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<OutgoingAttachment>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_parse() {
        assert_eq!(EnvelopeFlag::parse("\\Seen"), EnvelopeFlag::Seen);
        assert_eq!(EnvelopeFlag::parse("flagged"), EnvelopeFlag::Flagged);
        assert_eq!(
            EnvelopeFlag::parse("$Important"),
            EnvelopeFlag::Custom("$Important".into())
        );
    }

    #[test]
    fn test_attachment_size() {
        let attachment = |content: &str| OutgoingAttachment {
            file_name: "a.txt".into(),
            mime_type: "text/plain".into(),
            base64_content: content.into(),
            inline: false,
        };
        // "hello" and "hi!"
        assert_eq!(attachment("aGVsbG8=").size(), 5);
        assert_eq!(attachment("aGkh").size(), 3);
        assert_eq!(attachment("").size(), 0);
    }

    #[test]
    fn test_custom_flag_wire_format() {
        let json = serde_json::to_string(&EnvelopeFlag::Custom("Later".into())).unwrap();
        assert_eq!(json, r#"{"Custom":"Later"}"#);
        let seen: EnvelopeFlag = serde_json::from_str(r#""Seen""#).unwrap();
        assert_eq!(seen, EnvelopeFlag::Seen);
    }

    #[test]
    fn test_envelope_defaults_tolerate_sparse_json() {
        let envelope: EmailEnvelope = serde_json::from_str(
            r#"{"id":"a1","uid":42,"mailbox_name":"INBOX","flags":["Seen"]}"#,
        )
        .unwrap();
        assert_eq!(envelope.uid, 42);
        assert!(envelope.is_seen());
        assert!(!envelope.is_flagged());
        assert!(!envelope.has_attachments());
    }

    #[test]
    fn test_inline_attachments_do_not_count() {
        let envelope = EmailEnvelope {
            attachments: Some(vec![AttachmentInfo {
                inline: true,
                ..Default::default()
            }]),
            ..Default::default()
        };
        assert!(!envelope.has_attachments());
    }

    #[test]
    fn test_data_page_token() {
        let page: DataPage<u32> =
            serde_json::from_str(r#"{"items":[1,2],"total_items":40,"next_page_token":"T1"}"#)
                .unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.next_page_token.as_deref(), Some("T1"));
    }

    #[test]
    fn test_list_query_skips_missing_token() {
        let query = ListMessagesQuery {
            mailbox: "INBOX".into(),
            next_page_token: None,
            page_size: 20,
            remote: false,
            desc: true,
        };
        let json = serde_json::to_value(&query).unwrap();
        assert!(json.get("next_page_token").is_none());
    }
}
