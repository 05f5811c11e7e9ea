//! Compose drafts: new messages, replies and forwards.

use std::path::Path;

use base64::Engine;
use chrono::{DateTime, Utc};
use rustmailer_console_api::ApiClient;
use rustmailer_console_api::types::{
    Addr, EmailEnvelope, ForwardEmailRequest, OutgoingAttachment, ReplyEmailRequest,
    SendEmailRequest,
};
use tracing::{debug, info};

use crate::address::{AddressError, display_label, format_address_line, parse_address_list};
use crate::error::Result;

/// What kind of message is being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeMode {
    /// Fresh message.
    #[default]
    New,
    /// Reply to the sender.
    Reply,
    /// Reply to the sender and every other recipient.
    ReplyAll,
    /// Forward to new recipients.
    Forward,
}

/// The stored message a reply or forward refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    /// Mailbox holding the message.
    pub mailbox_name: String,
    /// Message UID.
    pub uid: u32,
}

/// Compose window contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    /// Sending account.
    pub account_id: u64,
    /// Compose mode.
    pub mode: ComposeMode,
    /// Original message for replies and forwards.
    pub source: Option<MessageRef>,
    /// To line as typed.
    pub to: String,
    /// Cc line as typed.
    pub cc: String,
    /// Bcc line as typed.
    pub bcc: String,
    /// Subject.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Attachments already read from disk.
    pub attachments: Vec<OutgoingAttachment>,
}

/// Why a draft cannot be sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    /// No recipient at all.
    #[error("Please enter at least one recipient")]
    NoRecipients,
    /// A recipient line has an unparsable entry.
    #[error("{field}: {source}")]
    InvalidAddress {
        /// Which line (`To`, `Cc`, `Bcc`).
        field: &'static str,
        /// The offending entry.
        source: AddressError,
    },
    /// New messages need a subject.
    #[error("Please enter a subject")]
    EmptySubject,
    /// Reply or forward without an original message.
    #[error("The original message is no longer available")]
    MissingSource,
}

/// A validated draft, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingDraft {
    /// New message.
    Send(SendEmailRequest),
    /// Reply or reply-all.
    Reply(ReplyEmailRequest),
    /// Forward.
    Forward(ForwardEmailRequest),
}

impl OutgoingDraft {
    /// Submits the draft on behalf of `account_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn submit(&self, client: &ApiClient, account_id: u64) -> Result<()> {
        match self {
            Self::Send(request) => client.send_message(account_id, request).await?,
            Self::Reply(request) => client.reply_message(account_id, request).await?,
            Self::Forward(request) => client.forward_message(account_id, request).await?,
        }
        info!("Submitted draft for account {account_id}");
        Ok(())
    }
}

impl Draft {
    /// Empty draft for `account_id`.
    #[must_use]
    pub fn new(account_id: u64) -> Self {
        Self {
            account_id,
            ..Self::default()
        }
    }

    /// Reply (or reply-all) draft for `envelope`.
    ///
    /// `own_address` is removed from the recipients of a reply-all.
    #[must_use]
    pub fn reply(
        account_id: u64,
        envelope: &EmailEnvelope,
        body: Option<&str>,
        own_address: &str,
        reply_all: bool,
    ) -> Self {
        let (to, cc) = reply_recipients(envelope, own_address, reply_all);
        Self {
            account_id,
            mode: if reply_all {
                ComposeMode::ReplyAll
            } else {
                ComposeMode::Reply
            },
            source: Some(message_ref(envelope)),
            to: format_address_line(&to),
            cc: format_address_line(&cc),
            subject: reply_subject(envelope.subject.as_deref().unwrap_or_default()),
            body: body.map(|b| quote_body(b, envelope)).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Forward draft for `envelope`.
    #[must_use]
    pub fn forward(account_id: u64, envelope: &EmailEnvelope, body: Option<&str>) -> Self {
        let from = envelope
            .from
            .as_ref()
            .map(display_label)
            .unwrap_or_default();
        let body = format!(
            "\n\n---------- Forwarded message ----------\nFrom: {from}\nDate: {}\nSubject: {}\n\n{}",
            format_date(envelope.date),
            envelope.subject.as_deref().unwrap_or_default(),
            body.unwrap_or_default(),
        );
        Self {
            account_id,
            mode: ComposeMode::Forward,
            source: Some(message_ref(envelope)),
            subject: forward_subject(envelope.subject.as_deref().unwrap_or_default()),
            body,
            ..Self::default()
        }
    }

    /// Key under which this draft's editor content is kept locally.
    #[must_use]
    pub fn storage_key(&self) -> String {
        match &self.source {
            Some(source) => format!(
                "draft:{}:{}:{}",
                self.account_id, source.mailbox_name, source.uid
            ),
            None => format!("draft:{}:new", self.account_id),
        }
    }

    /// Removes the attachment at `index`, if any.
    pub fn remove_attachment(&mut self, index: usize) {
        if index < self.attachments.len() {
            self.attachments.remove(index);
        }
    }

    /// Validates the draft into the request matching its mode.
    ///
    /// # Errors
    ///
    /// See [`ComposeError`].
    pub fn validate(&self) -> std::result::Result<OutgoingDraft, ComposeError> {
        let to = parse_line("To", &self.to)?;
        let cc = parse_line("Cc", &self.cc)?;
        let bcc = parse_line("Bcc", &self.bcc)?;
        if to.is_empty() && cc.is_empty() && bcc.is_empty() {
            return Err(ComposeError::NoRecipients);
        }

        let text = Some(self.body.clone()).filter(|b| !b.trim().is_empty());
        let attachments = self.attachments.clone();

        match self.mode {
            ComposeMode::New => {
                if self.subject.trim().is_empty() {
                    return Err(ComposeError::EmptySubject);
                }
                Ok(OutgoingDraft::Send(SendEmailRequest {
                    to,
                    cc,
                    bcc,
                    subject: self.subject.trim().to_string(),
                    text,
                    html: None,
                    attachments,
                }))
            }
            ComposeMode::Reply | ComposeMode::ReplyAll => {
                let source = self.source.as_ref().ok_or(ComposeError::MissingSource)?;
                Ok(OutgoingDraft::Reply(ReplyEmailRequest {
                    mailbox_name: source.mailbox_name.clone(),
                    uid: source.uid,
                    reply_all: self.mode == ComposeMode::ReplyAll,
                    cc,
                    bcc,
                    text,
                    html: None,
                    attachments,
                }))
            }
            ComposeMode::Forward => {
                let source = self.source.as_ref().ok_or(ComposeError::MissingSource)?;
                if to.is_empty() {
                    return Err(ComposeError::NoRecipients);
                }
                Ok(OutgoingDraft::Forward(ForwardEmailRequest {
                    mailbox_name: source.mailbox_name.clone(),
                    uid: source.uid,
                    to,
                    cc,
                    bcc,
                    text,
                    html: None,
                    attachments,
                }))
            }
        }
    }
}

fn parse_line(
    field: &'static str,
    input: &str,
) -> std::result::Result<Vec<Addr>, ComposeError> {
    parse_address_list(input).map_err(|source| ComposeError::InvalidAddress { field, source })
}

fn message_ref(envelope: &EmailEnvelope) -> MessageRef {
    MessageRef {
        mailbox_name: envelope.mailbox_name.clone(),
        uid: envelope.uid,
    }
}

/// `Re: subject`, unless it already starts with `Re:`.
#[must_use]
pub fn reply_subject(subject: &str) -> String {
    prefixed("Re:", subject)
}

/// `Fwd: subject`, unless it already starts with `Fwd:` or `Fw:`.
#[must_use]
pub fn forward_subject(subject: &str) -> String {
    if has_prefix(subject, "Fw:") {
        return subject.trim().to_string();
    }
    prefixed("Fwd:", subject)
}

fn prefixed(prefix: &str, subject: &str) -> String {
    let subject = subject.trim();
    if has_prefix(subject, prefix) {
        subject.to_string()
    } else {
        format!("{prefix} {subject}")
    }
}

fn has_prefix(subject: &str, prefix: &str) -> bool {
    subject
        .trim()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Recipients of a reply as `(to, cc)`.
///
/// The reply goes to `Reply-To` when present, else `From`. A reply-all also
/// copies the original To and Cc, minus `own_address` and duplicates.
#[must_use]
pub fn reply_recipients(
    envelope: &EmailEnvelope,
    own_address: &str,
    reply_all: bool,
) -> (Vec<Addr>, Vec<Addr>) {
    let primary: Vec<Addr> = match &envelope.reply_to {
        Some(reply_to) if !reply_to.is_empty() => reply_to.clone(),
        _ => envelope.from.iter().cloned().collect(),
    };

    let mut seen: Vec<String> = vec![own_address.trim().to_ascii_lowercase()];
    let mut keep = |addr: &Addr| {
        let Some(key) = addr.address.as_deref().map(|a| a.trim().to_ascii_lowercase()) else {
            return false;
        };
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    };

    let to: Vec<Addr> = primary.into_iter().filter(|a| keep(a)).collect();
    if !reply_all {
        return (to, Vec::new());
    }

    let mut to = to;
    to.extend(
        envelope
            .to
            .iter()
            .flatten()
            .filter(|a| keep(*a))
            .cloned()
            .collect::<Vec<_>>(),
    );
    let cc = envelope
        .cc
        .iter()
        .flatten()
        .filter(|a| keep(*a))
        .cloned()
        .collect();
    (to, cc)
}

/// Quotes `body` under an attribution line.
#[must_use]
pub fn quote_body(body: &str, envelope: &EmailEnvelope) -> String {
    let from = envelope
        .from
        .as_ref()
        .map(display_label)
        .unwrap_or_else(|| "unknown sender".to_string());
    let quoted: Vec<String> = body.lines().map(|line| format!("> {line}")).collect();
    format!(
        "\n\nOn {}, {from} wrote:\n{}",
        format_date(envelope.date),
        quoted.join("\n")
    )
}

fn format_date(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(
            || "an unknown date".to_string(),
            |date| date.format("%a, %b %-d, %Y at %H:%M UTC").to_string(),
        )
}

/// Reads a file and encodes it as an attachment.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub async fn load_attachment(path: &Path) -> Result<OutgoingAttachment> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string();
    debug!("Loaded attachment {file_name} ({} bytes)", bytes.len());
    Ok(OutgoingAttachment {
        mime_type: mime_from_extension(path).to_string(),
        base64_content: base64::engine::general_purpose::STANDARD.encode(&bytes),
        file_name,
        inline: false,
    })
}

/// Guesses a MIME type from the file extension.
#[must_use]
pub fn mime_from_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("txt" | "log") => "text/plain",
        Some("html" | "htm") => "text/html",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("ics") => "text/calendar",
        Some("eml") => "message/rfc822",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn envelope() -> EmailEnvelope {
        EmailEnvelope {
            mailbox_name: "INBOX".into(),
            uid: 42,
            subject: Some("Quarterly report".into()),
            date: Some(1_700_000_000_000),
            from: Some(Addr::named("Alice", "alice@example.com")),
            to: Some(vec![
                Addr::new("me@example.com"),
                Addr::named("Bob", "bob@example.com"),
            ]),
            cc: Some(vec![
                Addr::new("carol@example.com"),
                Addr::new("ALICE@example.com"),
            ]),
            ..EmailEnvelope::default()
        }
    }

    #[test]
    fn test_subject_prefixes_not_duplicated() {
        assert_eq!(reply_subject("Hello"), "Re: Hello");
        assert_eq!(reply_subject("RE: Hello"), "RE: Hello");
        assert_eq!(forward_subject("Hello"), "Fwd: Hello");
        assert_eq!(forward_subject("fwd: Hello"), "fwd: Hello");
        assert_eq!(forward_subject("FW: Hello"), "FW: Hello");
        assert_eq!(reply_subject(""), "Re: ");
    }

    #[test]
    fn test_reply_goes_to_sender() {
        let (to, cc) = reply_recipients(&envelope(), "me@example.com", false);
        assert_eq!(to, [Addr::named("Alice", "alice@example.com")]);
        assert!(cc.is_empty());
    }

    #[test]
    fn test_reply_prefers_reply_to() {
        let envelope = EmailEnvelope {
            reply_to: Some(vec![Addr::new("list@example.com")]),
            ..envelope()
        };
        let (to, _) = reply_recipients(&envelope, "me@example.com", false);
        assert_eq!(to, [Addr::new("list@example.com")]);
    }

    #[test]
    fn test_reply_all_drops_self_and_duplicates() {
        let (to, cc) = reply_recipients(&envelope(), "Me@Example.com", true);
        assert_eq!(
            to,
            [
                Addr::named("Alice", "alice@example.com"),
                Addr::named("Bob", "bob@example.com")
            ]
        );
        assert_eq!(cc, [Addr::new("carol@example.com")]);
    }

    #[test]
    fn test_reply_draft_validates_into_reply_request() {
        let draft = Draft::reply(1, &envelope(), Some("line one\nline two"), "me@example.com", true);
        assert_eq!(draft.mode, ComposeMode::ReplyAll);
        assert_eq!(draft.subject, "Re: Quarterly report");
        assert!(draft.body.contains("Alice wrote:\n> line one\n> line two"));
        assert!(draft.body.contains("Nov 14, 2023"));
        assert_eq!(draft.storage_key(), "draft:1:INBOX:42");

        let OutgoingDraft::Reply(request) = draft.validate().unwrap() else {
            panic!("expected reply");
        };
        assert!(request.reply_all);
        assert_eq!(request.uid, 42);
        assert_eq!(request.cc, [Addr::new("carol@example.com")]);
    }

    #[test]
    fn test_forward_needs_to_recipient() {
        let mut draft = Draft::forward(1, &envelope(), Some("body"));
        assert_eq!(draft.subject, "Fwd: Quarterly report");
        assert!(draft.body.contains("From: Alice"));

        draft.cc = "carol@example.com".into();
        assert_eq!(draft.validate(), Err(ComposeError::NoRecipients));

        draft.to = "Dave <dave@example.com>".into();
        let OutgoingDraft::Forward(request) = draft.validate().unwrap() else {
            panic!("expected forward");
        };
        assert_eq!(request.to, [Addr::named("Dave", "dave@example.com")]);
    }

    #[test]
    fn test_new_draft_validation() {
        let mut draft = Draft::new(3);
        assert_eq!(draft.storage_key(), "draft:3:new");
        assert_eq!(draft.validate(), Err(ComposeError::NoRecipients));

        draft.to = "a@example.com, not-an-address".into();
        assert!(matches!(
            draft.validate(),
            Err(ComposeError::InvalidAddress { field: "To", .. })
        ));

        draft.to = "a@example.com".into();
        assert_eq!(draft.validate(), Err(ComposeError::EmptySubject));

        draft.subject = "Hi".into();
        draft.body = "   ".into();
        let OutgoingDraft::Send(request) = draft.validate().unwrap() else {
            panic!("expected send");
        };
        assert!(request.text.is_none());
    }

    #[test]
    fn test_reply_without_source() {
        let draft = Draft {
            mode: ComposeMode::Reply,
            to: "a@example.com".into(),
            ..Draft::new(1)
        };
        assert_eq!(draft.validate(), Err(ComposeError::MissingSource));
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension(Path::new("report.PDF")), "application/pdf");
        assert_eq!(mime_from_extension(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_load_attachment() {
        let path = std::env::temp_dir().join(format!("rmc-attach-{}.txt", std::process::id()));
        tokio::fs::write(&path, b"hello").await.unwrap();

        let attachment = load_attachment(&path).await.unwrap();
        assert_eq!(attachment.mime_type, "text/plain");
        assert_eq!(attachment.base64_content, "aGVsbG8=");
        assert!(!attachment.inline);

        tokio::fs::remove_file(&path).await.unwrap();
        assert!(load_attachment(&path).await.is_err());
    }
}
