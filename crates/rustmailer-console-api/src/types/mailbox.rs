//! Mailbox (folder) records.

use serde::{Deserialize, Serialize};

/// A mailbox as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxData {
    /// Mailbox id.
    pub id: u64,
    /// Owning account.
    #[serde(default)]
    pub account_id: u64,
    /// Full name, hierarchical through `delimiter`.
    pub name: String,
    /// Hierarchy delimiter, if the server reports one.
    #[serde(default)]
    pub delimiter: Option<String>,
    /// IMAP attributes such as `\Sent` or `\Noselect`.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Number of messages.
    #[serde(default)]
    pub exists: u32,
    /// Number of unseen messages, when known.
    #[serde(default)]
    pub unseen: Option<u32>,
}

impl MailboxData {
    /// Creates a mailbox record with no attributes.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, delimiter: Option<&str>) -> Self {
        Self {
            id,
            account_id: 0,
            name: name.into(),
            delimiter: delimiter.map(ToString::to_string),
            attributes: Vec::new(),
            exists: 0,
            unseen: None,
        }
    }

    /// Whether the mailbox carries the given attribute (case-insensitive, leading `\` optional).
    #[must_use]
    pub fn has_attribute(&self, attribute: &str) -> bool {
        let wanted = attribute.trim_start_matches('\\');
        self.attributes
            .iter()
            .any(|a| a.trim_start_matches('\\').eq_ignore_ascii_case(wanted))
    }

    /// Whether messages can be listed in this mailbox.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.has_attribute("Noselect") && !self.has_attribute("NonExistent")
    }

    /// Last path segment, used as display name.
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        match self.delimiter.as_deref() {
            Some(delimiter) if !delimiter.is_empty() => self
                .name
                .rsplit(delimiter)
                .next()
                .unwrap_or(self.name.as_str()),
            _ => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes() {
        let mut mailbox = MailboxData::new(1, "[Gmail]", Some("/"));
        mailbox.attributes = vec!["\\Noselect".into(), "\\HasChildren".into()];
        assert!(mailbox.has_attribute("noselect"));
        assert!(mailbox.has_attribute("\\HasChildren"));
        assert!(!mailbox.is_selectable());
    }

    #[test]
    fn test_leaf_name() {
        assert_eq!(MailboxData::new(1, "Inbox/Work", Some("/")).leaf_name(), "Work");
        assert_eq!(MailboxData::new(2, "Inbox.Work", Some(".")).leaf_name(), "Work");
        assert_eq!(MailboxData::new(3, "Inbox/Work", None).leaf_name(), "Inbox/Work");
    }
}
