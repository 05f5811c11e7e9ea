//! Builds a display tree from the flat mailbox list returned by the server.
//!
//! Mailbox names are hierarchical (`Work/Projects/2024`) with a per-record
//! delimiter. Interior nodes are keyed by their joined path prefix so that
//! mailboxes sharing a prefix collapse into one node. A mailbox whose name is
//! also a prefix of other mailboxes becomes an interior node that keeps its
//! own id and badge, whatever order the records arrive in.

use std::collections::HashMap;

use rustmailer_console_api::types::MailboxData;

/// Icon shown next to a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeIcon {
    /// Inbox.
    Inbox,
    /// Sent mail.
    Sent,
    /// Drafts.
    Drafts,
    /// Trash.
    Trash,
    /// Spam/junk.
    Junk,
    /// Archive.
    Archive,
    /// All mail.
    All,
    /// Starred/flagged.
    Flagged,
    /// Generic folder (also used for path-only interior nodes).
    Folder,
}

impl TreeIcon {
    /// Picks the icon from special-use attributes, falling back to the name.
    #[must_use]
    pub fn for_mailbox(mailbox: &MailboxData) -> Self {
        const SPECIAL_USE: [(&str, TreeIcon); 7] = [
            ("\\Sent", TreeIcon::Sent),
            ("\\Drafts", TreeIcon::Drafts),
            ("\\Trash", TreeIcon::Trash),
            ("\\Junk", TreeIcon::Junk),
            ("\\Archive", TreeIcon::Archive),
            ("\\All", TreeIcon::All),
            ("\\Flagged", TreeIcon::Flagged),
        ];

        if mailbox.name.eq_ignore_ascii_case("INBOX") {
            return Self::Inbox;
        }
        SPECIAL_USE
            .iter()
            .find(|(attribute, _)| mailbox.has_attribute(attribute))
            .map_or(Self::Folder, |(_, icon)| *icon)
    }
}

/// A node of the mailbox tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeDataItem {
    /// Path key (full path of this node, joined with the record's delimiter).
    pub id: String,
    /// Last path segment.
    pub name: String,
    /// Icon.
    pub icon: TreeIcon,
    /// Optional badge text (typically the unread count).
    pub badge: Option<String>,
    /// Child nodes; `None` for a leaf.
    pub children: Option<Vec<TreeDataItem>>,
    /// Mailbox id when the node corresponds to a real mailbox.
    pub mailbox_id: Option<u64>,
    /// Full mailbox name when the node corresponds to a real mailbox.
    pub mailbox_name: Option<String>,
}

impl TreeDataItem {
    /// Whether the node has no children.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Whether the user can open this node as a mailbox.
    #[must_use]
    pub const fn is_mailbox(&self) -> bool {
        self.mailbox_id.is_some()
    }

    /// Iterates over this node and all descendants, depth first.
    pub fn walk(&self) -> Box<dyn Iterator<Item = &Self> + '_> {
        let children = self.children.iter().flatten().flat_map(Self::walk);
        Box::new(std::iter::once(self).chain(children))
    }
}

/// Builds the tree without badges.
#[must_use]
pub fn build_tree(mailboxes: &[MailboxData]) -> Vec<TreeDataItem> {
    build_tree_with_badges(mailboxes, |_| None)
}

/// Builds the tree, calling `badge` once per mailbox record.
#[must_use]
pub fn build_tree_with_badges<F>(mailboxes: &[MailboxData], badge: F) -> Vec<TreeDataItem>
where
    F: Fn(&MailboxData) -> Option<String>,
{
    let mut sorted: Vec<&MailboxData> = mailboxes.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut arena = Arena::default();
    for mailbox in sorted {
        let segments = split_path(mailbox);
        let delimiter = mailbox.delimiter.as_deref().unwrap_or_default();

        let mut parent = None;
        let mut key = String::new();
        for (depth, segment) in segments.iter().enumerate() {
            if depth > 0 {
                key.push_str(delimiter);
            }
            key.push_str(segment);
            parent = Some(arena.node_for(&key, segment, parent));
        }

        if let Some(index) = parent {
            let node = &mut arena.nodes[index];
            node.mailbox = Some(mailbox);
            node.badge = badge(mailbox);
        }
    }

    let roots = arena.roots.clone();
    arena.assemble(&roots)
}

/// Splits a mailbox name into non-empty path segments.
fn split_path(mailbox: &MailboxData) -> Vec<&str> {
    let segments: Vec<&str> = match mailbox.delimiter.as_deref() {
        Some(delimiter) if !delimiter.is_empty() => mailbox
            .name
            .split(delimiter)
            .filter(|segment| !segment.is_empty())
            .collect(),
        _ => Vec::new(),
    };

    if segments.is_empty() {
        vec![mailbox.name.as_str()]
    } else {
        segments
    }
}

struct PendingNode<'a> {
    key: String,
    name: String,
    mailbox: Option<&'a MailboxData>,
    badge: Option<String>,
    children: Vec<usize>,
}

#[derive(Default)]
struct Arena<'a> {
    nodes: Vec<PendingNode<'a>>,
    roots: Vec<usize>,
    by_key: HashMap<String, usize>,
}

impl<'a> Arena<'a> {
    /// Returns the node for `key`, creating it under `parent` on first use.
    fn node_for(&mut self, key: &str, name: &str, parent: Option<usize>) -> usize {
        if let Some(&index) = self.by_key.get(key) {
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(PendingNode {
            key: key.to_string(),
            name: name.to_string(),
            mailbox: None,
            badge: None,
            children: Vec::new(),
        });
        self.by_key.insert(key.to_string(), index);
        match parent {
            Some(parent) => self.nodes[parent].children.push(index),
            None => self.roots.push(index),
        }
        index
    }

    fn assemble(&self, indices: &[usize]) -> Vec<TreeDataItem> {
        let mut items: Vec<TreeDataItem> = indices
            .iter()
            .map(|&index| {
                let node = &self.nodes[index];
                let children =
                    (!node.children.is_empty()).then(|| self.assemble(&node.children));
                TreeDataItem {
                    id: node.key.clone(),
                    name: node.name.clone(),
                    icon: node.mailbox.map_or(TreeIcon::Folder, TreeIcon::for_mailbox),
                    badge: node.badge.clone(),
                    children,
                    mailbox_id: node.mailbox.map(|m| m.id),
                    mailbox_name: node.mailbox.map(|m| m.name.clone()),
                }
            })
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn mailbox(id: u64, name: &str) -> MailboxData {
        MailboxData::new(id, name, Some("/"))
    }

    #[test]
    fn test_shared_prefix_collapses() {
        let tree = build_tree(&[mailbox(2, "Inbox/Work"), mailbox(3, "Inbox/Personal")]);
        assert_eq!(tree.len(), 1);
        let inbox = &tree[0];
        assert_eq!(inbox.name, "Inbox");
        assert_eq!(inbox.mailbox_id, None);
        let children = inbox.children.as_ref().unwrap();
        let names: Vec<_> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Personal", "Work"]);
        assert!(children.iter().all(TreeDataItem::is_leaf));
    }

    #[test]
    fn test_real_mailbox_that_is_also_a_prefix() {
        let records = [
            MailboxData::new(1, "Inbox", None),
            mailbox(2, "Inbox/Work"),
            mailbox(3, "Inbox/Personal"),
        ];
        let tree = build_tree(&records);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].mailbox_id, Some(1));
        assert_eq!(tree[0].children.as_ref().unwrap().len(), 2);

        // Arrival order does not change the outcome.
        let mut reversed = records.to_vec();
        reversed.reverse();
        assert_eq!(build_tree(&reversed), tree);
    }

    #[test]
    fn test_no_delimiter_is_root_child() {
        let tree = build_tree(&[
            MailboxData::new(1, "Archive.2024", None),
            MailboxData::new(2, "INBOX", None),
        ]);
        assert_eq!(tree.len(), 2);
        assert!(tree.iter().all(TreeDataItem::is_leaf));
        assert_eq!(tree[0].name, "Archive.2024");
        assert_eq!(tree[1].icon, TreeIcon::Inbox);
    }

    #[test]
    fn test_badges_and_icons() {
        let mut sent = mailbox(4, "Sent");
        sent.attributes.push("\\Sent".into());
        let mut inbox = mailbox(5, "INBOX");
        inbox.unseen = Some(3);

        let tree = build_tree_with_badges(&[sent, inbox], |m| {
            m.unseen.filter(|n| *n > 0).map(|n| n.to_string())
        });
        assert_eq!(tree[0].name, "INBOX");
        assert_eq!(tree[0].badge.as_deref(), Some("3"));
        assert_eq!(tree[1].icon, TreeIcon::Sent);
        assert_eq!(tree[1].badge, None);
    }

    #[test]
    fn test_levels_sorted_by_segment() {
        let tree = build_tree(&[mailbox(1, "A/B c"), mailbox(2, "A/B/x")]);
        let names: Vec<_> = tree[0]
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["B", "B c"]);
    }

    #[test]
    fn test_empty_segments_are_ignored() {
        let tree = build_tree(&[mailbox(1, "/Lists//rust/")]);
        assert_eq!(tree[0].name, "Lists");
        let rust = &tree[0].children.as_ref().unwrap()[0];
        assert_eq!(rust.id, "Lists/rust");
        assert_eq!(rust.mailbox_id, Some(1));
    }

    fn path_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "Inbox"]), 1..4)
            .prop_map(|segments| segments.join("/"))
    }

    proptest! {
        #[test]
        fn prop_one_node_per_prefix(paths in prop::collection::btree_set(path_strategy(), 0..20)) {
            let records: Vec<MailboxData> = paths
                .iter()
                .enumerate()
                .map(|(i, name)| mailbox(i as u64, name))
                .collect();
            let tree = build_tree(&records);
            let nodes: Vec<&TreeDataItem> = tree.iter().flat_map(TreeDataItem::walk).collect();

            let mut prefixes = BTreeSet::new();
            for path in &paths {
                let segments: Vec<&str> = path.split('/').collect();
                for end in 1..=segments.len() {
                    prefixes.insert(segments[..end].join("/"));
                }
            }
            let keys: BTreeSet<String> = nodes.iter().map(|n| n.id.clone()).collect();
            prop_assert_eq!(keys.len(), nodes.len());
            prop_assert_eq!(keys, prefixes);

            let ids: BTreeSet<u64> = nodes.iter().filter_map(|n| n.mailbox_id).collect();
            prop_assert_eq!(ids.len(), records.len());
        }

        #[test]
        fn prop_every_level_sorted(paths in prop::collection::btree_set(path_strategy(), 0..20)) {
            let records: Vec<MailboxData> = paths
                .iter()
                .enumerate()
                .map(|(i, name)| mailbox(i as u64, name))
                .collect();
            let tree = build_tree(&records);
            prop_assert!(tree.windows(2).all(|w| w[0].name <= w[1].name));
            for node in tree.iter().flat_map(TreeDataItem::walk) {
                if let Some(children) = &node.children {
                    prop_assert!(children.windows(2).all(|w| w[0].name <= w[1].name));
                }
            }
        }
    }
}
