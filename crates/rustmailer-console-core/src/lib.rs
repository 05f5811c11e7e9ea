//! # rustmailer-console-core
//!
//! Client-side logic for the `RustMailer` admin console.
//!
//! This crate provides:
//! - **Mailbox tree** - flat mailbox lists folded into a sorted hierarchy
//! - **Envelope pager** - token-based paging with a per-page cache
//! - **Filters** - the message filter form as a search expression tree
//! - **Forms** - validated add/edit forms for every admin page
//! - **Compose** - reply, reply-all, forward and new-message drafts
//! - **Session** - access-token storage with a five-day expiry
//! - **Local storage** (`SQLite`) - drafts and layout state
//! - **Configuration** - console settings file

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod address;
pub mod compose;
pub mod config;
pub mod dialog;
mod error;
pub mod filter;
pub mod forms;
pub mod local_store;
pub mod mailbox_tree;
pub mod pager;
pub mod session;

pub use compose::{ComposeError, ComposeMode, Draft, OutgoingDraft};
pub use config::{ConsoleConfig, Theme};
pub use dialog::DialogState;
pub use error::{Error, Result};
pub use filter::{FilterCondition, FilterError, FilterForm};
pub use local_store::LocalStore;
pub use mailbox_tree::{TreeDataItem, TreeIcon, build_tree, build_tree_with_badges};
pub use pager::{DEFAULT_PAGE_SIZE, PageKey, PageRequest, Pager, PagerError, Ticket, fetch_envelopes};
pub use session::{KeyringBackend, MemoryBackend, SessionStore, TokenBackend, TokenRecord};
