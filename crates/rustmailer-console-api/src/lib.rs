//! # rustmailer-console-api
//!
//! Typed async client for the RustMailer REST administration API.
//!
//! ## Features
//!
//! - **Bearer authentication**: every request carries the console's access token
//! - **Typed wire model**: accounts, mailboxes, envelopes, hooks, templates, MTAs,
//!   proxies, OAuth2 configurations, license and task records
//! - **Cursor pagination**: list and search calls return a [`types::DataPage`]
//!   with an opaque `next_page_token`
//! - **Error mapping**: 401 becomes [`Error::Unauthorized`], other failures carry
//!   the server message
//!
//! ## Quick Start
//!
//! ```ignore
//! use rustmailer_console_api::{ApiClient, types::ListMessagesQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:15630")?
//!         .with_access_token("root-token");
//!
//!     for account in client.list_accounts().await? {
//!         println!("{}", account.label());
//!     }
//!
//!     let page = client
//!         .list_messages(1, &ListMessagesQuery {
//!             mailbox: "INBOX".into(),
//!             next_page_token: None,
//!             page_size: 20,
//!             remote: false,
//!             desc: true,
//!         })
//!         .await?;
//!     println!("{} messages, more: {}", page.total_items, page.next_page_token.is_some());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod endpoints;
mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{Error, Result};
