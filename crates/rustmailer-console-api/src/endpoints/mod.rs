//! Endpoint groups, each an `impl ApiClient` block.

mod accounts;
mod hooks;
mod messages;
mod mta;
mod oauth2;
mod proxy;
mod system;
mod templates;
