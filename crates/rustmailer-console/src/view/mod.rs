//! View components for the application.

mod accounts;
mod common;
mod compose;
mod dashboard;
mod hooks;
mod login;
mod mailboxes;
mod mtas;
mod oauth2;
mod proxies;
mod settings;
mod shell;
mod tasks;
mod templates;

pub use accounts::view_accounts;
pub use compose::view_compose;
pub use dashboard::view_dashboard;
pub use hooks::view_hooks;
pub use login::view_login;
pub use mailboxes::view_mailboxes;
pub use mtas::view_mtas;
pub use oauth2::view_oauth2;
pub use proxies::view_proxies;
pub use settings::view_settings;
pub use shell::{view_booting, view_shell, with_toasts};
pub use tasks::view_tasks;
pub use templates::view_templates;
