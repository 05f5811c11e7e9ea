//! Application state, one module per page.

mod accounts;
mod compose;
mod dashboard;
mod hooks;
mod login;
mod mailboxes;
mod mtas;
mod records;
mod settings;
mod tasks;
mod templates;
mod toast;

pub use accounts::AccountsState;
pub use compose::ComposeState;
pub use dashboard::{DashboardState, bar_heights, format_rate, format_uptime};
pub use hooks::{HooksState, SAMPLE_EVENT, parse_sample_event};
pub use login::{Credential, LoginState};
pub use mailboxes::{MailboxesState, OpenMessage, VisibleNode, readable_body};
pub use mtas::{MtaTestForm, MtasState};
pub use records::RecordPage;
pub use settings::SettingsState;
pub use tasks::TasksState;
pub use templates::TemplatesState;
pub use toast::{Toast, Toasts};

use rustmailer_console_api::types::{OAuth2Entity, Proxy};
use rustmailer_console_core::dialog::{OAuth2Dialog, ProxyDialog};
use rustmailer_console_core::forms::{OAuth2Form, ProxyForm};

/// Proxy page state.
pub type ProxiesState = RecordPage<Proxy, ProxyForm, ProxyDialog>;

/// OAuth2 configuration page state.
pub type OAuth2State = RecordPage<OAuth2Entity, OAuth2Form, OAuth2Dialog>;
