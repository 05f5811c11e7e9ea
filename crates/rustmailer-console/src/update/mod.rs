//! Message handlers, split by page.
//!
//! Every server call goes through [`RustMailerConsole::call`], which runs the
//! request on the async runtime and turns its result into an [`Outcome`].
//! Failures are reported through [`RustMailerConsole::report`], which signs the
//! user out when the server rejects the token.

mod accounts;
mod compose;
mod hooks;
mod mailboxes;
mod mtas;
mod records;
mod system;
mod templates;

use std::future::Future;
use std::path::PathBuf;

use iced::Task;
use rustmailer_console_api::ApiClient;
use rustmailer_console_api::types::{
    AccountEntity, EmailTemplate, EventHook, LoginRequest, Mta, OAuth2Entity, Proxy,
};
use rustmailer_console_core::{ComposeMode, ConsoleConfig, KeyringBackend, LocalStore, SessionStore};
use tracing::{info, warn};

use crate::message::{
    ApiFailure, ComposeMessage, DashboardMessage, KeyboardAction, LoginMessage, MailboxMessage,
    Message, Outcome, Page, SettingsMessage, TaskMessage,
};
use crate::model::Credential;
use crate::style::palette;
use crate::{Phase, RustMailerConsole};

impl RustMailerConsole {
    /// Runs `request` with the API client and maps its result through `wrap`.
    ///
    /// Does nothing before a client exists.
    pub(crate) fn call<T, E, Fut>(
        &self,
        request: impl FnOnce(ApiClient) -> Fut,
        wrap: impl FnOnce(Outcome<T>) -> Message + Send + 'static,
    ) -> Task<Message>
    where
        T: Send + 'static,
        E: Into<ApiFailure>,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let Some(client) = self.client.clone() else {
            warn!("No API client, request dropped");
            return Task::none();
        };
        let future = request(client);
        Task::perform(async move { future.await.map_err(Into::into) }, wrap)
    }

    /// Reports a failed call as a toast, or ends the session on a rejected token.
    pub(crate) fn report(&mut self, context: &str, failure: &ApiFailure) -> Task<Message> {
        if failure.unauthorized {
            return self.expire_session();
        }
        warn!("{context}: {}", failure.message);
        self.toasts.error(format!("{context}: {}", failure.message));
        Task::none()
    }

    fn expire_session(&mut self) -> Task<Message> {
        if self.phase != Phase::SignedIn {
            return Task::none();
        }
        self.toasts.error("Session expired, please sign in again");
        self.sign_out()
    }

    /// Drops the token and returns to the sign-in screen.
    pub(crate) fn sign_out(&mut self) -> Task<Message> {
        info!("Signing out");
        self.phase = Phase::SignedOut;
        if let Some(client) = &mut self.client {
            client.set_access_token(None);
        }
        self.login.reset();
        Task::perform(
            clear_session(self.config.server_url.clone()),
            Message::Persisted,
        )
    }

    pub(crate) fn handle_config_loaded(
        &mut self,
        result: Result<ConsoleConfig, String>,
    ) -> Task<Message> {
        let config = result.unwrap_or_else(|e| {
            warn!("Settings unreadable, using defaults: {e}");
            self.toasts.error(format!("Settings unreadable, using defaults: {e}"));
            ConsoleConfig::default()
        });
        self.apply_config(config);
        if self.client.is_none() {
            self.phase = Phase::SignedOut;
            return Task::none();
        }
        Task::perform(
            restore_session(self.config.server_url.clone()),
            Message::SessionRestored,
        )
    }

    /// Makes `config` current: theme, page sizes and a client for its server.
    pub(crate) fn apply_config(&mut self, config: ConsoleConfig) {
        palette::set_theme(config.theme);
        self.mailboxes.pager.set_page_size(config.page_size);
        self.tasks.page_size = config.page_size;
        self.settings.load_config(&config);

        if self.client.is_none() || config.server_url != self.config.server_url {
            self.client = match ApiClient::new(&config.server_url) {
                Ok(client) => Some(client),
                Err(e) => {
                    self.toasts.error(format!("Invalid server URL: {e}"));
                    None
                }
            };
        }
        self.config = config;
    }

    pub(crate) fn handle_session_restored(
        &mut self,
        result: Result<Option<String>, String>,
    ) -> Task<Message> {
        match result {
            Ok(Some(token)) => {
                if let Some(client) = &mut self.client {
                    client.set_access_token(Some(token));
                }
                self.call(
                    |client| async move { client.validate_token().await },
                    Message::SessionChecked,
                )
            }
            Ok(None) => {
                self.phase = Phase::SignedOut;
                Task::none()
            }
            Err(e) => {
                warn!("Stored session unreadable: {e}");
                self.phase = Phase::SignedOut;
                Task::none()
            }
        }
    }

    pub(crate) fn handle_session_checked(&mut self, outcome: Outcome<()>) -> Task<Message> {
        match outcome {
            Ok(()) => {
                info!("Restored session for {}", self.config.server_url);
                self.phase = Phase::SignedIn;
                self.enter_page(Page::Dashboard)
            }
            Err(failure) => {
                if !failure.unauthorized {
                    self.login.error = Some(failure.message);
                }
                self.sign_out()
            }
        }
    }

    pub(crate) fn handle_login(&mut self, msg: LoginMessage) -> Task<Message> {
        match msg {
            LoginMessage::UseToken(use_token) => {
                self.login.use_token = use_token;
                self.login.error = None;
            }
            LoginMessage::PasswordChanged(password) => self.login.password = password,
            LoginMessage::TokenChanged(token) => self.login.token = token,
            LoginMessage::Submit => {
                if self.login.submitting {
                    return Task::none();
                }
                let Some(credential) = self.login.credential() else {
                    self.login.error = Some("Enter the root password or an access token".into());
                    return Task::none();
                };
                self.login.submitting = true;
                self.login.error = None;
                return match credential {
                    Credential::Password(password) => {
                        if let Some(client) = &mut self.client {
                            client.set_access_token(None);
                        }
                        let request = LoginRequest { password };
                        self.call(
                            move |client| async move {
                                client.login(&request).await.map(|r| r.access_token)
                            },
                            Message::LoggedIn,
                        )
                    }
                    Credential::Token(token) => {
                        if let Some(client) = &mut self.client {
                            client.set_access_token(Some(token.clone()));
                        }
                        self.call(
                            move |client| async move {
                                client.validate_token().await.map(|()| token)
                            },
                            Message::LoggedIn,
                        )
                    }
                };
            }
        }
        Task::none()
    }

    pub(crate) fn handle_logged_in(&mut self, outcome: Outcome<String>) -> Task<Message> {
        self.login.submitting = false;
        match outcome {
            Ok(token) => {
                info!("Signed in to {}", self.config.server_url);
                if let Some(client) = &mut self.client {
                    client.set_access_token(Some(token.clone()));
                }
                self.login.reset();
                self.login.error = None;
                self.phase = Phase::SignedIn;
                let persist = Task::perform(
                    save_session(self.config.server_url.clone(), token),
                    Message::Persisted,
                );
                Task::batch([persist, self.enter_page(Page::Dashboard)])
            }
            Err(failure) => {
                if let Some(client) = &mut self.client {
                    client.set_access_token(None);
                }
                self.login.error = Some(if failure.unauthorized {
                    "Wrong password or token".to_string()
                } else {
                    failure.message
                });
                Task::none()
            }
        }
    }

    /// Switches page and starts loading what it shows.
    pub(crate) fn enter_page(&mut self, page: Page) -> Task<Message> {
        if self.phase != Phase::SignedIn {
            return Task::none();
        }
        self.page = page;
        match page {
            Page::Dashboard => self.handle_dashboard(DashboardMessage::Refresh),
            Page::Accounts => Task::batch([
                self.load_records::<AccountEntity>(),
                self.load_records::<Proxy>(),
                self.load_records::<OAuth2Entity>(),
            ]),
            Page::Mailboxes => {
                let first = self.accounts.records.items.first().map(|a| a.id);
                let select = match (self.mailboxes.account_id, first) {
                    (None, Some(id)) => self.handle_mailboxes(MailboxMessage::AccountSelected(id)),
                    _ => Task::none(),
                };
                Task::batch([
                    self.load_records::<AccountEntity>(),
                    select,
                ])
            }
            Page::Compose => Task::none(),
            Page::Hooks => Task::batch([
                self.load_records::<EventHook>(),
                self.load_records::<AccountEntity>(),
            ]),
            Page::Templates => Task::batch([
                self.load_records::<EmailTemplate>(),
                self.load_records::<AccountEntity>(),
            ]),
            Page::Mtas => Task::batch([
                self.load_records::<Mta>(),
                self.load_records::<Proxy>(),
            ]),
            Page::Proxies => self.load_records::<Proxy>(),
            Page::OAuth2 => Task::batch([
                self.load_records::<OAuth2Entity>(),
                self.load_records::<Proxy>(),
            ]),
            Page::Tasks => self.handle_tasks(TaskMessage::Refresh),
            Page::Settings => {
                self.settings.load_config(&self.config);
                self.call(
                    |client| async move { client.get_license().await },
                    |outcome| Message::Settings(SettingsMessage::LicenseLoaded(outcome)),
                )
            }
        }
    }

    /// Handle keyboard shortcut actions.
    pub(crate) fn handle_keyboard_action(&mut self, action: KeyboardAction) -> Task<Message> {
        if self.phase != Phase::SignedIn {
            return match action {
                KeyboardAction::Send => self.handle_login(LoginMessage::Submit),
                _ => Task::none(),
            };
        }
        match action {
            KeyboardAction::ComposeNew if self.page != Page::Compose => {
                self.handle_compose(ComposeMessage::New)
            }
            KeyboardAction::Reply | KeyboardAction::ReplyAll | KeyboardAction::Forward
                if self.page == Page::Mailboxes && self.mailboxes.open.is_some() =>
            {
                let mode = match action {
                    KeyboardAction::Reply => ComposeMode::Reply,
                    KeyboardAction::ReplyAll => ComposeMode::ReplyAll,
                    _ => ComposeMode::Forward,
                };
                self.handle_mailboxes(MailboxMessage::Respond(mode))
            }
            KeyboardAction::Delete if self.page == Page::Mailboxes => {
                self.handle_mailboxes(MailboxMessage::OpenDelete)
            }
            KeyboardAction::Send if self.page == Page::Compose => {
                self.handle_compose(ComposeMessage::Send)
            }
            KeyboardAction::Refresh => self.refresh_page(),
            KeyboardAction::Cancel => self.cancel_current(),
            KeyboardAction::NextPage => match self.page {
                Page::Mailboxes => self.handle_mailboxes(MailboxMessage::NextPage),
                Page::Tasks => self.handle_tasks(TaskMessage::NextPage),
                _ => Task::none(),
            },
            KeyboardAction::PreviousPage => match self.page {
                Page::Mailboxes => self.handle_mailboxes(MailboxMessage::PreviousPage),
                Page::Tasks => self.handle_tasks(TaskMessage::PreviousPage),
                _ => Task::none(),
            },
            _ => Task::none(),
        }
    }

    fn refresh_page(&mut self) -> Task<Message> {
        match self.page {
            Page::Mailboxes => self.handle_mailboxes(MailboxMessage::Refresh),
            Page::Compose => Task::none(),
            page => self.enter_page(page),
        }
    }

    /// Closes the dialog of the current page, or leaves compose.
    fn cancel_current(&mut self) -> Task<Message> {
        match self.page {
            Page::Compose => return self.handle_compose(ComposeMessage::Cancel),
            Page::Mailboxes => {
                if self.mailboxes.dialog.current().is_some() {
                    self.mailboxes.dialog.close();
                } else {
                    self.mailboxes.open = None;
                }
            }
            Page::Accounts => self.accounts.records.close(),
            Page::Hooks => self.hooks.records.close(),
            Page::Templates => self.templates.records.close(),
            Page::Mtas => self.mtas.records.close(),
            Page::Proxies => self.proxies.close(),
            Page::OAuth2 => self.oauth2.close(),
            Page::Settings => self.settings.confirm_reset = false,
            Page::Dashboard | Page::Tasks => {}
        }
        Task::none()
    }

    pub(crate) fn handle_file_dropped(&mut self, path: PathBuf) -> Task<Message> {
        if self.page == Page::Compose && self.compose.draft.is_some() {
            self.compose.attach_path = path.display().to_string();
            return self.handle_compose(ComposeMessage::Attach);
        }
        Task::none()
    }
}

/// Loads console settings.
pub async fn load_config() -> Result<ConsoleConfig, String> {
    ConsoleConfig::load().await.map_err(|e| e.to_string())
}

/// Opens the local store.
pub async fn open_store() -> Result<LocalStore, String> {
    LocalStore::open_default().await.map_err(|e| e.to_string())
}

/// Saves console settings, returning them on success.
pub async fn save_config(config: ConsoleConfig) -> Result<ConsoleConfig, String> {
    config.save().await.map_err(|e| e.to_string())?;
    Ok(config)
}

/// Runs a credential-store operation off the async executor.
async fn with_session<T: Send + 'static>(
    server_url: String,
    op: impl FnOnce(&SessionStore) -> rustmailer_console_core::Result<T> + Send + 'static,
) -> Result<T, String> {
    tokio::task::spawn_blocking(move || op(&SessionStore::new(KeyringBackend, &server_url)))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}

async fn restore_session(server_url: String) -> Result<Option<String>, String> {
    with_session(server_url, SessionStore::load).await
}

async fn save_session(server_url: String, token: String) -> Result<(), String> {
    with_session(server_url, move |store| store.save(&token).map(|_| ())).await
}

async fn clear_session(server_url: String) -> Result<(), String> {
    with_session(server_url, SessionStore::clear).await
}
