//! `RustMailer` Console - desktop administration console for `RustMailer`
//!
//! Built with Rust and the iced GUI framework, on top of the server's REST API.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod message;
mod model;
mod style;
mod update;
mod view;

use std::time::Duration;

use iced::keyboard::{self, Key, Modifiers};
use iced::{Element, Subscription, Task, event, window};
use rustmailer_console_api::ApiClient;
use rustmailer_console_core::{ConsoleConfig, LocalStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use message::{AccountAction, DashboardMessage, KeyboardAction, Message, Page, RecordMessage};
use model::{
    AccountsState, ComposeState, DashboardState, HooksState, LoginState, MailboxesState,
    MtasState, OAuth2State, ProxiesState, SettingsState, TasksState, TemplatesState, Toasts,
};

fn main() -> iced::Result {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rustmailer_console=debug,rustmailer_console_core=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RustMailer Console");

    iced::application(
        RustMailerConsole::new,
        RustMailerConsole::update,
        RustMailerConsole::view,
    )
    .title("RustMailer Console")
    .subscription(RustMailerConsole::subscription)
    .run()
}

/// Where the console is in its sign-in lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Reading settings and the stored token.
    Booting,
    /// Showing the sign-in screen.
    SignedOut,
    /// Signed in with a token the server accepted.
    SignedIn,
}

/// Main application state.
struct RustMailerConsole {
    /// Console settings.
    config: ConsoleConfig,
    /// REST client for the configured server.
    client: Option<ApiClient>,
    /// Local store for drafts and layout state.
    store: Option<LocalStore>,
    /// Sign-in lifecycle.
    phase: Phase,
    /// Current page.
    page: Page,
    /// Notifications.
    toasts: Toasts,
    login: LoginState,
    dashboard: DashboardState,
    accounts: AccountsState,
    mailboxes: MailboxesState,
    compose: ComposeState,
    hooks: HooksState,
    templates: TemplatesState,
    mtas: MtasState,
    proxies: ProxiesState,
    oauth2: OAuth2State,
    tasks: TasksState,
    settings: SettingsState,
}

impl Default for RustMailerConsole {
    fn default() -> Self {
        let config = ConsoleConfig::default();
        Self {
            mailboxes: MailboxesState::new(config.page_size),
            tasks: TasksState::new(config.page_size),
            config,
            client: None,
            store: None,
            phase: Phase::Booting,
            page: Page::Dashboard,
            toasts: Toasts::default(),
            login: LoginState::default(),
            dashboard: DashboardState::default(),
            accounts: AccountsState::default(),
            compose: ComposeState::default(),
            hooks: HooksState::default(),
            templates: TemplatesState::default(),
            mtas: MtasState::default(),
            proxies: ProxiesState::default(),
            oauth2: OAuth2State::default(),
            settings: SettingsState::default(),
        }
    }
}

impl RustMailerConsole {
    /// Create new application instance.
    fn new() -> (Self, Task<Message>) {
        let config_task = Task::perform(update::load_config(), Message::ConfigLoaded);
        let store_task = Task::perform(update::open_store(), Message::StoreOpened);
        (Self::default(), Task::batch([config_task, store_task]))
    }

    /// Handle messages and update state.
    #[allow(clippy::needless_pass_by_value)] // iced requires owned Message
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ConfigLoaded(result) => self.handle_config_loaded(result),
            Message::StoreOpened(result) => {
                match result {
                    Ok(store) => self.store = Some(store),
                    Err(e) => {
                        tracing::warn!("Local store unavailable: {e}");
                        self.toasts
                            .error(format!("Drafts and layout will not be saved: {e}"));
                    }
                }
                Task::none()
            }
            Message::SessionRestored(result) => self.handle_session_restored(result),
            Message::SessionChecked(outcome) => self.handle_session_checked(outcome),
            Message::Login(msg) => self.handle_login(msg),
            Message::LoggedIn(outcome) => self.handle_logged_in(outcome),
            Message::Logout => {
                self.toasts.info("Signed out");
                self.sign_out()
            }
            Message::Persisted(result) => {
                if let Err(e) = result {
                    tracing::warn!("Background write failed: {e}");
                }
                Task::none()
            }
            Message::NavigateTo(page) => self.enter_page(page),
            Message::Dashboard(msg) => self.handle_dashboard(msg),
            Message::Accounts(msg) => self.handle_records(msg),
            Message::Mailboxes(msg) => self.handle_mailboxes(msg),
            Message::Compose(msg) => self.handle_compose(msg),
            Message::Hooks(msg) => self.handle_records(msg),
            Message::Templates(msg) => self.handle_records(msg),
            Message::Mtas(msg) => self.handle_records(msg),
            Message::Proxies(msg) => self.handle_records(msg),
            Message::OAuth2(msg) => self.handle_records(msg),
            Message::Tasks(msg) => self.handle_tasks(msg),
            Message::Settings(msg) => self.handle_settings(msg),
            Message::DismissToast(id) => {
                self.toasts.dismiss(id);
                Task::none()
            }
            Message::ExpireToasts => {
                self.toasts.expire(std::time::Instant::now());
                Task::none()
            }
            Message::KeyPressed(action) => self.handle_keyboard_action(action),
            Message::FileDropped(path) => self.handle_file_dropped(path),
            Message::Ignored => Task::none(),
        }
    }

    /// Render current state as UI.
    fn view(&self) -> Element<'_, Message> {
        let content = match self.phase {
            Phase::Booting => view::view_booting(),
            Phase::SignedOut => view::view_login(&self.login, &self.config.server_url),
            Phase::SignedIn => self.view_signed_in(),
        };
        view::with_toasts(content, &self.toasts)
    }

    /// Header and the current page.
    fn view_signed_in(&self) -> Element<'_, Message> {
        let body = match self.page {
            Page::Dashboard => view::view_dashboard(&self.dashboard),
            Page::Accounts => view::view_accounts(
                &self.accounts,
                &self.proxies.items,
                &self.oauth2.items,
            ),
            Page::Mailboxes => view::view_mailboxes(&self.mailboxes, &self.accounts.records.items),
            Page::Compose => view::view_compose(&self.compose, &self.accounts.records.items),
            Page::Hooks => view::view_hooks(&self.hooks, &self.accounts.records.items),
            Page::Templates => view::view_templates(&self.templates, &self.accounts.records.items),
            Page::Mtas => view::view_mtas(&self.mtas, &self.proxies.items),
            Page::Proxies => view::view_proxies(&self.proxies),
            Page::OAuth2 => view::view_oauth2(&self.oauth2, &self.proxies.items),
            Page::Tasks => view::view_tasks(&self.tasks),
            Page::Settings => view::view_settings(&self.settings, &self.config),
        };
        view::view_shell(self.page, &self.config.server_url, body)
    }

    /// Keyboard shortcuts, dropped files, toast expiry and polling.
    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![
            keyboard::listen().map(|event| {
                if let keyboard::Event::KeyPressed { key, modifiers, .. } = event {
                    handle_key_press(key, modifiers).unwrap_or(Message::Ignored)
                } else {
                    Message::Ignored
                }
            }),
            event::listen_with(|event, _status, _window| match event {
                iced::Event::Window(window::Event::FileDropped(path)) => {
                    Some(Message::FileDropped(path))
                }
                _ => None,
            }),
        ];

        if !self.toasts.is_empty() {
            subscriptions
                .push(iced::time::every(Duration::from_secs(1)).map(|_| Message::ExpireToasts));
        }

        if self.phase == Phase::SignedIn {
            if self.page == Page::Dashboard {
                subscriptions.push(
                    iced::time::every(Duration::from_secs(self.config.dashboard_poll_secs))
                        .map(|_| Message::Dashboard(DashboardMessage::Refresh)),
                );
            }
            if self.page == Page::Accounts && self.accounts.polls_running_state() {
                subscriptions.push(
                    iced::time::every(Duration::from_secs(self.config.running_state_poll_secs))
                        .map(|_| {
                            Message::Accounts(RecordMessage::Action(
                                AccountAction::PollRunningState,
                            ))
                        }),
                );
            }
        }

        Subscription::batch(subscriptions)
    }
}

/// Handle keyboard shortcuts and return appropriate message.
fn handle_key_press(key: Key, modifiers: Modifiers) -> Option<Message> {
    let ctrl = modifiers.command(); // Ctrl on Linux/Windows, Cmd on macOS
    let shift = modifiers.shift();

    let action = match key {
        Key::Character(c) if ctrl && !shift && c.as_str() == "n" => KeyboardAction::ComposeNew,
        Key::Character(c) if ctrl && !shift && c.as_str() == "r" => KeyboardAction::Reply,
        Key::Character(c) if ctrl && shift && c.eq_ignore_ascii_case("r") => {
            KeyboardAction::ReplyAll
        }
        Key::Character(c) if ctrl && shift && c.eq_ignore_ascii_case("f") => {
            KeyboardAction::Forward
        }
        Key::Named(keyboard::key::Named::Enter) if ctrl => KeyboardAction::Send,
        Key::Named(keyboard::key::Named::Escape) => KeyboardAction::Cancel,
        Key::Named(keyboard::key::Named::Delete) => KeyboardAction::Delete,
        Key::Named(keyboard::key::Named::F5) => KeyboardAction::Refresh,
        Key::Named(keyboard::key::Named::ArrowRight) if ctrl => KeyboardAction::NextPage,
        Key::Named(keyboard::key::Named::ArrowLeft) if ctrl => KeyboardAction::PreviousPage,
        _ => return None,
    };
    Some(Message::KeyPressed(action))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: &str) -> Key {
        Key::Character(c.into())
    }

    fn action(message: Option<Message>) -> Option<KeyboardAction> {
        match message {
            Some(Message::KeyPressed(action)) => Some(action),
            _ => None,
        }
    }

    #[test]
    fn test_shortcuts() {
        let ctrl = Modifiers::COMMAND;
        let ctrl_shift = Modifiers::COMMAND | Modifiers::SHIFT;

        assert_eq!(action(handle_key_press(key("n"), ctrl)), Some(KeyboardAction::ComposeNew));
        assert_eq!(action(handle_key_press(key("r"), ctrl)), Some(KeyboardAction::Reply));
        assert_eq!(action(handle_key_press(key("R"), ctrl_shift)), Some(KeyboardAction::ReplyAll));
        assert_eq!(action(handle_key_press(key("F"), ctrl_shift)), Some(KeyboardAction::Forward));
        assert_eq!(
            action(handle_key_press(
                Key::Named(keyboard::key::Named::Escape),
                Modifiers::empty()
            )),
            Some(KeyboardAction::Cancel)
        );
        assert_eq!(action(handle_key_press(key("n"), Modifiers::empty())), None);
    }
}
