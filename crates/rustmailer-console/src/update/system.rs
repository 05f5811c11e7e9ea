//! Dashboard, task queues and settings.

use iced::Task;
use rustmailer_console_api::types::LicenseRequest;
use rustmailer_console_core::ConsoleConfig;
use tracing::info;

use super::{restore_session, save_config};
use crate::message::{DashboardMessage, Message, SettingsMessage, TaskMessage, TaskQueue};
use crate::style::palette;
use crate::{Phase, RustMailerConsole};

impl RustMailerConsole {
    pub(crate) fn handle_dashboard(&mut self, msg: DashboardMessage) -> Task<Message> {
        match msg {
            DashboardMessage::Refresh => {
                if !self.dashboard.begin_poll() {
                    return Task::none();
                }
                self.call(
                    |client| async move { client.overview().await },
                    |outcome| Message::Dashboard(DashboardMessage::Loaded(outcome)),
                )
            }
            DashboardMessage::Loaded(outcome) => match outcome {
                Ok(overview) => {
                    self.dashboard.finish_poll(Ok(overview));
                    Task::none()
                }
                Err(failure) => {
                    self.dashboard.finish_poll(Err(failure.message.clone()));
                    if failure.unauthorized {
                        self.report("Dashboard", &failure)
                    } else {
                        Task::none()
                    }
                }
            },
        }
    }

    pub(crate) fn handle_tasks(&mut self, msg: TaskMessage) -> Task<Message> {
        match msg {
            TaskMessage::QueueSelected(queue) => {
                self.tasks.select_queue(queue);
                self.load_tasks()
            }
            TaskMessage::Refresh => self.load_tasks(),
            TaskMessage::NextPage => {
                if self.tasks.next_page() {
                    self.load_tasks()
                } else {
                    Task::none()
                }
            }
            TaskMessage::PreviousPage => {
                if self.tasks.previous_page() {
                    self.load_tasks()
                } else {
                    Task::none()
                }
            }
            TaskMessage::Loaded(queue, page, outcome) => {
                if let Err(failure) = &outcome
                    && failure.unauthorized
                {
                    return self.report("Tasks", failure);
                }
                self.tasks
                    .accept(queue, page, outcome.map_err(|failure| failure.message));
                Task::none()
            }
        }
    }

    fn load_tasks(&mut self) -> Task<Message> {
        self.tasks.loading = true;
        self.tasks.error = None;
        let queue = self.tasks.queue;
        let page = self.tasks.page;
        let query = self.tasks.query();
        self.call(
            move |client| async move {
                match queue {
                    TaskQueue::Email => client.list_email_tasks(&query).await,
                    TaskQueue::Hook => client.list_hook_tasks(&query).await,
                }
            },
            move |outcome| Message::Tasks(TaskMessage::Loaded(queue, page, outcome)),
        )
    }

    #[allow(clippy::too_many_lines)]
    pub(crate) fn handle_settings(&mut self, msg: SettingsMessage) -> Task<Message> {
        let settings = &mut self.settings;
        match msg {
            SettingsMessage::LicenseLoaded(outcome) => {
                settings.busy = false;
                match outcome {
                    Ok(license) => {
                        settings.license = Some(license);
                        settings.license_error = None;
                        settings.license_key.clear();
                    }
                    Err(failure) if failure.unauthorized => {
                        return self.report("License", &failure);
                    }
                    Err(failure) => settings.license_error = Some(failure.message),
                }
            }
            SettingsMessage::LicenseKeyChanged(key) => settings.license_key = key,
            SettingsMessage::ApplyLicense => {
                let license_key = settings.license_key.trim().to_string();
                if license_key.is_empty() {
                    settings.license_error = Some("Enter a license key".to_string());
                    return Task::none();
                }
                settings.busy = true;
                let request = LicenseRequest { license_key };
                return self.call(
                    move |client| async move { client.set_license(&request).await },
                    |outcome| Message::Settings(SettingsMessage::LicenseLoaded(outcome)),
                );
            }
            SettingsMessage::RequestTokenReset => settings.confirm_reset = true,
            SettingsMessage::CancelTokenReset => settings.confirm_reset = false,
            SettingsMessage::ConfirmTokenReset => {
                settings.confirm_reset = false;
                settings.busy = true;
                return self.call(
                    |client| async move { client.reset_root_token().await },
                    |outcome| Message::Settings(SettingsMessage::TokenReset(outcome)),
                );
            }
            SettingsMessage::TokenReset(outcome) => {
                settings.busy = false;
                match outcome {
                    Ok(token) => {
                        info!("Root token reset");
                        settings.new_root_token = Some(token);
                        self.toasts.info("Root token reset");
                    }
                    Err(failure) => return self.report("Token reset failed", &failure),
                }
            }
            SettingsMessage::PasswordChanged(password) => settings.password = password,
            SettingsMessage::PasswordConfirmChanged(confirm) => settings.password_confirm = confirm,
            SettingsMessage::ApplyPassword => {
                let request = match settings.password_request() {
                    Ok(request) => request,
                    Err(e) => {
                        settings.password_error = Some(e);
                        return Task::none();
                    }
                };
                settings.password_error = None;
                settings.busy = true;
                return self.call(
                    move |client| async move { client.set_root_password(&request).await },
                    |outcome| Message::Settings(SettingsMessage::PasswordApplied(outcome)),
                );
            }
            SettingsMessage::PasswordApplied(outcome) => {
                settings.busy = false;
                match outcome {
                    Ok(()) => {
                        settings.password.clear();
                        settings.password_confirm.clear();
                        self.toasts.info("Root password changed");
                    }
                    Err(failure) => return self.report("Password change failed", &failure),
                }
            }
            SettingsMessage::ThemeSelected(theme) => {
                palette::set_theme(theme);
                self.config.theme = theme;
                let config = self.config.clone();
                return Task::perform(
                    async move { save_config(config).await.map(|_| ()) },
                    Message::Persisted,
                );
            }
            SettingsMessage::ServerUrlChanged(url) => settings.server_url = url,
            SettingsMessage::PageSizeChanged(size) => settings.page_size = size,
            SettingsMessage::SaveConfig => match settings.build_config(&self.config) {
                Ok(config) => {
                    settings.config_error = None;
                    return Task::perform(save_config(config), |result| {
                        Message::Settings(SettingsMessage::ConfigSaved(result))
                    });
                }
                Err(e) => settings.config_error = Some(e),
            },
            SettingsMessage::ConfigSaved(result) => match result {
                Ok(config) => return self.config_saved(config),
                Err(e) => settings.config_error = Some(e),
            },
        }
        Task::none()
    }

    /// Applies saved settings; a new server means a new session.
    fn config_saved(&mut self, config: ConsoleConfig) -> Task<Message> {
        let server_changed = config.server_url != self.config.server_url;
        self.apply_config(config);
        self.toasts.info("Settings saved");
        if !server_changed {
            return Task::none();
        }
        info!("Server changed to {}", self.config.server_url);
        self.phase = Phase::Booting;
        self.login.reset();
        if self.client.is_none() {
            self.phase = Phase::SignedOut;
            return Task::none();
        }
        Task::perform(
            restore_session(self.config.server_url.clone()),
            Message::SessionRestored,
        )
    }
}
