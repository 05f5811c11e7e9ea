//! Accounts page state.

use rustmailer_console_api::types::{AccountEntity, AccountRunningState};
use rustmailer_console_core::dialog::AccountDialog;
use rustmailer_console_core::forms::AccountForm;

use super::RecordPage;

/// Account list, add/edit form and the running-state and authorize dialogs.
#[derive(Debug, Default)]
pub struct AccountsState {
    /// List, form and dialog.
    pub records: RecordPage<AccountEntity, AccountForm, AccountDialog>,
    /// Live sync state for the running-state dialog.
    pub running_state: Option<AccountRunningState>,
    /// Why the last running-state poll failed.
    pub running_error: Option<String>,
    /// OAuth2 configuration picked in the authorize dialog.
    pub authorize_with: String,
    /// Authorization link returned by the server.
    pub authorize_url: Option<String>,
    /// An authorize-URL request is in flight.
    pub authorizing: bool,
    /// OAuth2 configuration to authorize with once a save completes.
    pub pending_authorize: Option<String>,
}

impl AccountsState {
    /// Opens the running-state dialog for `account`.
    pub fn open_running_state(&mut self, account: AccountEntity) {
        self.running_state = None;
        self.running_error = None;
        self.records
            .open_for(AccountDialog::RunningState, account, AccountForm::default());
    }

    /// Opens the authorize dialog for `account`, preselecting `oauth2_name`.
    pub fn open_authorize(&mut self, account: AccountEntity, oauth2_name: Option<String>) {
        self.authorize_url = None;
        self.authorizing = false;
        self.authorize_with = oauth2_name.unwrap_or_default();
        self.records
            .open_for(AccountDialog::Authorize, account, AccountForm::default());
    }

    /// Account the open dialog acts on.
    #[must_use]
    pub fn dialog_account_id(&self) -> Option<u64> {
        self.records.dialog.current_row().map(|a| a.id)
    }

    /// Whether the running-state dialog is open and should be polled.
    #[must_use]
    pub fn polls_running_state(&self) -> bool {
        self.records.dialog.is_open(AccountDialog::RunningState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: u64) -> AccountEntity {
        AccountEntity {
            id,
            email: format!("user{id}@example.com"),
            name: None,
            mailer_type: rustmailer_console_api::types::MailerType::ImapSmtp,
            imap: None,
            smtp: None,
            enabled: true,
            minimal_sync: false,
            sync_interval_min: None,
            capabilities: Vec::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_running_state_dialog() {
        let mut state = AccountsState::default();
        state.running_state = Some(AccountRunningState::default());
        state.open_running_state(account(3));

        assert!(state.polls_running_state());
        assert_eq!(state.dialog_account_id(), Some(3));
        assert!(state.running_state.is_none());

        state.records.close();
        assert!(!state.polls_running_state());
        assert_eq!(state.dialog_account_id(), None);
    }

    #[test]
    fn test_authorize_dialog_preselects_configuration() {
        let mut state = AccountsState {
            authorize_url: Some("https://accounts.example.com/o".into()),
            ..AccountsState::default()
        };
        state.open_authorize(account(9), Some("google".into()));

        assert!(state.records.dialog.is_open(AccountDialog::Authorize));
        assert_eq!(state.authorize_with, "google");
        assert!(state.authorize_url.is_none());
    }
}
