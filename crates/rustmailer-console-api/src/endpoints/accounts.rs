//! Account and mailbox endpoints.

use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{
    AccountCreateRequest, AccountEntity, AccountRunningState, AccountUpdateRequest,
    AuthorizeUrlRequest, DataPage, MailboxData,
};

impl ApiClient {
    /// Lists all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_accounts(&self) -> Result<Vec<AccountEntity>> {
        let page: DataPage<AccountEntity> = self.get_json("list-accounts").await?;
        Ok(page.items)
    }

    /// Fetches one account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_account(&self, account_id: u64) -> Result<AccountEntity> {
        self.get_json(&format!("account/{account_id}")).await
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the settings.
    pub async fn create_account(&self, request: &AccountCreateRequest) -> Result<AccountEntity> {
        let account: AccountEntity = self.post_json("account", request).await?;
        info!("Created account {} ({})", account.id, account.email);
        Ok(account)
    }

    /// Updates an account. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_account(
        &self,
        account_id: u64,
        request: &AccountUpdateRequest,
    ) -> Result<()> {
        self.put_unit(&format!("account/{account_id}"), request)
            .await
    }

    /// Deletes an account and its cached data.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_account(&self, account_id: u64) -> Result<()> {
        self.delete_unit(&format!("account/{account_id}")).await?;
        info!("Deleted account {account_id}");
        Ok(())
    }

    /// Fetches the live synchronization state of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn account_running_state(&self, account_id: u64) -> Result<AccountRunningState> {
        self.get_json(&format!("account-state/{account_id}")).await
    }

    /// Asks the server for the provider authorization URL of an OAuth2 account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn oauth2_authorize_url(&self, request: &AuthorizeUrlRequest) -> Result<String> {
        self.post_text("oauth2-authorize-url", request).await
    }

    /// Lists the mailboxes of an account.
    ///
    /// With `remote` set the server queries the mail provider instead of its cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_mailboxes(&self, account_id: u64, remote: bool) -> Result<Vec<MailboxData>> {
        self.get_json_with_query(
            &format!("list-mailboxes/{account_id}"),
            &[("remote", remote)],
        )
        .await
    }
}
