//! Message endpoints: listing, search, actions and sending.

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{
    DataPage, EmailEnvelope, FlagMessageRequest, ForwardEmailRequest, ListMessagesQuery,
    MailboxTransferRequest, MessageContent, MessageDeleteRequest, ReplyEmailRequest,
    SearchRequest, SendEmailRequest,
};

impl ApiClient {
    /// Fetches one page of envelopes from a mailbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_messages(
        &self,
        account_id: u64,
        query: &ListMessagesQuery,
    ) -> Result<DataPage<EmailEnvelope>> {
        self.get_json_with_query(&format!("list-messages/{account_id}"), query)
            .await
    }

    /// Fetches one page of envelopes matching a search expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn search_messages(
        &self,
        account_id: u64,
        request: &SearchRequest,
    ) -> Result<DataPage<EmailEnvelope>> {
        self.post_json(&format!("search-messages/{account_id}"), request)
            .await
    }

    /// Moves messages to another mailbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn move_messages(
        &self,
        account_id: u64,
        request: &MailboxTransferRequest,
    ) -> Result<()> {
        self.post_unit(&format!("move-messages/{account_id}"), request)
            .await
    }

    /// Adds or removes flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn flag_messages(&self, account_id: u64, request: &FlagMessageRequest) -> Result<()> {
        self.post_unit(&format!("flag-messages/{account_id}"), request)
            .await
    }

    /// Deletes messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_messages(
        &self,
        account_id: u64,
        request: &MessageDeleteRequest,
    ) -> Result<()> {
        self.post_unit(&format!("delete-messages/{account_id}"), request)
            .await
    }

    /// Fetches the body of a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn message_content(
        &self,
        account_id: u64,
        mailbox: &str,
        uid: u32,
    ) -> Result<MessageContent> {
        self.get_json_with_query(
            &format!("message-content/{account_id}"),
            &[("mailbox", mailbox.to_string()), ("uid", uid.to_string())],
        )
        .await
    }

    /// Replies to a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reply_message(&self, account_id: u64, request: &ReplyEmailRequest) -> Result<()> {
        self.post_unit(&format!("reply-mail/{account_id}"), request)
            .await
    }

    /// Forwards a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn forward_message(
        &self,
        account_id: u64,
        request: &ForwardEmailRequest,
    ) -> Result<()> {
        self.post_unit(&format!("forward-mail/{account_id}"), request)
            .await
    }

    /// Queues a new message for delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn send_message(&self, account_id: u64, request: &SendEmailRequest) -> Result<()> {
        self.post_unit(&format!("send-mail/{account_id}"), request)
            .await
    }
}
