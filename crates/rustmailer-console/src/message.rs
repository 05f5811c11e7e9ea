//! Message types for application events.
//!
//! In the Elm architecture, Messages are events that trigger state changes.
//! Results of server calls arrive as [`Outcome`]s so an expired session can be
//! told apart from every other failure.

use std::path::PathBuf;

use iced::widget::text_editor;
use rustmailer_console_api::types::{
    AccountEntity, AccountRunningState, DataPage, EmailEnvelope, EmailTemplate, EventHook,
    EventType, License, MailboxData, MessageContent, Mta, OAuth2Entity, Overview, Proxy,
    ResolveResult, TaskRecord,
};
use rustmailer_console_core::filter::{Comparison, FilterField, FilterOperator};
use rustmailer_console_core::{ConsoleConfig, LocalStore, Theme, Ticket};

/// A failed server call.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    /// Human-readable reason.
    pub message: String,
    /// The token was rejected; the user has to sign in again.
    pub unauthorized: bool,
}

impl From<rustmailer_console_api::Error> for ApiFailure {
    fn from(error: rustmailer_console_api::Error) -> Self {
        Self {
            unauthorized: error.is_unauthorized(),
            message: error.to_string(),
        }
    }
}

impl From<rustmailer_console_core::Error> for ApiFailure {
    fn from(error: rustmailer_console_core::Error) -> Self {
        match error {
            rustmailer_console_core::Error::Api(error) => error.into(),
            other => Self {
                message: other.to_string(),
                unauthorized: false,
            },
        }
    }
}

/// Result of a server call.
pub type Outcome<T> = Result<T, ApiFailure>;

/// Application messages (events).
#[derive(Debug, Clone)]
pub enum Message {
    // Startup and session
    /// Settings file read.
    ConfigLoaded(Result<ConsoleConfig, String>),
    /// Local store opened.
    StoreOpened(Result<LocalStore, String>),
    /// Stored token read from the credential store.
    SessionRestored(Result<Option<String>, String>),
    /// Server answered the check of a restored token.
    SessionChecked(Outcome<()>),
    /// Login screen messages.
    Login(LoginMessage),
    /// Login finished with an access token.
    LoggedIn(Outcome<String>),
    /// Sign out and forget the token.
    Logout,
    /// A background write (token, draft, layout) finished.
    Persisted(Result<(), String>),

    // Navigation
    /// Switch to a page.
    NavigateTo(Page),

    // Pages
    /// Dashboard messages.
    Dashboard(DashboardMessage),
    /// Accounts page messages.
    Accounts(RecordMessage<AccountEntity, AccountAction>),
    /// Mailbox browser messages.
    Mailboxes(MailboxMessage),
    /// Compose form messages.
    Compose(ComposeMessage),
    /// Hooks page messages.
    Hooks(RecordMessage<EventHook, HookAction>),
    /// Templates page messages.
    Templates(RecordMessage<EmailTemplate, TemplateAction>),
    /// MTA page messages.
    Mtas(RecordMessage<Mta, MtaAction>),
    /// Proxy page messages.
    Proxies(RecordMessage<Proxy, ProxyAction>),
    /// OAuth2 page messages.
    OAuth2(RecordMessage<OAuth2Entity, OAuth2Action>),
    /// Task queue messages.
    Tasks(TaskMessage),
    /// Settings page messages.
    Settings(SettingsMessage),

    // Notifications
    /// Close a toast.
    DismissToast(u64),
    /// Drop toasts that have been shown long enough.
    ExpireToasts,

    // Keyboard Events
    /// Keyboard shortcut pressed.
    KeyPressed(KeyboardAction),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// Event with no effect.
    Ignored,
}

/// Top-level pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// Server overview metrics.
    #[default]
    Dashboard,
    /// Account list and onboarding.
    Accounts,
    /// Mailbox tree, envelope list and message view.
    Mailboxes,
    /// New message, reply or forward.
    Compose,
    /// Event hooks.
    Hooks,
    /// Email templates.
    Templates,
    /// Outbound relays.
    Mtas,
    /// Outbound proxies.
    Proxies,
    /// OAuth2 client configurations.
    OAuth2,
    /// Email and hook task queues.
    Tasks,
    /// License, root credentials and console settings.
    Settings,
}

impl Page {
    /// Pages listed in the header, in order.
    pub const NAVIGATION: [Self; 10] = [
        Self::Dashboard,
        Self::Accounts,
        Self::Mailboxes,
        Self::Hooks,
        Self::Templates,
        Self::Mtas,
        Self::Proxies,
        Self::OAuth2,
        Self::Tasks,
        Self::Settings,
    ];

    /// Header label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Accounts => "Accounts",
            Self::Mailboxes => "Mailboxes",
            Self::Compose => "Compose",
            Self::Hooks => "Hooks",
            Self::Templates => "Templates",
            Self::Mtas => "MTAs",
            Self::Proxies => "Proxies",
            Self::OAuth2 => "OAuth2",
            Self::Tasks => "Tasks",
            Self::Settings => "Settings",
        }
    }
}

/// Keyboard actions that can be triggered by shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardAction {
    /// Compose new message (Ctrl+N).
    ComposeNew,
    /// Reply to the open message (Ctrl+R).
    Reply,
    /// Reply all (Ctrl+Shift+R).
    ReplyAll,
    /// Forward the open message (Ctrl+Shift+F).
    Forward,
    /// Delete checked messages (Delete).
    Delete,
    /// Reload the current page (F5).
    Refresh,
    /// Close the open dialog or leave compose (Escape).
    Cancel,
    /// Send from the compose view (Ctrl+Enter).
    Send,
    /// Next envelope page (Ctrl+Right).
    NextPage,
    /// Previous envelope page (Ctrl+Left).
    PreviousPage,
}

/// Login screen.
#[derive(Debug, Clone)]
pub enum LoginMessage {
    /// Switch between root password and access token.
    UseToken(bool),
    /// Password typed.
    PasswordChanged(String),
    /// Token typed.
    TokenChanged(String),
    /// Sign in.
    Submit,
}

/// Dashboard.
#[derive(Debug, Clone)]
pub enum DashboardMessage {
    /// Poll interval elapsed or manual refresh.
    Refresh,
    /// Overview fetched.
    Loaded(Outcome<Overview>),
}

/// Messages shared by every record page (accounts, hooks, templates, MTAs,
/// proxies, OAuth2). `A` carries the page's own form edits and extra actions.
#[derive(Debug, Clone)]
pub enum RecordMessage<T, A> {
    /// Reload the list.
    Refresh,
    /// List fetched.
    Loaded(Outcome<Vec<T>>),
    /// Open the add dialog.
    OpenAdd,
    /// Open the edit dialog for a record id.
    OpenEdit(u64),
    /// Ask to confirm deleting a record id.
    OpenDelete(u64),
    /// Close whatever dialog is open.
    CloseDialog,
    /// Validate and submit the form.
    Save,
    /// Create or update finished with the record id.
    Saved(Outcome<u64>),
    /// Delete the record the dialog was opened for.
    ConfirmDelete,
    /// Delete finished.
    Deleted(Outcome<()>),
    /// Page-specific action.
    Action(A),
}

/// Which text field of a server section changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerField {
    /// Hostname.
    Host,
    /// Port.
    Port,
    /// Password.
    Password,
}

/// IMAP or SMTP section of the account form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerSide {
    /// Incoming.
    Imap,
    /// Outgoing.
    Smtp,
}

/// Account page actions.
#[derive(Debug, Clone)]
pub enum AccountAction {
    /// Email typed; known providers fill the server sections.
    EmailChanged(String),
    /// Display name typed.
    NameChanged(String),
    /// Mailer type picked.
    MailerTypeSelected(rustmailer_console_api::types::MailerType),
    /// Server section text typed.
    ServerText(ServerSide, ServerField, String),
    /// Server encryption picked.
    ServerEncryption(ServerSide, rustmailer_console_api::types::Encryption),
    /// Server auth type picked.
    ServerAuth(ServerSide, rustmailer_console_api::types::AuthType),
    /// Proxy picked for the account (`None` = direct).
    ProxySelected(Option<u64>),
    /// OAuth2 configuration picked by name.
    OAuth2Selected(String),
    /// Enabled toggled.
    EnabledToggled(bool),
    /// Minimal sync toggled.
    MinimalSyncToggled(bool),
    /// Sync interval typed.
    SyncIntervalChanged(String),
    /// Show the live sync state of an account.
    OpenRunningState(u64),
    /// Poll the running state of the open dialog.
    PollRunningState,
    /// Running state fetched.
    RunningStateLoaded(Outcome<AccountRunningState>),
    /// Start OAuth2 authorization for an account.
    OpenAuthorize(u64),
    /// Request the authorization URL.
    Authorize,
    /// Authorization URL received.
    AuthorizeUrl(Outcome<String>),
    /// Open the received URL in the browser.
    OpenAuthorizeUrl,
    /// Browse the mailboxes of an account.
    Browse(u64),
}

/// Mailbox browser.
#[derive(Debug, Clone)]
pub enum MailboxMessage {
    /// Account picked.
    AccountSelected(u64),
    /// Mailboxes fetched for an account.
    MailboxesLoaded(u64, Outcome<Vec<MailboxData>>),
    /// Collapsed tree nodes read for an account.
    CollapsedLoaded(u64, Result<std::collections::BTreeSet<String>, String>),
    /// Expand or collapse a tree node.
    ToggleNode(String),
    /// Mailbox picked in the tree.
    MailboxSelected(String),
    /// Query the mail provider instead of the server cache.
    RemoteToggled(bool),
    /// Reload mailboxes and the current page.
    Refresh,
    /// Envelope page fetched.
    PageLoaded(Ticket, Outcome<DataPage<EmailEnvelope>>),
    /// Next envelope page.
    NextPage,
    /// Previous envelope page.
    PreviousPage,
    /// Check or uncheck an envelope.
    ToggleChecked(u32),
    /// Check or uncheck every envelope on the page.
    ToggleAllChecked,
    /// Open an envelope in the reading pane.
    Open(u32),
    /// Message body fetched.
    ContentLoaded(u32, Outcome<MessageContent>),
    /// Close the reading pane.
    CloseMessage,
    /// Add or remove a flag on the checked (or open) envelopes.
    Flag(FlagChange),
    /// Flag change finished.
    Flagged(Outcome<()>),
    /// Open the move dialog.
    OpenMove,
    /// Destination typed or picked.
    MoveTargetChanged(String),
    /// Move the checked envelopes.
    ConfirmMove,
    /// Move finished.
    Moved(Outcome<()>),
    /// Ask to confirm deleting the checked envelopes.
    OpenDelete,
    /// Delete the checked envelopes.
    ConfirmDelete,
    /// Delete finished.
    Deleted(Outcome<()>),
    /// Filter dialog messages.
    Filter(FilterMessage),
    /// Close the open dialog.
    CloseDialog,
    /// Start a reply, reply-all or forward of the open message.
    Respond(rustmailer_console_core::ComposeMode),
}

/// Flag edits from the envelope toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagChange {
    /// Mark as read.
    MarkSeen,
    /// Mark as unread.
    MarkUnseen,
    /// Star.
    Flag,
    /// Unstar.
    Unflag,
}

/// Filter dialog.
#[derive(Debug, Clone)]
pub enum FilterMessage {
    /// Open the dialog.
    Open,
    /// Operator picked.
    OperatorSelected(FilterOperator),
    /// Add an empty condition row.
    AddCondition,
    /// Remove a condition row.
    RemoveCondition(usize),
    /// Condition field picked.
    FieldSelected(usize, FilterField),
    /// Condition comparison picked.
    ComparisonSelected(usize, Comparison),
    /// Condition value typed.
    ValueChanged(usize, String),
    /// Apply the filter.
    Apply,
    /// Remove the filter.
    Clear,
}

/// Compose form.
#[derive(Debug, Clone)]
pub enum ComposeMessage {
    /// Start an empty message.
    New,
    /// To typed.
    ToChanged(String),
    /// Cc typed.
    CcChanged(String),
    /// Bcc typed.
    BccChanged(String),
    /// Subject typed.
    SubjectChanged(String),
    /// Body edited.
    BodyAction(text_editor::Action),
    /// A saved draft body was found.
    DraftRestored(String, Option<String>),
    /// Attachment path typed.
    AttachPathChanged(String),
    /// Attach the typed path.
    Attach,
    /// Attachment file read.
    AttachmentLoaded(Result<rustmailer_console_api::types::OutgoingAttachment, String>),
    /// Remove an attachment.
    RemoveAttachment(usize),
    /// Submit.
    Send,
    /// Submission finished.
    Sent(Outcome<()>),
    /// Leave compose.
    Cancel,
}

/// Hooks page actions.
#[derive(Debug, Clone)]
pub enum HookAction {
    /// Scope picked (`None` = global).
    AccountSelected(Option<u64>),
    /// Description typed.
    DescriptionChanged(String),
    /// Enabled toggled.
    EnabledToggled(bool),
    /// Hook type picked.
    HookTypeSelected(rustmailer_console_api::types::HookType),
    /// HTTP target typed.
    TargetUrlChanged(String),
    /// HTTP method picked.
    MethodSelected(rustmailer_console_api::types::HttpMethod),
    /// Edit in the HTTP headers editor.
    HeadersAction(text_editor::Action),
    /// NATS host typed.
    NatsHostChanged(String),
    /// NATS port typed.
    NatsPortChanged(String),
    /// NATS auth type picked.
    NatsAuthSelected(rustmailer_console_api::types::NatsAuthType),
    /// NATS token typed.
    NatsTokenChanged(String),
    /// NATS username typed.
    NatsUsernameChanged(String),
    /// NATS password typed.
    NatsPasswordChanged(String),
    /// NATS stream typed.
    StreamChanged(String),
    /// NATS namespace typed.
    NamespaceChanged(String),
    /// VRL script edited.
    ScriptAction(text_editor::Action),
    /// Event toggled.
    EventToggled(EventType),
    /// Open the VRL test dialog for the form's script.
    OpenVrlTest,
    /// Sample event edited.
    SampleEventAction(text_editor::Action),
    /// Run the script against the sample event.
    RunVrlTest,
    /// Script result received.
    VrlResolved(Outcome<ResolveResult>),
    /// Close the VRL test and return to the form.
    CloseVrlTest,
}

/// Templates page actions.
#[derive(Debug, Clone)]
pub enum TemplateAction {
    /// Owner account picked (`None` = shared).
    AccountSelected(Option<u64>),
    /// Description typed.
    DescriptionChanged(String),
    /// Subject typed.
    SubjectChanged(String),
    /// Preview text typed.
    PreviewChanged(String),
    /// Plain-text body edited.
    TextAction(text_editor::Action),
    /// HTML body edited.
    HtmlAction(text_editor::Action),
    /// Open the test-send dialog.
    OpenSendTest(u64),
    /// Sending account picked.
    TestAccountSelected(u64),
    /// Test recipient typed.
    TestRecipientChanged(String),
    /// Template parameters edited.
    TestParamsAction(text_editor::Action),
    /// Send the test.
    SendTest,
    /// Test send finished.
    TestSent(Outcome<()>),
}

/// MTA page actions.
#[derive(Debug, Clone)]
pub enum MtaAction {
    /// Description typed.
    DescriptionChanged(String),
    /// Host typed.
    HostChanged(String),
    /// Port typed.
    PortChanged(String),
    /// Encryption picked.
    EncryptionSelected(rustmailer_console_api::types::Encryption),
    /// Username typed.
    UsernameChanged(String),
    /// Password typed.
    PasswordChanged(String),
    /// DSN support toggled.
    DsnToggled(bool),
    /// Proxy picked.
    ProxySelected(Option<u64>),
    /// Open the test-send dialog.
    OpenSendTest(u64),
    /// Test field typed.
    TestFieldChanged(MtaTestField, String),
    /// Send the test.
    SendTest,
    /// Test send finished.
    TestSent(Outcome<()>),
}

/// Text fields of the MTA test-send dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtaTestField {
    /// Sender.
    From,
    /// Recipient.
    To,
    /// Subject.
    Subject,
    /// Body.
    Message,
}

/// Proxy page actions.
#[derive(Debug, Clone)]
pub enum ProxyAction {
    /// URL typed.
    UrlChanged(String),
}

/// OAuth2 page actions.
#[derive(Debug, Clone)]
pub enum OAuth2Action {
    /// Text field typed.
    FieldChanged(OAuth2Field, String),
    /// Enabled toggled.
    EnabledToggled(bool),
    /// Proxy picked.
    ProxySelected(Option<u64>),
}

/// Text fields of the OAuth2 form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuth2Field {
    /// Name.
    Description,
    /// Client id.
    ClientId,
    /// Client secret.
    ClientSecret,
    /// Authorization endpoint.
    AuthUrl,
    /// Token endpoint.
    TokenUrl,
    /// Redirect URI.
    RedirectUri,
    /// Scopes.
    Scopes,
    /// Extra parameters.
    ExtraParams,
}

/// Task queues.
#[derive(Debug, Clone)]
pub enum TaskMessage {
    /// Queue picked.
    QueueSelected(TaskQueue),
    /// Reload the current page.
    Refresh,
    /// Next page.
    NextPage,
    /// Previous page.
    PreviousPage,
    /// Page fetched for a queue and page number.
    Loaded(TaskQueue, u64, Outcome<DataPage<TaskRecord>>),
}

/// Which task queue is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskQueue {
    /// Outbound email.
    #[default]
    Email,
    /// Hook deliveries.
    Hook,
}

/// Settings page.
#[derive(Debug, Clone)]
pub enum SettingsMessage {
    /// License fetched.
    LicenseLoaded(Outcome<License>),
    /// License key typed.
    LicenseKeyChanged(String),
    /// Upload the license key.
    ApplyLicense,
    /// Ask to confirm a root token reset.
    RequestTokenReset,
    /// Cancel the reset.
    CancelTokenReset,
    /// Reset the root token.
    ConfirmTokenReset,
    /// New root token received.
    TokenReset(Outcome<String>),
    /// New root password typed.
    PasswordChanged(String),
    /// Confirmation typed.
    PasswordConfirmChanged(String),
    /// Change the root password.
    ApplyPassword,
    /// Password change finished.
    PasswordApplied(Outcome<()>),
    /// Theme picked.
    ThemeSelected(Theme),
    /// Server URL typed.
    ServerUrlChanged(String),
    /// Page size typed.
    PageSizeChanged(String),
    /// Save console settings.
    SaveConfig,
    /// Settings written.
    ConfigSaved(Result<ConsoleConfig, String>),
}
