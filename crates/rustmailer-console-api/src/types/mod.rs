//! Wire types exchanged with the RustMailer REST API.

mod account;
mod envelope;
mod hook;
mod mailbox;
mod mta;
mod oauth2;
mod proxy;
mod search;
mod system;
mod template;

pub use account::{
    AccountCreateRequest, AccountEntity, AccountRunningState, AccountUpdateRequest, AuthConfig,
    AuthType, Encryption, MailerType, ServerConfig, TrackedError,
};
pub use envelope::{
    Addr, AttachmentInfo, BodyPartMeta, DataPage, EmailEnvelope, EnvelopeFlag, FlagAction,
    FlagMessageRequest, ForwardEmailRequest, ListMessagesQuery, MailboxTransferRequest,
    MessageContent, MessageDeleteRequest, OutgoingAttachment, ReplyEmailRequest, SearchRequest,
    SendEmailRequest,
};
pub use hook::{
    EventHook, EventHookRequest, EventType, HookType, HttpConfig, HttpMethod, NatsAuthType,
    NatsConfig, ResolveResult, VrlScriptTestRequest,
};
pub use mailbox::MailboxData;
pub use mta::{Mta, MtaCredentials, MtaRequest, MtaSendTestRequest, MtaServer};
pub use oauth2::{AuthorizeUrlRequest, OAuth2Entity, OAuth2Request};
pub use proxy::{Proxy, ProxyRequest};
pub use search::{LogicOperator, SearchExpr};
pub use system::{
    License, LicenseRequest, LicenseType, LoginRequest, LoginResponse, Overview, RootPasswordRequest,
    TaskListQuery, TaskRecord, TaskStatus, TimeSeriesPoint,
};
pub use template::{EmailTemplate, EmailTemplateRequest, TemplateSendTestRequest};
