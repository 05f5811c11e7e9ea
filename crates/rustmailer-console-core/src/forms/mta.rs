//! MTA (SMTP relay) form.

use rustmailer_console_api::types::{Encryption, Mta, MtaCredentials, MtaRequest, MtaServer};

use super::{ValidationError, ValidationResult, finish, non_blank, parse_port};

/// Add/edit MTA form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtaForm {
    /// MTA being edited; `None` when adding.
    pub mta_id: Option<u64>,
    /// Description.
    pub description: String,
    /// SMTP host.
    pub host: String,
    /// SMTP port as typed.
    pub port: String,
    /// Encryption mode.
    pub encryption: Encryption,
    /// SMTP username.
    pub username: String,
    /// SMTP password. Blank on edit keeps the stored one.
    pub password: String,
    /// Whether the relay supports delivery status notifications.
    pub dsn_capable: bool,
    /// Proxy id.
    pub use_proxy: Option<u64>,
}

impl Default for MtaForm {
    fn default() -> Self {
        Self {
            mta_id: None,
            description: String::new(),
            host: String::new(),
            port: "465".to_string(),
            encryption: Encryption::Ssl,
            username: String::new(),
            password: String::new(),
            dsn_capable: false,
            use_proxy: None,
        }
    }
}

impl MtaForm {
    /// Creates an empty add form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills an edit form from a stored MTA. The password is never echoed back.
    #[must_use]
    pub fn from_mta(mta: &Mta) -> Self {
        Self {
            mta_id: Some(mta.id),
            description: mta.description.clone().unwrap_or_default(),
            host: mta.server.host.clone(),
            port: mta.server.port.to_string(),
            encryption: mta.server.encryption,
            username: mta.credentials.username.clone(),
            password: String::new(),
            dsn_capable: mta.dsn_capable,
            use_proxy: mta.use_proxy,
        }
    }

    /// Whether this form edits an existing MTA.
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.mta_id.is_some()
    }

    /// Validates the form.
    ///
    /// # Errors
    ///
    /// Returns every invalid field.
    pub fn validate(&self) -> ValidationResult<MtaRequest> {
        let mut errors = Vec::new();

        if self.host.trim().is_empty() {
            errors.push(ValidationError::EmptyMtaHost);
        }
        let port = parse_port(&self.port).unwrap_or_else(|| {
            errors.push(ValidationError::InvalidMtaPort);
            0
        });
        if self.username.trim().is_empty() {
            errors.push(ValidationError::EmptyMtaUsername);
        }
        if self.password.is_empty() && !self.is_edit() {
            errors.push(ValidationError::EmptyMtaPassword);
        }

        finish(errors, || MtaRequest {
            description: non_blank(&self.description),
            credentials: MtaCredentials {
                username: self.username.trim().to_string(),
                password: (!self.password.is_empty()).then(|| self.password.clone()),
            },
            server: MtaServer {
                host: self.host.trim().to_string(),
                port,
                encryption: self.encryption,
            },
            dsn_capable: self.dsn_capable,
            use_proxy: self.use_proxy,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_password() {
        let form = MtaForm {
            host: "smtp.relay.test".into(),
            username: "relay".into(),
            ..MtaForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            [ValidationError::EmptyMtaPassword]
        );
    }

    #[test]
    fn test_edit_keeps_password() {
        let mta: Mta = serde_json::from_value(serde_json::json!({
            "id": 3,
            "credentials": {"username": "relay"},
            "server": {"host": "smtp.relay.test", "port": 587, "encryption": "StartTls"}
        }))
        .unwrap();
        let form = MtaForm::from_mta(&mta);
        assert!(form.is_edit());

        let request = form.validate().unwrap();
        assert_eq!(request.server.port, 587);
        assert_eq!(request.server.encryption, Encryption::StartTls);
        assert!(request.credentials.password.is_none());
    }

    #[test]
    fn test_all_errors_reported() {
        let form = MtaForm {
            port: "smtp".into(),
            ..MtaForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            [
                ValidationError::EmptyMtaHost,
                ValidationError::InvalidMtaPort,
                ValidationError::EmptyMtaUsername,
                ValidationError::EmptyMtaPassword
            ]
        );
    }
}
