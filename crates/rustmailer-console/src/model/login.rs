//! Sign-in screen state.

/// What the user signs in with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Root password, exchanged for an access token.
    Password(String),
    /// Access token used as is.
    Token(String),
}

/// Sign-in form.
#[derive(Debug, Default)]
pub struct LoginState {
    /// Sign in with a token instead of the root password.
    pub use_token: bool,
    /// Root password as typed.
    pub password: String,
    /// Access token as typed.
    pub token: String,
    /// Why the last attempt failed.
    pub error: Option<String>,
    /// A sign-in request is in flight.
    pub submitting: bool,
}

impl LoginState {
    /// Credential for the selected mode, or `None` when the field is blank.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        if self.use_token {
            let token = self.token.trim();
            (!token.is_empty()).then(|| Credential::Token(token.to_string()))
        } else {
            (!self.password.is_empty()).then(|| Credential::Password(self.password.clone()))
        }
    }

    /// Forgets typed secrets after a sign-in or sign-out.
    pub fn reset(&mut self) {
        self.password.clear();
        self.token.clear();
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_follows_mode() {
        let mut state = LoginState {
            password: "secret".into(),
            token: "  tok-1 ".into(),
            ..LoginState::default()
        };
        assert_eq!(state.credential(), Some(Credential::Password("secret".into())));

        state.use_token = true;
        assert_eq!(state.credential(), Some(Credential::Token("tok-1".into())));
    }

    #[test]
    fn test_blank_credential() {
        let mut state = LoginState::default();
        assert_eq!(state.credential(), None);
        state.use_token = true;
        state.token = "   ".into();
        assert_eq!(state.credential(), None);
    }

    #[test]
    fn test_reset_clears_secrets() {
        let mut state = LoginState {
            password: "p".into(),
            token: "t".into(),
            submitting: true,
            error: Some("bad".into()),
            ..LoginState::default()
        };
        state.reset();
        assert!(state.password.is_empty() && state.token.is_empty());
        assert!(!state.submitting);
        assert_eq!(state.error.as_deref(), Some("bad"));
    }
}
